// License: MIT

use std::collections::btree_map::{self, BTreeMap};

use crate::error::PmtError;

use super::Pmt;

/// String-keyed mapping to shared values.
///
/// Iteration, printing and encoding all walk the entries in ascending byte
/// order of the key, whatever order they were inserted in.
///
/// Every key present maps to a live handle. `entry` fills a missing slot
/// with a `Null` value rather than leaving it unset.
#[derive(Debug, Default)]
pub struct MapValue {
    entries: BTreeMap<String, Pmt>,
}

fn check_key(key: &str) -> Result<(), PmtError> {
    if key.is_empty() {
        return Err(PmtError::invalid_key("empty key"));
    }
    Ok(())
}

impl MapValue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a map from key/value pairs; later duplicates replace earlier ones.
    pub fn from_pairs<K, I>(pairs: I) -> Result<Self, PmtError>
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Pmt)>,
    {
        let mut map = Self::new();
        for (key, value) in pairs {
            map.insert(key, value)?;
        }
        Ok(map)
    }

    pub(crate) fn from_entries(entries: BTreeMap<String, Pmt>) -> Self {
        Self { entries }
    }

    /// Handle to the value under `key`.
    ///
    /// # Errors
    /// Returns `KeyNotFound` when the key is absent. The map is never modified.
    pub fn at(&self, key: &str) -> Result<Pmt, PmtError> {
        self.entries
            .get(key)
            .cloned()
            .ok_or_else(|| PmtError::key_not_found(key))
    }

    pub fn get(&self, key: &str) -> Option<&Pmt> {
        self.entries.get(key)
    }

    /// Mutable slot for `key`, created with a `Null` value if absent.
    ///
    /// Assigning through the returned reference rebinds the slot; calling
    /// `Pmt::replace` on it instead changes the value for every alias.
    pub fn entry(&mut self, key: &str) -> Result<&mut Pmt, PmtError> {
        check_key(key)?;
        Ok(self.entries.entry(key.to_string()).or_insert_with(Pmt::null))
    }

    /// Set the value for `key`, returning `true` when an existing entry was replaced.
    pub fn insert(&mut self, key: impl Into<String>, value: Pmt) -> Result<bool, PmtError> {
        let key = key.into();
        check_key(&key)?;
        Ok(self.entries.insert(key, value).is_some())
    }

    pub fn remove(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, Pmt> {
        self.entries.iter()
    }

    pub fn keys(&self) -> btree_map::Keys<'_, String, Pmt> {
        self.entries.keys()
    }

    pub fn values(&self) -> btree_map::Values<'_, String, Pmt> {
        self.entries.values()
    }

    pub(super) fn take_values(&mut self) -> btree_map::IntoValues<String, Pmt> {
        std::mem::take(&mut self.entries).into_values()
    }
}

impl Drop for MapValue {
    fn drop(&mut self) {
        if !self.entries.is_empty() {
            super::release(self.take_values().collect());
        }
    }
}

impl<'a> IntoIterator for &'a MapValue {
    type Item = (&'a String, &'a Pmt);
    type IntoIter = btree_map::Iter<'a, String, Pmt>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
