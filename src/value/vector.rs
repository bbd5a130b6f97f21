// License: MIT

use std::slice;

use crate::error::PmtError;

use super::Pmt;

/// Ordered sequence of independently typed, shared values.
#[derive(Debug, Default)]
pub struct VectorValue {
    items: Vec<Pmt>,
}

impl VectorValue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_items(items: Vec<Pmt>) -> Self {
        Self { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Handle to the element at `index`, aliasing the stored value.
    pub fn get(&self, index: usize) -> Result<Pmt, PmtError> {
        self.items
            .get(index)
            .cloned()
            .ok_or_else(|| PmtError::index_out_of_range(index, self.items.len()))
    }

    pub fn push(&mut self, item: Pmt) {
        self.items.push(item);
    }

    /// Rebind the slot at `index`, returning the handle it held before.
    pub fn set(&mut self, index: usize, item: Pmt) -> Result<Pmt, PmtError> {
        let length = self.items.len();
        let slot = self
            .items
            .get_mut(index)
            .ok_or_else(|| PmtError::index_out_of_range(index, length))?;
        Ok(std::mem::replace(slot, item))
    }

    pub fn iter(&self) -> slice::Iter<'_, Pmt> {
        self.items.iter()
    }

    pub(super) fn take_items(&mut self) -> Vec<Pmt> {
        std::mem::take(&mut self.items)
    }
}

impl Drop for VectorValue {
    fn drop(&mut self) {
        if !self.items.is_empty() {
            super::release(self.take_items());
        }
    }
}

impl<'a> IntoIterator for &'a VectorValue {
    type Item = &'a Pmt;
    type IntoIter = slice::Iter<'a, Pmt>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl FromIterator<Pmt> for VectorValue {
    fn from_iter<I: IntoIterator<Item = Pmt>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}
