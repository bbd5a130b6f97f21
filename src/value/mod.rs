// License: MIT

use std::cell::{Ref, RefCell, RefMut};
use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;

use crate::codec;
use crate::error::PmtError;
use crate::tag::TypeTag;

mod conversion;
mod element;
mod map;
mod print;
mod scalar;
mod uniform;
mod vector;

pub use element::Element;
pub use map::MapValue;
pub use scalar::{Complex, Scalar};
pub use uniform::UniformVector;
pub use vector::VectorValue;

pub(crate) use uniform::with_items;

/// A polymorphic metadata value: one of a closed set of variants.
#[derive(Debug)]
pub enum Value {
    /// Empty sentinel; what `MapValue::entry` stores in a new slot.
    Null,
    Scalar(Scalar),
    UniformVector(UniformVector),
    Vector(VectorValue),
    Map(MapValue),
}

impl Value {
    pub fn type_tag(&self) -> TypeTag {
        match self {
            Value::Null => TypeTag::Null,
            Value::Scalar(scalar) => scalar.type_tag(),
            Value::UniformVector(uniform) => uniform.type_tag(),
            Value::Vector(_) => TypeTag::Vector,
            Value::Map(_) => TypeTag::Map,
        }
    }

    /// Copy this value and everything below it, sharing nothing with the original.
    pub fn deep_clone(&self) -> Value {
        match self {
            Value::Null => Value::Null,
            Value::Scalar(scalar) => Value::Scalar(scalar.clone()),
            Value::UniformVector(uniform) => Value::UniformVector(uniform.clone()),
            Value::Vector(vector) => {
                Value::Vector(vector.iter().map(Pmt::deep_clone).collect())
            }
            Value::Map(map) => Value::Map(MapValue::from_entries(
                map.iter()
                    .map(|(key, value)| (key.clone(), value.deep_clone()))
                    .collect(),
            )),
        }
    }

    /// Handles held directly by this value, in iteration order.
    fn children(&self) -> Vec<Pmt> {
        match self {
            Value::Vector(vector) => vector.iter().cloned().collect(),
            Value::Map(map) => map.values().cloned().collect(),
            _ => Vec::new(),
        }
    }

    pub fn print<W: fmt::Write>(&self, sink: &mut W) -> fmt::Result {
        print::print_value(self, sink)
    }

    pub fn equals(&self, other: &Value) -> bool {
        structurally_equal(self, other)
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        structurally_equal(self, other)
    }
}

/// Shared, reference-counted handle to a `Value`.
///
/// Cloning a `Pmt` creates an alias: both handles see the same value and
/// each other's in-place mutations. Use [`Pmt::deep_clone`] for an
/// independent copy.
///
/// Containers must form a DAG. The mutators on this handle (`insert`,
/// `push`, `set_item`, `replace`) refuse to create a cycle; mutating
/// through `borrow_mut` does not check.
#[derive(Clone)]
pub struct Pmt(Rc<RefCell<Value>>);

impl Pmt {
    pub fn new(value: Value) -> Self {
        Pmt(Rc::new(RefCell::new(value)))
    }

    pub fn null() -> Self {
        Pmt::new(Value::Null)
    }

    pub fn map() -> Self {
        Pmt::new(Value::Map(MapValue::new()))
    }

    pub fn vector() -> Self {
        Pmt::new(Value::Vector(VectorValue::new()))
    }

    pub fn type_tag(&self) -> TypeTag {
        self.0.borrow().type_tag()
    }

    pub fn is_null(&self) -> bool {
        matches!(&*self.0.borrow(), Value::Null)
    }

    pub fn borrow(&self) -> Ref<'_, Value> {
        self.0.borrow()
    }

    /// Unchecked mutable access; the caller keeps the graph acyclic.
    pub fn borrow_mut(&self) -> RefMut<'_, Value> {
        self.0.borrow_mut()
    }

    /// True when both handles point at the same value.
    pub fn ptr_eq(&self, other: &Pmt) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Number of live handles to this value, including `self`.
    pub fn alias_count(&self) -> usize {
        Rc::strong_count(&self.0)
    }

    pub fn equals(&self, other: &Pmt) -> bool {
        structurally_equal(&self.0.borrow(), &other.0.borrow())
    }

    pub fn print<W: fmt::Write>(&self, sink: &mut W) -> fmt::Result {
        print::print_value(&self.0.borrow(), sink)
    }

    pub fn encode(&self) -> Vec<u8> {
        codec::encode(self)
    }

    pub fn decode(bytes: &[u8]) -> Result<Pmt, PmtError> {
        codec::decode(bytes)
    }

    /// Independent copy of the whole graph below this handle.
    ///
    /// Aliasing inside the graph is not preserved: a value reachable twice
    /// is copied twice.
    pub fn deep_clone(&self) -> Pmt {
        enum Step {
            Visit(Pmt),
            Vector(usize),
            Map(Vec<String>),
        }

        let mut steps = vec![Step::Visit(self.clone())];
        let mut built: Vec<Pmt> = Vec::new();

        while let Some(step) = steps.pop() {
            match step {
                Step::Visit(pmt) => {
                    let value = pmt.0.borrow();
                    match &*value {
                        Value::Vector(vector) => {
                            steps.push(Step::Vector(vector.len()));
                            steps.extend(vector.iter().rev().cloned().map(Step::Visit));
                        }
                        Value::Map(map) => {
                            steps.push(Step::Map(map.keys().cloned().collect()));
                            steps.extend(map.values().rev().cloned().map(Step::Visit));
                        }
                        leaf => built.push(Pmt::new(leaf.deep_clone())),
                    }
                }
                Step::Vector(len) => {
                    let items = built.split_off(built.len() - len);
                    built.push(Pmt::new(Value::Vector(VectorValue::from_items(items))));
                }
                Step::Map(keys) => {
                    let values = built.split_off(built.len() - keys.len());
                    let entries = keys.into_iter().zip(values).collect();
                    built.push(Pmt::new(Value::Map(MapValue::from_entries(entries))));
                }
            }
        }

        built.pop().unwrap_or_else(Pmt::null)
    }

    /// True when `target` is this value or is reachable from it.
    ///
    /// Each shared value is visited once, however many paths lead to it.
    pub fn reaches(&self, target: &Pmt) -> bool {
        let mut seen: HashSet<*const RefCell<Value>> = HashSet::new();
        let mut pending = vec![self.clone()];
        while let Some(pmt) = pending.pop() {
            if pmt.ptr_eq(target) {
                return true;
            }
            if !seen.insert(Rc::as_ptr(&pmt.0)) {
                continue;
            }
            pending.extend(pmt.0.borrow().children());
        }
        false
    }

    fn require(&self, expected: TypeTag, name: &str) -> Result<(), PmtError> {
        let found = self.type_tag();
        if found != expected {
            return Err(PmtError::type_mismatch(name, found));
        }
        Ok(())
    }

    fn check_acyclic(&self, child: &Pmt) -> Result<(), PmtError> {
        if child.reaches(self) {
            log::debug!("rejected {} insertion that would close a cycle", child.type_tag());
            return Err(PmtError::cycle_detected(format!(
                "{} already contains this {}",
                child.type_tag(),
                self.type_tag()
            )));
        }
        Ok(())
    }

    /// Insert into a map value, refusing entries that would create a cycle.
    pub fn insert(&self, key: impl Into<String>, child: Pmt) -> Result<bool, PmtError> {
        self.require(TypeTag::Map, "map")?;
        self.check_acyclic(&child)?;
        self.as_map_mut()?.insert(key, child)
    }

    /// Slot for `key` in a map value, created as `Null` when absent.
    ///
    /// The returned handle aliases the stored value; `replace` on it is
    /// visible through the map.
    pub fn entry(&self, key: &str) -> Result<Pmt, PmtError> {
        let mut map = self.as_map_mut()?;
        let slot = map.entry(key)?.clone();
        Ok(slot)
    }

    pub fn at(&self, key: &str) -> Result<Pmt, PmtError> {
        self.as_map()?.at(key)
    }

    /// Append to a vector value, refusing elements that would create a cycle.
    pub fn push(&self, child: Pmt) -> Result<(), PmtError> {
        self.require(TypeTag::Vector, "vector")?;
        self.check_acyclic(&child)?;
        self.as_vector_mut()?.push(child);
        Ok(())
    }

    pub fn item(&self, index: usize) -> Result<Pmt, PmtError> {
        self.as_vector()?.get(index)
    }

    pub fn set_item(&self, index: usize, child: Pmt) -> Result<Pmt, PmtError> {
        self.require(TypeTag::Vector, "vector")?;
        self.check_acyclic(&child)?;
        self.as_vector_mut()?.set(index, child)
    }

    /// Swap in a new value for every alias of this handle, returning the old one.
    pub fn replace(&self, value: Value) -> Result<Value, PmtError> {
        for child in value.children() {
            self.check_acyclic(&child)?;
        }
        Ok(std::mem::replace(&mut *self.0.borrow_mut(), value))
    }

    pub fn get<T: Element>(&self) -> Result<T, PmtError> {
        self.as_scalar()?.get()
    }

    pub fn as_scalar(&self) -> Result<Ref<'_, Scalar>, PmtError> {
        let value = self.0.borrow();
        let found = value.type_tag();
        Ref::filter_map(value, |v| match v {
            Value::Scalar(scalar) => Some(scalar),
            _ => None,
        })
        .map_err(|_| PmtError::type_mismatch("scalar", found))
    }

    pub fn as_uniform_vector(&self) -> Result<Ref<'_, UniformVector>, PmtError> {
        let value = self.0.borrow();
        let found = value.type_tag();
        Ref::filter_map(value, |v| match v {
            Value::UniformVector(uniform) => Some(uniform),
            _ => None,
        })
        .map_err(|_| PmtError::type_mismatch("uniform_vector", found))
    }

    pub fn as_uniform_vector_mut(&self) -> Result<RefMut<'_, UniformVector>, PmtError> {
        let value = self.0.borrow_mut();
        let found = value.type_tag();
        RefMut::filter_map(value, |v| match v {
            Value::UniformVector(uniform) => Some(uniform),
            _ => None,
        })
        .map_err(|_| PmtError::type_mismatch("uniform_vector", found))
    }

    pub fn as_vector(&self) -> Result<Ref<'_, VectorValue>, PmtError> {
        let value = self.0.borrow();
        let found = value.type_tag();
        Ref::filter_map(value, |v| match v {
            Value::Vector(vector) => Some(vector),
            _ => None,
        })
        .map_err(|_| PmtError::type_mismatch("vector", found))
    }

    pub fn as_vector_mut(&self) -> Result<RefMut<'_, VectorValue>, PmtError> {
        let value = self.0.borrow_mut();
        let found = value.type_tag();
        RefMut::filter_map(value, |v| match v {
            Value::Vector(vector) => Some(vector),
            _ => None,
        })
        .map_err(|_| PmtError::type_mismatch("vector", found))
    }

    pub fn as_map(&self) -> Result<Ref<'_, MapValue>, PmtError> {
        let value = self.0.borrow();
        let found = value.type_tag();
        Ref::filter_map(value, |v| match v {
            Value::Map(map) => Some(map),
            _ => None,
        })
        .map_err(|_| PmtError::type_mismatch("map", found))
    }

    pub fn as_map_mut(&self) -> Result<RefMut<'_, MapValue>, PmtError> {
        let value = self.0.borrow_mut();
        let found = value.type_tag();
        RefMut::filter_map(value, |v| match v {
            Value::Map(map) => Some(map),
            _ => None,
        })
        .map_err(|_| PmtError::type_mismatch("map", found))
    }
}

impl Pmt {
    /// The value itself when this is the last handle to it.
    fn into_sole_value(self) -> Option<Value> {
        Rc::try_unwrap(self.0).ok().map(RefCell::into_inner)
    }
}

/// Drop a batch of handles with an explicit work list instead of one
/// native frame per nesting level.
fn release(mut pending: Vec<Pmt>) {
    while let Some(pmt) = pending.pop() {
        if let Some(mut value) = pmt.into_sole_value() {
            match &mut value {
                Value::Vector(vector) => pending.extend(vector.take_items()),
                Value::Map(map) => pending.extend(map.take_values()),
                _ => {}
            }
        }
    }
}

impl PartialEq for Pmt {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

impl fmt::Debug for Pmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pmt({}: {})", self.type_tag(), self)
    }
}

/// Structural comparison with an explicit work list, so nesting depth
/// does not consume call stack.
fn structurally_equal(left: &Value, right: &Value) -> bool {
    let mut pending: Vec<(Pmt, Pmt)> = Vec::new();
    if !shallow_equal(left, right, &mut pending) {
        return false;
    }

    while let Some((a, b)) = pending.pop() {
        let a = a.0.borrow();
        let b = b.0.borrow();
        if !shallow_equal(&a, &b, &mut pending) {
            return false;
        }
    }
    true
}

/// Compare the top level of two values, queueing child pairs for later.
fn shallow_equal(left: &Value, right: &Value, pending: &mut Vec<(Pmt, Pmt)>) -> bool {
    match (left, right) {
        (Value::Null, Value::Null) => true,
        (Value::Scalar(a), Value::Scalar(b)) => a == b,
        (Value::UniformVector(a), Value::UniformVector(b)) => a == b,
        (Value::Vector(a), Value::Vector(b)) => {
            if a.len() != b.len() {
                return false;
            }
            pending.extend(a.iter().cloned().zip(b.iter().cloned()));
            true
        }
        (Value::Map(a), Value::Map(b)) => {
            if a.len() != b.len() {
                return false;
            }
            for ((key_a, value_a), (key_b, value_b)) in a.iter().zip(b.iter()) {
                if key_a != key_b {
                    return false;
                }
                pending.push((value_a.clone(), value_b.clone()));
            }
            true
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests;
