//! Mock live values for testing without a debugger
//!
//! A [`MockValue`] is a tree describing what a debugger would report: typed
//! integers, structs with named fields, containers with indexed elements,
//! pointers, and deliberately unavailable nodes for exercising degraded
//! rendering. Child handles are cloned out of the tree, matching the
//! borrow-per-request model of real adapters.
//!
//! Enabled for tests and behind the `mock-value` feature.

use super::{ValueAccess, ValueHandle};
use crate::error::{AccessFailure, AccessResult};

/// A scripted live value
#[derive(Debug, Clone)]
pub struct MockValue {
    type_name: String,
    kind: MockKind,
}

#[derive(Debug, Clone)]
enum MockKind {
    /// Integer scalar
    Int(i64),
    /// Named fields in declaration order
    Struct(Vec<(String, MockValue)>),
    /// Indexed elements
    Container(Vec<MockValue>),
    /// Pointer to a target value
    Pointer(Box<MockValue>),
    /// Every accessor fails with this failure
    Unavailable(AccessFailure),
    /// Type string only; no readable content
    Opaque,
}

impl MockValue {
    /// An integer scalar of the given type
    pub fn int(type_name: impl Into<String>, value: i64) -> Self {
        Self {
            type_name: type_name.into(),
            kind: MockKind::Int(value),
        }
    }

    /// A value with a type string but no readable fields or elements
    pub fn opaque(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            kind: MockKind::Opaque,
        }
    }

    /// A container with indexed elements
    pub fn container(type_name: impl Into<String>, elements: Vec<MockValue>) -> Self {
        Self {
            type_name: type_name.into(),
            kind: MockKind::Container(elements),
        }
    }

    /// A pointer to a target value
    pub fn pointer(type_name: impl Into<String>, target: MockValue) -> Self {
        Self {
            type_name: type_name.into(),
            kind: MockKind::Pointer(Box::new(target)),
        }
    }

    /// A value whose every access fails (optimized out, target resumed)
    pub fn unavailable(type_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            kind: MockKind::Unavailable(AccessFailure::unavailable(reason)),
        }
    }

    /// Add a named field, converting this value into a struct if needed
    pub fn with_field(mut self, name: impl Into<String>, value: MockValue) -> Self {
        match &mut self.kind {
            MockKind::Struct(fields) => fields.push((name.into(), value)),
            _ => {
                self.kind = MockKind::Struct(vec![(name.into(), value)]);
            }
        }
        self
    }

    fn failure(&self) -> Option<AccessFailure> {
        match &self.kind {
            MockKind::Unavailable(f) => Some(f.clone()),
            _ => None,
        }
    }
}

impl ValueAccess for MockValue {
    fn type_string(&self) -> String {
        self.type_name.clone()
    }

    fn field(&self, name: &str) -> AccessResult<ValueHandle> {
        if let Some(f) = self.failure() {
            return Err(f);
        }
        match &self.kind {
            MockKind::Struct(fields) => fields
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, v)| Box::new(v.clone()) as ValueHandle)
                .ok_or_else(|| AccessFailure::MissingField { field: name.into() }),
            _ => Err(AccessFailure::MissingField { field: name.into() }),
        }
    }

    fn deref(&self) -> AccessResult<ValueHandle> {
        if let Some(f) = self.failure() {
            return Err(f);
        }
        match &self.kind {
            MockKind::Pointer(target) => Ok(Box::new((**target).clone())),
            _ => Err(AccessFailure::NotAPointer),
        }
    }

    fn element_count(&self) -> AccessResult<usize> {
        if let Some(f) = self.failure() {
            return Err(f);
        }
        match &self.kind {
            MockKind::Container(elements) => Ok(elements.len()),
            _ => Err(AccessFailure::NotAContainer),
        }
    }

    fn element(&self, index: usize) -> AccessResult<ValueHandle> {
        if let Some(f) = self.failure() {
            return Err(f);
        }
        match &self.kind {
            MockKind::Container(elements) => elements
                .get(index)
                .map(|v| Box::new(v.clone()) as ValueHandle)
                .ok_or(AccessFailure::OutOfBounds {
                    index,
                    len: elements.len(),
                }),
            _ => Err(AccessFailure::NotAContainer),
        }
    }

    fn as_int(&self) -> AccessResult<i64> {
        if let Some(f) = self.failure() {
            return Err(f);
        }
        match &self.kind {
            MockKind::Int(v) => Ok(*v),
            _ => Err(AccessFailure::NotAnInteger),
        }
    }
}
