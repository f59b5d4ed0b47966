//! Capability interface over opaque live values
//!
//! The engine never talks to a debugger directly; the host hands it values
//! implementing [`ValueAccess`]. Every accessor returns a typed
//! [`AccessFailure`](crate::error::AccessFailure) instead of propagating a raw
//! fault — a value can become partially inaccessible mid-inspection (fields
//! optimized away, target resumed) and the renderer keeps going with
//! placeholders.
//!
//! Handles are borrowed for the duration of one render/extract call and never
//! retained: once the request ends, the underlying process may resume and
//! invalidate them.

#[cfg(any(test, feature = "mock-value"))]
pub mod mock;

use crate::error::AccessResult;

/// A child handle produced by an accessor. Owned by the caller for the rest of
/// the current request only.
pub type ValueHandle = Box<dyn ValueAccess>;

/// Capability interface over one live value.
pub trait ValueAccess {
    /// The host-reported type signature of this value
    fn type_string(&self) -> String;

    /// Look up a field by name
    fn field(&self, name: &str) -> AccessResult<ValueHandle>;

    /// Follow a pointer/reference to its target
    fn deref(&self) -> AccessResult<ValueHandle>;

    /// Number of elements, for container values
    fn element_count(&self) -> AccessResult<usize>;

    /// One element by index, for container values
    fn element(&self, index: usize) -> AccessResult<ValueHandle>;

    /// This value as a signed integer
    fn as_int(&self) -> AccessResult<i64>;

    /// Lazy iteration over elements. Finite; restartable only by calling
    /// `elements()` again on the same handle.
    fn elements(&self) -> AccessResult<Elements<'_>>
    where
        Self: Sized,
    {
        let count = self.element_count()?;
        Ok(Elements {
            value: self,
            index: 0,
            count,
        })
    }
}

impl<'v> dyn ValueAccess + 'v {
    /// Lazy element iteration through a trait object.
    pub fn iter_elements(&self) -> AccessResult<Elements<'_>> {
        let count = self.element_count()?;
        Ok(Elements {
            value: self,
            index: 0,
            count,
        })
    }
}

/// Iterator over a container value's elements. Each step can fail
/// independently; a failed element yields `Err` without ending the sequence.
pub struct Elements<'a> {
    value: &'a dyn ValueAccess,
    index: usize,
    count: usize,
}

impl Iterator for Elements<'_> {
    type Item = AccessResult<ValueHandle>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.count {
            return None;
        }
        let item = self.value.element(self.index);
        self.index += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.count - self.index;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Elements<'_> {}
