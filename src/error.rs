//! Error handling for the tilescope engine
//!
//! This module defines the error taxonomy used throughout the crate and a
//! Result alias. The split matters: a [`ParseError`] is the parser refusing a
//! signature outright, while an [`AccessFailure`] is a single field or element
//! of a live value being unreadable and is always recovered locally by the
//! enclosing renderer.

use thiserror::Error;

/// Unrecoverable failure while parsing a type signature.
///
/// Anything less severe (truncated arguments, stray tokens) is absorbed into a
/// best-effort tree with `complete: false` instead of an error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The input string was empty or all whitespace
    #[error("empty type signature")]
    Empty,

    /// Angle brackets could not be balanced
    #[error("unbalanced angle brackets in type signature at offset {offset}")]
    Unbalanced { offset: usize },
}

/// A specific field or element of a live value could not be read.
///
/// These are reported once, never retried; the caller substitutes a
/// placeholder token and keeps rendering the rest of the structure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AccessFailure {
    /// The value has no field with this name
    #[error("no field named `{field}`")]
    MissingField { field: String },

    /// The backing memory could not be read (detached target, stale pointer)
    #[error("value unavailable: {reason}")]
    Unavailable { reason: String },

    /// The compiler optimized this location away
    #[error("optimized out")]
    OptimizedOut,

    /// Element access on a value that is not a container
    #[error("not a container")]
    NotAContainer,

    /// Element index past the end of the container
    #[error("element index {index} out of bounds (len {len})")]
    OutOfBounds { index: usize, len: usize },

    /// Integer conversion on a non-integer value
    #[error("not an integer value")]
    NotAnInteger,

    /// Dereference of a non-pointer value
    #[error("not a pointer")]
    NotAPointer,
}

impl AccessFailure {
    /// Create an `Unavailable` failure from any displayable reason
    pub fn unavailable(reason: impl Into<String>) -> Self {
        AccessFailure::Unavailable {
            reason: reason.into(),
        }
    }
}

/// Failure while building the printer dispatch table.
///
/// Both variants are construction-time programming errors: the table refuses
/// registrations that could silently shadow an existing entry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// The new pattern contains an earlier entry's pattern as a substring, so
    /// the earlier, more general entry would always match first
    #[error("pattern `{pattern}` is shadowed by earlier entry `{by}`")]
    Shadowed { pattern: String, by: String },

    /// The exact pattern is already registered
    #[error("pattern `{pattern}` registered twice")]
    Duplicate { pattern: String },
}

/// Umbrella error for tilescope operations
#[derive(Error, Debug)]
pub enum InspectError {
    /// Type signature parsing failed
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// A live value access failed
    #[error("access failure: {0}")]
    Access(#[from] AccessFailure),

    /// Dispatch table construction failed
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),
}

/// Result type alias for tilescope operations
pub type Result<T> = std::result::Result<T, InspectError>;

/// Result type alias for value accessors
pub type AccessResult<T> = std::result::Result<T, AccessFailure>;
