//! Structural extraction of domain models from live values
//!
//! The extractors combine two information sources, the way the underlying
//! library forces: compile-time structure (transform kinds, dimension-id
//! sequences, `constant<N>` parameters) lives in the type signature, while
//! runtime parameters (`up_lengths_`, `coefficients_`, index arrays) live in
//! the value's fields. Either source can be partially missing; extraction
//! degrades per field and never aborts a sibling.

pub mod coordinate;
pub mod descriptor;
pub mod encoding;

pub use coordinate::extract_coordinate;
pub use descriptor::{extract_adaptor, extract_descriptor};
pub use encoding::extract_encoding;

use crate::config::InspectConfig;
use crate::parse::{parse_type, TypeNode};
use crate::value::{ValueAccess, ValueHandle};

/// An element pulled out of a tile-library tuple: either a compile-time or
/// runtime integer, or a nested value too complex to flatten.
pub enum TupleElement {
    Int(i64),
    Value(ValueHandle),
}

/// Read an integer out of a live value, trying the sources in the order the
/// library makes them appear:
///
/// 1. a `constant<N>` in the value's type (compile-time parameter),
/// 2. the value itself as an integer,
/// 3. the `value` member (wrapped integer types).
///
/// Integers with magnitude above `config.int_sanity_limit` are treated as
/// uninitialized memory and reported as `None`.
pub fn extract_int(value: &dyn ValueAccess, config: &InspectConfig) -> Option<i64> {
    if let Some(v) = constant_from_type(&value.type_string()) {
        return sanity_check(v, config);
    }
    if let Ok(v) = value.as_int() {
        return sanity_check(v, config);
    }
    if let Ok(inner) = value.field("value") {
        if let Ok(v) = inner.as_int() {
            return sanity_check(v, config);
        }
    }
    None
}

/// Read an integer field, tolerating a missing or unreadable field
pub fn extract_int_field(
    value: &dyn ValueAccess,
    name: &str,
    config: &InspectConfig,
) -> Option<i64> {
    let field = value.field(name).ok()?;
    extract_int(field.as_ref(), config)
}

/// The `N` of a `constant<N>` type signature, if that is what this is
fn constant_from_type(type_str: &str) -> Option<i64> {
    if !type_str.contains("constant<") {
        return None;
    }
    let parsed = parse_type(type_str).ok()?;
    let node = parsed.root.find("constant")?;
    node.args.first()?.as_int_literal()
}

fn sanity_check(v: i64, config: &InspectConfig) -> Option<i64> {
    if v.checked_abs()? > config.int_sanity_limit {
        None
    } else {
        Some(v)
    }
}

/// Extract all elements of a tile-library tuple.
///
/// Elements whose type is `constant<N>` are resolved from the type alone
/// (they occupy no storage); runtime integers are read through the adapter;
/// anything else is kept as a nested handle. Inaccessible elements are
/// skipped with a debug event rather than aborting the walk.
pub fn extract_tuple_elements(
    value: &dyn ValueAccess,
    config: &InspectConfig,
) -> Vec<TupleElement> {
    let mut out = Vec::new();
    let iter = match value.iter_elements() {
        Ok(iter) => iter,
        Err(failure) => {
            tracing::debug!(%failure, "tuple elements inaccessible");
            return type_level_elements(value, config);
        }
    };
    for (index, element) in iter.enumerate() {
        if out.len() >= config.max_elements {
            break;
        }
        match element {
            Ok(handle) => match extract_int(handle.as_ref(), config) {
                Some(v) => out.push(TupleElement::Int(v)),
                None => out.push(TupleElement::Value(handle)),
            },
            Err(failure) => {
                tracing::debug!(index, %failure, "tuple element inaccessible");
            }
        }
    }
    out
}

/// Fallback when the live tuple has no enumerable elements: recover the
/// compile-time `constant<N>` elements from the tuple's own type arguments.
fn type_level_elements(value: &dyn ValueAccess, config: &InspectConfig) -> Vec<TupleElement> {
    let Ok(parsed) = parse_type(&value.type_string()) else {
        return Vec::new();
    };
    let Some(tuple) = parsed.root.find("tuple") else {
        return Vec::new();
    };
    tuple
        .args
        .iter()
        .filter_map(|arg| {
            let constant = arg.find("constant")?;
            let v = constant.args.first()?.as_int_literal()?;
            sanity_check(v, config).map(TupleElement::Int)
        })
        .collect()
}

/// Extract a list of integers from a tuple/array field. `None` when the list
/// is empty or unreadable — callers render nothing rather than `[]` for
/// parameters the transform does not carry.
pub fn extract_int_list(value: &dyn ValueAccess, config: &InspectConfig) -> Option<Vec<i64>> {
    let ints: Vec<i64> = extract_tuple_elements(value, config)
        .into_iter()
        .filter_map(|e| match e {
            TupleElement::Int(v) => Some(v),
            TupleElement::Value(_) => None,
        })
        .collect();
    if ints.is_empty() {
        None
    } else {
        Some(ints)
    }
}

/// Integer values of a `sequence<...>` type node. Empty sequences are valid
/// and distinct from absent ones.
pub fn sequence_values(node: &TypeNode) -> Vec<i64> {
    node.args
        .iter()
        .filter_map(TypeNode::as_int_literal)
        .collect()
}
