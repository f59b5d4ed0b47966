//! Coordinate extraction
//!
//! `tensor_adaptor_coordinate<NDimHidden, BottomIds, TopIds>` carries its
//! dimension wiring in the type; the live object holds only the hidden index
//! array (`idx_hidden_`, a multi_index whose storage is the `data` member).
//! `tensor_coordinate<NDimHidden, TopIds>` is the same with bottom fixed to
//! `[0]`.

use super::extract_int;
use crate::config::InspectConfig;
use crate::model::Coordinate;
use crate::parse::TypeNode;
use crate::value::ValueAccess;

/// Hidden-index elements read past NDimHidden when the count is unknown
const DEFAULT_INDEX_CAP: usize = 20;

/// Extract a [`Coordinate`] from a live coordinate value.
pub fn extract_coordinate(
    value: &dyn ValueAccess,
    ty: &TypeNode,
    config: &InspectConfig,
) -> Coordinate {
    let (node, tensor_flavor) = match ty.find("tensor_adaptor_coordinate") {
        Some(node) => (node, false),
        None => (ty.find("tensor_coordinate").unwrap_or(ty), true),
    };

    let mut coord = Coordinate {
        ndim_hidden: node.args.first().and_then(TypeNode::as_int_literal),
        ..Coordinate::default()
    };

    let sequences: Vec<&TypeNode> = node
        .args
        .iter()
        .filter(|a| a.base_name() == "sequence")
        .collect();
    if tensor_flavor {
        // tensor_coordinate inherits bottom sequence<0> from its base
        coord.bottom_dimension_ids = vec![0];
        if let Some(top) = sequences.last() {
            coord.top_dimension_ids = super::sequence_values(top);
        }
    } else if sequences.len() >= 2 {
        coord.bottom_dimension_ids = super::sequence_values(sequences[sequences.len() - 2]);
        coord.top_dimension_ids = super::sequence_values(sequences[sequences.len() - 1]);
    }

    coord.hidden_index = hidden_index(value, coord.ndim_hidden, config);

    coord
}

/// The hidden index values, read from `idx_hidden_.data` or directly from
/// `idx_hidden_` when the array is not wrapped.
fn hidden_index(
    value: &dyn ValueAccess,
    ndim_hidden: Option<i64>,
    config: &InspectConfig,
) -> Vec<i64> {
    let cap = ndim_hidden
        .and_then(|n| usize::try_from(n).ok())
        .filter(|&n| n > 0)
        .unwrap_or(DEFAULT_INDEX_CAP)
        .min(config.max_elements);

    let idx = match value.field("idx_hidden_") {
        Ok(idx) => idx,
        Err(failure) => {
            tracing::debug!(%failure, "idx_hidden_ inaccessible");
            return Vec::new();
        }
    };

    let storage = idx.field("data").unwrap_or(idx);

    let mut out = Vec::new();
    let Ok(iter) = storage.iter_elements() else {
        return out;
    };
    for element in iter.take(cap) {
        match element.ok().and_then(|e| extract_int(e.as_ref(), config)) {
            Some(v) => out.push(v),
            // Stop at the first unreadable slot: trailing array storage past
            // NDimHidden is routinely garbage.
            None => break,
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_type;
    use crate::value::mock::MockValue;

    const ADAPTOR_COORD: &str = "ck_tile::tensor_adaptor_coordinate<\
        5, ck_tile::sequence<0>, ck_tile::sequence<3, 4>>";

    fn index_value(values: &[i64]) -> MockValue {
        MockValue::opaque("ck_tile::multi_index<5>").with_field(
            "data",
            MockValue::container(
                "ck_tile::array<long, 5>",
                values.iter().map(|&v| MockValue::int("long", v)).collect(),
            ),
        )
    }

    #[test]
    fn test_adaptor_coordinate() {
        let config = InspectConfig::default();
        let ty = parse_type(ADAPTOR_COORD).unwrap();
        let value = MockValue::opaque(ADAPTOR_COORD)
            .with_field("idx_hidden_", index_value(&[7, 0, 0, 2, 9]));

        let coord = extract_coordinate(&value, &ty.root, &config);
        assert_eq!(coord.ndim_hidden, Some(5));
        assert_eq!(coord.bottom_dimension_ids, vec![0]);
        assert_eq!(coord.top_dimension_ids, vec![3, 4]);
        assert_eq!(coord.hidden_index, vec![7, 0, 0, 2, 9]);
        assert_eq!(coord.top_index(), vec![2, 9]);
        assert_eq!(coord.bottom_index(), vec![7]);
    }

    #[test]
    fn test_tensor_coordinate_has_implicit_bottom() {
        let config = InspectConfig::default();
        let sig = "ck_tile::tensor_coordinate<3, ck_tile::sequence<1, 2>>";
        let ty = parse_type(sig).unwrap();
        let value = MockValue::opaque(sig).with_field("idx_hidden_", index_value(&[4, 5, 6]));

        let coord = extract_coordinate(&value, &ty.root, &config);
        assert_eq!(coord.ndim_hidden, Some(3));
        assert_eq!(coord.bottom_dimension_ids, vec![0]);
        assert_eq!(coord.top_dimension_ids, vec![1, 2]);
        assert_eq!(coord.bottom_index(), vec![4]);
    }

    #[test]
    fn test_unwrapped_index_storage() {
        let config = InspectConfig::default();
        let ty = parse_type(ADAPTOR_COORD).unwrap();
        // idx_hidden_ is the array itself, no `data` member
        let value = MockValue::opaque(ADAPTOR_COORD).with_field(
            "idx_hidden_",
            MockValue::container(
                "ck_tile::array<long, 5>",
                vec![
                    MockValue::int("long", 1),
                    MockValue::int("long", 2),
                    MockValue::int("long", 3),
                    MockValue::int("long", 4),
                    MockValue::int("long", 5),
                ],
            ),
        );

        let coord = extract_coordinate(&value, &ty.root, &config);
        assert_eq!(coord.hidden_index, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_missing_index_is_empty_not_fatal() {
        let config = InspectConfig::default();
        let ty = parse_type(ADAPTOR_COORD).unwrap();
        let value = MockValue::opaque(ADAPTOR_COORD);

        let coord = extract_coordinate(&value, &ty.root, &config);
        assert!(coord.hidden_index.is_empty());
        // Dimension wiring still recovered from the type
        assert_eq!(coord.top_dimension_ids, vec![3, 4]);
    }
}
