//! Descriptor and adaptor extraction
//!
//! A `tensor_descriptor<Transforms, LowerIdss, UpperIdss, TopIds, ...>` keeps
//! its transform chain and dimension-id wiring in the type signature; only
//! the per-transform runtime parameters (`up_lengths_`, `coefficients_`, ...)
//! live in the object. A `tensor_adaptor` is the same shape with explicit
//! bottom and top id sequences instead of the implicit bottom `[0]`.

use super::{extract_int_field, extract_int_list, sequence_values};
use crate::config::InspectConfig;
use crate::model::{Descriptor, Transform, TransformKind};
use crate::parse::TypeNode;
use crate::value::{ValueAccess, ValueHandle};

/// Extract a [`Descriptor`] from a live `tensor_descriptor` value.
pub fn extract_descriptor(
    value: &dyn ValueAccess,
    ty: &TypeNode,
    config: &InspectConfig,
) -> Descriptor {
    let node = ty.find("tensor_descriptor").unwrap_or(ty);

    let mut desc = extract_common(value, node, config);

    desc.element_space_size = extract_int_field(value, "element_space_size_", config)
        .or_else(|| element_space_size_from_type(node, config));

    // Bottom ids are implicit for descriptors; the top ids are the first
    // sequence after the three transform tuples.
    let trailing = trailing_sequences(node);
    desc.bottom_dimension_ids = Some(vec![0]);
    desc.top_dimension_ids = trailing.first().map(|top| sequence_values(top));

    desc
}

/// Extract a [`Descriptor`] from a live `tensor_adaptor` value.
pub fn extract_adaptor(
    value: &dyn ValueAccess,
    ty: &TypeNode,
    config: &InspectConfig,
) -> Descriptor {
    let node = ty.find("tensor_adaptor").unwrap_or(ty);

    let mut desc = extract_common(value, node, config);

    // Adaptors spell out both id sequences after the three tuples.
    let trailing = trailing_sequences(node);
    desc.bottom_dimension_ids = trailing.first().map(|bottom| sequence_values(bottom));
    desc.top_dimension_ids = trailing.get(1).map(|top| sequence_values(top));

    desc
}

/// The parts shared by descriptors and adaptors: count fields and the
/// transform chain.
fn extract_common(value: &dyn ValueAccess, node: &TypeNode, config: &InspectConfig) -> Descriptor {
    let mut desc = Descriptor {
        ntransform: extract_int_field(value, "ntransform_", config),
        ndim_hidden: extract_int_field(value, "ndim_hidden_", config),
        ndim_top: extract_int_field(value, "ndim_top_", config),
        ndim_bottom: extract_int_field(value, "ndim_bottom_", config),
        ..Descriptor::default()
    };

    let (kinds, lower, upper) = transform_chain(node);
    let live = live_transform_handles(value, kinds.len());

    if let Some(n) = desc.ntransform {
        if n >= 0 && n as usize != kinds.len() {
            tracing::debug!(
                ntransform = n,
                from_type = kinds.len(),
                "transform count mismatch between live field and type"
            );
        }
    }

    for (i, kind) in kinds.iter().enumerate() {
        let mut t = Transform::new(*kind);
        t.lower_dims = lower.get(i).cloned().unwrap_or_default();
        t.upper_dims = upper.get(i).cloned().unwrap_or_default();

        if shape_inconsistent(&t, lower.get(i).is_some() && upper.get(i).is_some()) {
            tracing::debug!(
                index = i,
                kind = t.kind.label(),
                lower = t.lower_dims.len(),
                upper = t.upper_dims.len(),
                "transform shape does not match its kind, substituting placeholder"
            );
            desc.transforms.push(Transform::placeholder());
            continue;
        }

        if let Some(Some(handle)) = live.get(i) {
            apply_live_params(&mut t, handle.as_ref(), config);
        }
        desc.transforms.push(t);
    }

    desc
}

/// The three leading tuples of a descriptor-like type: transform types,
/// lower dimension-id sequences, upper dimension-id sequences.
fn transform_chain(node: &TypeNode) -> (Vec<TransformKind>, Vec<Vec<i64>>, Vec<Vec<i64>>) {
    let tuples: Vec<&TypeNode> = node
        .args
        .iter()
        .filter(|a| a.base_name() == "tuple")
        .take(3)
        .collect();

    let kinds = tuples
        .first()
        .map(|t| {
            t.args
                .iter()
                .map(|a| TransformKind::from_type_name(a.base_name()))
                .collect()
        })
        .unwrap_or_default();
    let lower = tuples
        .get(1)
        .map(|t| t.args.iter().map(sequence_values).collect())
        .unwrap_or_default();
    let upper = tuples
        .get(2)
        .map(|t| t.args.iter().map(sequence_values).collect())
        .unwrap_or_default();

    (kinds, lower, upper)
}

/// `sequence<...>` arguments appearing after the three transform tuples.
fn trailing_sequences(node: &TypeNode) -> Vec<&TypeNode> {
    let mut tuples_seen = 0usize;
    let mut out = Vec::new();
    for arg in &node.args {
        if arg.base_name() == "tuple" && tuples_seen < 3 {
            tuples_seen += 1;
            continue;
        }
        if tuples_seen >= 3 && arg.base_name() == "sequence" {
            out.push(arg);
        }
    }
    out
}

/// Fallback for the element space size: the first `constant<N>` argument of
/// the descriptor type, used when the live field is gone.
fn element_space_size_from_type(node: &TypeNode, config: &InspectConfig) -> Option<i64> {
    let constant = node.args.iter().find(|a| a.base_name() == "constant")?;
    let v = constant.args.first()?.as_int_literal()?;
    if v.checked_abs()? > config.int_sanity_limit {
        None
    } else {
        Some(v)
    }
}

/// Handles for the `transforms_` tuple elements, index-aligned with the
/// type-level chain. A missing tuple or element leaves `None` at that index;
/// the type-level information still renders.
fn live_transform_handles(value: &dyn ValueAccess, count: usize) -> Vec<Option<ValueHandle>> {
    let mut out: Vec<Option<ValueHandle>> = Vec::new();
    out.resize_with(count, || None);

    let tuple = match value.field("transforms_") {
        Ok(tuple) => tuple,
        Err(failure) => {
            tracing::debug!(%failure, "transforms_ field inaccessible");
            return out;
        }
    };
    let iter = match tuple.iter_elements() {
        Ok(iter) => iter,
        Err(failure) => {
            tracing::debug!(%failure, "transforms_ elements inaccessible");
            return out;
        }
    };
    for (i, element) in iter.enumerate().take(count) {
        match element {
            Ok(handle) => out[i] = Some(handle),
            Err(failure) => {
                tracing::debug!(index = i, %failure, "transform element inaccessible");
            }
        }
    }
    out
}

/// Kind-dependent runtime parameters read off one transform object. Each
/// read is independent; a missing field just leaves the parameter out.
fn apply_live_params(t: &mut Transform, handle: &dyn ValueAccess, config: &InspectConfig) {
    if let Ok(f) = handle.field("up_lengths_") {
        t.up_lengths = extract_int_list(f.as_ref(), config);
    }
    if let Ok(f) = handle.field("low_lengths_") {
        t.low_lengths = extract_int_list(f.as_ref(), config);
    }
    if let Ok(f) = handle.field("coefficients_") {
        t.coefficients = extract_int_list(f.as_ref(), config);
    }
    if matches!(
        t.kind,
        TransformKind::Pad | TransformKind::LeftPad | TransformKind::RightPad
    ) {
        t.left_pad_length = extract_int_field(handle, "left_pad_length_", config);
        t.right_pad_length = extract_int_field(handle, "right_pad_length_", config);
    }
}

/// Dimension-arity invariants that can only be checked once the id lists were
/// actually recovered from the type: pass-through is one-to-one, replicate
/// has no lower ids.
fn shape_inconsistent(t: &Transform, dims_present: bool) -> bool {
    if !dims_present {
        return false;
    }
    match t.kind {
        TransformKind::PassThrough => t.lower_dims.len() != 1 || t.upper_dims.len() != 1,
        TransformKind::Replicate => !t.lower_dims.is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_type;
    use crate::value::mock::MockValue;

    const DESC_TYPE: &str = "ck_tile::tensor_descriptor<\
        ck_tile::tuple<ck_tile::embed<ck_tile::tuple<int, int>, ck_tile::tuple<int, int>>, \
                       ck_tile::pass_through<int>>, \
        ck_tile::tuple<ck_tile::sequence<0>, ck_tile::sequence<1>>, \
        ck_tile::tuple<ck_tile::sequence<1, 2>, ck_tile::sequence<3>>, \
        ck_tile::sequence<3, 4>, \
        ck_tile::constant<8192l>>";

    fn descriptor_value() -> MockValue {
        let embed = MockValue::opaque("ck_tile::embed<...>")
            .with_field(
                "up_lengths_",
                MockValue::container(
                    "ck_tile::tuple<int, int>",
                    vec![MockValue::int("int", 64), MockValue::int("int", 16)],
                ),
            )
            .with_field(
                "coefficients_",
                MockValue::container(
                    "ck_tile::tuple<int, int>",
                    vec![MockValue::int("int", 16), MockValue::int("int", 1)],
                ),
            );
        let pass_through = MockValue::opaque("ck_tile::pass_through<int>");

        MockValue::opaque(DESC_TYPE)
            .with_field("element_space_size_", MockValue::int("long", 8192))
            .with_field("ntransform_", MockValue::int("int", 2))
            .with_field("ndim_hidden_", MockValue::int("int", 5))
            .with_field("ndim_top_", MockValue::int("int", 2))
            .with_field(
                "transforms_",
                MockValue::container("ck_tile::tuple<...>", vec![embed, pass_through]),
            )
    }

    #[test]
    fn test_full_descriptor() {
        let config = InspectConfig::default();
        let ty = parse_type(DESC_TYPE).unwrap();
        let value = descriptor_value();

        let desc = extract_descriptor(&value, &ty.root, &config);
        assert_eq!(desc.element_space_size, Some(8192));
        assert_eq!(desc.ntransform, Some(2));
        assert_eq!(desc.ndim_hidden, Some(5));
        assert_eq!(desc.ndim_top, Some(2));
        assert_eq!(desc.bottom_dimension_ids, Some(vec![0]));
        assert_eq!(desc.top_dimension_ids, Some(vec![3, 4]));

        assert_eq!(desc.transforms.len(), 2);
        let embed = &desc.transforms[0];
        assert_eq!(embed.kind, TransformKind::Embed);
        assert_eq!(embed.lower_dims, vec![0]);
        assert_eq!(embed.upper_dims, vec![1, 2]);
        assert_eq!(embed.up_lengths, Some(vec![64, 16]));
        assert_eq!(embed.coefficients, Some(vec![16, 1]));

        let pt = &desc.transforms[1];
        assert_eq!(pt.kind, TransformKind::PassThrough);
        assert_eq!(pt.lower_dims, vec![1]);
        assert_eq!(pt.upper_dims, vec![3]);
        assert_eq!(pt.up_lengths, None);
    }

    #[test]
    fn test_single_failing_field_leaves_siblings_intact() {
        let config = InspectConfig::default();
        let ty = parse_type(DESC_TYPE).unwrap();

        // ndim_hidden_ is optimized out; everything else reads fine
        let value = MockValue::opaque(DESC_TYPE)
            .with_field("ndim_hidden_", MockValue::unavailable("int", "optimized out"))
            .with_field("element_space_size_", MockValue::int("long", 8192))
            .with_field("ntransform_", MockValue::int("int", 2))
            .with_field("ndim_top_", MockValue::int("int", 2));

        let desc = extract_descriptor(&value, &ty.root, &config);
        assert_eq!(desc.ndim_hidden, None);
        assert_eq!(desc.element_space_size, Some(8192));
        assert_eq!(desc.ntransform, Some(2));
        assert_eq!(desc.top_dimension_ids, Some(vec![3, 4]));
        // Transform chain still recovered from the type alone
        assert_eq!(desc.transforms.len(), 2);
        assert_eq!(desc.transforms[0].kind, TransformKind::Embed);
    }

    #[test]
    fn test_missing_transforms_field_still_yields_chain() {
        let config = InspectConfig::default();
        let ty = parse_type(DESC_TYPE).unwrap();
        let value = MockValue::opaque(DESC_TYPE);

        let desc = extract_descriptor(&value, &ty.root, &config);
        assert_eq!(desc.transforms.len(), 2);
        assert_eq!(desc.transforms[0].kind, TransformKind::Embed);
        assert_eq!(desc.transforms[0].up_lengths, None);
        // Element space size recovered from the constant<> in the type
        assert_eq!(desc.element_space_size, Some(8192));
    }

    #[test]
    fn test_inconsistent_shape_becomes_placeholder() {
        let config = InspectConfig::default();
        // pass_through with two lower ids contradicts its one-to-one arity
        let bad = "ck_tile::tensor_descriptor<\
            ck_tile::tuple<ck_tile::pass_through<int>>, \
            ck_tile::tuple<ck_tile::sequence<0, 1>>, \
            ck_tile::tuple<ck_tile::sequence<2>>, \
            ck_tile::sequence<2>>";
        let ty = parse_type(bad).unwrap();
        let value = MockValue::opaque(bad);

        let desc = extract_descriptor(&value, &ty.root, &config);
        assert_eq!(desc.transforms.len(), 1);
        assert!(desc.transforms[0].is_placeholder());
    }

    #[test]
    fn test_adaptor_bottom_top_ids() {
        let config = InspectConfig::default();
        let adaptor = "ck_tile::tensor_adaptor<\
            ck_tile::tuple<ck_tile::replicate<ck_tile::tuple<int>>>, \
            ck_tile::tuple<ck_tile::sequence<>>, \
            ck_tile::tuple<ck_tile::sequence<1>>, \
            ck_tile::sequence<0>, \
            ck_tile::sequence<1>>";
        let ty = parse_type(adaptor).unwrap();
        let value = MockValue::opaque(adaptor);

        let desc = extract_adaptor(&value, &ty.root, &config);
        assert_eq!(desc.bottom_dimension_ids, Some(vec![0]));
        assert_eq!(desc.top_dimension_ids, Some(vec![1]));
        assert_eq!(desc.transforms.len(), 1);
        assert_eq!(desc.transforms[0].kind, TransformKind::Replicate);
        assert!(desc.transforms[0].lower_dims.is_empty());
        assert_eq!(desc.transforms[0].upper_dims, vec![1]);
    }

    #[test]
    fn test_pad_reads_pad_lengths() {
        let config = InspectConfig::default();
        let padded = "ck_tile::tensor_descriptor<\
            ck_tile::tuple<ck_tile::right_pad<int, int>>, \
            ck_tile::tuple<ck_tile::sequence<0>>, \
            ck_tile::tuple<ck_tile::sequence<1>>, \
            ck_tile::sequence<1>>";
        let ty = parse_type(padded).unwrap();
        let pad = MockValue::opaque("ck_tile::right_pad<int, int>")
            .with_field("right_pad_length_", MockValue::int("int", 3));
        let value = MockValue::opaque(padded).with_field(
            "transforms_",
            MockValue::container("ck_tile::tuple<...>", vec![pad]),
        );

        let desc = extract_descriptor(&value, &ty.root, &config);
        assert_eq!(desc.transforms[0].kind, TransformKind::RightPad);
        assert_eq!(desc.transforms[0].right_pad_length, Some(3));
        assert_eq!(desc.transforms[0].left_pad_length, None);
    }
}
