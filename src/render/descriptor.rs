//! Descriptor and adaptor renderers
//!
//! Field order is fixed so output stays diff-stable across runs: element
//! space size, transform count, hidden/top/bottom dimension counts, bottom
//! ids, top ids, then the transform list in storage order.

use super::{fmt_ids, Renderer, RenderContext};
use crate::extract::{extract_adaptor, extract_descriptor};
use crate::model::{Descriptor, Transform};
use crate::parse::TypeNode;
use crate::value::ValueAccess;
use std::fmt::Write;

pub struct DescriptorRenderer;

impl Renderer for DescriptorRenderer {
    fn render(&self, value: &dyn ValueAccess, ty: &TypeNode, ctx: &RenderContext<'_>) -> String {
        let desc = extract_descriptor(value, ty, ctx.config);
        render_descriptor_block(&desc, "tensor_descriptor", true, ctx)
    }
}

pub struct AdaptorRenderer;

impl Renderer for AdaptorRenderer {
    fn render(&self, value: &dyn ValueAccess, ty: &TypeNode, ctx: &RenderContext<'_>) -> String {
        let desc = extract_adaptor(value, ty, ctx.config);
        render_descriptor_block(&desc, "tensor_adaptor", false, ctx)
    }
}

/// Shared block layout for descriptor-shaped models. Also used by the
/// tile-distribution renderer for its nested adaptor/descriptor members.
pub(crate) fn render_descriptor_block(
    desc: &Descriptor,
    header: &str,
    with_element_space: bool,
    ctx: &RenderContext<'_>,
) -> String {
    // Nothing readable at all: the object is likely not yet constructed.
    if desc.element_space_size.is_none()
        && desc.ntransform.is_none()
        && desc.ndim_hidden.is_none()
        && desc.transforms.is_empty()
    {
        return format!("{header}{{[UNINITIALIZED]}}");
    }

    let pad = " ".repeat(ctx.config.indent_width);
    let mut out = format!("{header}{{\n");

    if with_element_space {
        if let Some(v) = desc.element_space_size {
            let _ = writeln!(out, "{pad}element_space_size: {v}");
        }
    }
    let ntransform = desc.ntransform.unwrap_or(desc.transforms.len() as i64);
    let _ = writeln!(out, "{pad}ntransform: {ntransform}");
    if let Some(v) = desc.ndim_hidden {
        let _ = writeln!(out, "{pad}ndim_hidden: {v}");
    }
    if let Some(v) = desc.ndim_top {
        let _ = writeln!(out, "{pad}ndim_top: {v}");
    }
    if let Some(v) = desc.ndim_bottom {
        let _ = writeln!(out, "{pad}ndim_bottom: {v}");
    }
    if let Some(ids) = &desc.bottom_dimension_ids {
        let _ = writeln!(out, "{pad}bottom_dimension_ids: {}", fmt_ids(ids));
    }
    if let Some(ids) = &desc.top_dimension_ids {
        let _ = writeln!(out, "{pad}top_dimension_ids: {}", fmt_ids(ids));
    }

    if !desc.transforms.is_empty() {
        let _ = writeln!(out, "\n{pad}Transforms:");
        for (i, transform) in desc.transforms.iter().enumerate() {
            render_transform(&mut out, i, transform, ctx.config.indent_width);
        }
    }

    out.push('}');
    out
}

fn render_transform(out: &mut String, index: usize, t: &Transform, indent: usize) {
    let head = " ".repeat(indent * 2);
    let body = " ".repeat(indent * 4);
    let _ = writeln!(out, "{head}[{index}] {}", t.kind.label());
    if !t.lower_dims.is_empty() {
        let _ = writeln!(out, "{body}lower: {}", fmt_ids(&t.lower_dims));
    }
    if !t.upper_dims.is_empty() {
        let _ = writeln!(out, "{body}upper: {}", fmt_ids(&t.upper_dims));
    }
    if let Some(v) = &t.up_lengths {
        let _ = writeln!(out, "{body}up_lengths: {}", fmt_ids(v));
    }
    if let Some(v) = &t.low_lengths {
        let _ = writeln!(out, "{body}low_lengths: {}", fmt_ids(v));
    }
    if let Some(v) = &t.coefficients {
        let _ = writeln!(out, "{body}coefficients: {}", fmt_ids(v));
    }
    if let Some(v) = t.left_pad_length {
        let _ = writeln!(out, "{body}left_pad_length: {v}");
    }
    if let Some(v) = t.right_pad_length {
        let _ = writeln!(out, "{body}right_pad_length: {v}");
    }
}
