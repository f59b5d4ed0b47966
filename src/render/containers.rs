//! Container and leaf renderers: tuple/array/multi_index/thread_buffer,
//! type-level sequences and constants, and the guaranteed fallback.

use super::{indent_block, Renderer, RenderContext};
use crate::extract::{extract_int, sequence_values};
use crate::parse::TypeNode;
use crate::value::ValueAccess;
use std::fmt::Write;

/// Indexed-element renderer shared by every tuple-shaped container.
///
/// Zero-element containers render an explicit empty form, which must stay
/// distinct from the unavailable form: an empty tuple is real data, an
/// unavailable one is missing data.
pub struct ContainerRenderer;

impl Renderer for ContainerRenderer {
    fn render(&self, value: &dyn ValueAccess, ty: &TypeNode, ctx: &RenderContext<'_>) -> String {
        let base = ty.base_name();
        let count = match value.element_count() {
            Ok(count) => count,
            Err(failure) => return format!("{base}{{<unavailable: {failure}>}}"),
        };
        if count == 0 {
            return format!("{base}<empty>{{}}");
        }

        let mut out = format!("{base}<{count} elements>{{\n");
        let pad = " ".repeat(ctx.config.indent_width);
        let shown = count.min(ctx.config.max_elements);
        match value.iter_elements() {
            Ok(iter) => {
                for (i, element) in iter.enumerate().take(shown) {
                    let body = match element {
                        Ok(handle) => ctx.render_value(handle.as_ref()),
                        Err(failure) => format!("<unavailable: {failure}>"),
                    };
                    let _ = writeln!(
                        out,
                        "{pad}[{i}]: {}",
                        indent_block(&body, ctx.config.indent_width)
                    );
                }
            }
            Err(failure) => {
                let _ = writeln!(out, "{pad}<unavailable: {failure}>");
            }
        }
        if shown < count {
            let _ = writeln!(out, "{pad}... ({} more elements)", count - shown);
        }
        out.push('}');
        out
    }
}

/// `sequence<...>` values live entirely in the type; render the integers.
pub struct SequenceRenderer;

impl Renderer for SequenceRenderer {
    fn render(&self, _value: &dyn ValueAccess, ty: &TypeNode, _ctx: &RenderContext<'_>) -> String {
        super::fmt_ids(&sequence_values(ty))
    }
}

/// `constant<N>` values also live entirely in the type.
pub struct ConstantRenderer;

impl Renderer for ConstantRenderer {
    fn render(&self, value: &dyn ValueAccess, ty: &TypeNode, ctx: &RenderContext<'_>) -> String {
        if let Some(v) = ty.args.first().and_then(TypeNode::as_int_literal) {
            return v.to_string();
        }
        match extract_int(value, ctx.config) {
            Some(v) => v.to_string(),
            None => format!("{}<?>", ty.base_name()),
        }
    }
}

/// The guaranteed last resort: never fails, prints whatever can be read.
/// Integers print their value, enumerable values print as containers, and
/// anything else prints its type so the user at least sees what it was.
pub struct FallbackRenderer;

impl Renderer for FallbackRenderer {
    fn render(&self, value: &dyn ValueAccess, ty: &TypeNode, ctx: &RenderContext<'_>) -> String {
        if let Some(v) = extract_int(value, ctx.config) {
            return v.to_string();
        }
        if value.element_count().is_ok() {
            return ContainerRenderer.render(value, ty, ctx);
        }
        ty.to_string()
    }
}
