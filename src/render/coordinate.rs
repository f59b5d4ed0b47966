//! Coordinate renderers
//!
//! Both flavors print the raw hidden index first, then the dimension-id
//! wiring, then the projected indices, so a user can check the projection by
//! eye against the raw data.

use super::{fmt_ids, Renderer, RenderContext};
use crate::extract::extract_coordinate;
use crate::parse::TypeNode;
use crate::value::ValueAccess;
use std::fmt::Write;

pub struct AdaptorCoordinateRenderer;

impl Renderer for AdaptorCoordinateRenderer {
    fn render(&self, value: &dyn ValueAccess, ty: &TypeNode, ctx: &RenderContext<'_>) -> String {
        let coord = extract_coordinate(value, ty, ctx.config);
        let pad = " ".repeat(ctx.config.indent_width);
        let mut out = String::from("tensor_adaptor_coordinate{\n");

        if !coord.hidden_index.is_empty() {
            let _ = writeln!(out, "{pad}idx_hidden_ (data): {}", fmt_ids(&coord.hidden_index));
        }
        let _ = writeln!(
            out,
            "{pad}bottom_dimension_ids: {}",
            fmt_ids(&coord.bottom_dimension_ids)
        );
        let _ = writeln!(
            out,
            "{pad}top_dimension_ids: {}",
            fmt_ids(&coord.top_dimension_ids)
        );
        if !coord.hidden_index.is_empty() {
            let _ = writeln!(out, "{pad}top_index: {}", fmt_ids(&coord.top_index()));
            let _ = writeln!(out, "{pad}bottom_index: {}", fmt_ids(&coord.bottom_index()));
        }

        out.push('}');
        out
    }
}

pub struct TensorCoordinateRenderer;

impl Renderer for TensorCoordinateRenderer {
    fn render(&self, value: &dyn ValueAccess, ty: &TypeNode, ctx: &RenderContext<'_>) -> String {
        let coord = extract_coordinate(value, ty, ctx.config);
        let pad = " ".repeat(ctx.config.indent_width);
        let mut out = String::from("tensor_coordinate{\n");

        if !coord.hidden_index.is_empty() {
            let _ = writeln!(out, "{pad}idx_hidden_ (data): {}", fmt_ids(&coord.hidden_index));
        }
        let _ = writeln!(
            out,
            "{pad}bottom_dimension_ids: {}",
            fmt_ids(&coord.bottom_dimension_ids)
        );
        let _ = writeln!(
            out,
            "{pad}top_dimension_ids: {}",
            fmt_ids(&coord.top_dimension_ids)
        );
        if !coord.hidden_index.is_empty() {
            let _ = writeln!(out, "{pad}index (top): {}", fmt_ids(&coord.top_index()));
            // The bottom projection of a tensor coordinate is the linearized
            // storage offset.
            if let Some(offset) = coord.bottom_index().first() {
                let _ = writeln!(out, "{pad}offset (bottom[0]): {offset}");
            }
        }

        out.push('}');
        out
    }
}
