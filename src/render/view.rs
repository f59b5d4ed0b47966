//! Tensor view renderer
//!
//! A view pairs a descriptor with a buffer; the interesting parts are the
//! element data type, the nested descriptor block, and which address space
//! the buffer lives in.

use super::{data_type_label, indent_block, Renderer, RenderContext};
use crate::parse::TypeNode;
use crate::value::ValueAccess;
use std::fmt::Write;

pub struct TensorViewRenderer;

impl Renderer for TensorViewRenderer {
    fn render(&self, value: &dyn ValueAccess, _ty: &TypeNode, ctx: &RenderContext<'_>) -> String {
        let type_str = value.type_string();
        let pad = " ".repeat(ctx.config.indent_width);
        let mut out = String::from("tensor_view{\n");

        if let Some(label) = data_type_label(&type_str) {
            let _ = writeln!(out, "{pad}data_type: {label}");
        }
        if type_str.contains("const ") {
            let _ = writeln!(out, "{pad}const: true");
        }

        match value.field("desc_") {
            Ok(desc) => {
                let block = ctx.render_value(desc.as_ref());
                let _ = writeln!(
                    out,
                    "\n{pad}descriptor: {}",
                    indent_block(&block, ctx.config.indent_width)
                );
            }
            Err(failure) => {
                let _ = writeln!(out, "\n{pad}descriptor: <unavailable: {failure}>");
            }
        }

        if let Ok(buf) = value.field("buf_view_") {
            let buf_type = buf.type_string();
            if buf_type.contains("buffer_view") {
                let _ = writeln!(out, "\n{pad}buffer_view: {{");
                if let Some(space) = address_space(&buf_type) {
                    let _ = writeln!(out, "{pad}{pad}address_space: {space}");
                }
                let _ = writeln!(out, "{pad}}}");
            }
        }

        out.push('}');
        out
    }
}

/// The buffer's address space, read from the casted enum constant in its
/// type string.
fn address_space(buf_type: &str) -> Option<&'static str> {
    if buf_type.contains("address_space_enum)1") {
        Some("global")
    } else if buf_type.contains("address_space_enum)3") {
        Some("lds")
    } else if buf_type.contains("address_space_enum)2") {
        Some("vgpr")
    } else {
        None
    }
}
