//! Tile distribution, encoding, window, and distributed-tensor renderers
//!
//! These are the composite entities: a tile window wraps a view and a
//! distribution, a distribution wraps an adaptor and a descriptor plus a
//! compile-time encoding. Nested members re-dispatch through the registry so
//! their blocks stay identical to standalone rendering.

use super::{data_type_label, fmt_ids, indent_block, Renderer, RenderContext};
use crate::extract::extract_encoding;
use crate::model::DistributionEncoding;
use crate::parse::TypeNode;
use crate::value::ValueAccess;
use std::fmt::Write;

pub struct TileDistributionRenderer;

impl Renderer for TileDistributionRenderer {
    fn render(&self, value: &dyn ValueAccess, ty: &TypeNode, ctx: &RenderContext<'_>) -> String {
        let pad = " ".repeat(ctx.config.indent_width);
        let mut out = String::from("tile_distribution{\n");

        if ty.find("tile_distribution_encoding").is_some() {
            let encoding = extract_encoding(ty);
            let block = render_encoding_info(&encoding, ctx.config.indent_width);
            let _ = writeln!(out, "{pad}encoding: {}", indent_block(&block, ctx.config.indent_width));
        }

        render_member(&mut out, value, "ps_ys_to_xs_", &pad, ctx);
        render_member(&mut out, value, "ys_to_d_", &pad, ctx);

        out.push('}');
        out
    }
}

fn render_member(
    out: &mut String,
    value: &dyn ValueAccess,
    name: &str,
    pad: &str,
    ctx: &RenderContext<'_>,
) {
    match value.field(name) {
        Ok(member) => {
            let block = ctx.render_value(member.as_ref());
            let _ = writeln!(
                out,
                "\n{pad}{name}: {}",
                indent_block(&block, ctx.config.indent_width)
            );
        }
        Err(failure) => {
            let _ = writeln!(out, "\n{pad}{name}: <unavailable: {failure}>");
        }
    }
}

/// The encoding summary block embedded in a tile_distribution: raw sequences
/// first, then the resolved P/Y mappings with their lengths.
fn render_encoding_info(encoding: &DistributionEncoding, indent: usize) -> String {
    let pad = " ".repeat(indent);
    let deep = " ".repeat(indent * 2);
    let deeper = " ".repeat(indent * 3);
    let mut out = String::from("{\n");

    let _ = writeln!(out, "{pad}RsLengths: {}", fmt_ids(&encoding.rs_lengths));
    let _ = writeln!(out, "{pad}HsLengthss: {}", fmt_idss(&encoding.hs_lengthss));
    let _ = writeln!(out, "{pad}Ps2RHssMajor: {}", fmt_idss(&encoding.ps_to_rhs_major));
    let _ = writeln!(out, "{pad}Ps2RHssMinor: {}", fmt_idss(&encoding.ps_to_rhs_minor));
    let _ = writeln!(out, "{pad}Ys2RHsMajor: {}", fmt_ids(&encoding.ys_to_rhs_major));
    let _ = writeln!(out, "{pad}Ys2RHsMinor: {}", fmt_ids(&encoding.ys_to_rhs_minor));

    if !encoding.ps_to_rhs_major.is_empty() {
        let _ = writeln!(out, "{pad}Ps mappings (with lengths):");
        for (p, (majors, minors)) in encoding
            .ps_to_rhs_major
            .iter()
            .zip(&encoding.ps_to_rhs_minor)
            .enumerate()
        {
            let _ = writeln!(out, "{deep}P[{p}]:");
            for (&major, &minor) in majors.iter().zip(minors) {
                let _ = writeln!(out, "{deeper}-> {}", rh_target(encoding, major, minor));
            }
        }
    }

    if !encoding.ys_to_rhs_major.is_empty() {
        let _ = writeln!(out, "{pad}Ys mappings (with lengths):");
        for (y, (&major, &minor)) in encoding
            .ys_to_rhs_major
            .iter()
            .zip(&encoding.ys_to_rhs_minor)
            .enumerate()
        {
            let _ = writeln!(out, "{deep}Y[{y}] -> {}", rh_target(encoding, major, minor));
        }
    }

    out.push('}');
    out
}

fn rh_target(encoding: &DistributionEncoding, major: i64, minor: i64) -> String {
    let name = if major == 0 {
        format!("R[{minor}]")
    } else {
        format!("H{}[{minor}]", major - 1)
    };
    match encoding.rh_length(major, minor) {
        Some(len) => format!("{name} (length={len})"),
        None => name,
    }
}

fn fmt_idss(lists: &[Vec<i64>]) -> String {
    let body: Vec<String> = lists.iter().map(|l| fmt_ids(l)).collect();
    format!("[{}]", body.join(", "))
}

/// Standalone `tile_distribution_encoding` renderer: full dump with the
/// derived dimension counts interleaved.
pub struct DistributionEncodingRenderer;

impl Renderer for DistributionEncodingRenderer {
    fn render(&self, _value: &dyn ValueAccess, ty: &TypeNode, ctx: &RenderContext<'_>) -> String {
        let encoding = extract_encoding(ty);
        let pad = " ".repeat(ctx.config.indent_width);
        let deep = " ".repeat(ctx.config.indent_width * 2);
        let mut out = String::from("tile_distribution_encoding{\n");

        let _ = writeln!(out, "{pad}RsLengths: {}", fmt_ids(&encoding.rs_lengths));
        let _ = writeln!(out, "{pad}NDimR: {}", encoding.ndim_r());

        let _ = writeln!(out, "{pad}HsLengthss: [");
        for (i, hs) in encoding.hs_lengthss.iter().enumerate() {
            let _ = writeln!(out, "{deep}[{i}]: {}", fmt_ids(hs));
        }
        let _ = writeln!(out, "{pad}]");
        let _ = writeln!(out, "{pad}NDimX: {}", encoding.ndim_x());

        let _ = writeln!(out, "{pad}Ps2RHssMajor: [");
        for (i, seq) in encoding.ps_to_rhs_major.iter().enumerate() {
            let _ = writeln!(out, "{deep}P[{i}] -> RH_major: {}", fmt_ids(seq));
        }
        let _ = writeln!(out, "{pad}]");
        let _ = writeln!(out, "{pad}Ps2RHssMinor: [");
        for (i, seq) in encoding.ps_to_rhs_minor.iter().enumerate() {
            let _ = writeln!(out, "{deep}P[{i}] -> RH_minor: {}", fmt_ids(seq));
        }
        let _ = writeln!(out, "{pad}]");
        let _ = writeln!(out, "{pad}NDimP: {}", encoding.ndim_p());

        let _ = writeln!(out, "{pad}Ys2RHsMajor: {}", fmt_ids(&encoding.ys_to_rhs_major));
        let _ = writeln!(out, "{pad}Ys2RHsMinor: {}", fmt_ids(&encoding.ys_to_rhs_minor));
        let _ = writeln!(out, "{pad}NDimY: {}", encoding.ndim_y());

        out.push('}');
        out
    }
}

/// Renderer shared by every tile_window flavor; the flavor name comes from
/// the matched type itself.
pub struct TileWindowRenderer;

impl Renderer for TileWindowRenderer {
    fn render(&self, value: &dyn ValueAccess, ty: &TypeNode, ctx: &RenderContext<'_>) -> String {
        let flavor = ty.base_name();
        let type_str = value.type_string();
        let pad = " ".repeat(ctx.config.indent_width);
        let mut out = format!("{flavor}{{\n");

        if let Some(label) = data_type_label(&type_str) {
            let _ = writeln!(out, "{pad}data_type: {label}");
        }

        let mut constants = Vec::new();
        collect_constants(ty, &mut constants);
        if constants.len() >= 2 {
            let _ = writeln!(out, "{pad}window_lengths: [{} x {}]", constants[0], constants[1]);
        }

        if flavor.contains("static_distribution") {
            render_member(&mut out, value, "tile_dstr_", &pad, ctx);
        }
        if value.field("bottom_tensor_view_").is_ok() {
            render_member(&mut out, value, "bottom_tensor_view_", &pad, ctx);
        }
        if value.field("pre_computed_coords_").is_ok() {
            let _ = writeln!(out, "\n{pad}pre_computed_coords_: present");
        }

        out.push('}');
        out
    }
}

/// Depth-first `constant<N>` collection across a type tree.
fn collect_constants(node: &TypeNode, out: &mut Vec<i64>) {
    if node.base_name() == "constant" {
        if let Some(v) = node.args.first().and_then(TypeNode::as_int_literal) {
            out.push(v);
        }
    }
    for arg in &node.args {
        collect_constants(arg, out);
    }
}

/// Per-thread slice of a distributed tensor: data type, shape, distribution
/// pattern, and the thread-local buffer size.
pub struct StaticDistributedTensorRenderer;

impl Renderer for StaticDistributedTensorRenderer {
    fn render(&self, value: &dyn ValueAccess, ty: &TypeNode, ctx: &RenderContext<'_>) -> String {
        let type_str = value.type_string();
        let pad = " ".repeat(ctx.config.indent_width);
        let mut out = String::from("static_distributed_tensor{\n");

        if let Some(label) = data_type_label(&type_str) {
            let _ = writeln!(out, "{pad}data_type: {label}");
        }

        let encoding = extract_encoding(ty);
        if let Some(shape) = encoding.hs_lengthss.first() {
            let _ = writeln!(out, "{pad}shape: {}", fmt_ids(shape));
        }

        if let Some(unmerge) = ty.find("unmerge") {
            let mut constants = Vec::new();
            collect_constants(unmerge, &mut constants);
            let _ = writeln!(out, "{pad}distribution: unmerged {}", fmt_ids(&constants));
        } else if ty.find("replicate").is_some() {
            let _ = writeln!(out, "{pad}distribution: replicated");
        } else if ty.find("merge").is_some() {
            let _ = writeln!(out, "{pad}distribution: merged");
        }

        if let Ok(buf) = value.field("thread_buf_") {
            if let Some(size) = thread_buffer_size(&buf.type_string()) {
                let _ = writeln!(out, "{pad}thread_buffer_size: {size}");
            }
        }

        out.push('}');
        out
    }
}

/// The `N` of `thread_buffer<T, N>`.
fn thread_buffer_size(type_str: &str) -> Option<i64> {
    let parsed = crate::parse::parse_type(type_str).ok()?;
    let node = parsed.root.find("thread_buffer")?;
    node.args.get(1)?.as_int_literal()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InspectConfig;
    use crate::render::PrinterRegistry;
    use crate::value::mock::MockValue;

    const ENCODING: &str = "ck_tile::tile_distribution_encoding<\
        ck_tile::sequence<1>, \
        ck_tile::tuple<ck_tile::sequence<4, 64>, ck_tile::sequence<4, 64>>, \
        ck_tile::tuple<ck_tile::sequence<1>, ck_tile::sequence<2>>, \
        ck_tile::tuple<ck_tile::sequence<1>, ck_tile::sequence<1>>, \
        ck_tile::sequence<1, 2>, \
        ck_tile::sequence<0, 0>>";

    fn render(value: &MockValue) -> String {
        let registry = PrinterRegistry::with_default_printers();
        let config = InspectConfig::default();
        RenderContext::new(&registry, &config).render_value(value)
    }

    fn adaptor_value() -> MockValue {
        MockValue::opaque(
            "ck_tile::tensor_adaptor<\
             ck_tile::tuple<ck_tile::replicate<ck_tile::tuple<int>>>, \
             ck_tile::tuple<ck_tile::sequence<>>, \
             ck_tile::tuple<ck_tile::sequence<1>>, \
             ck_tile::sequence<0>, \
             ck_tile::sequence<1>>",
        )
    }

    fn descriptor_value() -> MockValue {
        MockValue::opaque(
            "ck_tile::tensor_descriptor<\
             ck_tile::tuple<ck_tile::pass_through<int>>, \
             ck_tile::tuple<ck_tile::sequence<0>>, \
             ck_tile::tuple<ck_tile::sequence<1>>, \
             ck_tile::sequence<1>>",
        )
    }

    #[test]
    fn test_standalone_encoding() {
        let value = MockValue::opaque(ENCODING);
        let text = render(&value);
        assert!(text.starts_with("tile_distribution_encoding{"));
        assert!(text.contains("RsLengths: [1]"));
        assert!(text.contains("NDimR: 1"));
        assert!(text.contains("[0]: [4, 64]"));
        assert!(text.contains("NDimX: 2"));
        assert!(text.contains("P[0] -> RH_major: [1]"));
        assert!(text.contains("NDimP: 2"));
        assert!(text.contains("Ys2RHsMajor: [1, 2]"));
        assert!(text.contains("NDimY: 2"));
    }

    #[test]
    fn test_tile_distribution_composite() {
        let sig = format!("ck_tile::tile_distribution<{ENCODING}, void>");
        let value = MockValue::opaque(sig)
            .with_field("ps_ys_to_xs_", adaptor_value())
            .with_field("ys_to_d_", descriptor_value());

        let text = render(&value);
        assert!(text.starts_with("tile_distribution{"));
        assert!(text.contains("encoding: {"));
        assert!(text.contains("RsLengths: [1]"));
        assert!(text.contains("Ps mappings (with lengths):"));
        assert!(text.contains("-> H0[1] (length=64)"));
        assert!(text.contains("Y[0] -> H0[0] (length=4)"));
        assert!(text.contains("ps_ys_to_xs_: tensor_adaptor{"));
        assert!(text.contains("ys_to_d_: tensor_descriptor{"));
    }

    #[test]
    fn test_tile_distribution_missing_members() {
        let sig = format!("ck_tile::tile_distribution<{ENCODING}, void>");
        let value = MockValue::opaque(sig);
        let text = render(&value);
        assert!(text.contains("ps_ys_to_xs_: <unavailable:"));
        assert!(text.contains("ys_to_d_: <unavailable:"));
    }

    #[test]
    fn test_tile_window_static_distribution() {
        let sig = format!(
            "ck_tile::tile_window_with_static_distribution<\
             ck_tile::tensor_view<float*>, \
             ck_tile::tuple<ck_tile::constant<4>, ck_tile::constant<64>>, \
             ck_tile::tile_distribution<{ENCODING}, void>>"
        );
        let dstr = MockValue::opaque(format!("ck_tile::tile_distribution<{ENCODING}, void>"))
            .with_field("ps_ys_to_xs_", adaptor_value())
            .with_field("ys_to_d_", descriptor_value());
        let view = MockValue::opaque("ck_tile::tensor_view<float*>")
            .with_field("desc_", descriptor_value());
        let value = MockValue::opaque(sig)
            .with_field("tile_dstr_", dstr)
            .with_field("bottom_tensor_view_", view)
            .with_field("pre_computed_coords_", MockValue::opaque("ck_tile::tuple<...>"));

        let text = render(&value);
        assert!(text.starts_with("tile_window_with_static_distribution{"));
        assert!(text.contains("data_type: float"));
        assert!(text.contains("window_lengths: [4 x 64]"));
        assert!(text.contains("tile_dstr_: tile_distribution{"));
        assert!(text.contains("bottom_tensor_view_: tensor_view{"));
        assert!(text.contains("pre_computed_coords_: present"));
    }

    #[test]
    fn test_tile_window_static_lengths_flavor_name() {
        let sig = "ck_tile::tile_window_with_static_lengths<\
                   ck_tile::tensor_view<_Float16*>, \
                   ck_tile::tuple<ck_tile::constant<8>, ck_tile::constant<32>>>";
        let value = MockValue::opaque(sig);
        let text = render(&value);
        assert!(text.starts_with("tile_window_with_static_lengths{"));
        assert!(text.contains("data_type: float16"));
        assert!(text.contains("window_lengths: [8 x 32]"));
        // No distribution member on this flavor
        assert!(!text.contains("tile_dstr_"));
    }

    #[test]
    fn test_static_distributed_tensor() {
        let sig = format!(
            "ck_tile::static_distributed_tensor<_Float16, \
             ck_tile::tile_distribution<{ENCODING}, \
             ck_tile::unmerge<ck_tile::tuple<ck_tile::constant<64>, ck_tile::constant<16>>>>>"
        );
        let value = MockValue::opaque(sig).with_field(
            "thread_buf_",
            MockValue::opaque("ck_tile::thread_buffer<_Float16, 8>"),
        );

        let text = render(&value);
        assert!(text.starts_with("static_distributed_tensor{"));
        assert!(text.contains("data_type: float16"));
        assert!(text.contains("shape: [4, 64]"));
        assert!(text.contains("distribution: unmerged [64, 16]"));
        assert!(text.contains("thread_buffer_size: 8"));
    }

    #[test]
    fn test_replicated_distribution_label() {
        let sig = "ck_tile::static_distributed_tensor<float, \
                   ck_tile::tile_distribution<ck_tile::replicate<ck_tile::tuple<int>>>>";
        let value = MockValue::opaque(sig);
        let text = render(&value);
        assert!(text.contains("distribution: replicated"));
    }
}
