//! Renderers and the printer dispatch table
//!
//! A [`Renderer`] consumes an extracted model and produces an indented text
//! block. Container renderers recurse through the [`RenderContext`], which
//! re-resolves a renderer per element via the registry, so nesting works for
//! any combination the library composes. Rendering never fails: unreadable
//! pieces become placeholder tokens, unparseable types fall back to the
//! literal type string.

pub mod containers;
pub mod coordinate;
pub mod descriptor;
pub mod distribution;
pub mod registry;
pub mod view;

pub use registry::PrinterRegistry;

use crate::config::InspectConfig;
use crate::parse::{parse_type, TypeNode};
use crate::value::ValueAccess;

/// Consume an extracted model, produce indented structured text.
///
/// `ty` is the parsed type the registry matched on; implementations must not
/// retain `value` past the call.
pub trait Renderer: Send + Sync {
    fn render(&self, value: &dyn ValueAccess, ty: &TypeNode, ctx: &RenderContext<'_>) -> String;
}

/// Per-request rendering state: the dispatch table, limits, and the current
/// nesting depth.
pub struct RenderContext<'a> {
    pub registry: &'a PrinterRegistry,
    pub config: &'a InspectConfig,
    pub depth: usize,
}

impl<'a> RenderContext<'a> {
    pub fn new(registry: &'a PrinterRegistry, config: &'a InspectConfig) -> Self {
        Self {
            registry,
            config,
            depth: 0,
        }
    }

    fn deeper(&self) -> RenderContext<'a> {
        RenderContext {
            registry: self.registry,
            config: self.config,
            depth: self.depth + 1,
        }
    }

    /// Render a value by dispatching on its reported type. Always produces
    /// output: on a parse failure the literal type string is shown.
    pub fn render_value(&self, value: &dyn ValueAccess) -> String {
        if self.depth >= self.config.max_depth {
            return "<max nesting depth reached>".to_string();
        }
        let type_str = value.type_string();
        match parse_type(&type_str) {
            Ok(parsed) => {
                let renderer = self.registry.resolve(&parsed.root);
                renderer.render(value, &parsed.root, &self.deeper())
            }
            Err(err) => {
                tracing::debug!(%err, %type_str, "falling back to literal type display");
                if type_str.trim().is_empty() {
                    "<no type information>".to_string()
                } else {
                    type_str
                }
            }
        }
    }
}

/// Re-indent a nested block so it sits one level inside its parent: every
/// line after the first gets the extra prefix.
pub(crate) fn indent_block(block: &str, width: usize) -> String {
    let pad = " ".repeat(width);
    block.replace('\n', &format!("\n{pad}"))
}

/// `[1, 2, 3]` formatting for id and length lists
pub(crate) fn fmt_ids(ids: &[i64]) -> String {
    let body: Vec<String> = ids.iter().map(|v| v.to_string()).collect();
    format!("[{}]", body.join(", "))
}

/// Crude scalar data-type classification from a type string, matching the
/// library's shorthand names.
pub(crate) fn data_type_label(type_str: &str) -> Option<&'static str> {
    if type_str.contains("_Float16") {
        Some("float16")
    } else if type_str.contains("bf16") {
        Some("bfloat16")
    } else if type_str.contains("float") {
        Some("float")
    } else if type_str.contains("double") {
        Some("double")
    } else if type_str.contains("int") {
        Some("int")
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indent_block() {
        let block = "a{\n  b: 1\n}";
        assert_eq!(indent_block(block, 2), "a{\n    b: 1\n  }");
    }

    #[test]
    fn test_fmt_ids() {
        assert_eq!(fmt_ids(&[1, 2, 3]), "[1, 2, 3]");
        assert_eq!(fmt_ids(&[]), "[]");
    }

    #[test]
    fn test_data_type_label() {
        assert_eq!(data_type_label("tensor_view<_Float16*>"), Some("float16"));
        assert_eq!(data_type_label("tensor_view<float*>"), Some("float"));
        assert_eq!(data_type_label("tensor_view<double>"), Some("double"));
        assert_eq!(data_type_label("array<int, 4>"), Some("int"));
        assert_eq!(data_type_label("tuple<>"), None);
    }

    #[test]
    fn test_depth_limit() {
        use crate::value::mock::MockValue;

        let registry = PrinterRegistry::with_default_printers();
        let config = InspectConfig::default();
        let ctx = RenderContext {
            registry: &registry,
            config: &config,
            depth: config.max_depth,
        };
        let v = MockValue::int("int", 1);
        assert_eq!(ctx.render_value(&v), "<max nesting depth reached>");
    }

    #[test]
    fn test_unparseable_type_falls_back_to_literal() {
        use crate::value::mock::MockValue;

        let registry = PrinterRegistry::with_default_printers();
        let config = InspectConfig::default();
        let ctx = RenderContext::new(&registry, &config);

        let v = MockValue::int("tuple<int", 1);
        assert_eq!(ctx.render_value(&v), "tuple<int");

        let v = MockValue::int("", 1);
        assert_eq!(ctx.render_value(&v), "<no type information>");
    }
}
