//! The host-facing inspection facade
//!
//! An [`Inspector`] owns the printer registry and the configuration. Hosts
//! build one at attach time, optionally register extra printers, then treat
//! it as read-only: both entry points take `&self` and the registry is never
//! mutated after startup, so concurrent reads are safe.
//!
//! Both entry points always produce output. A value the engine cannot make
//! sense of renders as its literal type string; a diagram request against a
//! value with no transform model renders as a note. Partial output beats no
//! output when the target is optimized or half-constructed.

use crate::config::InspectConfig;
use crate::diagram::{build_dimension_flow, DiagramGraph};
use crate::error::RegistryError;
use crate::extract::{extract_adaptor, extract_descriptor};
use crate::model::Descriptor;
use crate::parse::parse_type;
use crate::render::{PrinterRegistry, RenderContext, Renderer};
use crate::value::ValueAccess;

/// Inspection engine: dispatch table plus configuration.
pub struct Inspector {
    registry: PrinterRegistry,
    config: InspectConfig,
}

impl Default for Inspector {
    fn default() -> Self {
        Self::new()
    }
}

impl Inspector {
    /// Engine with the default printer set and default limits
    pub fn new() -> Self {
        Self {
            registry: PrinterRegistry::with_default_printers(),
            config: InspectConfig::default(),
        }
    }

    /// Engine with the default printer set and custom limits
    pub fn with_config(config: InspectConfig) -> Self {
        Self {
            registry: PrinterRegistry::with_default_printers(),
            config,
        }
    }

    /// Register an additional printer. This is the sole mutation point of
    /// the dispatch table, intended for host startup before the inspector
    /// is shared.
    pub fn register_printer(
        &mut self,
        pattern: impl Into<String>,
        renderer: Box<dyn Renderer>,
    ) -> Result<(), RegistryError> {
        self.registry.register(pattern, renderer)
    }

    pub fn config(&self) -> &InspectConfig {
        &self.config
    }

    pub fn registry(&self) -> &PrinterRegistry {
        &self.registry
    }

    /// Render a live value as structured text. Never fails: worst case is
    /// the literal type string.
    pub fn inspect(&self, value: &dyn ValueAccess) -> String {
        RenderContext::new(&self.registry, &self.config).render_value(value)
    }

    /// Render a live value's dimension flow as a fenced diagram block, or a
    /// note when the value carries no transform model.
    pub fn diagram(&self, value: &dyn ValueAccess, title: &str) -> String {
        match self.dimension_flow(value) {
            Some(graph) => graph.to_mermaid(title),
            None => format!(
                "no dimension-flow information in type `{}`",
                value.type_string()
            ),
        }
    }

    /// The flow graph behind [`Inspector::diagram`], for hosts that consume
    /// the node/edge stream directly.
    pub fn dimension_flow(&self, value: &dyn ValueAccess) -> Option<DiagramGraph> {
        self.descriptor_of(value)
            .map(|desc| build_dimension_flow(&desc))
    }

    /// Locate and extract the descriptor model a diagram would be built
    /// from: the value itself, or the nested descriptor of a view, or an
    /// adaptor when no descriptor is present.
    fn descriptor_of(&self, value: &dyn ValueAccess) -> Option<Descriptor> {
        let parsed = parse_type(&value.type_string()).ok()?;
        let root = &parsed.root;

        if let Some(node) = root.find("tensor_descriptor") {
            // Views carry their descriptor in desc_; fall back to reading the
            // fields off the value itself.
            if root.base_name() == "tensor_view" {
                if let Ok(desc) = value.field("desc_") {
                    return Some(extract_descriptor(desc.as_ref(), node, &self.config));
                }
            }
            return Some(extract_descriptor(value, node, &self.config));
        }
        if let Some(node) = root.find("tensor_adaptor") {
            return Some(extract_adaptor(value, node, &self.config));
        }
        None
    }
}
