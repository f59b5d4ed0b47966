//! Printer dispatch table
//!
//! An ordered list of `(pattern, renderer)` pairs. Resolution matches each
//! pattern as a substring of the type's base name, in list order, first match
//! wins; a miss is not an error, the guaranteed fallback renderer handles it.
//!
//! The ordering invariant is enforced at construction time rather than
//! documented and hoped for: registering a pattern that contains an earlier
//! entry's pattern as a substring is rejected, because the earlier, more
//! general entry would always shadow the new one (e.g. `tile_window`
//! registered before `tile_window_with_static_distribution` would swallow
//! every specific window type). Adding an entity is one `register` call; the
//! matching algorithm never changes.

use super::containers::{ConstantRenderer, ContainerRenderer, FallbackRenderer, SequenceRenderer};
use super::coordinate::{AdaptorCoordinateRenderer, TensorCoordinateRenderer};
use super::descriptor::{AdaptorRenderer, DescriptorRenderer};
use super::distribution::{
    DistributionEncodingRenderer, StaticDistributedTensorRenderer, TileDistributionRenderer,
    TileWindowRenderer,
};
use super::view::TensorViewRenderer;
use super::Renderer;
use crate::error::RegistryError;
use crate::parse::TypeNode;

struct RegistryEntry {
    pattern: String,
    renderer: Box<dyn Renderer>,
}

/// Ordered pattern → renderer dispatch table. Built once at startup,
/// read-only afterwards; safe to share across concurrent readers.
pub struct PrinterRegistry {
    entries: Vec<RegistryEntry>,
    fallback: Box<dyn Renderer>,
}

impl PrinterRegistry {
    /// An empty table: everything resolves to the fallback renderer.
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
            fallback: Box::new(FallbackRenderer),
        }
    }

    /// The full printer set for the tile library, in specificity order.
    pub fn with_default_printers() -> Self {
        let mut registry = Self::empty();
        let defaults: Vec<(&str, Box<dyn Renderer>)> = vec![
            ("tensor_descriptor", Box::new(DescriptorRenderer)),
            ("tensor_adaptor_coordinate", Box::new(AdaptorCoordinateRenderer)),
            ("tensor_coordinate", Box::new(TensorCoordinateRenderer)),
            ("tensor_adaptor", Box::new(AdaptorRenderer)),
            ("tensor_view", Box::new(TensorViewRenderer)),
            ("tile_distribution_encoding", Box::new(DistributionEncodingRenderer)),
            ("tile_distribution", Box::new(TileDistributionRenderer)),
            (
                "tile_window_with_static_distribution",
                Box::new(TileWindowRenderer),
            ),
            (
                "tile_window_with_static_lengths",
                Box::new(TileWindowRenderer),
            ),
            ("tile_window", Box::new(TileWindowRenderer)),
            (
                "static_distributed_tensor",
                Box::new(StaticDistributedTensorRenderer),
            ),
            ("thread_buffer", Box::new(ContainerRenderer)),
            ("multi_index", Box::new(ContainerRenderer)),
            ("tuple", Box::new(ContainerRenderer)),
            ("array", Box::new(ContainerRenderer)),
            ("sequence", Box::new(SequenceRenderer)),
            ("constant", Box::new(ConstantRenderer)),
        ];
        for (pattern, renderer) in defaults {
            registry
                .register(pattern, renderer)
                .expect("default printer table is specificity-ordered");
        }
        tracing::debug!(entries = registry.len(), "printer registry initialized");
        registry
    }

    /// Append an entry. Fails if the pattern duplicates an existing one or
    /// would be shadowed by an earlier, more general entry.
    pub fn register(
        &mut self,
        pattern: impl Into<String>,
        renderer: Box<dyn Renderer>,
    ) -> Result<(), RegistryError> {
        let pattern = pattern.into();
        for entry in &self.entries {
            if entry.pattern == pattern {
                return Err(RegistryError::Duplicate { pattern });
            }
            if pattern.contains(&entry.pattern) {
                return Err(RegistryError::Shadowed {
                    pattern,
                    by: entry.pattern.clone(),
                });
            }
        }
        self.entries.push(RegistryEntry { pattern, renderer });
        Ok(())
    }

    /// Resolve a renderer for a parsed type. Total: a miss returns the
    /// fallback renderer.
    pub fn resolve(&self, ty: &TypeNode) -> &dyn Renderer {
        let base = ty.base_name();
        for entry in &self.entries {
            if base.contains(&entry.pattern) {
                return entry.renderer.as_ref();
            }
        }
        self.fallback.as_ref()
    }

    /// Pattern of the entry that would win for this type, for diagnostics.
    /// `None` means the fallback renderer.
    pub fn resolve_pattern(&self, ty: &TypeNode) -> Option<&str> {
        let base = ty.base_name();
        self.entries
            .iter()
            .find(|e| base.contains(&e.pattern))
            .map(|e| e.pattern.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
