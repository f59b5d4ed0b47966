//! # tilescope: tile-transformation live-value inspection
//!
//! An introspection-and-rendering engine for the `ck_tile` C++ tensor/tile
//! library, designed to sit behind a host debugger: the host supplies live
//! value handles and type strings, tilescope renders structured text blocks
//! and dimension-flow diagrams.
//!
//! ## Architecture
//!
//! - **Parser** ([`parse`]): recursive-descent parsing of nested generic
//!   type signatures into [`parse::TypeNode`] trees
//! - **Value access** ([`value`]): capability trait over opaque live values;
//!   every accessor returns a typed failure instead of faulting
//! - **Extraction** ([`extract`]): recovers [`model`] types (descriptors,
//!   transforms, coordinates, encodings) from type trees plus live fields
//! - **Rendering** ([`render`]): ordered pattern dispatch table selecting a
//!   renderer per entity family, with a guaranteed fallback
//! - **Diagrams** ([`diagram`]): bottom→top dimension-flow graphs from
//!   extracted descriptors
//!
//! ## Example
//!
//! ```ignore
//! // requires the `mock-value` feature
//! use tilescope::value::mock::MockValue;
//! use tilescope::Inspector;
//!
//! let inspector = Inspector::new();
//!
//! let value = MockValue::container(
//!     "ck_tile::tuple<int, int>",
//!     vec![MockValue::int("int", 4), MockValue::int("int", 8)],
//! );
//!
//! let text = inspector.inspect(&value);
//! assert!(text.contains("[0]: 4"));
//! ```
//!
//! Degradation is the design center: debugger state is routinely truncated,
//! optimized out, or half-constructed, and every inspection still produces
//! some output — worst case a literal type dump.

pub mod config;
pub mod diagram;
pub mod error;
pub mod extract;
pub mod inspector;
pub mod model;
pub mod parse;
pub mod render;
pub mod value;

// Re-export commonly used types
pub use config::InspectConfig;
pub use diagram::{build_dimension_flow, DiagramGraph};
pub use error::{AccessFailure, InspectError, ParseError, RegistryError, Result};
pub use inspector::Inspector;
pub use model::{Coordinate, Descriptor, DistributionEncoding, Transform, TransformKind};
pub use parse::{demangle_symbol, parse_type, ParsedType, TypeNode};
pub use render::{PrinterRegistry, RenderContext, Renderer};
pub use value::{ValueAccess, ValueHandle};
