//! Inspection configuration
//!
//! Limits and cosmetic knobs for extraction and rendering. The engine never
//! touches the filesystem; hosts that persist configuration hand the engine a
//! TOML snippet via [`InspectConfig::from_toml_str`].

use serde::{Deserialize, Serialize};

/// Configuration for extraction and rendering
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct InspectConfig {
    /// Spaces per indentation level in rendered blocks
    pub indent_width: usize,

    /// Maximum container elements rendered before eliding the rest
    pub max_elements: usize,

    /// Maximum nesting depth for recursive rendering/extraction
    pub max_depth: usize,

    /// Integers with magnitude above this are treated as uninitialized memory
    pub int_sanity_limit: i64,

    /// Token substituted for values that could not be read
    pub unavailable_token: String,
}

impl Default for InspectConfig {
    fn default() -> Self {
        Self {
            indent_width: 2,
            max_elements: 256,
            max_depth: 32,
            int_sanity_limit: 100_000_000,
            unavailable_token: "<unavailable>".to_string(),
        }
    }
}

impl InspectConfig {
    /// Parse a configuration from a TOML snippet.
    ///
    /// Missing keys fall back to defaults, so hosts can override a single
    /// knob without restating the rest.
    pub fn from_toml_str(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Serialize the configuration to TOML
    pub fn to_toml_string(&self) -> String {
        toml::to_string_pretty(self).unwrap_or_default()
    }
}
