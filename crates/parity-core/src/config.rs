//! Verifier configuration

use parity_compare::DEFAULT_MAX_REPORTED;
use parity_value::DEFAULT_INDENT;
use serde::{Deserialize, Serialize};

/// Default record attribute stamped with a mutation's write id
pub const DEFAULT_WRITE_ID_ATTRIBUTE: &str = "write_id";

/// Verifier configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerifierConfig {
    /// Differing items kept per multi-item pass
    ///
    /// A budget of 0 is treated as 1: a divergent pass always keeps its
    /// first finding.
    pub max_reported_divergences: usize,
    /// Trim and lower-case qualified names before mutations
    pub normalize_identifiers: bool,
    /// Record attribute stamped with a positive write id
    pub write_id_attribute: String,
    /// Indentation of the structured dump
    pub dump_indent: usize,
}

impl VerifierConfig {
    /// Create config with defaults
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With a reporting budget; 0 is treated as 1
    #[inline]
    #[must_use]
    pub fn with_max_reported(mut self, max: usize) -> Self {
        self.max_reported_divergences = max;
        self
    }

    /// With identifier normalization on or off
    #[inline]
    #[must_use]
    pub fn with_normalize_identifiers(mut self, normalize: bool) -> Self {
        self.normalize_identifiers = normalize;
        self
    }

    /// With a write-id attribute name
    #[inline]
    #[must_use]
    pub fn with_write_id_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.write_id_attribute = attribute.into();
        self
    }

    /// With a dump indentation
    #[inline]
    #[must_use]
    pub fn with_dump_indent(mut self, indent: usize) -> Self {
        self.dump_indent = indent;
        self
    }
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            max_reported_divergences: DEFAULT_MAX_REPORTED,
            normalize_identifiers: true,
            write_id_attribute: DEFAULT_WRITE_ID_ATTRIBUTE.to_string(),
            dump_indent: DEFAULT_INDENT,
        }
    }
}
