//! Metamodel configuration (`[metamodel]` table of a TOML file)
//!
//! ```toml
//! [metamodel]
//! introspection = "annotation-required"
//! eager-introspection = true
//! disabled-factories = ["layout"]
//!
//! [metamodel.validation]
//! orphaned-methods = false
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;

/// Which public methods become actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IntrospectionPolicy {
    /// Only methods carrying the `Action` marker
    AnnotationRequired,
    /// Every remaining public, non-static method
    #[default]
    AllPublic,
}

/// Post-build validation switches
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ValidationConfig {
    /// Run validators at all
    pub enabled: bool,
    /// Report supporting methods that match no member
    pub orphaned_methods: bool,
    /// Report features with both a choices provider and an auto-complete
    pub choices_conflicts: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            orphaned_methods: true,
            choices_conflicts: true,
        }
    }
}

/// Metamodel configuration
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct MetaModelConfig {
    /// Action discovery policy
    pub introspection: IntrospectionPolicy,
    /// Build every referenced specification when one is loaded
    pub eager_introspection: bool,
    /// Factory names removed from the programming model
    pub disabled_factories: Vec<String>,
    /// Validation switches
    pub validation: ValidationConfig,
}

#[derive(Deserialize)]
struct ConfigFile {
    #[serde(default)]
    metamodel: MetaModelConfig,
}

impl MetaModelConfig {
    /// Parse the `[metamodel]` table of a TOML document; a missing table
    /// yields the defaults
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(content)?;
        Ok(file.metamodel)
    }

    /// Read and parse a TOML configuration file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}
