//! Built-in defaults (layer 1)
//!
//! Shipped as YAML and embedded at compile time.

use hamster_merge::ConfigTree;

use super::error::ConfigError;
use super::format::Format;
use super::model::HamsterConfiguration;

/// Embedded default `Hamster.yaml`
pub const DEFAULT_CONFIG_YAML: &str = include_str!("../../defaults/hamster.yaml");

/// Built-in default configuration values
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinDefaults;

impl BuiltinDefaults {
    /// Parsed default configuration
    pub fn configuration(&self) -> Result<HamsterConfiguration, ConfigError> {
        HamsterConfiguration::parse(DEFAULT_CONFIG_YAML, Format::Yaml)
    }

    /// Convert to a tree for merging
    pub fn to_tree(&self) -> Result<ConfigTree, ConfigError> {
        self.configuration()?.to_tree()
    }
}
