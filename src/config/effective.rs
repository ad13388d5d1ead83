//! Effective configuration with full provenance
//!
//! The effective configuration is the merge of every layer plus a record
//! of where each layer came from.

use chrono::{DateTime, Utc};
use hamster_merge::{merge_layers, ConfigTree, OverlayWins};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;

use super::defaults::BuiltinDefaults;
use super::error::ConfigError;
use super::format::Format;
use super::model::HamsterConfiguration;

/// Default application config file name
pub const APP_CONFIG_FILE: &str = "Hamster.yaml";

/// Default user patch file name
pub const CUSTOM_CONFIG_FILE: &str = "hamster.custom.yaml";

/// Origin of a configuration source
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum ConfigOrigin {
    Builtin,
    App,
    Custom,
    Cli,
}

/// A contributing config source with provenance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigSource {
    /// Origin of this source
    pub origin: ConfigOrigin,

    /// File path (None for builtin/cli)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// SHA-256 digest of raw file bytes (None for builtin/cli)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
}

/// Effective configuration with full provenance
#[derive(Debug, Clone, Serialize)]
pub struct EffectiveConfig {
    /// When this config was computed
    pub created_at: DateTime<Utc>,

    /// The merged configuration tree
    pub config: ConfigTree,

    /// Contributing sources in precedence order
    pub sources: Vec<ConfigSource>,

    #[serde(skip)]
    configuration: HamsterConfiguration,
}

impl EffectiveConfig {
    /// Build effective config from layers
    pub fn build(
        app_config_path: Option<&Path>,
        custom_config_path: Option<&Path>,
        cli_overrides: Option<ConfigTree>,
    ) -> Result<Self, ConfigError> {
        let mut layers = Vec::new();
        let mut sources = Vec::new();

        // Layer 1: Built-in defaults
        layers.push(BuiltinDefaults.to_tree()?);
        sources.push(ConfigSource {
            origin: ConfigOrigin::Builtin,
            path: None,
            digest: None,
        });

        // Layer 2: Hamster.yaml
        if let Some(path) = app_config_path {
            if path.exists() {
                let (tree, digest) = Self::load_file(path)?;
                layers.push(tree);
                sources.push(ConfigSource {
                    origin: ConfigOrigin::App,
                    path: Some(path.to_string_lossy().to_string()),
                    digest: Some(digest),
                });
            } else {
                tracing::debug!(path = %path.display(), "app config not found, skipping");
            }
        }

        // Layer 3: hamster.custom.yaml
        if let Some(path) = custom_config_path {
            if path.exists() {
                let (tree, digest) = Self::load_file(path)?;
                layers.push(tree);
                sources.push(ConfigSource {
                    origin: ConfigOrigin::Custom,
                    path: Some(path.to_string_lossy().to_string()),
                    digest: Some(digest),
                });
            } else {
                tracing::debug!(path = %path.display(), "custom config not found, skipping");
            }
        }

        // Layer 4: CLI overrides
        if let Some(cli) = cli_overrides {
            layers.push(cli);
            sources.push(ConfigSource {
                origin: ConfigOrigin::Cli,
                path: None,
                digest: None,
            });
        }

        let merged = merge_layers(layers, &OverlayWins)?;
        let configuration = HamsterConfiguration::from_tree(merged.clone())?;

        Self::validate_config(&configuration)?;

        tracing::debug!(layers = sources.len(), "built effective configuration");

        Ok(Self {
            created_at: Utc::now(),
            config: merged,
            sources,
            configuration,
        })
    }

    /// Build from the standard file names inside `dir`.
    pub fn build_in_dir(
        dir: &Path,
        cli_overrides: Option<ConfigTree>,
    ) -> Result<Self, ConfigError> {
        Self::build(
            Some(&dir.join(APP_CONFIG_FILE)),
            Some(&dir.join(CUSTOM_CONFIG_FILE)),
            cli_overrides,
        )
    }

    /// Load and parse a config file, returning its tree and digest.
    ///
    /// The file is checked against the schema before its tree is used, so a
    /// wrongly typed field fails here rather than after merging.
    fn load_file(path: &Path) -> Result<(ConfigTree, String), ConfigError> {
        let bytes = fs::read(path)
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;

        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        let digest = hex::encode(hasher.finalize());

        let contents = String::from_utf8(bytes)
            .map_err(|e| ConfigError::Malformed(format!("Invalid UTF-8: {}", e)))?;

        let format = Format::from_path(path).unwrap_or_default();
        let configuration =
            HamsterConfiguration::parse(&contents, format).map_err(|e| match e {
                ConfigError::Malformed(msg) => {
                    ConfigError::Malformed(format!("{}: {}", path.display(), msg))
                }
                other => other,
            })?;

        tracing::debug!(path = %path.display(), %format, digest = %digest, "loaded config layer");

        Ok((configuration.to_tree()?, digest))
    }

    /// Validate configuration values
    fn validate_config(config: &HamsterConfiguration) -> Result<(), ConfigError> {
        if let Some(max) = config
            .rime
            .as_ref()
            .and_then(|r| r.maximum_number_of_candidate_words)
        {
            if max == 0 || max > 500 {
                return Err(ConfigError::Validation(
                    "rime.maximumNumberOfCandidateWords must be in [1, 500]".to_string(),
                ));
            }
        }

        if let Some(height) = config.toolbar.as_ref().and_then(|t| t.height_of_toolbar) {
            if height == 0 || height > 200 {
                return Err(ConfigError::Validation(
                    "toolbar.heightOfToolbar must be in [1, 200]".to_string(),
                ));
            }
        }

        if let Some(tangent) = config.swipe.as_ref().and_then(|s| s.tangent_threshold) {
            if tangent.is_nan() || tangent < 0.0 {
                return Err(ConfigError::Validation(
                    "swipe.tangentThreshold must be >= 0".to_string(),
                ));
            }
        }

        Ok(())
    }

    /// The merged configuration as the typed model
    pub fn configuration(&self) -> &HamsterConfiguration {
        &self.configuration
    }

    /// Consume into the typed model
    pub fn into_configuration(self) -> HamsterConfiguration {
        self.configuration
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Get a config value by path (dot-separated)
    pub fn get(&self, path: &str) -> Option<&Value> {
        get_path(&self.config, path)
    }

    /// Get a config value as i64
    pub fn get_i64(&self, path: &str) -> Option<i64> {
        self.get(path).and_then(|v| v.as_i64())
    }

    /// Get a config value as string
    pub fn get_str(&self, path: &str) -> Option<&str> {
        self.get(path).and_then(|v| v.as_str())
    }

    /// Get a config value as bool
    pub fn get_bool(&self, path: &str) -> Option<bool> {
        self.get(path).and_then(|v| v.as_bool())
    }
}

/// Look up a dot-separated path in a tree.
///
/// Numeric segments index into sequences (`swipe.keyboardSwipe.0.keyboardType`).
pub fn get_path<'a>(tree: &'a ConfigTree, path: &str) -> Option<&'a Value> {
    let mut parts = path.split('.');
    let mut current = tree.get(parts.next()?)?;
    for part in parts {
        current = match current {
            Value::Array(items) => items.get(part.parse::<usize>().ok()?)?,
            other => other.get(part)?,
        };
    }
    Some(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn cli(value: Value) -> Option<ConfigTree> {
        match value {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    #[test]
    fn test_build_with_defaults_only() {
        let config = EffectiveConfig::build(None, None, None).unwrap();

        assert_eq!(config.get_i64("toolbar.heightOfToolbar"), Some(55));
        assert_eq!(
            config.get_str("rime.keyValueOfSwitchSimplifiedAndTraditional"),
            Some("simplification")
        );
    }

    #[test]
    fn test_build_with_cli_override() {
        let overrides = cli(serde_json::json!({
            "rime": {"maximumNumberOfCandidateWords": 60}
        }));

        let config = EffectiveConfig::build(None, None, overrides).unwrap();

        assert_eq!(config.get_i64("rime.maximumNumberOfCandidateWords"), Some(60));
        // Sibling default survives
        assert_eq!(config.get_bool("rime.overrideDictFiles"), Some(true));
    }

    #[test]
    fn test_validation_candidate_count() {
        let overrides = cli(serde_json::json!({
            "rime": {"maximumNumberOfCandidateWords": 0}
        }));

        let result = EffectiveConfig::build(None, None, overrides);
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("maximumNumberOfCandidateWords"));
    }

    #[test]
    fn test_validation_toolbar_height() {
        let overrides = cli(serde_json::json!({
            "toolbar": {"heightOfToolbar": 500}
        }));

        let result = EffectiveConfig::build(None, None, overrides);
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_cli_override_with_wrong_type() {
        let overrides = cli(serde_json::json!({
            "keyboard": {"enableKeySounds": "loud"}
        }));

        let result = EffectiveConfig::build(None, None, overrides);
        assert!(matches!(result, Err(ConfigError::Malformed(_))));
    }

    #[test]
    fn test_load_yaml_file() {
        let mut temp = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(temp, "toolbar:").unwrap();
        writeln!(temp, "  heightOfToolbar: 70").unwrap();
        writeln!(temp, "keyboard:").unwrap();
        writeln!(temp, "  enableColorSchema: true").unwrap();

        let config = EffectiveConfig::build(Some(temp.path()), None, None).unwrap();

        assert_eq!(config.get_i64("toolbar.heightOfToolbar"), Some(70));
        assert_eq!(config.get_bool("keyboard.enableColorSchema"), Some(true));
        // Default retained
        assert_eq!(config.get_i64("toolbar.candidateWordFontSize"), Some(20));
        assert_eq!(config.sources.len(), 2);
        assert_eq!(config.sources[1].origin, ConfigOrigin::App);
        assert_eq!(config.sources[1].digest.as_ref().unwrap().len(), 64);
    }

    #[test]
    fn test_load_toml_file() {
        let mut temp = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(temp, "[rime]").unwrap();
        writeln!(temp, "maximumNumberOfCandidateWords = 30").unwrap();

        let config = EffectiveConfig::build(None, Some(temp.path()), None).unwrap();

        assert_eq!(config.get_i64("rime.maximumNumberOfCandidateWords"), Some(30));
        assert_eq!(config.sources[1].origin, ConfigOrigin::Custom);
    }

    #[test]
    fn test_malformed_file_reports_path() {
        let mut temp = NamedTempFile::new().unwrap();
        writeln!(temp, "toolbar: [1, 2").unwrap();

        let err = EffectiveConfig::build(Some(temp.path()), None, None).unwrap_err();

        assert!(matches!(err, ConfigError::Malformed(_)));
        let message = err.to_string();
        assert!(message.contains(&temp.path().display().to_string()));
        assert_eq!(message.matches("Malformed configuration").count(), 1);
        assert!(message.contains("YAML parse error"));
    }

    #[test]
    fn test_missing_files_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let config = EffectiveConfig::build_in_dir(dir.path(), None).unwrap();

        assert_eq!(config.sources.len(), 1);
        assert_eq!(config.sources[0].origin, ConfigOrigin::Builtin);
    }

    #[test]
    fn test_layer_precedence() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(APP_CONFIG_FILE),
            "toolbar:\n  heightOfToolbar: 60\n  candidateWordFontSize: 18\n",
        )
        .unwrap();
        fs::write(
            dir.path().join(CUSTOM_CONFIG_FILE),
            "toolbar:\n  heightOfToolbar: 65\n",
        )
        .unwrap();

        let overrides = cli(serde_json::json!({"toolbar": {"candidateWordFontSize": 22}}));
        let config = EffectiveConfig::build_in_dir(dir.path(), overrides).unwrap();

        assert_eq!(config.get_i64("toolbar.heightOfToolbar"), Some(65));
        assert_eq!(config.get_i64("toolbar.candidateWordFontSize"), Some(22));
        let origins: Vec<_> = config.sources.iter().map(|s| s.origin.clone()).collect();
        assert_eq!(
            origins,
            vec![
                ConfigOrigin::Builtin,
                ConfigOrigin::App,
                ConfigOrigin::Custom,
                ConfigOrigin::Cli
            ]
        );
        assert_eq!(
            config.configuration().toolbar.as_ref().unwrap().height_of_toolbar,
            Some(65)
        );
    }

    #[test]
    fn test_get_path_indexes_sequences() {
        let config = EffectiveConfig::build(None, None, None).unwrap();
        assert_eq!(
            config.get_str("swipe.keyboardSwipe.0.keyboardType"),
            Some("chinese")
        );
        assert!(config.get("swipe.keyboardSwipe.9").is_none());
        assert!(config.get("nope").is_none());
    }

    #[test]
    fn test_to_json_includes_sources() {
        let config = EffectiveConfig::build(None, None, None).unwrap();
        let json = config.to_json().unwrap();
        assert!(json.contains("\"created_at\""));
        assert!(json.contains("\"origin\": \"builtin\""));
    }
}
