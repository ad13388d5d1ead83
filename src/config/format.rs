//! Structured-text formats for configuration files
//!
//! YAML is the native format (`Hamster.yaml`); JSON and TOML are accepted
//! for tooling and overrides.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use super::error::ConfigError;

/// Supported text formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    #[default]
    Yaml,
    Json,
    Toml,
}

impl Format {
    /// Pick a format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "yaml" | "yml" => Some(Format::Yaml),
            "json" => Some(Format::Json),
            "toml" => Some(Format::Toml),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Format::Yaml => "yaml",
            Format::Json => "json",
            Format::Toml => "toml",
        }
    }

    /// Decode `text` into `T`.
    ///
    /// An empty YAML document (or one holding only comments) decodes as an
    /// empty mapping. Infinite and NaN floats (`.inf`, `nan`) are rejected:
    /// the merge tree cannot hold them.
    pub fn parse<T: DeserializeOwned>(&self, text: &str) -> Result<T, ConfigError> {
        match self {
            Format::Yaml => {
                let value: serde_yaml::Value = serde_yaml::from_str(text)
                    .map_err(|e| ConfigError::Malformed(format!("YAML parse error: {}", e)))?;
                let value = match value {
                    serde_yaml::Value::Null => serde_yaml::Value::Mapping(Default::default()),
                    other => other,
                };
                check_yaml_finite(&value, &mut Vec::new())?;
                serde_yaml::from_value(value)
                    .map_err(|e| ConfigError::Malformed(format!("YAML schema error: {}", e)))
            }
            Format::Json => serde_json::from_str(text)
                .map_err(|e| ConfigError::Malformed(format!("JSON parse error: {}", e))),
            Format::Toml => {
                let table: toml::Table = toml::from_str(text)
                    .map_err(|e| ConfigError::Malformed(format!("TOML parse error: {}", e)))?;
                for (key, value) in &table {
                    check_toml_finite(value, &mut vec![key.clone()])?;
                }
                toml::from_str(text)
                    .map_err(|e| ConfigError::Malformed(format!("TOML parse error: {}", e)))
            }
        }
    }

    /// Encode `value` as text.
    pub fn serialize<T: Serialize>(&self, value: &T) -> Result<String, ConfigError> {
        match self {
            Format::Yaml => serde_yaml::to_string(value)
                .map_err(|e| ConfigError::Serialization(format!("YAML: {}", e))),
            Format::Json => serde_json::to_string_pretty(value)
                .map_err(|e| ConfigError::Serialization(format!("JSON: {}", e))),
            Format::Toml => toml::to_string_pretty(value)
                .map_err(|e| ConfigError::Serialization(format!("TOML: {}", e))),
        }
    }
}

fn non_finite(path: &[String]) -> ConfigError {
    ConfigError::Malformed(format!("non-finite number at `{}`", path.join(".")))
}

fn check_yaml_finite(
    value: &serde_yaml::Value,
    path: &mut Vec<String>,
) -> Result<(), ConfigError> {
    match value {
        serde_yaml::Value::Number(n) if n.is_nan() || n.is_infinite() => Err(non_finite(path)),
        serde_yaml::Value::Sequence(items) => {
            for (i, item) in items.iter().enumerate() {
                path.push(i.to_string());
                check_yaml_finite(item, path)?;
                path.pop();
            }
            Ok(())
        }
        serde_yaml::Value::Mapping(map) => {
            for (key, item) in map {
                let key = match key {
                    serde_yaml::Value::String(s) => s.clone(),
                    other => serde_yaml::to_string(other)
                        .map(|s| s.trim_end().to_string())
                        .unwrap_or_default(),
                };
                path.push(key);
                check_yaml_finite(item, path)?;
                path.pop();
            }
            Ok(())
        }
        serde_yaml::Value::Tagged(tagged) => check_yaml_finite(&tagged.value, path),
        _ => Ok(()),
    }
}

fn check_toml_finite(value: &toml::Value, path: &mut Vec<String>) -> Result<(), ConfigError> {
    match value {
        toml::Value::Float(f) if !f.is_finite() => Err(non_finite(path)),
        toml::Value::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                path.push(i.to_string());
                check_toml_finite(item, path)?;
                path.pop();
            }
            Ok(())
        }
        toml::Value::Table(table) => {
            for (key, item) in table {
                path.push(key.clone());
                check_toml_finite(item, path)?;
                path.pop();
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Format {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "yaml" | "yml" => Ok(Format::Yaml),
            "json" => Ok(Format::Json),
            "toml" => Ok(Format::Toml),
            other => Err(ConfigError::Malformed(format!("unknown format '{}'", other))),
        }
    }
}
