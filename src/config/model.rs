//! Hamster configuration model (`Hamster.yaml`)
//!
//! Every field is optional: an absent field means "inherit from a lower
//! layer", never false or zero. Keys this model does not know are kept in
//! each struct's `extra` map and written back out unchanged.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use super::error::ConfigError;
use super::format::Format;
use super::swipe::KeyboardSwipeConfiguration;

/// All Hamster settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HamsterConfiguration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub general: Option<GeneralConfiguration>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub toolbar: Option<ToolbarConfiguration>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyboard: Option<KeyboardConfiguration>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rime: Option<RimeConfiguration>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swipe: Option<KeyboardSwipeConfiguration>,

    /// Custom keyboard definitions (order is significant)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyboards: Option<Vec<CustomKeyboard>>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl HamsterConfiguration {
    /// Parse configuration text.
    ///
    /// Fails with [`ConfigError::Malformed`] if the text is not well-formed
    /// or a known key holds a value of the wrong type.
    pub fn parse(text: &str, format: Format) -> Result<Self, ConfigError> {
        format.parse(text)
    }

    /// Serialize to text. Unset fields are omitted.
    pub fn serialize(&self, format: Format) -> Result<String, ConfigError> {
        self.ensure_representable()?;
        format.serialize(self)
    }

    /// Infinite and NaN floats have no encoding in every format, and the
    /// JSON encoder would silently write them as null.
    pub(crate) fn ensure_representable(&self) -> Result<(), ConfigError> {
        match self.swipe.as_ref().and_then(|s| s.non_finite_field()) {
            Some(field) => Err(ConfigError::Serialization(format!(
                "non-finite number at `{}`",
                field
            ))),
            None => Ok(()),
        }
    }

    /// Load from a file; the format follows the extension (YAML if unknown).
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;
        Self::parse(&text, Format::from_path(path).unwrap_or_default())
    }

    /// Write atomically to file (write-then-rename)
    pub fn write_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let text = self.serialize(Format::from_path(path).unwrap_or_default())?;

        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, text)
            .map_err(|e| ConfigError::Io(format!("{}: {}", temp_path.display(), e)))?;
        fs::rename(&temp_path, path)
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;

        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Names of the sections that are present.
    pub fn sections(&self) -> Vec<&str> {
        let mut names = Vec::new();
        if self.general.is_some() {
            names.push("general");
        }
        if self.toolbar.is_some() {
            names.push("toolbar");
        }
        if self.keyboard.is_some() {
            names.push("keyboard");
        }
        if self.rime.is_some() {
            names.push("rime");
        }
        if self.swipe.is_some() {
            names.push("swipe");
        }
        if self.keyboards.is_some() {
            names.push("keyboards");
        }
        names.extend(self.extra.keys().map(String::as_str));
        names
    }

    /// `general`, created empty if missing.
    pub fn general_mut(&mut self) -> &mut GeneralConfiguration {
        self.general.get_or_insert_with(Default::default)
    }

    /// `toolbar`, created empty if missing.
    pub fn toolbar_mut(&mut self) -> &mut ToolbarConfiguration {
        self.toolbar.get_or_insert_with(Default::default)
    }

    /// `keyboard`, created empty if missing.
    pub fn keyboard_mut(&mut self) -> &mut KeyboardConfiguration {
        self.keyboard.get_or_insert_with(Default::default)
    }

    /// `rime`, created empty if missing.
    pub fn rime_mut(&mut self) -> &mut RimeConfiguration {
        self.rime.get_or_insert_with(Default::default)
    }

    /// `swipe`, created empty if missing.
    pub fn swipe_mut(&mut self) -> &mut KeyboardSwipeConfiguration {
        self.swipe.get_or_insert_with(Default::default)
    }
}

/// General application settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneralConfiguration {
    /// Sync input schemas through iCloud
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_apple_cloud: Option<bool>,

    /// File patterns excluded when copying to iCloud
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regex_on_copy_file: Option<Vec<String>>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Candidate toolbar settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolbarConfiguration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_toolbar: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_keyboard_dismiss_button: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height_of_toolbar: Option<u32>,

    /// Height of the pinyin (coding) area above the candidates
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height_of_coding_area: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub candidate_word_font_size: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub candidate_comment_font_size: Option<u32>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Keyboard appearance and behaviour
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyboardConfiguration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_color_schema: Option<bool>,

    /// Name of the active color schema
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_color_schema: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_button_bubbles: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_key_sounds: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_haptic_feedback: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_semicolon_button: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_space_left_button: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_value_of_space_left_button: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_space_right_button: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_value_of_space_right_button: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_chinese_english_switch_button: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chinese_english_switch_button_is_on_left_of_space_button: Option<bool>,

    /// Show the composing text inline in the host text field
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_embedded_input_mode: Option<bool>,

    /// Keep shift engaged after typing a letter
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lock_shift_state: Option<bool>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// RIME engine settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RimeConfiguration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum_number_of_candidate_words: Option<u32>,

    /// Key that toggles simplified/traditional output, e.g. `simplification`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_value_of_switch_simplified_and_traditional: Option<String>,

    /// Overwrite user dictionaries on redeploy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub override_dict_files: Option<bool>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// A user-defined keyboard layout
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomKeyboard {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Row definitions, kept as-is
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows: Option<Vec<Value>>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}
