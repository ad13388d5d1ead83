//! Migration of 1.0 settings
//!
//! Hamster 1.0 kept flat key/value preferences. A snapshot of those values
//! is mapped onto the nested 2.0 configuration; only values present in the
//! snapshot are applied, and missing sections are created.

mod swipe;

pub use swipe::translate_swipe_symbols;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::config::{
    ConfigError, Format, HamsterConfiguration, KeyboardSwipe, CHINESE_KEYBOARD_TYPE,
};
use crate::settings::SettingsStore;

/// 1.0 preferences snapshot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacySettings {
    pub show_key_press_bubble: Option<bool>,
    pub enable_keyboard_feedback_sound: Option<bool>,
    pub enable_keyboard_feedback_haptic: Option<bool>,
    pub show_keyboard_dismiss_button: Option<bool>,
    pub show_semicolon_button: Option<bool>,
    pub show_space_left_button: Option<bool>,
    pub space_left_button_value: Option<String>,
    pub show_space_right_button: Option<bool>,
    pub space_right_button_value: Option<String>,
    pub show_space_right_switch_language_button: Option<bool>,
    pub switch_language_button_in_space_left: Option<bool>,
    pub rime_max_candidate_size: Option<u32>,
    pub rime_candidate_title_font_size: Option<u32>,
    pub rime_candidate_comment_font_size: Option<u32>,
    pub candidate_bar_height: Option<u32>,
    pub rime_simplified_and_traditional_switcher_key: Option<String>,
    pub enable_input_embedded_mode: Option<bool>,
    pub enable_keyboard_automatically_lowercase: Option<bool>,
    /// `"<key><arrow>" -> output`
    pub keyboard_swipe_gesture_symbol: Option<BTreeMap<String, String>>,
}

impl LegacySettings {
    pub fn parse(text: &str, format: Format) -> Result<Self, ConfigError> {
        format
            .parse(text)
            .map_err(|e| ConfigError::Migration(format!("legacy settings: {}", e)))
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;
        Self::parse(&text, Format::from_path(path).unwrap_or(Format::Json))
    }
}

/// What a migration changed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MigrationReport {
    /// Target paths that were written, in application order
    pub applied: Vec<&'static str>,
    /// Number of swipe keys written to the Chinese keyboard
    pub swipe_keys: usize,
}

impl MigrationReport {
    pub fn is_empty(&self) -> bool {
        self.applied.is_empty()
    }
}

macro_rules! migrate_field {
    ($report:ident, $legacy:expr, $target:expr, $path:literal) => {
        if let Some(value) = $legacy.clone() {
            $target = Some(value);
            $report.applied.push($path);
        }
    };
}

/// Apply a 1.0 snapshot onto `configuration`.
pub fn migrate_v1(
    configuration: &mut HamsterConfiguration,
    legacy: &LegacySettings,
) -> MigrationReport {
    let mut report = MigrationReport::default();

    migrate_field!(
        report,
        legacy.show_key_press_bubble,
        configuration.keyboard_mut().display_button_bubbles,
        "keyboard.displayButtonBubbles"
    );
    migrate_field!(
        report,
        legacy.enable_keyboard_feedback_sound,
        configuration.keyboard_mut().enable_key_sounds,
        "keyboard.enableKeySounds"
    );
    migrate_field!(
        report,
        legacy.enable_keyboard_feedback_haptic,
        configuration.keyboard_mut().enable_haptic_feedback,
        "keyboard.enableHapticFeedback"
    );
    migrate_field!(
        report,
        legacy.show_keyboard_dismiss_button,
        configuration.toolbar_mut().display_keyboard_dismiss_button,
        "toolbar.displayKeyboardDismissButton"
    );
    migrate_field!(
        report,
        legacy.show_semicolon_button,
        configuration.keyboard_mut().display_semicolon_button,
        "keyboard.displaySemicolonButton"
    );
    migrate_field!(
        report,
        legacy.show_space_left_button,
        configuration.keyboard_mut().display_space_left_button,
        "keyboard.displaySpaceLeftButton"
    );
    migrate_field!(
        report,
        legacy.space_left_button_value,
        configuration.keyboard_mut().key_value_of_space_left_button,
        "keyboard.keyValueOfSpaceLeftButton"
    );
    migrate_field!(
        report,
        legacy.show_space_right_button,
        configuration.keyboard_mut().display_space_right_button,
        "keyboard.displaySpaceRightButton"
    );
    migrate_field!(
        report,
        legacy.space_right_button_value,
        configuration.keyboard_mut().key_value_of_space_right_button,
        "keyboard.keyValueOfSpaceRightButton"
    );
    migrate_field!(
        report,
        legacy.show_space_right_switch_language_button,
        configuration.keyboard_mut().display_chinese_english_switch_button,
        "keyboard.displayChineseEnglishSwitchButton"
    );
    migrate_field!(
        report,
        legacy.switch_language_button_in_space_left,
        configuration.keyboard_mut().chinese_english_switch_button_is_on_left_of_space_button,
        "keyboard.chineseEnglishSwitchButtonIsOnLeftOfSpaceButton"
    );
    migrate_field!(
        report,
        legacy.rime_max_candidate_size,
        configuration.rime_mut().maximum_number_of_candidate_words,
        "rime.maximumNumberOfCandidateWords"
    );
    migrate_field!(
        report,
        legacy.rime_candidate_title_font_size,
        configuration.toolbar_mut().candidate_word_font_size,
        "toolbar.candidateWordFontSize"
    );
    migrate_field!(
        report,
        legacy.rime_candidate_comment_font_size,
        configuration.toolbar_mut().candidate_comment_font_size,
        "toolbar.candidateCommentFontSize"
    );
    migrate_field!(
        report,
        legacy.candidate_bar_height,
        configuration.toolbar_mut().height_of_toolbar,
        "toolbar.heightOfToolbar"
    );
    migrate_field!(
        report,
        legacy.rime_simplified_and_traditional_switcher_key,
        configuration.rime_mut().key_value_of_switch_simplified_and_traditional,
        "rime.keyValueOfSwitchSimplifiedAndTraditional"
    );
    migrate_field!(
        report,
        legacy.enable_input_embedded_mode,
        configuration.keyboard_mut().enable_embedded_input_mode,
        "keyboard.enableEmbeddedInputMode"
    );

    // 1.0 stored the inverse flag
    if let Some(lowercase) = legacy.enable_keyboard_automatically_lowercase {
        configuration.keyboard_mut().lock_shift_state = Some(!lowercase);
        report.applied.push("keyboard.lockShiftState");
    }

    if let Some(symbols) = &legacy.keyboard_swipe_gesture_symbol {
        let keys = translate_swipe_symbols(symbols);
        report.swipe_keys = keys.len();

        let entry = KeyboardSwipe {
            keyboard_type: Some(CHINESE_KEYBOARD_TYPE.to_string()),
            keys: Some(keys),
            ..Default::default()
        };
        let swipe = configuration.swipe_mut();
        let index = swipe.chinese_keyboard_index();
        let entries = swipe.keyboard_swipe.get_or_insert_with(Vec::new);
        match index {
            Some(i) => entries[i] = entry,
            None => entries.push(entry),
        }
        report.applied.push("swipe.keyboardSwipe");
    }

    tracing::info!(
        fields = report.applied.len(),
        swipe_keys = report.swipe_keys,
        "migrated 1.0 settings"
    );

    report
}

/// Result of [`migrate_config_file`]
#[derive(Debug, Clone, PartialEq)]
pub struct MigrationOutcome {
    pub report: MigrationReport,
    /// File that was written, if any
    pub written: Option<PathBuf>,
}

/// Migrate `legacy` into the configuration at `config_path`.
///
/// A missing configuration file starts from the built-in defaults. With
/// `output`, the migrated configuration is always written there and
/// `config_path` is left alone. Without it, `config_path` is only rewritten
/// when the migration changed something.
pub fn migrate_config_file(
    legacy: &LegacySettings,
    config_path: &Path,
    output: Option<&Path>,
) -> Result<MigrationOutcome, ConfigError> {
    let mut store = SettingsStore::open(config_path)?;

    if let Some(out) = output {
        let mut configuration = store.configuration().clone();
        let report = migrate_v1(&mut configuration, legacy);
        configuration.write_to_file(out)?;
        return Ok(MigrationOutcome {
            report,
            written: Some(out.to_path_buf()),
        });
    }

    let before = store.configuration().clone();
    let mut report = MigrationReport::default();
    store.update(|configuration| report = migrate_v1(configuration, legacy))?;

    let written = if store.configuration() != &before {
        Some(config_path.to_path_buf())
    } else {
        tracing::debug!(path = %config_path.display(), "migration changed nothing");
        None
    };
    Ok(MigrationOutcome { report, written })
}
