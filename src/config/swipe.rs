//! Swipe gesture configuration (`swipe` section)

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Keyboard type prefix used for the built-in Chinese keyboards.
pub const CHINESE_KEYBOARD_TYPE: &str = "chinese";

/// Swipe sensitivity and per-keyboard swipe bindings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyboardSwipeConfiguration {
    /// Horizontal swipe sensitivity
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x_axle_swipe_sensitivity: Option<i32>,

    /// Vertical swipe sensitivity
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y_axle_swipe_sensitivity: Option<i32>,

    /// Cursor movement sensitivity when swiping on the space bar
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub space_swipe_sensitivity: Option<i32>,

    /// Minimum travel before a touch counts as a swipe
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_threshold: Option<i32>,

    /// Tangent of the maximum angle off-axis for a straight swipe
    /// (tan 15° ≈ 0.268)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tangent_threshold: Option<f64>,

    /// Seconds before a press becomes a long press
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long_press_delay: Option<f64>,

    /// Swipe bindings for the built-in keyboards
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyboard_swipe: Option<Vec<KeyboardSwipe>>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl KeyboardSwipeConfiguration {
    /// Index of the first Chinese keyboard entry, if any.
    pub fn chinese_keyboard_index(&self) -> Option<usize> {
        self.keyboard_swipe
            .as_ref()?
            .iter()
            .position(KeyboardSwipe::is_chinese)
    }

    /// Name of the first float field holding an infinite or NaN value.
    pub(crate) fn non_finite_field(&self) -> Option<&'static str> {
        [
            ("swipe.tangentThreshold", self.tangent_threshold),
            ("swipe.longPressDelay", self.long_press_delay),
        ]
        .into_iter()
        .find(|(_, v)| v.map_or(false, |f| !f.is_finite()))
        .map(|(name, _)| name)
    }
}

/// Swipe bindings for one built-in keyboard
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyboardSwipe {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyboard_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keys: Option<Vec<SwipeKey>>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl KeyboardSwipe {
    pub fn is_chinese(&self) -> bool {
        self.keyboard_type
            .as_deref()
            .is_some_and(|t| t.starts_with(CHINESE_KEYBOARD_TYPE))
    }
}

/// A key and the actions bound to swipes starting on it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwipeKey {
    /// Key action, e.g. `character(a)`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swipe: Option<Vec<KeySwipe>>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// One swipe direction on a key
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeySwipe {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<SwipeDirection>,

    /// Action fired by the swipe, e.g. `character(1)` or `shortCommand(#简繁切换)`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    /// Send the action through RIME instead of inserting it directly
    #[serde(rename = "processByRIME", default, skip_serializing_if = "Option::is_none")]
    pub process_by_rime: Option<bool>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Swipe direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwipeDirection {
    Up,
    Down,
    Left,
    Right,
}

impl SwipeDirection {
    /// Direction for an arrow symbol (`↑ ↓ ← →`).
    pub fn from_arrow(c: char) -> Option<Self> {
        match c {
            '↑' => Some(SwipeDirection::Up),
            '↓' => Some(SwipeDirection::Down),
            '←' => Some(SwipeDirection::Left),
            '→' => Some(SwipeDirection::Right),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SwipeDirection::Up => "up",
            SwipeDirection::Down => "down",
            SwipeDirection::Left => "left",
            SwipeDirection::Right => "right",
        }
    }
}

impl fmt::Display for SwipeDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_arrow() {
        assert_eq!(SwipeDirection::from_arrow('↑'), Some(SwipeDirection::Up));
        assert_eq!(SwipeDirection::from_arrow('→'), Some(SwipeDirection::Right));
        assert_eq!(SwipeDirection::from_arrow('x'), None);
    }

    #[test]
    fn test_process_by_rime_key_name() {
        let swipe = KeySwipe {
            direction: Some(SwipeDirection::Down),
            process_by_rime: Some(true),
            ..Default::default()
        };
        let json = serde_json::to_value(&swipe).unwrap();
        assert_eq!(json["processByRIME"], true);
        assert_eq!(json["direction"], "down");
        assert!(json.get("label").is_none());
    }

    #[test]
    fn test_chinese_keyboard_index() {
        let config = KeyboardSwipeConfiguration {
            keyboard_swipe: Some(vec![
                KeyboardSwipe {
                    keyboard_type: Some("alphabetic".to_string()),
                    ..Default::default()
                },
                KeyboardSwipe {
                    keyboard_type: Some("chinese".to_string()),
                    ..Default::default()
                },
            ]),
            ..Default::default()
        };
        assert_eq!(config.chinese_keyboard_index(), Some(1));
        assert_eq!(KeyboardSwipeConfiguration::default().chinese_keyboard_index(), None);
    }
}
