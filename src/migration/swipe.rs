//! Translation of 1.0 swipe gesture symbols
//!
//! 1.0 stored swipes as a flat map from `"<key><arrow>"` to the output,
//! e.g. `"q↑" -> "1"` or `"s↓" -> "#简繁切换"`.

use std::collections::BTreeMap;

use crate::config::{KeySwipe, SwipeDirection, SwipeKey};

/// Prefix marking a shortcut command value
const SHORTCUT_PREFIX: char = '#';

pub(crate) fn character_action(value: &str) -> String {
    format!("character({})", value)
}

pub(crate) fn shortcut_action(command: &str) -> String {
    format!("shortCommand({})", command)
}

/// Group legacy symbols into swipe keys.
///
/// Entries whose value is blank or whose key does not end in an arrow are
/// skipped. Keys come back sorted by action.
pub fn translate_swipe_symbols(symbols: &BTreeMap<String, String>) -> Vec<SwipeKey> {
    let mut grouped: BTreeMap<String, Vec<KeySwipe>> = BTreeMap::new();

    for (raw_key, raw_value) in symbols {
        let value = raw_value.trim();
        if value.is_empty() {
            continue;
        }

        let key = raw_key.trim();
        let mut chars = key.chars();
        let Some(direction) = chars.next_back().and_then(SwipeDirection::from_arrow) else {
            tracing::debug!(key = %raw_key, "skipping swipe symbol without direction arrow");
            continue;
        };
        let key_action = character_action(&chars.as_str().to_lowercase());

        let action = if value.starts_with(SHORTCUT_PREFIX) {
            shortcut_action(value)
        } else {
            character_action(value)
        };

        grouped.entry(key_action).or_default().push(KeySwipe {
            direction: Some(direction),
            action: Some(action),
            ..Default::default()
        });
    }

    grouped
        .into_iter()
        .map(|(action, swipes)| SwipeKey {
            action: Some(action),
            swipe: Some(swipes),
            ..Default::default()
        })
        .collect()
}
