//! Configuration model and layered merge
//!
//! Implements the 4-layer configuration merge:
//! 1. Built-in defaults (embedded `defaults/hamster.yaml`)
//! 2. Application config (`Hamster.yaml`)
//! 3. User patch (`hamster.custom.yaml`)
//! 4. CLI overrides

mod defaults;
mod effective;
mod error;
mod format;
mod merge;
mod model;
mod overrides;
mod swipe;

pub use defaults::{BuiltinDefaults, DEFAULT_CONFIG_YAML};
pub use effective::{
    get_path, ConfigOrigin, ConfigSource, EffectiveConfig, APP_CONFIG_FILE, CUSTOM_CONFIG_FILE,
};
pub use error::ConfigError;
pub use format::Format;
pub use model::{
    CustomKeyboard, GeneralConfiguration, HamsterConfiguration, KeyboardConfiguration,
    RimeConfiguration, ToolbarConfiguration,
};
pub use overrides::{overrides_to_tree, parse_assignment};
pub use swipe::{
    KeySwipe, KeyboardSwipe, KeyboardSwipeConfiguration, SwipeDirection, SwipeKey,
    CHINESE_KEYBOARD_TYPE,
};
