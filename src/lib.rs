//! Hamster configuration core
//!
//! Typed model of the Hamster keyboard settings (`Hamster.yaml`), layered
//! loading with provenance, an explicit settings store, and migration of
//! 1.0 preferences. The recursive merge itself lives in `hamster-merge`.

pub mod config;
pub mod migration;
pub mod settings;

pub use config::{ConfigError, EffectiveConfig, Format, HamsterConfiguration};
pub use hamster_merge::{
    deep_merge, merge_layers, resolve_with, BaseWins, ConfigTree, ConflictResolver, MergeError,
    OverlayWins, RejectConflicts, ResolveError,
};
pub use migration::{
    migrate_config_file, migrate_v1, LegacySettings, MigrationOutcome, MigrationReport,
};
pub use settings::{ConfigurationObserver, SettingsStore, SubscriptionId};
