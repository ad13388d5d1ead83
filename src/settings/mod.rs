//! Settings store
//!
//! Single owner of the authoritative configuration. Every change goes
//! through the store, which persists it (when backed by a file) and then
//! notifies subscribers with the new snapshot.
//!
//! Mutation takes `&mut self`; callers sharing a store across threads wrap it
//! in their own lock.

mod observer;

pub use observer::{ConfigurationObserver, SubscriptionId};

use hamster_merge::ConflictResolver;
use std::path::{Path, PathBuf};

use crate::config::{BuiltinDefaults, ConfigError, HamsterConfiguration};

/// Owner of the live configuration
pub struct SettingsStore {
    configuration: HamsterConfiguration,
    path: Option<PathBuf>,
    observers: Vec<(SubscriptionId, Box<dyn ConfigurationObserver>)>,
    next_id: u64,
}

impl SettingsStore {
    /// In-memory store
    pub fn new(configuration: HamsterConfiguration) -> Self {
        Self {
            configuration,
            path: None,
            observers: Vec::new(),
            next_id: 0,
        }
    }

    /// Store persisted to `path`. Nothing is written until the first change.
    pub fn with_path(configuration: HamsterConfiguration, path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            ..Self::new(configuration)
        }
    }

    /// Open the store backed by `path`, starting from the built-in defaults
    /// if the file does not exist yet.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let configuration = if path.exists() {
            HamsterConfiguration::from_file(&path)?
        } else {
            tracing::info!(
                path = %path.display(),
                "no configuration file, using built-in defaults"
            );
            BuiltinDefaults.configuration()?
        };
        Ok(Self::with_path(configuration, path))
    }

    pub fn configuration(&self) -> &HamsterConfiguration {
        &self.configuration
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Apply a change.
    ///
    /// The change is made on a copy; the live configuration is only replaced
    /// once the copy has been persisted.
    pub fn update<F>(&mut self, mutate: F) -> Result<(), ConfigError>
    where
        F: FnOnce(&mut HamsterConfiguration),
    {
        let mut next = self.configuration.clone();
        mutate(&mut next);
        self.commit(next)
    }

    /// Merge `overlay` into the live configuration.
    pub fn apply_patch<R>(
        &mut self,
        overlay: &HamsterConfiguration,
        resolver: &R,
    ) -> Result<(), ConfigError>
    where
        R: ConflictResolver + ?Sized,
    {
        let next = self.configuration.merge(overlay, resolver)?;
        self.commit(next)
    }

    /// Replace the live configuration wholesale.
    pub fn replace(&mut self, configuration: HamsterConfiguration) -> Result<(), ConfigError> {
        self.commit(configuration)
    }

    fn commit(&mut self, next: HamsterConfiguration) -> Result<(), ConfigError> {
        if next == self.configuration {
            tracing::debug!("configuration unchanged");
            return Ok(());
        }

        if let Some(path) = &self.path {
            next.write_to_file(path)?;
            tracing::info!(path = %path.display(), "configuration saved");
        }

        self.configuration = next;
        for (_, observer) in self.observers.iter_mut() {
            observer.configuration_changed(&self.configuration);
        }
        Ok(())
    }

    pub fn subscribe(&mut self, observer: Box<dyn ConfigurationObserver>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.observers.push((id, observer));
        id
    }

    /// Returns false if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sid, _)| *sid != id);
        self.observers.len() != before
    }

    pub fn enable_color_schema(&self) -> bool {
        self.configuration
            .keyboard
            .as_ref()
            .and_then(|k| k.enable_color_schema)
            .unwrap_or(false)
    }

    pub fn set_enable_color_schema(&mut self, enabled: bool) -> Result<(), ConfigError> {
        self.update(|c| c.keyboard_mut().enable_color_schema = Some(enabled))
    }

    pub fn enable_apple_cloud(&self) -> bool {
        self.configuration
            .general
            .as_ref()
            .and_then(|g| g.enable_apple_cloud)
            .unwrap_or(false)
    }

    pub fn set_enable_apple_cloud(&mut self, enabled: bool) -> Result<(), ConfigError> {
        self.update(|c| c.general_mut().enable_apple_cloud = Some(enabled))
    }
}

impl std::fmt::Debug for SettingsStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettingsStore")
            .field("configuration", &self.configuration)
            .field("path", &self.path)
            .field("observers", &self.observers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recording_store() -> (SettingsStore, Rc<RefCell<Vec<HamsterConfiguration>>>) {
        let mut store = SettingsStore::new(HamsterConfiguration::default());
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        store.subscribe(Box::new(move |c: &HamsterConfiguration| {
            sink.borrow_mut().push(c.clone())
        }));
        (store, seen)
    }

    #[test]
    fn test_accessors_default_to_false() {
        let store = SettingsStore::new(HamsterConfiguration::default());
        assert!(!store.enable_color_schema());
        assert!(!store.enable_apple_cloud());
    }

    #[test]
    fn test_setter_creates_missing_section() {
        let mut store = SettingsStore::new(HamsterConfiguration::default());
        store.set_enable_color_schema(true).unwrap();

        assert!(store.enable_color_schema());
        assert_eq!(
            store.configuration().keyboard.as_ref().unwrap().enable_color_schema,
            Some(true)
        );
    }

    #[test]
    fn test_observers_notified_once_per_change() {
        let (mut store, seen) = recording_store();

        store.set_enable_apple_cloud(true).unwrap();
        store.set_enable_apple_cloud(true).unwrap(); // no-op

        assert_eq!(seen.borrow().len(), 1);
        assert_eq!(
            seen.borrow()[0].general.as_ref().unwrap().enable_apple_cloud,
            Some(true)
        );
    }

    #[test]
    fn test_unsubscribe() {
        let mut store = SettingsStore::new(HamsterConfiguration::default());
        let count = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&count);
        let id = store.subscribe(Box::new(move |_: &HamsterConfiguration| {
            *sink.borrow_mut() += 1
        }));

        store.set_enable_color_schema(true).unwrap();
        assert!(store.unsubscribe(id));
        assert!(!store.unsubscribe(id));
        store.set_enable_color_schema(false).unwrap();

        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn test_failed_patch_leaves_state_untouched() {
        let (mut store, seen) = recording_store();
        store.set_enable_apple_cloud(false).unwrap();

        let mut overlay = HamsterConfiguration::default();
        overlay.general_mut().enable_apple_cloud = Some(true);
        let result = store.apply_patch(&overlay, &hamster_merge::RejectConflicts);

        assert!(matches!(result, Err(ConfigError::Merge(_))));
        assert!(!store.enable_apple_cloud());
        assert_eq!(seen.borrow().len(), 1);
    }
}
