//! Change notification for the settings store

use crate::config::HamsterConfiguration;

/// Receives the new configuration after every committed change.
pub trait ConfigurationObserver {
    fn configuration_changed(&mut self, configuration: &HamsterConfiguration);
}

impl<F> ConfigurationObserver for F
where
    F: FnMut(&HamsterConfiguration),
{
    fn configuration_changed(&mut self, configuration: &HamsterConfiguration) {
        self(configuration)
    }
}

/// Handle returned by [`SettingsStore::subscribe`](super::SettingsStore::subscribe)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(pub(crate) u64);
