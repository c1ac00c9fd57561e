// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Prefs port shared by manipulator tools.

use tracing::warn;

use crate::config::{ConfigService, ConfigStore};
use crate::prefs::ManipulatorPrefs;

/// Config key the manipulator preferences live under.
pub const MANIPULATOR_PREFS_KEY: &str = "manipulator_prefs";

/// Loads and saves manipulator preferences.
pub trait PrefsPort {
    /// Saved preferences, `None` when missing or unreadable.
    fn load_manipulator_prefs(&self) -> Option<ManipulatorPrefs>;
    /// Persists preferences (best effort; failures are logged).
    fn save_manipulator_prefs(&self, prefs: &ManipulatorPrefs);
}

impl<S> PrefsPort for ConfigService<S>
where
    S: ConfigStore,
{
    fn load_manipulator_prefs(&self) -> Option<ManipulatorPrefs> {
        self.load(MANIPULATOR_PREFS_KEY).unwrap_or_else(|err| {
            warn!(%err, key = MANIPULATOR_PREFS_KEY, "failed to load manipulator prefs");
            None
        })
    }

    fn save_manipulator_prefs(&self, prefs: &ManipulatorPrefs) {
        if let Err(err) = self.save(MANIPULATOR_PREFS_KEY, prefs) {
            warn!(%err, key = MANIPULATOR_PREFS_KEY, "failed to save manipulator prefs");
        }
    }
}
