// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! In-memory config store fake for preference tests without filesystem I/O.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};
use xform_app_core::config::{ConfigError, ConfigStore};

/// In-memory [`ConfigStore`] with call counters and injectable failures.
///
/// Clones share state, so a test can hand one clone to a `ConfigService`
/// and inspect the other.
///
/// ```
/// use xform_app_core::{ConfigService, ManipulatorPrefs, PrefsPort};
/// use xform_dry_tests::InMemoryConfigStore;
///
/// let store = InMemoryConfigStore::new();
/// let service = ConfigService::new(store.clone());
/// service.save_manipulator_prefs(&ManipulatorPrefs::default());
/// assert_eq!(store.save_count(), 1);
/// assert!(store.contains_key("manipulator_prefs"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryConfigStore {
    state: Arc<Mutex<StoreState>>,
}

#[derive(Debug, Default)]
struct StoreState {
    blobs: BTreeMap<String, Vec<u8>>,
    loads: usize,
    saves: usize,
    fail_loads: bool,
    fail_saves: bool,
}

impl InMemoryConfigStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with `(key, blob)` pairs.
    pub fn with_blobs<I, K>(blobs: I) -> Self
    where
        I: IntoIterator<Item = (K, Vec<u8>)>,
        K: Into<String>,
    {
        let store = Self::new();
        store.state().blobs = blobs.into_iter().map(|(k, v)| (k.into(), v)).collect();
        store
    }

    fn state(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Makes every subsequent load fail with `ConfigError::Other`.
    pub fn set_fail_on_load(&self, fail: bool) {
        self.state().fail_loads = fail;
    }

    /// Makes every subsequent save fail with `ConfigError::Other`.
    pub fn set_fail_on_save(&self, fail: bool) {
        self.state().fail_saves = fail;
    }

    /// Load attempts so far, failed ones included.
    pub fn load_count(&self) -> usize {
        self.state().loads
    }

    /// Save attempts so far, failed ones included.
    pub fn save_count(&self) -> usize {
        self.state().saves
    }

    /// Stored keys in sorted order.
    pub fn keys(&self) -> Vec<String> {
        self.state().blobs.keys().cloned().collect()
    }

    /// True when `key` holds a blob.
    pub fn contains_key(&self, key: &str) -> bool {
        self.state().blobs.contains_key(key)
    }

    /// Raw blob under `key`.
    pub fn blob(&self, key: &str) -> Option<Vec<u8>> {
        self.state().blobs.get(key).cloned()
    }

    /// Drops blobs, counters and failure flags.
    pub fn reset(&self) {
        *self.state() = StoreState::default();
    }
}

impl ConfigStore for InMemoryConfigStore {
    fn load_raw(&self, key: &str) -> Result<Vec<u8>, ConfigError> {
        let mut state = self.state();
        state.loads += 1;
        if state.fail_loads {
            return Err(ConfigError::Other("simulated load failure".into()));
        }
        state.blobs.get(key).cloned().ok_or(ConfigError::NotFound)
    }

    fn save_raw(&self, key: &str, data: &[u8]) -> Result<(), ConfigError> {
        let mut state = self.state();
        state.saves += 1;
        if state.fail_saves {
            return Err(ConfigError::Other("simulated save failure".into()));
        }
        state.blobs.insert(key.to_owned(), data.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_then_load_counts_both_calls() {
        let store = InMemoryConfigStore::new();
        store.save_raw("prefs", b"{}").unwrap();
        assert_eq!(store.load_raw("prefs").unwrap(), b"{}");
        assert_eq!((store.save_count(), store.load_count()), (1, 1));
    }

    #[test]
    fn missing_key_is_not_found() {
        let store = InMemoryConfigStore::new();
        assert!(matches!(store.load_raw("nope"), Err(ConfigError::NotFound)));
    }

    #[test]
    fn failures_are_counted_and_store_nothing() {
        let store = InMemoryConfigStore::new();
        store.set_fail_on_save(true);
        assert!(matches!(store.save_raw("k", b"v"), Err(ConfigError::Other(_))));
        assert_eq!(store.save_count(), 1);
        assert!(!store.contains_key("k"));

        store.set_fail_on_load(true);
        assert!(store.load_raw("k").is_err());
        assert_eq!(store.load_count(), 1);
    }

    #[test]
    fn clones_share_state_and_reset() {
        let a = InMemoryConfigStore::with_blobs([("one", b"1".to_vec())]);
        let b = a.clone();
        b.save_raw("two", b"2").unwrap();
        assert_eq!(a.keys(), vec!["one".to_owned(), "two".to_owned()]);

        a.set_fail_on_save(true);
        b.reset();
        assert!(a.keys().is_empty());
        a.save_raw("three", b"3").unwrap();
        assert_eq!(b.blob("three"), Some(b"3".to_vec()));
    }
}
