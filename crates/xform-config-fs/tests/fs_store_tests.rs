// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(missing_docs)]
use xform_app_core::{ConfigError, ConfigService, ConfigStore, ManipulatorPrefs, PrefsPort};
use xform_config_fs::FsConfigStore;
use xform_dry_tests::init_tracing;

#[test]
fn with_base_creates_the_directory() {
    let dir = tempfile::tempdir().unwrap();
    let base = dir.path().join("nested").join("xform");
    let store = FsConfigStore::with_base(&base).unwrap();
    assert!(base.is_dir());
    assert_eq!(store.base(), base.as_path());
}

#[test]
fn blobs_live_in_key_named_json_files() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let store = FsConfigStore::with_base(dir.path()).unwrap();
    store.save_raw("session", b"{\"a\":1}").unwrap();
    assert_eq!(std::fs::read(dir.path().join("session.json")).unwrap(), b"{\"a\":1}");
    assert_eq!(store.load_raw("session").unwrap(), b"{\"a\":1}");
}

#[test]
fn missing_key_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let store = FsConfigStore::with_base(dir.path()).unwrap();
    assert!(matches!(store.load_raw("absent"), Err(ConfigError::NotFound)));
}

#[test]
fn unreadable_entry_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let store = FsConfigStore::with_base(dir.path()).unwrap();
    std::fs::create_dir(dir.path().join("folder.json")).unwrap();
    assert!(matches!(store.load_raw("folder"), Err(ConfigError::Io(_))));
}

#[test]
fn prefs_survive_a_new_store() {
    let dir = tempfile::tempdir().unwrap();
    let prefs = ManipulatorPrefs {
        epsilon: 1e-3,
        ..ManipulatorPrefs::default()
    };
    ConfigService::new(FsConfigStore::with_base(dir.path()).unwrap()).save_manipulator_prefs(&prefs);

    let reopened = ConfigService::new(FsConfigStore::with_base(dir.path()).unwrap());
    assert_eq!(reopened.load_manipulator_prefs(), Some(prefs));
}
