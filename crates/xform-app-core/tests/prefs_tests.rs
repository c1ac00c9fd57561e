// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(missing_docs)]
use xform_app_core::{
    ConfigError, ConfigService, ManipulatorPrefs, PrefsPort, SuffixPrefs, MANIPULATOR_PREFS_KEY,
};
use xform_core::{
    ManipulatorSettings, Mat4, OneShot, OpKind, OpStack, Space, TimeCode, Vec3, EPSILON,
};
use xform_dry_tests::{assert_vec3_near, init_tracing, vec_op, InMemoryConfigStore};

fn custom_prefs() -> ManipulatorPrefs {
    ManipulatorPrefs {
        suffixes: SuffixPrefs {
            rotate: "spin".to_owned(),
            translate: "move".to_owned(),
            scale: String::new(),
        },
        epsilon: 1e-4,
    }
}

#[test]
fn prefs_round_trip_through_the_service() {
    let store = InMemoryConfigStore::new();
    let service = ConfigService::new(store.clone());
    assert_eq!(service.load_manipulator_prefs(), None);

    service.save_manipulator_prefs(&custom_prefs());
    assert!(store.contains_key(MANIPULATOR_PREFS_KEY));
    assert_eq!(service.load_manipulator_prefs(), Some(custom_prefs()));
    assert_eq!((store.save_count(), store.load_count()), (1, 2));

    let blob = String::from_utf8(store.blob(MANIPULATOR_PREFS_KEY).unwrap()).unwrap();
    assert!(blob.contains("\"rotate\": \"spin\""), "{blob}");
}

#[test]
fn load_failure_reads_as_missing() {
    init_tracing();
    let store = InMemoryConfigStore::new();
    let service = ConfigService::new(store.clone());
    service.save_manipulator_prefs(&custom_prefs());
    store.set_fail_on_load(true);
    assert_eq!(service.load_manipulator_prefs(), None);

    store.reset();
    assert_eq!(service.load_manipulator_prefs(), None);
    service.save_manipulator_prefs(&custom_prefs());
    assert_eq!(service.load_manipulator_prefs(), Some(custom_prefs()));
    assert_eq!((store.save_count(), store.load_count()), (1, 2));
}

#[test]
fn corrupt_blob_reads_as_missing() {
    init_tracing();
    let store = InMemoryConfigStore::with_blobs([(MANIPULATOR_PREFS_KEY, b"{ not json".to_vec())]);
    let service = ConfigService::new(store);
    assert_eq!(service.load_manipulator_prefs(), None);
    assert!(matches!(
        service.load::<ManipulatorPrefs>(MANIPULATOR_PREFS_KEY),
        Err(ConfigError::Serde(_))
    ));
}

#[test]
fn save_failure_is_swallowed() {
    init_tracing();
    let store = InMemoryConfigStore::new();
    store.set_fail_on_save(true);
    let service = ConfigService::new(store.clone());
    service.save_manipulator_prefs(&custom_prefs());
    assert_eq!(store.save_count(), 1);
    assert!(store.keys().is_empty());
}

#[test]
fn empty_blob_falls_back_to_default() {
    let store = InMemoryConfigStore::with_blobs([("empty", Vec::new())]);
    let service = ConfigService::new(store);
    let prefs: ManipulatorPrefs = service.load_or_default("empty").unwrap();
    assert_eq!(prefs, ManipulatorPrefs::default());
}

#[test]
fn partial_json_keeps_defaults() {
    let json = br#"{ "suffixes": { "rotate": "spin" } }"#;
    let store = InMemoryConfigStore::with_blobs([(MANIPULATOR_PREFS_KEY, json.to_vec())]);
    let prefs = ConfigService::new(store).load_manipulator_prefs().unwrap();
    assert_eq!(prefs.suffixes.rotate, "spin");
    assert!(prefs.suffixes.translate.is_empty());
    assert_eq!(prefs.epsilon, EPSILON);
}

#[test]
fn prefs_become_manipulator_settings() {
    let settings = ManipulatorSettings::from(&custom_prefs());
    assert_eq!(settings.rotate_suffix, "spin");
    assert_eq!(settings.translate_suffix, "move");
    assert!(settings.scale_suffix.is_empty());
    assert_eq!(settings.epsilon, 1e-4);
    assert_eq!(ManipulatorPrefs::default().settings(), ManipulatorSettings::default());
}

#[test]
fn invalid_epsilon_falls_back() {
    init_tracing();
    for epsilon in [0.0, -1.0, f64::NAN, f64::INFINITY] {
        let prefs = ManipulatorPrefs {
            epsilon,
            ..ManipulatorPrefs::default()
        };
        assert_eq!(prefs.settings().epsilon, EPSILON);
    }
}

#[test]
fn saved_suffixes_steer_a_guessed_edit() {
    let store = InMemoryConfigStore::new();
    let service = ConfigService::new(store);
    service.save_manipulator_prefs(&custom_prefs());
    let settings = service.load_manipulator_prefs().unwrap_or_default().settings();

    let mut stack = OpStack::from_ops(vec![
        vec_op(OpKind::Translate, "", [0.0; 3]),
        vec_op(OpKind::Translate, "move", [0.0; 3]),
    ]);
    OneShot::new(&mut stack, "", TimeCode::Default)
        .with_settings(settings)
        .translate(&mut Mat4::identity(), Vec3::new(1.0, 2.0, 3.0), Space::Transform)
        .unwrap();
    assert_vec3_near(stack.ops()[0].vec3(TimeCode::Default), [0.0; 3], 0.0);
    assert_vec3_near(stack.ops()[1].vec3(TimeCode::Default), [1.0, 2.0, 3.0], 1e-12);
}
