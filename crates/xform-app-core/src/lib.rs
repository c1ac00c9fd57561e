// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Shared application services for xform tools (config store port,
//! manipulator preferences). Keeps host adapters thin.
#![forbid(unsafe_code)]

pub mod config;
pub mod prefs;
pub mod prefs_port;

pub use config::{ConfigError, ConfigService, ConfigStore};
pub use prefs::{ManipulatorPrefs, SuffixPrefs};
pub use prefs_port::{PrefsPort, MANIPULATOR_PREFS_KEY};
