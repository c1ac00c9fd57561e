// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Saved manipulator preferences (op search suffixes and threshold).

use serde::{Deserialize, Serialize};
use tracing::warn;
use xform_core::{ManipulatorSettings, EPSILON};

/// Suffixes that mark the op a tool should prefer when guessing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SuffixPrefs {
    /// Preferred rotate op suffix.
    pub rotate: String,
    /// Preferred translate op suffix.
    pub translate: String,
    /// Preferred scale op suffix.
    pub scale: String,
}

/// Preferences for manipulator tools.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManipulatorPrefs {
    /// Op search suffixes.
    pub suffixes: SuffixPrefs,
    /// Near-identity threshold for edits.
    pub epsilon: f64,
}

impl Default for ManipulatorPrefs {
    fn default() -> Self {
        Self {
            suffixes: SuffixPrefs::default(),
            epsilon: EPSILON,
        }
    }
}

impl ManipulatorPrefs {
    /// Settings for an [`xform_core::OpManipulator`].
    ///
    /// A non-finite or non-positive epsilon falls back to [`EPSILON`].
    pub fn settings(&self) -> ManipulatorSettings {
        let epsilon = if self.epsilon.is_finite() && self.epsilon > 0.0 {
            self.epsilon
        } else {
            warn!(epsilon = self.epsilon, "invalid manipulator epsilon, using default");
            EPSILON
        };
        ManipulatorSettings {
            rotate_suffix: self.suffixes.rotate.clone(),
            translate_suffix: self.suffixes.translate.clone(),
            scale_suffix: self.suffixes.scale.clone(),
            epsilon,
        }
    }
}

impl From<&ManipulatorPrefs> for ManipulatorSettings {
    fn from(prefs: &ManipulatorPrefs) -> Self {
        prefs.settings()
    }
}
