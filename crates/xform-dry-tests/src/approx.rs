// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Tolerance assertions for vectors, quaternions and matrices.

use xform_core::{Mat4, Quat, Vec3};

/// Asserts `|actual - expected| <= eps`.
#[track_caller]
pub fn assert_near(actual: f64, expected: f64, eps: f64) {
    assert!(
        (actual - expected).abs() <= eps,
        "expected {expected}, got {actual} (eps {eps})"
    );
}

/// Asserts every component of `actual` is within `eps` of `expected`.
#[track_caller]
pub fn assert_vec3_near(actual: Vec3, expected: [f64; 3], eps: f64) {
    assert!(
        actual.abs_diff_le(&Vec3::from(expected), eps),
        "expected {expected:?}, got {:?} (eps {eps})",
        actual.to_array()
    );
}

/// Asserts two quaternions describe the same rotation (sign ignored).
#[track_caller]
pub fn assert_quat_near(actual: Quat, expected: Quat, eps: f64) {
    let a = actual.to_array();
    let e = expected.to_array();
    let same = a.iter().zip(e).all(|(x, y)| (x - y).abs() <= eps);
    let flipped = a.iter().zip(e).all(|(x, y)| (x + y).abs() <= eps);
    assert!(same || flipped, "expected {e:?}, got {a:?} (eps {eps})");
}

/// Asserts every element of `actual` is within `eps` of `expected`.
#[track_caller]
pub fn assert_mat4_near(actual: &Mat4, expected: &Mat4, eps: f64) {
    assert!(
        actual.abs_diff_le(expected, eps),
        "expected {:?}, got {:?} (eps {eps})",
        expected.to_array(),
        actual.to_array()
    );
}
