// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Shared test doubles and fixtures for xform crates.
#![forbid(unsafe_code)]
//!
//! - [`config`]: in-memory config store fake
//! - [`fixtures`]: canonical stages and op stacks
//! - [`approx`]: tolerance assertions
//! - [`logging`]: test subscriber setup

pub mod approx;
pub mod config;
pub mod fixtures;
pub mod logging;

pub use approx::{assert_mat4_near, assert_near, assert_quat_near, assert_vec3_near};
pub use config::InMemoryConfigStore;
pub use fixtures::{
    matrix_child_stage, matrix_stack, parent_frame, rotated_parent_stage, sample_matrix,
    scaled_parent_stage, trs_stack, vec_op, CHILD, PARENT,
};
pub use logging::init_tracing;
