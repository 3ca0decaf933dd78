//! Forces dynamic linking of `gmk-rs` when the `dynamic_linking` feature is enabled.
//!
//! This crate should not be used directly.

#![allow(clippy::single_component_path_imports)]

#[allow(unused_imports)]
use gmk_internal;
