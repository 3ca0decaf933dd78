#![allow(clippy::single_component_path_imports)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! `gmk-rs` reads and writes legacy game-project container files, in both the
//! plain 7 layout and the ciphered 8.1 layout.
//!
pub use gmk_internal::*;

#[cfg(all(feature = "dynamic_linking", not(target_family = "wasm")))]
#[allow(unused_imports)]
use gmk_dylib;
