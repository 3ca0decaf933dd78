//! This module is separated into its own crate to enable simple dynamic linking for `gmk`, and should not be used directly.

/// `use gmk::prelude::*;` to import commonly used items.
pub mod prelude;

// Re-export gmk_types for convenience
pub use gmk_types;

// Re-export commonly used types at crate root
pub use gmk_types::file::{FormatVersion, GmkError, Project, ResourceKind, SaveOptions};
