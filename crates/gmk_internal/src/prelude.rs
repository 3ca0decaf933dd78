//! Prelude module for `gmk_internal`.
//!
//! This module provides a convenient way to import commonly used types and traits.
//!
//! # Examples
//!
//! ```rust
//! use gmk_internal::prelude::*;
//!
//! let mut project = Project::new();
//! project.scripts_mut().push(Script::new("scr_hello", "show_message(\"hi\");"));
//! assert_eq!(project.scripts().live_count(), 1);
//! ```

// Re-export everything from gmk_types::prelude
#[doc(inline)]
pub use gmk_types::prelude::*;

// Re-export the entire gmk_types module for advanced usage
#[doc(inline)]
pub use gmk_types;
