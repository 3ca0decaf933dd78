//! Prelude module for `gmk_types`.
//!
//! This module provides a convenient way to import commonly used types, traits, and constants.
//!
//! # Examples
//!
//! ```no_run
//! use gmk_types::prelude::*;
//!
//! let mut project = Project::new();
//! let handle = project.rooms_mut().push(Room::new("rm_start"));
//! assert_eq!(handle.kind(), ResourceKind::Room);
//! ```

// File module types
#[doc(inline)]
pub use crate::file::{
	// Container
	FormatVersion,
	GmkError,
	JunkSize,
	Lineage,
	LoadStage,
	Project,
	SaveOptions,

	// Resources
	AnyResource,
	Background,
	Collection,
	Font,
	GameInformation,
	Handle,
	IncludeFile,
	Object,
	Path,
	Resource,
	ResourceKind,
	ResourceMeta,
	ResourceRef,
	Room,
	Script,
	Sound,
	Sprite,
	Timeline,
	Trigger,

	// Tree
	GroupKind,
	NodeStatus,
	ResourceTree,
	TreeNode,
};

// Re-export the file module for advanced usage
#[doc(inline)]
pub use crate::file;
