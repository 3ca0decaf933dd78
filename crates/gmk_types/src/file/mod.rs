//! Project file support: the byte stream, the cipher, every resource kind,
//! the resource tree and the project container that ties them together.

mod error;

pub mod cipher;
pub mod project;
pub mod resource;
pub mod stream;
pub mod timestamp;
pub mod tree;
pub mod version;

// Re-export unified error type
pub use error::GmkError;

// Re-export main types
pub use cipher::{JunkSize, SwapTables};
pub use project::{LoadStage, MAGIC, Project, SaveOptions};
pub use resource::{
	Action, ActionKind, AnyResource, AppliesTo, Background, BoundingBox, BoundingBoxMode, CheckMoment,
	Collection, Connection, Event, ExportPolicy, Font, GameInformation, Handle, IncludeFile, Instance,
	MaskShape, Moment, Object, Path, PathPoint, RawRef, ReferenceTable, Resource, ResourceKind,
	ResourceMeta, ResourceRef, Room, Script, Sound, SoundEffects, SoundKind, Sprite, Subimage, Tile,
	Tiling, Timeline, Trigger,
};
pub use stream::Stream;
pub use timestamp::Timestamp;
pub use tree::{GroupKind, NodeStatus, ResourceTree, TreeNode};
pub use version::{FormatVersion, Lineage};
