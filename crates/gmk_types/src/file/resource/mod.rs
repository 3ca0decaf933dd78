//! Resource kinds and the encode/decode contract they share.
//!
//! Every kind implements [`Resource`]: a common header (`exists`, name and,
//! for the 8.1 lineage, a last-changed timestamp) followed by the kind's own
//! fields in a lineage-specific order. A slot whose `exists` flag is false is a
//! tombstone: it keeps its position, and with it the ids of every later slot,
//! but carries no data.
//!
//! # Two-phase references
//!
//! Fields that point at other resources are read as plain indices into a
//! [`ResourceRef::Raw`], because the referent may not be decoded yet. Once
//! every collection exists, [`Resource::finalize`] swaps each raw index for a
//! [`ResourceRef::Resolved`] handle, checking it against a [`ReferenceTable`]
//! snapshot. Finalize never reads another resource, so resources can be
//! resolved in any order.

use serde::{Deserialize, Serialize};

use super::{
	GmkError,
	stream::Stream,
	timestamp::Timestamp,
	tree::GroupKind,
	version::Lineage,
};

mod action;
mod background;
mod font;
mod game_info;
mod include_file;
mod object;
mod path;
mod room;
mod script;
mod sound;
mod sprite;
mod timeline;
mod trigger;

pub use action::{Action, ActionKind, AppliesTo};
pub use background::{Background, Tiling};
pub use font::Font;
pub use game_info::GameInformation;
pub use include_file::{ExportPolicy, IncludeFile};
pub use object::{Event, Object};
pub use path::{Connection, Path, PathPoint};
pub use room::{Instance, Room, Tile};
pub use script::Script;
pub use sound::{Sound, SoundEffects, SoundKind};
pub use sprite::{BoundingBox, BoundingBoxMode, MaskShape, Sprite, Subimage};
pub use timeline::{Moment, Timeline};
pub use trigger::{CheckMoment, Trigger};

/// The closed set of collection-backed resource kinds.
///
/// The declaration order is the order in which collections appear in the
/// resource block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum ResourceKind {
	/// Tileable background images
	Background = 0,
	/// Sprites
	Sprite = 1,
	/// Sounds and music
	Sound = 2,
	/// Paths
	Path = 3,
	/// Scripts
	Script = 4,
	/// Fonts
	Font = 5,
	/// Timelines
	Timeline = 6,
	/// Objects
	Object = 7,
	/// Rooms
	Room = 8,
	/// Triggers
	Trigger = 9,
	/// Included files
	IncludeFile = 10,
}

impl ResourceKind {
	/// Number of kinds
	pub const COUNT: usize = 11;

	/// All kinds in resource block order
	pub const ALL: [ResourceKind; Self::COUNT] = [
		Self::Background,
		Self::Sprite,
		Self::Sound,
		Self::Path,
		Self::Script,
		Self::Font,
		Self::Timeline,
		Self::Object,
		Self::Room,
		Self::Trigger,
		Self::IncludeFile,
	];

	/// Zero-based position in [`ResourceKind::ALL`]
	pub fn ordinal(self) -> usize {
		self as usize
	}

	/// The resource tree category holding resources of this kind, if any
	pub fn group(self) -> Option<GroupKind> {
		match self {
			Self::Background => Some(GroupKind::Backgrounds),
			Self::Sprite => Some(GroupKind::Sprites),
			Self::Sound => Some(GroupKind::Sounds),
			Self::Path => Some(GroupKind::Paths),
			Self::Script => Some(GroupKind::Scripts),
			Self::Font => Some(GroupKind::Fonts),
			Self::Timeline => Some(GroupKind::Timelines),
			Self::Object => Some(GroupKind::Objects),
			Self::Room => Some(GroupKind::Rooms),
			Self::Trigger | Self::IncludeFile => None,
		}
	}
}

impl std::fmt::Display for ResourceKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let name = match self {
			Self::Background => "Background",
			Self::Sprite => "Sprite",
			Self::Sound => "Sound",
			Self::Path => "Path",
			Self::Script => "Script",
			Self::Font => "Font",
			Self::Timeline => "Timeline",
			Self::Object => "Object",
			Self::Room => "Room",
			Self::Trigger => "Trigger",
			Self::IncludeFile => "Include File",
		};
		f.write_str(name)
	}
}

/// Fields shared by every resource kind.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ResourceMeta {
	/// Position in the owning collection
	#[serde(skip)]
	pub(crate) id: usize,

	/// False for tombstone slots
	pub exists: bool,

	/// Resource name
	pub name: String,

	/// Last modification time (8.1 lineage only)
	pub last_changed: Timestamp,
}

impl ResourceMeta {
	/// Creates the header of a live resource
	pub fn named(name: impl Into<String>) -> Self {
		Self {
			id: 0,
			exists: true,
			name: name.into(),
			last_changed: Timestamp::default(),
		}
	}
}

/// Typed position of a resource within its collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Handle {
	kind: ResourceKind,
	index: usize,
}

impl Handle {
	/// Creates a handle
	pub fn new(kind: ResourceKind, index: usize) -> Self {
		Self {
			kind,
			index,
		}
	}

	/// Kind of the referenced resource
	pub fn kind(&self) -> ResourceKind {
		self.kind
	}

	/// Index of the referenced resource
	pub fn index(&self) -> usize {
		self.index
	}
}

/// An index as read from the stream, before it has been checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RawRef {
	/// Kind the index points into
	pub kind: ResourceKind,
	/// Stored index
	pub index: i32,
}

/// A cross-resource reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ResourceRef {
	/// No referent (stored as `-1`)
	#[default]
	Empty,
	/// Decoded but not yet resolved
	Raw(RawRef),
	/// Checked against the owning project
	Resolved(Handle),
}

impl ResourceRef {
	/// Creates an unresolved reference
	pub fn raw(kind: ResourceKind, index: i32) -> Self {
		Self::Raw(RawRef {
			kind,
			index,
		})
	}

	/// Reads a stored index. Negative values mean "no referent".
	pub fn read(stream: &mut Stream, kind: ResourceKind) -> Result<Self, GmkError> {
		Ok(Self::from_index(kind, stream.read_i32()?))
	}

	/// Builds a reference from a stored index
	pub fn from_index(kind: ResourceKind, index: i32) -> Self {
		if index < 0 {
			Self::Empty
		} else {
			Self::raw(kind, index)
		}
	}

	/// Writes the stored index (`-1` for [`ResourceRef::Empty`])
	pub fn write(&self, stream: &mut Stream) {
		stream.write_i32(self.stored_index());
	}

	/// The index this reference persists as
	pub fn stored_index(&self) -> i32 {
		match self {
			Self::Empty => -1,
			Self::Raw(raw) => raw.index,
			Self::Resolved(handle) => handle.index as i32,
		}
	}

	/// Returns the handle once resolved
	pub fn handle(&self) -> Option<Handle> {
		match self {
			Self::Resolved(handle) => Some(*handle),
			_ => None,
		}
	}

	/// Returns true if the reference still holds an unchecked index
	pub fn is_raw(&self) -> bool {
		matches!(self, Self::Raw(_))
	}

	/// Resolves a raw index against the table; returns the raw index on failure
	pub fn resolve(&mut self, table: &ReferenceTable) -> Result<(), RawRef> {
		if let Self::Raw(raw) = *self {
			let handle = table.resolve(raw).ok_or(raw)?;
			*self = Self::Resolved(handle);
		}
		Ok(())
	}

	/// Checks the reference against the table without resolving it.
	///
	/// Resolved handles are checked too, since the slot they name may have
	/// been removed or turned into a tombstone after resolution.
	pub fn check(&self, table: &ReferenceTable) -> Result<(), RawRef> {
		match *self {
			Self::Empty => Ok(()),
			Self::Raw(raw) => table.resolve(raw).map(|_| ()).ok_or(raw),
			Self::Resolved(handle) if table.exists(handle.kind, handle.index) => Ok(()),
			Self::Resolved(handle) => Err(RawRef {
				kind: handle.kind,
				index: handle.index as i32,
			}),
		}
	}

	/// Adjusts the reference after a slot of `kind` at `removed` was deleted.
	///
	/// References to the removed slot become [`ResourceRef::Empty`]; references
	/// to later slots shift down by one.
	pub fn shift_after_removal(&mut self, kind: ResourceKind, removed: usize) {
		let (ref_kind, index) = match *self {
			Self::Empty => return,
			Self::Raw(raw) if raw.index >= 0 => (raw.kind, raw.index as usize),
			Self::Raw(_) => return,
			Self::Resolved(handle) => (handle.kind, handle.index),
		};
		if ref_kind != kind || index < removed {
			return;
		}
		if index == removed {
			*self = Self::Empty;
			return;
		}
		match self {
			Self::Raw(raw) => raw.index -= 1,
			Self::Resolved(handle) => handle.index -= 1,
			Self::Empty => {}
		}
	}
}

impl From<Handle> for ResourceRef {
	fn from(handle: Handle) -> Self {
		Self::Resolved(handle)
	}
}

/// Snapshot of which slots exist, per kind, used by the finalize pass.
#[derive(Debug, Clone, Default)]
pub struct ReferenceTable {
	slots: [Vec<bool>; ResourceKind::COUNT],
}

impl ReferenceTable {
	/// Creates an empty table
	pub fn new() -> Self {
		Self::default()
	}

	/// Records the exists flags of one collection
	pub fn insert<T: Resource>(&mut self, collection: &Collection<T>) {
		self.slots[T::KIND.ordinal()] = collection.iter().map(Resource::exists).collect();
	}

	/// Returns true if `index` names a live slot of `kind`
	pub fn exists(&self, kind: ResourceKind, index: usize) -> bool {
		self.slots[kind.ordinal()].get(index).copied().unwrap_or(false)
	}

	/// Resolves a raw index to a handle
	pub fn resolve(&self, raw: RawRef) -> Option<Handle> {
		let index = usize::try_from(raw.index).ok()?;
		self.exists(raw.kind, index).then(|| Handle::new(raw.kind, index))
	}
}

/// Encode/decode contract shared by every collection-backed resource kind.
pub trait Resource: Default + std::fmt::Debug {
	/// The kind implemented by this type
	const KIND: ResourceKind;

	/// Shared header fields
	fn meta(&self) -> &ResourceMeta;

	/// Shared header fields, mutably
	fn meta_mut(&mut self) -> &mut ResourceMeta;

	/// Reads the kind's own fields in the lineage's order
	fn read_fields(&mut self, lineage: Lineage, stream: &mut Stream) -> Result<(), GmkError>;

	/// Writes the kind's own fields in the lineage's order
	fn write_fields(&self, lineage: Lineage, stream: &mut Stream) -> Result<(), GmkError>;

	/// Whether the lineage has any representation of this kind
	fn represented_in(_lineage: Lineage) -> bool {
		true
	}

	/// Visits every cross-resource reference held by this resource
	fn for_each_ref(&mut self, _f: &mut dyn FnMut(&mut ResourceRef)) {}

	/// Positional id within the owning collection
	fn id(&self) -> usize {
		self.meta().id
	}

	/// False for tombstone slots
	fn exists(&self) -> bool {
		self.meta().exists
	}

	/// Resource name
	fn name(&self) -> &str {
		&self.meta().name
	}

	/// Decodes one resource from its framed block.
	///
	/// A tombstone, or a kind the lineage cannot represent, decodes to the
	/// kind's default with `exists == false`.
	fn decode(lineage: Lineage, stream: &mut Stream, id: usize) -> Result<Self, GmkError> {
		let mut resource = Self::default();
		resource.meta_mut().id = id;

		if !Self::represented_in(lineage) || !stream.read_bool()? {
			return Ok(resource);
		}

		let meta = resource.meta_mut();
		meta.exists = true;
		meta.name = stream.read_string()?;
		if lineage.has_timestamps() {
			meta.last_changed = stream.read_timestamp()?;
		}

		resource.read_fields(lineage, stream)?;
		Ok(resource)
	}

	/// Encodes this resource into its framed block
	fn encode(&self, lineage: Lineage, stream: &mut Stream) -> Result<(), GmkError> {
		if !Self::represented_in(lineage) {
			return Ok(());
		}

		stream.write_bool(self.exists());
		if !self.exists() {
			return Ok(());
		}

		stream.write_string(self.name())?;
		if lineage.has_timestamps() {
			stream.write_timestamp(self.meta().last_changed);
		}
		self.write_fields(lineage, stream)
	}

	/// Resolves every raw reference against the table
	fn finalize(&mut self, table: &ReferenceTable) -> Result<(), GmkError> {
		self.visit_refs(&mut |reference| reference.resolve(table))
	}

	/// Checks every reference against the table, leaving them untouched
	fn verify(&mut self, table: &ReferenceTable) -> Result<(), GmkError> {
		self.visit_refs(&mut |reference| reference.check(table))
	}

	/// Runs `f` over every reference of a live resource, stopping at the first failure
	fn visit_refs(&mut self, f: &mut dyn FnMut(&mut ResourceRef) -> Result<(), RawRef>) -> Result<(), GmkError> {
		if !self.exists() {
			return Ok(());
		}

		let mut dangling = None;
		self.for_each_ref(&mut |reference| {
			if dangling.is_none() {
				dangling = f(reference).err();
			}
		});

		match dangling {
			Some(raw) => Err(GmkError::DanglingReference {
				from: Self::KIND,
				from_id: self.id(),
				to: raw.kind,
				index: raw.index,
			}),
			None => Ok(()),
		}
	}
}

/// Ordered, index-stable collection of one resource kind.
///
/// Ids are positional: `push` assigns the next index and `remove` renumbers
/// every following slot.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Collection<T> {
	items: Vec<T>,
}

impl<T> Default for Collection<T> {
	fn default() -> Self {
		Self {
			items: Vec::new(),
		}
	}
}

impl<T: Resource> Collection<T> {
	/// Creates an empty collection
	pub fn new() -> Self {
		Self::default()
	}

	/// Number of slots, tombstones included
	pub fn len(&self) -> usize {
		self.items.len()
	}

	/// Returns true if there are no slots
	pub fn is_empty(&self) -> bool {
		self.items.is_empty()
	}

	/// Returns the resource at `index`
	pub fn get(&self, index: usize) -> Option<&T> {
		self.items.get(index)
	}

	/// Returns the resource at `index` mutably
	pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
		self.items.get_mut(index)
	}

	/// Looks a resolved handle up
	pub fn by_handle(&self, handle: Handle) -> Option<&T> {
		if handle.kind != T::KIND {
			return None;
		}
		self.get(handle.index)
	}

	/// Finds the first live resource with the given name
	pub fn find(&self, name: &str) -> Option<&T> {
		self.items.iter().find(|item| item.exists() && item.name() == name)
	}

	/// Iterates over all slots
	pub fn iter(&self) -> std::slice::Iter<'_, T> {
		self.items.iter()
	}

	/// Iterates over all slots mutably
	pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
		self.items.iter_mut()
	}

	/// Number of live (non-tombstone) resources
	pub fn live_count(&self) -> usize {
		self.items.iter().filter(|item| item.exists()).count()
	}

	/// Appends a resource and returns its handle
	pub fn push(&mut self, mut item: T) -> Handle {
		let index = self.items.len();
		item.meta_mut().id = index;
		self.items.push(item);
		Handle::new(T::KIND, index)
	}

	/// Appends a tombstone slot
	pub fn push_tombstone(&mut self) -> Handle {
		self.push(T::default())
	}

	/// Removes the slot at `index`, renumbering the slots after it
	pub fn remove(&mut self, index: usize) -> Option<T> {
		if index >= self.items.len() {
			return None;
		}
		let removed = self.items.remove(index);
		for (id, item) in self.items.iter_mut().enumerate().skip(index) {
			item.meta_mut().id = id;
		}
		Some(removed)
	}

	/// Writes `count` followed by one framed block per slot
	pub fn encode(&self, lineage: Lineage, stream: &mut Stream) -> Result<(), GmkError> {
		stream.write_u32(self.items.len() as u32);
		for item in &self.items {
			let mut block = Stream::new();
			item.encode(lineage, &mut block).map_err(|e| e.in_resource(T::KIND, item.id()))?;
			stream.embed(&block)?;
		}
		Ok(())
	}

	/// Reads `count` framed blocks
	pub fn decode(lineage: Lineage, stream: &mut Stream) -> Result<Self, GmkError> {
		let offset = stream.offset();
		let count = stream.read_u32()? as usize;
		// Every framed block carries at least its 4-byte length prefix
		if count > stream.remaining() / 4 {
			return Err(GmkError::underflow(offset + 4, count * 4, stream.remaining()));
		}

		let mut items = Vec::with_capacity(count);
		for id in 0..count {
			let mut block = stream.extract().map_err(|e| e.in_resource(T::KIND, id))?;
			let item = T::decode(lineage, &mut block, id).map_err(|e| e.in_resource(T::KIND, id))?;
			items.push(item);
		}

		Ok(Self {
			items,
		})
	}

	/// Runs the finalize pass over every slot
	pub fn finalize(&mut self, table: &ReferenceTable) -> Result<(), GmkError> {
		self.items.iter_mut().try_for_each(|item| item.finalize(table))
	}

	/// Checks every slot's references without resolving them
	pub fn verify(&mut self, table: &ReferenceTable) -> Result<(), GmkError> {
		self.items.iter_mut().try_for_each(|item| item.verify(table))
	}

	/// Visits every reference held by every slot
	pub fn for_each_ref(&mut self, f: &mut dyn FnMut(&mut ResourceRef)) {
		for item in &mut self.items {
			item.for_each_ref(f);
		}
	}
}

impl<'a, T: Resource> IntoIterator for &'a Collection<T> {
	type Item = &'a T;
	type IntoIter = std::slice::Iter<'a, T>;

	fn into_iter(self) -> Self::IntoIter {
		self.iter()
	}
}

/// Borrowed view of any collection-backed resource.
#[derive(Debug, Clone, Copy)]
pub enum AnyResource<'a> {
	/// A background
	Background(&'a Background),
	/// A sprite
	Sprite(&'a Sprite),
	/// A sound
	Sound(&'a Sound),
	/// A path
	Path(&'a Path),
	/// A script
	Script(&'a Script),
	/// A font
	Font(&'a Font),
	/// A timeline
	Timeline(&'a Timeline),
	/// An object
	Object(&'a Object),
	/// A room
	Room(&'a Room),
	/// A trigger
	Trigger(&'a Trigger),
	/// An included file
	IncludeFile(&'a IncludeFile),
}

impl<'a> AnyResource<'a> {
	/// Shared header fields
	pub fn meta(&self) -> &'a ResourceMeta {
		match *self {
			Self::Background(r) => r.meta(),
			Self::Sprite(r) => r.meta(),
			Self::Sound(r) => r.meta(),
			Self::Path(r) => r.meta(),
			Self::Script(r) => r.meta(),
			Self::Font(r) => r.meta(),
			Self::Timeline(r) => r.meta(),
			Self::Object(r) => r.meta(),
			Self::Room(r) => r.meta(),
			Self::Trigger(r) => r.meta(),
			Self::IncludeFile(r) => r.meta(),
		}
	}

	/// Kind of the resource
	pub fn kind(&self) -> ResourceKind {
		match *self {
			Self::Background(_) => ResourceKind::Background,
			Self::Sprite(_) => ResourceKind::Sprite,
			Self::Sound(_) => ResourceKind::Sound,
			Self::Path(_) => ResourceKind::Path,
			Self::Script(_) => ResourceKind::Script,
			Self::Font(_) => ResourceKind::Font,
			Self::Timeline(_) => ResourceKind::Timeline,
			Self::Object(_) => ResourceKind::Object,
			Self::Room(_) => ResourceKind::Room,
			Self::Trigger(_) => ResourceKind::Trigger,
			Self::IncludeFile(_) => ResourceKind::IncludeFile,
		}
	}

	/// Positional id
	pub fn id(&self) -> usize {
		self.meta().id
	}

	/// Resource name
	pub fn name(&self) -> &'a str {
		&self.meta().name
	}

	/// False for tombstones
	pub fn exists(&self) -> bool {
		self.meta().exists
	}
}

/// Reads a `u32` and maps it through `convert`, reporting the offset on failure.
pub(crate) fn read_enum<T>(
	stream: &mut Stream,
	field: &'static str,
	convert: impl FnOnce(u32) -> Option<T>,
) -> Result<T, GmkError> {
	let offset = stream.offset();
	let value = stream.read_u32()?;
	convert(value).ok_or(GmkError::InvalidValue {
		field,
		value: value as i64,
		offset,
	})
}

/// Reads a `u32` element count, rejecting counts that cannot fit in the
/// remaining bytes given a minimum element size.
pub(crate) fn read_count(stream: &mut Stream, min_element_size: usize) -> Result<usize, GmkError> {
	let offset = stream.offset();
	let count = stream.read_u32()? as usize;
	if count.saturating_mul(min_element_size) > stream.remaining() {
		return Err(GmkError::underflow(
			offset + 4,
			count.saturating_mul(min_element_size),
			stream.remaining(),
		));
	}
	Ok(count)
}

#[cfg(test)]
pub(crate) mod test_util {
	use super::*;

	/// Encodes then decodes one resource through a framed block
	pub fn roundtrip<T: Resource>(resource: &T, lineage: Lineage) -> T {
		let mut block = Stream::new();
		resource.encode(lineage, &mut block).unwrap();

		let mut outer = Stream::new();
		outer.embed(&block).unwrap();

		let mut block = outer.extract().unwrap();
		let decoded = T::decode(lineage, &mut block, resource.id()).unwrap();
		assert!(block.at_end(), "{} block has trailing bytes", T::KIND);
		decoded
	}
}
