//! Project container: every resource collection, the game information block
//! and the resource tree of one project file.
//!
//! # File layout
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │ u32 magic (1234321)                          │
//! │ u32 version marker                           │
//! ├──────────────────────────────────────────────┤
//! │ [8.1] junkyard carrying the cipher seed      │
//! │ [8.1] u32 checksum of the plain resource blk │
//! ├──────────────────────────────────────────────┤
//! │ embedded resource block (ciphered for 8.1)   │
//! │   embedded backgrounds  (count + blocks)     │
//! │   embedded sprites                           │
//! │   ... one block per kind, in kind order ...  │
//! │   embedded include files                     │
//! │   embedded game information                  │
//! ├──────────────────────────────────────────────┤
//! │ embedded resource tree                       │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! Loading is all-or-nothing: a project is only returned once every resource
//! and tree leaf has been decoded and resolved.

mod load;
mod save;


use std::collections::HashMap;

use serde::Serialize;

use super::{
	GmkError,
	cipher::SwapTables,
	resource::{
		AnyResource, Background, Collection, Font, GameInformation, IncludeFile, Object, Path,
		ReferenceTable, ResourceKind, ResourceRef, Room, Script, Sound, Sprite, Timeline, Trigger,
	},
	tree::ResourceTree,
	version::FormatVersion,
};

pub use load::LoadStage;
pub use save::SaveOptions;

/// Magic number at the start of every project file
pub const MAGIC: u32 = 1_234_321;

/// A decoded project.
#[derive(Debug, Clone, Serialize)]
pub struct Project {
	version: FormatVersion,
	seed: Option<u32>,

	backgrounds: Collection<Background>,
	sprites: Collection<Sprite>,
	sounds: Collection<Sound>,
	paths: Collection<Path>,
	scripts: Collection<Script>,
	fonts: Collection<Font>,
	timelines: Collection<Timeline>,
	objects: Collection<Object>,
	rooms: Collection<Room>,
	triggers: Collection<Trigger>,
	include_files: Collection<IncludeFile>,
	game_information: GameInformation,

	tree: ResourceTree,

	#[serde(skip)]
	tables: HashMap<u32, SwapTables>,
}

impl Default for Project {
	fn default() -> Self {
		Self::new()
	}
}

macro_rules! collection_accessors {
	($($field:ident, $field_mut:ident: $ty:ty;)*) => {
		$(
			#[doc = concat!("Returns the `", stringify!($ty), "` collection")]
			pub fn $field(&self) -> &Collection<$ty> {
				&self.$field
			}

			#[doc = concat!("Returns the `", stringify!($ty), "` collection mutably")]
			pub fn $field_mut(&mut self) -> &mut Collection<$ty> {
				&mut self.$field
			}
		)*
	};
}

impl Project {
	/// Creates an empty 8.1 project with every tree category present
	pub fn new() -> Self {
		Self {
			version: FormatVersion::default(),
			seed: None,
			backgrounds: Collection::new(),
			sprites: Collection::new(),
			sounds: Collection::new(),
			paths: Collection::new(),
			scripts: Collection::new(),
			fonts: Collection::new(),
			timelines: Collection::new(),
			objects: Collection::new(),
			rooms: Collection::new(),
			triggers: Collection::new(),
			include_files: Collection::new(),
			game_information: GameInformation::default(),
			tree: ResourceTree::new(),
			tables: HashMap::new(),
		}
	}

	/// Format version the project was read from or last written as
	pub fn version(&self) -> FormatVersion {
		self.version
	}

	/// Cipher seed the project was read with or last written with
	pub fn seed(&self) -> Option<u32> {
		self.seed
	}

	collection_accessors! {
		backgrounds, backgrounds_mut: Background;
		sprites, sprites_mut: Sprite;
		sounds, sounds_mut: Sound;
		paths, paths_mut: Path;
		scripts, scripts_mut: Script;
		fonts, fonts_mut: Font;
		timelines, timelines_mut: Timeline;
		objects, objects_mut: Object;
		rooms, rooms_mut: Room;
		triggers, triggers_mut: Trigger;
		include_files, include_files_mut: IncludeFile;
	}

	/// Game information block
	pub fn game_information(&self) -> &GameInformation {
		&self.game_information
	}

	/// Game information block, mutably
	pub fn game_information_mut(&mut self) -> &mut GameInformation {
		&mut self.game_information
	}

	/// Resource tree
	pub fn tree(&self) -> &ResourceTree {
		&self.tree
	}

	/// Resource tree, mutably
	pub fn tree_mut(&mut self) -> &mut ResourceTree {
		&mut self.tree
	}

	/// Number of slots of `kind`, tombstones included
	pub fn count(&self, kind: ResourceKind) -> usize {
		match kind {
			ResourceKind::Background => self.backgrounds.len(),
			ResourceKind::Sprite => self.sprites.len(),
			ResourceKind::Sound => self.sounds.len(),
			ResourceKind::Path => self.paths.len(),
			ResourceKind::Script => self.scripts.len(),
			ResourceKind::Font => self.fonts.len(),
			ResourceKind::Timeline => self.timelines.len(),
			ResourceKind::Object => self.objects.len(),
			ResourceKind::Room => self.rooms.len(),
			ResourceKind::Trigger => self.triggers.len(),
			ResourceKind::IncludeFile => self.include_files.len(),
		}
	}

	/// Returns the resource of `kind` at `index`
	pub fn resource(&self, kind: ResourceKind, index: usize) -> Option<AnyResource<'_>> {
		Some(match kind {
			ResourceKind::Background => AnyResource::Background(self.backgrounds.get(index)?),
			ResourceKind::Sprite => AnyResource::Sprite(self.sprites.get(index)?),
			ResourceKind::Sound => AnyResource::Sound(self.sounds.get(index)?),
			ResourceKind::Path => AnyResource::Path(self.paths.get(index)?),
			ResourceKind::Script => AnyResource::Script(self.scripts.get(index)?),
			ResourceKind::Font => AnyResource::Font(self.fonts.get(index)?),
			ResourceKind::Timeline => AnyResource::Timeline(self.timelines.get(index)?),
			ResourceKind::Object => AnyResource::Object(self.objects.get(index)?),
			ResourceKind::Room => AnyResource::Room(self.rooms.get(index)?),
			ResourceKind::Trigger => AnyResource::Trigger(self.triggers.get(index)?),
			ResourceKind::IncludeFile => AnyResource::IncludeFile(self.include_files.get(index)?),
		})
	}

	/// Removes the slot of `kind` at `index`.
	///
	/// Later slots are renumbered. References to the removed slot, in every
	/// resource and in the tree, become [`ResourceRef::Empty`]; references to
	/// later slots shift down by one. Tree leaves bound to the slot are dropped.
	/// Returns false if there is no such slot.
	pub fn remove_resource(&mut self, kind: ResourceKind, index: usize) -> bool {
		let removed = match kind {
			ResourceKind::Background => self.backgrounds.remove(index).is_some(),
			ResourceKind::Sprite => self.sprites.remove(index).is_some(),
			ResourceKind::Sound => self.sounds.remove(index).is_some(),
			ResourceKind::Path => self.paths.remove(index).is_some(),
			ResourceKind::Script => self.scripts.remove(index).is_some(),
			ResourceKind::Font => self.fonts.remove(index).is_some(),
			ResourceKind::Timeline => self.timelines.remove(index).is_some(),
			ResourceKind::Object => self.objects.remove(index).is_some(),
			ResourceKind::Room => self.rooms.remove(index).is_some(),
			ResourceKind::Trigger => self.triggers.remove(index).is_some(),
			ResourceKind::IncludeFile => self.include_files.remove(index).is_some(),
		};
		if !removed {
			return false;
		}

		self.for_each_resource_ref(&mut |reference| reference.shift_after_removal(kind, index));
		self.tree.remove_resource(kind, index);
		true
	}

	/// Visits every cross-resource reference held by every resource
	fn for_each_resource_ref(&mut self, f: &mut dyn FnMut(&mut ResourceRef)) {
		self.backgrounds.for_each_ref(f);
		self.sprites.for_each_ref(f);
		self.sounds.for_each_ref(f);
		self.paths.for_each_ref(f);
		self.scripts.for_each_ref(f);
		self.fonts.for_each_ref(f);
		self.timelines.for_each_ref(f);
		self.objects.for_each_ref(f);
		self.rooms.for_each_ref(f);
		self.triggers.for_each_ref(f);
		self.include_files.for_each_ref(f);
	}

	/// Snapshot of which slots exist, per kind
	pub fn reference_table(&self) -> ReferenceTable {
		let mut table = ReferenceTable::new();
		table.insert(&self.backgrounds);
		table.insert(&self.sprites);
		table.insert(&self.sounds);
		table.insert(&self.paths);
		table.insert(&self.scripts);
		table.insert(&self.fonts);
		table.insert(&self.timelines);
		table.insert(&self.objects);
		table.insert(&self.rooms);
		table.insert(&self.triggers);
		table.insert(&self.include_files);
		table
	}

	/// Resolves every raw reference in every resource and tree leaf.
	///
	/// Every resource resolves against the same snapshot, so the order of the
	/// calls below carries no meaning.
	pub fn finalize(&mut self) -> Result<(), GmkError> {
		let table = self.reference_table();
		self.backgrounds.finalize(&table)?;
		self.sprites.finalize(&table)?;
		self.sounds.finalize(&table)?;
		self.paths.finalize(&table)?;
		self.scripts.finalize(&table)?;
		self.fonts.finalize(&table)?;
		self.timelines.finalize(&table)?;
		self.objects.finalize(&table)?;
		self.rooms.finalize(&table)?;
		self.triggers.finalize(&table)?;
		self.include_files.finalize(&table)?;
		self.tree.finalize(&table)
	}

	/// Cipher tables for `seed`, derived once per project
	fn tables(&mut self, seed: u32) -> &SwapTables {
		self.tables.entry(seed).or_insert_with(|| SwapTables::derive(seed))
	}

	/// Number of live resources across every kind
	pub fn live_count(&self) -> usize {
		self.backgrounds.live_count()
			+ self.sprites.live_count()
			+ self.sounds.live_count()
			+ self.paths.live_count()
			+ self.scripts.live_count()
			+ self.fonts.live_count()
			+ self.timelines.live_count()
			+ self.objects.live_count()
			+ self.rooms.live_count()
			+ self.triggers.live_count()
			+ self.include_files.live_count()
	}

	/// Returns true if no live resource of any kind exists
	pub fn is_empty(&self) -> bool {
		self.live_count() == 0
	}

	/// Returns the name of a live resource, for display
	pub fn resource_name(&self, kind: ResourceKind, index: usize) -> Option<&str> {
		self.resource(kind, index).filter(AnyResource::exists).map(|r| r.name())
	}
}

impl PartialEq for Project {
	/// Compares content only; the cipher table cache is ignored
	fn eq(&self, other: &Self) -> bool {
		self.version == other.version
			&& self.seed == other.seed
			&& self.backgrounds == other.backgrounds
			&& self.sprites == other.sprites
			&& self.sounds == other.sounds
			&& self.paths == other.paths
			&& self.scripts == other.scripts
			&& self.fonts == other.fonts
			&& self.timelines == other.timelines
			&& self.objects == other.objects
			&& self.rooms == other.rooms
			&& self.triggers == other.triggers
			&& self.include_files == other.include_files
			&& self.game_information == other.game_information
			&& self.tree == other.tree
	}
}
