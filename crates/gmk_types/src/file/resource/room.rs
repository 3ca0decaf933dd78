//! Room resources.
//!
//! ```text
//! caption, width, height, speed, persistent, background_color, draw_background_color,
//! creation_code,
//! instance count, per instance: x, y, object (i32), id, creation_code, [8.1] locked
//! tile count, per tile: x, y, background (i32), source_x, source_y, width, height,
//!                       depth, id, [8.1] locked
//! ```

use serde::{Deserialize, Serialize};

use super::{Resource, ResourceKind, ResourceMeta, ResourceRef, read_count};
use crate::file::{GmkError, stream::Stream, version::Lineage};

/// x, y, object, id, creation code length
const MIN_INSTANCE_SIZE: usize = 20;

/// Nine 32-bit fields
const MIN_TILE_SIZE: usize = 36;

/// An object instance placed in a room
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Instance {
	/// X position
	pub x: i32,
	/// Y position
	pub y: i32,
	/// Instantiated object
	pub object: ResourceRef,
	/// Instance id, unique across the project
	pub id: u32,
	/// Code run when the instance is created
	pub creation_code: String,
	/// Locked in the editor (8.1 only)
	pub locked: bool,
}

/// A background tile placed in a room
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Tile {
	/// X position
	pub x: i32,
	/// Y position
	pub y: i32,
	/// Source background
	pub background: ResourceRef,
	/// Source rectangle X
	pub source_x: u32,
	/// Source rectangle Y
	pub source_y: u32,
	/// Source rectangle width
	pub width: u32,
	/// Source rectangle height
	pub height: u32,
	/// Drawing depth
	pub depth: i32,
	/// Tile id, unique across the project
	pub id: u32,
	/// Locked in the editor (8.1 only)
	pub locked: bool,
}

/// Room resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
	/// Shared header
	pub meta: ResourceMeta,
	/// Window caption
	pub caption: String,
	/// Width in pixels
	pub width: u32,
	/// Height in pixels
	pub height: u32,
	/// Steps per second
	pub speed: u32,
	/// Keeps its state when left
	pub persistent: bool,
	/// Background colour, 0x00BBGGRR
	pub background_color: u32,
	/// Clear the view with the background colour
	pub draw_background_color: bool,
	/// Code run when the room starts
	pub creation_code: String,
	/// Placed instances
	pub instances: Vec<Instance>,
	/// Placed tiles
	pub tiles: Vec<Tile>,
}

impl Default for Room {
	fn default() -> Self {
		Self {
			meta: ResourceMeta::default(),
			caption: String::new(),
			width: 640,
			height: 480,
			speed: 30,
			persistent: false,
			background_color: 0x00C0_C0C0,
			draw_background_color: true,
			creation_code: String::new(),
			instances: Vec::new(),
			tiles: Vec::new(),
		}
	}
}

impl Room {
	/// Creates an empty room with the given name
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			meta: ResourceMeta::named(name),
			..Self::default()
		}
	}
}

impl Resource for Room {
	const KIND: ResourceKind = ResourceKind::Room;

	fn meta(&self) -> &ResourceMeta {
		&self.meta
	}

	fn meta_mut(&mut self) -> &mut ResourceMeta {
		&mut self.meta
	}

	fn read_fields(&mut self, lineage: Lineage, stream: &mut Stream) -> Result<(), GmkError> {
		let has_locks = matches!(lineage, Lineage::Gm81);

		self.caption = stream.read_string()?;
		self.width = stream.read_u32()?;
		self.height = stream.read_u32()?;
		self.speed = stream.read_u32()?;
		self.persistent = stream.read_bool()?;
		self.background_color = stream.read_u32()?;
		self.draw_background_color = stream.read_bool()?;
		self.creation_code = stream.read_string()?;

		let count = read_count(stream, MIN_INSTANCE_SIZE)?;
		self.instances = Vec::with_capacity(count);
		for _ in 0..count {
			self.instances.push(Instance {
				x: stream.read_i32()?,
				y: stream.read_i32()?,
				object: ResourceRef::read(stream, ResourceKind::Object)?,
				id: stream.read_u32()?,
				creation_code: stream.read_string()?,
				locked: has_locks && stream.read_bool()?,
			});
		}

		let count = read_count(stream, MIN_TILE_SIZE)?;
		self.tiles = Vec::with_capacity(count);
		for _ in 0..count {
			self.tiles.push(Tile {
				x: stream.read_i32()?,
				y: stream.read_i32()?,
				background: ResourceRef::read(stream, ResourceKind::Background)?,
				source_x: stream.read_u32()?,
				source_y: stream.read_u32()?,
				width: stream.read_u32()?,
				height: stream.read_u32()?,
				depth: stream.read_i32()?,
				id: stream.read_u32()?,
				locked: has_locks && stream.read_bool()?,
			});
		}
		Ok(())
	}

	fn write_fields(&self, lineage: Lineage, stream: &mut Stream) -> Result<(), GmkError> {
		let has_locks = matches!(lineage, Lineage::Gm81);

		stream.write_string(&self.caption)?;
		stream.write_u32(self.width);
		stream.write_u32(self.height);
		stream.write_u32(self.speed);
		stream.write_bool(self.persistent);
		stream.write_u32(self.background_color);
		stream.write_bool(self.draw_background_color);
		stream.write_string(&self.creation_code)?;

		stream.write_u32(self.instances.len() as u32);
		for instance in &self.instances {
			stream.write_i32(instance.x);
			stream.write_i32(instance.y);
			instance.object.write(stream);
			stream.write_u32(instance.id);
			stream.write_string(&instance.creation_code)?;
			if has_locks {
				stream.write_bool(instance.locked);
			}
		}

		stream.write_u32(self.tiles.len() as u32);
		for tile in &self.tiles {
			stream.write_i32(tile.x);
			stream.write_i32(tile.y);
			tile.background.write(stream);
			stream.write_u32(tile.source_x);
			stream.write_u32(tile.source_y);
			stream.write_u32(tile.width);
			stream.write_u32(tile.height);
			stream.write_i32(tile.depth);
			stream.write_u32(tile.id);
			if has_locks {
				stream.write_bool(tile.locked);
			}
		}
		Ok(())
	}

	fn for_each_ref(&mut self, f: &mut dyn FnMut(&mut ResourceRef)) {
		for instance in &mut self.instances {
			f(&mut instance.object);
		}
		for tile in &mut self.tiles {
			f(&mut tile.background);
		}
	}
}
