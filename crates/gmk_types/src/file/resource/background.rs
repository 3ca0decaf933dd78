//! Background resources.
//!
//! 7 lineage: image settings first, then tiling.
//!
//! ```text
//! width, height, transparent, smooth_edges, preload,
//! use_as_tileset, tile_width, tile_height, h_offset, v_offset, h_sep, v_sep,
//! has_data, [blob]
//! ```
//!
//! 8.1 lineage: tiling first, then image settings.
//!
//! ```text
//! use_as_tileset, tile_width, tile_height, h_offset, v_offset, h_sep, v_sep,
//! width, height, transparent, smooth_edges, preload,
//! has_data, [blob]
//! ```

use serde::{Deserialize, Serialize};

use super::{Resource, ResourceKind, ResourceMeta};
use crate::file::{GmkError, stream::Stream, version::Lineage};

/// Tile grid settings of a background used as a tileset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tiling {
	/// Tile width in pixels
	pub tile_width: u32,
	/// Tile height in pixels
	pub tile_height: u32,
	/// Horizontal offset of the first tile
	pub horizontal_offset: u32,
	/// Vertical offset of the first tile
	pub vertical_offset: u32,
	/// Horizontal gap between tiles
	pub horizontal_separation: u32,
	/// Vertical gap between tiles
	pub vertical_separation: u32,
}

impl Default for Tiling {
	fn default() -> Self {
		Self {
			tile_width: 16,
			tile_height: 16,
			horizontal_offset: 0,
			vertical_offset: 0,
			horizontal_separation: 0,
			vertical_separation: 0,
		}
	}
}

/// Background resource
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Background {
	/// Shared header
	pub meta: ResourceMeta,
	/// Width in pixels
	pub width: u32,
	/// Height in pixels
	pub height: u32,
	/// Bottom-left pixel color is transparent
	pub transparent: bool,
	/// Smooth transparent edges
	pub smooth_edges: bool,
	/// Load the texture at game start
	pub preload: bool,
	/// Whether the tile grid is used
	pub use_as_tileset: bool,
	/// Tile grid
	pub tiling: Tiling,
	/// Raw pixel data
	#[serde(skip)]
	pub data: Option<Vec<u8>>,
}

impl Background {
	/// Creates an empty background with the given name
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			meta: ResourceMeta::named(name),
			..Self::default()
		}
	}

	fn read_image(&mut self, stream: &mut Stream) -> Result<(), GmkError> {
		self.width = stream.read_u32()?;
		self.height = stream.read_u32()?;
		self.transparent = stream.read_bool()?;
		self.smooth_edges = stream.read_bool()?;
		self.preload = stream.read_bool()?;
		Ok(())
	}

	fn write_image(&self, stream: &mut Stream) {
		stream.write_u32(self.width);
		stream.write_u32(self.height);
		stream.write_bool(self.transparent);
		stream.write_bool(self.smooth_edges);
		stream.write_bool(self.preload);
	}

	fn read_tiling(&mut self, stream: &mut Stream) -> Result<(), GmkError> {
		self.use_as_tileset = stream.read_bool()?;
		self.tiling = Tiling {
			tile_width: stream.read_u32()?,
			tile_height: stream.read_u32()?,
			horizontal_offset: stream.read_u32()?,
			vertical_offset: stream.read_u32()?,
			horizontal_separation: stream.read_u32()?,
			vertical_separation: stream.read_u32()?,
		};
		Ok(())
	}

	fn write_tiling(&self, stream: &mut Stream) {
		stream.write_bool(self.use_as_tileset);
		stream.write_u32(self.tiling.tile_width);
		stream.write_u32(self.tiling.tile_height);
		stream.write_u32(self.tiling.horizontal_offset);
		stream.write_u32(self.tiling.vertical_offset);
		stream.write_u32(self.tiling.horizontal_separation);
		stream.write_u32(self.tiling.vertical_separation);
	}
}

impl Resource for Background {
	const KIND: ResourceKind = ResourceKind::Background;

	fn meta(&self) -> &ResourceMeta {
		&self.meta
	}

	fn meta_mut(&mut self) -> &mut ResourceMeta {
		&mut self.meta
	}

	fn read_fields(&mut self, lineage: Lineage, stream: &mut Stream) -> Result<(), GmkError> {
		match lineage {
			Lineage::Gm7 => {
				self.read_image(stream)?;
				self.read_tiling(stream)?;
			}
			Lineage::Gm81 => {
				self.read_tiling(stream)?;
				self.read_image(stream)?;
			}
		}
		self.data = if stream.read_bool()? {
			Some(stream.read_blob()?)
		} else {
			None
		};
		Ok(())
	}

	fn write_fields(&self, lineage: Lineage, stream: &mut Stream) -> Result<(), GmkError> {
		match lineage {
			Lineage::Gm7 => {
				self.write_image(stream);
				self.write_tiling(stream);
			}
			Lineage::Gm81 => {
				self.write_tiling(stream);
				self.write_image(stream);
			}
		}
		stream.write_bool(self.data.is_some());
		if let Some(data) = &self.data {
			stream.write_blob(data)?;
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::file::resource::test_util::roundtrip;

	fn sample() -> Background {
		Background {
			width: 64,
			height: 32,
			transparent: true,
			preload: true,
			use_as_tileset: true,
			tiling: Tiling {
				tile_width: 8,
				tile_height: 8,
				horizontal_offset: 1,
				vertical_offset: 2,
				horizontal_separation: 3,
				vertical_separation: 4,
			},
			data: Some(vec![0xAB; 64 * 32 * 4]),
			..Background::new("bg_tiles")
		}
	}

	#[test]
	fn test_roundtrip_both_lineages() {
		let background = sample();
		assert_eq!(roundtrip(&background, Lineage::Gm7), background);
		assert_eq!(roundtrip(&background, Lineage::Gm81), background);
	}

	#[test]
	fn test_lineages_order_fields_differently() {
		let background = sample();
		let mut gm7 = Stream::new();
		let mut gm81 = Stream::new();
		background.write_fields(Lineage::Gm7, &mut gm7).unwrap();
		background.write_fields(Lineage::Gm81, &mut gm81).unwrap();

		assert_eq!(gm7.len(), gm81.len());
		// Width leads the 7 layout, the tileset flag leads the 8.1 one
		assert_eq!(gm7.read_u32().unwrap(), 64);
		assert!(gm81.read_bool().unwrap());
		assert_eq!(gm81.read_u32().unwrap(), 8);
	}

	#[test]
	fn test_without_payload() {
		let background = Background::new("bg_empty");
		let decoded = roundtrip(&background, Lineage::Gm81);
		assert_eq!(decoded.data, None);
		assert_eq!(decoded.tiling, Tiling::default());
	}
}
