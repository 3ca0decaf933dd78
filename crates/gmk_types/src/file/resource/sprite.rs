//! Sprite resources.
//!
//! # Layout
//!
//! 7 lineage:
//!
//! ```text
//! width, height, bbox left/right/bottom/top, transparent, smooth_edges, preload,
//! bbox_mode, shape, alpha_tolerance, separate_masks, origin_x, origin_y,
//! count, count × embedded(pixels)
//! ```
//!
//! Subimages take the sprite's dimensions.
//!
//! 8.1 lineage:
//!
//! ```text
//! origin_x, origin_y, width, height,
//! count, count × (width, height, embedded(pixels)),
//! shape, alpha_tolerance, separate_masks, bbox_mode, bbox left/right/bottom/top,
//! transparent, smooth_edges, preload
//! ```

use log::warn;
use serde::{Deserialize, Serialize};

use super::{Resource, ResourceKind, ResourceMeta, read_count, read_enum};
use crate::file::{GmkError, stream::Stream, version::Lineage};

/// How the bounding box is computed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u32)]
pub enum BoundingBoxMode {
	/// Tight box around opaque pixels
	#[default]
	Automatic = 0,
	/// The full image
	Full = 1,
	/// The explicit box
	Manual = 2,
}

impl BoundingBoxMode {
	/// Converts a u32 value to `BoundingBoxMode`
	pub fn from_u32(value: u32) -> Option<Self> {
		match value {
			0 => Some(Self::Automatic),
			1 => Some(Self::Full),
			2 => Some(Self::Manual),
			_ => None,
		}
	}
}

/// Collision mask shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u32)]
pub enum MaskShape {
	/// Per-pixel mask
	#[default]
	Precise = 0,
	/// Bounding rectangle
	Rectangle = 1,
	/// Ellipse inscribed in the bounding box
	Disk = 2,
	/// Diamond inscribed in the bounding box
	Diamond = 3,
}

impl MaskShape {
	/// Converts a u32 value to `MaskShape`
	pub fn from_u32(value: u32) -> Option<Self> {
		match value {
			0 => Some(Self::Precise),
			1 => Some(Self::Rectangle),
			2 => Some(Self::Disk),
			3 => Some(Self::Diamond),
			_ => None,
		}
	}
}

/// Explicit bounding box, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct BoundingBox {
	/// Left edge
	pub left: i32,
	/// Right edge
	pub right: i32,
	/// Bottom edge
	pub bottom: i32,
	/// Top edge
	pub top: i32,
}

impl BoundingBox {
	fn read(stream: &mut Stream) -> Result<Self, GmkError> {
		Ok(Self {
			left: stream.read_i32()?,
			right: stream.read_i32()?,
			bottom: stream.read_i32()?,
			top: stream.read_i32()?,
		})
	}

	fn write(&self, stream: &mut Stream) {
		stream.write_i32(self.left);
		stream.write_i32(self.right);
		stream.write_i32(self.bottom);
		stream.write_i32(self.top);
	}
}

/// One animation frame: dimensions plus an opaque pixel block
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Subimage {
	/// Width in pixels
	pub width: u32,
	/// Height in pixels
	pub height: u32,
	/// Raw pixel data
	#[serde(skip)]
	pub pixels: Vec<u8>,
}

/// Sprite resource
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Sprite {
	/// Shared header
	pub meta: ResourceMeta,
	/// Width in pixels
	pub width: u32,
	/// Height in pixels
	pub height: u32,
	/// Bounding box computation
	pub bbox_mode: BoundingBoxMode,
	/// Explicit bounding box
	pub bbox: BoundingBox,
	/// Origin X
	pub origin_x: i32,
	/// Origin Y
	pub origin_y: i32,
	/// Animation frames
	pub subimages: Vec<Subimage>,
	/// Collision mask shape
	pub shape: MaskShape,
	/// Alpha tolerance for precise masks (0-255)
	pub alpha_tolerance: u32,
	/// One mask per subimage instead of a shared one
	pub separate_masks: bool,
	/// Bottom-left pixel color is transparent
	pub transparent: bool,
	/// Smooth transparent edges
	pub smooth_edges: bool,
	/// Load the texture at game start
	pub preload: bool,
}

impl Sprite {
	/// Creates an empty sprite with the given name
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			meta: ResourceMeta::named(name),
			..Self::default()
		}
	}

	/// Number of animation frames
	pub fn subimage_count(&self) -> usize {
		self.subimages.len()
	}
}

impl Resource for Sprite {
	const KIND: ResourceKind = ResourceKind::Sprite;

	fn meta(&self) -> &ResourceMeta {
		&self.meta
	}

	fn meta_mut(&mut self) -> &mut ResourceMeta {
		&mut self.meta
	}

	fn read_fields(&mut self, lineage: Lineage, stream: &mut Stream) -> Result<(), GmkError> {
		match lineage {
			Lineage::Gm7 => {
				self.width = stream.read_u32()?;
				self.height = stream.read_u32()?;
				self.bbox = BoundingBox::read(stream)?;
				self.transparent = stream.read_bool()?;
				self.smooth_edges = stream.read_bool()?;
				self.preload = stream.read_bool()?;
				self.bbox_mode = read_enum(stream, "bounding box mode", BoundingBoxMode::from_u32)?;
				self.shape = read_enum(stream, "mask shape", MaskShape::from_u32)?;
				self.alpha_tolerance = stream.read_u32()?;
				self.separate_masks = stream.read_bool()?;
				self.origin_x = stream.read_i32()?;
				self.origin_y = stream.read_i32()?;

				let count = read_count(stream, 4)?;
				self.subimages = Vec::with_capacity(count);
				for _ in 0..count {
					self.subimages.push(Subimage {
						width: self.width,
						height: self.height,
						pixels: stream.read_blob()?,
					});
				}
			}
			Lineage::Gm81 => {
				self.origin_x = stream.read_i32()?;
				self.origin_y = stream.read_i32()?;
				self.width = stream.read_u32()?;
				self.height = stream.read_u32()?;

				let count = read_count(stream, 12)?;
				self.subimages = Vec::with_capacity(count);
				for _ in 0..count {
					let width = stream.read_u32()?;
					let height = stream.read_u32()?;
					let pixels = stream.read_blob()?;
					self.subimages.push(Subimage {
						width,
						height,
						pixels,
					});
				}

				self.shape = read_enum(stream, "mask shape", MaskShape::from_u32)?;
				self.alpha_tolerance = stream.read_u32()?;
				self.separate_masks = stream.read_bool()?;
				self.bbox_mode = read_enum(stream, "bounding box mode", BoundingBoxMode::from_u32)?;
				self.bbox = BoundingBox::read(stream)?;
				self.transparent = stream.read_bool()?;
				self.smooth_edges = stream.read_bool()?;
				self.preload = stream.read_bool()?;
			}
		}
		Ok(())
	}

	fn write_fields(&self, lineage: Lineage, stream: &mut Stream) -> Result<(), GmkError> {
		match lineage {
			Lineage::Gm7 => {
				stream.write_u32(self.width);
				stream.write_u32(self.height);
				self.bbox.write(stream);
				stream.write_bool(self.transparent);
				stream.write_bool(self.smooth_edges);
				stream.write_bool(self.preload);
				stream.write_u32(self.bbox_mode as u32);
				stream.write_u32(self.shape as u32);
				stream.write_u32(self.alpha_tolerance);
				stream.write_bool(self.separate_masks);
				stream.write_i32(self.origin_x);
				stream.write_i32(self.origin_y);

				stream.write_u32(self.subimages.len() as u32);
				for (index, subimage) in self.subimages.iter().enumerate() {
					if (subimage.width, subimage.height) != (self.width, self.height) {
						warn!(
							"Sprite '{}' subimage {index} is {}x{}; format 7 stores it as {}x{}",
							self.name(),
							subimage.width,
							subimage.height,
							self.width,
							self.height
						);
					}
					stream.write_blob(&subimage.pixels)?;
				}
			}
			Lineage::Gm81 => {
				stream.write_i32(self.origin_x);
				stream.write_i32(self.origin_y);
				stream.write_u32(self.width);
				stream.write_u32(self.height);

				stream.write_u32(self.subimages.len() as u32);
				for subimage in &self.subimages {
					stream.write_u32(subimage.width);
					stream.write_u32(subimage.height);
					stream.write_blob(&subimage.pixels)?;
				}

				stream.write_u32(self.shape as u32);
				stream.write_u32(self.alpha_tolerance);
				stream.write_bool(self.separate_masks);
				stream.write_u32(self.bbox_mode as u32);
				self.bbox.write(stream);
				stream.write_bool(self.transparent);
				stream.write_bool(self.smooth_edges);
				stream.write_bool(self.preload);
			}
		}
		Ok(())
	}
}
