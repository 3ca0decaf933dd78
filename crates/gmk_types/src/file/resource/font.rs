//! Font resources.
//!
//! ```text
//! 7:   family, size, bold, italic, range_begin (u32), range_end
//! 8.1: family, size, bold, italic, range_begin | charset << 16 | aa_level << 24, range_end
//! ```
//!
//! The 7 lineage has no charset or antialiasing fields; they decode as 0.

use serde::{Deserialize, Serialize};

use super::{Resource, ResourceKind, ResourceMeta};
use crate::file::{GmkError, stream::Stream, version::Lineage};

/// Font resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Font {
	/// Shared header
	pub meta: ResourceMeta,
	/// Font family, e.g. `Arial`
	pub family: String,
	/// Point size
	pub size: u32,
	/// Bold
	pub bold: bool,
	/// Italic
	pub italic: bool,
	/// First character of the rendered range
	pub range_begin: u16,
	/// Last character of the rendered range
	pub range_end: u32,
	/// Windows charset id
	pub charset: u8,
	/// Antialiasing level, 0 (off) to 3
	pub aa_level: u8,
}

impl Default for Font {
	fn default() -> Self {
		Self {
			meta: ResourceMeta::default(),
			family: "Arial".to_string(),
			size: 12,
			bold: false,
			italic: false,
			range_begin: 32,
			range_end: 127,
			charset: 0,
			aa_level: 0,
		}
	}
}

impl Font {
	/// Creates a font with default settings and the given name
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			meta: ResourceMeta::named(name),
			..Self::default()
		}
	}

	fn packed_range(&self) -> u32 {
		u32::from(self.range_begin) | u32::from(self.charset) << 16 | u32::from(self.aa_level) << 24
	}
}

impl Resource for Font {
	const KIND: ResourceKind = ResourceKind::Font;

	fn meta(&self) -> &ResourceMeta {
		&self.meta
	}

	fn meta_mut(&mut self) -> &mut ResourceMeta {
		&mut self.meta
	}

	fn read_fields(&mut self, lineage: Lineage, stream: &mut Stream) -> Result<(), GmkError> {
		self.family = stream.read_string()?;
		self.size = stream.read_u32()?;
		self.bold = stream.read_bool()?;
		self.italic = stream.read_bool()?;

		match lineage {
			Lineage::Gm7 => {
				let offset = stream.offset();
				let begin = stream.read_u32()?;
				self.range_begin = u16::try_from(begin).map_err(|_| GmkError::InvalidValue {
					field: "font range begin",
					value: begin as i64,
					offset,
				})?;
				self.charset = 0;
				self.aa_level = 0;
			}
			Lineage::Gm81 => {
				let packed = stream.read_u32()?;
				self.range_begin = (packed & 0xFFFF) as u16;
				self.charset = (packed >> 16) as u8;
				self.aa_level = (packed >> 24) as u8;
			}
		}

		self.range_end = stream.read_u32()?;
		Ok(())
	}

	fn write_fields(&self, lineage: Lineage, stream: &mut Stream) -> Result<(), GmkError> {
		stream.write_string(&self.family)?;
		stream.write_u32(self.size);
		stream.write_bool(self.bold);
		stream.write_bool(self.italic);
		match lineage {
			Lineage::Gm7 => stream.write_u32(u32::from(self.range_begin)),
			Lineage::Gm81 => stream.write_u32(self.packed_range()),
		}
		stream.write_u32(self.range_end);
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::file::resource::test_util::roundtrip;

	#[test]
	fn test_gm81_packs_charset_and_aa() {
		let font = Font {
			family: "Courier New".to_string(),
			size: 10,
			bold: true,
			range_begin: 0x20,
			range_end: 0x17F,
			charset: 238,
			aa_level: 3,
			..Font::new("fnt_console")
		};
		assert_eq!(font.packed_range(), 0x03EE_0020);
		assert_eq!(roundtrip(&font, Lineage::Gm81), font);
	}

	#[test]
	fn test_gm7_drops_charset_and_aa() {
		let font = Font {
			italic: true,
			charset: 1,
			aa_level: 2,
			..Font::new("fnt_title")
		};

		let decoded = roundtrip(&font, Lineage::Gm7);
		assert_eq!(decoded.charset, 0);
		assert_eq!(decoded.aa_level, 0);
		assert_eq!(
			decoded,
			Font {
				charset: 0,
				aa_level: 0,
				..font
			}
		);
	}

	#[test]
	fn test_gm7_range_begin_out_of_range() {
		let mut stream = Stream::new();
		stream.write_string("Arial").unwrap();
		stream.write_u32(12);
		stream.write_bool(false);
		stream.write_bool(false);
		stream.write_u32(0x1_0000);
		stream.write_u32(127);

		let err = Font::default().read_fields(Lineage::Gm7, &mut stream).unwrap_err();
		assert!(matches!(
			err,
			GmkError::InvalidValue {
				field: "font range begin",
				offset: 21,
				..
			}
		));
	}
}
