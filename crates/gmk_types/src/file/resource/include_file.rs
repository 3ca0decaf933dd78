//! Included files: arbitrary files shipped with the game and exported at startup.
//!
//! Same layout in both lineages:
//!
//! ```text
//! file_name, source_path, original_file, original_size, has_data, [blob],
//! export, export_folder, overwrite, free_after_export, remove_at_end
//! ```

use serde::{Deserialize, Serialize};

use super::{Resource, ResourceKind, ResourceMeta, read_enum};
use crate::file::{GmkError, stream::Stream, version::Lineage};

/// Where an included file is written when the game starts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u32)]
pub enum ExportPolicy {
	/// Kept in memory only
	DontExport = 0,
	/// Temporary directory
	#[default]
	TempDirectory = 1,
	/// Working directory of the game
	WorkingDirectory = 2,
	/// The folder named by `export_folder`
	Folder = 3,
}

impl ExportPolicy {
	/// Converts a u32 value to `ExportPolicy`
	pub fn from_u32(value: u32) -> Option<Self> {
		match value {
			0 => Some(Self::DontExport),
			1 => Some(Self::TempDirectory),
			2 => Some(Self::WorkingDirectory),
			3 => Some(Self::Folder),
			_ => None,
		}
	}
}

/// Included file resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncludeFile {
	/// Shared header
	pub meta: ResourceMeta,
	/// File name written on export
	pub file_name: String,
	/// Path the file was added from
	pub source_path: String,
	/// Whether the payload is an unmodified copy of `source_path`
	pub original_file: bool,
	/// Size of the source file in bytes
	pub original_size: u32,
	/// Embedded file contents
	#[serde(skip)]
	pub data: Option<Vec<u8>>,
	/// Export destination
	pub export: ExportPolicy,
	/// Destination folder for [`ExportPolicy::Folder`]
	pub export_folder: String,
	/// Overwrite an existing file on export
	pub overwrite: bool,
	/// Free the in-memory copy after exporting
	pub free_after_export: bool,
	/// Delete the exported file when the game ends
	pub remove_at_end: bool,
}

impl Default for IncludeFile {
	fn default() -> Self {
		Self {
			meta: ResourceMeta::default(),
			file_name: String::new(),
			source_path: String::new(),
			original_file: true,
			original_size: 0,
			data: None,
			export: ExportPolicy::default(),
			export_folder: String::new(),
			overwrite: false,
			free_after_export: true,
			remove_at_end: true,
		}
	}
}

impl IncludeFile {
	/// Creates an included file holding `data`
	pub fn new(name: impl Into<String>, file_name: impl Into<String>, data: Vec<u8>) -> Self {
		Self {
			meta: ResourceMeta::named(name),
			file_name: file_name.into(),
			original_size: data.len() as u32,
			data: Some(data),
			..Self::default()
		}
	}
}

impl Resource for IncludeFile {
	const KIND: ResourceKind = ResourceKind::IncludeFile;

	fn meta(&self) -> &ResourceMeta {
		&self.meta
	}

	fn meta_mut(&mut self) -> &mut ResourceMeta {
		&mut self.meta
	}

	fn read_fields(&mut self, _lineage: Lineage, stream: &mut Stream) -> Result<(), GmkError> {
		self.file_name = stream.read_string()?;
		self.source_path = stream.read_string()?;
		self.original_file = stream.read_bool()?;
		self.original_size = stream.read_u32()?;
		self.data = if stream.read_bool()? {
			Some(stream.read_blob()?)
		} else {
			None
		};
		self.export = read_enum(stream, "export policy", ExportPolicy::from_u32)?;
		self.export_folder = stream.read_string()?;
		self.overwrite = stream.read_bool()?;
		self.free_after_export = stream.read_bool()?;
		self.remove_at_end = stream.read_bool()?;
		Ok(())
	}

	fn write_fields(&self, _lineage: Lineage, stream: &mut Stream) -> Result<(), GmkError> {
		stream.write_string(&self.file_name)?;
		stream.write_string(&self.source_path)?;
		stream.write_bool(self.original_file);
		stream.write_u32(self.original_size);
		stream.write_bool(self.data.is_some());
		if let Some(data) = &self.data {
			stream.write_blob(data)?;
		}
		stream.write_u32(self.export as u32);
		stream.write_string(&self.export_folder)?;
		stream.write_bool(self.overwrite);
		stream.write_bool(self.free_after_export);
		stream.write_bool(self.remove_at_end);
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::file::resource::test_util::roundtrip;

	#[test]
	fn test_roundtrip_both_lineages() {
		let file = IncludeFile {
			source_path: "D:\\assets\\levels.dat".to_string(),
			export: ExportPolicy::Folder,
			export_folder: "data".to_string(),
			overwrite: true,
			..IncludeFile::new("levels.dat", "levels.dat", b"LVL\x01\x02\x03".to_vec())
		};
		assert_eq!(file.original_size, 6);
		assert_eq!(roundtrip(&file, Lineage::Gm7), file);
		assert_eq!(roundtrip(&file, Lineage::Gm81), file);
	}

	#[test]
	fn test_without_payload() {
		let file = IncludeFile {
			data: None,
			export: ExportPolicy::DontExport,
			..IncludeFile::new("readme", "readme.txt", Vec::new())
		};
		assert_eq!(roundtrip(&file, Lineage::Gm81), file);
	}
}
