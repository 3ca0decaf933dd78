//! Format version markers and the layout lineages they map to.

use serde::{Deserialize, Serialize};

use super::GmkError;

/// Version marker written at the start of a project file.
///
/// Known markers:
/// - 530: 5.3a
/// - 600: 6.1
/// - 702: 7
/// - 810: 8.1
///
/// Only the 7 and 8.1 markers have layouts. The two earlier markers are
/// recognized so that they can be named in diagnostics, but
/// [`FormatVersion::lineage`] rejects them instead of guessing a layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u32)]
pub enum FormatVersion {
	/// Game Maker 5.3a
	Gm53a = 530,
	/// Game Maker 6.1
	Gm61 = 600,
	/// Game Maker 7
	Gm7 = 702,
	/// Game Maker 8.1
	Gm81 = 810,
}

impl FormatVersion {
	/// Converts a raw marker to a `FormatVersion`
	pub fn from_u32(value: u32) -> Result<Self, GmkError> {
		match value {
			530 => Ok(Self::Gm53a),
			600 => Ok(Self::Gm61),
			702 => Ok(Self::Gm7),
			810 => Ok(Self::Gm81),
			_ => Err(GmkError::UnsupportedVersion(value)),
		}
	}

	/// Converts `FormatVersion` to its raw marker
	pub fn to_u32(self) -> u32 {
		self as u32
	}

	/// Returns the layout lineage for this version
	pub fn lineage(self) -> Result<Lineage, GmkError> {
		match self {
			Self::Gm7 => Ok(Lineage::Gm7),
			Self::Gm81 => Ok(Lineage::Gm81),
			Self::Gm53a | Self::Gm61 => Err(GmkError::UnsupportedVersion(self.to_u32())),
		}
	}
}

impl Default for FormatVersion {
	fn default() -> Self {
		Self::Gm81
	}
}

impl std::fmt::Display for FormatVersion {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Gm53a => write!(f, "5.3a"),
			Self::Gm61 => write!(f, "6.1"),
			Self::Gm7 => write!(f, "7"),
			Self::Gm81 => write!(f, "8.1"),
		}
	}
}

/// On-disk field layout family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lineage {
	/// 7-era layout, plain payload
	Gm7,
	/// 8.1-era layout, ciphered payload with timestamps
	Gm81,
}

impl Lineage {
	/// Whether the resource block is wrapped in the substitution cipher
	pub fn is_encrypted(self) -> bool {
		matches!(self, Self::Gm81)
	}

	/// Whether resources carry a last-changed timestamp
	pub fn has_timestamps(self) -> bool {
		matches!(self, Self::Gm81)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_marker_roundtrip() {
		for version in [FormatVersion::Gm53a, FormatVersion::Gm61, FormatVersion::Gm7, FormatVersion::Gm81] {
			assert_eq!(FormatVersion::from_u32(version.to_u32()).unwrap(), version);
		}
	}

	#[test]
	fn test_unknown_marker() {
		assert!(matches!(FormatVersion::from_u32(800), Err(GmkError::UnsupportedVersion(800))));
	}

	#[test]
	fn test_early_markers_have_no_lineage() {
		assert!(matches!(FormatVersion::Gm53a.lineage(), Err(GmkError::UnsupportedVersion(530))));
		assert!(matches!(FormatVersion::Gm61.lineage(), Err(GmkError::UnsupportedVersion(600))));
		assert_eq!(FormatVersion::Gm7.lineage().unwrap(), Lineage::Gm7);
		assert!(FormatVersion::Gm81.lineage().unwrap().is_encrypted());
	}
}
