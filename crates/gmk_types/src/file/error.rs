//! Error types for project file parsing and serialization.

use thiserror::Error;

use super::resource::ResourceKind;

/// Unified error type for reading and writing project files.
///
/// Every decode/encode operation is all-or-nothing: the first error aborts the
/// whole operation and no partially populated project is handed back.
#[derive(Debug, Error)]
pub enum GmkError {
	/// A read ran past the end of the available bytes
	#[error("Stream underflow at offset {offset:#x}: needed {needed} bytes, {available} available")]
	StreamUnderflow {
		/// Absolute offset of the failed read
		offset: usize,
		/// Number of bytes requested
		needed: usize,
		/// Number of bytes remaining in the stream
		available: usize,
	},

	/// The file does not start with the container magic number
	#[error("Invalid magic number: expected {expected}, got {actual}")]
	InvalidMagic {
		/// Expected magic value
		expected: u32,
		/// Value found in the file
		actual: u32,
	},

	/// The version marker is outside the supported lineages
	#[error("Unsupported format version marker {0}")]
	UnsupportedVersion(u32),

	/// The junkyard region does not contain a plausible seed
	#[error("Cipher seed not found at offset {offset:#x}: {reason}")]
	SeedNotFound {
		/// Absolute offset of the junkyard region
		offset: usize,
		/// Why the scan failed
		reason: String,
	},

	/// The decrypted payload does not match its stored checksum
	#[error("Cipher integrity check failed: stored checksum {expected:#010x}, computed {actual:#010x}")]
	CipherIntegrity {
		/// Checksum stored in the file
		expected: u32,
		/// Checksum of the decrypted payload
		actual: u32,
	},

	/// A stored index does not name an existing resource of the expected kind
	#[error("Dangling reference from {from} #{from_id}: no {to} at index {index}")]
	DanglingReference {
		/// Kind of the resource holding the reference
		from: ResourceKind,
		/// Positional id of the resource holding the reference
		from_id: usize,
		/// Kind the reference points at
		to: ResourceKind,
		/// The unresolved index
		index: i32,
	},

	/// A resource tree leaf names a resource that does not exist
	#[error("Resource tree leaf '{label}' points at missing {to} #{index}")]
	DanglingTreeNode {
		/// Label of the leaf
		label: String,
		/// Kind the leaf points at
		to: ResourceKind,
		/// The unresolved index
		index: i32,
	},

	/// Node counts or group values of the resource tree are inconsistent
	#[error("Malformed resource tree at offset {offset:#x}: {reason}")]
	MalformedTree {
		/// Absolute offset where the inconsistency was detected
		offset: usize,
		/// Description of the inconsistency
		reason: String,
	},

	/// An enumerated field holds a value outside its defined set
	#[error("Invalid value {value} for {field} at offset {offset:#x}")]
	InvalidValue {
		/// Name of the field
		field: &'static str,
		/// Raw value read from the stream
		value: i64,
		/// Absolute offset of the value
		offset: usize,
	},

	/// A length-prefixed payload does not fit the 32-bit length field
	#[error("Payload of {length} bytes is too large for a 32-bit length prefix")]
	PayloadTooLarge {
		/// Length of the payload
		length: usize,
	},

	/// Embedded audio could not be inspected
	#[error("Invalid audio payload: {0}")]
	InvalidAudio(String),

	/// An error raised while decoding or encoding a single resource
	#[error("{kind} #{index}: {source}")]
	InResource {
		/// Kind of the failing resource
		kind: ResourceKind,
		/// Positional index of the failing resource
		index: usize,
		/// Underlying error
		#[source]
		source: Box<GmkError>,
	},

	/// IO error
	#[error(transparent)]
	Io(#[from] std::io::Error),
}

impl GmkError {
	/// Creates a [`GmkError::StreamUnderflow`] error
	pub fn underflow(offset: usize, needed: usize, available: usize) -> Self {
		Self::StreamUnderflow {
			offset,
			needed,
			available,
		}
	}

	/// Wraps this error with the kind and index of the resource being processed
	pub fn in_resource(self, kind: ResourceKind, index: usize) -> Self {
		Self::InResource {
			kind,
			index,
			source: Box::new(self),
		}
	}

	/// Returns the innermost error, skipping resource context wrappers
	pub fn root(&self) -> &GmkError {
		match self {
			Self::InResource {
				source,
				..
			} => source.root(),
			other => other,
		}
	}
}
