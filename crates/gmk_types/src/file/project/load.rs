use log::{debug, trace, warn};

use super::{MAGIC, Project};
use crate::file::{
	GmkError,
	cipher::{self, checksum},
	resource::{Collection, GameInformation, Resource},
	stream::Stream,
	tree::ResourceTree,
	version::{FormatVersion, Lineage},
};

/// Stages of [`Project::from_bytes`], in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoadStage {
	/// Magic, version marker and, for 8.1, the seed and checksum
	ReadingHeader,
	/// Extracting and deciphering the resource block
	DecryptingPayload,
	/// Decoding every collection in kind order
	DecodingResources,
	/// Decoding the resource tree
	DecodingTree,
	/// Resolving raw references
	Resolving,
	/// Fully loaded
	Ready,
}

impl std::fmt::Display for LoadStage {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::ReadingHeader => write!(f, "reading header"),
			Self::DecryptingPayload => write!(f, "decrypting payload"),
			Self::DecodingResources => write!(f, "decoding resources"),
			Self::DecodingTree => write!(f, "decoding tree"),
			Self::Resolving => write!(f, "resolving references"),
			Self::Ready => write!(f, "ready"),
		}
	}
}

fn enter(stage: LoadStage, stream: &Stream) {
	debug!("Load stage: {stage} (offset {:#x})", stream.offset());
}

fn decode_collection<T: Resource>(lineage: Lineage, block: &mut Stream) -> Result<Collection<T>, GmkError> {
	let mut sub = block.extract()?;
	let collection = Collection::<T>::decode(lineage, &mut sub)?;
	if !sub.at_end() {
		warn!("{} block has {} unread bytes", T::KIND, sub.remaining());
	}
	trace!("Decoded {} {} slots ({} live)", collection.len(), T::KIND, collection.live_count());
	Ok(collection)
}

impl Project {
	/// Reads a project file from disk
	pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self, GmkError> {
		let data = std::fs::read(path)?;
		Self::from_bytes(&data)
	}

	/// Decodes a project from the bytes of a project file.
	///
	/// # Errors
	///
	/// Fails on the first problem found; no partially decoded project is
	/// returned. Errors raised inside a resource are wrapped in
	/// [`GmkError::InResource`].
	pub fn from_bytes(data: &[u8]) -> Result<Self, GmkError> {
		let mut stream = Stream::from_bytes(data);
		let mut project = Project::new();

		enter(LoadStage::ReadingHeader, &stream);
		let magic = stream.read_u32()?;
		if magic != MAGIC {
			return Err(GmkError::InvalidMagic {
				expected: MAGIC,
				actual: magic,
			});
		}
		let version = FormatVersion::from_u32(stream.read_u32()?)?;
		let lineage = version.lineage()?;
		project.version = version;

		let stored_checksum = if lineage.is_encrypted() {
			let seed = cipher::locate_seed(&mut stream)?;
			project.seed = Some(seed);
			Some(stream.read_u32()?)
		} else {
			None
		};
		debug!("Format version {version}, seed {:?}", project.seed);

		enter(LoadStage::DecryptingPayload, &stream);
		let mut block = stream.extract()?;
		if let (Some(seed), Some(expected)) = (project.seed, stored_checksum) {
			project.tables(seed).decrypt_in_place(block.as_bytes_mut());
			let actual = checksum(block.as_bytes());
			if actual != expected {
				return Err(GmkError::CipherIntegrity {
					expected,
					actual,
				});
			}
		}

		enter(LoadStage::DecodingResources, &block);
		project.backgrounds = decode_collection(lineage, &mut block)?;
		project.sprites = decode_collection(lineage, &mut block)?;
		project.sounds = decode_collection(lineage, &mut block)?;
		project.paths = decode_collection(lineage, &mut block)?;
		project.scripts = decode_collection(lineage, &mut block)?;
		project.fonts = decode_collection(lineage, &mut block)?;
		project.timelines = decode_collection(lineage, &mut block)?;
		project.objects = decode_collection(lineage, &mut block)?;
		project.rooms = decode_collection(lineage, &mut block)?;
		project.triggers = decode_collection(lineage, &mut block)?;
		project.include_files = decode_collection(lineage, &mut block)?;
		let mut sub = block.extract()?;
		project.game_information = GameInformation::read(lineage, &mut sub)?;
		if !block.at_end() {
			warn!("Resource block has {} unread bytes", block.remaining());
		}

		enter(LoadStage::DecodingTree, &stream);
		let mut sub = stream.extract()?;
		project.tree = ResourceTree::decode(&mut sub)?;
		trace!("Decoded resource tree with {} nodes", project.tree.node_count());
		if !stream.at_end() {
			warn!("File has {} bytes after the resource tree", stream.remaining());
		}

		enter(LoadStage::Resolving, &stream);
		project.finalize()?;

		enter(LoadStage::Ready, &stream);
		Ok(project)
	}
}
