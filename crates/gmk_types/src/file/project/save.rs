use log::{debug, trace, warn};
use rand::{Rng, SeedableRng, rngs::SmallRng};

use super::{MAGIC, Project};
use crate::file::{
	GmkError,
	cipher::{self, JunkSize, checksum},
	resource::{Collection, Resource},
	stream::Stream,
	version::{FormatVersion, Lineage},
};

/// Options for [`Project::to_bytes`].
///
/// # Presets
///
/// - [`SaveOptions::default`]: 8.1, fresh random seed, random junk size
/// - [`SaveOptions::gm7`]: 7, unencrypted
/// - [`SaveOptions::gm81`]: 8.1 with a fixed seed
/// - [`SaveOptions::matching`]: the version and seed a project was read with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveOptions {
	/// Target format version; must have a lineage
	pub version: FormatVersion,
	/// Cipher seed; `None` draws a fresh one. Ignored by unencrypted versions.
	pub seed: Option<u32>,
	/// Junk words around the seed
	pub junk: JunkSize,
}

impl Default for SaveOptions {
	fn default() -> Self {
		Self {
			version: FormatVersion::Gm81,
			seed: None,
			junk: JunkSize::default(),
		}
	}
}

impl SaveOptions {
	/// Plain 7 layout
	pub fn gm7() -> Self {
		Self {
			version: FormatVersion::Gm7,
			..Self::default()
		}
	}

	/// 8.1 layout ciphered with `seed`
	pub fn gm81(seed: u32) -> Self {
		Self {
			version: FormatVersion::Gm81,
			seed: Some(seed),
			..Self::default()
		}
	}

	/// Reproduces the version and seed `project` was read or last written with
	pub fn matching(project: &Project) -> Self {
		Self {
			version: project.version(),
			seed: project.seed(),
			..Self::default()
		}
	}

	/// Replaces the junk size
	pub fn with_junk(mut self, junk: JunkSize) -> Self {
		self.junk = junk;
		self
	}
}

fn encode_collection<T: Resource>(
	collection: &Collection<T>,
	lineage: Lineage,
	block: &mut Stream,
) -> Result<(), GmkError> {
	let mut sub = Stream::new();
	collection.encode(lineage, &mut sub)?;
	trace!("Encoded {} {} slots into {} bytes", collection.len(), T::KIND, sub.len());
	block.embed(&sub)
}

impl Project {
	/// Writes the project to disk
	pub fn save(&mut self, path: impl AsRef<std::path::Path>, options: &SaveOptions) -> Result<(), GmkError> {
		let data = self.to_bytes(options)?;
		std::fs::write(path, data)?;
		Ok(())
	}

	/// Encodes the project as a project file.
	///
	/// # Errors
	///
	/// Fails with [`GmkError::DanglingReference`] or
	/// [`GmkError::DanglingTreeNode`], before any bytes are produced, if a
	/// reference or tree leaf names a slot that is missing or a tombstone.
	///
	/// On success the project remembers the version and seed it was written
	/// with, so that [`SaveOptions::matching`] reproduces them.
	pub fn to_bytes(&mut self, options: &SaveOptions) -> Result<Vec<u8>, GmkError> {
		let lineage = options.version.lineage()?;
		self.verify_references()?;
		if !lineage.is_encrypted() && self.triggers.live_count() > 0 {
			warn!(
				"Format version {} has no triggers; {} triggers are dropped",
				options.version,
				self.triggers.live_count()
			);
		}

		debug!("Save stage: encoding resources as {}", options.version);
		let mut block = self.encode_resources(lineage)?;

		let mut out = Stream::new();
		out.write_u32(MAGIC);
		out.write_u32(options.version.to_u32());

		let seed = if lineage.is_encrypted() {
			let seed = options.seed.unwrap_or_else(|| SmallRng::from_os_rng().random());
			debug!("Save stage: enciphering {} bytes with seed {seed}", block.len());
			cipher::write_junkyard(&mut out, seed, options.junk);
			out.write_u32(checksum(block.as_bytes()));
			self.tables(seed).encrypt_in_place(block.as_bytes_mut());
			Some(seed)
		} else {
			None
		};
		out.embed(&block)?;

		debug!("Save stage: encoding tree");
		let mut tree = Stream::new();
		self.tree.encode(&mut tree)?;
		out.embed(&tree)?;

		self.version = options.version;
		self.seed = seed;
		Ok(out.into_bytes())
	}

	/// Checks every reference and tree leaf against the current slots, so
	/// that nothing is written which could not be read back.
	fn verify_references(&mut self) -> Result<(), GmkError> {
		let table = self.reference_table();
		self.backgrounds.verify(&table)?;
		self.sprites.verify(&table)?;
		self.sounds.verify(&table)?;
		self.paths.verify(&table)?;
		self.scripts.verify(&table)?;
		self.fonts.verify(&table)?;
		self.timelines.verify(&table)?;
		self.objects.verify(&table)?;
		self.rooms.verify(&table)?;
		self.triggers.verify(&table)?;
		self.include_files.verify(&table)?;
		self.tree.verify(&table)
	}

	fn encode_resources(&self, lineage: Lineage) -> Result<Stream, GmkError> {
		let mut block = Stream::new();
		encode_collection(&self.backgrounds, lineage, &mut block)?;
		encode_collection(&self.sprites, lineage, &mut block)?;
		encode_collection(&self.sounds, lineage, &mut block)?;
		encode_collection(&self.paths, lineage, &mut block)?;
		encode_collection(&self.scripts, lineage, &mut block)?;
		encode_collection(&self.fonts, lineage, &mut block)?;
		encode_collection(&self.timelines, lineage, &mut block)?;
		encode_collection(&self.objects, lineage, &mut block)?;
		encode_collection(&self.rooms, lineage, &mut block)?;
		encode_collection(&self.triggers, lineage, &mut block)?;
		encode_collection(&self.include_files, lineage, &mut block)?;

		let mut sub = Stream::new();
		self.game_information.write(lineage, &mut sub)?;
		block.embed(&sub)?;
		Ok(block)
	}
}
