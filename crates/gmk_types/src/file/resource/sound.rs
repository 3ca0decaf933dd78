//! Sound resources.
//!
//! Both lineages share the field order; only the effect flags differ:
//!
//! ```text
//! kind, extension, file_name, has_data, [blob],
//! effects (7: five bools chorus/echo/flanger/gargle/reverb, 8.1: u32 bitmask),
//! volume (f64), pan (f64), preload
//! ```

use std::io::Cursor;

use serde::{Deserialize, Serialize};

use super::{Resource, ResourceKind, ResourceMeta, read_enum};
use crate::file::{GmkError, stream::Stream, version::Lineage};

/// Playback category of a sound
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u32)]
pub enum SoundKind {
	/// Normal sound effect
	#[default]
	Normal = 0,
	/// Background music, one at a time
	Background = 1,
	/// Positional sound
	ThreeD = 2,
	/// Played through the media player
	Multimedia = 3,
}

impl SoundKind {
	/// Converts a u32 value to `SoundKind`
	pub fn from_u32(value: u32) -> Option<Self> {
		match value {
			0 => Some(Self::Normal),
			1 => Some(Self::Background),
			2 => Some(Self::ThreeD),
			3 => Some(Self::Multimedia),
			_ => None,
		}
	}
}

impl std::fmt::Display for SoundKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Normal => write!(f, "Normal"),
			Self::Background => write!(f, "Background music"),
			Self::ThreeD => write!(f, "3D"),
			Self::Multimedia => write!(f, "Multimedia"),
		}
	}
}

/// Effect flags applied at playback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SoundEffects {
	/// Chorus
	pub chorus: bool,
	/// Echo
	pub echo: bool,
	/// Flanger
	pub flanger: bool,
	/// Gargle
	pub gargle: bool,
	/// Reverb
	pub reverb: bool,
}

impl SoundEffects {
	const CHORUS: u32 = 1 << 0;
	const ECHO: u32 = 1 << 1;
	const FLANGER: u32 = 1 << 2;
	const GARGLE: u32 = 1 << 3;
	const REVERB: u32 = 1 << 4;
	const ALL: u32 = 0x1F;

	/// Builds the flags from a bitmask, rejecting unknown bits
	pub fn from_bits(bits: u32) -> Option<Self> {
		if bits & !Self::ALL != 0 {
			return None;
		}
		Some(Self {
			chorus: bits & Self::CHORUS != 0,
			echo: bits & Self::ECHO != 0,
			flanger: bits & Self::FLANGER != 0,
			gargle: bits & Self::GARGLE != 0,
			reverb: bits & Self::REVERB != 0,
		})
	}

	/// Packs the flags into a bitmask
	pub fn bits(&self) -> u32 {
		let mut bits = 0;
		for (set, flag) in [
			(self.chorus, Self::CHORUS),
			(self.echo, Self::ECHO),
			(self.flanger, Self::FLANGER),
			(self.gargle, Self::GARGLE),
			(self.reverb, Self::REVERB),
		] {
			if set {
				bits |= flag;
			}
		}
		bits
	}
}

/// Sound resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sound {
	/// Shared header
	pub meta: ResourceMeta,
	/// Playback category
	pub kind: SoundKind,
	/// File extension including the dot, e.g. `.wav`
	pub extension: String,
	/// Name of the file the sound was loaded from
	pub file_name: String,
	/// Raw file contents
	#[serde(skip)]
	pub data: Option<Vec<u8>>,
	/// Effect flags
	pub effects: SoundEffects,
	/// Volume, 0.0 to 1.0
	pub volume: f64,
	/// Pan, -1.0 (left) to 1.0 (right)
	pub pan: f64,
	/// Load at game start
	pub preload: bool,
}

impl Default for Sound {
	fn default() -> Self {
		Self {
			meta: ResourceMeta::default(),
			kind: SoundKind::default(),
			extension: String::new(),
			file_name: String::new(),
			data: None,
			effects: SoundEffects::default(),
			volume: 1.0,
			pan: 0.0,
			preload: true,
		}
	}
}

impl Sound {
	/// Creates an empty sound with the given name
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			meta: ResourceMeta::named(name),
			..Self::default()
		}
	}

	/// Inspects the payload's WAV header.
	///
	/// # Errors
	///
	/// [`GmkError::InvalidAudio`] if there is no payload or it is not a
	/// readable WAV file.
	pub fn wav_spec(&self) -> Result<hound::WavSpec, GmkError> {
		let data = self
			.data
			.as_deref()
			.ok_or_else(|| GmkError::InvalidAudio(format!("sound '{}' has no payload", self.meta.name)))?;
		let reader = hound::WavReader::new(Cursor::new(data))
			.map_err(|e| GmkError::InvalidAudio(format!("sound '{}': {e}", self.meta.name)))?;
		Ok(reader.spec())
	}
}

impl Resource for Sound {
	const KIND: ResourceKind = ResourceKind::Sound;

	fn meta(&self) -> &ResourceMeta {
		&self.meta
	}

	fn meta_mut(&mut self) -> &mut ResourceMeta {
		&mut self.meta
	}

	fn read_fields(&mut self, lineage: Lineage, stream: &mut Stream) -> Result<(), GmkError> {
		self.kind = read_enum(stream, "sound kind", SoundKind::from_u32)?;
		self.extension = stream.read_string()?;
		self.file_name = stream.read_string()?;
		self.data = if stream.read_bool()? {
			Some(stream.read_blob()?)
		} else {
			None
		};

		self.effects = match lineage {
			Lineage::Gm7 => SoundEffects {
				chorus: stream.read_bool()?,
				echo: stream.read_bool()?,
				flanger: stream.read_bool()?,
				gargle: stream.read_bool()?,
				reverb: stream.read_bool()?,
			},
			Lineage::Gm81 => read_enum(stream, "sound effects", SoundEffects::from_bits)?,
		};

		self.volume = stream.read_f64()?;
		self.pan = stream.read_f64()?;
		self.preload = stream.read_bool()?;
		Ok(())
	}

	fn write_fields(&self, lineage: Lineage, stream: &mut Stream) -> Result<(), GmkError> {
		stream.write_u32(self.kind as u32);
		stream.write_string(&self.extension)?;
		stream.write_string(&self.file_name)?;
		stream.write_bool(self.data.is_some());
		if let Some(data) = &self.data {
			stream.write_blob(data)?;
		}

		match lineage {
			Lineage::Gm7 => {
				stream.write_bool(self.effects.chorus);
				stream.write_bool(self.effects.echo);
				stream.write_bool(self.effects.flanger);
				stream.write_bool(self.effects.gargle);
				stream.write_bool(self.effects.reverb);
			}
			Lineage::Gm81 => stream.write_u32(self.effects.bits()),
		}

		stream.write_f64(self.volume);
		stream.write_f64(self.pan);
		stream.write_bool(self.preload);
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::file::resource::test_util::roundtrip;

	fn wav_bytes() -> Vec<u8> {
		let spec = hound::WavSpec {
			channels: 1,
			sample_rate: 22050,
			bits_per_sample: 16,
			sample_format: hound::SampleFormat::Int,
		};
		let mut bytes = Vec::new();
		let mut writer = hound::WavWriter::new(Cursor::new(&mut bytes), spec).unwrap();
		for i in 0..64i16 {
			writer.write_sample(i * 100).unwrap();
		}
		writer.finalize().unwrap();
		bytes
	}

	fn sample() -> Sound {
		Sound {
			kind: SoundKind::Background,
			extension: ".wav".to_string(),
			file_name: "C:\\music\\theme.wav".to_string(),
			data: Some(wav_bytes()),
			effects: SoundEffects {
				echo: true,
				reverb: true,
				..SoundEffects::default()
			},
			volume: 0.75,
			pan: -0.5,
			preload: false,
			..Sound::new("snd_theme")
		}
	}

	#[test]
	fn test_roundtrip_both_lineages() {
		let sound = sample();
		assert_eq!(roundtrip(&sound, Lineage::Gm7), sound);
		assert_eq!(roundtrip(&sound, Lineage::Gm81), sound);

		let silent = Sound::new("snd_empty");
		assert_eq!(roundtrip(&silent, Lineage::Gm81), silent);
	}

	#[test]
	fn test_effect_bits() {
		assert_eq!(sample().effects.bits(), 0b10010);
		assert_eq!(SoundEffects::from_bits(0x1F).unwrap().bits(), 0x1F);
		assert!(SoundEffects::from_bits(0x20).is_none());
	}

	#[test]
	fn test_wav_spec() {
		let spec = sample().wav_spec().unwrap();
		assert_eq!(spec.channels, 1);
		assert_eq!(spec.sample_rate, 22050);
		assert_eq!(spec.bits_per_sample, 16);

		let mut broken = sample();
		broken.data = Some(b"OggS\0\0\0\0".to_vec());
		assert!(matches!(broken.wav_spec(), Err(GmkError::InvalidAudio(_))));
		assert!(matches!(Sound::new("x").wav_spec(), Err(GmkError::InvalidAudio(_))));
	}

	#[test]
	fn test_tombstone() {
		let mut sound = sample();
		sound.meta.exists = false;
		assert_eq!(roundtrip(&sound, Lineage::Gm7), Sound::default());
	}
}
