//! Seed-keyed substitution cipher used by the 8.1 lineage.
//!
//! # Tables
//!
//! A forward table starts as the identity permutation and is shuffled by 10000
//! seed-driven swaps of adjacent entries; the inverse table undoes it.
//!
//! ```text
//! a = 6 + seed % 250
//! b = seed / 250
//! for i in 1..=10000:
//!     j = 1 + (i * a + b) % 254
//!     swap(forward[j], forward[j + 1])
//! ```
//!
//! # Substitution
//!
//! The byte at block position `p` is shifted by `p` before substitution, so the
//! same plaintext byte encrypts differently depending on `p mod 256`:
//!
//! ```text
//! encrypt: forward[(byte + p) mod 256]
//! decrypt: (inverse[byte] - p) mod 256
//! ```
//!
//! # Junkyard
//!
//! The seed travels in a padding region of pseudo-random words:
//!
//! ```text
//! ┌──────────────────────────────┐
//! │ before_words (u32)           │
//! │ after_words (u32)            │
//! │ junk (before_words × u32)    │
//! │ seed (u32)                   │
//! │ junk (after_words × u32)     │
//! └──────────────────────────────┘
//! ```

use rand::{Rng, SeedableRng, rngs::SmallRng};

use super::{GmkError, stream::Stream};

/// Cipher constants.
pub mod constants {
	/// Number of adjacent swaps applied when deriving the forward table
	pub const SWAP_ROUNDS: u32 = 10_000;

	/// Largest junk word count accepted on either side of the seed
	pub const MAX_JUNK_WORDS: u32 = 8192;
}

/// Forward and inverse substitution tables derived from a seed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapTables {
	seed: u32,
	forward: [u8; 0x100],
	inverse: [u8; 0x100],
}

impl SwapTables {
	/// Derives both tables from a seed
	pub fn derive(seed: u32) -> Self {
		let a = 6 + seed % 250;
		let b = seed / 250;

		let mut forward = [0u8; 0x100];
		for (i, entry) in forward.iter_mut().enumerate() {
			*entry = i as u8;
		}

		for i in 1..=constants::SWAP_ROUNDS {
			let j = 1 + (i.wrapping_mul(a).wrapping_add(b) % 254) as usize;
			forward.swap(j, j + 1);
		}

		let mut inverse = [0u8; 0x100];
		for (i, &value) in forward.iter().enumerate() {
			inverse[value as usize] = i as u8;
		}

		Self {
			seed,
			forward,
			inverse,
		}
	}

	/// Returns the seed these tables were derived from
	pub fn seed(&self) -> u32 {
		self.seed
	}

	/// Returns the forward (encryption) table
	pub fn forward(&self) -> &[u8; 0x100] {
		&self.forward
	}

	/// Returns the inverse (decryption) table
	pub fn inverse(&self) -> &[u8; 0x100] {
		&self.inverse
	}

	/// Encrypts a block in place
	pub fn encrypt_in_place(&self, data: &mut [u8]) {
		for (position, byte) in data.iter_mut().enumerate() {
			*byte = self.forward[byte.wrapping_add(position as u8) as usize];
		}
	}

	/// Decrypts a block in place
	pub fn decrypt_in_place(&self, data: &mut [u8]) {
		for (position, byte) in data.iter_mut().enumerate() {
			*byte = self.inverse[*byte as usize].wrapping_sub(position as u8);
		}
	}
}

/// Encrypts a block with the tables derived from `seed`
pub fn encrypt(seed: u32, data: &[u8]) -> Vec<u8> {
	let mut out = data.to_vec();
	SwapTables::derive(seed).encrypt_in_place(&mut out);
	out
}

/// Decrypts a block with the tables derived from `seed`
pub fn decrypt(seed: u32, data: &[u8]) -> Vec<u8> {
	let mut out = data.to_vec();
	SwapTables::derive(seed).decrypt_in_place(&mut out);
	out
}

/// Wrapping byte sum used as the payload checksum
pub fn checksum(data: &[u8]) -> u32 {
	data.iter().fold(0u32, |sum, &byte| sum.wrapping_add(byte as u32))
}

/// Number of junk words written before and after the seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JunkSize {
	/// Fixed word counts
	Fixed {
		/// Words before the seed
		before: u32,
		/// Words after the seed
		after: u32,
	},
	/// Counts drawn from `min..=max`, using the seed-driven generator
	Random {
		/// Smallest word count
		min: u32,
		/// Largest word count
		max: u32,
	},
}

impl Default for JunkSize {
	fn default() -> Self {
		Self::Random {
			min: 64,
			max: 512,
		}
	}
}

/// Writes the junkyard region carrying `seed`.
///
/// The junk words are generated from `seed`, so the same seed and size always
/// produce the same bytes. Word counts are clamped to
/// [`constants::MAX_JUNK_WORDS`].
pub fn write_junkyard(stream: &mut Stream, seed: u32, size: JunkSize) {
	let mut rng = SmallRng::seed_from_u64(seed as u64);
	let (before, after) = match size {
		JunkSize::Fixed {
			before,
			after,
		} => (before, after),
		JunkSize::Random {
			min,
			max,
		} => {
			let (min, max) = (min.min(max), max.max(min));
			(rng.random_range(min..=max), rng.random_range(min..=max))
		}
	};
	let before = before.min(constants::MAX_JUNK_WORDS);
	let after = after.min(constants::MAX_JUNK_WORDS);

	stream.write_u32(before);
	stream.write_u32(after);
	for _ in 0..before {
		stream.write_u32(rng.random());
	}
	stream.write_u32(seed);
	for _ in 0..after {
		stream.write_u32(rng.random());
	}
}

/// Scans the junkyard at the current position and returns the embedded seed.
///
/// # Errors
///
/// - [`GmkError::StreamUnderflow`] if the two word counts cannot be read
/// - [`GmkError::SeedNotFound`] if the counts are implausible or the region
///   does not fit in the remaining bytes
pub fn locate_seed(stream: &mut Stream) -> Result<u32, GmkError> {
	let offset = stream.offset();
	let before = stream.read_u32()?;
	let after = stream.read_u32()?;

	if before > constants::MAX_JUNK_WORDS || after > constants::MAX_JUNK_WORDS {
		return Err(GmkError::SeedNotFound {
			offset,
			reason: format!(
				"junk word counts {before}/{after} exceed the limit of {}",
				constants::MAX_JUNK_WORDS
			),
		});
	}

	let region = (before as usize + after as usize + 1) * 4;
	if region > stream.remaining() {
		return Err(GmkError::SeedNotFound {
			offset,
			reason: format!(
				"junkyard needs {region} bytes but only {} remain",
				stream.remaining()
			),
		});
	}

	stream.skip(before as usize * 4)?;
	let seed = stream.read_u32()?;
	stream.skip(after as usize * 4)?;
	Ok(seed)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_tables_are_inverse_permutations() {
		for seed in [0, 1, 249, 250, 12345, 0xFFFF_FFFF] {
			let tables = SwapTables::derive(seed);
			for i in 0..=255u8 {
				assert_eq!(tables.inverse()[tables.forward()[i as usize] as usize], i);
			}
		}
	}

	#[test]
	fn test_derivation_is_deterministic() {
		assert_eq!(SwapTables::derive(777), SwapTables::derive(777));
		assert_ne!(SwapTables::derive(777).forward(), SwapTables::derive(778).forward());
	}

	#[test]
	fn test_swaps_never_touch_slot_zero() {
		// j ranges over 1..=254, so forward[0] keeps its identity value
		assert_eq!(SwapTables::derive(4242).forward()[0], 0);
	}

	#[test]
	fn test_decrypt_inverts_encrypt() {
		let seeds = (0..2000u32).step_by(97).chain([12345, 0x7FFF_FFFF, u32::MAX]);
		for seed in seeds {
			let tables = SwapTables::derive(seed);
			for len in [0usize, 1, 255, 256, 4096] {
				let plain: Vec<u8> = (0..len).map(|i| (i * 31 + 7) as u8).collect();
				let mut block = plain.clone();
				tables.encrypt_in_place(&mut block);
				tables.decrypt_in_place(&mut block);
				assert_eq!(block, plain, "seed {seed}, length {len}");
			}
		}
	}

	#[test]
	fn test_substitution_depends_on_position() {
		let encrypted = encrypt(12345, &[0x41; 512]);
		assert_ne!(encrypted[0], encrypted[1]);
		// Period is 256
		assert_eq!(encrypted[..256], encrypted[256..]);
		assert_eq!(decrypt(12345, &encrypted), vec![0x41; 512]);
	}

	#[test]
	fn test_junkyard_roundtrip() {
		let mut stream = Stream::new();
		write_junkyard(&mut stream, 12345, JunkSize::default());
		stream.write_u32(0xCAFE);

		assert_eq!(locate_seed(&mut stream).unwrap(), 12345);
		assert_eq!(stream.read_u32().unwrap(), 0xCAFE);
	}

	#[test]
	fn test_junkyard_is_deterministic() {
		let mut a = Stream::new();
		let mut b = Stream::new();
		write_junkyard(&mut a, 99, JunkSize::default());
		write_junkyard(&mut b, 99, JunkSize::default());
		assert_eq!(a, b);
	}

	#[test]
	fn test_fixed_junk_size() {
		let mut stream = Stream::new();
		write_junkyard(
			&mut stream,
			5,
			JunkSize::Fixed {
				before: 2,
				after: 3,
			},
		);
		assert_eq!(stream.len(), 4 * (2 + 2 + 1 + 3));
		assert_eq!(&stream.as_bytes()[16..20], &5u32.to_le_bytes());
	}

	#[test]
	fn test_implausible_junkyard() {
		let mut stream = Stream::new();
		stream.write_u32(constants::MAX_JUNK_WORDS + 1);
		stream.write_u32(0);
		assert!(matches!(locate_seed(&mut stream), Err(GmkError::SeedNotFound { .. })));

		let mut stream = Stream::new();
		stream.write_u32(10);
		stream.write_u32(10);
		stream.write_bytes(&[0; 16]);
		assert!(matches!(locate_seed(&mut stream), Err(GmkError::SeedNotFound { .. })));
	}

	#[test]
	fn test_truncated_junkyard_counts_underflow() {
		let mut stream = Stream::from_bytes(vec![1, 0]);
		assert!(matches!(locate_seed(&mut stream), Err(GmkError::StreamUnderflow { .. })));
	}

	#[test]
	fn test_checksum_wraps() {
		assert_eq!(checksum(&[]), 0);
		assert_eq!(checksum(&[1, 2, 3]), 6);
		assert_eq!(checksum(&[0xFF; 4]), 0x3FC);
	}
}
