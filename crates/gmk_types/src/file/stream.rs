//! In-memory byte stream with typed primitives and length-framed sub-streams.
//!
//! Every resource serializes itself into its own [`Stream`], which the owning
//! collection then embeds as an opaque, length-prefixed block. Reading works the
//! other way around: [`Stream::extract`] copies exactly one framed block into a
//! new, independently owned stream.
//!
//! # Layout
//!
//! All values are little-endian:
//!
//! ```text
//! bool       u32, 0 = false, non-zero = true
//! i32 / u32  4 bytes
//! f64        8 bytes
//! timestamp  f64 day count (see `Timestamp`)
//! string     u32 length + bytes
//! blob       u32 length + bytes
//! embedded   u32 length + sub-stream contents
//! ```

use encoding_rs::WINDOWS_1252;
use log::warn;

use super::{GmkError, timestamp::Timestamp};

/// Growable byte buffer with a read cursor.
///
/// Writes always append to the end of the buffer. The `origin` is the absolute
/// offset of the first byte within the outermost stream, so errors raised in
/// nested sub-streams still point at a file offset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stream {
	data: Vec<u8>,
	position: usize,
	origin: usize,
}

impl Stream {
	/// Creates an empty stream
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a stream reading from the given bytes
	pub fn from_bytes(data: impl Into<Vec<u8>>) -> Self {
		Self {
			data: data.into(),
			position: 0,
			origin: 0,
		}
	}

	/// Returns the whole buffer
	pub fn as_bytes(&self) -> &[u8] {
		&self.data
	}

	/// Returns the whole buffer mutably, e.g. for in-place decryption
	pub fn as_bytes_mut(&mut self) -> &mut [u8] {
		&mut self.data
	}

	/// Consumes the stream and returns its buffer
	pub fn into_bytes(self) -> Vec<u8> {
		self.data
	}

	/// Total number of bytes in the buffer
	pub fn len(&self) -> usize {
		self.data.len()
	}

	/// Returns true if the buffer holds no bytes
	pub fn is_empty(&self) -> bool {
		self.data.is_empty()
	}

	/// Current read position, relative to this stream
	pub fn position(&self) -> usize {
		self.position
	}

	/// Current read position as an absolute offset
	pub fn offset(&self) -> usize {
		self.origin + self.position
	}

	/// Number of unread bytes
	pub fn remaining(&self) -> usize {
		self.data.len().saturating_sub(self.position)
	}

	/// Returns true once every byte has been read
	pub fn at_end(&self) -> bool {
		self.remaining() == 0
	}

	fn ensure(&self, needed: usize) -> Result<(), GmkError> {
		if needed > self.remaining() {
			return Err(GmkError::underflow(self.offset(), needed, self.remaining()));
		}
		Ok(())
	}

	/// Reads `n` raw bytes without a length prefix
	pub fn read_bytes(&mut self, n: usize) -> Result<&[u8], GmkError> {
		self.ensure(n)?;
		let start = self.position;
		self.position += n;
		Ok(&self.data[start..start + n])
	}

	fn read_array<const N: usize>(&mut self) -> Result<[u8; N], GmkError> {
		let mut bytes = [0u8; N];
		bytes.copy_from_slice(self.read_bytes(N)?);
		Ok(bytes)
	}

	/// Skips `n` bytes
	pub fn skip(&mut self, n: usize) -> Result<(), GmkError> {
		self.ensure(n)?;
		self.position += n;
		Ok(())
	}

	/// Reads a single byte
	pub fn read_u8(&mut self) -> Result<u8, GmkError> {
		Ok(self.read_array::<1>()?[0])
	}

	/// Reads an unsigned 32-bit integer
	pub fn read_u32(&mut self) -> Result<u32, GmkError> {
		Ok(u32::from_le_bytes(self.read_array()?))
	}

	/// Reads a signed 32-bit integer
	pub fn read_i32(&mut self) -> Result<i32, GmkError> {
		Ok(i32::from_le_bytes(self.read_array()?))
	}

	/// Reads a 64-bit float
	pub fn read_f64(&mut self) -> Result<f64, GmkError> {
		Ok(f64::from_le_bytes(self.read_array()?))
	}

	/// Reads a boolean stored as a 32-bit tag
	pub fn read_bool(&mut self) -> Result<bool, GmkError> {
		Ok(self.read_u32()? != 0)
	}

	/// Reads a timestamp
	pub fn read_timestamp(&mut self) -> Result<Timestamp, GmkError> {
		Ok(Timestamp::from_days(self.read_f64()?))
	}

	/// Reads a 32-bit length prefix and checks that many bytes are available
	fn read_len(&mut self) -> Result<usize, GmkError> {
		let offset = self.offset();
		let len = self.read_u32()? as usize;
		if len > self.remaining() {
			return Err(GmkError::underflow(offset + 4, len, self.remaining()));
		}
		Ok(len)
	}

	/// Reads a length-prefixed byte blob
	pub fn read_blob(&mut self) -> Result<Vec<u8>, GmkError> {
		let len = self.read_len()?;
		Ok(self.read_bytes(len)?.to_vec())
	}

	/// Reads a length-prefixed string.
	///
	/// Files written by the original editors store ANSI text, so bytes that are
	/// not valid UTF-8 are decoded as Windows-1252 instead of failing.
	pub fn read_string(&mut self) -> Result<String, GmkError> {
		let offset = self.offset();
		let bytes = self.read_blob()?;
		match String::from_utf8(bytes) {
			Ok(s) => Ok(s),
			Err(e) => {
				warn!("String at offset {offset:#x} is not UTF-8, decoding as Windows-1252");
				let (cow, _, _) = WINDOWS_1252.decode(e.as_bytes());
				Ok(cow.into_owned())
			}
		}
	}

	/// Reads a length prefix and returns a new stream owning exactly that many bytes.
	///
	/// The outer cursor advances past the framed block.
	pub fn extract(&mut self) -> Result<Stream, GmkError> {
		let len = self.read_len()?;
		let origin = self.offset();
		let data = self.read_bytes(len)?.to_vec();
		Ok(Stream {
			data,
			position: 0,
			origin,
		})
	}

	/// Appends raw bytes without a length prefix
	pub fn write_bytes(&mut self, bytes: &[u8]) {
		self.data.extend_from_slice(bytes);
	}

	/// Appends a single byte
	pub fn write_u8(&mut self, value: u8) {
		self.data.push(value);
	}

	/// Appends an unsigned 32-bit integer
	pub fn write_u32(&mut self, value: u32) {
		self.data.extend_from_slice(&value.to_le_bytes());
	}

	/// Appends a signed 32-bit integer
	pub fn write_i32(&mut self, value: i32) {
		self.data.extend_from_slice(&value.to_le_bytes());
	}

	/// Appends a 64-bit float
	pub fn write_f64(&mut self, value: f64) {
		self.data.extend_from_slice(&value.to_le_bytes());
	}

	/// Appends a boolean as a 32-bit tag
	pub fn write_bool(&mut self, value: bool) {
		self.write_u32(u32::from(value));
	}

	/// Appends a timestamp
	pub fn write_timestamp(&mut self, value: Timestamp) {
		self.write_f64(value.days());
	}

	fn write_len(&mut self, length: usize) -> Result<(), GmkError> {
		let length = u32::try_from(length).map_err(|_| GmkError::PayloadTooLarge {
			length,
		})?;
		self.write_u32(length);
		Ok(())
	}

	/// Appends a length-prefixed byte blob
	pub fn write_blob(&mut self, bytes: &[u8]) -> Result<(), GmkError> {
		self.write_len(bytes.len())?;
		self.write_bytes(bytes);
		Ok(())
	}

	/// Appends a length-prefixed UTF-8 string
	pub fn write_string(&mut self, value: &str) -> Result<(), GmkError> {
		self.write_blob(value.as_bytes())
	}

	/// Appends the full contents of another stream, prefixed by its length
	pub fn embed(&mut self, sub: &Stream) -> Result<(), GmkError> {
		self.write_blob(&sub.data)
	}
}
