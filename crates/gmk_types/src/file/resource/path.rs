//! Path resources.
//!
//! Same layout in both lineages:
//!
//! ```text
//! connection, closed, precision, room (i32), snap_x, snap_y,
//! count, count × (x f64, y f64, speed f64)
//! ```

use serde::{Deserialize, Serialize};

use super::{Resource, ResourceKind, ResourceMeta, ResourceRef, read_count, read_enum};
use crate::file::{GmkError, stream::Stream, version::Lineage};

const POINT_SIZE: usize = 24;

/// How consecutive points are joined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u32)]
pub enum Connection {
	/// Straight segments
	#[default]
	Straight = 0,
	/// Smooth curve
	Smooth = 1,
}

impl Connection {
	/// Converts a u32 value to `Connection`
	pub fn from_u32(value: u32) -> Option<Self> {
		match value {
			0 => Some(Self::Straight),
			1 => Some(Self::Smooth),
			_ => None,
		}
	}
}

/// A path control point
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PathPoint {
	/// X coordinate
	pub x: f64,
	/// Y coordinate
	pub y: f64,
	/// Speed factor, in percent
	pub speed: f64,
}

impl PathPoint {
	/// Creates a point at full speed
	pub fn new(x: f64, y: f64) -> Self {
		Self {
			x,
			y,
			speed: 100.0,
		}
	}
}

/// Path resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Path {
	/// Shared header
	pub meta: ResourceMeta,
	/// Segment kind
	pub connection: Connection,
	/// Whether the last point connects back to the first
	pub closed: bool,
	/// Smoothing precision, 1 to 8
	pub precision: u32,
	/// Room shown behind the path in the editor
	pub room: ResourceRef,
	/// Editor grid snap X
	pub snap_x: u32,
	/// Editor grid snap Y
	pub snap_y: u32,
	/// Control points
	pub points: Vec<PathPoint>,
}

impl Default for Path {
	fn default() -> Self {
		Self {
			meta: ResourceMeta::default(),
			connection: Connection::default(),
			closed: true,
			precision: 4,
			room: ResourceRef::Empty,
			snap_x: 16,
			snap_y: 16,
			points: Vec::new(),
		}
	}
}

impl Path {
	/// Creates an empty path with the given name
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			meta: ResourceMeta::named(name),
			..Self::default()
		}
	}
}

impl Resource for Path {
	const KIND: ResourceKind = ResourceKind::Path;

	fn meta(&self) -> &ResourceMeta {
		&self.meta
	}

	fn meta_mut(&mut self) -> &mut ResourceMeta {
		&mut self.meta
	}

	fn read_fields(&mut self, _lineage: Lineage, stream: &mut Stream) -> Result<(), GmkError> {
		self.connection = read_enum(stream, "path connection", Connection::from_u32)?;
		self.closed = stream.read_bool()?;
		self.precision = stream.read_u32()?;
		self.room = ResourceRef::read(stream, ResourceKind::Room)?;
		self.snap_x = stream.read_u32()?;
		self.snap_y = stream.read_u32()?;

		let count = read_count(stream, POINT_SIZE)?;
		self.points = Vec::with_capacity(count);
		for _ in 0..count {
			self.points.push(PathPoint {
				x: stream.read_f64()?,
				y: stream.read_f64()?,
				speed: stream.read_f64()?,
			});
		}
		Ok(())
	}

	fn write_fields(&self, _lineage: Lineage, stream: &mut Stream) -> Result<(), GmkError> {
		stream.write_u32(self.connection as u32);
		stream.write_bool(self.closed);
		stream.write_u32(self.precision);
		self.room.write(stream);
		stream.write_u32(self.snap_x);
		stream.write_u32(self.snap_y);

		stream.write_u32(self.points.len() as u32);
		for point in &self.points {
			stream.write_f64(point.x);
			stream.write_f64(point.y);
			stream.write_f64(point.speed);
		}
		Ok(())
	}

	fn for_each_ref(&mut self, f: &mut dyn FnMut(&mut ResourceRef)) {
		f(&mut self.room);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::file::resource::{Collection, Handle, ReferenceTable, Room, test_util::roundtrip};

	fn sample() -> Path {
		Path {
			connection: Connection::Smooth,
			closed: false,
			precision: 6,
			room: ResourceRef::raw(ResourceKind::Room, 0),
			points: vec![PathPoint::new(0.0, 0.0), PathPoint::new(32.5, -8.25), PathPoint {
				x: 64.0,
				y: 64.0,
				speed: 50.0,
			}],
			..Path::new("path_patrol")
		}
	}

	#[test]
	fn test_roundtrip_both_lineages() {
		let path = sample();
		assert_eq!(roundtrip(&path, Lineage::Gm7), path);
		assert_eq!(roundtrip(&path, Lineage::Gm81), path);
	}

	#[test]
	fn test_empty_room_is_minus_one() {
		let path = Path::new("path_free");
		let mut stream = Stream::new();
		path.write_fields(Lineage::Gm81, &mut stream).unwrap();
		assert_eq!(&stream.as_bytes()[12..16], &(-1i32).to_le_bytes());
		assert_eq!(roundtrip(&path, Lineage::Gm81).room, ResourceRef::Empty);
	}

	fn rooms(count: usize) -> ReferenceTable {
		let mut rooms = Collection::new();
		for i in 0..count {
			rooms.push(Room::new(format!("room{i}")));
		}
		let mut table = ReferenceTable::new();
		table.insert(&rooms);
		table
	}

	#[test]
	fn test_finalize_resolves_room() {
		let mut path = sample();
		path.room = ResourceRef::raw(ResourceKind::Room, 2);
		path.finalize(&rooms(5)).unwrap();
		assert_eq!(path.room.handle(), Some(Handle::new(ResourceKind::Room, 2)));
	}

	#[test]
	fn test_finalize_rejects_missing_room() {
		let mut path = sample();
		path.room = ResourceRef::raw(ResourceKind::Room, 5);

		let err = path.finalize(&rooms(5)).unwrap_err();
		assert!(matches!(
			err,
			GmkError::DanglingReference {
				from: ResourceKind::Path,
				to: ResourceKind::Room,
				index: 5,
				..
			}
		));
	}

	#[test]
	fn test_point_count_bounded_by_block() {
		let mut stream = Stream::new();
		stream.write_u32(0);
		stream.write_bool(true);
		stream.write_u32(4);
		stream.write_i32(-1);
		stream.write_u32(16);
		stream.write_u32(16);
		stream.write_u32(1000);
		stream.write_f64(1.0);

		let mut path = Path::default();
		let err = path.read_fields(Lineage::Gm7, &mut stream).unwrap_err();
		assert!(matches!(err, GmkError::StreamUnderflow { .. }));
	}
}
