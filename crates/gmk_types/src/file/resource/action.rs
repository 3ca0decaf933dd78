//! Actions: the drag-and-drop instructions held by timeline moments and object events.
//!
//! Actions are opaque to the container: only the target object reference is
//! interpreted, so that it takes part in the finalize pass.
//!
//! ```text
//! u32 library_id
//! u32 action_id
//! u32 kind
//! i32 applies_to   (-1 self, -2 other, -100 noone, >= 0 object index)
//! bool relative
//! bool negated
//! u32 argument_count
//! argument_count × string
//! ```

use serde::{Deserialize, Serialize};

use super::{ResourceKind, ResourceRef, read_count, read_enum};
use crate::file::{GmkError, stream::Stream};

const APPLIES_TO_SELF: i32 = -1;
const APPLIES_TO_OTHER: i32 = -2;
const APPLIES_TO_NOONE: i32 = -100;

/// Smallest encoded action, used to bound action counts
const MIN_ACTION_SIZE: usize = 28;

/// Structural role of an action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u32)]
pub enum ActionKind {
	/// Ordinary library action
	#[default]
	Normal = 0,
	/// Start of a block
	BeginGroup = 1,
	/// End of a block
	EndGroup = 2,
	/// Else branch
	Else = 3,
	/// Exit the event
	Exit = 4,
	/// Repeat the next action or block
	Repeat = 5,
	/// Variable assignment
	Variable = 6,
	/// Code block
	Code = 7,
}

impl ActionKind {
	/// Converts a u32 value to `ActionKind`
	pub fn from_u32(value: u32) -> Option<Self> {
		match value {
			0 => Some(Self::Normal),
			1 => Some(Self::BeginGroup),
			2 => Some(Self::EndGroup),
			3 => Some(Self::Else),
			4 => Some(Self::Exit),
			5 => Some(Self::Repeat),
			6 => Some(Self::Variable),
			7 => Some(Self::Code),
			_ => None,
		}
	}
}

/// Instance an action runs on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AppliesTo {
	/// The calling instance
	#[default]
	Current,
	/// The other instance of a collision
	Other,
	/// All instances of an object; [`ResourceRef::Empty`] when the object is gone
	Object(ResourceRef),
	/// Any other negative target, kept as stored
	Special(i32),
}

impl AppliesTo {
	fn read(stream: &mut Stream) -> Result<Self, GmkError> {
		Ok(match stream.read_i32()? {
			APPLIES_TO_SELF => Self::Current,
			APPLIES_TO_OTHER => Self::Other,
			APPLIES_TO_NOONE => Self::Object(ResourceRef::Empty),
			value if value < 0 => Self::Special(value),
			index => Self::Object(ResourceRef::from_index(ResourceKind::Object, index)),
		})
	}

	fn stored_value(&self) -> i32 {
		match self {
			Self::Current => APPLIES_TO_SELF,
			Self::Other => APPLIES_TO_OTHER,
			Self::Object(ResourceRef::Empty) => APPLIES_TO_NOONE,
			Self::Object(reference) => reference.stored_index(),
			Self::Special(value) => *value,
		}
	}
}

/// A single drag-and-drop action
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Action {
	/// Id of the action library
	pub library_id: u32,
	/// Id of the action within its library
	pub action_id: u32,
	/// Structural role
	pub kind: ActionKind,
	/// Target instance
	pub applies_to: AppliesTo,
	/// Relative flag
	pub relative: bool,
	/// "NOT" flag of question actions
	pub negated: bool,
	/// Argument expressions
	pub arguments: Vec<String>,
}

impl Action {
	/// Reads one action
	pub fn read(stream: &mut Stream) -> Result<Self, GmkError> {
		let library_id = stream.read_u32()?;
		let action_id = stream.read_u32()?;
		let kind = read_enum(stream, "action kind", ActionKind::from_u32)?;
		let applies_to = AppliesTo::read(stream)?;
		let relative = stream.read_bool()?;
		let negated = stream.read_bool()?;

		let count = read_count(stream, 4)?;
		let mut arguments = Vec::with_capacity(count);
		for _ in 0..count {
			arguments.push(stream.read_string()?);
		}

		Ok(Self {
			library_id,
			action_id,
			kind,
			applies_to,
			relative,
			negated,
			arguments,
		})
	}

	/// Writes one action
	pub fn write(&self, stream: &mut Stream) -> Result<(), GmkError> {
		stream.write_u32(self.library_id);
		stream.write_u32(self.action_id);
		stream.write_u32(self.kind as u32);
		stream.write_i32(self.applies_to.stored_value());
		stream.write_bool(self.relative);
		stream.write_bool(self.negated);
		stream.write_u32(self.arguments.len() as u32);
		for argument in &self.arguments {
			stream.write_string(argument)?;
		}
		Ok(())
	}

	/// Visits the target object reference, if any
	pub fn for_each_ref(&mut self, f: &mut dyn FnMut(&mut ResourceRef)) {
		if let AppliesTo::Object(reference) = &mut self.applies_to {
			f(reference);
		}
	}

	/// Reads a count-prefixed action list
	pub(crate) fn read_list(stream: &mut Stream) -> Result<Vec<Self>, GmkError> {
		let count = read_count(stream, MIN_ACTION_SIZE)?;
		(0..count).map(|_| Self::read(stream)).collect()
	}

	/// Writes a count-prefixed action list
	pub(crate) fn write_list(actions: &[Self], stream: &mut Stream) -> Result<(), GmkError> {
		stream.write_u32(actions.len() as u32);
		actions.iter().try_for_each(|action| action.write(stream))
	}
}
