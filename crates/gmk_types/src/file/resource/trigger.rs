//! Trigger resources (8.1 lineage only).
//!
//! ```text
//! condition, moment, constant_name
//! ```
//!
//! The 7 lineage has no triggers: every slot encodes to an empty block and
//! decodes as a tombstone.

use serde::{Deserialize, Serialize};

use super::{Resource, ResourceKind, ResourceMeta, read_enum};
use crate::file::{GmkError, stream::Stream, version::Lineage};

/// When during a step a trigger condition is checked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u32)]
pub enum CheckMoment {
	/// Before the step event
	Begin = 0,
	/// With the step event
	#[default]
	Middle = 1,
	/// After the step event
	End = 2,
}

impl CheckMoment {
	/// Converts a u32 value to `CheckMoment`
	pub fn from_u32(value: u32) -> Option<Self> {
		match value {
			0 => Some(Self::Begin),
			1 => Some(Self::Middle),
			2 => Some(Self::End),
			_ => None,
		}
	}
}

/// Trigger resource
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Trigger {
	/// Shared header
	pub meta: ResourceMeta,
	/// Condition expression
	pub condition: String,
	/// When the condition is checked
	pub moment: CheckMoment,
	/// Name of the constant bound to the trigger's event number
	pub constant_name: String,
}

impl Trigger {
	/// Creates a trigger with the given name and condition
	pub fn new(name: impl Into<String>, condition: impl Into<String>) -> Self {
		Self {
			meta: ResourceMeta::named(name),
			condition: condition.into(),
			..Self::default()
		}
	}
}

impl Resource for Trigger {
	const KIND: ResourceKind = ResourceKind::Trigger;

	fn meta(&self) -> &ResourceMeta {
		&self.meta
	}

	fn meta_mut(&mut self) -> &mut ResourceMeta {
		&mut self.meta
	}

	fn represented_in(lineage: Lineage) -> bool {
		matches!(lineage, Lineage::Gm81)
	}

	fn read_fields(&mut self, _lineage: Lineage, stream: &mut Stream) -> Result<(), GmkError> {
		self.condition = stream.read_string()?;
		self.moment = read_enum(stream, "trigger moment", CheckMoment::from_u32)?;
		self.constant_name = stream.read_string()?;
		Ok(())
	}

	fn write_fields(&self, _lineage: Lineage, stream: &mut Stream) -> Result<(), GmkError> {
		stream.write_string(&self.condition)?;
		stream.write_u32(self.moment as u32);
		stream.write_string(&self.constant_name)
	}
}
