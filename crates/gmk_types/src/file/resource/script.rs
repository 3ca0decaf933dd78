//! Script resources: a name and its source text.

use serde::{Deserialize, Serialize};

use super::{Resource, ResourceKind, ResourceMeta};
use crate::file::{GmkError, stream::Stream, version::Lineage};

/// Script resource
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Script {
	/// Shared header
	pub meta: ResourceMeta,
	/// Source code
	pub source: String,
}

impl Script {
	/// Creates a script with the given name and source
	pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
		Self {
			meta: ResourceMeta::named(name),
			source: source.into(),
		}
	}
}

impl Resource for Script {
	const KIND: ResourceKind = ResourceKind::Script;

	fn meta(&self) -> &ResourceMeta {
		&self.meta
	}

	fn meta_mut(&mut self) -> &mut ResourceMeta {
		&mut self.meta
	}

	fn read_fields(&mut self, _lineage: Lineage, stream: &mut Stream) -> Result<(), GmkError> {
		self.source = stream.read_string()?;
		Ok(())
	}

	fn write_fields(&self, _lineage: Lineage, stream: &mut Stream) -> Result<(), GmkError> {
		stream.write_string(&self.source)
	}
}
