//! Timeline resources.

use serde::{Deserialize, Serialize};

use super::{Action, Resource, ResourceKind, ResourceMeta, ResourceRef, read_count};
use crate::file::{GmkError, stream::Stream, version::Lineage};

/// Actions run at one step of a timeline
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Moment {
	/// Step at which the moment fires
	pub position: u32,
	/// Actions, in execution order
	pub actions: Vec<Action>,
}

/// Timeline resource
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Timeline {
	/// Shared header
	pub meta: ResourceMeta,
	/// Moments, in persisted order
	pub moments: Vec<Moment>,
}

impl Timeline {
	/// Creates an empty timeline with the given name
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			meta: ResourceMeta::named(name),
			..Self::default()
		}
	}
}

impl Resource for Timeline {
	const KIND: ResourceKind = ResourceKind::Timeline;

	fn meta(&self) -> &ResourceMeta {
		&self.meta
	}

	fn meta_mut(&mut self) -> &mut ResourceMeta {
		&mut self.meta
	}

	fn read_fields(&mut self, _lineage: Lineage, stream: &mut Stream) -> Result<(), GmkError> {
		// position + action count
		let count = read_count(stream, 8)?;
		self.moments = Vec::with_capacity(count);
		for _ in 0..count {
			let position = stream.read_u32()?;
			let actions = Action::read_list(stream)?;
			self.moments.push(Moment {
				position,
				actions,
			});
		}
		Ok(())
	}

	fn write_fields(&self, _lineage: Lineage, stream: &mut Stream) -> Result<(), GmkError> {
		stream.write_u32(self.moments.len() as u32);
		for moment in &self.moments {
			stream.write_u32(moment.position);
			Action::write_list(&moment.actions, stream)?;
		}
		Ok(())
	}

	fn for_each_ref(&mut self, f: &mut dyn FnMut(&mut ResourceRef)) {
		for action in self.moments.iter_mut().flat_map(|m| m.actions.iter_mut()) {
			action.for_each_ref(f);
		}
	}
}
