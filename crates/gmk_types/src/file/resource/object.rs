//! Object resources.
//!
//! Same layout in both lineages:
//!
//! ```text
//! sprite (i32), solid, visible, depth (i32), persistent, parent (i32), mask (i32),
//! event count, per event: type, number, action list
//! ```

use serde::{Deserialize, Serialize};

use super::{Action, Resource, ResourceKind, ResourceMeta, ResourceRef, read_count};
use crate::file::{GmkError, stream::Stream, version::Lineage};

/// Event type + number + action count
const MIN_EVENT_SIZE: usize = 12;

/// An event handler
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Event {
	/// Event type, e.g. 0 for create, 3 for step
	pub event_type: u32,
	/// Sub-event number within the type
	pub number: u32,
	/// Actions, in execution order
	pub actions: Vec<Action>,
}

/// Object resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Object {
	/// Shared header
	pub meta: ResourceMeta,
	/// Sprite drawn for instances
	pub sprite: ResourceRef,
	/// Solid for collisions
	pub solid: bool,
	/// Drawn
	pub visible: bool,
	/// Drawing depth
	pub depth: i32,
	/// Survives room changes
	pub persistent: bool,
	/// Parent object
	pub parent: ResourceRef,
	/// Sprite used as collision mask
	pub mask: ResourceRef,
	/// Event handlers, in persisted order
	pub events: Vec<Event>,
}

impl Default for Object {
	fn default() -> Self {
		Self {
			meta: ResourceMeta::default(),
			sprite: ResourceRef::Empty,
			solid: false,
			visible: true,
			depth: 0,
			persistent: false,
			parent: ResourceRef::Empty,
			mask: ResourceRef::Empty,
			events: Vec::new(),
		}
	}
}

impl Object {
	/// Creates an empty object with the given name
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			meta: ResourceMeta::named(name),
			..Self::default()
		}
	}
}

impl Resource for Object {
	const KIND: ResourceKind = ResourceKind::Object;

	fn meta(&self) -> &ResourceMeta {
		&self.meta
	}

	fn meta_mut(&mut self) -> &mut ResourceMeta {
		&mut self.meta
	}

	fn read_fields(&mut self, _lineage: Lineage, stream: &mut Stream) -> Result<(), GmkError> {
		self.sprite = ResourceRef::read(stream, ResourceKind::Sprite)?;
		self.solid = stream.read_bool()?;
		self.visible = stream.read_bool()?;
		self.depth = stream.read_i32()?;
		self.persistent = stream.read_bool()?;
		self.parent = ResourceRef::read(stream, ResourceKind::Object)?;
		self.mask = ResourceRef::read(stream, ResourceKind::Sprite)?;

		let count = read_count(stream, MIN_EVENT_SIZE)?;
		self.events = Vec::with_capacity(count);
		for _ in 0..count {
			let event_type = stream.read_u32()?;
			let number = stream.read_u32()?;
			let actions = Action::read_list(stream)?;
			self.events.push(Event {
				event_type,
				number,
				actions,
			});
		}
		Ok(())
	}

	fn write_fields(&self, _lineage: Lineage, stream: &mut Stream) -> Result<(), GmkError> {
		self.sprite.write(stream);
		stream.write_bool(self.solid);
		stream.write_bool(self.visible);
		stream.write_i32(self.depth);
		stream.write_bool(self.persistent);
		self.parent.write(stream);
		self.mask.write(stream);

		stream.write_u32(self.events.len() as u32);
		for event in &self.events {
			stream.write_u32(event.event_type);
			stream.write_u32(event.number);
			Action::write_list(&event.actions, stream)?;
		}
		Ok(())
	}

	fn for_each_ref(&mut self, f: &mut dyn FnMut(&mut ResourceRef)) {
		f(&mut self.sprite);
		f(&mut self.parent);
		f(&mut self.mask);
		for action in self.events.iter_mut().flat_map(|e| e.actions.iter_mut()) {
			action.for_each_ref(f);
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::file::resource::{
		ActionKind, AppliesTo, Collection, ReferenceTable, Sprite, test_util::roundtrip,
	};

	fn sample() -> Object {
		Object {
			sprite: ResourceRef::raw(ResourceKind::Sprite, 0),
			solid: true,
			depth: -10,
			parent: ResourceRef::raw(ResourceKind::Object, 1),
			events: vec![
				Event {
					event_type: 0,
					number: 0,
					actions: vec![Action {
						library_id: 1,
						action_id: 603,
						kind: ActionKind::Code,
						arguments: vec!["hp = 3;".to_string()],
						..Action::default()
					}],
				},
				Event {
					event_type: 4,
					number: 1,
					actions: vec![Action {
						library_id: 1,
						action_id: 203,
						applies_to: AppliesTo::Other,
						..Action::default()
					}],
				},
			],
			..Object::new("obj_player")
		}
	}

	#[test]
	fn test_roundtrip_both_lineages() {
		let object = sample();
		assert_eq!(roundtrip(&object, Lineage::Gm7), object);
		assert_eq!(roundtrip(&object, Lineage::Gm81), object);
	}

	#[test]
	fn test_finalize_checks_every_reference() {
		let mut sprites = Collection::new();
		sprites.push(Sprite::new("spr_player"));
		let mut objects = Collection::new();
		objects.push(Object::new("obj_player"));
		objects.push(Object::new("obj_parent"));

		let mut table = ReferenceTable::new();
		table.insert(&sprites);
		table.insert(&objects);

		let mut object = sample();
		object.finalize(&table).unwrap();
		assert!(object.sprite.handle().is_some());
		assert!(object.parent.handle().is_some());
		assert_eq!(object.mask, ResourceRef::Empty);

		let mut object = sample();
		object.mask = ResourceRef::raw(ResourceKind::Sprite, 1);
		let err = object.finalize(&table).unwrap_err();
		assert!(matches!(
			err,
			GmkError::DanglingReference {
				to: ResourceKind::Sprite,
				index: 1,
				..
			}
		));
	}
}
