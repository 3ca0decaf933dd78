//! Benchmark helper utilities for gmk-rs
//!
//! This module provides utilities for generating synthetic projects and
//! payloads for the gmk-rs benchmark suite.
//!
//! No real project files ship with the repository, so every workload is built
//! in memory. [`generate_project`] scales with its `scale` argument: each unit
//! adds one sprite, one script, one object and one room.

use gmk_types::file::{Instance, Object, Project, Room, Script, Sprite, Subimage};

/// Generates `len` bytes of a deterministic, non-repeating-looking pattern
pub fn generate_payload(len: usize) -> Vec<u8> {
	(0..len).map(|i| (i.wrapping_mul(31) ^ (i >> 8)) as u8).collect()
}

/// Generates a project with `scale` resources of each main kind
pub fn generate_project(scale: usize) -> Project {
	let mut project = Project::new();

	for i in 0..scale {
		let mut sprite = Sprite::new(format!("spr_{i:04}"));
		sprite.width = 32;
		sprite.height = 32;
		sprite.subimages = (0..4)
			.map(|_| Subimage {
				width: 32,
				height: 32,
				pixels: generate_payload(32 * 32 * 4),
			})
			.collect();
		let sprite_handle = project.sprites_mut().push(sprite);

		let source = format!("// generated\nvar n{i};\nn{i} = {i};\nshow_debug_message(string(n{i}));\n").repeat(8);
		project.scripts_mut().push(Script::new(format!("scr_{i:04}"), source));

		let mut object = Object::new(format!("obj_{i:04}"));
		object.sprite = sprite_handle.into();
		let object_handle = project.objects_mut().push(object);

		let mut room = Room::new(format!("rm_{i:04}"));
		room.instances = (0..16)
			.map(|n| Instance {
				x: (n % 4) as i32 * 64,
				y: (n / 4) as i32 * 64,
				object: object_handle.into(),
				id: 100_000 + (i * 16 + n) as u32,
				..Instance::default()
			})
			.collect();
		project.rooms_mut().push(room);
	}

	populate_tree(&mut project);
	project
}

fn populate_tree(project: &mut Project) {
	let sprites: Vec<Sprite> = project.sprites().iter().cloned().collect();
	let scripts: Vec<Script> = project.scripts().iter().cloned().collect();
	let rooms: Vec<Room> = project.rooms().iter().cloned().collect();

	let tree = project.tree_mut();
	for sprite in &sprites {
		tree.add_resource(sprite);
	}
	for script in &scripts {
		tree.add_resource(script);
	}
	for room in &rooms {
		tree.add_resource(room);
	}
}

