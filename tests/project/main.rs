//! Integration tests for project files, driven through the public prelude

use gmk_rs::prelude::{
	file::{JunkSize, Tiling, Timestamp},
	*,
};

mod fixtures;

fn sample_project() -> Project {
	let mut project = Project::new();

	let mut background = Background::new("bg_tiles");
	background.width = 64;
	background.height = 64;
	background.use_as_tileset = true;
	background.tiling = Tiling {
		tile_width: 32,
		tile_height: 32,
		..Tiling::default()
	};
	background.data = Some(vec![0x11; 64]);
	project.backgrounds_mut().push(background);

	let mut room = Room::new("rm_title");
	room.caption = "Title".to_string();
	let room = project.rooms_mut().push(room);

	let mut path = Path {
		meta: ResourceMeta::named("pth_intro"),
		..Path::default()
	};
	path.room = room.into();
	project.paths_mut().push(path);

	project.scripts_mut().push(Script::new("scr_init", "global.lives = 3;"));
	project.triggers_mut().push(Trigger::new("trg_low_health", "return hp < 10;"));
	project.include_files_mut().push(IncludeFile::new("readme", "readme.txt", b"Have fun".to_vec()));
	project.game_information_mut().text = "Arrow keys move, space jumps.".to_string();

	let backgrounds: Vec<Background> = project.backgrounds().iter().cloned().collect();
	let scripts: Vec<Script> = project.scripts().iter().cloned().collect();
	let tree = project.tree_mut();
	for background in &backgrounds {
		tree.add_resource(background);
	}
	let startup = tree.get_branch(GroupKind::Scripts).add_filter("Startup");
	for script in &scripts {
		startup.add_resource(script);
	}

	project
}

#[test_log::test]
fn test_save_and_open_file() {
	let path = std::env::temp_dir().join(format!("gmk_rs_save_open_{}.gmk", std::process::id()));
	let mut project = sample_project();

	project.save(&path, &SaveOptions::gm81(777)).unwrap();
	let reopened = Project::open(&path).unwrap();
	std::fs::remove_file(&path).unwrap();

	assert_eq!(reopened.version(), FormatVersion::Gm81);
	assert_eq!(reopened.seed(), Some(777));
	assert_eq!(reopened, project);
	assert_eq!(reopened.paths().get(0).unwrap().room.handle(), Some(Handle::new(ResourceKind::Room, 0)));
}

#[test_log::test]
fn test_open_missing_file_is_io_error() {
	let path = std::env::temp_dir().join("gmk_rs_definitely_missing.gmk");
	let err = Project::open(&path).unwrap_err();
	assert!(matches!(err, GmkError::Io(_)), "{err:?}");
}

#[test_log::test]
fn test_downgrade_then_upgrade() {
	let mut project = sample_project();

	let plain = project.to_bytes(&SaveOptions::gm7()).unwrap();
	assert_eq!(project.seed(), None);
	let mut downgraded = Project::from_bytes(&plain).unwrap();
	assert_eq!(downgraded.version(), FormatVersion::Gm7);

	// Triggers have no 7 representation; the slot survives as a tombstone
	assert_eq!(downgraded.triggers().len(), 1);
	assert_eq!(downgraded.triggers().live_count(), 0);
	assert_eq!(downgraded.scripts(), project.scripts());
	assert_eq!(downgraded.tree(), project.tree());

	let sealed = downgraded.to_bytes(&SaveOptions::gm81(4242)).unwrap();
	let upgraded = Project::from_bytes(&sealed).unwrap();
	assert_eq!(upgraded.version(), FormatVersion::Gm81);
	assert_eq!(upgraded.rooms(), project.rooms());
	assert_eq!(upgraded.include_files(), project.include_files());
}

#[test_log::test]
fn test_matching_options_reproduce_bytes() {
	let fixed = JunkSize::Fixed {
		before: 10,
		after: 20,
	};
	let mut project = sample_project();
	let first = project.to_bytes(&SaveOptions::gm81(99).with_junk(fixed)).unwrap();

	let mut reopened = Project::from_bytes(&first).unwrap();
	let second = reopened.to_bytes(&SaveOptions::matching(&reopened).with_junk(fixed)).unwrap();
	assert_eq!(first, second);
}

#[test_log::test]
fn test_seed_changes_ciphertext_only() {
	let fixed = JunkSize::Fixed {
		before: 0,
		after: 0,
	};
	let mut project = sample_project();
	let a = project.to_bytes(&SaveOptions::gm81(1).with_junk(fixed)).unwrap();
	let b = project.to_bytes(&SaveOptions::gm81(2).with_junk(fixed)).unwrap();

	assert_eq!(a.len(), b.len());
	assert_ne!(a, b);
	assert_eq!(Project::from_bytes(&a).unwrap().scripts(), Project::from_bytes(&b).unwrap().scripts());
}

#[test_log::test]
fn test_hand_assembled_plain_file() {
	let bytes = fixtures::plain_file_with_one_script();
	let project = Project::from_bytes(&bytes).unwrap();

	assert_eq!(project.version(), FormatVersion::Gm7);
	assert_eq!(project.seed(), None);
	assert_eq!(project.live_count(), 1);

	let script = project.scripts().get(0).unwrap();
	assert_eq!(script.name(), "scr_café");
	assert_eq!(script.source, "x = 1;");
	assert_eq!(script.meta.last_changed, Timestamp::default());

	let info = project.game_information();
	assert_eq!(info.caption, "Help");
	assert_eq!(info.text, "Read me");

	let roots = project.tree().roots();
	assert_eq!(roots.len(), 1);
	assert_eq!(roots[0].group, GroupKind::Scripts);
	assert_eq!(roots[0].children[0].resource.handle(), Some(Handle::new(ResourceKind::Script, 0)));
}

#[test_log::test]
fn test_hand_assembled_file_reencodes_identically() {
	let bytes = fixtures::plain_file_with_one_script();
	let mut project = Project::from_bytes(&bytes).unwrap();
	let reencoded = project.to_bytes(&SaveOptions::gm7()).unwrap();

	// The Windows-1252 names come back as UTF-8: one extra byte per 'é'
	assert_eq!(reencoded.len(), bytes.len() + 2);
	assert_eq!(reencoded[..8], bytes[..8]);
	assert_eq!(Project::from_bytes(&reencoded).unwrap(), project);
}

#[test_log::test]
fn test_tree_leaf_to_missing_resource() {
	let mut bytes = fixtures::plain_file_with_one_script();
	// The leaf index is the last i32 before the leaf's label
	let leaf_index = fixtures::leaf_index_offset(&bytes);
	bytes[leaf_index..leaf_index + 4].copy_from_slice(&5i32.to_le_bytes());

	let err = Project::from_bytes(&bytes).unwrap_err();
	assert!(
		matches!(
			err,
			GmkError::DanglingTreeNode {
				to: ResourceKind::Script,
				index: 5,
				..
			}
		),
		"{err:?}"
	);
}

#[test_log::test]
fn test_remove_resource_then_save() {
	let mut project = sample_project();
	assert!(project.remove_resource(ResourceKind::Room, 0));

	let bytes = project.to_bytes(&SaveOptions::gm81(5)).unwrap();
	let decoded = Project::from_bytes(&bytes).unwrap();
	assert_eq!(decoded.rooms().len(), 0);
	assert_eq!(decoded.paths().get(0).unwrap().room, ResourceRef::Empty);
}

#[test_log::test]
fn test_json_dump_skips_payloads() {
	let project = sample_project();
	let json = serde_json::to_value(&project).unwrap();

	assert_eq!(json["backgrounds"][0]["meta"]["name"], "bg_tiles");
	assert!(json["backgrounds"][0].get("data").is_none());
	assert!(json["include_files"][0].get("data").is_none());
	assert!(json.get("tables").is_none());
}
