//! Hand-assembled project files, built without the crate's encoder

const MAGIC: u32 = 1_234_321;

fn u32_le(out: &mut Vec<u8>, value: u32) {
	out.extend_from_slice(&value.to_le_bytes());
}

fn i32_le(out: &mut Vec<u8>, value: i32) {
	out.extend_from_slice(&value.to_le_bytes());
}

fn blob(out: &mut Vec<u8>, bytes: &[u8]) {
	u32_le(out, bytes.len() as u32);
	out.extend_from_slice(bytes);
}

/// A 7 file with one script named `scr_café` (Windows-1252) under a
/// `Scripts` root, and a short game information block.
pub fn plain_file_with_one_script() -> Vec<u8> {
	let mut resources = Vec::new();
	// background, sprite, sound, path collections: empty
	for _ in 0..4 {
		blob(&mut resources, &0u32.to_le_bytes());
	}

	let mut script = Vec::new();
	u32_le(&mut script, 1);
	blob(&mut script, b"scr_caf\xE9");
	blob(&mut script, b"x = 1;");
	let mut scripts = Vec::new();
	u32_le(&mut scripts, 1);
	blob(&mut scripts, &script);
	blob(&mut resources, &scripts);

	// font, timeline, object, room, trigger, include file collections: empty
	for _ in 0..6 {
		blob(&mut resources, &0u32.to_le_bytes());
	}

	let mut info = Vec::new();
	u32_le(&mut info, 0x00FF_FFE1);
	u32_le(&mut info, 0);
	blob(&mut info, b"Help");
	i32_le(&mut info, -1);
	i32_le(&mut info, -1);
	u32_le(&mut info, 600);
	u32_le(&mut info, 400);
	for flag in [1, 1, 0, 1] {
		u32_le(&mut info, flag);
	}
	blob(&mut info, b"Read me");
	blob(&mut resources, &info);

	let mut tree = Vec::new();
	u32_le(&mut tree, 1);
	// Scripts root
	u32_le(&mut tree, 1);
	u32_le(&mut tree, 7);
	i32_le(&mut tree, -1);
	blob(&mut tree, b"Scripts");
	u32_le(&mut tree, 1);
	// leaf
	u32_le(&mut tree, 3);
	u32_le(&mut tree, 7);
	i32_le(&mut tree, 0);
	blob(&mut tree, b"scr_caf\xE9");
	u32_le(&mut tree, 0);

	let mut file = Vec::new();
	u32_le(&mut file, MAGIC);
	u32_le(&mut file, 702);
	blob(&mut file, &resources);
	blob(&mut file, &tree);
	file
}

/// Offset of the leaf's resource index in [`plain_file_with_one_script`]
pub fn leaf_index_offset(file: &[u8]) -> usize {
	// leaf label blob (4 + 8 bytes) and child count (4 bytes) close the file
	file.len() - 4 - (4 + 8) - 4
}
