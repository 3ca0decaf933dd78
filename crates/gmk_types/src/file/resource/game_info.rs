//! Game information: the help text shown from inside the game.
//!
//! Not a collection; the resource block ends with exactly one embedded
//! game information block.
//!
//! ```text
//! background_color, separate_window, caption, left, top, width, height,
//! show_border, allow_resize, always_on_top, freeze_game, [8.1] last_changed, text
//! ```

use serde::{Deserialize, Serialize};

use crate::file::{GmkError, stream::Stream, timestamp::Timestamp, version::Lineage};

/// Game information block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameInformation {
	/// Window background colour, 0x00BBGGRR
	pub background_color: u32,
	/// Show in a separate window instead of the game window
	pub separate_window: bool,
	/// Window caption
	pub caption: String,
	/// Window left position
	pub left: i32,
	/// Window top position
	pub top: i32,
	/// Window width
	pub width: u32,
	/// Window height
	pub height: u32,
	/// Show the window border and caption
	pub show_border: bool,
	/// Allow the player to resize the window
	pub allow_resize: bool,
	/// Keep the window on top
	pub always_on_top: bool,
	/// Pause the game while shown
	pub freeze_game: bool,
	/// Last modification time (8.1 lineage only)
	pub last_changed: Timestamp,
	/// Rich text contents
	pub text: String,
}

impl Default for GameInformation {
	fn default() -> Self {
		Self {
			background_color: 0x00FF_FFE1,
			separate_window: false,
			caption: "Game Information".to_string(),
			left: -1,
			top: -1,
			width: 600,
			height: 400,
			show_border: true,
			allow_resize: true,
			always_on_top: false,
			freeze_game: true,
			last_changed: Timestamp::default(),
			text: String::new(),
		}
	}
}

impl GameInformation {
	/// Reads the block's fields in the lineage's order
	pub fn read(lineage: Lineage, stream: &mut Stream) -> Result<Self, GmkError> {
		let mut info = Self {
			background_color: stream.read_u32()?,
			separate_window: stream.read_bool()?,
			caption: stream.read_string()?,
			left: stream.read_i32()?,
			top: stream.read_i32()?,
			width: stream.read_u32()?,
			height: stream.read_u32()?,
			show_border: stream.read_bool()?,
			allow_resize: stream.read_bool()?,
			always_on_top: stream.read_bool()?,
			freeze_game: stream.read_bool()?,
			..Self::default()
		};
		if lineage.has_timestamps() {
			info.last_changed = stream.read_timestamp()?;
		}
		info.text = stream.read_string()?;
		Ok(info)
	}

	/// Writes the block's fields in the lineage's order
	pub fn write(&self, lineage: Lineage, stream: &mut Stream) -> Result<(), GmkError> {
		stream.write_u32(self.background_color);
		stream.write_bool(self.separate_window);
		stream.write_string(&self.caption)?;
		stream.write_i32(self.left);
		stream.write_i32(self.top);
		stream.write_u32(self.width);
		stream.write_u32(self.height);
		stream.write_bool(self.show_border);
		stream.write_bool(self.allow_resize);
		stream.write_bool(self.always_on_top);
		stream.write_bool(self.freeze_game);
		if lineage.has_timestamps() {
			stream.write_timestamp(self.last_changed);
		}
		stream.write_string(&self.text)
	}
}
