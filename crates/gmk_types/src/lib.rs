//! This crate provides core data types and file format support for the `gmk-rs` project.
//!
//! # File Format
//!
//! A project file holds every design-time resource of a game: sprites, sounds,
//! backgrounds, paths, scripts, fonts, timelines, objects, rooms, triggers,
//! included files and the game information text, plus the resource tree that
//! organizes them in the editor.
//!
//! Two layout lineages are supported:
//!
//! - **7**: plain resource block, no timestamps
//! - **8.1**: resource block wrapped in a seed-keyed substitution cipher, with
//!   a last-changed timestamp on every resource
//!
//! # Examples
//!
//! Using the prelude (recommended):
//!
//! ```no_run
//! use gmk_types::prelude::*;
//!
//! let mut project = Project::open("game.gmk")?;
//! for script in project.scripts() {
//!     println!("{}: {} bytes", script.name(), script.source.len());
//! }
//! project.save("game_copy.gmk", &SaveOptions::matching(&project))?;
//! # Ok::<(), GmkError>(())
//! ```
//!
//! Or use explicit paths:
//!
//! ```no_run
//! use gmk_types::file::{Project, SaveOptions, Script};
//!
//! let mut project = Project::new();
//! project.scripts_mut().push(Script::new("scr_init", "global.score = 0;"));
//! let bytes = project.to_bytes(&SaveOptions::gm81(12345)).unwrap();
//! ```

pub mod file;

/// `use gmk_types::prelude::*;` to import commonly used items.
pub mod prelude;
