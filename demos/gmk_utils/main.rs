//! Project file CLI Utility
//!
//! A command-line tool for inspecting, verifying and re-sealing project files.
//!
//! # Features
//!
//! - **info**: Print the format version, seed and per-kind resource counts
//! - **tree**: Print the resource tree as an indented outline
//! - **dump**: Export the decoded project (without raw payloads) as JSON
//! - **verify**: Validate encoder/decoder round-trip accuracy
//! - **reseal**: Rewrite a project as another version or with another seed
//!
//! # Usage
//!
//! ```bash
//! # Show a summary
//! cargo run --example gmk_utils info game.gmk
//!
//! # Print the resource tree
//! cargo run --example gmk_utils tree game.gmk
//!
//! # Dump as JSON (auto output: game.json)
//! cargo run --example gmk_utils dump game.gmk
//!
//! # Verify that re-encoding reproduces the same project
//! cargo run --example gmk_utils verify game.gmk
//!
//! # Convert to the plain 7 layout
//! cargo run --example gmk_utils reseal game.gmk plain.gmk --version 702
//!
//! # Re-cipher with a fixed seed
//! cargo run --example gmk_utils reseal game.gmk sealed.gmk --seed 12345
//! ```

use clap::{Parser, Subcommand};
use gmk_rs::prelude::{
	file::{JunkSize, SoundKind, cipher::checksum},
	*,
};
use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gmk_utils")]
#[command(author = "gmk-rs project")]
#[command(version = "1.0")]
#[command(about = "Project file utility - inspect, dump, verify and re-seal project files", long_about = None)]
struct Cli {
	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	/// Print a summary of a project file
	Info {
		/// Input project file path
		#[arg(value_name = "INPUT")]
		input: PathBuf,

		/// List every live resource by name
		#[arg(short, long)]
		verbose: bool,
	},

	/// Print the resource tree
	Tree {
		/// Input project file path
		#[arg(value_name = "INPUT")]
		input: PathBuf,
	},

	/// Dump the decoded project as JSON
	Dump {
		/// Input project file path
		#[arg(value_name = "INPUT")]
		input: PathBuf,

		/// Output JSON path (optional, defaults to `input.json`)
		#[arg(value_name = "OUTPUT_JSON")]
		output: Option<PathBuf>,
	},

	/// Verify encoder/decoder round-trip accuracy
	Verify {
		/// Input project file path to verify
		#[arg(value_name = "INPUT")]
		input: PathBuf,

		/// Show verbose output
		#[arg(short, long)]
		verbose: bool,
	},

	/// Rewrite a project file with another version or seed
	Reseal {
		/// Input project file path
		#[arg(value_name = "INPUT")]
		input: PathBuf,

		/// Output project file path
		#[arg(value_name = "OUTPUT")]
		output: PathBuf,

		/// Target version marker (702 or 810); defaults to the input's version
		#[arg(long)]
		version: Option<u32>,

		/// Cipher seed; defaults to a fresh random seed
		#[arg(long)]
		seed: Option<u32>,

		/// Junk words written before and after the seed
		#[arg(long, value_name = "WORDS")]
		junk: Option<u32>,
	},
}

/// Handle info command
fn handle_info(input: PathBuf, verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
	let data = fs::read(&input)?;
	let project = Project::from_bytes(&data)?;

	println!("📖 {}", input.display());
	println!("   Version:   {}", project.version());
	match project.seed() {
		Some(seed) => println!("   Seed:      {seed} (0x{})", hex::encode(seed.to_le_bytes())),
		None => println!("   Seed:      none (plain)"),
	}
	println!("   File size: {} bytes", data.len());
	println!("   Resources: {} live", project.live_count());

	for kind in ResourceKind::ALL {
		let count = project.count(kind);
		if count == 0 {
			continue;
		}
		let live = (0..count).filter(|&i| project.resource_name(kind, i).is_some()).count();
		println!("   {:<14} {:4} slots, {:4} live", kind.to_string(), count, live);

		if verbose {
			for index in 0..count {
				if let Some(name) = project.resource_name(kind, index) {
					println!("      #{index:<4} {name}");
				}
			}
		}
	}

	for sound in project.sounds().iter().filter(|s| s.exists()) {
		if sound.kind != SoundKind::Normal || !sound.extension.eq_ignore_ascii_case(".wav") {
			continue;
		}
		match sound.wav_spec() {
			Ok(spec) => println!(
				"   🔊 {}: {} Hz, {} ch, {} bit",
				sound.name(),
				spec.sample_rate,
				spec.channels,
				spec.bits_per_sample
			),
			Err(e) => println!("   ⚠️  {}: {e}", sound.name()),
		}
	}

	let info = project.game_information();
	println!("   Game information: {} bytes of text, edited {}", info.text.len(), info.last_changed);
	Ok(())
}

/// Handle tree command
fn handle_tree(input: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
	let project = Project::open(&input)?;

	project.tree().walk(&mut |node, depth| {
		let marker = match node.status {
			NodeStatus::Primary => "▸",
			NodeStatus::Group => "📁",
			NodeStatus::Secondary => "•",
		};
		let target = node
			.resource
			.handle()
			.map(|h| format!("  ({} #{})", h.kind(), h.index()))
			.unwrap_or_default();
		println!("{}{marker} {}{target}", "  ".repeat(depth), node.label);
	});

	println!("\n{} nodes", project.tree().node_count());
	Ok(())
}

/// Handle dump command
fn handle_dump(input: PathBuf, output: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
	let output = output.unwrap_or_else(|| input.with_extension("json"));
	let project = Project::open(&input)?;

	let json = serde_json::to_string_pretty(&project)?;
	fs::write(&output, json)?;

	println!("✓ Dumped {} -> {}", input.display(), output.display());
	Ok(())
}

/// Handle verify command
fn handle_verify(input: PathBuf, verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
	if verbose {
		println!("🔍 Verifying project file");
		println!("   Input: {}", input.display());
	}

	let original = fs::read(&input)?;
	let mut project = Project::from_bytes(&original)?;
	if verbose {
		println!("   ✓ Decoded {} live resources", project.live_count());
	}

	let options = SaveOptions::matching(&project);
	let encoded = project.to_bytes(&options)?;
	let decoded = Project::from_bytes(&encoded)?;

	if verbose {
		println!("   Original checksum:   0x{:08X}", checksum(&original));
		println!("   Re-encoded checksum: 0x{:08X}", checksum(&encoded));
	}

	if decoded != project {
		println!("❌ Round-trip mismatch for {}", input.display());
		return Err("decoded project differs from the original".into());
	}

	println!("✅ {} round-trips ({} -> {} bytes)", input.display(), original.len(), encoded.len());
	Ok(())
}

/// Handle reseal command
fn handle_reseal(
	input: PathBuf,
	output: PathBuf,
	version: Option<u32>,
	seed: Option<u32>,
	junk: Option<u32>,
) -> Result<(), Box<dyn std::error::Error>> {
	let mut project = Project::open(&input)?;

	let mut options = SaveOptions {
		seed,
		..SaveOptions::matching(&project)
	};
	if let Some(version) = version {
		options.version = FormatVersion::from_u32(version)?;
	}
	if let Some(words) = junk {
		options = options.with_junk(JunkSize::Fixed {
			before: words,
			after: words,
		});
	}

	project.save(&output, &options)?;

	println!(
		"✓ Resealed {} -> {} as {} (seed {:?})",
		input.display(),
		output.display(),
		project.version(),
		project.seed()
	);
	Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
	// Initialize logger with default level set to info if RUST_LOG is not set
	env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

	let cli = Cli::parse();

	match cli.command {
		Commands::Info {
			input,
			verbose,
		} => handle_info(input, verbose),
		Commands::Tree {
			input,
		} => handle_tree(input),
		Commands::Dump {
			input,
			output,
		} => handle_dump(input, output),
		Commands::Verify {
			input,
			verbose,
		} => handle_verify(input, verbose),
		Commands::Reseal {
			input,
			output,
			version,
			seed,
			junk,
		} => handle_reseal(input, output, version, seed, junk),
	}
}
