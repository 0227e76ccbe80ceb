//! chordmon - name the chord formed by a set of held notes
//!
//! Subcommands:
//! - `chordmon detect <NOTE>...` - Name the chord for a snapshot of notes
//! - `chordmon catalog` - List every chord the detector knows
//! - `chordmon config` - Show the effective configuration

use std::path::PathBuf;

use anyhow::{Context, Result};
use chord_detect::{ChordCatalog, ChordMatcher};
use chordconf::{ChordmonConfig, OutputFormat};
use clap::{Parser, Subcommand};
use tracing::debug;

use chordmon::commands::{self, DetectReport};
use chordmon::telemetry;

#[derive(Parser)]
#[command(name = "chordmon")]
#[command(about = "Name the chord formed by a set of held notes")]
#[command(version)]
struct Cli {
    /// Config file (replaces ./chordmon.toml); must exist
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Name the chord for a set of held notes
    Detect {
        /// Note numbers (60) or names (C4, F#3, Bb2)
        #[arg(required = true, allow_negative_numbers = true)]
        notes: Vec<String>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,

        /// Print only the chord label
        #[arg(long)]
        no_notes: bool,
    },

    /// List every chord in the catalog
    Catalog {
        /// Only list chords on this root (e.g., C, F#, Bb)
        #[arg(short, long)]
        root: Option<String>,
    },

    /// Show the effective configuration and where it came from
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let (config, sources) = ChordmonConfig::load_with_sources_from(cli.config.as_deref())
        .context("Failed to load configuration")?;

    telemetry::init(&config.telemetry.log_level);
    debug!(files = ?sources.files, env = ?sources.env_overrides, "configuration loaded");

    match cli.command {
        Commands::Detect {
            notes,
            json,
            no_notes,
        } => {
            let pitches = commands::parse_notes(&notes)?;
            let format = if json {
                OutputFormat::Json
            } else {
                config.display.format
            };
            let show_notes = config.display.show_notes && !no_notes;

            let report = DetectReport::new(&ChordMatcher::default(), &pitches);
            println!("{}", report.render(format, show_notes)?);
        }
        Commands::Catalog { root } => {
            let root = root.as_deref().map(commands::parse_root).transpose()?;
            print!("{}", commands::render_catalog(ChordCatalog::global(), root));
        }
        Commands::Config => {
            print!("{}", config.to_toml()?);
            for file in &sources.files {
                eprintln!("# loaded {}", file.display());
            }
            for var in &sources.env_overrides {
                eprintln!("# env {}", var);
            }
        }
    }

    Ok(())
}
