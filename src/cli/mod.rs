//! Command-line interface implementation
//!
//! This module provides the CLI entry point and dispatches to submodules
//! for specific command implementations.

mod frame;
mod generate;
mod themes;

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::config::{load_config, ConfigError, FactoryConfig};
use crate::models::AnimationType;

/// Exit codes
pub(crate) const EXIT_SUCCESS: u8 = 0;
pub(crate) const EXIT_ERROR: u8 = 1;
pub(crate) const EXIT_INVALID_ARGS: u8 = 2;

/// Pixel Factory - generate pixel art creature asset packs
#[derive(Parser)]
#[command(name = "pixel-factory")]
#[command(about = "Pixel Factory - generate animated pixel creature sprite packs")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a complete creature asset pack
    Generate {
        /// Name of the pack directory (default: pack_<theme>_<res>x<res>_<timestamp>)
        #[arg(long)]
        pack_name: Option<String>,

        /// Theme to generate (see `themes`)
        #[arg(long)]
        theme: Option<String>,

        /// Sprite resolution in pixels (square)
        #[arg(long)]
        resolution: Option<u32>,

        /// Number of creatures
        #[arg(long)]
        count: Option<usize>,

        /// Color variants per creature, including the base
        #[arg(long)]
        variants: Option<u32>,

        /// Frames per animation
        #[arg(long)]
        frames: Option<usize>,

        /// Pixels between sprite sheet cells
        #[arg(long)]
        spacing: Option<u32>,

        /// Output directory the pack is created in
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Path to factory.toml (default: search upwards from the current directory)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Worker threads (default: one per CPU)
        #[arg(short, long, default_value = "0")]
        jobs: usize,

        /// Skip creating the ZIP archive
        #[arg(long)]
        no_archive: bool,

        /// Remove the pack directory after archiving
        #[arg(long)]
        cleanup: bool,
    },

    /// List available themes
    Themes {
        /// Path to factory.toml
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Render a single creature frame to PNG for inspection
    Frame {
        /// Output PNG file
        #[arg(short, long)]
        output: PathBuf,

        #[arg(long)]
        theme: Option<String>,

        /// Creature index (0-based)
        #[arg(long, default_value = "0")]
        creature: usize,

        /// Animation: idle, walk or attack
        #[arg(long, default_value = "idle", value_parser = parse_animation)]
        animation: AnimationType,

        /// Frame index within the animation (0-based)
        #[arg(long, default_value = "0")]
        frame: usize,

        /// Color variant index (0 = base colors)
        #[arg(long, default_value = "0")]
        variant: u32,

        /// Total variants the hue wheel is divided into
        #[arg(long)]
        variants: Option<u32>,

        #[arg(long)]
        resolution: Option<u32>,

        /// Upscale factor (nearest neighbor)
        #[arg(long, default_value = "1", value_parser = clap::value_parser!(u32).range(1..=64))]
        scale: u32,

        /// Path to factory.toml
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn parse_animation(s: &str) -> Result<AnimationType, String> {
    AnimationType::from_name(s)
        .ok_or_else(|| format!("unknown animation '{}' (expected idle, walk or attack)", s))
}

/// Route `log` output to stderr; `RUST_LOG` still wins when set.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .try_init();
}

/// Load factory.toml, printing the error on failure.
pub(crate) fn load_factory_config(path: Option<&Path>) -> Result<FactoryConfig, ExitCode> {
    match load_config(path) {
        Ok(config) => Ok(config),
        Err(e @ ConfigError::Validation(_)) => {
            eprintln!("Error: {}", e);
            Err(ExitCode::from(EXIT_INVALID_ARGS))
        }
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            Err(ExitCode::from(EXIT_ERROR))
        }
    }
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Generate {
            pack_name,
            theme,
            resolution,
            count,
            variants,
            frames,
            spacing,
            output,
            config,
            jobs,
            no_archive,
            cleanup,
        } => generate::run_generate(generate::GenerateArgs {
            pack_name,
            theme,
            resolution,
            count,
            variants,
            frames,
            spacing,
            output,
            config,
            jobs,
            no_archive,
            cleanup,
        }),
        Commands::Themes { config } => themes::run_themes(config.as_deref()),
        Commands::Frame {
            output,
            theme,
            creature,
            animation,
            frame,
            variant,
            variants,
            resolution,
            scale,
            config,
        } => frame::run_frame(frame::FrameArgs {
            output,
            theme,
            creature,
            animation,
            frame,
            variant,
            variants,
            resolution,
            scale,
            config,
        }),
    }
}
