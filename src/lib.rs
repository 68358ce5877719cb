//! Pixel Factory - procedural pixel creature sprites and asset packs
//!
//! This library provides functionality to:
//! - Draw animated pixel creatures from themes (idle, walk, attack)
//! - Derive hue-rotated color variants without touching shape or transparency
//! - Compose frames into grid-aligned sprite sheets
//! - Write complete asset packs with metadata, README and preview image
//!
//! ```no_run
//! use pixel_factory::config::{default_config, builtin_themes};
//! use pixel_factory::pipeline::{CreaturePackPipeline, GenerationConfig};
//!
//! let config = default_config();
//! let theme = builtin_themes().remove("cute_forest").unwrap();
//! let settings = GenerationConfig::from_defaults("forest_friends", &config.defaults);
//! let pack = CreaturePackPipeline::new(settings, theme)?.generate_pack()?;
//! println!("{} creatures written", pack.creatures.len());
//! # Ok::<(), pixel_factory::pipeline::PipelineError>(())
//! ```

pub mod cli;
pub mod color;
pub mod config;
pub mod error;
pub mod generator;
pub mod metadata;
pub mod models;
pub mod output;
pub mod pack;
pub mod pipeline;
pub mod preview;
pub mod shapes;
pub mod spritesheet;
pub mod variant;

pub use error::SpriteError;
pub use generator::{PixelArtGenerator, PlaceholderGenerator};
pub use models::{AnimationType, CreatureSpec, Frame, ThemeConfig};
