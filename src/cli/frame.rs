//! Frame command: render one creature frame for quick inspection

use std::path::PathBuf;
use std::process::ExitCode;

use crate::generator::{Archetype, PixelArtGenerator, PlaceholderGenerator};
use crate::models::{AnimationType, CreatureSpec, Frame, ThemeConfig};
use crate::output::{save_png, scale_image};
use crate::variant::shift;

use super::{load_factory_config, EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};

/// Arguments of the `frame` subcommand
pub struct FrameArgs {
    pub output: PathBuf,
    pub theme: Option<String>,
    pub creature: usize,
    pub animation: AnimationType,
    pub frame: usize,
    pub variant: u32,
    pub variants: Option<u32>,
    pub resolution: Option<u32>,
    pub scale: u32,
    pub config: Option<PathBuf>,
}

/// Draw (and recolor) a single frame.
fn render_frame(
    theme: &ThemeConfig,
    resolution: u32,
    frames: usize,
    args: &FrameArgs,
    total_variants: u32,
) -> Result<Frame, crate::error::SpriteError> {
    let generator = PlaceholderGenerator::new(resolution)?.with_frames_per_animation(frames);
    let frame = generator.generate_single_creature(theme, args.creature, args.animation, args.frame)?;
    shift(&frame, args.variant, total_variants)
}

/// Execute the frame command
pub fn run_frame(args: FrameArgs) -> ExitCode {
    let config = match load_factory_config(args.config.as_deref()) {
        Ok(config) => config,
        Err(code) => return code,
    };

    let theme_name = args.theme.clone().unwrap_or_else(|| config.defaults.theme.clone());
    let theme = match config.theme(&theme_name) {
        Ok(theme) => theme,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    };

    let resolution = args.resolution.unwrap_or(config.defaults.resolution);
    let total_variants = args.variants.unwrap_or(config.defaults.num_variants);
    let frames = config.defaults.frames_per_animation;

    let image = match render_frame(&theme, resolution, frames, &args, total_variants) {
        Ok(frame) => scale_image(frame, args.scale),
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    };

    if let Err(e) = save_png(&image, &args.output) {
        eprintln!("Error: Failed to save '{}': {}", args.output.display(), e);
        return ExitCode::from(EXIT_ERROR);
    }

    let spec = CreatureSpec::new(&theme.name, args.creature, args.variant);
    println!(
        "Saved: {} ({} {}, {} frame {})",
        args.output.display(),
        spec.variant_id(),
        Archetype::for_creature(args.creature).name(),
        args.animation,
        args.frame + 1
    );
    ExitCode::from(EXIT_SUCCESS)
}
