//! Generate command implementation

use std::path::PathBuf;
use std::process::ExitCode;

use crate::config::{merge_cli_overrides, CliOverrides, ConfigError};
use crate::pack::ExportOptions;
use crate::pipeline::{default_pack_name, pack_exists, CreaturePackPipeline, GenerationConfig};

use super::{load_factory_config, EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};

/// Arguments of the `generate` subcommand
pub struct GenerateArgs {
    pub pack_name: Option<String>,
    pub theme: Option<String>,
    pub resolution: Option<u32>,
    pub count: Option<usize>,
    pub variants: Option<u32>,
    pub frames: Option<usize>,
    pub spacing: Option<u32>,
    pub output: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub jobs: usize,
    pub no_archive: bool,
    pub cleanup: bool,
}

const RULE: &str = "============================================================";

pub fn run_generate(args: GenerateArgs) -> ExitCode {
    let mut config = match load_factory_config(args.config.as_deref()) {
        Ok(config) => config,
        Err(code) => return code,
    };

    let overrides = CliOverrides {
        output_dir: args.output,
        resolution: args.resolution,
        theme: args.theme,
        num_creatures: args.count,
        num_variants: args.variants,
        frames_per_animation: args.frames,
        sheet_spacing: args.spacing,
        ..Default::default()
    };
    merge_cli_overrides(&mut config, &overrides);

    let errors = config.validate();
    if !errors.is_empty() {
        for error in errors {
            eprintln!("Error: {}", error);
        }
        return ExitCode::from(EXIT_INVALID_ARGS);
    }

    let defaults = &config.defaults;
    let theme = match config.theme(&defaults.theme) {
        Ok(theme) => theme,
        Err(e @ ConfigError::UnknownTheme { .. }) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let pack_name = args
        .pack_name
        .unwrap_or_else(|| default_pack_name(&defaults.theme, defaults.resolution));
    let mut gen_config = GenerationConfig::from_defaults(pack_name, defaults);
    gen_config.jobs = args.jobs;

    log::info!("{}", RULE);
    log::info!("Pixel Factory - Asset Pack Generation");
    log::info!("{}", RULE);
    log::info!("Pack Name:       {}", gen_config.pack_name);
    log::info!("Theme:           {}", gen_config.theme_name);
    log::info!("Resolution:      {}x{}", gen_config.resolution, gen_config.resolution);
    log::info!("Creatures:       {}", gen_config.num_creatures);
    log::info!("Variants:        {}", gen_config.num_variants);
    log::info!("Frames:          {}", gen_config.frames_per_animation);
    log::info!("Output:          {}", gen_config.output_dir.display());
    log::info!("Create Archive:  {}", !args.no_archive);
    log::info!("{}", RULE);

    let pipeline = match CreaturePackPipeline::new(gen_config, theme) {
        Ok(pipeline) => pipeline,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    };

    let pack_dir = pipeline.pack_dir();
    if pack_exists(&pack_dir) {
        log::warn!("Overwriting existing pack at {}", pack_dir.display());
    }

    let options = ExportOptions { create_archive: !args.no_archive, cleanup: args.cleanup };
    let report = match pipeline.generate_and_export(options) {
        Ok((_, report)) => report,
        Err(e) => {
            eprintln!("Generation failed: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    println!("{}", RULE);
    println!("Generation Complete!");
    println!("{}", RULE);
    println!("{}", report.summary);
    if report.pack_dir.exists() {
        println!("Pack:            {}", report.pack_dir.display());
    }
    if let Some(archive) = &report.archive_path {
        println!("Archive:         {}", archive.display());
    }
    println!("{}", RULE);

    ExitCode::from(EXIT_SUCCESS)
}
