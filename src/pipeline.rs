//! Pack generation pipeline
//!
//! Coordinates the generator, variant engine and sheet composer to turn a
//! [`GenerationConfig`] into a pack directory:
//!
//! 1. For each creature, draw the base frames of every animation once
//! 2. Derive each color variant from the base frames
//! 3. Save frames, per-animation sheets and the combined sheet
//! 4. Write `metadata.json`, `README.txt` and the pack preview
//!
//! Creatures are independent, so steps 1-3 run in parallel on a rayon pool.

use rayon::prelude::*;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Instant;
use thiserror::Error;

use crate::color::to_hex;
use crate::config::DefaultsConfig;
use crate::error::SpriteError;
use crate::generator::{PixelArtGenerator, PlaceholderGenerator, MIN_RESOLUTION};
use crate::metadata::{save_metadata, save_readme, CreatureMetadata, MetadataError, PackMetadata};
use crate::models::{AnimationType, CreatureSpec, Frame, ThemeConfig};
use crate::output::{save_png, OutputError, PackLayout};
use crate::pack::{export_pack, ExportOptions, ExportReport, PackError};
use crate::preview::{create_pack_preview, PreviewError};
use crate::spritesheet::{compose_animation, compose_combined, SpriteSheet};
use crate::variant::{shift, shift_color};

/// Columns in the pack preview grid
const PREVIEW_COLUMNS: u32 = 5;

/// Error during pack generation.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Invalid generation config:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    InvalidConfig(Vec<String>),
    #[error(transparent)]
    Sprite(#[from] SpriteError),
    #[error("Output error: {0}")]
    Output(#[from] OutputError),
    #[error("Metadata error: {0}")]
    Metadata(#[from] MetadataError),
    #[error("Preview error: {0}")]
    Preview(#[from] PreviewError),
    #[error("Failed to start worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    #[error("generator draws {generator}px frames but the pack is configured for {configured}px")]
    ResolutionMismatch { configured: u32, generator: u32 },
    #[error("Packaging error: {0}")]
    Pack(#[from] PackError),
}

/// Settings for one generation run.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationConfig {
    pub pack_name: String,
    pub theme_name: String,
    pub resolution: u32,
    pub num_creatures: usize,
    /// Variants per creature, including the unshifted base
    pub num_variants: u32,
    pub frames_per_animation: usize,
    pub sheet_spacing: u32,
    pub preview_scale: u32,
    /// Directory the pack directory is created in
    pub output_dir: PathBuf,
    /// Worker threads; 0 lets rayon decide
    pub jobs: usize,
}

impl GenerationConfig {
    /// Generation settings taken from config defaults.
    pub fn from_defaults(pack_name: impl Into<String>, defaults: &DefaultsConfig) -> Self {
        Self {
            pack_name: pack_name.into(),
            theme_name: defaults.theme.clone(),
            resolution: defaults.resolution,
            num_creatures: defaults.num_creatures,
            num_variants: defaults.num_variants,
            frames_per_animation: defaults.frames_per_animation,
            sheet_spacing: defaults.sheet_spacing,
            preview_scale: defaults.preview_scale,
            output_dir: defaults.output_dir.clone(),
            jobs: 0,
        }
    }

    /// Animations generated for every creature, in sheet order.
    pub fn animation_types(&self) -> [AnimationType; 3] {
        AnimationType::ALL
    }

    pub fn layout(&self) -> PackLayout {
        PackLayout::new(&self.output_dir, &self.pack_name)
    }

    /// Check the settings, collecting every problem.
    pub fn validate(&self) -> Result<(), PipelineError> {
        let mut errors = Vec::new();

        let name = self.pack_name.trim();
        if name.is_empty() {
            errors.push("pack name must be non-empty".to_string());
        } else if name.contains(['/', '\\']) || name == "." || name == ".." {
            errors.push(format!("pack name '{}' must be a single path component", self.pack_name));
        }
        if self.resolution < MIN_RESOLUTION {
            errors.push(format!("resolution must be at least {}", MIN_RESOLUTION));
        }
        if self.num_variants == 0 {
            errors.push("num_variants must be at least 1".to_string());
        }
        if self.frames_per_animation == 0 {
            errors.push("frames_per_animation must be at least 1".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(PipelineError::InvalidConfig(errors))
        }
    }
}

/// Frames of every animation of one creature variant.
pub type CreatureFrames = BTreeMap<AnimationType, Vec<Frame>>;

/// What [`CreaturePackPipeline::save_creature_assets`] wrote.
#[derive(Debug, Clone)]
pub struct SavedAssets {
    /// Sheet name (`idle`, `walk`, `attack`, `combined`) to pack-relative path
    pub sheet_paths: BTreeMap<String, String>,
    pub files: Vec<PathBuf>,
    pub combined: SpriteSheet,
}

/// Drives generation of a whole creature pack.
pub struct CreaturePackPipeline {
    config: GenerationConfig,
    theme: ThemeConfig,
    generator: Box<dyn PixelArtGenerator>,
}

impl CreaturePackPipeline {
    /// Create a pipeline using the procedural placeholder generator.
    pub fn new(config: GenerationConfig, theme: ThemeConfig) -> Result<Self, PipelineError> {
        config.validate()?;
        let generator = PlaceholderGenerator::new(config.resolution)?
            .with_frames_per_animation(config.frames_per_animation);
        Ok(Self { config, theme, generator: Box::new(generator) })
    }

    /// Substitute a different frame backend.
    ///
    /// The backend must draw at the configured resolution, otherwise the
    /// metadata would describe frames the pack does not contain.
    pub fn with_generator(mut self, generator: Box<dyn PixelArtGenerator>) -> Result<Self, PipelineError> {
        let (configured, drawn) = (self.config.resolution, generator.resolution());
        if drawn != configured {
            return Err(PipelineError::ResolutionMismatch { configured, generator: drawn });
        }
        self.generator = generator;
        Ok(self)
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    pub fn theme(&self) -> &ThemeConfig {
        &self.theme
    }

    /// Draw the unshifted frames of every animation for one creature.
    fn generate_base(&self, creature_index: usize) -> Result<CreatureFrames, PipelineError> {
        let mut frames = CreatureFrames::new();
        for anim in self.config.animation_types() {
            log::debug!("  creature {} {} animation", creature_index + 1, anim);
            let animation = self.generator.generate_animation_frames(
                &self.theme,
                creature_index,
                anim,
                self.config.frames_per_animation,
            )?;
            let expected = (self.config.resolution, self.config.resolution);
            if let Some(frame) = animation.iter().find(|f| f.dimensions() != expected) {
                return Err(SpriteError::InconsistentFrameSize { expected, found: frame.dimensions() }.into());
            }
            frames.insert(anim, animation);
        }
        Ok(frames)
    }

    fn apply_variant(&self, base: &CreatureFrames, variant_index: u32) -> Result<CreatureFrames, PipelineError> {
        let mut shifted = CreatureFrames::new();
        for (anim, frames) in base {
            let frames = frames
                .iter()
                .map(|f| shift(f, variant_index, self.config.num_variants))
                .collect::<Result<Vec<_>, _>>()?;
            shifted.insert(*anim, frames);
        }
        Ok(shifted)
    }

    /// All animation frames for one creature variant.
    pub fn generate_creature(
        &self,
        creature_index: usize,
        variant_index: u32,
    ) -> Result<CreatureFrames, PipelineError> {
        let base = self.generate_base(creature_index)?;
        if variant_index == 0 {
            return Ok(base);
        }
        self.apply_variant(&base, variant_index)
    }

    /// Write a creature variant's frames and sheets into the pack.
    pub fn save_creature_assets(
        &self,
        spec: &CreatureSpec,
        frames: &CreatureFrames,
    ) -> Result<SavedAssets, PipelineError> {
        let layout = self.config.layout();
        let spacing = self.config.sheet_spacing;
        let mut sheet_paths = BTreeMap::new();
        let mut files = Vec::new();

        for (anim, animation) in frames {
            for (i, frame) in animation.iter().enumerate() {
                let path = layout.frame_path(spec, *anim, i);
                save_png(frame, &path)?;
                files.push(path);
            }

            let sheet = compose_animation(animation, spacing)?;
            let path = layout.sheet_path(spec, *anim);
            save_png(&sheet.image, &path)?;
            sheet_paths.insert(anim.as_str().to_string(), layout.relative(&path));
            files.push(path);
        }

        let combined = compose_combined(frames, spacing)?;
        let path = layout.combined_path(spec);
        save_png(&combined.image, &path)?;
        sheet_paths.insert("combined".to_string(), layout.relative(&path));
        files.push(path);

        Ok(SavedAssets { sheet_paths, files, combined })
    }

    /// Generate and save every variant of one creature.
    ///
    /// Returns per-variant metadata and the base variant's combined sheet.
    fn build_creature(
        &self,
        creature_index: usize,
    ) -> Result<(Vec<CreatureMetadata>, SpriteSheet), PipelineError> {
        let config = &self.config;
        let base = self.generate_base(creature_index)?;
        let mut records = Vec::with_capacity(config.num_variants as usize);
        let mut preview_sheet = None;

        for variant_index in 0..config.num_variants {
            let spec = CreatureSpec::new(&self.theme.name, creature_index, variant_index);
            log::info!("Generating {} (variant {})", spec.creature_id(), variant_index);

            let saved = if variant_index == 0 {
                self.save_creature_assets(&spec, &base)?
            } else {
                self.save_creature_assets(&spec, &self.apply_variant(&base, variant_index)?)?
            };

            let base_color = shift_color(self.theme.base_color, variant_index, config.num_variants)?;
            records.push(CreatureMetadata::new(
                spec.variant_id(),
                &self.theme.name,
                to_hex(base_color),
                variant_index,
                config.resolution,
                saved.sheet_paths,
                config.frames_per_animation,
            ));

            if variant_index == 0 {
                preview_sheet = Some(saved.combined);
            }
        }

        // num_variants >= 1 is checked in `new`
        let sheet = preview_sheet.ok_or(SpriteError::InvalidVariantCount(config.num_variants))?;
        Ok((records, sheet))
    }

    /// Generate the whole pack and write it to disk.
    pub fn generate_pack(&self) -> Result<PackMetadata, PipelineError> {
        let config = &self.config;
        let start = Instant::now();
        log::info!("Starting pack generation: {}", config.pack_name);
        log::info!("Theme: {}, Resolution: {}x{}", config.theme_name, config.resolution, config.resolution);
        log::info!("Creatures: {}, Variants: {}", config.num_creatures, config.num_variants);

        let layout = config.layout();
        if layout.clear_generated()? {
            log::warn!("Removed images from a previous run in {}", layout.root().display());
        }

        let pool = rayon::ThreadPoolBuilder::new().num_threads(config.jobs).build()?;
        let creatures = pool.install(|| {
            (0..config.num_creatures)
                .into_par_iter()
                .map(|idx| self.build_creature(idx))
                .collect::<Result<Vec<_>, _>>()
        })?;

        let mut pack = PackMetadata::new(
            &config.pack_name,
            &config.theme_name,
            config.resolution,
            config.num_creatures,
            config.num_variants,
            config.frames_per_animation,
        );
        let mut preview_sheets = Vec::with_capacity(creatures.len());
        for (records, sheet) in creatures {
            pack.creatures.extend(records);
            preview_sheets.push(sheet);
        }

        save_metadata(&pack, &layout.metadata_path())?;
        log::info!("Metadata saved: {}", layout.metadata_path().display());
        save_readme(&pack, &layout.readme_path())?;
        log::info!("README saved: {}", layout.readme_path().display());

        if preview_sheets.is_empty() {
            log::warn!("No creatures generated, skipping pack preview");
        } else {
            let preview = create_pack_preview(&preview_sheets, config.preview_scale, PREVIEW_COLUMNS)?;
            save_png(&preview, &layout.preview_path())?;
            log::info!("Preview saved: {}", layout.preview_path().display());
        }

        log::info!("Pack generation complete: {} ({:.2?})", layout.root().display(), start.elapsed());
        Ok(pack)
    }

    /// Generate the pack, then validate it and optionally archive it into the
    /// output directory.
    pub fn generate_and_export(
        &self,
        options: ExportOptions,
    ) -> Result<(PackMetadata, ExportReport), PipelineError> {
        let pack = self.generate_pack()?;
        let report = export_pack(&self.pack_dir(), &self.config.output_dir, &pack, options)?;
        Ok((pack, report))
    }

    /// Directory the pack is written to.
    pub fn pack_dir(&self) -> PathBuf {
        self.config.layout().root().to_path_buf()
    }
}

/// Default pack name when none is given: `pack_<theme>_<res>x<res>_<unix time>`.
pub fn default_pack_name(theme_name: &str, resolution: u32) -> String {
    format!("pack_{}_{}x{}_{}", theme_name, resolution, resolution, chrono::Utc::now().timestamp())
}

/// Whether `pack_dir` already holds a generated pack.
pub fn pack_exists(pack_dir: &Path) -> bool {
    pack_dir.join("metadata.json").is_file()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::builtin_themes;
    use image::{Rgba, RgbaImage};
    use tempfile::TempDir;

    fn config(output_dir: &Path) -> GenerationConfig {
        GenerationConfig {
            pack_name: "test_pack".to_string(),
            theme_name: "cute_forest".to_string(),
            resolution: 16,
            num_creatures: 2,
            num_variants: 2,
            frames_per_animation: 4,
            sheet_spacing: 0,
            preview_scale: 2,
            output_dir: output_dir.to_path_buf(),
            jobs: 2,
        }
    }

    fn forest() -> ThemeConfig {
        builtin_themes().remove("cute_forest").unwrap()
    }

    /// Backend that paints each frame a flat color keyed by animation and frame.
    struct FlatGenerator;

    impl PixelArtGenerator for FlatGenerator {
        fn resolution(&self) -> u32 {
            8
        }

        fn generate_single_creature(
            &self,
            _theme: &ThemeConfig,
            creature_index: usize,
            animation_type: AnimationType,
            frame_index: usize,
        ) -> Result<Frame, SpriteError> {
            let r = 60 + 40 * animation_type as u8;
            Ok(RgbaImage::from_pixel(8, 8, Rgba([r, creature_index as u8, frame_index as u8 * 10, 255])))
        }
    }

    #[test]
    fn test_validate_rejects_bad_settings() {
        let temp = TempDir::new().expect("should create temp dir");
        let mut cfg = config(temp.path());
        cfg.pack_name = "../escape".to_string();
        cfg.resolution = 4;
        cfg.num_variants = 0;
        cfg.frames_per_animation = 0;

        match cfg.validate() {
            Err(PipelineError::InvalidConfig(errors)) => assert_eq!(errors.len(), 4),
            other => panic!("expected invalid config, got {:?}", other),
        }
        assert!(CreaturePackPipeline::new(cfg, forest()).is_err());
    }

    #[test]
    fn test_generate_creature_shapes() {
        let temp = TempDir::new().expect("should create temp dir");
        let pipeline = CreaturePackPipeline::new(config(temp.path()), forest()).unwrap();

        let frames = pipeline.generate_creature(0, 0).unwrap();
        assert_eq!(frames.keys().copied().collect::<Vec<_>>(), AnimationType::ALL.to_vec());
        for animation in frames.values() {
            assert_eq!(animation.len(), 4);
            assert!(animation.iter().all(|f| f.dimensions() == (16, 16)));
        }
    }

    #[test]
    fn test_variant_keeps_silhouette() {
        let temp = TempDir::new().expect("should create temp dir");
        let pipeline = CreaturePackPipeline::new(config(temp.path()), forest()).unwrap();

        let base = pipeline.generate_creature(1, 0).unwrap();
        let variant = pipeline.generate_creature(1, 1).unwrap();
        assert_ne!(base, variant);
        for anim in AnimationType::ALL {
            for (a, b) in base[&anim].iter().zip(&variant[&anim]) {
                let alpha_a: Vec<u8> = a.pixels().map(|p| p[3]).collect();
                let alpha_b: Vec<u8> = b.pixels().map(|p| p[3]).collect();
                assert_eq!(alpha_a, alpha_b);
            }
        }
    }

    #[test]
    fn test_with_generator_and_save_assets() {
        let temp = TempDir::new().expect("should create temp dir");
        let mut cfg = config(temp.path());
        cfg.resolution = 8;
        cfg.sheet_spacing = 1;
        let pipeline = CreaturePackPipeline::new(cfg, forest())
            .unwrap()
            .with_generator(Box::new(FlatGenerator))
            .unwrap();

        let frames = pipeline.generate_creature(0, 0).unwrap();
        assert_eq!(*frames[&AnimationType::Walk][2].get_pixel(0, 0), Rgba([100, 0, 20, 255]));

        let spec = CreatureSpec::new("cute_forest", 0, 1);
        let saved = pipeline.save_creature_assets(&spec, &frames).unwrap();
        // 12 frames + 3 animation sheets + combined
        assert_eq!(saved.files.len(), 16);
        assert!(saved.files.iter().all(|p| p.exists()));
        assert_eq!(
            saved.sheet_paths["walk"],
            "creatures/creature_001/sprite_sheets/walk_variant_1.png"
        );
        assert_eq!(
            saved.sheet_paths["combined"],
            "creatures/creature_001/sprite_sheets/combined_variant_1.png"
        );
        assert_eq!((saved.combined.width(), saved.combined.height()), (4 * 8 + 3, 3 * 8 + 2));
    }

    #[test]
    fn test_with_generator_rejects_other_resolution() {
        let temp = TempDir::new().expect("should create temp dir");
        let mut cfg = config(temp.path());
        cfg.resolution = 32;
        let result = CreaturePackPipeline::new(cfg, forest()).unwrap().with_generator(Box::new(FlatGenerator));

        match result {
            Err(PipelineError::ResolutionMismatch { configured, generator }) => {
                assert_eq!((configured, generator), (32, 8));
            }
            Err(other) => panic!("expected resolution mismatch, got {:?}", other),
            Ok(_) => panic!("expected resolution mismatch"),
        }
        assert!(!temp.path().join("test_pack").exists());
    }

    #[test]
    fn test_frames_of_wrong_size_rejected() {
        /// Claims 8px but draws 6px frames.
        struct Shrinking;
        impl PixelArtGenerator for Shrinking {
            fn resolution(&self) -> u32 {
                8
            }
            fn generate_single_creature(
                &self,
                _theme: &ThemeConfig,
                _creature_index: usize,
                _animation_type: AnimationType,
                _frame_index: usize,
            ) -> Result<Frame, SpriteError> {
                Ok(RgbaImage::from_pixel(6, 6, Rgba([255, 0, 0, 255])))
            }
        }

        let temp = TempDir::new().expect("should create temp dir");
        let mut cfg = config(temp.path());
        cfg.resolution = 8;
        let pipeline = CreaturePackPipeline::new(cfg, forest())
            .unwrap()
            .with_generator(Box::new(Shrinking))
            .unwrap();

        assert!(matches!(
            pipeline.generate_creature(0, 0),
            Err(PipelineError::Sprite(SpriteError::InconsistentFrameSize { expected: (8, 8), found: (6, 6) }))
        ));
        assert!(pipeline.generate_pack().is_err());
        assert!(!pack_exists(&pipeline.pack_dir()));
    }

    #[test]
    fn test_generate_pack_metadata() {
        let temp = TempDir::new().expect("should create temp dir");
        let pipeline = CreaturePackPipeline::new(config(temp.path()), forest()).unwrap();

        let pack = pipeline.generate_pack().unwrap();
        assert_eq!(pack.pack_id, "pack_test_pack");
        assert_eq!(pack.creatures.len(), 4);

        let ids: Vec<&str> = pack.creatures.iter().map(|c| c.creature_id.as_str()).collect();
        assert_eq!(ids, vec!["creature_001_v0", "creature_001_v1", "creature_002_v0", "creature_002_v1"]);

        assert_eq!(pack.creatures[0].base_color, "#8bc34a");
        assert_ne!(pack.creatures[1].base_color, pack.creatures[0].base_color);

        let pack_dir = pipeline.pack_dir();
        assert!(pack_exists(&pack_dir));
        assert!(pack_dir.join("README.txt").exists());
        assert!(pack_dir.join("previews").join("pack_preview.png").exists());
    }

    #[test]
    fn test_generate_and_export() {
        let temp = TempDir::new().expect("should create temp dir");
        let pipeline = CreaturePackPipeline::new(config(temp.path()), forest()).unwrap();

        let (pack, report) = pipeline.generate_and_export(ExportOptions::default()).unwrap();
        let archive = report.archive_path.expect("archive path");
        assert_eq!(archive, temp.path().join("pixel_creatures_pack_test_pack_cute_forest_16x16.zip"));
        assert!(archive.is_file());
        // 2 creatures x 2 variants x (12 frames + 4 sheets) + metadata, README, preview
        assert_eq!(report.summary.total_files, 2 * 2 * 16 + 3);
        assert_eq!(pack.creatures.len(), 4);
        assert!(pipeline.pack_dir().is_dir());
    }

    #[test]
    fn test_generate_pack_zero_creatures() {
        let temp = TempDir::new().expect("should create temp dir");
        let mut cfg = config(temp.path());
        cfg.num_creatures = 0;
        let pipeline = CreaturePackPipeline::new(cfg, forest()).unwrap();

        let pack = pipeline.generate_pack().unwrap();
        assert!(pack.creatures.is_empty());
        assert!(!pipeline.pack_dir().join("previews").exists());
    }

    #[test]
    fn test_regenerate_removes_stale_creatures() {
        let temp = TempDir::new().expect("should create temp dir");
        let mut cfg = config(temp.path());
        cfg.num_creatures = 3;
        CreaturePackPipeline::new(cfg.clone(), forest()).unwrap().generate_pack().unwrap();
        let creatures = temp.path().join("test_pack").join("creatures");
        assert!(creatures.join("creature_003").is_dir());

        cfg.num_creatures = 1;
        let pack = CreaturePackPipeline::new(cfg, forest()).unwrap().generate_pack().unwrap();
        assert_eq!(pack.creatures.len(), 2);
        assert!(creatures.join("creature_001").is_dir());
        assert!(!creatures.join("creature_002").exists());
        assert!(!creatures.join("creature_003").exists());
    }

    #[test]
    fn test_backend_error_propagates() {
        struct Broken;
        impl PixelArtGenerator for Broken {
            fn resolution(&self) -> u32 {
                16
            }
            fn generate_single_creature(
                &self,
                _theme: &ThemeConfig,
                _creature_index: usize,
                _animation_type: AnimationType,
                _frame_index: usize,
            ) -> Result<Frame, SpriteError> {
                Err(SpriteError::Backend("offline".to_string()))
            }
        }

        let temp = TempDir::new().expect("should create temp dir");
        let pipeline = CreaturePackPipeline::new(config(temp.path()), forest())
            .unwrap()
            .with_generator(Box::new(Broken))
            .unwrap();
        assert!(matches!(
            pipeline.generate_pack(),
            Err(PipelineError::Sprite(SpriteError::Backend(_)))
        ));
    }

    #[test]
    fn test_from_defaults() {
        let defaults = DefaultsConfig::default();
        let cfg = GenerationConfig::from_defaults("p", &defaults);
        assert_eq!(cfg.theme_name, "cute_forest");
        assert_eq!(cfg.resolution, 32);
        assert_eq!(cfg.num_variants, 2);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_default_pack_name() {
        let name = default_pack_name("dark_dungeon", 32);
        assert!(name.starts_with("pack_dark_dungeon_32x32_"));
    }
}
