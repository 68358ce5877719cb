//! PNG output and pack file layout
//!
//! A pack on disk looks like:
//!
//! ```text
//! <pack>/
//! ├── creatures/creature_001/
//! │   ├── idle/frame_01.png, frame_01_variant_1.png, ...
//! │   ├── walk/ ...
//! │   ├── attack/ ...
//! │   └── sprite_sheets/idle.png, idle_variant_1.png, combined.png, ...
//! ├── previews/pack_preview.png
//! ├── metadata.json
//! └── README.txt
//! ```

use image::imageops::FilterType;
use image::RgbaImage;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::models::{AnimationType, CreatureSpec};

/// Error type for output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

/// Save an RGBA image to a PNG file, creating parent directories as needed.
pub fn save_png(image: &RgbaImage, path: &Path) -> Result<(), OutputError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    image.save_with_format(path, image::ImageFormat::Png)?;
    Ok(())
}

/// Scale image by an integer factor using nearest-neighbor interpolation.
///
/// Factors of 0 and 1 return the image unchanged.
pub fn scale_image(image: RgbaImage, factor: u32) -> RgbaImage {
    if factor <= 1 {
        return image;
    }
    let (w, h) = image.dimensions();
    image::imageops::resize(&image, w * factor, h * factor, FilterType::Nearest)
}

/// `_variant_N` suffix for non-base variants, empty for the base.
fn variant_suffix(variant_index: u32) -> String {
    if variant_index > 0 {
        format!("_variant_{}", variant_index)
    } else {
        String::new()
    }
}

/// Paths inside one pack directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackLayout {
    root: PathBuf,
}

impl PackLayout {
    /// Layout for pack `pack_name` under `output_dir`.
    pub fn new(output_dir: &Path, pack_name: &str) -> Self {
        Self { root: output_dir.join(pack_name) }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn creatures_dir(&self) -> PathBuf {
        self.root.join("creatures")
    }

    /// Directory shared by every variant of a creature.
    pub fn creature_dir(&self, spec: &CreatureSpec) -> PathBuf {
        self.creatures_dir().join(spec.creature_id())
    }

    /// Individual frame file. `frame_index` is zero-based; file names count from 1.
    pub fn frame_path(&self, spec: &CreatureSpec, animation: AnimationType, frame_index: usize) -> PathBuf {
        self.creature_dir(spec).join(animation.as_str()).join(format!(
            "frame_{:02}{}.png",
            frame_index + 1,
            variant_suffix(spec.variant_index)
        ))
    }

    pub fn sheets_dir(&self, spec: &CreatureSpec) -> PathBuf {
        self.creature_dir(spec).join("sprite_sheets")
    }

    /// Single-animation sheet, e.g. `sprite_sheets/walk_variant_1.png`.
    pub fn sheet_path(&self, spec: &CreatureSpec, animation: AnimationType) -> PathBuf {
        self.sheets_dir(spec)
            .join(format!("{}{}.png", animation.as_str(), variant_suffix(spec.variant_index)))
    }

    pub fn combined_path(&self, spec: &CreatureSpec) -> PathBuf {
        self.sheets_dir(spec)
            .join(format!("combined{}.png", variant_suffix(spec.variant_index)))
    }

    pub fn previews_dir(&self) -> PathBuf {
        self.root.join("previews")
    }

    pub fn preview_path(&self) -> PathBuf {
        self.previews_dir().join("pack_preview.png")
    }

    pub fn metadata_path(&self) -> PathBuf {
        self.root.join("metadata.json")
    }

    pub fn readme_path(&self) -> PathBuf {
        self.root.join("README.txt")
    }

    /// Remove generated images left by an earlier run (`creatures/` and
    /// `previews/`). Returns whether anything was removed.
    pub fn clear_generated(&self) -> Result<bool, OutputError> {
        let mut removed = false;
        for dir in [self.creatures_dir(), self.previews_dir()] {
            if dir.is_dir() {
                std::fs::remove_dir_all(&dir)?;
                removed = true;
            }
        }
        Ok(removed)
    }

    /// `path` relative to the pack root, with `/` separators for metadata.
    pub fn relative(&self, path: &Path) -> String {
        let rel = path.strip_prefix(&self.root).unwrap_or(path);
        rel.components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join("/")
    }
}
