//! Pack metadata (`metadata.json`) and the pack README

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::models::{AnimationType, DEFAULT_FRAMES_PER_ANIMATION};

/// Error type for metadata persistence
#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Current UTC time as RFC 3339 with second precision.
pub fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn default_frames() -> usize {
    DEFAULT_FRAMES_PER_ANIMATION
}

/// Metadata for one creature variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatureMetadata {
    /// Variant id, e.g. `creature_001_v1`
    pub creature_id: String,
    pub theme: String,
    /// Hex color the variant's palette is derived from
    pub base_color: String,
    pub variant_index: u32,
    /// `[width, height]` in pixels
    pub resolution: [u32; 2],
    /// Animation name to frame count
    pub animations: BTreeMap<String, usize>,
    /// Sheet name (`idle`, ..., `combined`) to path relative to the pack root
    pub sprite_sheet_paths: BTreeMap<String, String>,
    #[serde(default)]
    pub generation_time: String,
}

impl CreatureMetadata {
    pub fn new(
        creature_id: impl Into<String>,
        theme: impl Into<String>,
        base_color: impl Into<String>,
        variant_index: u32,
        resolution: u32,
        sprite_sheet_paths: BTreeMap<String, String>,
        frames_per_animation: usize,
    ) -> Self {
        Self {
            creature_id: creature_id.into(),
            theme: theme.into(),
            base_color: base_color.into(),
            variant_index,
            resolution: [resolution, resolution],
            animations: AnimationType::ALL
                .iter()
                .map(|anim| (anim.as_str().to_string(), frames_per_animation))
                .collect(),
            sprite_sheet_paths,
            generation_time: timestamp(),
        }
    }
}

/// Metadata for a whole pack, written to `metadata.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackMetadata {
    pub pack_id: String,
    pub pack_name: String,
    pub theme_name: String,
    pub generation_date: String,
    pub resolution: [u32; 2],
    pub num_creatures: usize,
    pub num_variants: u32,
    #[serde(default = "default_frames")]
    pub frames_per_animation: usize,
    pub animation_types: Vec<AnimationType>,
    #[serde(default)]
    pub creatures: Vec<CreatureMetadata>,
}

impl PackMetadata {
    /// Empty pack metadata stamped with the current time.
    pub fn new(
        pack_name: impl Into<String>,
        theme_name: impl Into<String>,
        resolution: u32,
        num_creatures: usize,
        num_variants: u32,
        frames_per_animation: usize,
    ) -> Self {
        let pack_name = pack_name.into();
        Self {
            pack_id: format!("pack_{}", pack_name),
            pack_name,
            theme_name: theme_name.into(),
            generation_date: timestamp(),
            resolution: [resolution, resolution],
            num_creatures,
            num_variants,
            frames_per_animation,
            animation_types: AnimationType::ALL.to_vec(),
            creatures: Vec::new(),
        }
    }

    /// Base-variant creatures in index order.
    pub fn base_creatures(&self) -> impl Iterator<Item = &CreatureMetadata> {
        self.creatures.iter().filter(|c| c.variant_index == 0)
    }
}

/// Write pack metadata as pretty-printed JSON, creating parent directories.
pub fn save_metadata(metadata: &PackMetadata, path: &Path) -> Result<(), MetadataError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(metadata)?;
    fs::write(path, json)?;
    Ok(())
}

pub fn load_metadata(path: &Path) -> Result<PackMetadata, MetadataError> {
    let contents = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Human-readable README describing the pack and how to use it.
pub fn generate_readme(pack: &PackMetadata) -> String {
    let [width, height] = pack.resolution;
    let mut out = String::new();

    // Writing to a String cannot fail.
    let _ = writeln!(out, "# {}", pack.pack_name);
    let _ = writeln!(out);
    let _ = writeln!(out, "## Pack Information");
    let _ = writeln!(out);
    let _ = writeln!(out, "- **Theme**: {}", pack.theme_name);
    let _ = writeln!(out, "- **Resolution**: {}x{} pixels", width, height);
    let _ = writeln!(out, "- **Creatures**: {}", pack.num_creatures);
    let _ = writeln!(out, "- **Color Variants**: {} per creature", pack.num_variants);
    let _ = writeln!(out, "- **Generated**: {}", pack.generation_date);
    let _ = writeln!(out);
    let _ = writeln!(out, "## Animations Included");
    let _ = writeln!(out);
    let _ = writeln!(out, "Each creature includes the following animations:");
    for anim in &pack.animation_types {
        let _ = writeln!(out, "- **{}**: {} frames", capitalize(anim.as_str()), pack.frames_per_animation);
    }

    let mut base = pack.base_creatures().peekable();
    if base.peek().is_some() {
        let _ = writeln!(out);
        let _ = writeln!(out, "## Creatures");
        let _ = writeln!(out);
        for creature in base {
            let id = creature.creature_id.strip_suffix("_v0").unwrap_or(&creature.creature_id);
            let _ = writeln!(out, "- {} (base color {})", id, creature.base_color);
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "## File Structure");
    let _ = writeln!(out);
    let _ = writeln!(out, "```");
    let _ = writeln!(out, "{}/", pack.pack_name);
    let _ = writeln!(out, "├── creatures/");
    let _ = writeln!(out, "│   ├── creature_001/");
    for anim in &pack.animation_types {
        let _ = writeln!(out, "│   │   ├── {}/", anim.as_str());
        let _ = writeln!(out, "│   │   │   ├── frame_01.png");
        let _ = writeln!(out, "│   │   │   └── ...");
    }
    let _ = writeln!(out, "│   │   └── sprite_sheets/");
    for anim in &pack.animation_types {
        let _ = writeln!(out, "│   │       ├── {}.png", anim.as_str());
    }
    let _ = writeln!(out, "│   │       └── combined.png");
    let _ = writeln!(out, "│   └── ...");
    let _ = writeln!(out, "├── previews/");
    let _ = writeln!(out, "│   └── pack_preview.png");
    let _ = writeln!(out, "├── metadata.json");
    let _ = writeln!(out, "└── README.txt");
    let _ = writeln!(out, "```");

    out.push_str(
        "
## Sprite Sheets

- **Individual sheets** (e.g. `idle.png`): one row of frames for one animation
- **Combined sheet** (`combined.png`): all animations stacked as rows in order
  idle, walk, attack. Shorter rows are padded with transparent cells.

Every cell has the same size as a single frame, so sheets can be sliced on a
fixed grid.

## Color Variants

Color variants rotate every color of the base creature around the hue wheel.
Shapes and transparency are identical. Variant files carry a `_variant_N`
suffix.

## Usage in Game Engines

### Unity
1. Import the sprite sheets
2. Slice them in the Sprite Editor with a grid matching the resolution above
3. Set pixels per unit to match your game's scale
4. Build animation clips from the sliced sprites

### Godot
1. Import a sprite sheet as a texture
2. Add an AnimatedSprite2D node
3. Add frames from the sheet using the grid size above
",
    );

    out
}

/// Write the README, creating parent directories.
pub fn save_readme(pack: &PackMetadata, path: &Path) -> Result<(), MetadataError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, generate_readme(pack))?;
    Ok(())
}
