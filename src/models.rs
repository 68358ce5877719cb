//! Data models for creature generation (animations, themes, creature identity)

use image::{Rgba, RgbaImage};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single still image in an animation sequence.
///
/// Frames are square RGBA buffers with a transparent background.
pub type Frame = RgbaImage;

/// Default number of frames in every animation.
pub const DEFAULT_FRAMES_PER_ANIMATION: usize = 4;

/// Animation kinds produced for every creature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimationType {
    Idle,
    Walk,
    Attack,
}

impl AnimationType {
    /// All animation types in canonical sheet order (idle, walk, attack).
    pub const ALL: [AnimationType; 3] = [AnimationType::Idle, AnimationType::Walk, AnimationType::Attack];

    /// Lowercase name used in file paths and metadata.
    pub fn as_str(&self) -> &'static str {
        match self {
            AnimationType::Idle => "idle",
            AnimationType::Walk => "walk",
            AnimationType::Attack => "attack",
        }
    }

    /// Parse an animation name (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "idle" => Some(AnimationType::Idle),
            "walk" => Some(AnimationType::Walk),
            "attack" => Some(AnimationType::Attack),
            _ => None,
        }
    }
}

impl fmt::Display for AnimationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resolved visual theme.
///
/// Loaded and validated by the config layer, then shared read-only by every
/// generation call for that theme.
#[derive(Debug, Clone, PartialEq)]
pub struct ThemeConfig {
    pub name: String,
    pub description: String,
    /// Base shape descriptor, e.g. "cute small forest animal creature"
    pub base_description: String,
    pub mood_adjectives: Vec<String>,
    pub color_palette_hints: Vec<String>,
    pub background_color: Rgba<u8>,
    /// Fixed per-theme color every creature's hue family is derived from
    pub base_color: Rgba<u8>,
}

impl ThemeConfig {
    /// Build a text prompt describing one creature of this theme.
    ///
    /// Placeholder rendering ignores it; model-backed generators feed it to
    /// their backend.
    pub fn prompt(&self, creature_index: usize) -> String {
        let mood = pick(&self.mood_adjectives, creature_index).unwrap_or("neutral");
        let hint = pick(&self.color_palette_hints, creature_index).unwrap_or("natural");

        format!(
            "{}, {} style, pixel art, {} color scheme, game sprite, transparent background, simple design",
            self.base_description, mood, hint
        )
    }
}

fn pick(items: &[String], index: usize) -> Option<&str> {
    if items.is_empty() {
        None
    } else {
        Some(items[index % items.len()].as_str())
    }
}

/// Identity of one creature variant within a pack.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CreatureSpec {
    pub theme: String,
    pub creature_index: usize,
    /// 0 = unshifted base colors
    pub variant_index: u32,
}

impl CreatureSpec {
    pub fn new(theme: impl Into<String>, creature_index: usize, variant_index: u32) -> Self {
        Self { theme: theme.into(), creature_index, variant_index }
    }

    /// Directory-level id shared by all variants, e.g. `creature_001`.
    pub fn creature_id(&self) -> String {
        format!("creature_{:03}", self.creature_index + 1)
    }

    /// Id of this specific variant, e.g. `creature_001_v2`.
    pub fn variant_id(&self) -> String {
        format!("{}_v{}", self.creature_id(), self.variant_index)
    }

    pub fn is_base(&self) -> bool {
        self.variant_index == 0
    }
}
