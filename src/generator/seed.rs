//! Seed derivation and deterministic noise
//!
//! No global RNG state: every frame derives its seed from the theme and the
//! creature index, and per-pixel noise is a pure hash of that seed and the
//! pixel's coordinates.

use crate::models::ThemeConfig;

const FNV_OFFSET: u64 = 0xcbf29ce484222325;
const FNV_PRIME: u64 = 0x100000001b3;

fn fnv1a(mut hash: u64, data: &[u8]) -> u64 {
    for byte in data {
        hash ^= *byte as u64;
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

/// Seed shared by every frame of one creature.
///
/// Mixes the theme name, the theme's base color and the creature index. The
/// animation type and frame index are deliberately absent so all frames of a
/// creature agree on palette and proportions.
pub fn creature_seed(theme: &ThemeConfig, creature_index: usize) -> u64 {
    let mut hash = fnv1a(FNV_OFFSET, theme.name.as_bytes());
    // separator keeps ("ab", 1) and ("a", ...) from sharing a prefix
    hash = fnv1a(hash, &[0xff]);
    hash = fnv1a(hash, &theme.base_color.0);
    hash = fnv1a(hash, &(creature_index as u64).to_le_bytes());
    mix(hash)
}

/// Deterministic noise in `[-1, 1]` for a pixel.
pub fn pixel_noise(seed: u64, x: i32, y: i32) -> f64 {
    let coords = ((x as u32 as u64) << 32) | (y as u32 as u64);
    let z = mix(seed ^ mix(coords));
    (z >> 11) as f64 / (1u64 << 53) as f64 * 2.0 - 1.0
}

/// SplitMix64 finalizer.
fn mix(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9e3779b97f4a7c15);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111eb);
    z ^ (z >> 31)
}

const HARSH_MOODS: &[&str] = &[
    "menacing",
    "sinister",
    "aggressive",
    "fierce",
    "intimidating",
    "mechanical",
    "dark",
    "angry",
];

const SOFT_MOODS: &[&str] =
    &["friendly", "cheerful", "happy", "peaceful", "graceful", "flowing", "calm", "cute", "gentle"];

/// Lightness jitter amplitude for a theme's moods.
///
/// Harsh moods push contrast up, soft moods flatten it, anything else sits in
/// the middle. The result is the mean over all listed moods.
pub fn mood_jitter(moods: &[String]) -> f64 {
    const HARSH: f64 = 0.10;
    const NEUTRAL: f64 = 0.05;
    const SOFT: f64 = 0.025;

    if moods.is_empty() {
        return NEUTRAL;
    }

    let total: f64 = moods
        .iter()
        .map(|mood| {
            let mood = mood.to_ascii_lowercase();
            if HARSH_MOODS.contains(&mood.as_str()) {
                HARSH
            } else if SOFT_MOODS.contains(&mood.as_str()) {
                SOFT
            } else {
                NEUTRAL
            }
        })
        .sum();

    total / moods.len() as f64
}
