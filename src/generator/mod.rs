//! Creature frame generation
//!
//! [`PixelArtGenerator`] is the boundary between the pack pipeline and the
//! thing that actually draws creatures. The crate ships one implementation,
//! [`PlaceholderGenerator`], which draws procedural silhouettes. Other
//! backends (model-backed, hand-drawn lookups, ...) implement the same trait
//! and are handed to the pipeline at construction time.

pub mod motion;
pub mod placeholder;
pub mod seed;

pub use motion::{motion_offset, Motion};
pub use placeholder::{Archetype, PlaceholderGenerator, MIN_RESOLUTION};
pub use seed::{creature_seed, mood_jitter, pixel_noise};

use crate::error::SpriteError;
use crate::models::{AnimationType, Frame, ThemeConfig};

/// A backend that draws single creature frames.
///
/// Implementations are not required to be deterministic. The placeholder is,
/// and callers that rely on identical output for identical input should only
/// assume it for [`PlaceholderGenerator`].
pub trait PixelArtGenerator: Send + Sync {
    /// Square output resolution in pixels.
    fn resolution(&self) -> u32;

    /// Draw one frame of one creature's animation.
    ///
    /// The returned frame is `resolution() x resolution()` RGBA with a
    /// transparent background.
    fn generate_single_creature(
        &self,
        theme: &ThemeConfig,
        creature_index: usize,
        animation_type: AnimationType,
        frame_index: usize,
    ) -> Result<Frame, SpriteError>;

    /// Draw every frame of one animation, in playback order.
    fn generate_animation_frames(
        &self,
        theme: &ThemeConfig,
        creature_index: usize,
        animation_type: AnimationType,
        num_frames: usize,
    ) -> Result<Vec<Frame>, SpriteError> {
        (0..num_frames)
            .map(|i| self.generate_single_creature(theme, creature_index, animation_type, i))
            .collect()
    }
}
