//! Error types for the generation and composition core

use thiserror::Error;

/// Errors raised by the shape generator, variant engine and sheet composer.
///
/// All of these are input-validation failures detected before any drawing
/// work happens. None of them are retried internally.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpriteError {
    /// Resolution is below the minimum renderable size
    #[error("invalid resolution {resolution}px, minimum is {minimum}px")]
    InvalidResolution { resolution: u32, minimum: u32 },
    /// Frame index is outside the animation's frame range
    #[error("invalid frame index {index}, animation has {frames} frames")]
    InvalidFrameIndex { index: usize, frames: usize },
    /// Variant engine asked for zero variants
    #[error("invalid variant count {0}, must be at least 1")]
    InvalidVariantCount(u32),
    /// Composer given frames with differing dimensions
    #[error("inconsistent frame size: expected {expected:?}, found {found:?}")]
    InconsistentFrameSize { expected: (u32, u32), found: (u32, u32) },
    /// Composer given nothing to lay out
    #[error("no frames to compose")]
    NoFrames,
    /// A substituted generator backend failed to produce a frame
    #[error("generator backend failed: {0}")]
    Backend(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SpriteError::InvalidResolution { resolution: 4, minimum: 8 };
        assert_eq!(err.to_string(), "invalid resolution 4px, minimum is 8px");

        let err = SpriteError::InvalidFrameIndex { index: 4, frames: 4 };
        assert!(err.to_string().contains("frame index 4"));

        let err = SpriteError::InconsistentFrameSize { expected: (32, 32), found: (16, 16) };
        assert!(err.to_string().contains("(16, 16)"));
    }
}
