//! Per-frame motion offsets
//!
//! Motion is keyed only by animation type and frame index, so every creature
//! moves the same way even though their silhouettes differ.
//!
//! | Animation | Frames 0-3 | Effect |
//! |-----------|------------|--------|
//! | idle      | dy 0,1,1,0 | slow bob |
//! | walk      | dy 0,-1,0,-1, legs swap on odd frames | stepping |
//! | attack    | dx 0,2,3,1 | forward lunge and recoil |
//!
//! Longer animations repeat the four-frame cycle.

use crate::models::AnimationType;

/// Offset applied to a whole creature for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Motion {
    /// Horizontal offset, positive is "forward" (right)
    pub dx: i32,
    /// Vertical offset, positive is down
    pub dy: i32,
    /// Whether limbs use their alternate (swapped) pose
    pub leg_swap: bool,
}

impl Motion {
    /// Scale pixel offsets for the given resolution.
    ///
    /// Offsets are authored for 32px sprites; larger sprites move
    /// proportionally, smaller ones keep single-pixel steps.
    pub fn scaled(self, resolution: u32) -> Self {
        let factor = (resolution / 32).max(1) as i32;
        Self { dx: self.dx * factor, dy: self.dy * factor, leg_swap: self.leg_swap }
    }
}

/// Unscaled motion for a frame of an animation.
pub fn motion_offset(animation: AnimationType, frame_index: usize) -> Motion {
    let step = frame_index % 4;
    match animation {
        AnimationType::Idle => Motion { dx: 0, dy: [0, 1, 1, 0][step], leg_swap: false },
        AnimationType::Walk => Motion { dx: 0, dy: [0, -1, 0, -1][step], leg_swap: step % 2 == 1 },
        AnimationType::Attack => Motion { dx: [0, 2, 3, 1][step], dy: 0, leg_swap: false },
    }
}
