//! Sprite sheet composition
//!
//! Frames are laid out on a regular grid so engines can slice a sheet by
//! stepping a fixed cell size. Per-animation sheets are a single row; the
//! combined sheet has one row per animation in canonical order, padded with
//! transparent cells so every row has the same column count.

use image::imageops;
use image::{Rgba, RgbaImage};
use std::collections::BTreeMap;

use crate::error::SpriteError;
use crate::models::{AnimationType, Frame};

/// Transparent color used for background and padding
const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// A composed sheet plus the grid it was laid out on.
///
/// Cell positions are derived from the grid, never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteSheet {
    pub image: RgbaImage,
    pub frame_width: u32,
    pub frame_height: u32,
    pub columns: u32,
    pub rows: u32,
    /// Gap between neighboring cells, in pixels
    pub spacing: u32,
}

impl SpriteSheet {
    fn blank(frame_size: (u32, u32), columns: u32, rows: u32, spacing: u32) -> Self {
        let (w, h) = frame_size;
        let width = columns * w + columns.saturating_sub(1) * spacing;
        let height = rows * h + rows.saturating_sub(1) * spacing;
        Self {
            image: RgbaImage::from_pixel(width, height, TRANSPARENT),
            frame_width: w,
            frame_height: h,
            columns,
            rows,
            spacing,
        }
    }

    /// Top-left pixel of the cell at `(row, col)`.
    pub fn cell_origin(&self, row: u32, col: u32) -> (u32, u32) {
        (col * (self.frame_width + self.spacing), row * (self.frame_height + self.spacing))
    }

    /// Copy one cell back out of the sheet. `None` when outside the grid.
    pub fn frame(&self, row: u32, col: u32) -> Option<Frame> {
        if row >= self.rows || col >= self.columns {
            return None;
        }
        let (x, y) = self.cell_origin(row, col);
        Some(imageops::crop_imm(&self.image, x, y, self.frame_width, self.frame_height).to_image())
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    fn place(&mut self, frame: &Frame, row: u32, col: u32) {
        let (x, y) = self.cell_origin(row, col);
        imageops::replace(&mut self.image, frame, x as i64, y as i64);
    }
}

/// Check every frame matches the first frame's size and return that size.
fn common_size<'a>(frames: impl IntoIterator<Item = &'a Frame>) -> Result<(u32, u32), SpriteError> {
    let mut frames = frames.into_iter();
    let expected = frames.next().ok_or(SpriteError::NoFrames)?.dimensions();
    for frame in frames {
        let found = frame.dimensions();
        if found != expected {
            return Err(SpriteError::InconsistentFrameSize { expected, found });
        }
    }
    Ok(expected)
}

/// Lay out one animation's frames left to right, in order.
///
/// ```
/// use image::{Rgba, RgbaImage};
/// use pixel_factory::spritesheet::compose_animation;
///
/// let frame = RgbaImage::from_pixel(2, 2, Rgba([255, 0, 0, 255]));
/// let sheet = compose_animation(&vec![frame; 4], 0).unwrap();
/// assert_eq!((sheet.width(), sheet.height()), (8, 2));
/// ```
///
/// # Errors
///
/// [`SpriteError::NoFrames`] for an empty slice,
/// [`SpriteError::InconsistentFrameSize`] when frame sizes differ.
pub fn compose_animation(frames: &[Frame], spacing: u32) -> Result<SpriteSheet, SpriteError> {
    let size = common_size(frames)?;
    let mut sheet = SpriteSheet::blank(size, frames.len() as u32, 1, spacing);
    for (col, frame) in frames.iter().enumerate() {
        sheet.place(frame, 0, col as u32);
    }
    Ok(sheet)
}

/// Lay out all animations of a creature as rows (idle, walk, attack).
///
/// Animations missing from the map get no row. Rows shorter than the longest
/// animation are padded on the right with transparent cells.
///
/// # Errors
///
/// [`SpriteError::NoFrames`] when the map holds no frames at all,
/// [`SpriteError::InconsistentFrameSize`] when any frame differs in size.
pub fn compose_combined(
    frames_by_animation: &BTreeMap<AnimationType, Vec<Frame>>,
    spacing: u32,
) -> Result<SpriteSheet, SpriteError> {
    let rows: Vec<&Vec<Frame>> = AnimationType::ALL
        .iter()
        .filter_map(|anim| frames_by_animation.get(anim))
        .collect();

    let size = common_size(rows.iter().flat_map(|frames| frames.iter()))?;
    let columns = rows.iter().map(|frames| frames.len()).max().unwrap_or(0) as u32;

    let mut sheet = SpriteSheet::blank(size, columns, rows.len() as u32, spacing);
    for (row, frames) in rows.iter().enumerate() {
        for (col, frame) in frames.iter().enumerate() {
            sheet.place(frame, row as u32, col as u32);
        }
    }
    Ok(sheet)
}
