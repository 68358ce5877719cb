//! Preview images for packs and single creatures

use image::imageops;
use image::{Rgba, RgbaImage};
use thiserror::Error;

use crate::output::scale_image;
use crate::spritesheet::SpriteSheet;

/// Background behind preview grids
pub const PREVIEW_BACKGROUND: Rgba<u8> = Rgba([26, 26, 26, 255]);

/// Most creatures shown in a pack preview
pub const MAX_PREVIEW_CREATURES: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PreviewError {
    #[error("cannot lay out an empty image list")]
    Empty,
    #[error("grid needs at least one column")]
    ZeroColumns,
}

/// Arrange same-size images in a grid with `spacing` around every cell.
///
/// Images are placed row-major; each is alpha-blended over `background`.
pub fn create_grid_layout(
    images: &[RgbaImage],
    cols: u32,
    spacing: u32,
    background: Rgba<u8>,
) -> Result<RgbaImage, PreviewError> {
    let first = images.first().ok_or(PreviewError::Empty)?;
    if cols == 0 {
        return Err(PreviewError::ZeroColumns);
    }

    let (cell_w, cell_h) = first.dimensions();
    let count = images.len() as u32;
    let rows = count.div_ceil(cols);
    let cols = cols.min(count);

    let width = cols * cell_w + (cols + 1) * spacing;
    let height = rows * cell_h + (rows + 1) * spacing;
    let mut grid = RgbaImage::from_pixel(width, height, background);

    for (idx, image) in images.iter().enumerate() {
        let idx = idx as u32;
        let x = spacing + (idx % cols) * (cell_w + spacing);
        let y = spacing + (idx / cols) * (cell_h + spacing);
        imageops::overlay(&mut grid, image, x as i64, y as i64);
    }

    Ok(grid)
}

/// Showcase of a pack: the first frame of each sheet, upscaled, in a grid.
///
/// At most [`MAX_PREVIEW_CREATURES`] sheets are used.
pub fn create_pack_preview(
    sheets: &[SpriteSheet],
    scale: u32,
    cols: u32,
) -> Result<RgbaImage, PreviewError> {
    let frames: Vec<RgbaImage> = sheets
        .iter()
        .take(MAX_PREVIEW_CREATURES)
        .filter_map(|sheet| sheet.frame(0, 0))
        .map(|frame| scale_image(frame, scale))
        .collect();

    create_grid_layout(&frames, cols, 8 * scale.max(1), PREVIEW_BACKGROUND)
}

/// One creature's sheets stacked vertically, upscaled.
pub fn create_creature_showcase(sheets: &[SpriteSheet], scale: u32) -> Result<RgbaImage, PreviewError> {
    if sheets.is_empty() {
        return Err(PreviewError::Empty);
    }

    let scaled: Vec<RgbaImage> = sheets.iter().map(|s| scale_image(s.image.clone(), scale)).collect();
    let spacing = 4 * scale.max(1);
    let width = scaled.iter().map(|s| s.width()).max().unwrap_or(0);
    let height = scaled.iter().map(|s| s.height()).sum::<u32>() + spacing * (scaled.len() as u32 - 1);

    let mut showcase = RgbaImage::from_pixel(width, height, PREVIEW_BACKGROUND);
    let mut y = 0;
    for sheet in &scaled {
        imageops::overlay(&mut showcase, sheet, 0, y as i64);
        y += sheet.height() + spacing;
    }
    Ok(showcase)
}
