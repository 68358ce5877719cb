//! Palette-shifted color variants
//!
//! A variant is the same creature with every color rotated around the hue
//! wheel. Variants are evenly spaced: with `n` variants, variant `v` rotates
//! by `v * 360 / n` degrees. Shape and transparency never change.

use image::Rgba;
use std::collections::HashMap;

use crate::color::rotate_hue;
use crate::error::SpriteError;
use crate::models::Frame;

/// Hue rotation in degrees for variant `variant_index` of `total_variants`.
///
/// # Errors
///
/// Returns [`SpriteError::InvalidVariantCount`] when `total_variants` is 0.
pub fn hue_rotation(variant_index: u32, total_variants: u32) -> Result<f64, SpriteError> {
    if total_variants == 0 {
        return Err(SpriteError::InvalidVariantCount(total_variants));
    }
    let degrees = variant_index as f64 * (360.0 / total_variants as f64);
    Ok(degrees.rem_euclid(360.0))
}

/// Produce variant `variant_index` of `total_variants` from a base frame.
///
/// Variant 0 is a copy of the input. For other variants each distinct opaque
/// color is rotated once and the result reused for every pixel of that color.
/// Pixels with zero alpha are copied untouched.
///
/// ```
/// use image::{Rgba, RgbaImage};
/// use pixel_factory::variant::shift;
///
/// let frame = RgbaImage::from_pixel(2, 2, Rgba([255, 0, 0, 255]));
/// let green = shift(&frame, 1, 3).unwrap();
/// assert_eq!(*green.get_pixel(0, 0), Rgba([0, 255, 0, 255]));
/// ```
///
/// # Errors
///
/// Returns [`SpriteError::InvalidVariantCount`] when `total_variants` is 0.
pub fn shift(frame: &Frame, variant_index: u32, total_variants: u32) -> Result<Frame, SpriteError> {
    let degrees = hue_rotation(variant_index, total_variants)?;
    if variant_index == 0 || degrees == 0.0 {
        return Ok(frame.clone());
    }

    let mut remap: HashMap<[u8; 4], Rgba<u8>> = HashMap::new();
    let mut shifted = frame.clone();
    for pixel in shifted.pixels_mut() {
        if pixel[3] == 0 {
            continue;
        }
        let original = *pixel;
        *pixel = *remap.entry(original.0).or_insert_with(|| rotate_hue(original, degrees));
    }

    Ok(shifted)
}

/// All `total_variants` variants of a frame, index 0 first.
pub fn generate_variants(frame: &Frame, total_variants: u32) -> Result<Vec<Frame>, SpriteError> {
    if total_variants == 0 {
        return Err(SpriteError::InvalidVariantCount(total_variants));
    }
    (0..total_variants).map(|v| shift(frame, v, total_variants)).collect()
}

/// Rotate a single color the same way [`shift`] would.
pub fn shift_color(
    color: Rgba<u8>,
    variant_index: u32,
    total_variants: u32,
) -> Result<Rgba<u8>, SpriteError> {
    let degrees = hue_rotation(variant_index, total_variants)?;
    if variant_index == 0 || color[3] == 0 {
        return Ok(color);
    }
    Ok(rotate_hue(color, degrees))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::rgb_to_hsl;
    use image::RgbaImage;

    /// Checkerboard of colors with a transparent column.
    fn sample_frame() -> Frame {
        RgbaImage::from_fn(6, 4, |x, y| match (x, y % 2) {
            (0, _) => Rgba([0, 0, 0, 0]),
            (1, _) => Rgba([120, 40, 200, 0]),
            (_, 0) => Rgba([255, 0, 0, 255]),
            _ => Rgba([40, 160, 90, 200]),
        })
    }

    fn hue_distance(a: f64, b: f64) -> f64 {
        let d = (a - b).abs() % 360.0;
        d.min(360.0 - d)
    }

    #[test]
    fn test_zero_variants_rejected() {
        let frame = sample_frame();
        assert_eq!(shift(&frame, 0, 0), Err(SpriteError::InvalidVariantCount(0)));
        assert_eq!(generate_variants(&frame, 0), Err(SpriteError::InvalidVariantCount(0)));
        assert!(hue_rotation(1, 0).is_err());
    }

    #[test]
    fn test_variant_zero_is_identity() {
        let frame = sample_frame();
        for n in 1..6 {
            assert_eq!(shift(&frame, 0, n).unwrap(), frame);
        }
    }

    #[test]
    fn test_transparency_preserved() {
        let frame = sample_frame();
        for v in 0..5 {
            let shifted = shift(&frame, v, 5).unwrap();
            for (a, b) in frame.pixels().zip(shifted.pixels()) {
                assert_eq!(a[3], b[3]);
                if a[3] == 0 {
                    assert_eq!(a, b, "transparent pixel was recolored");
                }
            }
        }
    }

    #[test]
    fn test_red_to_green_and_blue() {
        let frame = RgbaImage::from_pixel(1, 1, Rgba([255, 0, 0, 255]));
        assert_eq!(*shift(&frame, 1, 3).unwrap().get_pixel(0, 0), Rgba([0, 255, 0, 255]));
        assert_eq!(*shift(&frame, 2, 3).unwrap().get_pixel(0, 0), Rgba([0, 0, 255, 255]));
    }

    #[test]
    fn test_hue_spacing() {
        let color = Rgba([40, 160, 90, 255]);
        let base_hue = rgb_to_hsl(40, 160, 90).h;
        let frame = RgbaImage::from_pixel(1, 1, color);
        for n in [2u32, 3, 4, 6] {
            for v in 0..n {
                let p = *shift(&frame, v, n).unwrap().get_pixel(0, 0);
                let hue = rgb_to_hsl(p[0], p[1], p[2]).h;
                let expected = (base_hue + v as f64 * 360.0 / n as f64) % 360.0;
                assert!(hue_distance(hue, expected) < 1.5, "v={} n={} hue={} expected={}", v, n, hue, expected);
            }
        }
    }

    #[test]
    fn test_original_untouched() {
        let frame = sample_frame();
        let copy = frame.clone();
        let _ = shift(&frame, 2, 3).unwrap();
        assert_eq!(frame, copy);
    }

    #[test]
    fn test_deterministic() {
        let frame = sample_frame();
        assert_eq!(shift(&frame, 1, 4).unwrap(), shift(&frame, 1, 4).unwrap());
    }

    #[test]
    fn test_full_turn_wraps() {
        assert_eq!(hue_rotation(3, 3).unwrap(), 0.0);
        assert_eq!(hue_rotation(4, 3).unwrap(), 120.0);
        let frame = sample_frame();
        assert_eq!(shift(&frame, 3, 3).unwrap(), frame);
    }

    #[test]
    fn test_generate_variants() {
        let frame = sample_frame();
        let variants = generate_variants(&frame, 3).unwrap();
        assert_eq!(variants.len(), 3);
        assert_eq!(variants[0], frame);
        assert_eq!(variants[1], shift(&frame, 1, 3).unwrap());
    }

    #[test]
    fn test_shift_color() {
        assert_eq!(shift_color(Rgba([255, 0, 0, 255]), 1, 3).unwrap(), Rgba([0, 255, 0, 255]));
        assert_eq!(shift_color(Rgba([255, 0, 0, 255]), 0, 3).unwrap(), Rgba([255, 0, 0, 255]));
        assert!(shift_color(Rgba([255, 0, 0, 255]), 0, 0).is_err());
    }
}
