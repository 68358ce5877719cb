//! Color parsing and HSL color-space math
//!
//! Theme colors arrive as strings (`#2d5016`, `rgb(...)`, `forestgreen`) and
//! are parsed once at config load. Variant recoloring works in HSL; all
//! conversions here are pure functions on explicit values.

use image::Rgba;
use lightningcss::traits::Parse;
use lightningcss::values::color::CssColor;
use thiserror::Error;

/// Error type for color parsing failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    #[error("empty color string")]
    Empty,
    /// Invalid length (must be 3, 4, 6, or 8 hex chars after #)
    #[error("invalid color length {0}, expected 3, 4, 6, or 8")]
    InvalidLength(usize),
    #[error("invalid hex character '{0}'")]
    InvalidHex(char),
    /// CSS parsing error from lightningcss
    #[error("CSS parse error: {0}")]
    CssParse(String),
}

/// Parse a color string into RGBA.
///
/// Hex strings (`#RGB`, `#RGBA`, `#RRGGBB`, `#RRGGBBAA`) take a fast path;
/// anything else is handed to lightningcss, so `rgb()`, `hsl()` and named
/// colors work too.
///
/// ```
/// use pixel_factory::color::parse_color;
///
/// assert_eq!(parse_color("#2d5016").unwrap(), image::Rgba([0x2d, 0x50, 0x16, 255]));
/// assert_eq!(parse_color("red").unwrap(), image::Rgba([255, 0, 0, 255]));
/// ```
pub fn parse_color(s: &str) -> Result<Rgba<u8>, ColorError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(ColorError::Empty);
    }

    match s.strip_prefix('#') {
        Some(hex) => parse_hex(hex),
        None => parse_css(s),
    }
}

fn parse_hex(hex: &str) -> Result<Rgba<u8>, ColorError> {
    let digits = hex
        .chars()
        .map(|c| c.to_digit(16).map(|d| d as u8).ok_or(ColorError::InvalidHex(c)))
        .collect::<Result<Vec<u8>, _>>()?;

    match digits.as_slice() {
        [r, g, b] => Ok(Rgba([r * 17, g * 17, b * 17, 255])),
        [r, g, b, a] => Ok(Rgba([r * 17, g * 17, b * 17, a * 17])),
        [r1, r0, g1, g0, b1, b0] => Ok(Rgba([r1 * 16 + r0, g1 * 16 + g0, b1 * 16 + b0, 255])),
        [r1, r0, g1, g0, b1, b0, a1, a0] => {
            Ok(Rgba([r1 * 16 + r0, g1 * 16 + g0, b1 * 16 + b0, a1 * 16 + a0]))
        }
        _ => Err(ColorError::InvalidLength(digits.len())),
    }
}

fn parse_css(s: &str) -> Result<Rgba<u8>, ColorError> {
    use lightningcss::values::color::FloatColor;

    let color = CssColor::parse_string(s).map_err(|e| ColorError::CssParse(e.to_string()))?;
    let rgb = color
        .to_rgb()
        .map_err(|_| ColorError::CssParse(format!("cannot convert '{}' to RGB", s)))?;

    match rgb {
        CssColor::RGBA(c) => Ok(Rgba([c.red, c.green, c.blue, c.alpha])),
        CssColor::Float(float) => match float.as_ref() {
            FloatColor::RGB(c) => Ok(Rgba([
                unit_to_u8(c.r as f64),
                unit_to_u8(c.g as f64),
                unit_to_u8(c.b as f64),
                unit_to_u8(c.alpha as f64),
            ])),
            _ => Err(ColorError::CssParse("unexpected float color format".to_string())),
        },
        _ => Err(ColorError::CssParse("color conversion did not produce RGB".to_string())),
    }
}

/// Format a color as `#rrggbb`, or `#rrggbbaa` when not fully opaque.
pub fn to_hex(color: Rgba<u8>) -> String {
    let [r, g, b, a] = color.0;
    if a == 255 {
        format!("#{:02x}{:02x}{:02x}", r, g, b)
    } else {
        format!("#{:02x}{:02x}{:02x}{:02x}", r, g, b, a)
    }
}

/// A color in hue-saturation-lightness space.
///
/// `h` is in degrees `[0, 360)`, `s` and `l` in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

impl Hsl {
    pub fn new(h: f64, s: f64, l: f64) -> Self {
        Self { h: normalize_hue(h), s: s.clamp(0.0, 1.0), l: l.clamp(0.0, 1.0) }
    }

    /// Rotate hue by `degrees`, keeping saturation and lightness.
    pub fn rotated(self, degrees: f64) -> Self {
        Self { h: normalize_hue(self.h + degrees), ..self }
    }
}

/// Wrap a hue angle into `[0, 360)`.
pub fn normalize_hue(h: f64) -> f64 {
    let h = h.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if h >= 360.0 {
        0.0
    } else {
        h
    }
}

/// Convert RGB to HSL.
pub fn rgb_to_hsl(r: u8, g: u8, b: u8) -> Hsl {
    let r = r as f64 / 255.0;
    let g = g as f64 / 255.0;
    let b = b as f64 / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;
    let d = max - min;

    if d < f64::EPSILON {
        return Hsl { h: 0.0, s: 0.0, l };
    }

    let s = if l > 0.5 { d / (2.0 - max - min) } else { d / (max + min) };

    let h = if max == r {
        (g - b) / d + if g < b { 6.0 } else { 0.0 }
    } else if max == g {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    };

    Hsl { h: normalize_hue(h * 60.0), s, l }
}

/// Convert HSL back to 8-bit RGB.
pub fn hsl_to_rgb(hsl: Hsl) -> (u8, u8, u8) {
    let c = (1.0 - (2.0 * hsl.l - 1.0).abs()) * hsl.s;
    let hp = normalize_hue(hsl.h) / 60.0;
    let x = c * (1.0 - (hp % 2.0 - 1.0).abs());
    let m = hsl.l - c / 2.0;

    let (r, g, b) = match hp as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    (unit_to_u8(r + m), unit_to_u8(g + m), unit_to_u8(b + m))
}

/// Rotate the hue of an RGBA color, leaving saturation, lightness and alpha alone.
pub fn rotate_hue(color: Rgba<u8>, degrees: f64) -> Rgba<u8> {
    let [r, g, b, a] = color.0;
    let (r, g, b) = hsl_to_rgb(rgb_to_hsl(r, g, b).rotated(degrees));
    Rgba([r, g, b, a])
}

/// Shift lightness by `delta` (clamped), keeping hue, saturation and alpha.
pub fn adjust_lightness(color: Rgba<u8>, delta: f64) -> Rgba<u8> {
    let [r, g, b, a] = color.0;
    let hsl = rgb_to_hsl(r, g, b);
    let (r, g, b) = hsl_to_rgb(Hsl::new(hsl.h, hsl.s, hsl.l + delta));
    Rgba([r, g, b, a])
}

fn unit_to_u8(v: f64) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_forms() {
        assert_eq!(parse_color("#F00").unwrap(), Rgba([255, 0, 0, 255]));
        assert_eq!(parse_color("#F008").unwrap(), Rgba([255, 0, 0, 136]));
        assert_eq!(parse_color("#1a0d1a").unwrap(), Rgba([0x1a, 0x0d, 0x1a, 255]));
        assert_eq!(parse_color("#00000000").unwrap(), Rgba([0, 0, 0, 0]));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(parse_color(""), Err(ColorError::Empty));
        assert_eq!(parse_color("#12"), Err(ColorError::InvalidLength(2)));
        assert_eq!(parse_color("#12345g"), Err(ColorError::InvalidHex('g')));
        assert!(matches!(parse_color("notacolor"), Err(ColorError::CssParse(_))));
    }

    #[test]
    fn test_parse_css_forms() {
        assert_eq!(parse_color("rgb(0, 255, 0)").unwrap(), Rgba([0, 255, 0, 255]));
        assert_eq!(parse_color("hsl(240, 100%, 50%)").unwrap(), Rgba([0, 0, 255, 255]));
        assert_eq!(parse_color("white").unwrap(), Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn test_to_hex() {
        assert_eq!(to_hex(Rgba([0x8b, 0xc3, 0x4a, 255])), "#8bc34a");
        assert_eq!(to_hex(Rgba([0, 0, 0, 0])), "#00000000");
    }

    #[test]
    fn test_rgb_to_hsl_primaries() {
        let red = rgb_to_hsl(255, 0, 0);
        assert!((red.h - 0.0).abs() < 1e-9);
        assert!((red.s - 1.0).abs() < 1e-9);
        assert!((red.l - 0.5).abs() < 1e-9);

        assert!((rgb_to_hsl(0, 255, 0).h - 120.0).abs() < 1e-9);
        assert!((rgb_to_hsl(0, 0, 255).h - 240.0).abs() < 1e-9);
        assert!((rgb_to_hsl(255, 0, 255).h - 300.0).abs() < 1e-9);
    }

    #[test]
    fn test_gray_has_no_saturation() {
        let gray = rgb_to_hsl(128, 128, 128);
        assert_eq!(gray.s, 0.0);
        assert_eq!(hsl_to_rgb(gray), (128, 128, 128));
    }

    #[test]
    fn test_hsl_roundtrip_sample() {
        for &(r, g, b) in &[(139u8, 195u8, 74u8), (26, 13, 26), (3, 169, 244), (255, 193, 7)] {
            let (r2, g2, b2) = hsl_to_rgb(rgb_to_hsl(r, g, b));
            assert!((r as i32 - r2 as i32).abs() <= 1);
            assert!((g as i32 - g2 as i32).abs() <= 1);
            assert!((b as i32 - b2 as i32).abs() <= 1);
        }
    }

    #[test]
    fn test_rotate_hue_red_to_green() {
        assert_eq!(rotate_hue(Rgba([255, 0, 0, 255]), 120.0), Rgba([0, 255, 0, 255]));
        assert_eq!(rotate_hue(Rgba([255, 0, 0, 128]), 240.0), Rgba([0, 0, 255, 128]));
        assert_eq!(rotate_hue(Rgba([255, 0, 0, 255]), 360.0), Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn test_normalize_hue() {
        assert_eq!(normalize_hue(370.0), 10.0);
        assert_eq!(normalize_hue(-30.0), 330.0);
        assert_eq!(normalize_hue(360.0), 0.0);
    }

    #[test]
    fn test_adjust_lightness() {
        let darker = adjust_lightness(Rgba([255, 0, 0, 255]), -0.25);
        assert_eq!(darker, Rgba([128, 0, 0, 255]));
        let white = adjust_lightness(Rgba([255, 0, 0, 255]), 1.0);
        assert_eq!(white, Rgba([255, 255, 255, 255]));
    }
}
