//! Procedural placeholder creatures
//!
//! Draws simple but distinct silhouettes from a handful of archetypes. Every
//! random choice comes from a `Xoshiro256StarStar` seeded by
//! [`creature_seed`], so identical inputs give byte-identical frames.

use image::{Rgba, RgbaImage};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;

use super::motion::{motion_offset, Motion};
use super::seed::{creature_seed, mood_jitter, pixel_noise};
use super::PixelArtGenerator;
use crate::color::{adjust_lightness, hsl_to_rgb, rgb_to_hsl, Hsl};
use crate::error::SpriteError;
use crate::models::{AnimationType, Frame, ThemeConfig, DEFAULT_FRAMES_PER_ANIMATION};
use crate::shapes::{
    outline, rasterize_ellipse, rasterize_line, rasterize_rect, rasterize_triangle, PixelSet,
};

/// Smallest resolution the archetypes can be drawn at.
pub const MIN_RESOLUTION: u32 = 8;

const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Base silhouette families, picked by `creature_index % 5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Archetype {
    Blob,
    Quadruped,
    Biped,
    Flying,
    Serpent,
}

impl Archetype {
    pub const ALL: [Archetype; 5] =
        [Archetype::Blob, Archetype::Quadruped, Archetype::Biped, Archetype::Flying, Archetype::Serpent];

    pub fn for_creature(creature_index: usize) -> Self {
        Self::ALL[creature_index % Self::ALL.len()]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Archetype::Blob => "blob",
            Archetype::Quadruped => "quadruped",
            Archetype::Biped => "biped",
            Archetype::Flying => "flying",
            Archetype::Serpent => "serpent",
        }
    }
}

/// Default generator: procedural geometric creatures.
#[derive(Debug, Clone)]
pub struct PlaceholderGenerator {
    resolution: u32,
    frames_per_animation: usize,
}

impl PlaceholderGenerator {
    /// Create a generator for square `resolution` frames.
    ///
    /// # Errors
    ///
    /// Returns [`SpriteError::InvalidResolution`] below [`MIN_RESOLUTION`].
    pub fn new(resolution: u32) -> Result<Self, SpriteError> {
        check_resolution(resolution)?;
        Ok(Self { resolution, frames_per_animation: DEFAULT_FRAMES_PER_ANIMATION })
    }

    /// Set how many frames each animation has (frame indices are checked against it).
    pub fn with_frames_per_animation(mut self, frames: usize) -> Self {
        self.frames_per_animation = frames;
        self
    }

    pub fn frames_per_animation(&self) -> usize {
        self.frames_per_animation
    }
}

fn check_resolution(resolution: u32) -> Result<(), SpriteError> {
    if resolution < MIN_RESOLUTION {
        return Err(SpriteError::InvalidResolution { resolution, minimum: MIN_RESOLUTION });
    }
    Ok(())
}

impl PixelArtGenerator for PlaceholderGenerator {
    fn resolution(&self) -> u32 {
        self.resolution
    }

    fn generate_single_creature(
        &self,
        theme: &ThemeConfig,
        creature_index: usize,
        animation_type: AnimationType,
        frame_index: usize,
    ) -> Result<Frame, SpriteError> {
        check_resolution(self.resolution)?;
        if frame_index >= self.frames_per_animation {
            return Err(SpriteError::InvalidFrameIndex {
                index: frame_index,
                frames: self.frames_per_animation,
            });
        }

        let seed = creature_seed(theme, creature_index);
        let mut rng = Xoshiro256StarStar::seed_from_u64(seed);
        let palette = CreaturePalette::derive(theme.base_color, &mut rng);
        let layout = Layout::new(self.resolution, &mut rng);

        let motion = motion_offset(animation_type, frame_index).scaled(self.resolution);
        let sketch = match Archetype::for_creature(creature_index) {
            Archetype::Blob => sketch_blob(&layout, motion.leg_swap),
            Archetype::Quadruped => sketch_quadruped(&layout, motion.leg_swap),
            Archetype::Biped => sketch_biped(&layout, motion.leg_swap),
            Archetype::Flying => sketch_flying(&layout, motion.leg_swap),
            Archetype::Serpent => sketch_serpent(&layout, motion.leg_swap),
        };

        let mut canvas = RgbaImage::from_pixel(self.resolution, self.resolution, TRANSPARENT);
        let brush = Brush { seed, jitter: mood_jitter(&theme.mood_adjectives), motion };
        sketch.paint(&mut canvas, &palette, &brush);

        Ok(canvas)
    }
}

/// Colors for one creature, all in the theme's base hue family.
#[derive(Debug, Clone, Copy)]
struct CreaturePalette {
    body: Rgba<u8>,
    limb: Rgba<u8>,
    outline: Rgba<u8>,
    accent: Rgba<u8>,
}

impl CreaturePalette {
    fn derive(base: Rgba<u8>, rng: &mut impl Rng) -> Self {
        let base = rgb_to_hsl(base[0], base[1], base[2]);
        let hue = base.h + rng.random_range(-30.0..=30.0);
        let sat = (base.s.max(0.4) + rng.random_range(-0.1..=0.1)).clamp(0.3, 1.0);
        let light = (base.l + rng.random_range(-0.1..=0.1)).clamp(0.35, 0.65);
        let limb_hue = hue + rng.random_range(-20.0..=20.0);

        Self {
            body: opaque(Hsl::new(hue, sat, light)),
            limb: opaque(Hsl::new(limb_hue, sat, light - 0.12)),
            outline: opaque(Hsl::new(hue, sat * 0.8, (light - 0.3).max(0.08))),
            accent: opaque(Hsl::new(hue, sat, (light + 0.3).min(0.92))),
        }
    }
}

fn opaque(hsl: Hsl) -> Rgba<u8> {
    let (r, g, b) = hsl_to_rgb(hsl);
    Rgba([r, g, b, 255])
}

/// Canvas geometry plus per-creature size variation.
struct Layout {
    r: i32,
    cx: i32,
    cy: i32,
    /// Body size in percent of nominal
    size: i32,
    /// Limb length in percent of nominal
    limb: i32,
}

impl Layout {
    fn new(resolution: u32, rng: &mut impl Rng) -> Self {
        let r = resolution as i32;
        Self { r, cx: r / 2, cy: r / 2, size: rng.random_range(88..=112), limb: rng.random_range(80..=120) }
    }

    fn s(&self, v: i32) -> i32 {
        (v * self.size / 100).max(1)
    }

    fn l(&self, v: i32) -> i32 {
        (v * self.limb / 100).max(1)
    }

    /// Size of a "fat pixel" detail (eyes, limb width).
    fn unit(&self) -> i32 {
        (self.r / 16).max(1)
    }

    /// Horizontal leg offset for the swapped walk pose.
    fn stride(&self, swap: bool) -> i32 {
        if swap {
            self.unit()
        } else {
            0
        }
    }

    fn eye(&self, x: i32, y: i32) -> PixelSet {
        let u = self.unit();
        rasterize_rect((x, y), (x + u - 1, y + u - 1))
    }
}

/// Shape parts of a creature, in canvas coordinates before motion.
#[derive(Default)]
struct Sketch {
    limbs: Vec<PixelSet>,
    body: Vec<PixelSet>,
    details: Vec<PixelSet>,
}

struct Brush {
    seed: u64,
    jitter: f64,
    motion: Motion,
}

impl Sketch {
    /// Limbs under body, silhouette outline over both, details on top.
    fn paint(&self, canvas: &mut RgbaImage, palette: &CreaturePalette, brush: &Brush) {
        for part in &self.limbs {
            brush.fill(canvas, part, palette.limb, true);
        }
        for part in &self.body {
            brush.fill(canvas, part, palette.body, true);
        }

        let silhouette: PixelSet = self.limbs.iter().chain(&self.body).flatten().copied().collect();
        brush.fill(canvas, &outline(&silhouette), palette.outline, false);

        for part in &self.details {
            brush.fill(canvas, part, palette.accent, false);
        }
    }
}

impl Brush {
    fn fill(&self, canvas: &mut RgbaImage, pixels: &PixelSet, color: Rgba<u8>, textured: bool) {
        let (w, h) = (canvas.width() as i32, canvas.height() as i32);
        for &(x, y) in pixels {
            let (px, py) = (x + self.motion.dx, y + self.motion.dy);
            if px < 0 || py < 0 || px >= w || py >= h {
                continue;
            }
            let color = if textured { self.texture(color, x, y) } else { color };
            canvas.put_pixel(px as u32, py as u32, color);
        }
    }

    /// Lightness jitter keyed on body-local coordinates so texture moves with the creature.
    fn texture(&self, color: Rgba<u8>, x: i32, y: i32) -> Rgba<u8> {
        let step = (pixel_noise(self.seed, x, y) * 2.0).round() / 2.0;
        if step == 0.0 {
            color
        } else {
            adjust_lightness(color, step * self.jitter)
        }
    }
}

fn sketch_blob(lay: &Layout, swap: bool) -> Sketch {
    let u = lay.unit();
    let (rx, ry) = (lay.s(lay.r / 3), lay.s(lay.r / 4));
    let (cx, cy) = (lay.cx, lay.cy + lay.r / 16);

    let foot_y = cy + ry - u;
    let stride = lay.stride(swap);
    let left = cx - rx / 2 - stride;
    let right = cx + rx / 2 + stride;
    let feet = vec![
        rasterize_rect((left - u, foot_y), (left + u - 1, foot_y + u)),
        rasterize_rect((right - u, foot_y), (right + u - 1, foot_y + u)),
    ];

    let eye_y = cy - ry / 3;
    Sketch {
        limbs: feet,
        body: vec![rasterize_ellipse((cx, cy), rx, ry)],
        details: vec![lay.eye(cx - rx / 2, eye_y), lay.eye(cx + rx / 3, eye_y)],
    }
}

fn sketch_quadruped(lay: &Layout, swap: bool) -> Sketch {
    let u = lay.unit();
    let (bcx, bcy) = (lay.cx - u, lay.cy);
    let (brx, bry) = (lay.s(lay.r / 4), lay.s(lay.r / 8));
    let hr = lay.s(lay.r / 8);
    let (hcx, hcy) = (bcx + brx, bcy - bry);

    let leg_top = bcy + bry - 1;
    let leg_len = lay.l(lay.r / 5);
    let stride = lay.stride(swap);
    let back = bcx - brx + u;
    let front = bcx + brx - 2 * u;
    let legs = [(back, -stride), (back + 2 * u, stride), (front - 2 * u, -stride), (front, stride)]
        .into_iter()
        .map(|(x, shift)| {
            let x = x + shift;
            rasterize_rect((x, leg_top), (x + u - 1, leg_top + leg_len))
        });

    let tail = rasterize_line((bcx - brx, bcy), (bcx - brx - 2 * u, bcy - 2 * u));

    Sketch {
        limbs: legs.chain(std::iter::once(tail)).collect(),
        body: vec![rasterize_ellipse((bcx, bcy), brx, bry), rasterize_ellipse((hcx, hcy), hr, hr)],
        details: vec![lay.eye(hcx + hr / 3, hcy - hr / 3)],
    }
}

fn sketch_biped(lay: &Layout, swap: bool) -> Sketch {
    let u = lay.unit();
    let (bcx, bcy) = (lay.cx, lay.cy + u);
    let (rx, ry) = (lay.s(lay.r / 6), lay.s(lay.r / 5));
    let hr = lay.s(lay.r / 7);
    let (hcx, hcy) = (bcx, bcy - ry - hr + 1);

    let leg_top = bcy + ry - 1;
    let leg_len = lay.l(lay.r / 5);
    let stride = lay.stride(swap);
    let left = bcx - rx / 2 - u / 2 - stride;
    let right = bcx + rx / 2 - u / 2 + stride;
    let arm_len = lay.l(ry / 2).max(1);

    let limbs = vec![
        rasterize_rect((left, leg_top), (left + u - 1, leg_top + leg_len)),
        rasterize_rect((right, leg_top), (right + u - 1, leg_top + leg_len)),
        rasterize_rect((bcx - rx - u, bcy - arm_len / 2), (bcx - rx, bcy + arm_len / 2)),
        rasterize_rect((bcx + rx, bcy - arm_len / 2), (bcx + rx + u, bcy + arm_len / 2)),
    ];

    let eye_y = hcy - hr / 3;
    Sketch {
        limbs,
        body: vec![rasterize_ellipse((bcx, bcy), rx, ry), rasterize_ellipse((hcx, hcy), hr, hr)],
        details: vec![lay.eye(hcx - hr / 2, eye_y), lay.eye(hcx + hr / 3, eye_y)],
    }
}

fn sketch_flying(lay: &Layout, swap: bool) -> Sketch {
    let (cx, cy) = (lay.cx, lay.cy);
    let (rx, ry) = (lay.s(lay.r / 5), lay.s(lay.r / 9));
    let span = lay.l(lay.r / 4);
    // wings flap up on the swapped pose
    let lift = if swap { span } else { span / 2 };

    let left_root = (cx - rx + 1, cy);
    let right_root = (cx + rx - 1, cy);
    let wings = vec![
        rasterize_triangle([
            left_root,
            (left_root.0 - span, cy - lift),
            (left_root.0 - span + span / 3, cy + span / 3),
        ]),
        rasterize_triangle([
            right_root,
            (right_root.0 + span, cy - lift),
            (right_root.0 + span - span / 3, cy + span / 3),
        ]),
    ];

    Sketch {
        limbs: wings,
        body: vec![rasterize_ellipse((cx, cy), rx, ry)],
        details: vec![lay.eye(cx + rx / 2, cy - ry / 2)],
    }
}

fn sketch_serpent(lay: &Layout, swap: bool) -> Sketch {
    const SEGMENTS: i32 = 5;

    let u = lay.unit();
    let seg = lay.s(lay.r / 10);
    let start = lay.r / 5;
    let spacing = (lay.r * 3 / 5) / (SEGMENTS - 1);
    let base_y = lay.cy + lay.r / 8;

    let mut sketch = Sketch::default();
    let mut head = (start, base_y);
    for i in 0..SEGMENTS {
        let x = start + i * spacing;
        let up = (i + swap as i32) % 2 == 1;
        let y = if up { base_y - (seg / 2).max(1) } else { base_y };
        let is_head = i == SEGMENTS - 1;
        let radius = if is_head { seg + u } else { seg };
        let part = rasterize_ellipse((x, y), radius, radius);
        if i % 2 == 0 {
            sketch.body.push(part);
        } else {
            sketch.limbs.push(part);
        }
        head = (x, y);
    }

    sketch.details.push(lay.eye(head.0 + seg / 2, head.1 - seg / 2));
    sketch
}
