//! Shape rasterization primitives for creature silhouettes.
//!
//! Every function returns the set of integer pixel coordinates covered by the
//! shape. Coordinates may fall outside the canvas; callers clip when drawing.

use std::collections::HashSet;

/// Pixel coordinate set produced by the rasterizers.
pub type PixelSet = HashSet<(i32, i32)>;

/// Rasterize a filled axis-aligned rectangle from corner `(x0, y0)` to
/// `(x1, y1)`, both inclusive. Corners may be given in any order.
///
/// ```
/// use pixel_factory::shapes::rasterize_rect;
///
/// let pixels = rasterize_rect((0, 0), (2, 1));
/// assert_eq!(pixels.len(), 6);
/// assert!(pixels.contains(&(2, 1)));
/// ```
pub fn rasterize_rect(p0: (i32, i32), p1: (i32, i32)) -> PixelSet {
    let (x0, x1) = (p0.0.min(p1.0), p0.0.max(p1.0));
    let (y0, y1) = (p0.1.min(p1.1), p0.1.max(p1.1));

    (y0..=y1).flat_map(|y| (x0..=x1).map(move |x| (x, y))).collect()
}

/// Rasterize a filled ellipse centered at `(cx, cy)` with radii `(rx, ry)`.
///
/// A pixel is inside when its center satisfies the ellipse equation. Zero or
/// negative radii produce an empty set.
///
/// ```
/// use pixel_factory::shapes::rasterize_ellipse;
///
/// let pixels = rasterize_ellipse((5, 5), 3, 2);
/// assert!(pixels.contains(&(5, 5)));
/// assert!(pixels.contains(&(8, 5)));
/// assert!(!pixels.contains(&(8, 7)));
/// ```
pub fn rasterize_ellipse(center: (i32, i32), rx: i32, ry: i32) -> PixelSet {
    let mut pixels = PixelSet::new();
    if rx <= 0 || ry <= 0 {
        return pixels;
    }

    let (cx, cy) = center;
    let rx2 = (rx as i64) * (rx as i64);
    let ry2 = (ry as i64) * (ry as i64);

    for dy in -ry..=ry {
        for dx in -rx..=rx {
            let (dx64, dy64) = (dx as i64, dy as i64);
            if dx64 * dx64 * ry2 + dy64 * dy64 * rx2 <= rx2 * ry2 {
                pixels.insert((cx + dx, cy + dy));
            }
        }
    }

    pixels
}

/// Rasterize a filled triangle using edge functions.
///
/// Winding order does not matter. Degenerate triangles collapse to their
/// edges so thin wing tips still show up.
///
/// ```
/// use pixel_factory::shapes::rasterize_triangle;
///
/// let pixels = rasterize_triangle([(0, 0), (4, 0), (0, 4)]);
/// assert!(pixels.contains(&(1, 1)));
/// assert!(!pixels.contains(&(4, 4)));
/// ```
pub fn rasterize_triangle(vertices: [(i32, i32); 3]) -> PixelSet {
    let [a, b, c] = vertices;
    let area = edge(a, b, c);
    if area == 0 {
        let mut pixels = rasterize_line(a, b);
        pixels.extend(rasterize_line(b, c));
        return pixels;
    }

    let min_x = a.0.min(b.0).min(c.0);
    let max_x = a.0.max(b.0).max(c.0);
    let min_y = a.1.min(b.1).min(c.1);
    let max_y = a.1.max(b.1).max(c.1);

    let mut pixels = PixelSet::new();
    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let p = (x, y);
            let w0 = edge(b, c, p);
            let w1 = edge(c, a, p);
            let w2 = edge(a, b, p);
            let inside = if area > 0 {
                w0 >= 0 && w1 >= 0 && w2 >= 0
            } else {
                w0 <= 0 && w1 <= 0 && w2 <= 0
            };
            if inside {
                pixels.insert(p);
            }
        }
    }

    pixels
}

/// Signed doubled area of triangle (a, b, p).
fn edge(a: (i32, i32), b: (i32, i32), p: (i32, i32)) -> i64 {
    (b.0 - a.0) as i64 * (p.1 - a.1) as i64 - (b.1 - a.1) as i64 * (p.0 - a.0) as i64
}

/// Rasterize a line with Bresenham's algorithm, endpoints included.
pub fn rasterize_line(p0: (i32, i32), p1: (i32, i32)) -> PixelSet {
    let mut pixels = PixelSet::new();
    let (mut x, mut y) = p0;
    let dx = (p1.0 - x).abs();
    let dy = -(p1.1 - y).abs();
    let sx = if x < p1.0 { 1 } else { -1 };
    let sy = if y < p1.1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        pixels.insert((x, y));
        if (x, y) == p1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }

    pixels
}

/// Pixels of `shape` that touch at least one 4-neighbor outside the shape.
pub fn outline(shape: &PixelSet) -> PixelSet {
    shape
        .iter()
        .copied()
        .filter(|&(x, y)| {
            [(x - 1, y), (x + 1, y), (x, y - 1), (x, y + 1)].iter().any(|n| !shape.contains(n))
        })
        .collect()
}
