//! Brush rasterisation onto a [`Surface`].
//!
//! Strokes are built from segments with round caps and joins. Narrow
//! segments stamp a disc along a Bresenham walk; wide segments rasterise
//! the capsule around the segment directly, which touches each pixel once.

use crate::model::Color;
use crate::surface::Surface;

const WIDE_STROKE_THRESHOLD: u32 = 10;

/// Padded pixel bounding box around a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CoverRect {
    x: i32,
    y: i32,
    width: i32,
    height: i32,
}

impl CoverRect {
    fn from_points(a: (i32, i32), b: (i32, i32), pad: i32) -> Self {
        let min_x = a.0.min(b.0) - pad;
        let max_x = a.0.max(b.0) + pad;
        let min_y = a.1.min(b.1) - pad;
        let max_y = a.1.max(b.1) + pad;
        Self {
            x: min_x,
            y: min_y,
            width: (max_x - min_x + 1).max(1),
            height: (max_y - min_y + 1).max(1),
        }
    }

    fn clamp(self, width: u32, height: u32) -> Option<CoverRect> {
        let max_w = width as i32;
        let max_h = height as i32;
        let x0 = self.x.clamp(0, max_w);
        let y0 = self.y.clamp(0, max_h);
        let x1 = (self.x + self.width).clamp(0, max_w);
        let y1 = (self.y + self.height).clamp(0, max_h);
        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some(CoverRect {
            x: x0,
            y: y0,
            width: x1 - x0,
            height: y1 - y0,
        })
    }
}

/// Stamps a single round brush mark. This is what a tap leaves behind.
pub fn draw_dot(surface: &mut Surface, center: (i32, i32), color: Color, stroke_width: u32) {
    draw_brush(surface, center, color, stroke_width.max(1));
}

/// Paints one stroke segment from `start` to `end` with round caps.
pub fn draw_segment(
    surface: &mut Surface,
    start: (i32, i32),
    end: (i32, i32),
    color: Color,
    stroke_width: u32,
) {
    let stroke_width = stroke_width.max(1);
    if use_capsule_path(start, end, stroke_width) {
        draw_segment_capsule(surface, start, end, color, stroke_width);
    } else {
        draw_segment_stamped(surface, start, end, color, stroke_width);
    }
}

fn use_capsule_path(start: (i32, i32), end: (i32, i32), stroke_width: u32) -> bool {
    if stroke_width < WIDE_STROKE_THRESHOLD {
        return false;
    }
    let dx = (end.0 - start.0) as i64;
    let dy = (end.1 - start.1) as i64;
    // Degenerate segments reduce to a brush stamp anyway.
    dx * dx + dy * dy > 2
}

fn draw_segment_stamped(
    surface: &mut Surface,
    start: (i32, i32),
    end: (i32, i32),
    color: Color,
    stroke_width: u32,
) {
    let mut x0 = start.0;
    let mut y0 = start.1;
    let x1 = end.0;
    let y1 = end.1;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        draw_brush(surface, (x0, y0), color, stroke_width);
        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

fn draw_segment_capsule(
    surface: &mut Surface,
    start: (i32, i32),
    end: (i32, i32),
    color: Color,
    stroke_width: u32,
) {
    let radius = (stroke_width.saturating_sub(1) / 2) as f32;
    let pad = radius.ceil() as i32 + 1;
    let bounds = CoverRect::from_points(start, end, pad);
    let Some(clip) = bounds.clamp(surface.width, surface.height) else {
        return;
    };

    let radius_sq = radius * radius;
    for y in clip.y..(clip.y + clip.height) {
        for x in clip.x..(clip.x + clip.width) {
            if point_segment_distance_sq((x, y), start, end) <= radius_sq {
                surface.set_pixel(x, y, color);
            }
        }
    }
}

fn point_segment_distance_sq(point: (i32, i32), start: (i32, i32), end: (i32, i32)) -> f32 {
    let px = point.0 as f32;
    let py = point.1 as f32;
    let x0 = start.0 as f32;
    let y0 = start.1 as f32;
    let x1 = end.0 as f32;
    let y1 = end.1 as f32;
    let vx = x1 - x0;
    let vy = y1 - y0;
    let wx = px - x0;
    let wy = py - y0;
    let len_sq = vx * vx + vy * vy;
    if len_sq <= f32::EPSILON {
        let dx = px - x0;
        let dy = py - y0;
        return dx * dx + dy * dy;
    }
    let t = ((wx * vx + wy * vy) / len_sq).clamp(0.0, 1.0);
    let cx = x0 + vx * t;
    let cy = y0 + vy * t;
    let dx = px - cx;
    let dy = py - cy;
    dx * dx + dy * dy
}

fn draw_brush(surface: &mut Surface, center: (i32, i32), color: Color, stroke_width: u32) {
    let radius = (stroke_width.saturating_sub(1) / 2) as i32;
    for y in (center.1 - radius)..=(center.1 + radius) {
        for x in (center.0 - radius)..=(center.0 + radius) {
            let dx = x - center.0;
            let dy = y - center.1;
            if dx * dx + dy * dy <= radius * radius {
                surface.set_pixel(x, y, color);
            }
        }
    }
}
