//! Software rasterizer
//!
//! `Canvas` binds a `PixelBuffer` for the duration of a frame's drawing. Every
//! primitive funnels through [`Canvas::draw`], which applies the current
//! [`OpacityMode`] before touching the buffer. Nothing in here fails: off-buffer
//! coordinates, empty shapes and zero scales simply draw nothing.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use super::font::{font_sheet, glyph_cell, GLYPH_HEIGHT, GLYPH_WIDTH};
use super::PixelBuffer;
use crate::color::Color;

// ============================================================================
// Opacity Mode
// ============================================================================

/// How an incoming color combines with the pixel already in the buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpacityMode {
    /// Alpha ignored, pixel always overwritten
    #[default]
    Normal,
    /// Anything less than fully opaque is skipped (sprite cutouts)
    Mask,
    /// Blend by `alpha / 255`; the stored pixel is always opaque
    Alpha,
}

// ============================================================================
// Canvas
// ============================================================================

pub struct Canvas<'a> {
    target: &'a mut PixelBuffer,
    mode: OpacityMode,
}

impl<'a> Canvas<'a> {
    /// Bind a canvas to `target` in `OpacityMode::Normal`
    pub fn new(target: &'a mut PixelBuffer) -> Self {
        Self {
            target,
            mode: OpacityMode::Normal,
        }
    }

    pub fn with_mode(mut self, mode: OpacityMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn set_mode(&mut self, mode: OpacityMode) {
        self.mode = mode;
    }

    #[inline]
    pub fn mode(&self) -> OpacityMode {
        self.mode
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.target.width()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.target.height()
    }

    /// The buffer being drawn into
    pub fn target(&self) -> &PixelBuffer {
        self.target
    }

    /// Fill the whole target, bypassing the opacity mode
    pub fn clear(&mut self, color: Color) {
        self.target.clear(color);
    }

    /// Plot one pixel through the opacity mode.
    ///
    /// This is the only place the canvas writes to its target.
    #[inline]
    pub fn draw(&mut self, x: i32, y: i32, color: Color) {
        match self.mode {
            OpacityMode::Normal => self.target.set(x, y, color),
            OpacityMode::Mask => {
                if color.a == 255 {
                    self.target.set(x, y, color);
                }
            },
            OpacityMode::Alpha => {
                if color.a == 255 {
                    self.target.set(x, y, color);
                } else {
                    let t = color.a as f32 / 255.0;
                    let blended = Color::lerp(self.target.get(x, y), color, t);
                    self.target.set(x, y, blended.with_alpha(255));
                }
            },
        }
    }

    /// `draw` for coordinates that may not fit in `i32`; those are never on the buffer
    #[inline]
    fn plot(&mut self, x: i64, y: i64, color: Color) {
        if let (Ok(x), Ok(y)) = (i32::try_from(x), i32::try_from(y)) {
            self.draw(x, y, color);
        }
    }

    /// Fill `[x, x + w) x [y, y + h)`, clipped to the target first
    fn fill_clipped(&mut self, x: i64, y: i64, w: i64, h: i64, color: Color) {
        let (x0, x1) = clip_span(x, w, self.width());
        let (y0, y1) = clip_span(y, h, self.height());
        for py in y0..y1 {
            for px in x0..x1 {
                self.draw(px, py, color);
            }
        }
    }

    // ========================================================================
    // Lines and Rectangles
    // ========================================================================

    /// 1px DDA line, both endpoints included
    pub fn draw_line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, color: Color) {
        self.draw_line_thick(x1, y1, x2, y2, color, 1);
    }

    /// DDA line with a cheap thickness: each step point is extended by
    /// `thickness - 1` pixels to the right and downward.
    ///
    /// The major axis advances by exactly one pixel per step, so only the
    /// steps whose major coordinate can reach the target are walked.
    pub fn draw_line_thick(
        &mut self,
        x1: i32,
        y1: i32,
        x2: i32,
        y2: i32,
        color: Color,
        thickness: u32,
    ) {
        let dx = i64::from(x2) - i64::from(x1);
        let dy = i64::from(y2) - i64::from(y1);
        let steps = dx.abs().max(dy.abs());
        let (sx, sy) = if steps == 0 {
            (0.0, 0.0)
        } else {
            (dx as f32 / steps as f32, dy as f32 / steps as f32)
        };

        let x_major = dx.abs() >= dy.abs();
        let (start, dir, extent) = if x_major {
            (i64::from(x1), dx.signum(), self.width())
        } else {
            (i64::from(y1), dy.signum(), self.height())
        };
        // A step can touch the target while its major coordinate is in lo..=hi
        let lo = 1 - i64::from(thickness.max(1));
        let hi = i64::from(extent) - 1;
        let (first, last) = match dir {
            1 => (lo - start, hi - start),
            -1 => (start - hi, start - lo),
            _ => (0, steps),
        };

        for i in first.max(0)..=last.min(steps) {
            let t = i as f32;
            // Truncate, don't round
            let (x, y) = if x_major {
                (start + dir * i, (y1 as f32 + sy * t) as i64)
            } else {
                ((x1 as f32 + sx * t) as i64, start + dir * i)
            };
            self.plot(x, y, color);
            for j in 1..i64::from(thickness) {
                self.plot(x + j, y, color);
                self.plot(x, y + j, color);
            }
        }
    }

    /// Rectangle outline. Negative sizes extend left/up from (x, y).
    pub fn draw_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Color) {
        let (x, w) = if w < 0 {
            (x.saturating_add(w), w.saturating_neg())
        } else {
            (x, w)
        };
        let (y, h) = if h < 0 {
            (y.saturating_add(h), h.saturating_neg())
        } else {
            (y, h)
        };
        let (right, bottom) = (x.saturating_add(w), y.saturating_add(h));

        self.draw_line(x, y, right, y, color);
        self.draw_line(right, y, right, bottom, color);
        self.draw_line(right, bottom, x, bottom, color);
        self.draw_line(x, bottom, x, y, color);
    }

    /// Fill `[x, x + w) x [y, y + h)`
    pub fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Color) {
        self.fill_clipped(
            i64::from(x),
            i64::from(y),
            i64::from(w),
            i64::from(h),
            color,
        );
    }

    // ========================================================================
    // Circles
    // ========================================================================

    /// Midpoint circle outline (1px thick)
    pub fn draw_circle(&mut self, cx: i32, cy: i32, radius: i32, color: Color) {
        if radius <= 0 {
            return;
        }
        let (cx, cy, r) = (i64::from(cx), i64::from(cy), i64::from(radius));

        let mut x = r - 1;
        let mut y = 0;
        let mut dx = 1;
        let mut dy = 1;
        let mut err = dx - (r << 1);

        while x >= y {
            self.plot(cx + x, cy + y, color);
            self.plot(cx + y, cy + x, color);
            self.plot(cx - y, cy + x, color);
            self.plot(cx - x, cy + y, color);
            self.plot(cx - x, cy - y, color);
            self.plot(cx - y, cy - x, color);
            self.plot(cx + y, cy - x, color);
            self.plot(cx + x, cy - y, color);

            if err <= 0 {
                y += 1;
                err += dy;
                dy += 2;
            }
            if err > 0 {
                x -= 1;
                dx += 2;
                err += dx - (r << 1);
            }
        }
    }

    /// Filled circle by scanning the 2r x 2r bounding box
    pub fn fill_circle(&mut self, cx: i32, cy: i32, radius: i32, color: Color) {
        if radius <= 0 {
            return;
        }
        let (left, top, r) = (
            i64::from(cx) - i64::from(radius),
            i64::from(cy) - i64::from(radius),
            i64::from(radius),
        );
        let rf = radius as f32;

        let rows = visible_cells(top, 1, r * 2, self.height());
        for i in visible_cells(left, 1, r * 2, self.width()) {
            for j in rows.clone() {
                let ox = rf - i as f32;
                let oy = rf - j as f32;
                if (ox * ox + oy * oy).sqrt() < rf {
                    self.plot(left + i, top + j, color);
                }
            }
        }
    }

    // ========================================================================
    // Triangles
    // ========================================================================

    pub fn draw_triangle(
        &mut self,
        p1: (i32, i32),
        p2: (i32, i32),
        p3: (i32, i32),
        color: Color,
    ) {
        self.draw_line(p1.0, p1.1, p2.0, p2.1, color);
        self.draw_line(p2.0, p2.1, p3.0, p3.1, color);
        self.draw_line(p3.0, p3.1, p1.0, p1.1, color);
    }

    /// Fill every pixel of the bounding box that passes the half-plane test.
    /// Pixels on an edge count as inside.
    pub fn fill_triangle(
        &mut self,
        p1: (i32, i32),
        p2: (i32, i32),
        p3: (i32, i32),
        color: Color,
    ) {
        // Bounding box, clipped to the target
        let min_x = i64::from(p1.0.min(p2.0).min(p3.0)).max(0);
        let max_x = i64::from(p1.0.max(p2.0).max(p3.0)).min(i64::from(self.width()) - 1);
        let min_y = i64::from(p1.1.min(p2.1).min(p3.1)).max(0);
        let max_y = i64::from(p1.1.max(p2.1).max(p3.1)).min(i64::from(self.height()) - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                if point_in_triangle((x, y), p1, p2, p3) {
                    self.plot(x, y, color);
                }
            }
        }
    }

    // ========================================================================
    // Sprites
    // ========================================================================

    /// Blit a whole sprite, nearest-neighbour upscaled by `scale`
    pub fn draw_sprite(&mut self, x: i32, y: i32, sprite: &PixelBuffer, scale: u32) {
        self.draw_partial_sprite(
            x,
            y,
            sprite,
            0,
            0,
            sprite.width() as i32,
            sprite.height() as i32,
            scale,
        );
    }

    /// Blit the `w x h` region of `sprite` starting at (ox, oy)
    pub fn draw_partial_sprite(
        &mut self,
        x: i32,
        y: i32,
        sprite: &PixelBuffer,
        ox: i32,
        oy: i32,
        w: i32,
        h: i32,
        scale: u32,
    ) {
        if scale == 0 {
            return;
        }
        let s = i64::from(scale);
        let (x, y) = (i64::from(x), i64::from(y));

        let columns = visible_cells(x, s, i64::from(w), self.width());
        for j in visible_cells(y, s, i64::from(h), self.height()) {
            for i in columns.clone() {
                // i < w and j < h, so both fit in i32
                let color = sprite.get(ox.saturating_add(i as i32), oy.saturating_add(j as i32));
                if scale > 1 {
                    self.fill_clipped(x + i * s, y + j * s, s, s, color);
                } else {
                    self.plot(x + i, y + j, color);
                }
            }
        }
    }

    /// Blit a sprite rotated by `angle` radians about its centre.
    ///
    /// Each destination pixel in a box twice the sprite's size is mapped back
    /// into sprite space. Fully transparent source pixels are skipped, so
    /// off-axis angles can leave small gaps.
    pub fn draw_sprite_rotated(&mut self, x: i32, y: i32, sprite: &PixelBuffer, angle: f32) {
        let w = sprite.width() as i32;
        let h = sprite.height() as i32;
        if w == 0 || h == 0 {
            return;
        }

        let half_w = w / 2;
        let half_h = h / 2;
        let cx = i64::from(x) + i64::from(half_w);
        let cy = i64::from(y) + i64::from(half_h);
        let (sin, cos) = (-angle).sin_cos();

        for dy in -h..h {
            for dx in -w..w {
                let fx = dx as f32;
                let fy = dy as f32;
                let sx = (fx * cos - fy * sin + half_w as f32).floor() as i32;
                let sy = (fx * sin + fy * cos + half_h as f32).floor() as i32;
                if !sprite.in_bounds(sx, sy) {
                    continue;
                }

                let color = sprite.get(sx, sy);
                if color.a == 0 {
                    continue;
                }
                self.plot(cx + i64::from(dx), cy + i64::from(dy), color);
            }
        }
    }

    // ========================================================================
    // Text
    // ========================================================================

    /// Draw `text` with the built-in font. `'\n'` starts a new line; every
    /// other character advances a full glyph width, drawn or not.
    pub fn draw_string(&mut self, x: i32, y: i32, text: &str, color: Color, scale: u32) {
        if scale == 0 {
            return;
        }
        let s = i64::from(scale);
        let (x, y) = (i64::from(x), i64::from(y));
        let advance_x = i64::from(GLYPH_WIDTH) * s;
        let advance_y = i64::from(GLYPH_HEIGHT) * s;
        let sheet = font_sheet();

        let mut cursor_x = 0i64;
        let mut cursor_y = 0i64;

        for ch in text.chars() {
            if ch == '\n' {
                cursor_x = 0;
                cursor_y = cursor_y.saturating_add(advance_y);
                continue;
            }

            if let Some((ox, oy)) = glyph_cell(ch) {
                for j in 0..GLYPH_HEIGHT as i32 {
                    for i in 0..GLYPH_WIDTH as i32 {
                        if sheet.get(ox + i, oy + j).r == 0 {
                            continue;
                        }
                        let px = x.saturating_add(cursor_x).saturating_add(i64::from(i) * s);
                        let py = y.saturating_add(cursor_y).saturating_add(i64::from(j) * s);
                        if scale > 1 {
                            self.fill_clipped(px, py, s, s, color);
                        } else {
                            self.plot(px, py, color);
                        }
                    }
                }
            }
            cursor_x = cursor_x.saturating_add(advance_x);
        }
    }
}

/// `[start, start + len)` intersected with `[0, extent)`, as i32 bounds.
/// Empty spans come back as `(0, 0)`.
fn clip_span(start: i64, len: i64, extent: u32) -> (i32, i32) {
    let lo = start.max(0);
    let hi = start
        .saturating_add(len)
        .min(i64::from(extent))
        .min(i64::from(i32::MAX));
    if hi <= lo {
        return (0, 0);
    }
    (lo as i32, hi as i32)
}

/// Indices `i` in `0..count` whose cell `[origin + i * size, origin + (i + 1) * size)`
/// overlaps `[0, extent)`. `size` must be positive.
fn visible_cells(origin: i64, size: i64, count: i64, extent: u32) -> Range<i64> {
    let first = (-origin).div_euclid(size).max(0);
    let last = (i64::from(extent) - origin + size - 1)
        .div_euclid(size)
        .min(count);
    first..last.max(first)
}

/// Half-plane test; a point is inside unless the edge signs disagree
fn point_in_triangle(p: (i64, i64), a: (i32, i32), b: (i32, i32), c: (i32, i32)) -> bool {
    // Differences of i32 coordinates need 33 bits, their products 66
    let edge = |p: (i64, i64), a: (i32, i32), b: (i32, i32)| -> i128 {
        (i128::from(p.0) - i128::from(b.0)) * (i128::from(a.1) - i128::from(b.1))
            - (i128::from(a.0) - i128::from(b.0)) * (i128::from(p.1) - i128::from(b.1))
    };
    let d1 = edge(p, a, b);
    let d2 = edge(p, b, c);
    let d3 = edge(p, c, a);

    let has_neg = d1 < 0 || d2 < 0 || d3 < 0;
    let has_pos = d1 > 0 || d2 > 0 || d3 > 0;
    !(has_neg && has_pos)
}
