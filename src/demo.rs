//! Demo systems for the pixelforge binary

use std::f32::consts::TAU;

use pixelforge::display::{text_size, Canvas, OpacityMode, PixelBuffer};
use pixelforge::{Color, FrameContext, System};

// ============================================================================
// Backdrop
// ============================================================================

/// Scrolling HSV bands behind everything else
pub struct Backdrop {
    hue: f32,
}

impl Backdrop {
    pub fn new() -> Self {
        Self { hue: 0.0 }
    }
}

impl Default for Backdrop {
    fn default() -> Self {
        Self::new()
    }
}

impl System for Backdrop {
    fn name(&self) -> &str {
        "backdrop"
    }

    fn update(&mut self, ctx: &mut FrameContext) {
        self.hue = (self.hue + 40.0 * ctx.dt) % 360.0;
    }

    fn render(&mut self, ctx: &FrameContext, canvas: &mut Canvas<'_>) {
        let band = 8;
        let w = canvas.width() as i32;
        let h = canvas.height() as i32;
        for (i, y) in (0..h).step_by(band as usize).enumerate() {
            let hue = self.hue + i as f32 * 12.0;
            let wave = (ctx.elapsed * 2.0 + i as f32 * 0.4).sin() * 0.15;
            canvas.fill_rect(0, y, w, band, Color::from_hsv(hue, 0.6, 0.25 + wave, 255));
        }
    }
}

// ============================================================================
// Bouncer
// ============================================================================

/// A ball that bounces off the screen edges and changes colour on each hit
pub struct Bouncer {
    x: f32,
    y: f32,
    vx: f32,
    vy: f32,
    radius: i32,
    hue: f32,
}

impl Bouncer {
    pub fn new() -> Self {
        Self {
            x: 40.0,
            y: 40.0,
            vx: 70.0, // pixels per second
            vy: 45.0,
            radius: 12,
            hue: 0.0,
        }
    }
}

impl Default for Bouncer {
    fn default() -> Self {
        Self::new()
    }
}

impl System for Bouncer {
    fn name(&self) -> &str {
        "bouncer"
    }

    fn update(&mut self, ctx: &mut FrameContext) {
        let r = self.radius as f32;
        let max_x = ctx.width as f32 - r;
        let max_y = ctx.height as f32 - r;
        let mut bounced = false;

        self.x += self.vx * ctx.dt;
        self.y += self.vy * ctx.dt;

        if self.x <= r {
            self.x = r;
            self.vx = self.vx.abs();
            bounced = true;
        } else if self.x >= max_x {
            self.x = max_x;
            self.vx = -self.vx.abs();
            bounced = true;
        }

        if self.y <= r {
            self.y = r;
            self.vy = self.vy.abs();
            bounced = true;
        } else if self.y >= max_y {
            self.y = max_y;
            self.vy = -self.vy.abs();
            bounced = true;
        }

        if bounced {
            self.hue = (self.hue + 67.0) % 360.0;
            log::trace!("bounce at ({:.0}, {:.0})", self.x, self.y);
        }
    }

    fn render(&mut self, _ctx: &FrameContext, canvas: &mut Canvas<'_>) {
        let (cx, cy) = (self.x as i32, self.y as i32);
        canvas.fill_circle(cx, cy, self.radius, Color::from_hsl(self.hue, 80.0, 50.0, 255));
        canvas.draw_circle(cx, cy, self.radius, Color::WHITE);
    }
}

// ============================================================================
// Spinner
// ============================================================================

/// A rotating sprite with a spinning triangle around it
pub struct Spinner {
    sprite: PixelBuffer,
    angle: f32,
}

impl Spinner {
    pub fn new(sprite: PixelBuffer) -> Self {
        Self { sprite, angle: 0.0 }
    }

    /// 16x16 checkerboard with a transparent border, used when no sprite file is given
    pub fn checkerboard() -> PixelBuffer {
        let size = 16;
        let mut sprite = PixelBuffer::with_size(size, size);
        for y in 1..size as i32 - 1 {
            for x in 1..size as i32 - 1 {
                let c = if (x / 4 + y / 4) % 2 == 0 {
                    Color::YELLOW
                } else {
                    Color::DARK_RED
                };
                sprite.set(x, y, c);
            }
        }
        sprite
    }
}

impl System for Spinner {
    fn name(&self) -> &str {
        "spinner"
    }

    fn update(&mut self, ctx: &mut FrameContext) {
        self.angle = (self.angle + ctx.dt * 1.5) % TAU;
    }

    fn render(&mut self, ctx: &FrameContext, canvas: &mut Canvas<'_>) {
        let cx = ctx.width as i32 * 3 / 4;
        let cy = ctx.height as i32 / 2;
        let w = self.sprite.width() as i32;
        let h = self.sprite.height() as i32;

        let corner = |offset: f32| {
            let a = -self.angle + offset;
            let r = (w.max(h) as f32) * 1.2 + 6.0;
            (cx + (a.cos() * r) as i32, cy + (a.sin() * r) as i32)
        };
        let (p1, p2, p3) = (corner(0.0), corner(TAU / 3.0), corner(2.0 * TAU / 3.0));
        canvas.fill_triangle(p1, p2, p3, Color::DARK_BLUE);
        canvas.draw_line_thick(p1.0, p1.1, p2.0, p2.1, Color::CYAN, 2);
        canvas.draw_line_thick(p2.0, p2.1, p3.0, p3.1, Color::CYAN, 2);
        canvas.draw_line_thick(p3.0, p3.1, p1.0, p1.1, Color::CYAN, 2);

        canvas.draw_sprite_rotated(cx - w / 2, cy - h / 2, &self.sprite, self.angle);
        // Unrotated copy in the corner, transparent pixels masked out
        let mode = canvas.mode();
        canvas.set_mode(OpacityMode::Mask);
        canvas.draw_sprite(4, ctx.height as i32 - h * 2 - 4, &self.sprite, 2);
        canvas.set_mode(mode);
    }
}

// ============================================================================
// Glass
// ============================================================================

/// Translucent panels blended over the scene
pub struct Glass;

impl System for Glass {
    fn name(&self) -> &str {
        "glass"
    }

    fn render(&mut self, ctx: &FrameContext, canvas: &mut Canvas<'_>) {
        let mode = canvas.mode();
        canvas.set_mode(OpacityMode::Alpha);

        let slide = ((ctx.elapsed * 0.7).sin() * 30.0) as i32;
        canvas.fill_rect(20 + slide, 60, 70, 50, Color::RED.with_alpha(96));
        canvas.fill_rect(60 - slide, 90, 70, 50, Color::GREEN.with_alpha(96));
        canvas.draw_rect(20 + slide, 60, 70, 50, Color::WHITE);
        canvas.draw_rect(60 - slide, 90, 70, 50, Color::WHITE);

        canvas.set_mode(mode);
    }
}

// ============================================================================
// Banner
// ============================================================================

/// Title text, centred and gently bobbing
pub struct Banner {
    text: String,
}

impl Banner {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_uppercase(),
        }
    }
}

impl System for Banner {
    fn name(&self) -> &str {
        "banner"
    }

    fn render(&mut self, ctx: &FrameContext, canvas: &mut Canvas<'_>) {
        let scale = 2;
        let (tw, _) = text_size(&self.text, scale);
        let x = (ctx.width as i32 - tw as i32) / 2;
        let y = 8 + ((ctx.elapsed * 3.0).sin() * 3.0) as i32;

        canvas.draw_string(x + 2, y + 2, &self.text, Color::BLACK, scale);
        let color = Color::from_hex("#F0E68C");
        canvas.draw_string(x, y, &self.text, color, scale);
    }
}
