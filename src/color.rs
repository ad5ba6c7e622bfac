//! Color model
//!
//! 8-bit RGBA colors plus the conversions the rasterizer and demo code lean on.
//! All float-to-byte conversions truncate toward zero and then wrap into the
//! byte range. Nothing here saturates: out-of-range inputs produce wrapped
//! channels, which keeps output bit-compatible with older renderers.

use std::ops::{Add, AddAssign, Mul, MulAssign, Sub, SubAssign};

use bytemuck::{Pod, Zeroable};

/// RGBA color, one byte per channel.
///
/// Laid out as `r, g, b, a` so a `[Color]` slice can be handed to the GPU as
/// RGBA bytes without conversion.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Pod, Zeroable)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// Truncate toward zero, then wrap into a byte (`f32 as u8` alone would saturate)
#[inline]
fn wrap_byte(v: f32) -> u8 {
    v as i32 as u8
}

impl Color {
    pub const BLANK: Color = Color::rgba(0, 0, 0, 0);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const GREY: Color = Color::rgb(192, 192, 192);
    pub const DARK_GREY: Color = Color::rgb(128, 128, 128);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const DARK_RED: Color = Color::rgb(128, 0, 0);
    pub const GREEN: Color = Color::rgb(0, 255, 0);
    pub const DARK_GREEN: Color = Color::rgb(0, 128, 0);
    pub const BLUE: Color = Color::rgb(0, 0, 255);
    pub const DARK_BLUE: Color = Color::rgb(0, 0, 128);
    pub const YELLOW: Color = Color::rgb(255, 255, 0);
    pub const CYAN: Color = Color::rgb(0, 255, 255);
    pub const MAGENTA: Color = Color::rgb(255, 0, 255);

    /// Opaque color
    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    #[inline]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    #[inline]
    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Linear interpolation: `(1 - t) * a + t * b` per channel.
    ///
    /// `t` is not clamped. Values outside [0, 1] extrapolate and wrap.
    pub fn lerp(a: Color, b: Color, t: f32) -> Color {
        let mix = |x: u8, y: u8| wrap_byte((1.0 - t) * x as f32 + t * y as f32);
        Color {
            r: mix(a.r, b.r),
            g: mix(a.g, b.g),
            b: mix(a.b, b.b),
            a: mix(a.a, b.a),
        }
    }

    /// HSV to RGB.
    /// h: degrees (any value, wrapped into 0..360), s and v: 0-1
    pub fn from_hsv(h: f32, s: f32, v: f32, alpha: u8) -> Color {
        let h = h.rem_euclid(360.0) / 60.0;
        let sector = h.floor();
        let f = h - sector;

        let pv = v * (1.0 - s);
        let qv = v * (1.0 - s * f);
        let tv = v * (1.0 - s * (1.0 - f));

        // rem_euclid can land exactly on 360.0 for tiny negative inputs;
        // that sector falls through to the last arm.
        let (r, g, b) = match sector as i32 {
            0 => (v, tv, pv),
            1 => (qv, v, pv),
            2 => (pv, v, tv),
            3 => (pv, qv, v),
            4 => (tv, pv, v),
            _ => (v, pv, qv),
        };

        let to_byte = |c: f32| wrap_byte((c * 255.0).round());
        Color::rgba(to_byte(r), to_byte(g), to_byte(b), alpha)
    }

    /// HSL to RGB.
    /// h: degrees 0-360, s and l: percent 0-100 (all clamped)
    pub fn from_hsl(h: f32, s: f32, l: f32, alpha: u8) -> Color {
        let h = (h / 360.0).clamp(0.0, 1.0);
        let s = (s / 100.0).clamp(0.0, 1.0);
        let l = (l / 100.0).clamp(0.0, 1.0);

        if s == 0.0 {
            let v = wrap_byte(l * 255.0);
            return Color::rgba(v, v, v, alpha);
        }

        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;

        let r = hue_to_channel(p, q, h + 1.0 / 3.0);
        let g = hue_to_channel(p, q, h);
        let b = hue_to_channel(p, q, h - 1.0 / 3.0);

        Color::rgba(
            wrap_byte(r * 255.0),
            wrap_byte(g * 255.0),
            wrap_byte(b * 255.0),
            alpha,
        )
    }

    /// Parse `#RRGGBB`. Anything else logs a warning and yields `BLANK`.
    pub fn from_hex(hex: &str) -> Color {
        let valid = hex.len() == 7
            && hex.starts_with('#')
            && hex.bytes().skip(1).all(|b| b.is_ascii_hexdigit());
        if !valid {
            log::warn!("ignoring malformed hex color {:?}", hex);
            return Color::default();
        }

        // All seven bytes are ASCII at this point, so the slices are on char boundaries
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).unwrap_or_default()
        };
        Color::rgb(channel(1..3), channel(3..5), channel(5..7))
    }

    /// `#RRGGBB`, alpha dropped
    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Packed `0xAARRGGBB`
    #[inline]
    pub const fn to_u32(self) -> u32 {
        (self.a as u32) << 24 | (self.r as u32) << 16 | (self.g as u32) << 8 | self.b as u32
    }

    #[inline]
    pub const fn from_u32(packed: u32) -> Self {
        Self {
            a: (packed >> 24) as u8,
            r: (packed >> 16) as u8,
            g: (packed >> 8) as u8,
            b: packed as u8,
        }
    }
}

/// HSL hue ramp. The 0.16 / 0.666 breakpoints are deliberately not exact
/// sixths; existing palettes were tuned against them.
fn hue_to_channel(p: f32, q: f32, mut t: f32) -> f32 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }
    if t < 0.16 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 0.666 {
        p + (q - p) * (0.666 - t) * 6.0
    } else {
        p
    }
}

// ============================================================================
// Arithmetic (RGB only; alpha comes from the left operand)
// ============================================================================

impl Add for Color {
    type Output = Color;

    #[inline]
    fn add(self, rhs: Color) -> Color {
        Color {
            r: self.r.wrapping_add(rhs.r),
            g: self.g.wrapping_add(rhs.g),
            b: self.b.wrapping_add(rhs.b),
            a: self.a,
        }
    }
}

impl Sub for Color {
    type Output = Color;

    #[inline]
    fn sub(self, rhs: Color) -> Color {
        Color {
            r: self.r.wrapping_sub(rhs.r),
            g: self.g.wrapping_sub(rhs.g),
            b: self.b.wrapping_sub(rhs.b),
            a: self.a,
        }
    }
}

impl Mul<f32> for Color {
    type Output = Color;

    #[inline]
    fn mul(self, rhs: f32) -> Color {
        Color {
            r: wrap_byte(self.r as f32 * rhs),
            g: wrap_byte(self.g as f32 * rhs),
            b: wrap_byte(self.b as f32 * rhs),
            a: self.a,
        }
    }
}

impl AddAssign for Color {
    fn add_assign(&mut self, rhs: Color) {
        *self = *self + rhs;
    }
}

impl SubAssign for Color {
    fn sub_assign(&mut self, rhs: Color) {
        *self = *self - rhs;
    }
}

impl MulAssign<f32> for Color {
    fn mul_assign(&mut self, rhs: f32) {
        *self = *self * rhs;
    }
}

impl From<(u8, u8, u8)> for Color {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Color::rgb(r, g, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: Color, b: Color) {
        let near = |x: u8, y: u8| (x as i32 - y as i32).abs() <= 1;
        assert!(
            near(a.r, b.r) && near(a.g, b.g) && near(a.b, b.b) && near(a.a, b.a),
            "{:?} not within 1 of {:?}",
            a,
            b
        );
    }

    #[test]
    fn test_lerp_endpoints() {
        let a = Color::rgba(10, 200, 30, 255);
        let b = Color::rgba(250, 0, 90, 0);
        assert_eq!(Color::lerp(a, b, 0.0), a);
        assert_eq!(Color::lerp(a, b, 1.0), b);
    }

    #[test]
    fn test_lerp_same_color_is_stable() {
        let a = Color::rgba(17, 99, 201, 133);
        for i in 0..=10 {
            assert_close(Color::lerp(a, a, i as f32 / 10.0), a);
        }
    }

    #[test]
    fn test_lerp_truncates() {
        // 0.5 * 0 + 0.5 * 255 = 127.5 -> 127
        let c = Color::lerp(Color::BLACK, Color::WHITE, 0.5);
        assert_eq!(c.r, 127);
    }

    #[test]
    fn test_lerp_extrapolation_wraps() {
        // 2 * 200 - 1 * 0 = 400 -> wraps to 144 rather than clamping at 255
        let c = Color::lerp(Color::BLACK, Color::rgb(200, 0, 0), 2.0);
        assert_eq!(c.r, (400 % 256) as u8);
    }

    #[test]
    fn test_from_hsv_primaries() {
        assert_eq!(Color::from_hsv(0.0, 1.0, 1.0, 255), Color::RED);
        assert_eq!(Color::from_hsv(120.0, 1.0, 1.0, 255), Color::GREEN);
        assert_eq!(Color::from_hsv(240.0, 1.0, 1.0, 255), Color::BLUE);
        assert_eq!(Color::from_hsv(60.0, 1.0, 1.0, 255), Color::YELLOW);
    }

    #[test]
    fn test_from_hsv_wraps_hue() {
        assert_eq!(
            Color::from_hsv(-120.0, 1.0, 1.0, 255),
            Color::from_hsv(240.0, 1.0, 1.0, 255)
        );
        assert_eq!(
            Color::from_hsv(480.0, 1.0, 1.0, 255),
            Color::from_hsv(120.0, 1.0, 1.0, 255)
        );
    }

    #[test]
    fn test_from_hsv_rounds_and_keeps_alpha() {
        let c = Color::from_hsv(0.0, 0.0, 0.5, 77);
        assert_eq!(c, Color::rgba(128, 128, 128, 77));
    }

    #[test]
    fn test_from_hsl_primaries() {
        assert_eq!(Color::from_hsl(0.0, 100.0, 50.0, 255), Color::RED);
        assert_eq!(Color::from_hsl(120.0, 100.0, 50.0, 255), Color::GREEN);
        assert_eq!(Color::from_hsl(240.0, 100.0, 50.0, 255), Color::BLUE);
    }

    #[test]
    fn test_from_hsl_greyscale_and_clamping() {
        assert_eq!(Color::from_hsl(0.0, 0.0, 100.0, 255), Color::WHITE);
        assert_eq!(Color::from_hsl(0.0, 0.0, 0.0, 255), Color::BLACK);
        // Lightness above 100% clamps instead of wrapping
        assert_eq!(Color::from_hsl(42.0, 0.0, 150.0, 255), Color::WHITE);
    }

    #[test]
    fn test_hue_breakpoints_are_literal() {
        // Just under 1/6 but past 0.16: the ramp has already flattened to q
        assert_eq!(hue_to_channel(0.0, 1.0, 0.165), 1.0);
        // Between 0.666 and 2/3 the falling ramp is already over
        assert_eq!(hue_to_channel(0.0, 1.0, 0.6665), 0.0);
    }

    #[test_log::test]
    fn test_from_hex() {
        assert_eq!(Color::from_hex("#FF8000"), Color::rgba(255, 128, 0, 255));
        assert_eq!(Color::from_hex("#00ff7f"), Color::rgb(0, 255, 127));
    }

    #[test_log::test]
    fn test_from_hex_rejects_malformed() {
        assert_eq!(Color::from_hex("bad"), Color::default());
        assert_eq!(Color::from_hex("FF8000"), Color::default());
        assert_eq!(Color::from_hex("#FF800"), Color::default());
        assert_eq!(Color::from_hex("#GG8000"), Color::default());
        assert_eq!(Color::from_hex("#+F8000"), Color::default());
        // Seven bytes, but not seven chars
        assert_eq!(Color::from_hex("#\u{e9}8000"), Color::default());
    }

    #[test]
    fn test_hex_round_trip_for_opaque() {
        let c = Color::rgb(18, 52, 86);
        assert_eq!(c.to_hex(), "#123456");
        assert_eq!(Color::from_hex(&c.to_hex()), c);
    }

    #[test]
    fn test_packed_u32() {
        let c = Color::rgba(0x11, 0x22, 0x33, 0x44);
        assert_eq!(c.to_u32(), 0x44112233);
        assert_eq!(Color::from_u32(0x44112233), c);
    }

    #[test]
    fn test_operators_wrap() {
        let a = Color::rgba(250, 10, 128, 200);
        let b = Color::rgba(10, 20, 128, 9);
        assert_eq!(a + b, Color::rgba(4, 30, 0, 200));
        assert_eq!(a - b, Color::rgba(240, 246, 0, 200));
        assert_eq!(Color::rgb(200, 100, 3) * 2.0, Color::rgb(144, 200, 6));
        assert_eq!(Color::rgb(200, 100, 3) * 0.5, Color::rgb(100, 50, 1));

        let mut c = a;
        c += b;
        c -= b;
        assert_eq!(c, a);
        c *= 1.0;
        assert_eq!(c, a);
    }

    #[test]
    fn test_default_is_blank() {
        assert_eq!(Color::default(), Color::BLANK);
        assert_eq!(Color::from((1, 2, 3)), Color::rgba(1, 2, 3, 255));
    }
}
