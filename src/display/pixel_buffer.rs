use std::path::Path;

use super::{DEFAULT_HEIGHT, DEFAULT_WIDTH};
use crate::color::Color;
use crate::error::{Error, Result};

// ============================================================================
// PixelBuffer
// ============================================================================

/// Row-major RGBA pixel array for software rendering.
///
/// Sprites, the font sheet and the frame buffer itself are all `PixelBuffer`s.
/// Access is bounds checked everywhere: reads outside the buffer yield
/// `Color::BLANK`, writes outside it are dropped. No blending happens here;
/// that is the canvas's job.
#[derive(Debug, Clone)]
pub struct PixelBuffer {
    pixels: Vec<Color>,
    width: u32,
    height: u32,
    locked: bool,
    dirty: bool,
}

impl PixelBuffer {
    /// Create a blank buffer with the default frame resolution
    pub fn new() -> Self {
        Self::with_size(DEFAULT_WIDTH, DEFAULT_HEIGHT)
    }

    /// Create a blank (fully transparent) buffer
    pub fn with_size(width: u32, height: u32) -> Self {
        Self::filled(width, height, Color::BLANK)
    }

    /// Create a buffer with every pixel set to `color`.
    ///
    /// A size whose pixel count doesn't fit in memory indices yields an
    /// empty 0x0 buffer.
    pub fn filled(width: u32, height: u32, color: Color) -> Self {
        let Some(len) = pixel_count(width, height) else {
            log::error!("{}x{} buffer is too large, using 0x0", width, height);
            return Self::filled(0, 0, color);
        };
        Self {
            pixels: vec![color; len],
            width,
            height,
            locked: false,
            dirty: true,
        }
    }

    /// Wrap an existing pixel array. `None` if the length doesn't match.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<Color>) -> Option<Self> {
        if pixel_count(width, height) != Some(pixels.len()) {
            return None;
        }
        Some(Self {
            pixels,
            width,
            height,
            locked: false,
            dirty: true,
        })
    }

    /// Decode an image file at its native resolution
    pub fn try_load(path: impl AsRef<Path>) -> Result<Self> {
        let image = image::open(path.as_ref())?.to_rgba8();
        let (width, height) = image.dimensions();
        // to_rgba8 always yields exactly 4 bytes per pixel
        let pixels = bytemuck::cast_slice::<u8, Color>(image.as_raw()).to_vec();
        Ok(Self {
            pixels,
            width,
            height,
            locked: false,
            dirty: true,
        })
    }

    /// Decode an image file, falling back to an empty 0x0 buffer.
    ///
    /// A missing sprite should cost a blank texture, not the frame loop, so the
    /// failure is logged and swallowed. Use `try_load` to handle it yourself.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::try_load(path) {
            Ok(buffer) => buffer,
            Err(e) => {
                log::error!("failed to load {}: {}", path.display(), e);
                Self::with_size(0, 0)
            },
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Check if coordinates are within bounds
    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0
            && y >= 0
            && i64::from(x) < i64::from(self.width)
            && i64::from(y) < i64::from(self.height)
    }

    /// Index into the pixel array for (x, y); caller has bounds-checked
    #[inline]
    fn pixel_index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    // ========================================================================
    // Pixel Access
    // ========================================================================

    /// Read a pixel; `Color::BLANK` outside the buffer
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> Color {
        if self.in_bounds(x, y) {
            self.pixels[self.pixel_index(x as u32, y as u32)]
        } else {
            Color::BLANK
        }
    }

    /// Overwrite a pixel. Dropped if out of bounds or locked.
    #[inline]
    pub fn set(&mut self, x: i32, y: i32, color: Color) {
        if self.locked || !self.in_bounds(x, y) {
            return;
        }
        let idx = self.pixel_index(x as u32, y as u32);
        self.pixels[idx] = color;
        self.dirty = true;
    }

    /// Fill every pixel. No-op while locked.
    pub fn clear(&mut self, color: Color) {
        if self.locked {
            return;
        }
        self.pixels.fill(color);
        self.dirty = true;
    }

    /// Nearest-neighbour sample with normalized coordinates, clamped to the edges
    pub fn sample(&self, u: f32, v: f32) -> Color {
        if self.is_empty() {
            return Color::BLANK;
        }
        let x = ((u * self.width as f32) as i32).clamp(0, self.width as i32 - 1);
        let y = ((v * self.height as f32) as i32).clamp(0, self.height as i32 - 1);
        self.get(x, y)
    }

    // ========================================================================
    // Write Protection
    // ========================================================================

    /// Make the buffer read-only until `unlock`. Reads are unaffected.
    pub fn lock(&mut self) {
        self.locked = true;
    }

    pub fn unlock(&mut self) {
        self.locked = false;
    }

    #[inline]
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    // ========================================================================
    // Buffer Operations
    // ========================================================================

    /// Copy every pixel into `other`, which must have the same dimensions.
    ///
    /// A locked destination is left untouched.
    pub fn copy_to(&self, other: &mut PixelBuffer) -> Result<()> {
        if self.width != other.width || self.height != other.height {
            return Err(Error::SizeMismatch {
                expected: (self.width, self.height),
                found: (other.width, other.height),
            });
        }
        if other.locked {
            log::warn!(
                "skipping copy into locked {}x{} buffer",
                other.width,
                other.height
            );
            return Ok(());
        }
        other.pixels.copy_from_slice(&self.pixels);
        other.dirty = true;
        Ok(())
    }

    /// Copy out a sub-rectangle. `None` unless it lies entirely inside this buffer.
    pub fn slice(&self, x0: i32, y0: i32, w: u32, h: u32) -> Option<PixelBuffer> {
        if w == 0 || h == 0 || x0 < 0 || y0 < 0 {
            return None;
        }
        let (x0, y0) = (x0 as u32, y0 as u32);
        let outside = |origin: u32, len: u32, extent: u32| {
            origin.checked_add(len).map_or(true, |end| end > extent)
        };
        if outside(x0, w, self.width) || outside(y0, h, self.height) {
            return None;
        }

        let mut pixels = Vec::with_capacity(w as usize * h as usize);
        for y in y0..y0 + h {
            let start = self.pixel_index(x0, y);
            pixels.extend_from_slice(&self.pixels[start..start + w as usize]);
        }
        Self::from_pixels(w, h, pixels)
    }

    // ========================================================================
    // Upload Interface
    // ========================================================================

    /// Pixel array in row-major order
    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    /// Direct pixel access for bulk effects. `None` while locked.
    pub fn pixels_mut(&mut self) -> Option<&mut [Color]> {
        if self.locked {
            return None;
        }
        self.dirty = true;
        Some(&mut self.pixels)
    }

    /// Raw bytes (R, G, B, A per pixel) for texture upload
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Flag the buffer as needing re-upload
    pub fn refresh(&mut self) {
        self.dirty = true;
    }

    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Report whether the buffer changed since the last call, and reset the flag
    pub fn take_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }
}

/// `width * height` in `usize`, `None` on overflow
fn pixel_count(width: u32, height: u32) -> Option<usize> {
    (width as usize).checked_mul(height as usize)
}

impl Default for PixelBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_round_trip() {
        let mut buf = PixelBuffer::with_size(8, 6);
        let c = Color::rgba(1, 2, 3, 4);
        for y in 0..6 {
            for x in 0..8 {
                buf.set(x, y, c);
                assert_eq!(buf.get(x, y), c);
            }
        }
    }

    #[test]
    fn test_out_of_bounds_is_ignored() {
        let mut buf = PixelBuffer::filled(4, 4, Color::RED);
        let before = buf.pixels().to_vec();
        for &(x, y) in &[(-1, 0), (0, -1), (4, 0), (0, 4), (i32::MIN, i32::MAX)] {
            assert_eq!(buf.get(x, y), Color::BLANK);
            buf.set(x, y, Color::GREEN);
        }
        assert_eq!(buf.pixels(), &before[..]);
    }

    #[test]
    fn test_lock_blocks_writes_not_reads() {
        let mut buf = PixelBuffer::filled(2, 2, Color::BLUE);
        buf.lock();
        buf.set(0, 0, Color::RED);
        buf.clear(Color::RED);
        assert!(buf.pixels_mut().is_none());
        assert_eq!(buf.get(0, 0), Color::BLUE);
        assert_eq!(buf.get(1, 1), Color::BLUE);

        buf.unlock();
        buf.set(0, 0, Color::RED);
        assert_eq!(buf.get(0, 0), Color::RED);
    }

    #[test]
    fn test_clear_then_slice() {
        let mut buf = PixelBuffer::with_size(4, 4);
        buf.clear(Color::WHITE);

        let inner = buf.slice(1, 1, 2, 2).expect("slice inside bounds");
        assert_eq!(inner.width(), 2);
        assert_eq!(inner.height(), 2);
        assert!(inner.pixels().iter().all(|&c| c == Color::WHITE));

        assert!(buf.slice(3, 3, 2, 2).is_none());
        assert!(buf.slice(-1, 0, 2, 2).is_none());
        assert!(buf.slice(0, 0, 0, 2).is_none());
    }

    #[test]
    fn test_slice_preserves_layout() {
        let mut buf = PixelBuffer::with_size(3, 3);
        for y in 0..3 {
            for x in 0..3 {
                buf.set(x, y, Color::rgb(x as u8, y as u8, 0));
            }
        }
        let s = buf.slice(1, 0, 2, 3).expect("slice inside bounds");
        assert_eq!(s.get(0, 0), Color::rgb(1, 0, 0));
        assert_eq!(s.get(1, 2), Color::rgb(2, 2, 0));
    }

    #[test]
    fn test_copy_to() {
        let src = PixelBuffer::filled(3, 2, Color::CYAN);
        let mut dst = PixelBuffer::with_size(3, 2);
        src.copy_to(&mut dst).expect("same size");
        assert_eq!(dst.pixels(), src.pixels());
    }

    #[test]
    fn test_copy_to_size_mismatch() {
        let src = PixelBuffer::filled(3, 2, Color::CYAN);
        let mut dst = PixelBuffer::with_size(2, 3);
        let err = src.copy_to(&mut dst).unwrap_err();
        assert!(matches!(
            err,
            Error::SizeMismatch {
                expected: (3, 2),
                found: (2, 3)
            }
        ));
        assert!(dst.pixels().iter().all(|&c| c == Color::BLANK));
    }

    #[test_log::test]
    fn test_copy_to_locked_destination_is_noop() {
        let src = PixelBuffer::filled(2, 2, Color::CYAN);
        let mut dst = PixelBuffer::with_size(2, 2);
        dst.lock();
        assert!(src.copy_to(&mut dst).is_ok());
        assert_eq!(dst.get(0, 0), Color::BLANK);
    }

    #[test]
    fn test_from_pixels_checks_length() {
        assert!(PixelBuffer::from_pixels(2, 2, vec![Color::RED; 3]).is_none());
        let buf = PixelBuffer::from_pixels(2, 2, vec![Color::RED; 4]).expect("length matches");
        assert_eq!(buf.get(1, 1), Color::RED);
    }

    #[test]
    fn test_as_bytes_is_rgba() {
        let mut buf = PixelBuffer::with_size(2, 1);
        buf.set(1, 0, Color::rgba(10, 20, 30, 40));
        assert_eq!(buf.as_bytes(), &[0, 0, 0, 0, 10, 20, 30, 40]);
    }

    #[test]
    fn test_dirty_tracking() {
        let mut buf = PixelBuffer::with_size(2, 2);
        assert!(buf.take_dirty());
        assert!(!buf.take_dirty());

        buf.set(5, 5, Color::RED);
        assert!(!buf.is_dirty());
        buf.set(0, 0, Color::RED);
        assert!(buf.take_dirty());

        buf.lock();
        buf.clear(Color::WHITE);
        assert!(!buf.is_dirty());
        buf.unlock();

        buf.refresh();
        assert!(buf.take_dirty());
    }

    #[test]
    fn test_sample_clamps() {
        let mut buf = PixelBuffer::with_size(2, 2);
        buf.set(0, 0, Color::RED);
        buf.set(1, 1, Color::BLUE);
        assert_eq!(buf.sample(0.0, 0.0), Color::RED);
        assert_eq!(buf.sample(0.99, 0.99), Color::BLUE);
        assert_eq!(buf.sample(5.0, 5.0), Color::BLUE);
        assert_eq!(buf.sample(-3.0, -3.0), Color::RED);
        assert_eq!(PixelBuffer::with_size(0, 0).sample(0.5, 0.5), Color::BLANK);
    }

    #[test_log::test]
    fn test_load_missing_file_yields_empty_buffer() {
        let buf = PixelBuffer::load("definitely/not/here.png");
        assert!(buf.is_empty());
        assert_eq!(buf.width(), 0);
        assert_eq!(buf.get(0, 0), Color::BLANK);
        assert!(PixelBuffer::try_load("definitely/not/here.png").is_err());
    }

    #[test]
    fn test_load_round_trips_png() {
        let path = std::env::temp_dir().join(format!("pixelforge-load-{}.png", std::process::id()));
        let mut img = image::RgbaImage::new(3, 2);
        img.put_pixel(2, 1, image::Rgba([9, 8, 7, 6]));
        img.save(&path).expect("write temp png");

        let buf = PixelBuffer::try_load(&path).expect("decode temp png");
        let _ = std::fs::remove_file(&path);

        assert_eq!((buf.width(), buf.height()), (3, 2));
        assert_eq!(buf.pixels().len(), 6);
        assert!(buf.is_dirty() && !buf.is_locked());
        assert_eq!(buf.get(2, 1), Color::rgba(9, 8, 7, 6));
        assert_eq!(buf.get(0, 0), Color::BLANK);
    }

    #[test]
    fn test_slice_rejects_overflowing_extents() {
        let buf = PixelBuffer::with_size(4, 4);
        assert!(buf.slice(1, 0, u32::MAX, 1).is_none());
        assert!(buf.slice(0, 3, 1, u32::MAX).is_none());
        assert!(buf.slice(i32::MAX, 0, 2, 1).is_none());
        assert!(buf.slice(3, 3, 1, 1).is_some());
    }

    #[test]
    fn test_pixel_count_does_not_wrap() {
        // 65536 * 65536 is zero in u32 arithmetic
        assert!(PixelBuffer::from_pixels(65536, 65536, Vec::new()).is_none());
        assert!(PixelBuffer::from_pixels(0, 65536, Vec::new()).is_some());
    }
}
