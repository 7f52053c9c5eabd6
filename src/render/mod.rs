//! Software renderer
//!
//! Renders the whole frame on the CPU into a BGRA pixel buffer the host
//! uploads as a texture once per frame. Nothing here touches the window
//! system, so every pass can be exercised headless in tests.
//!
//! # Module Organization
//!
//! - `passes` - the 3D view: floor/ceiling cast, wall columns, sprites,
//!   weapon overlay
//! - `minimap` - top-down tile overview

pub mod minimap;
pub mod passes;

pub use minimap::draw_minimap;
pub use passes::draw_frame;

use crate::map::Color;

/// 3D view resolution.
pub const WIDTH: usize = 320;
pub const HEIGHT: usize = 200;

/// Minimap side length, pixels.
pub const MINIMAP_SIZE: usize = 96;

/// Framebuffer for software rendering.
///
/// Pixels are BGRA, 4 bytes each. `column_depth` holds the perpendicular
/// wall distance per screen column, written by the wall pass and read by
/// the sprite pass for occlusion.
pub struct Framebuffer {
    pub pixels: Vec<u8>,
    pub column_depth: Vec<f32>,
    pub width: usize,
    pub height: usize,
}

impl Framebuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            pixels: vec![0; width * height * 4],
            column_depth: vec![f32::MAX; width],
            width,
            height,
        }
    }

    pub fn clear(&mut self, color: Color) {
        let bytes = color.to_bgra();
        for px in self.pixels.chunks_exact_mut(4) {
            px.copy_from_slice(&bytes);
        }
        for depth in &mut self.column_depth {
            *depth = f32::MAX;
        }
    }

    /// Write one pixel. Out-of-bounds coordinates are ignored.
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        let idx = (y as usize * self.width + x as usize) * 4;
        self.pixels[idx..idx + 4].copy_from_slice(&color.to_bgra());
    }

    /// Fill an axis-aligned rectangle, clipped to the buffer.
    pub fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Color) {
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (x + w).min(self.width as i32);
        let y1 = (y + h).min(self.height as i32);
        let bytes = color.to_bgra();
        for py in y0..y1 {
            for px in x0..x1 {
                let idx = (py as usize * self.width + px as usize) * 4;
                self.pixels[idx..idx + 4].copy_from_slice(&bytes);
            }
        }
    }

    /// Read back one pixel as BGRA bytes (tests and debugging).
    pub fn pixel(&self, x: usize, y: usize) -> [u8; 4] {
        let idx = (y * self.width + x) * 4;
        [
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
            self.pixels[idx + 3],
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_fills_bgra() {
        let mut fb = Framebuffer::new(4, 4);
        fb.clear(Color::new(10, 20, 30));
        // BGRA ordering: blue first
        assert_eq!(fb.pixel(0, 0), [30, 20, 10, 255]);
        assert_eq!(fb.pixel(3, 3), [30, 20, 10, 255]);
        assert!(fb.column_depth.iter().all(|&d| d == f32::MAX));
    }

    #[test]
    fn test_set_pixel_ignores_out_of_bounds() {
        let mut fb = Framebuffer::new(4, 4);
        fb.set_pixel(-1, 0, Color::new(255, 0, 0));
        fb.set_pixel(0, 100, Color::new(255, 0, 0));
        fb.set_pixel(2, 2, Color::new(255, 0, 0));
        assert_eq!(fb.pixel(2, 2), [0, 0, 255, 255]);
        assert_eq!(fb.pixel(0, 0), [0, 0, 0, 0]);
    }

    #[test]
    fn test_fill_rect_clips() {
        let mut fb = Framebuffer::new(4, 4);
        fb.fill_rect(2, 2, 10, 10, Color::new(0, 255, 0));
        assert_eq!(fb.pixel(3, 3), [0, 255, 0, 255]);
        assert_eq!(fb.pixel(1, 1), [0, 0, 0, 0]);
    }
}
