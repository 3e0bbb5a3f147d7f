//! In-memory framebuffer surface.
//!
//! Backs the headless binary and the test suite. A production build replaces
//! this with a windowed surface (e.g. a softbuffer/pixels-backed window) that
//! implements the same [`RenderSurface`] trait.

use std::sync::Mutex;

use super::{RenderSurface, SurfaceRect};

/// A surface whose framebuffer lives in a plain `Vec<u8>`.
///
/// Blits are clipped to the framebuffer bounds; rows or columns of a block
/// that fall outside are dropped, matching what a real canvas does with
/// out-of-range image data.
pub struct FramebufferSurface {
    width: u32,
    height: u32,
    rect: SurfaceRect,
    /// RGBA pixels, row-major, `width * height * 4` bytes.
    pixels: Mutex<Vec<u8>>,
    blit_count: Mutex<usize>,
}

impl FramebufferSurface {
    /// Creates a surface displayed 1:1 at the device origin, so input
    /// coordinates map through unchanged.
    pub fn new(width: u32, height: u32) -> FramebufferSurface {
        Self::with_rect(
            width,
            height,
            SurfaceRect {
                left: 0.0,
                top: 0.0,
                width: f64::from(width),
                height: f64::from(height),
            },
        )
    }

    /// Creates a surface with an explicit on-screen rectangle, for exercising
    /// scaled and offset viewport mappings.
    pub fn with_rect(width: u32, height: u32, rect: SurfaceRect) -> FramebufferSurface {
        FramebufferSurface {
            width,
            height,
            rect,
            pixels: Mutex::new(vec![0; width as usize * height as usize * 4]),
            blit_count: Mutex::new(0),
        }
    }

    /// Returns the RGBA value at `(x, y)`, or opaque black-transparent zeroes
    /// for out-of-range coordinates.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        if x >= self.width || y >= self.height {
            return [0; 4];
        }
        let offset = (y as usize * self.width as usize + x as usize) * 4;
        let pixels = self.pixels.lock().expect("lock poisoned");
        pixels[offset..offset + 4]
            .try_into()
            .expect("4-byte pixel slice")
    }

    /// Number of blits painted so far.
    pub fn blit_count(&self) -> usize {
        *self.blit_count.lock().expect("lock poisoned")
    }
}

impl RenderSurface for FramebufferSurface {
    fn logical_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn bounding_rect(&self) -> SurfaceRect {
        self.rect
    }

    fn blit(&self, x: u32, y: u32, width: u32, height: u32, pixels: &[u8]) {
        let mut framebuffer = self.pixels.lock().expect("lock poisoned");
        for row in 0..height {
            let dest_y = y as u64 + u64::from(row);
            if dest_y >= u64::from(self.height) {
                break;
            }
            let copy_width = if x >= self.width {
                0
            } else {
                width.min(self.width - x)
            } as usize;
            if copy_width == 0 {
                continue;
            }
            let src_start = (row as usize * width as usize) * 4;
            let dest_start = (dest_y as usize * self.width as usize + x as usize) * 4;
            framebuffer[dest_start..dest_start + copy_width * 4]
                .copy_from_slice(&pixels[src_start..src_start + copy_width * 4]);
        }
        *self.blit_count.lock().expect("lock poisoned") += 1;
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
