//! Presentation surfaces
//!
//! A surface owns a `width * height` RGBA8 buffer that is only writable while
//! mapped. [`MappedPixels`] maps on construction and unmaps on drop, so the
//! buffer is released even when rasterization bails out early.

use std::io::Write;

use crate::error::SimError;
use crate::sim::Rgba8;

/// External pixel buffer the frame is rasterized into
pub trait PixelSurface {
    /// Buffer size in pixels
    fn dimensions(&self) -> (u32, u32);

    /// Acquire the buffer for writing
    fn map(&mut self) -> Result<(), SimError>;

    /// The mapped buffer. Only called between a successful `map` and `unmap`.
    fn mapped_pixels(&mut self) -> &mut [Rgba8];

    /// Release the buffer
    fn unmap(&mut self);
}

/// Scoped acquisition of a surface's pixels
pub struct MappedPixels<'a, S: PixelSurface + ?Sized> {
    surface: &'a mut S,
}

impl<'a, S: PixelSurface + ?Sized> MappedPixels<'a, S> {
    /// Map `surface` and check the buffer matches its dimensions
    pub fn acquire(surface: &'a mut S) -> Result<Self, SimError> {
        surface.map()?;
        let mut mapped = Self { surface };
        let (width, height) = mapped.dimensions();
        let expected = width as usize * height as usize;
        let actual = mapped.pixels().len();
        if actual != expected {
            // `mapped` drops here and unmaps
            return Err(SimError::Surface(format!(
                "mapped {actual} pixels, expected {width}x{height} = {expected}"
            )));
        }
        Ok(mapped)
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.surface.dimensions()
    }

    pub fn pixels(&mut self) -> &mut [Rgba8] {
        self.surface.mapped_pixels()
    }
}

impl<S: PixelSurface + ?Sized> Drop for MappedPixels<'_, S> {
    fn drop(&mut self) {
        self.surface.unmap();
    }
}

/// Row-major buffer index, computed in `usize`
#[inline]
fn pixel_index(x: u32, y: u32, width: u32) -> usize {
    y as usize * width as usize + x as usize
}

/// In-memory surface, used headless and in tests
#[derive(Debug, Clone)]
pub struct HostSurface {
    width: u32,
    height: u32,
    pixels: Vec<Rgba8>,
    mapped: bool,
    map_count: u64,
    unmap_count: u64,
}

impl HostSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Rgba8::new(0, 0, 0, 0); width as usize * height as usize],
            mapped: false,
            map_count: 0,
            unmap_count: 0,
        }
    }

    /// Pixel rows, row 0 at `v = -1`
    pub fn pixels(&self) -> &[Rgba8] {
        &self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get(pixel_index(x, y, self.width)).copied()
    }

    pub fn is_mapped(&self) -> bool {
        self.mapped
    }

    /// (maps, unmaps) since creation
    pub fn map_counts(&self) -> (u64, u64) {
        (self.map_count, self.unmap_count)
    }

    /// Write the buffer as a binary PPM, top row first
    pub fn write_ppm<W: Write>(&self, mut writer: W) -> Result<(), SimError> {
        write!(writer, "P6\n{} {}\n255\n", self.width, self.height)?;
        let width = self.width as usize;
        let mut row_bytes = Vec::with_capacity(width * 3);
        // Buffer rows grow upward (v = -1 first); PPM rows grow downward.
        for row in self.pixels.chunks_exact(width.max(1)).rev() {
            row_bytes.clear();
            for px in row {
                row_bytes.extend_from_slice(&[px.r, px.g, px.b]);
            }
            writer.write_all(&row_bytes)?;
        }
        writer.flush()?;
        Ok(())
    }
}

impl PixelSurface for HostSurface {
    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn map(&mut self) -> Result<(), SimError> {
        if self.mapped {
            return Err(SimError::Surface("buffer is already mapped".to_string()));
        }
        self.mapped = true;
        self.map_count += 1;
        Ok(())
    }

    fn mapped_pixels(&mut self) -> &mut [Rgba8] {
        debug_assert!(self.mapped, "pixels accessed while unmapped");
        &mut self.pixels
    }

    fn unmap(&mut self) {
        if self.mapped {
            self.mapped = false;
            self.unmap_count += 1;
        }
    }
}
