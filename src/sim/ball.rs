//! Ball records
//!
//! `Ball` is the host-side view, `GpuBall` the compute-resident layout the
//! passes run on. Both carry the same fields; conversion is lossless.

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

/// An opaque-by-default RGBA8 color
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Pack into a u32 with red in the low byte
    #[inline]
    pub fn to_packed(self) -> u32 {
        u32::from_le_bytes([self.r, self.g, self.b, self.a])
    }

    #[inline]
    pub fn from_packed(packed: u32) -> Self {
        let [r, g, b, a] = packed.to_le_bytes();
        Self { r, g, b, a }
    }
}

impl Default for Rgba8 {
    fn default() -> Self {
        Self::opaque(255, 255, 255)
    }
}

/// A simulated disk (host view)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ball {
    pub position: Vec2,
    /// Scratch correction, rewritten by every overlap pass
    pub displacement: Vec2,
    pub radius: f32,
    pub color: Rgba8,
    /// Scratch count of overlapping neighbors, rewritten by every overlap pass
    pub neighbor_overlap_count: u32,
    /// Diagnostic only, set by the classifier
    pub is_clipping_ball: bool,
    /// Diagnostic only, set by the classifier
    pub is_clipping_wall: bool,
}

impl Ball {
    pub fn new(position: Vec2, radius: f32) -> Self {
        Self {
            position,
            displacement: Vec2::ZERO,
            radius,
            color: Rgba8::default(),
            neighbor_overlap_count: 0,
            is_clipping_ball: false,
            is_clipping_wall: false,
        }
    }

    pub fn with_color(mut self, color: Rgba8) -> Self {
        self.color = color;
        self
    }
}

/// Flag bit: ball overlaps or touches another ball
pub const FLAG_CLIPPING_BALL: u32 = 1 << 0;
/// Flag bit: ball crosses a viewport edge
pub const FLAG_CLIPPING_WALL: u32 = 1 << 1;

/// Compute-resident ball record (32 bytes, no padding)
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct GpuBall {
    pub position: Vec2,
    pub displacement: Vec2,
    pub radius: f32,
    /// Packed RGBA8
    pub color: u32,
    pub neighbor_overlap_count: u32,
    /// `FLAG_CLIPPING_BALL | FLAG_CLIPPING_WALL`
    pub flags: u32,
}

impl GpuBall {
    #[inline]
    pub fn is_clipping_ball(&self) -> bool {
        self.flags & FLAG_CLIPPING_BALL != 0
    }

    #[inline]
    pub fn is_clipping_wall(&self) -> bool {
        self.flags & FLAG_CLIPPING_WALL != 0
    }

    #[inline]
    pub fn set_flag(&mut self, flag: u32, on: bool) {
        if on {
            self.flags |= flag;
        } else {
            self.flags &= !flag;
        }
    }
}

impl From<&Ball> for GpuBall {
    fn from(ball: &Ball) -> Self {
        let mut flags = 0;
        if ball.is_clipping_ball {
            flags |= FLAG_CLIPPING_BALL;
        }
        if ball.is_clipping_wall {
            flags |= FLAG_CLIPPING_WALL;
        }
        Self {
            position: ball.position,
            displacement: ball.displacement,
            radius: ball.radius,
            color: ball.color.to_packed(),
            neighbor_overlap_count: ball.neighbor_overlap_count,
            flags,
        }
    }
}

impl From<&GpuBall> for Ball {
    fn from(gpu: &GpuBall) -> Self {
        Self {
            position: gpu.position,
            displacement: gpu.displacement,
            radius: gpu.radius,
            color: Rgba8::from_packed(gpu.color),
            neighbor_overlap_count: gpu.neighbor_overlap_count,
            is_clipping_ball: gpu.is_clipping_ball(),
            is_clipping_wall: gpu.is_clipping_wall(),
        }
    }
}
