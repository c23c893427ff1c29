//! Relax Balls - data-parallel disk relaxation
//!
//! Core modules:
//! - `sim`: Deterministic relaxation pipeline (store, passes, frame orchestration)
//! - `renderer`: CPU rasterizer and presentation surfaces
//! - `settings`: Solver and viewport configuration
//! - `error`: Error type shared by the library

pub mod error;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use error::SimError;
pub use settings::{ColorMode, Settings};

/// Solver configuration constants
pub mod consts {
    /// Relaxation iterations per frame (odd frames run one extra)
    pub const BASE_ITERATIONS: u32 = 128;
    /// Damping applied to each pairwise correction
    pub const RELAXATION_FACTOR: f32 = 0.55;
    /// Centers closer than this are treated as coincident and skipped
    pub const OVERLAP_EPSILON: f32 = 1e-5;

    /// Work units per workgroup for ball passes
    pub const WORKGROUP_SIZE: usize = 256;

    /// Ball defaults
    pub const BALL_COUNT: usize = 400;
    pub const BALL_RADIUS: f32 = 0.04;

    /// Vertical offset removed by one unit of debug compression
    pub const COMPRESS_STEP: f32 = 0.005;
    /// Multiplier used by the debug panel's compress trigger
    pub const DEBUG_COMPRESS_MULTIPLIER: f32 = 5.0;

    /// Viewport defaults
    pub const VIEWPORT_WIDTH: u32 = 1280;
    pub const VIEWPORT_HEIGHT: u32 = 720;
}

/// Aspect-corrected half-width of the viewport in simulation units.
///
/// The vertical extent is always `[-1, 1]`, so the horizontal extent is
/// `[-max_u, max_u]` with `max_u = width / height`.
#[inline]
pub fn aspect_half_width(width: u32, height: u32) -> f32 {
    width as f32 / height as f32
}

/// Map a pixel coordinate to simulation space `(u, v)`
#[inline]
pub fn pixel_to_sim(x: u32, y: u32, width: u32, height: u32) -> glam::Vec2 {
    let u = ((x as f32 / width as f32) * 2.0 - 1.0) * aspect_half_width(width, height);
    let v = (y as f32 / height as f32) * 2.0 - 1.0;
    glam::Vec2::new(u, v)
}
