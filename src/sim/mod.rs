//! Deterministic relaxation module
//!
//! All physics lives here. This module must be pure and deterministic:
//! - Fixed iteration counts only
//! - Seeded RNG only
//! - Passes read a snapshot and write only their own record
//! - No rendering dependencies inside the passes

pub mod ball;
pub mod boundary;
pub mod command;
pub mod diagnostics;
pub mod dispatch;
pub mod frame;
pub mod overlap;
pub mod state;
pub mod store;

pub use ball::{Ball, GpuBall, Rgba8};
pub use boundary::{clamp_to_bounds, is_clipping_walls, resolve_boundaries};
pub use command::{CommandQueue, DebugCommand};
pub use diagnostics::{ClippingSummary, classify, summarize};
pub use dispatch::{Dispatcher, PassBuffers};
pub use frame::{FramePhase, FrameReport};
pub use overlap::{OverlapParams, accumulate_overlaps, apply_displacements, pair_correction};
pub use state::{SimulationState, Viewport};
pub use store::BallStore;
