//! Simulation state
//!
//! Everything a frame needs, constructed explicitly and passed by reference.
//! There is no process-wide instance.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::ball::{Ball, Rgba8};
use super::command::{CommandQueue, DebugCommand};
use super::dispatch::Dispatcher;
use super::overlap::OverlapParams;
use super::store::BallStore;
use crate::error::SimError;
use crate::settings::{ColorMode, Settings};

/// Output size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// Store, viewport and solver parameters for one simulation
#[derive(Debug, Clone)]
pub struct SimulationState {
    pub(crate) store: BallStore,
    pub(crate) commands: CommandQueue,
    viewport: Viewport,
    /// Aspect-corrected half-width, fixed at construction
    max_u: f32,
    /// Incremented once per frame; odd frames run one extra iteration
    pub(crate) frame_parity: u32,
    pub(crate) frame: u64,
    pub(crate) base_iterations: u32,
    pub(crate) overlap: OverlapParams,
    pub(crate) settle_multiplier: f32,
    pub(crate) color_mode: ColorMode,
    pub(crate) dispatcher: Dispatcher,
}

impl SimulationState {
    /// Place `settings.ball_count` balls uniformly at random and push them
    /// to the compute mirror.
    pub fn new(settings: &Settings) -> Result<Self, SimError> {
        settings.validate()?;
        let max_u = settings.max_u();
        let mut rng = Pcg32::seed_from_u64(settings.seed);

        let balls = (0..settings.ball_count)
            .map(|_| {
                let color = Rgba8::opaque(
                    rng.random_range(0..255),
                    rng.random_range(0..255),
                    rng.random_range(0..255),
                );
                let position = Vec2::new(
                    rng.random_range(-max_u..=max_u),
                    rng.random_range(-1.0..=1.0),
                );
                Ball::new(position, settings.ball_radius).with_color(color)
            })
            .collect();

        let state = Self::from_balls(settings, balls)?;
        log::info!(
            "Initialized {} balls (radius {}) in {}x{} viewport, max_u = {:.4}",
            settings.ball_count,
            settings.ball_radius,
            settings.width,
            settings.height,
            max_u
        );
        Ok(state)
    }

    /// Build a state around an explicit population and push it once
    pub fn from_balls(settings: &Settings, balls: Vec<Ball>) -> Result<Self, SimError> {
        settings.validate()?;
        if let Some((i, ball)) = balls
            .iter()
            .enumerate()
            .find(|(_, b)| !(b.radius.is_finite() && b.radius > 0.0))
        {
            return Err(SimError::InvalidSettings(format!(
                "ball {i} has non-positive radius {}",
                ball.radius
            )));
        }

        let mut store = BallStore::new(balls);
        store.push();

        Ok(Self {
            store,
            commands: CommandQueue::default(),
            viewport: Viewport {
                width: settings.width,
                height: settings.height,
            },
            max_u: settings.max_u(),
            frame_parity: 0,
            frame: 0,
            base_iterations: settings.base_iterations,
            overlap: OverlapParams {
                relaxation_factor: settings.relaxation_factor,
                epsilon: settings.overlap_epsilon,
            },
            settle_multiplier: settings.settle_multiplier,
            color_mode: settings.color_mode,
            dispatcher: Dispatcher::new(settings.workgroup_size),
        })
    }

    pub fn store(&self) -> &BallStore {
        &self.store
    }

    /// Host edits through the returned store must be pushed before the next frame
    pub fn store_mut(&mut self) -> &mut BallStore {
        &mut self.store
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn max_u(&self) -> f32 {
        self.max_u
    }

    pub fn frame_parity(&self) -> u32 {
        self.frame_parity
    }

    /// Frames completed so far
    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    pub fn overlap_params(&self) -> &OverlapParams {
        &self.overlap
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn color_mode(&self) -> ColorMode {
        self.color_mode
    }

    /// Relaxation iterations a frame runs at the given parity
    pub fn iterations_for_parity(&self, parity: u32) -> u32 {
        self.base_iterations + parity % 2
    }

    /// Queue a debug command for the next drain
    pub fn enqueue(&mut self, command: DebugCommand) {
        log::trace!("Queued debug command {}", command.name());
        self.commands.push(command);
    }

    pub fn pending_commands(&self) -> usize {
        self.commands.len()
    }
}
