//! Frame orchestration
//!
//! A frame drains pending debug commands, runs the relaxation loop, classifies
//! once, then hands the result to a presentation surface. Every pass inside
//! the loop is a full barrier: the dispatcher returns only after all units
//! have committed.

use super::boundary::resolve_boundaries;
use super::command::{DebugCommand, compress};
use super::diagnostics::{ClippingSummary, classify, summarize};
use super::overlap::{accumulate_overlaps, apply_displacements};
use super::state::SimulationState;
use crate::error::SimError;
use crate::renderer::{MappedPixels, PixelSurface, rasterize};

/// Stage of a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FramePhase {
    /// Repeated boundary / accumulate / apply
    Relaxation,
    /// One diagnostic pass
    Classify,
}

/// What a frame did
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    /// 1-based frame number
    pub frame: u64,
    pub iterations: u32,
    /// Debug commands drained before relaxation
    pub commands_run: usize,
    pub clipping_balls: usize,
    pub clipping_walls: usize,
    pub max_penetration: f32,
}

impl SimulationState {
    /// One relaxation iteration: boundary, accumulate, apply
    pub fn relax_once(&mut self) -> Result<(), SimError> {
        self.relax(1)
    }

    /// Run `iterations` relaxation iterations
    pub fn relax(&mut self, iterations: u32) -> Result<(), SimError> {
        self.ensure_synced()?;
        self.relax_passes(iterations);
        Ok(())
    }

    /// Recompute the diagnostic flags
    pub fn classify(&mut self) -> Result<(), SimError> {
        self.ensure_synced()?;
        self.classify_pass();
        Ok(())
    }

    /// Execute one debug command immediately
    pub fn run_command(&mut self, command: DebugCommand) -> Result<(), SimError> {
        self.ensure_synced()?;
        self.execute(command);
        Ok(())
    }

    /// Drain the command queue now and refresh the host view
    pub fn run_pending_commands(&mut self) -> Result<usize, SimError> {
        self.ensure_synced()?;
        let ran = self.drain_commands();
        self.store.pull();
        Ok(ran)
    }

    fn relax_passes(&mut self, iterations: u32) {
        log::trace!("{:?}: {} iterations", FramePhase::Relaxation, iterations);
        let max_u = self.max_u();
        let dispatcher = self.dispatcher;
        let params = self.overlap;
        for _ in 0..iterations {
            resolve_boundaries(&mut self.store, &dispatcher, max_u);
            accumulate_overlaps(&mut self.store, &dispatcher, &params);
            apply_displacements(&mut self.store, &dispatcher);
        }
    }

    fn classify_pass(&mut self) {
        log::trace!("{:?}", FramePhase::Classify);
        let dispatcher = self.dispatcher;
        let max_u = self.max_u();
        classify(&mut self.store, &dispatcher, max_u);
    }

    fn execute(&mut self, command: DebugCommand) {
        log::debug!("Running debug command {:?}", command);
        let dispatcher = self.dispatcher;
        let max_u = self.max_u();
        match command {
            DebugCommand::ResolveBoundaries => {
                resolve_boundaries(&mut self.store, &dispatcher, max_u);
            }
            DebugCommand::ResolveOverlaps => {
                let params = self.overlap;
                accumulate_overlaps(&mut self.store, &dispatcher, &params);
                apply_displacements(&mut self.store, &dispatcher);
            }
            DebugCommand::Compress { multiplier } => {
                compress(&mut self.store, &dispatcher, multiplier);
            }
        }
    }

    fn drain_commands(&mut self) -> usize {
        let mut ran = 0;
        while let Some(command) = self.commands.pop() {
            self.execute(command);
            ran += 1;
        }
        ran
    }

    fn ensure_synced(&self) -> Result<(), SimError> {
        if self.store.is_stale() {
            return Err(SimError::StaleMirror);
        }
        Ok(())
    }

    /// Physics for one frame: commands, relaxation, classification.
    ///
    /// The host view is refreshed before returning.
    pub fn advance(&mut self) -> Result<FrameReport, SimError> {
        self.ensure_synced()?;
        let commands_run = self.drain_commands();

        self.frame_parity = self.frame_parity.wrapping_add(1);
        let iterations = self.iterations_for_parity(self.frame_parity);
        self.relax_passes(iterations);
        self.classify_pass();
        self.frame += 1;

        let ClippingSummary {
            clipping_balls,
            clipping_walls,
            max_penetration,
        } = summarize(self.store.device());
        self.store.pull();

        let report = FrameReport {
            frame: self.frame,
            iterations,
            commands_run,
            clipping_balls,
            clipping_walls,
            max_penetration,
        };
        log::debug!("{:?}", report);
        Ok(report)
    }

    /// Rasterize the current records into `surface`.
    ///
    /// The buffer is released when this returns, whether or not drawing
    /// happened.
    pub fn present<S: PixelSurface + ?Sized>(&self, surface: &mut S) -> Result<(), SimError> {
        let mut mapped = MappedPixels::acquire(surface)?;
        let (width, height) = mapped.dimensions();
        rasterize(
            self.store.device(),
            mapped.pixels(),
            width,
            height,
            self.color_mode,
        );
        Ok(())
    }

    /// Advance, present, then apply the settle step if enabled.
    ///
    /// A surface failure skips drawing only; the physics of the frame has
    /// already been committed and the error is returned afterwards.
    pub fn step_frame<S: PixelSurface + ?Sized>(
        &mut self,
        surface: &mut S,
    ) -> Result<FrameReport, SimError> {
        let report = self.advance()?;

        let presented = self.present(surface);
        if let Err(err) = &presented {
            log::warn!("Frame {} not presented: {}", report.frame, err);
        }

        if self.settle_multiplier > 0.0 {
            let dispatcher = self.dispatcher;
            compress(&mut self.store, &dispatcher, self.settle_multiplier);
            self.store.pull();
        }

        presented.map(|()| report)
    }
}
