//! Ball store: the host view and its compute-resident mirror
//!
//! The mirror is authoritative while passes run. The host view is refreshed
//! from it with [`BallStore::pull`]; edits made through
//! [`BallStore::host_mut`] mark the mirror stale until [`BallStore::push`].

use super::ball::{Ball, GpuBall};
use super::dispatch::PassBuffers;

#[derive(Debug, Clone, Default)]
pub struct BallStore {
    host: Vec<Ball>,
    device: PassBuffers,
    stale: bool,
}

impl BallStore {
    /// Create a store from host records. Nothing is mirrored until `push`.
    pub fn new(balls: Vec<Ball>) -> Self {
        debug_assert!(balls.iter().all(|b| b.radius > 0.0));
        Self {
            host: balls,
            device: PassBuffers::default(),
            stale: true,
        }
    }

    pub fn len(&self) -> usize {
        self.host.len()
    }

    pub fn is_empty(&self) -> bool {
        self.host.is_empty()
    }

    /// Host view, as of the last `pull` (or host edit)
    pub fn host(&self) -> &[Ball] {
        &self.host
    }

    /// Mutable host view. Marks the mirror stale.
    pub fn host_mut(&mut self) -> &mut [Ball] {
        self.stale = true;
        &mut self.host
    }

    /// True when host edits have not been pushed
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// Copy the host view into the compute mirror
    pub fn push(&mut self) {
        let records: Vec<GpuBall> = self.host.iter().map(GpuBall::from).collect();
        self.device.upload(&records);
        self.stale = false;
        log::trace!(
            "Pushed {} balls ({} bytes) to compute mirror",
            records.len(),
            self.device.as_bytes().len()
        );
    }

    /// Copy the compute mirror back into the host view
    pub fn pull(&mut self) {
        if self.stale {
            log::warn!("Pulling over unpushed host edits; they are discarded");
        }
        self.host.clear();
        self.host
            .extend(self.device.current().iter().map(Ball::from));
        self.stale = false;
    }

    /// Compute-resident records as of the last committed pass
    pub fn device(&self) -> &[GpuBall] {
        self.device.current()
    }

    pub(crate) fn buffers_mut(&mut self) -> &mut PassBuffers {
        &mut self.device
    }
}
