//! Single-shot debug commands
//!
//! Commands are queued from a control surface and drained by the frame
//! orchestrator between frames, independently of the relaxation loop.

use std::collections::VecDeque;

use super::ball::GpuBall;
use super::dispatch::Dispatcher;
use super::store::BallStore;
use crate::consts::COMPRESS_STEP;

/// One pass (or pass pair) to run once
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DebugCommand {
    /// One boundary pass
    ResolveBoundaries,
    /// One accumulation pass followed by one application pass
    ResolveOverlaps,
    /// Shift every ball down by `COMPRESS_STEP * multiplier`
    Compress { multiplier: f32 },
}

impl DebugCommand {
    pub fn name(&self) -> &'static str {
        match self {
            DebugCommand::ResolveBoundaries => "resolve-boundaries",
            DebugCommand::ResolveOverlaps => "resolve-overlaps",
            DebugCommand::Compress { .. } => "compress",
        }
    }
}

/// FIFO of pending commands
#[derive(Debug, Clone, Default)]
pub struct CommandQueue {
    pending: VecDeque<DebugCommand>,
}

impl CommandQueue {
    pub fn push(&mut self, command: DebugCommand) {
        self.pending.push_back(command);
    }

    pub fn pop(&mut self) -> Option<DebugCommand> {
        self.pending.pop_front()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

/// Kernel: lower record `index` by `offset`
#[inline]
pub fn compress_kernel(index: usize, snapshot: &[GpuBall], offset: f32) -> GpuBall {
    let mut ball = snapshot[index];
    ball.position.y -= offset;
    ball
}

/// Run the compress pass
pub fn compress(store: &mut BallStore, dispatcher: &Dispatcher, multiplier: f32) {
    let offset = COMPRESS_STEP * multiplier;
    dispatcher.launch(store.buffers_mut(), |index, snapshot| {
        compress_kernel(index, snapshot, offset)
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::ball::Ball;
    use glam::Vec2;

    #[test]
    fn test_queue_is_fifo() {
        let mut queue = CommandQueue::default();
        queue.push(DebugCommand::Compress { multiplier: 5.0 });
        queue.push(DebugCommand::ResolveBoundaries);
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.pop(), Some(DebugCommand::Compress { multiplier: 5.0 }));
        assert_eq!(queue.pop(), Some(DebugCommand::ResolveBoundaries));
        assert!(queue.pop().is_none());
        assert!(queue.is_empty());
    }

    #[test]
    fn test_compress_kernel_only_moves_down() {
        let ball = GpuBall::from(&Ball::new(Vec2::new(0.3, 0.5), 0.1));
        let out = compress_kernel(0, &[ball], COMPRESS_STEP * 5.0);
        assert_eq!(out.position.x, 0.3);
        assert!((out.position.y - 0.475).abs() < 1e-6);
    }

    #[test]
    fn test_command_names() {
        assert_eq!(DebugCommand::ResolveOverlaps.name(), "resolve-overlaps");
        assert_eq!(DebugCommand::Compress { multiplier: 1.0 }.name(), "compress");
    }
}
