//! Overlap accumulation and displacement application
//!
//! One relaxation step is two passes. The accumulator reads the pre-step
//! positions of every ball and writes only `displacement` and
//! `neighbor_overlap_count`; the applicator then moves each ball by the
//! average of its accumulated corrections. Keeping the two apart makes the
//! step a Jacobi iteration: the result does not depend on unit order.

use glam::Vec2;

use super::ball::GpuBall;
use super::dispatch::Dispatcher;
use super::store::BallStore;
use crate::consts::{OVERLAP_EPSILON, RELAXATION_FACTOR};

/// Tuning for the pairwise correction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlapParams {
    /// Fraction of the overlap each ball of a pair moves per step
    pub relaxation_factor: f32,
    /// Centers closer than this are skipped (direction undefined)
    pub epsilon: f32,
}

impl Default for OverlapParams {
    fn default() -> Self {
        Self {
            relaxation_factor: RELAXATION_FACTOR,
            epsilon: OVERLAP_EPSILON,
        }
    }
}

/// Correction pushing `position` away from one neighbor, if they overlap.
///
/// Returns `None` when the disks are apart (`dist > sum of radii`) or the
/// centers coincide (`dist < epsilon`). Exact tangency yields a zero vector:
/// it counts as a neighbor but moves nothing.
#[inline]
pub fn pair_correction(
    position: Vec2,
    radius: f32,
    other_position: Vec2,
    other_radius: f32,
    params: &OverlapParams,
) -> Option<Vec2> {
    let difference = position - other_position;
    let radii = radius + other_radius;
    let distance = difference.length();

    if distance > radii || distance < params.epsilon {
        return None;
    }

    let overlap = radii - distance;
    Some(difference / distance * (overlap * params.relaxation_factor))
}

/// Kernel: sum corrections for record `index` over the whole population
pub fn accumulate_kernel(index: usize, snapshot: &[GpuBall], params: &OverlapParams) -> GpuBall {
    let mut ball = snapshot[index];
    ball.displacement = Vec2::ZERO;
    ball.neighbor_overlap_count = 0;

    for (other_index, other) in snapshot.iter().enumerate() {
        if other_index == index {
            continue;
        }
        if let Some(correction) =
            pair_correction(ball.position, ball.radius, other.position, other.radius, params)
        {
            ball.displacement += correction;
            ball.neighbor_overlap_count += 1;
        }
    }
    ball
}

/// Kernel: move record `index` by its averaged correction
#[inline]
pub fn apply_kernel(index: usize, snapshot: &[GpuBall]) -> GpuBall {
    let mut ball = snapshot[index];
    if ball.neighbor_overlap_count != 0 {
        ball.position += ball.displacement / ball.neighbor_overlap_count as f32;
    }
    ball
}

/// Run the accumulation pass
pub fn accumulate_overlaps(store: &mut BallStore, dispatcher: &Dispatcher, params: &OverlapParams) {
    dispatcher.launch(store.buffers_mut(), |index, snapshot| {
        accumulate_kernel(index, snapshot, params)
    });
}

/// Run the application pass
pub fn apply_displacements(store: &mut BallStore, dispatcher: &Dispatcher) {
    dispatcher.launch(store.buffers_mut(), apply_kernel);
}
