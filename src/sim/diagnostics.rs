//! Diagnostic classification
//!
//! Recomputes the clipping flags shown by the rasterizer. Advisory only:
//! nothing here feeds back into the relaxation.

use super::ball::{FLAG_CLIPPING_BALL, FLAG_CLIPPING_WALL, GpuBall};
use super::boundary::is_clipping_walls;
use super::dispatch::Dispatcher;
use super::store::BallStore;

/// True if record `index` touches or overlaps any other ball.
///
/// Uses `dist <= sum of radii`, so tangent and coincident pairs both count.
pub fn is_clipping_ball(index: usize, snapshot: &[GpuBall]) -> bool {
    let ball = &snapshot[index];
    snapshot.iter().enumerate().any(|(other_index, other)| {
        other_index != index
            && (ball.position - other.position).length() <= ball.radius + other.radius
    })
}

/// Kernel: recompute both flags for record `index`
pub fn classify_kernel(index: usize, snapshot: &[GpuBall], max_u: f32) -> GpuBall {
    let mut ball = snapshot[index];
    ball.set_flag(
        FLAG_CLIPPING_WALL,
        is_clipping_walls(ball.position, ball.radius, max_u),
    );
    ball.set_flag(FLAG_CLIPPING_BALL, is_clipping_ball(index, snapshot));
    ball
}

/// Run the classification pass
pub fn classify(store: &mut BallStore, dispatcher: &Dispatcher, max_u: f32) {
    dispatcher.launch(store.buffers_mut(), |index, snapshot| {
        classify_kernel(index, snapshot, max_u)
    });
}

/// Population-wide summary of the current flags
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ClippingSummary {
    pub clipping_balls: usize,
    pub clipping_walls: usize,
    /// Deepest pairwise penetration (`sum of radii - dist`), 0 if none
    pub max_penetration: f32,
}

/// Count flags and measure the worst overlap left after relaxation
pub fn summarize(snapshot: &[GpuBall]) -> ClippingSummary {
    let mut summary = ClippingSummary::default();
    for (i, ball) in snapshot.iter().enumerate() {
        if ball.is_clipping_ball() {
            summary.clipping_balls += 1;
        }
        if ball.is_clipping_wall() {
            summary.clipping_walls += 1;
        }
        for other in &snapshot[i + 1..] {
            let penetration =
                ball.radius + other.radius - (ball.position - other.position).length();
            summary.max_penetration = summary.max_penetration.max(penetration);
        }
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::ball::Ball;
    use glam::Vec2;

    fn gpu(x: f32, y: f32, radius: f32) -> GpuBall {
        GpuBall::from(&Ball::new(Vec2::new(x, y), radius))
    }

    #[test]
    fn test_tangent_pair_is_flagged() {
        let snapshot = [gpu(-0.5, 0.0, 0.5), gpu(0.5, 0.0, 0.5)];
        assert!(is_clipping_ball(0, &snapshot));
        assert!(is_clipping_ball(1, &snapshot));
    }

    #[test]
    fn test_coincident_pair_is_flagged() {
        let snapshot = [gpu(0.1, 0.1, 0.05), gpu(0.1, 0.1, 0.05)];
        assert!(is_clipping_ball(0, &snapshot));
    }

    #[test]
    fn test_lone_ball_never_clips_itself() {
        let snapshot = [gpu(0.0, 0.0, 0.5)];
        assert!(!is_clipping_ball(0, &snapshot));
    }

    #[test]
    fn test_classify_clears_stale_flags() {
        let mut ball = gpu(0.0, 0.0, 0.1);
        ball.flags = FLAG_CLIPPING_BALL | FLAG_CLIPPING_WALL;
        let out = classify_kernel(0, &[ball], 1.0);
        assert_eq!(out.flags, 0);
    }

    #[test]
    fn test_classify_sets_wall_flag() {
        let out = classify_kernel(0, &[gpu(0.0, 0.98, 0.05)], 1.0);
        assert!(out.is_clipping_wall());
        assert!(!out.is_clipping_ball());
    }

    #[test]
    fn test_classify_keeps_physics_fields() {
        let snapshot = [gpu(0.0, 0.0, 0.1), gpu(0.05, 0.0, 0.1)];
        let out = classify_kernel(1, &snapshot, 1.0);
        assert_eq!(out.position, snapshot[1].position);
        assert_eq!(out.displacement, snapshot[1].displacement);
        assert_eq!(out.neighbor_overlap_count, snapshot[1].neighbor_overlap_count);
    }

    #[test]
    fn test_summary_counts_and_penetration() {
        let mut a = gpu(0.0, 0.0, 0.1);
        let mut b = gpu(0.15, 0.0, 0.1);
        let c = gpu(0.9, 0.9, 0.05);
        a.flags = FLAG_CLIPPING_BALL;
        b.flags = FLAG_CLIPPING_BALL | FLAG_CLIPPING_WALL;

        let summary = summarize(&[a, b, c]);
        assert_eq!(summary.clipping_balls, 2);
        assert_eq!(summary.clipping_walls, 1);
        assert!((summary.max_penetration - 0.05).abs() < 1e-6);
    }

    #[test]
    fn test_summary_of_nothing() {
        assert_eq!(summarize(&[]), ClippingSummary::default());
    }
}
