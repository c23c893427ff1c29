//! Boundary resolution
//!
//! The legal region is `[-max_u, max_u] x [-1, 1]`. A ball is clamped so its
//! whole disk lies inside.

use glam::Vec2;

use super::ball::GpuBall;
use super::dispatch::Dispatcher;
use super::store::BallStore;

/// Clamp a disk center into the viewport.
///
/// Bottom, top, left, right, in that order. When the disk is larger than the
/// viewport the later clamp on each axis wins.
#[inline]
pub fn clamp_to_bounds(mut position: Vec2, radius: f32, max_u: f32) -> Vec2 {
    if position.y - radius < -1.0 {
        position.y = -1.0 + radius;
    }
    if position.y + radius > 1.0 {
        position.y = 1.0 - radius;
    }
    if position.x - radius < -max_u {
        position.x = -max_u + radius;
    }
    if position.x + radius > max_u {
        position.x = max_u - radius;
    }
    position
}

/// True if any of the four clamps in [`clamp_to_bounds`] would fire
#[inline]
pub fn is_clipping_walls(position: Vec2, radius: f32, max_u: f32) -> bool {
    position.y - radius < -1.0
        || position.y + radius > 1.0
        || position.x - radius < -max_u
        || position.x + radius > max_u
}

/// Kernel: clamp record `index`
#[inline]
pub fn resolve_wall_kernel(index: usize, snapshot: &[GpuBall], max_u: f32) -> GpuBall {
    let mut ball = snapshot[index];
    ball.position = clamp_to_bounds(ball.position, ball.radius, max_u);
    ball
}

/// Run the boundary pass over the whole store
pub fn resolve_boundaries(store: &mut BallStore, dispatcher: &Dispatcher, max_u: f32) {
    dispatcher.launch(store.buffers_mut(), |index, snapshot| {
        resolve_wall_kernel(index, snapshot, max_u)
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAX_U: f32 = 16.0 / 9.0;

    #[test]
    fn test_inside_ball_untouched() {
        let p = Vec2::new(0.3, -0.2);
        assert_eq!(clamp_to_bounds(p, 0.1, MAX_U), p);
        assert!(!is_clipping_walls(p, 0.1, MAX_U));
    }

    #[test]
    fn test_clamps_each_edge() {
        let r = 0.1;
        assert_eq!(clamp_to_bounds(Vec2::new(0.0, -1.0), r, MAX_U).y, -1.0 + r);
        assert_eq!(clamp_to_bounds(Vec2::new(0.0, 5.0), r, MAX_U).y, 1.0 - r);
        assert_eq!(clamp_to_bounds(Vec2::new(-5.0, 0.0), r, MAX_U).x, -MAX_U + r);
        assert_eq!(clamp_to_bounds(Vec2::new(MAX_U, 0.0), r, MAX_U).x, MAX_U - r);
    }

    #[test]
    fn test_corner_clamps_both_axes() {
        let clamped = clamp_to_bounds(Vec2::new(9.0, 9.0), 0.25, 1.0);
        assert_eq!(clamped, Vec2::new(0.75, 0.75));
    }

    #[test]
    fn test_oversized_ball_takes_last_clamp() {
        // Taller than the viewport: top clamp runs after bottom clamp
        let clamped = clamp_to_bounds(Vec2::ZERO, 1.5, 4.0);
        assert_eq!(clamped.y, 1.0 - 1.5);
        let again = clamp_to_bounds(clamped, 1.5, 4.0);
        assert_eq!(again, clamped);
    }

    #[test]
    fn test_wall_predicate_matches_clamp() {
        let r = 0.05;
        for p in [
            Vec2::new(0.0, -0.97),
            Vec2::new(0.0, 0.97),
            Vec2::new(-MAX_U, 0.0),
            Vec2::new(MAX_U - 0.01, 0.0),
        ] {
            assert!(is_clipping_walls(p, r, MAX_U));
            assert_ne!(clamp_to_bounds(p, r, MAX_U), p);
        }
    }

    #[test]
    fn test_kernel_only_moves_position() {
        let snapshot = [GpuBall {
            position: Vec2::new(3.0, 0.0),
            displacement: Vec2::new(0.5, 0.5),
            radius: 0.25,
            color: 7,
            neighbor_overlap_count: 2,
            flags: 1,
        }];
        let out = resolve_wall_kernel(0, &snapshot, 1.0);
        assert_eq!(out.position, Vec2::new(0.75, 0.0));
        assert_eq!(out.displacement, snapshot[0].displacement);
        assert_eq!(out.neighbor_overlap_count, 2);
        assert_eq!(out.flags, 1);
    }
}
