use glam::Vec2;
use proptest::prelude::*;
use relax_balls::sim::{
    Ball, BallStore, Dispatcher, GpuBall, OverlapParams, accumulate_overlaps, classify,
    resolve_boundaries,
};

fn ball() -> impl Strategy<Value = Ball> {
    (-3.0f32..3.0, -3.0f32..3.0, 0.001f32..0.5)
        .prop_map(|(x, y, radius)| Ball::new(Vec2::new(x, y), radius))
}

fn population(max: usize) -> impl Strategy<Value = Vec<Ball>> {
    prop::collection::vec(ball(), 0..max)
}

fn pushed(balls: Vec<Ball>) -> BallStore {
    let mut store = BallStore::new(balls);
    store.push();
    store
}

fn positions(records: &[GpuBall]) -> Vec<Vec2> {
    records.iter().map(|b| b.position).collect()
}

proptest! {
    #[test]
    fn boundary_pass_contains_every_disk(balls in population(64), max_u in 0.5f32..3.0) {
        let mut store = pushed(balls);
        resolve_boundaries(&mut store, &Dispatcher::new(16), max_u);

        let tol = 1e-5;
        for b in store.device() {
            prop_assert!(b.position.x - b.radius >= -max_u - tol);
            prop_assert!(b.position.x + b.radius <= max_u + tol);
            prop_assert!(b.position.y - b.radius >= -1.0 - tol);
            prop_assert!(b.position.y + b.radius <= 1.0 + tol);
        }
    }

    #[test]
    fn boundary_pass_is_idempotent(balls in population(64), max_u in 0.5f32..3.0) {
        let dispatcher = Dispatcher::new(8);
        let mut store = pushed(balls);
        resolve_boundaries(&mut store, &dispatcher, max_u);
        let once = positions(store.device());
        resolve_boundaries(&mut store, &dispatcher, max_u);
        prop_assert_eq!(once, positions(store.device()));
    }

    #[test]
    fn accumulation_is_order_independent(
        (balls, order) in population(32).prop_flat_map(|balls| {
            let n = balls.len();
            (Just(balls), Just((0..n).collect::<Vec<usize>>()).prop_shuffle())
        })
    ) {
        let dispatcher = Dispatcher::new(4);
        let params = OverlapParams::default();

        let permuted: Vec<Ball> = order.iter().map(|&i| balls[i]).collect();
        let mut original = pushed(balls);
        let mut shuffled = pushed(permuted);
        accumulate_overlaps(&mut original, &dispatcher, &params);
        accumulate_overlaps(&mut shuffled, &dispatcher, &params);

        for (slot, &source) in order.iter().enumerate() {
            let a = original.device()[source];
            let b = shuffled.device()[slot];
            prop_assert_eq!(a.neighbor_overlap_count, b.neighbor_overlap_count);
            prop_assert!((a.displacement - b.displacement).length() < 1e-4);
            prop_assert_eq!(a.position, b.position);
        }
    }

    #[test]
    fn separated_pair_is_left_alone(
        x in -0.5f32..0.5,
        y in -0.5f32..0.5,
        radius in 0.01f32..0.2,
        gap in 0.001f32..0.5,
        angle in 0.0f32..std::f32::consts::TAU,
    ) {
        let offset = Vec2::from_angle(angle) * (2.0 * radius + gap);
        let mut store = pushed(vec![
            Ball::new(Vec2::new(x, y), radius),
            Ball::new(Vec2::new(x, y) + offset, radius),
        ]);
        accumulate_overlaps(&mut store, &Dispatcher::new(256), &OverlapParams::default());

        for b in store.device() {
            prop_assert_eq!(b.displacement, Vec2::ZERO);
            prop_assert_eq!(b.neighbor_overlap_count, 0);
        }
    }

    #[test]
    fn classifier_never_moves_balls(balls in population(48), repeats in 1usize..4) {
        let dispatcher = Dispatcher::new(32);
        let mut store = pushed(balls);
        let before = positions(store.device());
        for _ in 0..repeats {
            classify(&mut store, &dispatcher, 1.5);
        }
        prop_assert_eq!(before, positions(store.device()));
    }

    #[test]
    fn accumulation_output_is_finite(balls in population(48)) {
        let mut store = pushed(balls);
        accumulate_overlaps(&mut store, &Dispatcher::new(5), &OverlapParams::default());
        for b in store.device() {
            prop_assert!(b.displacement.is_finite());
        }
    }
}
