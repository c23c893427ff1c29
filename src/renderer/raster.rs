//! CPU rasterizer
//!
//! One unit per pixel, rows spread over the rayon pool. Each pixel takes the
//! color of the first ball (in store order) whose disk contains it.

use rayon::prelude::*;

use crate::pixel_to_sim;
use crate::settings::ColorMode;
use crate::sim::{GpuBall, Rgba8};

/// Colors for the diagnostic view
pub mod colors {
    use crate::sim::Rgba8;

    pub const BALL: Rgba8 = Rgba8::opaque(255, 255, 255);
    pub const CLIPPING_BALL: Rgba8 = Rgba8::opaque(255, 0, 0);
    pub const CLIPPING_WALL: Rgba8 = Rgba8::opaque(0, 0, 255);
    pub const CLIPPING_BOTH: Rgba8 = Rgba8::opaque(255, 0, 255);
    pub const BACKGROUND: Rgba8 = Rgba8::opaque(0, 0, 0);
}

/// Color a ball is drawn with
#[inline]
pub fn ball_color(ball: &GpuBall, mode: ColorMode) -> Rgba8 {
    match mode {
        ColorMode::BallColor => Rgba8::from_packed(ball.color),
        ColorMode::Diagnostic => match (ball.is_clipping_ball(), ball.is_clipping_wall()) {
            (true, true) => colors::CLIPPING_BOTH,
            (false, true) => colors::CLIPPING_WALL,
            (true, false) => colors::CLIPPING_BALL,
            (false, false) => colors::BALL,
        },
    }
}

/// Shade a single pixel
pub fn shade_pixel(
    x: u32,
    y: u32,
    width: u32,
    height: u32,
    balls: &[GpuBall],
    mode: ColorMode,
) -> Rgba8 {
    let pixel_pos = pixel_to_sim(x, y, width, height);
    balls
        .iter()
        .find(|ball| (ball.position - pixel_pos).length() < ball.radius)
        .map_or(colors::BACKGROUND, |ball| ball_color(ball, mode))
}

/// Fill `pixels` (row 0 at `v = -1`) from the ball records
pub fn rasterize(
    balls: &[GpuBall],
    pixels: &mut [Rgba8],
    width: u32,
    height: u32,
    mode: ColorMode,
) {
    if width == 0 || height == 0 {
        return;
    }
    pixels
        .par_chunks_mut(width as usize)
        .enumerate()
        .for_each(|(y, row)| {
            let y = y as u32;
            if y >= height {
                return;
            }
            for (x, px) in row.iter_mut().enumerate() {
                *px = shade_pixel(x as u32, y, width, height, balls, mode);
            }
        });
    log::trace!("Rasterized {} balls into {}x{}", balls.len(), width, height);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::ball::{Ball, FLAG_CLIPPING_BALL, FLAG_CLIPPING_WALL};
    use glam::Vec2;

    fn gpu(x: f32, y: f32, radius: f32) -> GpuBall {
        GpuBall::from(&Ball::new(Vec2::new(x, y), radius))
    }

    #[test]
    fn test_diagnostic_palette() {
        let mut ball = gpu(0.0, 0.0, 0.1);
        assert_eq!(ball_color(&ball, ColorMode::Diagnostic), colors::BALL);
        ball.flags = FLAG_CLIPPING_BALL;
        assert_eq!(ball_color(&ball, ColorMode::Diagnostic), colors::CLIPPING_BALL);
        ball.flags = FLAG_CLIPPING_WALL;
        assert_eq!(ball_color(&ball, ColorMode::Diagnostic), colors::CLIPPING_WALL);
        ball.flags = FLAG_CLIPPING_BALL | FLAG_CLIPPING_WALL;
        assert_eq!(ball_color(&ball, ColorMode::Diagnostic), colors::CLIPPING_BOTH);
    }

    #[test]
    fn test_ball_color_mode_uses_record_color() {
        let ball = GpuBall::from(&Ball::new(Vec2::ZERO, 0.1).with_color(Rgba8::opaque(3, 4, 5)));
        assert_eq!(ball_color(&ball, ColorMode::BallColor), Rgba8::opaque(3, 4, 5));
    }

    #[test]
    fn test_center_pixel_covered_corner_not() {
        // 20x10 viewport: pixel (10, 5) maps to (0, 0)
        let balls = [gpu(0.0, 0.0, 0.3)];
        let mut pixels = vec![Rgba8::default(); 200];
        rasterize(&balls, &mut pixels, 20, 10, ColorMode::Diagnostic);
        assert_eq!(pixels[5 * 20 + 10], colors::BALL);
        assert_eq!(pixels[0], colors::BACKGROUND);
    }

    #[test]
    fn test_first_ball_wins() {
        let mut first = gpu(0.0, 0.0, 0.5);
        first.flags = FLAG_CLIPPING_BALL;
        let second = gpu(0.0, 0.0, 0.5);
        assert_eq!(
            shade_pixel(2, 2, 4, 4, &[first, second], ColorMode::Diagnostic),
            colors::CLIPPING_BALL
        );
    }

    #[test]
    fn test_empty_population_is_background() {
        let mut pixels = vec![Rgba8::default(); 12];
        rasterize(&[], &mut pixels, 4, 3, ColorMode::Diagnostic);
        assert!(pixels.iter().all(|&p| p == colors::BACKGROUND));
    }
}
