//! Simulation settings
//!
//! Loaded from a JSON file, every field optional (missing fields fall back to
//! the defaults in [`crate::consts`]).

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::SimError;

/// How the rasterizer colours each disk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ColorMode {
    /// White, red (touching a ball), blue (touching a wall), purple (both)
    #[default]
    Diagnostic,
    /// The ball's own random color
    BallColor,
}

impl ColorMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorMode::Diagnostic => "diagnostic",
            ColorMode::BallColor => "ball_color",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "diagnostic" | "debug" => Some(ColorMode::Diagnostic),
            "ball_color" | "ball-color" | "color" => Some(ColorMode::BallColor),
            _ => None,
        }
    }
}

/// Viewport, population and solver parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Viewport ===
    /// Output width in pixels
    pub width: u32,
    /// Output height in pixels
    pub height: u32,

    // === Population ===
    pub ball_count: usize,
    /// Radius of every ball (simulation units, viewport height is 2.0)
    pub ball_radius: f32,
    /// Seed for initial placement and colors
    pub seed: u64,

    // === Solver ===
    /// Relaxation iterations on even frames; odd frames run one more
    pub base_iterations: u32,
    /// Damping applied to each pairwise correction
    pub relaxation_factor: f32,
    /// Pairs with centers closer than this contribute nothing
    pub overlap_epsilon: f32,
    /// Work units per workgroup
    pub workgroup_size: usize,
    /// Compress multiplier applied after every frame (0 disables)
    pub settle_multiplier: f32,

    // === Presentation ===
    pub color_mode: ColorMode,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            width: VIEWPORT_WIDTH,
            height: VIEWPORT_HEIGHT,

            ball_count: BALL_COUNT,
            ball_radius: BALL_RADIUS,
            seed: 0x5eed_ba11,

            base_iterations: BASE_ITERATIONS,
            relaxation_factor: RELAXATION_FACTOR,
            overlap_epsilon: OVERLAP_EPSILON,
            workgroup_size: WORKGROUP_SIZE,
            settle_multiplier: 0.0,

            color_mode: ColorMode::Diagnostic,
        }
    }
}

impl Settings {
    /// Parse settings from a JSON string and validate them
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, SimError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Aspect-corrected half-width of the viewport
    pub fn max_u(&self) -> f32 {
        crate::aspect_half_width(self.width, self.height)
    }

    /// Reject settings the passes cannot run with
    pub fn validate(&self) -> Result<(), SimError> {
        if self.width == 0 || self.height == 0 {
            return Err(SimError::InvalidSettings(format!(
                "viewport must be non-empty, got {}x{}",
                self.width, self.height
            )));
        }
        if !(self.ball_radius.is_finite() && self.ball_radius > 0.0) {
            return Err(SimError::InvalidSettings(format!(
                "ball radius must be positive, got {}",
                self.ball_radius
            )));
        }
        if self.workgroup_size == 0 {
            return Err(SimError::InvalidSettings(
                "workgroup size must be at least 1".to_string(),
            ));
        }
        if !(self.relaxation_factor.is_finite() && self.relaxation_factor > 0.0) {
            return Err(SimError::InvalidSettings(format!(
                "relaxation factor must be positive, got {}",
                self.relaxation_factor
            )));
        }
        if !(self.overlap_epsilon.is_finite() && self.overlap_epsilon >= 0.0) {
            return Err(SimError::InvalidSettings(format!(
                "overlap epsilon must be non-negative, got {}",
                self.overlap_epsilon
            )));
        }
        if !(self.settle_multiplier.is_finite() && self.settle_multiplier >= 0.0) {
            return Err(SimError::InvalidSettings(format!(
                "settle multiplier must be non-negative, got {}",
                self.settle_multiplier
            )));
        }
        Ok(())
    }
}
