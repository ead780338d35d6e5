//! Stack tuning configuration.
//!
//! # Responsibility
//! - Hold viewport geometry and every gesture/animation constant.
//! - Validate host-provided values before the engine uses them.
//!
//! # Invariants
//! - A `StackConfig` accepted by `validate()` never yields NaN transforms.
//! - Missing JSON fields fall back to defaults.

use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

const MAX_VIEWPORT_PX: f32 = 100_000.0;
const MAX_EXIT_DISTANCE_FACTOR: f32 = 10.0;
const MAX_ROTATION_DEG: f32 = 90.0;
const MAX_COMMAND_VELOCITY: f32 = 100_000.0;

/// Gesture and animation tuning for one card stack.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StackConfig {
    pub viewport_width: f32,
    /// Release displacement, as a fraction of viewport width, that commits.
    pub commit_threshold_fraction: f32,
    /// Off-screen exit target as a multiple of viewport width.
    pub exit_distance_factor: f32,
    pub exit_rotation_deg: f32,
    /// Multiplier applied to raw horizontal drag before it moves the card.
    pub drag_damping: f32,
    /// Rotation reached when the raw drag equals one viewport width.
    pub drag_rotation_factor_deg: f32,
    /// Initial spring velocity (px/s) for button and voice swipes.
    pub command_velocity: f32,
    /// Spring stiffness for unit mass; damping is always critical.
    pub spring_stiffness: f32,
    pub settle_epsilon_px: f32,
    pub settle_epsilon_deg: f32,
    /// Active-card offset, as a fraction of viewport width, at which the
    /// next card's peek reaches full scale and opacity.
    pub peek_full_distance_fraction: f32,
    pub peek_scale_from: f32,
    pub peek_opacity_from: f32,
    pub hidden_scale: f32,
    pub overlay_ramp_start_px: f32,
    pub overlay_ramp_end_px: f32,
}

impl Default for StackConfig {
    fn default() -> Self {
        Self {
            viewport_width: 390.0,
            commit_threshold_fraction: 0.25,
            exit_distance_factor: 1.5,
            exit_rotation_deg: 10.0,
            drag_damping: 0.92,
            drag_rotation_factor_deg: 12.0,
            command_velocity: 800.0,
            spring_stiffness: 180.0,
            settle_epsilon_px: 0.5,
            settle_epsilon_deg: 0.05,
            peek_full_distance_fraction: 0.5,
            peek_scale_from: 0.96,
            peek_opacity_from: 0.7,
            hidden_scale: 0.92,
            overlay_ramp_start_px: 20.0,
            overlay_ramp_end_px: 100.0,
        }
    }
}

impl StackConfig {
    /// Default tuning for a specific viewport width.
    pub fn for_viewport(width: f32) -> Self {
        Self {
            viewport_width: width,
            ..Self::default()
        }
    }

    /// Parses and validates a JSON config; absent fields use defaults.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Validates geometry and tuning ranges.
    ///
    /// Every multiplier, velocity and angle must be finite and bounded so
    /// derived offsets stay finite after multiplying by the viewport width.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !in_range(self.viewport_width, 0.0, MAX_VIEWPORT_PX) {
            return Err(ConfigError::InvalidViewport(self.viewport_width));
        }
        ensure(
            "commit_threshold_fraction",
            self.commit_threshold_fraction,
            self.commit_threshold_fraction > 0.0 && self.commit_threshold_fraction < 1.0,
        )?;
        ensure(
            "exit_distance_factor",
            self.exit_distance_factor,
            self.exit_distance_factor > 1.0 && self.exit_distance_factor <= MAX_EXIT_DISTANCE_FACTOR,
        )?;
        ensure(
            "exit_rotation_deg",
            self.exit_rotation_deg,
            self.exit_rotation_deg.abs() <= MAX_ROTATION_DEG,
        )?;
        ensure("drag_damping", self.drag_damping, in_range(self.drag_damping, 0.0, 1.0))?;
        ensure(
            "drag_rotation_factor_deg",
            self.drag_rotation_factor_deg,
            self.drag_rotation_factor_deg.abs() <= MAX_ROTATION_DEG,
        )?;
        ensure(
            "command_velocity",
            self.command_velocity,
            in_range(self.command_velocity, 0.0, MAX_COMMAND_VELOCITY),
        )?;
        ensure("spring_stiffness", self.spring_stiffness, is_positive(self.spring_stiffness))?;
        ensure(
            "settle_epsilon_px",
            self.settle_epsilon_px,
            is_positive(self.settle_epsilon_px),
        )?;
        ensure(
            "settle_epsilon_deg",
            self.settle_epsilon_deg,
            is_positive(self.settle_epsilon_deg),
        )?;
        ensure(
            "peek_full_distance_fraction",
            self.peek_full_distance_fraction,
            in_range(self.peek_full_distance_fraction, 0.0, 1.0),
        )?;
        ensure("peek_scale_from", self.peek_scale_from, in_range(self.peek_scale_from, 0.0, 1.0))?;
        ensure(
            "peek_opacity_from",
            self.peek_opacity_from,
            in_range(self.peek_opacity_from, 0.0, 1.0),
        )?;
        ensure("hidden_scale", self.hidden_scale, in_range(self.hidden_scale, 0.0, 1.0))?;
        if !(self.overlay_ramp_start_px >= 0.0
            && self.overlay_ramp_end_px.is_finite()
            && self.overlay_ramp_end_px > self.overlay_ramp_start_px)
        {
            return Err(ConfigError::InvertedRamp {
                start: self.overlay_ramp_start_px,
                end: self.overlay_ramp_end_px,
            });
        }
        Ok(())
    }

    /// Absolute raw displacement a release must exceed to commit.
    pub fn commit_threshold_px(&self) -> f32 {
        self.viewport_width * self.commit_threshold_fraction
    }

    /// Absolute off-screen exit offset.
    pub fn exit_distance_px(&self) -> f32 {
        self.viewport_width * self.exit_distance_factor
    }

    pub fn peek_full_distance_px(&self) -> f32 {
        self.viewport_width * self.peek_full_distance_fraction
    }
}

fn is_positive(value: f32) -> bool {
    value.is_finite() && value > 0.0
}

/// `value` in `(low, high]`; NaN and infinities fail.
fn in_range(value: f32, low: f32, high: f32) -> bool {
    value.is_finite() && value > low && value <= high
}

fn ensure(field: &'static str, value: f32, valid: bool) -> Result<(), ConfigError> {
    if valid && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange { field, value })
    }
}

/// Config validation/parsing errors.
#[derive(Debug)]
pub enum ConfigError {
    InvalidViewport(f32),
    OutOfRange { field: &'static str, value: f32 },
    InvertedRamp { start: f32, end: f32 },
    Parse(serde_json::Error),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidViewport(width) => {
                write!(f, "viewport width must be positive and bounded, got {width}")
            }
            Self::OutOfRange { field, value } => write!(f, "`{field}` out of range: {value}"),
            Self::InvertedRamp { start, end } => {
                write!(f, "overlay ramp must satisfy 0 <= start < end, got {start}..{end}")
            }
            Self::Parse(err) => write!(f, "invalid stack config json: {err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::InvalidViewport(_) | Self::OutOfRange { .. } | Self::InvertedRamp { .. } => None,
        }
    }
}
