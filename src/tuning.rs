//! Tunable constants for gesture thresholds, particle physics, the dual-object
//! lifecycle and the scalar controls.
//!
//! Defaults reproduce the hand-tuned values the experience ships with. A JSON
//! preset may override any subset; missing fields keep their defaults.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::tuning_limits;

/// Failure to load a tuning preset
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to parse tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning: {}", .0.join("; "))]
    OutOfRange(Vec<String>),
}

/// Thresholds for the gesture classification engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureTuning {
    /// Thumb-tip to index-tip 3D distance below which a hand is pinching
    pub pinch_threshold: f32,
    /// Palm speed (normalized units per second) above which a hand is waving
    pub wave_threshold: f32,
    /// Finger is curled if tip-to-wrist < ratio * base-to-wrist
    pub curl_ratio: f32,
    /// Finger is extended if tip-to-wrist > ratio * pip-to-wrist
    pub extend_ratio: f32,
    /// How many of the four fingers must agree for grasp/open
    pub min_fingers: u32,
    pub same_place_distance: f32,
    pub spread_delta: f32,
    pub spread_min_distance: f32,
    pub converge_delta: f32,
    pub converge_max_distance: f32,
    /// Palm samples retained per hand
    pub history_capacity: usize,
    /// Velocity is not estimated over windows shorter than this
    pub min_elapsed_ms: f64,
}

impl Default for GestureTuning {
    fn default() -> Self {
        Self {
            pinch_threshold: 0.06,
            wave_threshold: 0.02,
            curl_ratio: 1.2,
            extend_ratio: 1.1,
            min_fingers: 3,
            same_place_distance: 0.12,
            spread_delta: 0.02,
            spread_min_distance: 0.3,
            converge_delta: 0.02,
            converge_max_distance: 0.15,
            history_capacity: 5,
            min_elapsed_ms: 10.0,
        }
    }
}

/// Particle counts, shapes and integrator gains
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleTuning {
    pub surface_count: usize,
    pub outer_count: usize,
    pub surface_gain: f32,
    pub outer_gain: f32,
    pub surface_damping: f32,
    pub outer_damping: f32,
    pub surface_converge_rate: f32,
    pub outer_converge_rate: f32,
    pub surface_velocity_decay: f32,
    /// Dispersion added per unit of disperse intensity
    pub disperse_step: f32,
    /// Dispersion removed per unit of converge intensity
    pub converge_step: f32,
    /// Velocity component magnitude below which a body counts as at rest
    pub rest_epsilon: f32,
    pub surface_radius: f32,
    pub outer_inner_radius: f32,
    pub outer_outer_radius: f32,
    /// Seed for the outer shell scatter
    pub seed: u64,
}

impl Default for ParticleTuning {
    fn default() -> Self {
        Self {
            surface_count: 2400,
            outer_count: 900,
            surface_gain: 0.015,
            outer_gain: 0.04,
            surface_damping: 0.97,
            outer_damping: 0.98,
            surface_converge_rate: 0.12,
            outer_converge_rate: 0.1,
            surface_velocity_decay: 0.9,
            disperse_step: 0.1,
            converge_step: 0.15,
            rest_epsilon: 1e-4,
            surface_radius: 1.0,
            outer_inner_radius: 1.25,
            outer_outer_radius: 1.6,
            seed: 0x5EED_CE1E,
        }
    }
}

/// Spawn/merge behavior
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LifecycleTuning {
    pub spawn_cooldown_frames: u32,
    pub merge_duration_ms: f64,
    /// Horizontal distance of each secondary object from center
    pub secondary_offset: f32,
    /// Scale of secondary objects while in dual mode
    pub secondary_scale: f32,
    /// Fraction of scale lost by the end of a merge
    pub merge_shrink: f32,
}

impl Default for LifecycleTuning {
    fn default() -> Self {
        Self {
            spawn_cooldown_frames: 90,
            merge_duration_ms: 1000.0,
            secondary_offset: 2.0,
            secondary_scale: 0.7,
            merge_shrink: 0.5,
        }
    }
}

/// Zoom, yaw and head-parallax controls
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlTuning {
    pub min_scale: f32,
    pub max_scale: f32,
    /// Zoom change per unit of pinch-distance change
    pub pinch_zoom_gain: f32,
    /// Zoom change per scroll delta unit (sign inverted)
    pub scroll_zoom_gain: f32,
    pub yaw_decay: f32,
    /// Yaw impulse per unit of wave velocity
    pub wave_yaw_gain: f32,
    /// Constant yaw added every frame to visible objects
    pub idle_spin: f32,
    pub parallax_strength: f32,
    pub parallax_smoothing: f32,
}

impl Default for ControlTuning {
    fn default() -> Self {
        Self {
            min_scale: 0.3,
            max_scale: 2.0,
            pinch_zoom_gain: 4.0,
            scroll_zoom_gain: 0.001,
            yaw_decay: 0.95,
            wave_yaw_gain: 0.05,
            idle_spin: 0.002,
            parallax_strength: 0.6,
            parallax_smoothing: 0.1,
        }
    }
}

/// Complete tuning set
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub gesture: GestureTuning,
    pub particles: ParticleTuning,
    pub lifecycle: LifecycleTuning,
    pub controls: ControlTuning,
}

impl Tuning {
    /// Parse a (possibly partial) preset and validate it
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        log::info!("Loaded tuning preset");
        Ok(tuning)
    }

    /// Export as pretty JSON
    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Check every value against the shared limits plus cross-field ordering
    pub fn validate(&self) -> Result<(), TuningError> {
        let value = serde_json::to_value(self)?;
        let mut errors = tuning_limits::violations(&tuning_limits::flatten(&value));

        if self.controls.min_scale > self.controls.max_scale {
            errors.push("controls.min_scale exceeds controls.max_scale".to_string());
        }
        if self.particles.outer_inner_radius > self.particles.outer_outer_radius {
            errors.push(
                "particles.outer_inner_radius exceeds particles.outer_outer_radius".to_string(),
            );
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(TuningError::OutOfRange(errors))
        }
    }
}
