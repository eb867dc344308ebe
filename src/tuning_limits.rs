//! Accepted ranges for every numeric tuning value.
//!
//! Included by both build.rs (to reject bad presets at compile time) and the
//! runtime `Tuning::validate`, so the two can never disagree.

// Some helpers are only used by build.rs
#![allow(dead_code)]

use serde_json::Value;

/// Inclusive range for one `section.field` key
pub struct Limit {
    pub key: &'static str,
    pub min: f64,
    pub max: f64,
}

const fn limit(key: &'static str, min: f64, max: f64) -> Limit {
    Limit { key, min, max }
}

pub const LIMITS: &[Limit] = &[
    // Gesture classification
    limit("gesture.pinch_threshold", 0.0, 0.5),
    limit("gesture.wave_threshold", 0.0, 10.0),
    limit("gesture.curl_ratio", 0.1, 3.0),
    limit("gesture.extend_ratio", 0.1, 3.0),
    limit("gesture.min_fingers", 1.0, 4.0),
    limit("gesture.same_place_distance", 0.0, 1.5),
    limit("gesture.spread_delta", 0.0, 1.0),
    limit("gesture.spread_min_distance", 0.0, 1.5),
    limit("gesture.converge_delta", 0.0, 1.0),
    limit("gesture.converge_max_distance", 0.0, 1.5),
    limit("gesture.history_capacity", 2.0, 120.0),
    limit("gesture.min_elapsed_ms", 0.1, 1000.0),
    // Particle bodies
    limit("particles.surface_count", 1.0, 200_000.0),
    limit("particles.outer_count", 1.0, 200_000.0),
    limit("particles.surface_gain", 0.0, 1.0),
    limit("particles.outer_gain", 0.0, 1.0),
    limit("particles.surface_damping", 0.0, 1.0),
    limit("particles.outer_damping", 0.0, 1.0),
    limit("particles.surface_converge_rate", 0.0, 1.0),
    limit("particles.outer_converge_rate", 0.0, 1.0),
    limit("particles.surface_velocity_decay", 0.0, 1.0),
    limit("particles.disperse_step", 0.0, 1.0),
    limit("particles.converge_step", 0.0, 1.0),
    limit("particles.rest_epsilon", 0.0, 1.0),
    limit("particles.surface_radius", 0.01, 100.0),
    limit("particles.outer_inner_radius", 0.01, 100.0),
    limit("particles.outer_outer_radius", 0.01, 100.0),
    limit("particles.seed", 0.0, f64::MAX),
    // Dual-object lifecycle
    limit("lifecycle.spawn_cooldown_frames", 0.0, 10_000.0),
    limit("lifecycle.merge_duration_ms", 1.0, 60_000.0),
    limit("lifecycle.secondary_offset", 0.0, 100.0),
    limit("lifecycle.secondary_scale", 0.01, 10.0),
    limit("lifecycle.merge_shrink", 0.0, 1.0),
    // Scalar controls
    limit("controls.min_scale", 0.01, 100.0),
    limit("controls.max_scale", 0.01, 100.0),
    limit("controls.pinch_zoom_gain", 0.0, 100.0),
    limit("controls.scroll_zoom_gain", 0.0, 1.0),
    limit("controls.yaw_decay", 0.0, 1.0),
    limit("controls.wave_yaw_gain", 0.0, 10.0),
    limit("controls.idle_spin", -1.0, 1.0),
    limit("controls.parallax_strength", 0.0, 10.0),
    limit("controls.parallax_smoothing", 0.0, 1.0),
];

/// Look up the limit for a flattened key
pub fn find(key: &str) -> Option<&'static Limit> {
    LIMITS.iter().find(|l| l.key == key)
}

/// Flatten a two-level JSON object into `("section.field", value)` pairs.
/// Non-numeric leaves are skipped.
pub fn flatten(value: &Value) -> Vec<(String, f64)> {
    let mut out = Vec::new();
    if let Value::Object(sections) = value {
        for (section, fields) in sections {
            if let Value::Object(fields) = fields {
                for (field, v) in fields {
                    if let Some(n) = v.as_f64() {
                        out.push((format!("{}.{}", section, field), n));
                    }
                }
            }
        }
    }
    out
}

/// Check flattened values against `LIMITS`.
///
/// Returns one message per out-of-range value. Unknown keys are reported
/// separately by the caller since runtime and build script treat them differently.
pub fn violations(fields: &[(String, f64)]) -> Vec<String> {
    fields
        .iter()
        .filter_map(|(key, value)| {
            let l = find(key)?;
            if value.is_finite() && *value >= l.min && *value <= l.max {
                None
            } else {
                Some(format!(
                    "{} = {} outside [{}, {}]",
                    key, value, l.min, l.max
                ))
            }
        })
        .collect()
}
