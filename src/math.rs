//! Scalar helpers shared by the gesture, particle and lifecycle code.

use glam::Vec2;

/// Cubic ease-out: fast start, gentle landing. `t` is clamped to [0, 1].
#[inline]
pub fn ease_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

/// Linear interpolation between `a` and `b`
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Move `current` a fraction `rate` of the way toward `target`
#[inline]
pub fn approach(current: Vec2, target: Vec2, rate: f32) -> Vec2 {
    current + (target - current) * rate
}
