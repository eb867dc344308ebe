//! Rest-shape generators. Output is a flat `x, y, z` buffer centered on the origin.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Evenly spaced points on a sphere (golden-angle spiral). Deterministic.
pub fn fibonacci_sphere(count: usize, radius: f32) -> Vec<f32> {
    let golden_angle = std::f32::consts::PI * (3.0 - 5.0f32.sqrt());
    let mut out = Vec::with_capacity(count * 3);

    for i in 0..count {
        // y runs from just below 1 to just above -1 so no point sits on a pole twice
        let y = 1.0 - (i as f32 + 0.5) / count as f32 * 2.0;
        let ring = (1.0 - y * y).max(0.0).sqrt();
        let (sin, cos) = (golden_angle * i as f32).sin_cos();
        out.extend_from_slice(&[cos * ring * radius, y * radius, sin * ring * radius]);
    }
    out
}

/// Points scattered uniformly in direction, with radius drawn from `[inner, outer]`
pub fn shell_scatter(count: usize, inner: f32, outer: f32, seed: u64) -> Vec<f32> {
    let mut rng = StdRng::seed_from_u64(seed);
    let (inner, outer) = if inner <= outer { (inner, outer) } else { (outer, inner) };
    let mut out = Vec::with_capacity(count * 3);

    for _ in 0..count {
        let z: f32 = rng.random_range(-1.0..=1.0);
        let phi: f32 = rng.random_range(0.0..std::f32::consts::TAU);
        let r: f32 = rng.random_range(inner..=outer);
        let ring = (1.0 - z * z).max(0.0).sqrt();
        out.extend_from_slice(&[ring * phi.cos() * r, z * r, ring * phi.sin() * r]);
    }
    out
}
