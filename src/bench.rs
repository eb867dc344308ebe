use crate::particles::{fibonacci_sphere, integrate_scalar};
use crate::scene::{FrameInput, Scene};
use crate::tuning::Tuning;
use wasm_bindgen::prelude::*;

#[derive(serde::Serialize)]
pub struct BenchmarkResults {
    pub iterations: i32,
    pub particles: usize,
    pub scalar_ms: f64,
    pub simd_std_ms: Option<f64>,
    // Full frame
    pub scene_frames: i32,
    pub scene_ms: f64,
}

/// Run performance comparison between the integrator kernels and a full scene step
#[wasm_bindgen]
pub fn run_benchmarks(iterations: i32) -> Result<JsValue, JsValue> {
    use std::hint::black_box;

    let perf = web_sys::window()
        .and_then(|w| w.performance())
        .ok_or_else(|| JsValue::from_str("performance API unavailable"))?;

    let tuning = Tuning::default();
    let rest = fibonacci_sphere(tuning.particles.surface_count, tuning.particles.surface_radius);
    let damping = tuning.particles.surface_damping;
    let mut positions = rest.clone();
    let kick: Vec<f32> = rest.iter().map(|p| p * 1e-3).collect();
    let mut velocities = kick.clone();

    // Warm-up to trigger JIT
    for _ in 0..1_000 {
        black_box(integrate_scalar(&mut positions, &mut velocities, 1.0));
        #[cfg(feature = "portable_simd")]
        black_box(crate::particles::integrate_std_simd(&mut positions, &mut velocities, 1.0));
    }

    // 1. Scalar
    let start = perf.now();
    for _ in 0..iterations {
        black_box(integrate_scalar(&mut positions, &mut velocities, damping));
        velocities.copy_from_slice(&kick);
    }
    let scalar_time = perf.now() - start;

    // 2. Portable SIMD
    #[cfg(feature = "portable_simd")]
    let simd_time = {
        let start = perf.now();
        for _ in 0..iterations {
            black_box(crate::particles::integrate_std_simd(
                &mut positions,
                &mut velocities,
                damping,
            ));
            velocities.copy_from_slice(&kick);
        }
        Some(perf.now() - start)
    };
    #[cfg(not(feature = "portable_simd"))]
    let simd_time: Option<f64> = None;

    // 3. Whole frame with no hands (classification, lifecycle, idle integration)
    let scene_frames = iterations.clamp(1, 1_000);
    let mut scene = Scene::new(tuning.clone());
    let start = perf.now();
    for n in 0..scene_frames {
        let input = FrameInput {
            delta_time: 1.0,
            now_ms: n as f64 * 16.0,
            ..Default::default()
        };
        black_box(scene.step(&input));
    }
    let scene_time = perf.now() - start;

    let result = BenchmarkResults {
        iterations,
        particles: tuning.particles.surface_count,
        scalar_ms: scalar_time,
        simd_std_ms: simd_time,
        scene_frames,
        scene_ms: scene_time,
    };

    serde_wasm_bindgen::to_value(&result).map_err(JsValue::from)
}
