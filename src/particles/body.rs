use serde::Serialize;

use glam::Vec3;

use crate::tuning::ParticleTuning;

/// Radial vectors shorter than this have no outward direction
const DEGENERATE_RADIUS: f32 = 1e-6;

/// Which role a body plays in its object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyKind {
    /// Particles forming the object's surface
    Surface,
    /// Loosely orbiting outer shell
    Outer,
}

/// Integrator gains for one body kind
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyParams {
    /// Velocity added per unit of disperse intensity
    pub gain: f32,
    /// Velocity multiplier applied every integration step
    pub damping: f32,
    /// Fraction of the gap to rest closed per unit of converge intensity
    pub converge_rate: f32,
    /// Velocity multiplier applied by converge (1.0 leaves velocity alone)
    pub velocity_decay: f32,
    /// Velocity component magnitude below which the body is at rest
    pub rest_epsilon: f32,
}

impl BodyParams {
    pub fn for_kind(kind: BodyKind, tuning: &ParticleTuning) -> Self {
        match kind {
            BodyKind::Surface => Self {
                gain: tuning.surface_gain,
                damping: tuning.surface_damping,
                converge_rate: tuning.surface_converge_rate,
                velocity_decay: tuning.surface_velocity_decay,
                rest_epsilon: tuning.rest_epsilon,
            },
            BodyKind::Outer => Self {
                gain: tuning.outer_gain,
                damping: tuning.outer_damping,
                converge_rate: tuning.outer_converge_rate,
                velocity_decay: 1.0,
                rest_epsilon: tuning.rest_epsilon,
            },
        }
    }
}

/// A fixed-size particle set with rest shape, live positions and velocities.
///
/// All three buffers are flat `x, y, z` triples of the same length and never
/// change size after construction. Positions are in the owning object's
/// local space, centered on its origin.
#[derive(Debug, Clone)]
pub struct ParticleBody {
    kind: BodyKind,
    params: BodyParams,
    rest: Vec<f32>,
    positions: Vec<f32>,
    velocities: Vec<f32>,
    /// Some velocity component exceeded `rest_epsilon` after the last step
    moving: bool,
    /// Positions changed since the renderer last took them
    needs_upload: bool,
    dispersed: bool,
}

impl ParticleBody {
    /// Build a body at rest on `rest`. A trailing partial triple is dropped.
    pub fn new(kind: BodyKind, mut rest: Vec<f32>, params: BodyParams) -> Self {
        rest.truncate(rest.len() / 3 * 3);
        let positions = rest.clone();
        let velocities = vec![0.0; rest.len()];
        Self {
            kind,
            params,
            rest,
            positions,
            velocities,
            moving: false,
            needs_upload: true,
            dispersed: false,
        }
    }

    pub fn kind(&self) -> BodyKind {
        self.kind
    }

    pub fn params(&self) -> &BodyParams {
        &self.params
    }

    pub fn count(&self) -> usize {
        self.rest.len() / 3
    }

    pub fn rest_positions(&self) -> &[f32] {
        &self.rest
    }

    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    pub fn velocities(&self) -> &[f32] {
        &self.velocities
    }

    /// Live positions as raw bytes for a vertex buffer upload
    pub fn positions_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.positions)
    }

    pub fn is_moving(&self) -> bool {
        self.moving
    }

    pub fn is_dispersed(&self) -> bool {
        self.dispersed
    }

    pub(crate) fn clear_dispersed(&mut self) {
        self.dispersed = false;
    }

    /// Whether the live positions changed since `mark_uploaded`
    pub fn needs_upload(&self) -> bool {
        self.needs_upload
    }

    pub fn mark_uploaded(&mut self) {
        self.needs_upload = false;
    }

    /// Push every particle outward along its current radial direction.
    ///
    /// Particles sitting at the origin have no direction and are left alone.
    pub fn disperse(&mut self, intensity: f32) {
        let intensity = intensity.clamp(0.0, 1.0);
        if intensity <= 0.0 {
            return;
        }
        let impulse = intensity * self.params.gain;

        for (p, v) in self
            .positions
            .chunks_exact(3)
            .zip(self.velocities.chunks_exact_mut(3))
        {
            let pos = Vec3::new(p[0], p[1], p[2]);
            let len = pos.length();
            if len < DEGENERATE_RADIUS {
                continue;
            }
            let push = pos / len * impulse;
            v[0] += push.x;
            v[1] += push.y;
            v[2] += push.z;
        }
        self.dispersed = true;
        self.moving = true;
    }

    /// Pull every particle part of the way back to its rest position.
    ///
    /// Position-based, not velocity-based: a body already at rest is unchanged.
    pub fn converge(&mut self, intensity: f32) {
        let t = intensity.clamp(0.0, 1.0) * self.params.converge_rate;
        if t <= 0.0 {
            return;
        }

        for (p, r) in self.positions.iter_mut().zip(&self.rest) {
            *p += (*r - *p) * t;
        }
        if self.params.velocity_decay != 1.0 {
            let decay = self.params.velocity_decay;
            self.velocities.iter_mut().for_each(|v| *v *= decay);
        }
        self.needs_upload = true;
    }

    /// One physics step: advance positions by velocity, then damp velocity.
    ///
    /// Velocities are per-frame displacements; `delta_time <= 0` is a paused
    /// frame and moves nothing. Residual velocity below `rest_epsilon` is still
    /// applied, it just no longer flags the positions for upload. Returns
    /// whether the body is still moving.
    pub fn integrate(&mut self, delta_time: f32) -> bool {
        if delta_time <= 0.0 {
            return self.moving;
        }

        let was_moving = self.moving;
        let max_speed = integrate_kernel(&mut self.positions, &mut self.velocities, self.params.damping);
        self.moving = max_speed > self.params.rest_epsilon;
        if was_moving {
            self.needs_upload = true;
        }
        self.moving
    }

    /// Largest distance of any particle from its rest position
    pub fn max_rest_deviation(&self) -> f32 {
        self.positions
            .chunks_exact(3)
            .zip(self.rest.chunks_exact(3))
            .map(|(p, r)| Vec3::from_slice(p).distance(Vec3::from_slice(r)))
            .fold(0.0, f32::max)
    }
}

// ============================================================================
// INTEGRATION KERNELS
// ============================================================================

/// Scalar kernel. Returns the largest velocity component magnitude after damping.
pub fn integrate_scalar(positions: &mut [f32], velocities: &mut [f32], damping: f32) -> f32 {
    let mut max_speed = 0.0f32;
    for (p, v) in positions.iter_mut().zip(velocities.iter_mut()) {
        *p += *v;
        *v *= damping;
        max_speed = max_speed.max(v.abs());
    }
    max_speed
}

/// Portable SIMD kernel (requires nightly + portable_simd feature)
#[cfg(feature = "portable_simd")]
pub fn integrate_std_simd(positions: &mut [f32], velocities: &mut [f32], damping: f32) -> f32 {
    use std::simd::prelude::*;

    let len = positions.len().min(velocities.len());
    let lanes = len / 4 * 4;
    let damp = f32x4::splat(damping);
    let mut max = f32x4::splat(0.0);

    for (p, v) in positions[..lanes]
        .chunks_exact_mut(4)
        .zip(velocities[..lanes].chunks_exact_mut(4))
    {
        let pv = f32x4::from_slice(p);
        let vv = f32x4::from_slice(v);
        (pv + vv).copy_to_slice(p);
        let damped = vv * damp;
        damped.copy_to_slice(v);
        max = max.simd_max(damped.abs());
    }

    let tail = integrate_scalar(&mut positions[lanes..len], &mut velocities[lanes..len], damping);
    max.reduce_max().max(tail)
}

/// Dispatcher for the best available kernel
#[inline(always)]
pub fn integrate_kernel(positions: &mut [f32], velocities: &mut [f32], damping: f32) -> f32 {
    cfg_if::cfg_if! {
        if #[cfg(feature = "portable_simd")] {
            integrate_std_simd(positions, velocities, damping)
        } else {
            integrate_scalar(positions, velocities, damping)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::particles::shape::{fibonacci_sphere, shell_scatter};

    fn surface_body(count: usize) -> ParticleBody {
        let tuning = ParticleTuning::default();
        ParticleBody::new(
            BodyKind::Surface,
            fibonacci_sphere(count, 1.0),
            BodyParams::for_kind(BodyKind::Surface, &tuning),
        )
    }

    fn outer_body(count: usize) -> ParticleBody {
        let tuning = ParticleTuning::default();
        ParticleBody::new(
            BodyKind::Outer,
            shell_scatter(count, 1.25, 1.6, 7),
            BodyParams::for_kind(BodyKind::Outer, &tuning),
        )
    }

    #[test]
    fn test_buffers_match_count() {
        let body = surface_body(300);
        assert_eq!(body.count(), 300);
        assert_eq!(body.positions().len(), 900);
        assert_eq!(body.rest_positions().len(), body.positions().len());
        assert!(body.velocities().iter().all(|v| *v == 0.0));
        assert_eq!(body.positions_bytes().len(), 900 * 4);
    }

    #[test]
    fn test_disperse_pushes_outward() {
        let mut body = surface_body(64);
        body.disperse(1.0);
        for (p, v) in body.positions().chunks_exact(3).zip(body.velocities().chunks_exact(3)) {
            let radial = Vec3::from_slice(p).normalize();
            let vel = Vec3::from_slice(v);
            assert!(vel.dot(radial) > 0.0);
            assert!((vel.length() - body.params().gain).abs() < 1e-6);
        }
        assert!(body.is_dispersed());
    }

    #[test]
    fn test_disperse_skips_particle_at_origin() {
        let tuning = ParticleTuning::default();
        let mut body = ParticleBody::new(
            BodyKind::Surface,
            vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0],
            BodyParams::for_kind(BodyKind::Surface, &tuning),
        );
        body.disperse(0.5);
        assert_eq!(&body.velocities()[0..3], &[0.0, 0.0, 0.0]);
        assert!(body.velocities()[3] > 0.0);
    }

    #[test]
    fn test_outer_gain_exceeds_surface_gain() {
        let mut surface = surface_body(16);
        let mut outer = outer_body(16);
        surface.disperse(1.0);
        outer.disperse(1.0);
        let s = Vec3::from_slice(&surface.velocities()[0..3]).length();
        let o = Vec3::from_slice(&outer.velocities()[0..3]).length();
        assert!(o > s);
    }

    #[test]
    fn test_converge_at_rest_is_noop() {
        let mut body = surface_body(128);
        let before = body.positions().to_vec();
        for _ in 0..50 {
            body.converge(1.0);
        }
        assert_eq!(body.positions(), &before[..]);
    }

    #[test]
    fn test_converge_moves_fraction_toward_rest() {
        let tuning = ParticleTuning::default();
        let mut body = ParticleBody::new(
            BodyKind::Outer,
            vec![1.0, 0.0, 0.0],
            BodyParams::for_kind(BodyKind::Outer, &tuning),
        );
        body.disperse(1.0);
        body.integrate(1.0 / 60.0);
        let displaced = body.positions()[0];
        body.converge(0.5);
        let expected = displaced + (1.0 - displaced) * 0.5 * tuning.outer_converge_rate;
        assert!((body.positions()[0] - expected).abs() < 1e-6);
    }

    #[test]
    fn test_integrate_damps_and_comes_to_rest() {
        let mut body = surface_body(32);
        body.disperse(1.0);
        assert!(body.integrate(1.0 / 60.0));
        let mut steps = 0;
        while body.integrate(1.0 / 60.0) {
            steps += 1;
            assert!(steps < 10_000, "body never came to rest");
        }
        assert!(!body.is_moving());
    }

    #[test]
    fn test_paused_frame_moves_nothing() {
        let mut body = surface_body(32);
        body.disperse(1.0);
        let before = body.positions().to_vec();
        body.integrate(0.0);
        assert_eq!(body.positions(), &before[..]);
    }

    #[test]
    fn test_disperse_then_converge_returns_to_rest() {
        let mut surface = surface_body(500);
        let mut outer = outer_body(200);
        for _ in 0..20 {
            surface.disperse(1.0);
            outer.disperse(1.0);
            surface.integrate(1.0 / 60.0);
            outer.integrate(1.0 / 60.0);
        }
        assert!(surface.max_rest_deviation() > 0.1);

        for _ in 0..600 {
            surface.converge(1.0);
            outer.converge(1.0);
            surface.integrate(1.0 / 60.0);
            outer.integrate(1.0 / 60.0);
        }
        assert!(surface.max_rest_deviation() < 1e-3, "surface {}", surface.max_rest_deviation());
        assert!(outer.max_rest_deviation() < 1e-3, "outer {}", outer.max_rest_deviation());
    }

    #[test]
    fn test_upload_flag_round_trip() {
        let mut body = surface_body(8);
        assert!(body.needs_upload());
        body.mark_uploaded();
        body.integrate(1.0 / 60.0);
        assert!(!body.needs_upload(), "resting body needs no upload");
        body.converge(1.0);
        assert!(body.needs_upload());
    }

    #[test]
    fn test_residual_velocity_applied_after_rest() {
        let mut body = surface_body(32);
        body.disperse(1.0);
        while body.integrate(1.0) {}
        body.mark_uploaded();

        let positions = body.positions().to_vec();
        let speed: f32 = body.velocities().iter().map(|v| v.abs()).sum();
        assert!(speed > 0.0);

        assert!(!body.integrate(1.0));
        assert_ne!(body.positions(), &positions[..], "sub-epsilon velocity must still move");
        let damped: f32 = body.velocities().iter().map(|v| v.abs()).sum();
        assert!(damped < speed);
        assert!(!body.needs_upload(), "resting drift is not uploaded");
    }

    #[test]
    fn test_scalar_kernel_handles_tail() {
        let mut p = vec![0.0; 7];
        let mut v = vec![1.0; 7];
        let max = integrate_scalar(&mut p, &mut v, 0.5);
        assert!(p.iter().all(|x| *x == 1.0));
        assert!(v.iter().all(|x| *x == 0.5));
        assert_eq!(max, 0.5);
    }
}
