//! Celestial objects: a surface body plus an outer shell, a transform and a
//! dispersion amount. This is the unit gestures act on.

use glam::Vec3;
use serde::Serialize;

use crate::controls::{YawControl, ZoomControl};
use crate::particles::{fibonacci_sphere, shell_scatter, BodyKind, BodyParams, ParticleBody};
use crate::tuning::{ControlTuning, ParticleTuning};

/// Opacity lost at full dispersion, as a fraction of the base opacity
const DISPERSED_FADE: f32 = 0.5;

/// Which object this is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ObjectRole {
    Primary,
    SecondaryLeft,
    SecondaryRight,
}

impl ObjectRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectRole::Primary => "primary",
            ObjectRole::SecondaryLeft => "secondary-left",
            ObjectRole::SecondaryRight => "secondary-right",
        }
    }

    /// Base opacity each role is drawn with
    fn base_opacity(self) -> f32 {
        match self {
            ObjectRole::Primary => 1.0,
            ObjectRole::SecondaryLeft | ObjectRole::SecondaryRight => 0.9,
        }
    }
}

/// Position, Euler rotation (radians) and non-negative uniform scale
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: 1.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CelestialObject {
    role: ObjectRole,
    pub surface: ParticleBody,
    pub outer: ParticleBody,
    transform: Transform,
    visible: bool,
    /// How far the particles have been pushed from rest, in [0, 1]
    dispersion: f32,
    base_opacity: f32,
    yaw: YawControl,
    /// Pinch zoom layered over the base scale while this object has its own hand
    zoom: ZoomControl,
    disperse_step: f32,
    converge_step: f32,
}

impl CelestialObject {
    pub fn new(role: ObjectRole, particles: &ParticleTuning, controls: &ControlTuning) -> Self {
        let surface = ParticleBody::new(
            BodyKind::Surface,
            fibonacci_sphere(particles.surface_count, particles.surface_radius),
            BodyParams::for_kind(BodyKind::Surface, particles),
        );
        // Each role gets its own scatter so secondaries don't look cloned
        let seed = particles.seed.wrapping_add(role as u64);
        let outer = ParticleBody::new(
            BodyKind::Outer,
            shell_scatter(
                particles.outer_count,
                particles.outer_inner_radius,
                particles.outer_outer_radius,
                seed,
            ),
            BodyParams::for_kind(BodyKind::Outer, particles),
        );

        Self {
            role,
            surface,
            outer,
            transform: Transform::default(),
            visible: true,
            dispersion: 0.0,
            base_opacity: role.base_opacity(),
            yaw: YawControl::new(controls),
            zoom: ZoomControl::new(controls),
            disperse_step: particles.disperse_step,
            converge_step: particles.converge_step,
        }
    }

    pub fn role(&self) -> ObjectRole {
        self.role
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.transform.position = position;
    }

    /// Base scale, owned by the lifecycle
    pub fn set_scale(&mut self, scale: f32) {
        self.transform.scale = scale.max(0.0);
    }

    /// Scale drawn with: base scale times this object's pinch zoom
    pub fn effective_scale(&self) -> f32 {
        self.transform.scale * self.zoom.scale()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn dispersion(&self) -> f32 {
        self.dispersion
    }

    /// Drawn opacity: fades as the object disperses
    pub fn opacity(&self) -> f32 {
        self.base_opacity * (1.0 - DISPERSED_FADE * self.dispersion)
    }

    pub fn yaw(&self) -> &YawControl {
        &self.yaw
    }

    pub fn yaw_mut(&mut self) -> &mut YawControl {
        &mut self.yaw
    }

    pub fn zoom(&self) -> &ZoomControl {
        &self.zoom
    }

    pub fn zoom_mut(&mut self) -> &mut ZoomControl {
        &mut self.zoom
    }

    /// Blow both bodies apart; `intensity` in (0, 1]
    pub fn disperse(&mut self, intensity: f32) {
        let intensity = intensity.clamp(0.0, 1.0);
        if intensity <= 0.0 {
            return;
        }
        self.surface.disperse(intensity);
        self.outer.disperse(intensity);
        self.dispersion = (self.dispersion + intensity * self.disperse_step).min(1.0);
    }

    /// Pull both bodies back toward their rest shape
    pub fn converge(&mut self, intensity: f32) {
        let intensity = intensity.clamp(0.0, 1.0);
        self.surface.converge(intensity);
        self.outer.converge(intensity);
        self.dispersion = (self.dispersion - intensity * self.converge_step).max(0.0);
        if self.dispersion == 0.0 {
            self.surface.clear_dispersed();
            self.outer.clear_dispersed();
        }
    }

    /// Per-frame physics and spin. Returns whether either body is still moving.
    ///
    /// Hidden objects keep their physics running but do not spin.
    pub fn integrate(&mut self, delta_time: f32) -> bool {
        if self.visible {
            self.transform.rotation.y = self.yaw.step();
        }
        let surface_moving = self.surface.integrate(delta_time);
        let outer_moving = self.outer.integrate(delta_time);
        surface_moving || outer_moving
    }

    pub fn snapshot(&self) -> ObjectSnapshot {
        ObjectSnapshot {
            role: self.role,
            transform: Transform {
                scale: self.effective_scale(),
                ..self.transform
            },
            visible: self.visible,
            opacity: self.opacity(),
            dispersion: self.dispersion,
            surface_needs_upload: self.surface.needs_upload(),
            outer_needs_upload: self.outer.needs_upload(),
        }
    }
}

/// Render-facing view of one object for a frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectSnapshot {
    pub role: ObjectRole,
    pub transform: Transform,
    pub visible: bool,
    pub opacity: f32,
    pub dispersion: f32,
    pub surface_needs_upload: bool,
    pub outer_needs_upload: bool,
}

/// Builds objects from the active tuning
#[derive(Debug, Clone)]
pub struct ObjectFactory {
    particles: ParticleTuning,
    controls: ControlTuning,
}

impl ObjectFactory {
    pub fn new(particles: ParticleTuning, controls: ControlTuning) -> Self {
        Self {
            particles,
            controls,
        }
    }

    pub fn build(&self, role: ObjectRole) -> CelestialObject {
        CelestialObject::new(role, &self.particles, &self.controls)
    }
}
