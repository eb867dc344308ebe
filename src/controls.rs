//! Scalar controls driven by gestures and host input: zoom, yaw spin and
//! head parallax.
//!
//! Each control is a small value type updated once per frame and clamped so
//! accumulated deltas cannot run away.

use glam::Vec2;

use crate::gesture::{PinchState, WaveState};
use crate::landmarks::FaceAnchors;
use crate::math::{approach, lerp};
use crate::tuning::ControlTuning;

/// Largest yaw change per frame a wave can build up (radians)
const MAX_YAW_SPEED: f32 = 0.2;

// ============================================================================
// ZOOM
// ============================================================================

/// Uniform scene scale from pinch-distance changes and scroll input
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomControl {
    scale: f32,
    min: f32,
    max: f32,
    pinch_gain: f32,
    scroll_gain: f32,
    /// Pinch distance last frame, while a pinch is held
    last_pinch: Option<f32>,
}

impl ZoomControl {
    pub fn new(tuning: &ControlTuning) -> Self {
        Self {
            scale: 1.0f32.clamp(tuning.min_scale, tuning.max_scale),
            min: tuning.min_scale,
            max: tuning.max_scale,
            pinch_gain: tuning.pinch_zoom_gain,
            scroll_gain: tuning.scroll_zoom_gain,
            last_pinch: None,
        }
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Follow the change in pinch distance while a pinch is held.
    ///
    /// Releasing the pinch forgets the reference distance so the next pinch
    /// starts without a jump.
    pub fn apply_pinch(&mut self, pinch: Option<&PinchState>) {
        match pinch.filter(|p| p.is_pinching) {
            Some(p) => {
                if let Some(last) = self.last_pinch {
                    self.set_scale(self.scale + (p.distance - last) * self.pinch_gain);
                }
                self.last_pinch = Some(p.distance);
            }
            None => self.last_pinch = None,
        }
    }

    /// Wheel input; positive `delta_y` (scroll down) zooms out
    pub fn scroll(&mut self, delta_y: f32) {
        if delta_y.is_finite() {
            self.set_scale(self.scale - delta_y * self.scroll_gain);
        }
    }

    fn set_scale(&mut self, scale: f32) {
        self.scale = scale.clamp(self.min, self.max);
    }
}

// ============================================================================
// YAW
// ============================================================================

/// Accumulated yaw rotation with a wave-driven spin that decays when idle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YawControl {
    rotation: f32,
    speed: f32,
    decay: f32,
    gain: f32,
    idle_spin: f32,
    driven: bool,
}

impl YawControl {
    pub fn new(tuning: &ControlTuning) -> Self {
        Self {
            rotation: 0.0,
            speed: 0.0,
            decay: tuning.yaw_decay,
            gain: tuning.wave_yaw_gain,
            idle_spin: tuning.idle_spin,
            driven: false,
        }
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Add a spin impulse in the wave's direction
    pub fn drive(&mut self, wave: &WaveState) {
        if !wave.is_waving {
            return;
        }
        self.speed = (self.speed + wave.direction * wave.velocity * self.gain)
            .clamp(-MAX_YAW_SPEED, MAX_YAW_SPEED);
        self.driven = true;
    }

    /// Advance one frame and return the new rotation
    pub fn step(&mut self) -> f32 {
        self.rotation = (self.rotation + self.speed + self.idle_spin) % std::f32::consts::TAU;
        if !self.driven {
            self.speed *= self.decay;
        }
        self.driven = false;
        self.rotation
    }
}

// ============================================================================
// PARALLAX
// ============================================================================

/// Camera offset and roll following the user's head
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Parallax {
    offset: Vec2,
    roll: f32,
    strength: f32,
    smoothing: f32,
}

impl Parallax {
    pub fn new(tuning: &ControlTuning) -> Self {
        Self {
            offset: Vec2::ZERO,
            roll: 0.0,
            strength: tuning.parallax_strength,
            smoothing: tuning.parallax_smoothing,
        }
    }

    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    pub fn roll(&self) -> f32 {
        self.roll
    }

    /// Ease toward the head's position; with no face, ease back to center
    pub fn update(&mut self, face: Option<&FaceAnchors>) {
        let (target, roll) = match face {
            Some(f) => ((Vec2::splat(0.5) - f.nose.truncate()) * self.strength, f.roll()),
            None => (Vec2::ZERO, 0.0),
        };
        self.offset = approach(self.offset, target, self.smoothing);
        self.roll = lerp(self.roll, roll, self.smoothing);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn pinch(distance: f32) -> PinchState {
        PinchState {
            is_pinching: true,
            distance,
        }
    }

    #[test]
    fn test_zoom_follows_pinch_delta() {
        let tuning = ControlTuning::default();
        let mut zoom = ZoomControl::new(&tuning);
        zoom.apply_pinch(Some(&pinch(0.02)));
        assert_eq!(zoom.scale(), 1.0, "first pinch frame only sets the reference");
        zoom.apply_pinch(Some(&pinch(0.05)));
        assert!((zoom.scale() - (1.0 + 0.03 * tuning.pinch_zoom_gain)).abs() < 1e-5);
    }

    #[test]
    fn test_zoom_release_forgets_reference() {
        let mut zoom = ZoomControl::new(&ControlTuning::default());
        zoom.apply_pinch(Some(&pinch(0.01)));
        zoom.apply_pinch(None);
        zoom.apply_pinch(Some(&pinch(0.05)));
        assert_eq!(zoom.scale(), 1.0);
    }

    #[test]
    fn test_zoom_clamped() {
        let tuning = ControlTuning::default();
        let mut zoom = ZoomControl::new(&tuning);
        zoom.scroll(-1.0e6);
        assert_eq!(zoom.scale(), tuning.max_scale);
        zoom.scroll(1.0e6);
        assert_eq!(zoom.scale(), tuning.min_scale);
        zoom.scroll(f32::NAN);
        assert_eq!(zoom.scale(), tuning.min_scale);
    }

    #[test]
    fn test_yaw_decays_when_not_driven() {
        let tuning = ControlTuning {
            idle_spin: 0.0,
            ..Default::default()
        };
        let mut yaw = YawControl::new(&tuning);
        yaw.drive(&WaveState {
            is_waving: true,
            velocity: 1.0,
            direction: -1.0,
        });
        yaw.step();
        let speed = yaw.speed();
        assert!(speed < 0.0);
        yaw.step();
        assert!((yaw.speed() - speed * tuning.yaw_decay).abs() < 1e-7);
    }

    #[test]
    fn test_yaw_speed_clamped() {
        let mut yaw = YawControl::new(&ControlTuning::default());
        for _ in 0..100 {
            yaw.drive(&WaveState {
                is_waving: true,
                velocity: 50.0,
                direction: 1.0,
            });
        }
        assert_eq!(yaw.speed(), MAX_YAW_SPEED);
    }

    #[test]
    fn test_parallax_eases_toward_head_and_back() {
        let tuning = ControlTuning::default();
        let mut parallax = Parallax::new(&tuning);
        let face = FaceAnchors {
            nose: Vec3::new(0.3, 0.5, 0.0),
            forehead: Vec2::new(0.3, 0.3),
        };
        for _ in 0..200 {
            parallax.update(Some(&face));
        }
        assert!((parallax.offset().x - 0.2 * tuning.parallax_strength).abs() < 1e-4);
        assert!(parallax.offset().y.abs() < 1e-4);

        for _ in 0..200 {
            parallax.update(None);
        }
        assert!(parallax.offset().length() < 1e-4);
    }
}
