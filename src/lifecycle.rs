//! Single/dual object lifecycle: spawning a pair of secondary objects when
//! both hands appear, and the animated merge back to one.
//!
//! Every transition is a total function of state, trigger and cooldown.
//! Illegal transitions (spawn while dual, merge while not dual) are silent
//! no-ops because held gestures re-trigger them every frame.

use glam::Vec3;
use serde::Serialize;

use crate::celestial::{CelestialObject, ObjectFactory, ObjectRole};
use crate::gesture::GestureState;
use crate::math::ease_out_cubic;
use crate::tuning::LifecycleTuning;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LifecycleState {
    Single,
    Dual,
    Merging,
}

impl LifecycleState {
    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleState::Single => "SINGLE",
            LifecycleState::Dual => "DUAL",
            LifecycleState::Merging => "MERGING",
        }
    }
}

/// Merge animation clock.
///
/// Immutable value type: `advance` returns the transition at a new time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MergeTransition {
    /// Host time the merge began (ms)
    pub started_ms: f64,
    pub duration_ms: f64,
    /// Linear progress in [0, 1]
    pub progress: f32,
    /// Horizontal position of each secondary when the merge began
    pub start_offsets: [f32; 2],
}

impl MergeTransition {
    pub fn new(started_ms: f64, duration_ms: f64, start_offsets: [f32; 2]) -> Self {
        Self {
            started_ms,
            duration_ms,
            progress: 0.0,
            start_offsets,
        }
    }

    /// The transition as of host time `now_ms`
    pub fn advance(self, now_ms: f64) -> MergeTransition {
        let elapsed = (now_ms - self.started_ms).max(0.0);
        let progress = if self.duration_ms > 0.0 {
            (elapsed / self.duration_ms).min(1.0) as f32
        } else {
            1.0
        };
        MergeTransition { progress, ..self }
    }

    pub fn eased(&self) -> f32 {
        ease_out_cubic(self.progress)
    }

    pub fn is_complete(&self) -> bool {
        self.progress >= 1.0
    }

    /// Horizontal position of secondary `index` at the current progress
    pub fn offset(&self, index: usize) -> f32 {
        self.start_offsets[index] * (1.0 - self.eased())
    }

    /// Secondary scale: grows from `secondary_scale` toward 1 as it eases in,
    /// while shrinking overall by up to `shrink`
    pub fn scale(&self, secondary_scale: f32, shrink: f32) -> f32 {
        let grow = secondary_scale + (1.0 - secondary_scale) * self.eased();
        grow * (1.0 - self.progress * shrink)
    }
}

/// Owns the secondary pair and decides when to spawn and merge
#[derive(Debug, Clone)]
pub struct DualController {
    tuning: LifecycleTuning,
    factory: ObjectFactory,
    state: LifecycleState,
    /// Frames before another spawn or hand-loss merge may trigger
    cooldown: u32,
    merge: Option<MergeTransition>,
    /// [left, right] while dual or merging
    secondaries: Option<Box<[CelestialObject; 2]>>,
}

impl DualController {
    pub fn new(tuning: LifecycleTuning, factory: ObjectFactory) -> Self {
        Self {
            tuning,
            factory,
            state: LifecycleState::Single,
            cooldown: 0,
            merge: None,
            secondaries: None,
        }
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn cooldown(&self) -> u32 {
        self.cooldown
    }

    pub fn merge(&self) -> Option<&MergeTransition> {
        self.merge.as_ref()
    }

    pub fn secondaries(&self) -> Option<&[CelestialObject; 2]> {
        self.secondaries.as_deref()
    }

    pub fn secondaries_mut(&mut self) -> Option<&mut [CelestialObject; 2]> {
        self.secondaries.as_deref_mut()
    }

    /// Count down one frame, floored at zero
    pub fn tick_cooldown(&mut self) {
        self.cooldown = self.cooldown.saturating_sub(1);
    }

    /// Enter dual mode. No-op unless single and off cooldown.
    pub fn try_spawn(&mut self, primary: &mut CelestialObject) -> bool {
        if self.state != LifecycleState::Single || self.cooldown > 0 {
            return false;
        }

        let offset = self.tuning.secondary_offset;
        let mut left = self.factory.build(ObjectRole::SecondaryLeft);
        let mut right = self.factory.build(ObjectRole::SecondaryRight);
        left.set_position(Vec3::new(-offset, 0.0, 0.0));
        right.set_position(Vec3::new(offset, 0.0, 0.0));
        left.set_scale(self.tuning.secondary_scale);
        right.set_scale(self.tuning.secondary_scale);

        self.secondaries = Some(Box::new([left, right]));
        primary.set_visible(false);
        self.cooldown = self.tuning.spawn_cooldown_frames;
        self.state = LifecycleState::Dual;
        log::info!("Spawned dual objects (cooldown {} frames)", self.cooldown);
        true
    }

    /// Start the merge animation. No-op unless dual.
    pub fn try_merge(&mut self, now_ms: f64) -> bool {
        if self.state != LifecycleState::Dual {
            return false;
        }
        let start_offsets = match self.secondaries() {
            Some([l, r]) => [l.transform().position.x, r.transform().position.x],
            None => [0.0, 0.0],
        };
        self.merge = Some(MergeTransition::new(
            now_ms,
            self.tuning.merge_duration_ms,
            start_offsets,
        ));
        self.state = LifecycleState::Merging;
        log::info!("Merging dual objects");
        true
    }

    /// Step the merge animation to `now_ms`; completes it when progress hits 1
    pub fn advance(&mut self, now_ms: f64, primary: &mut CelestialObject) -> LifecycleState {
        let Some(merge) = self.merge.map(|m| m.advance(now_ms)) else {
            return self.state;
        };
        self.merge = Some(merge);

        if let Some(objects) = self.secondaries.as_deref_mut() {
            for (i, obj) in objects.iter_mut().enumerate() {
                obj.set_position(Vec3::new(merge.offset(i), 0.0, 0.0));
                obj.set_scale(merge.scale(self.tuning.secondary_scale, self.tuning.merge_shrink));
            }
        }

        if merge.is_complete() {
            self.secondaries = None;
            self.merge = None;
            primary.set_visible(true);
            primary.set_scale(1.0);
            self.state = LifecycleState::Single;
            log::info!("Merge complete");
        }
        self.state
    }

    /// Per-frame evaluation: cooldown, spawn and merge triggers, then the
    /// merge animation step
    pub fn evaluate(
        &mut self,
        gesture: &GestureState,
        primary: &mut CelestialObject,
        now_ms: f64,
    ) -> LifecycleState {
        self.tick_cooldown();

        match self.state {
            LifecycleState::Single if gesture.pair.detected => {
                self.try_spawn(primary);
            }
            LifecycleState::Dual => {
                let grasped = gesture.pair.grasping;
                let hands_lost = !gesture.pair.detected && self.cooldown == 0;
                if grasped || hands_lost {
                    log::debug!("Merge trigger: grasp={} hands_lost={}", grasped, hands_lost);
                    self.try_merge(now_ms);
                }
            }
            _ => {}
        }

        self.advance(now_ms, primary)
    }
}
