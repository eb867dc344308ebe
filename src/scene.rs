//! Frame orchestration: one call per rendered frame turns hand and face input
//! into gesture effects, lifecycle transitions and a physics step.
//!
//! Order within a frame is fixed: classify, route gesture effects, evaluate
//! the lifecycle, then integrate every live body exactly once. Routing before
//! integration makes a gesture visible in the same frame it is detected.

use glam::Vec2;
use serde::Serialize;

use crate::celestial::{CelestialObject, ObjectFactory, ObjectRole, ObjectSnapshot};
use crate::controls::{Parallax, ZoomControl};
use crate::gesture::{GestureEngine, GestureLabel, GestureState, HandGesture, PinchState};
use crate::landmarks::{FaceAnchors, HandSide, HandsFrame};
use crate::lifecycle::{DualController, LifecycleState};
use crate::tuning::Tuning;

/// Everything the host supplies for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameInput {
    pub hands: HandsFrame,
    pub face: Option<FaceAnchors>,
    /// Frame step passed to the particle integrator; <= 0 pauses physics
    pub delta_time: f32,
    /// Host wall-clock time (ms), drives wave velocity and the merge clock
    pub now_ms: f64,
}

/// Render-facing result of one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameOutput {
    pub frame: u64,
    pub gesture: GestureState,
    pub label: GestureLabel,
    pub label_text: &'static str,
    pub lifecycle: LifecycleState,
    pub cooldown: u32,
    /// Linear merge progress while merging
    pub merge_progress: Option<f32>,
    pub zoom: f32,
    pub camera_offset: Vec2,
    pub head_roll: f32,
    pub objects: Vec<ObjectSnapshot>,
}

/// Gesture effects applied to one object this frame
fn apply_hand(object: &mut CelestialObject, hand: &HandGesture) {
    if !hand.detected {
        return;
    }
    // A hand can read as both grasping and open; both effects apply
    if hand.grasping {
        object.converge(hand.grasp_intensity());
    }
    if hand.open {
        object.disperse(hand.open_intensity());
    }
    object.yaw_mut().drive(&hand.wave);
}

/// Pinch that drives zoom in single mode: left hand first
fn zoom_pinch(gesture: &GestureState) -> Option<&PinchState> {
    HandSide::ALL
        .iter()
        .map(|&side| &gesture.hand(side).pinch)
        .find(|p| p.is_pinching)
}

#[derive(Debug)]
pub struct Scene {
    engine: GestureEngine,
    primary: CelestialObject,
    lifecycle: DualController,
    zoom: ZoomControl,
    parallax: Parallax,
    /// Last frame's gesture, source of the pair distance delta
    previous: Option<GestureState>,
    frame: u64,
}

impl Scene {
    pub fn new(tuning: Tuning) -> Self {
        let factory = ObjectFactory::new(tuning.particles.clone(), tuning.controls.clone());
        Self {
            engine: GestureEngine::new(tuning.gesture.clone()),
            primary: factory.build(ObjectRole::Primary),
            lifecycle: DualController::new(tuning.lifecycle.clone(), factory),
            zoom: ZoomControl::new(&tuning.controls),
            parallax: Parallax::new(&tuning.controls),
            previous: None,
            frame: 0,
        }
    }

    pub fn lifecycle_state(&self) -> LifecycleState {
        self.lifecycle.state()
    }

    pub fn lifecycle(&self) -> &DualController {
        &self.lifecycle
    }

    pub fn primary(&self) -> &CelestialObject {
        &self.primary
    }

    pub fn zoom(&self) -> f32 {
        self.zoom.scale()
    }

    pub fn previous_gesture(&self) -> Option<&GestureState> {
        self.previous.as_ref()
    }

    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    /// Mouse wheel zoom
    pub fn scroll(&mut self, delta_y: f32) {
        self.zoom.scroll(delta_y);
    }

    /// Live objects in draw order: primary, then secondaries when present
    pub fn objects(&self) -> impl Iterator<Item = &CelestialObject> {
        std::iter::once(&self.primary).chain(self.lifecycle.secondaries().into_iter().flatten())
    }

    /// Live object by draw-order index
    pub fn object_mut(&mut self, index: usize) -> Option<&mut CelestialObject> {
        match index {
            0 => Some(&mut self.primary),
            i => self.lifecycle.secondaries_mut()?.get_mut(i - 1),
        }
    }

    /// Run one frame
    pub fn step(&mut self, input: &FrameInput) -> FrameOutput {
        let previous_distance = self.previous.as_ref().and_then(GestureState::previous_distance);
        let gesture = self.engine.classify(&input.hands, previous_distance, input.now_ms);

        self.route(&gesture);

        let state = self.lifecycle.evaluate(&gesture, &mut self.primary, input.now_ms);

        self.parallax.update(input.face.as_ref());
        self.primary.integrate(input.delta_time);
        if let Some(objects) = self.lifecycle.secondaries_mut() {
            for obj in objects.iter_mut() {
                obj.integrate(input.delta_time);
            }
        }

        self.frame += 1;
        self.previous = Some(gesture);

        let label = GestureLabel::select(&gesture);
        FrameOutput {
            frame: self.frame,
            gesture,
            label,
            label_text: label.as_str(),
            lifecycle: state,
            cooldown: self.lifecycle.cooldown(),
            merge_progress: self.lifecycle.merge().map(|m| m.progress),
            zoom: self.zoom.scale(),
            camera_offset: self.parallax.offset(),
            head_roll: self.parallax.roll(),
            objects: self.objects().map(CelestialObject::snapshot).collect(),
        }
    }

    fn route(&mut self, gesture: &GestureState) {
        match (self.lifecycle.state(), self.lifecycle.secondaries_mut()) {
            (LifecycleState::Dual, Some(objects)) => {
                for side in HandSide::ALL {
                    let hand = gesture.hand(side);
                    let object = &mut objects[side.index()];
                    apply_hand(object, hand);
                    object.zoom_mut().apply_pinch(Some(&hand.pinch));
                }
                self.zoom.apply_pinch(None);
                log::debug!("Routed gestures to dual objects");
            }
            _ => {
                for side in HandSide::ALL {
                    apply_hand(&mut self.primary, gesture.hand(side));
                }
                self.zoom.apply_pinch(zoom_pinch(gesture));
            }
        }
    }
}
