//! Application state for the wasm bindings, using context passing.
//!
//! 1. `AppState` holds the scene plus the latest host input
//! 2. Core logic (`Scene::step` and below) takes explicit references
//! 3. The bindings in `bridge` are thin wrappers that reach the state
//!    through `with_app_state(_mut)`
//!
//! Everything below this module can be unit tested without global state.

use std::cell::RefCell;

use crate::landmarks::{FaceAnchors, HandsFrame};
use crate::scene::{FrameInput, FrameOutput, Scene};
use crate::tuning::Tuning;

pub struct AppState {
    pub scene: Scene,
    /// Tuning the scene was built from, for export
    pub tuning: Tuning,
    /// Latest hands from the tracker; replaced whenever the host pushes a frame
    pub hands: HandsFrame,
    pub face: Option<FaceAnchors>,
    pub last_output: Option<FrameOutput>,
}

impl AppState {
    pub fn new(tuning: Tuning) -> Self {
        Self {
            scene: Scene::new(tuning.clone()),
            tuning,
            hands: HandsFrame::default(),
            face: None,
            last_output: None,
        }
    }

    /// Run one frame against the most recent input
    pub fn step(&mut self, delta_time: f32, now_ms: f64) -> &FrameOutput {
        let input = FrameInput {
            hands: self.hands,
            face: self.face,
            delta_time,
            now_ms,
        };
        self.last_output.insert(self.scene.step(&input))
    }
}

// Global state access, thin wrapper for WASM bindings only
thread_local! {
    static APP_STATE: RefCell<Option<AppState>> = const { RefCell::new(None) };
}

/// Execute a closure with immutable access to AppState
///
/// Returns None if AppState is not initialized
pub fn with_app_state<F, R>(f: F) -> Option<R>
where
    F: FnOnce(&AppState) -> R,
{
    APP_STATE.with(|state| {
        let borrowed = state.borrow();
        borrowed.as_ref().map(f)
    })
}

/// Execute a closure with mutable access to AppState
///
/// Returns None if AppState is not initialized
pub fn with_app_state_mut<F, R>(f: F) -> Option<R>
where
    F: FnOnce(&mut AppState) -> R,
{
    APP_STATE.with(|state| {
        let mut borrowed = state.borrow_mut();
        borrowed.as_mut().map(f)
    })
}

/// Initialize (or reset) the global AppState
pub fn initialize_app_state(tuning: Tuning) {
    APP_STATE.with(|state| {
        *state.borrow_mut() = Some(AppState::new(tuning));
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::test_support::synthetic_hand;
    use crate::lifecycle::LifecycleState;
    use crate::tuning::ParticleTuning;

    fn small() -> Tuning {
        Tuning {
            particles: ParticleTuning {
                surface_count: 50,
                outer_count: 10,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_uninitialized_state_is_none() {
        APP_STATE.with(|s| *s.borrow_mut() = None);
        assert!(with_app_state(|s| s.scene.frame_count()).is_none());
    }

    #[test]
    fn test_held_input_reused_each_frame() {
        initialize_app_state(small());
        with_app_state_mut(|s| {
            s.hands.left = Some(synthetic_hand(0.2, 0.5));
            s.hands.right = Some(synthetic_hand(0.8, 0.5));
            s.step(1.0, 0.0);
            s.step(1.0, 16.0);
        });
        let state = with_app_state(|s| s.last_output.as_ref().map(|o| (o.frame, o.lifecycle)));
        assert_eq!(state, Some(Some((2, LifecycleState::Dual))));
    }
}
