//! `#[wasm_bindgen]` surface for the JS host.
//!
//! The host pushes tracker output with `set_hands` / `set_face`, calls
//! `step_frame` once per animation frame, and reads particle buffers back for
//! upload. All functions are no-ops (or return empty values) before `init`.

use wasm_bindgen::prelude::*;

use crate::landmarks::{FaceAnchors, HandsFrame};
use crate::state::{initialize_app_state, with_app_state, with_app_state_mut};
use crate::tuning::Tuning;

fn not_initialized() -> JsValue {
    JsValue::from_str("call init() first")
}

fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

/// Set up logging and build the scene from an optional JSON tuning preset
#[wasm_bindgen]
pub fn init(tuning_json: Option<String>) -> Result<(), JsValue> {
    // Set up panic hook for better error messages in browser console
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();

    let tuning = match tuning_json {
        Some(json) => Tuning::from_json(&json)
            .map_err(|e| JsValue::from_str(&format!("Invalid tuning: {}", e)))?,
        None => Tuning::default(),
    };
    initialize_app_state(tuning);
    log::info!("Celestial hands initialized");
    Ok(())
}

/// Replace the current hands with the tracker's latest output.
///
/// `landmarks` holds `21 * 3` floats per hand, `labels` the tracker's raw
/// handedness per hand. A malformed frame is dropped and counts as no hands.
#[wasm_bindgen]
pub fn set_hands(landmarks: &[f32], labels: Vec<String>) {
    let hands = HandsFrame::from_tracker(landmarks, &labels).unwrap_or_else(|e| {
        log::warn!("Rejected hand frame: {}", e);
        HandsFrame::default()
    });
    with_app_state_mut(|state| state.hands = hands);
}

/// Replace the current face with a flat face mesh
#[wasm_bindgen]
pub fn set_face(landmarks: &[f32]) {
    let face = FaceAnchors::from_flat(landmarks)
        .inspect_err(|e| log::warn!("Rejected face frame: {}", e))
        .ok();
    with_app_state_mut(|state| state.face = face);
}

#[wasm_bindgen]
pub fn clear_face() {
    with_app_state_mut(|state| state.face = None);
}

/// Mouse wheel zoom
#[wasm_bindgen]
pub fn scroll(delta_y: f32) {
    with_app_state_mut(|state| state.scene.scroll(delta_y));
}

/// Run one frame and return its `FrameOutput` as a JS object
#[wasm_bindgen]
pub fn step_frame(delta_ms: f32) -> Result<JsValue, JsValue> {
    let now = now_ms();
    with_app_state_mut(|state| {
        let output = state.step(delta_ms / 1000.0, now);
        serde_wasm_bindgen::to_value(output).map_err(JsValue::from)
    })
    .unwrap_or_else(|| Err(not_initialized()))
}

/// Live surface positions of object `index` (0 = primary, 1/2 = secondaries)
#[wasm_bindgen]
pub fn surface_positions(index: usize) -> Vec<f32> {
    with_app_state(|state| {
        state
            .scene
            .objects()
            .nth(index)
            .map(|obj| obj.surface.positions().to_vec())
    })
    .flatten()
    .unwrap_or_default()
}

#[wasm_bindgen]
pub fn outer_positions(index: usize) -> Vec<f32> {
    with_app_state(|state| {
        state
            .scene
            .objects()
            .nth(index)
            .map(|obj| obj.outer.positions().to_vec())
    })
    .flatten()
    .unwrap_or_default()
}

/// Clear both upload flags of object `index` after the host copied its buffers
#[wasm_bindgen]
pub fn mark_uploaded(index: usize) {
    with_app_state_mut(|state| {
        if let Some(obj) = state.scene.object_mut(index) {
            obj.surface.mark_uploaded();
            obj.outer.mark_uploaded();
        }
    });
}

/// "SINGLE", "DUAL" or "MERGING"
#[wasm_bindgen]
pub fn lifecycle_name() -> String {
    with_app_state(|state| state.scene.lifecycle_state().as_str().to_string())
        .unwrap_or_default()
}

/// Status text for the last frame's gesture
#[wasm_bindgen]
pub fn gesture_label() -> String {
    with_app_state(|state| {
        state
            .last_output
            .as_ref()
            .map(|o| o.label_text.to_string())
    })
    .flatten()
    .unwrap_or_default()
}

/// Export the active tuning as JSON
#[wasm_bindgen]
pub fn export_tuning() -> String {
    with_app_state(|state| {
        state.tuning.to_json_string().unwrap_or_else(|e| {
            log::error!("Failed to export tuning: {}", e);
            String::from("{}")
        })
    })
    .unwrap_or_else(|| String::from("{}"))
}
