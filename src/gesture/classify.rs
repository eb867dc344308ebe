//! Per-frame gesture classification from hand landmarks.
//!
//! Everything here is a pure function of the current landmark sets, the
//! previous frame's hand-pair distance and the palm history.

use glam::Vec3;
use serde::Serialize;

use super::history::{HandHistory, PalmSample, VelocityEstimate};
use crate::landmarks::{Finger, HandLandmarkSet, HandSide, HandsFrame, INDEX_TIP, THUMB_TIP, WRIST};
use crate::tuning::GestureTuning;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PinchState {
    pub is_pinching: bool,
    /// 3D thumb-tip to index-tip distance
    pub distance: f32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WaveState {
    pub is_waving: bool,
    pub velocity: f32,
    pub direction: f32,
}

/// Gesture reading for one hand
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HandGesture {
    pub detected: bool,
    pub pinch: PinchState,
    pub wave: WaveState,
    pub grasping: bool,
    pub open: bool,
    /// Fingers counted as curled (0-4)
    pub curled_fingers: u8,
    /// Fingers counted as extended (0-4)
    pub extended_fingers: u8,
    pub palm_center: Vec3,
}

impl HandGesture {
    /// Converge strength while grasping, in (0, 1]
    pub fn grasp_intensity(&self) -> f32 {
        self.curled_fingers as f32 / Finger::ALL.len() as f32
    }

    /// Disperse strength while open, in (0, 1]
    pub fn open_intensity(&self) -> f32 {
        self.extended_fingers as f32 / Finger::ALL.len() as f32
    }
}

/// Gesture reading for the pair of hands
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PairGesture {
    /// Both hands are present
    pub detected: bool,
    pub same_location: bool,
    pub spreading: bool,
    pub converging: bool,
    pub grasping: bool,
}

/// Snapshot of every gesture for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GestureState {
    pub left: HandGesture,
    pub right: HandGesture,
    pub pair: PairGesture,
    /// 2D palm-center distance; 0 unless both hands are present
    pub hands_distance: f32,
}

impl GestureState {
    pub fn hand(&self, side: HandSide) -> &HandGesture {
        match side {
            HandSide::Left => &self.left,
            HandSide::Right => &self.right,
        }
    }

    /// Distance to feed the next frame's spread/converge check, if one exists
    pub fn previous_distance(&self) -> Option<f32> {
        self.pair.detected.then_some(self.hands_distance)
    }

    pub fn any_hand(&self, f: impl Fn(&HandGesture) -> bool) -> bool {
        f(&self.left) || f(&self.right)
    }
}

// ============================================================================
// SINGLE-HAND CHECKS
// ============================================================================

pub fn classify_pinch(set: &HandLandmarkSet, tuning: &GestureTuning) -> PinchState {
    let distance = set.point(THUMB_TIP).distance(set.point(INDEX_TIP));
    PinchState {
        is_pinching: distance < tuning.pinch_threshold,
        distance,
    }
}

/// Fingers whose tip is closer to the wrist than `ratio` times the base knuckle
pub fn curled_fingers(set: &HandLandmarkSet, ratio: f32) -> u8 {
    Finger::ALL
        .iter()
        .filter(|f| set.distance_2d(f.tip(), WRIST) < ratio * set.distance_2d(f.base(), WRIST))
        .count() as u8
}

/// Fingers whose tip is farther from the wrist than `ratio` times the PIP joint
pub fn extended_fingers(set: &HandLandmarkSet, ratio: f32) -> u8 {
    Finger::ALL
        .iter()
        .filter(|f| set.distance_2d(f.tip(), WRIST) > ratio * set.distance_2d(f.pip(), WRIST))
        .count() as u8
}

fn wave_state(velocity: VelocityEstimate, tuning: &GestureTuning) -> WaveState {
    WaveState {
        is_waving: velocity.magnitude > tuning.wave_threshold,
        velocity: velocity.magnitude,
        direction: velocity.direction,
    }
}

// ============================================================================
// PAIR CHECKS
// ============================================================================

/// Pair-level gesture given both hands' readings.
///
/// Without a previous distance there is no delta, so spreading and
/// converging are false.
pub fn classify_pair(
    left: &HandGesture,
    right: &HandGesture,
    previous_distance: Option<f32>,
    tuning: &GestureTuning,
) -> (PairGesture, f32) {
    if !(left.detected && right.detected) {
        return (PairGesture::default(), 0.0);
    }

    let distance = left.palm_center.truncate().distance(right.palm_center.truncate());
    let same_location = distance < tuning.same_place_distance;

    let (spreading, converging) = match previous_distance {
        Some(prev) => (
            distance - prev > tuning.spread_delta && distance > tuning.spread_min_distance,
            prev - distance > tuning.converge_delta && distance < tuning.converge_max_distance,
        ),
        None => (false, false),
    };

    let pair = PairGesture {
        detected: true,
        same_location,
        spreading,
        converging,
        grasping: left.grasping && right.grasping && same_location,
    };
    (pair, distance)
}

// ============================================================================
// ENGINE
// ============================================================================

/// Classification engine: tuning plus the only cross-frame state, the palm history
#[derive(Debug, Clone)]
pub struct GestureEngine {
    tuning: GestureTuning,
    history: HandHistory,
}

impl GestureEngine {
    pub fn new(tuning: GestureTuning) -> Self {
        let history = HandHistory::new(tuning.history_capacity, tuning.min_elapsed_ms);
        Self { tuning, history }
    }

    pub fn tuning(&self) -> &GestureTuning {
        &self.tuning
    }

    pub fn history(&self) -> &HandHistory {
        &self.history
    }

    /// Classify one frame. Records a palm sample for every present hand.
    pub fn classify(
        &mut self,
        hands: &HandsFrame,
        previous_distance: Option<f32>,
        now_ms: f64,
    ) -> GestureState {
        let left = self.classify_hand(HandSide::Left, hands.left.as_ref(), now_ms);
        let right = self.classify_hand(HandSide::Right, hands.right.as_ref(), now_ms);
        let (pair, hands_distance) = classify_pair(&left, &right, previous_distance, &self.tuning);

        GestureState {
            left,
            right,
            pair,
            hands_distance,
        }
    }

    fn classify_hand(
        &mut self,
        side: HandSide,
        set: Option<&HandLandmarkSet>,
        now_ms: f64,
    ) -> HandGesture {
        let Some(set) = set else {
            return HandGesture::default();
        };

        let palm_center = set.palm_center();
        self.history.record(
            side,
            PalmSample {
                position: palm_center,
                timestamp_ms: now_ms,
            },
        );

        let min = self.tuning.min_fingers.min(Finger::ALL.len() as u32) as u8;
        let curled = curled_fingers(set, self.tuning.curl_ratio);
        let extended = extended_fingers(set, self.tuning.extend_ratio);

        HandGesture {
            detected: true,
            pinch: classify_pinch(set, &self.tuning),
            wave: wave_state(self.history.estimate_velocity(side), &self.tuning),
            grasping: curled >= min,
            open: extended >= min,
            curled_fingers: curled,
            extended_fingers: extended,
            palm_center,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{hand_at, overlap_hand, synthetic_hand};
    use super::*;
    use crate::landmarks::HAND_LANDMARK_COUNT;

    fn tuning() -> GestureTuning {
        GestureTuning::default()
    }

    fn with_pinch_points(a: Vec3, b: Vec3) -> HandLandmarkSet {
        let mut points = [Vec3::ZERO; HAND_LANDMARK_COUNT];
        points[THUMB_TIP] = a;
        points[INDEX_TIP] = b;
        HandLandmarkSet::new(points)
    }

    #[test]
    fn test_pinch_threshold_is_strict() {
        let t = tuning();
        let close = with_pinch_points(Vec3::ZERO, Vec3::new(0.0, 0.0, 0.059));
        let apart = with_pinch_points(Vec3::ZERO, Vec3::new(0.0, 0.0, 0.0625));
        assert!(classify_pinch(&close, &t).is_pinching);
        assert!(!classify_pinch(&apart, &t).is_pinching);
    }

    #[test]
    fn test_pinch_distance_symmetric_and_3d() {
        let t = tuning();
        let a = Vec3::new(0.1, 0.2, 0.3);
        let b = Vec3::new(0.13, 0.24, 0.0);
        let ab = classify_pinch(&with_pinch_points(a, b), &t);
        let ba = classify_pinch(&with_pinch_points(b, a), &t);
        assert_eq!(ab.distance, ba.distance);
        assert!((ab.distance - a.distance(b)).abs() < 1e-6);
        // Close in 2D but far apart in depth: not a pinch
        assert!(!ab.is_pinching);
    }

    #[test]
    fn test_fully_curled_is_grasping() {
        let mut engine = GestureEngine::new(tuning());
        let hands = HandsFrame {
            left: Some(synthetic_hand(0.5, 1.0)),
            right: None,
        };
        let state = engine.classify(&hands, None, 0.0);
        assert!(state.left.grasping);
        assert!(!state.left.open);
        assert_eq!(state.left.curled_fingers, 4);
        assert!(!state.right.detected);
    }

    #[test]
    fn test_fully_extended_is_open() {
        let mut engine = GestureEngine::new(tuning());
        let hands = HandsFrame {
            left: None,
            right: Some(synthetic_hand(0.5, 0.0)),
        };
        let state = engine.classify(&hands, None, 0.0);
        assert!(state.right.open);
        assert!(!state.right.grasping);
        assert_eq!(state.right.open_intensity(), 1.0);
    }

    #[test]
    fn test_curl_checks_are_monotonic() {
        let t = tuning();
        let mut last_curled = 0;
        let mut last_extended = 4;
        for step in 0..=20 {
            let curl = step as f32 / 20.0;
            let set = synthetic_hand(0.5, curl);
            let curled = curled_fingers(&set, t.curl_ratio);
            let extended = extended_fingers(&set, t.extend_ratio);
            assert!(curled >= last_curled, "curled count dropped at curl {}", curl);
            assert!(extended <= last_extended, "extended count rose at curl {}", curl);
            last_curled = curled;
            last_extended = extended;
        }
        assert_eq!(last_curled, 4);
        assert_eq!(last_extended, 0);
    }

    // Known overlap: a tip just past the PIP radius but inside 1.2x the base
    // radius reads as both curled and extended. Both gestures are reported.
    #[test]
    fn test_grasp_and_open_can_overlap() {
        let set = overlap_hand();
        let mut engine = GestureEngine::new(tuning());
        let state = engine.classify(
            &HandsFrame {
                left: Some(set),
                right: None,
            },
            None,
            0.0,
        );
        assert!(state.left.grasping && state.left.open);
    }

    #[test]
    fn test_wave_rises_then_settles() {
        let mut engine = GestureEngine::new(tuning());
        let mut waving = Vec::new();
        // x increases for 5 frames, then holds still for 6 frames
        for frame in 0..11 {
            let x = 0.2 + 0.05 * (frame.min(4) as f32);
            let hands = HandsFrame {
                left: Some(hand_at(x, 0.5, 0.0)),
                right: None,
            };
            let state = engine.classify(&hands, None, frame as f64 * 33.0);
            waving.push((state.left.wave.is_waving, state.left.wave.direction));
        }
        assert!(!waving[0].0, "single sample never waves");
        assert!(waving[2].0);
        assert_eq!(waving[2].1, 1.0);
        assert!(!waving[10].0, "window is flat after five still frames");
    }

    fn gesture_at(x: f32, grasping: bool) -> HandGesture {
        HandGesture {
            detected: true,
            grasping,
            palm_center: Vec3::new(x, 0.5, 0.0),
            ..Default::default()
        }
    }

    #[test]
    fn test_pair_grasp_truth_table() {
        let t = tuning();
        for &(left_grasp, right_grasp) in &[(false, false), (true, false), (false, true), (true, true)] {
            for &(gap, near) in &[(0.05, true), (0.3, false)] {
                let (pair, _) = classify_pair(
                    &gesture_at(0.4, left_grasp),
                    &gesture_at(0.4 + gap, right_grasp),
                    None,
                    &t,
                );
                assert_eq!(pair.same_location, near);
                assert_eq!(
                    pair.grasping,
                    left_grasp && right_grasp && near,
                    "left={} right={} near={}",
                    left_grasp,
                    right_grasp,
                    near
                );
            }
        }
    }

    #[test]
    fn test_spread_and_converge_need_previous_distance() {
        let t = tuning();
        let (pair, distance) = classify_pair(&gesture_at(0.1, false), &gesture_at(0.6, false), None, &t);
        assert!((distance - 0.5).abs() < 1e-6);
        assert!(!pair.spreading && !pair.converging);

        let (pair, _) = classify_pair(&gesture_at(0.1, false), &gesture_at(0.6, false), Some(0.4), &t);
        assert!(pair.spreading);

        let (pair, _) = classify_pair(&gesture_at(0.4, false), &gesture_at(0.5, false), Some(0.2), &t);
        assert!(pair.converging);
        assert!(!pair.spreading);
    }

    #[test]
    fn test_single_hand_has_no_pair() {
        let (pair, distance) =
            classify_pair(&gesture_at(0.1, true), &HandGesture::default(), Some(0.3), &tuning());
        assert_eq!(pair, PairGesture::default());
        assert_eq!(distance, 0.0);
    }
}
