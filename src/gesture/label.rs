//! Human-readable gesture label, one per frame, chosen by fixed priority.

use serde::Serialize;

use super::classify::GestureState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum GestureLabel {
    PairGrasp,
    Grasp,
    OpenHand,
    BothHands,
    Pinch,
    Wave,
    HandDetected,
    None,
}

impl GestureLabel {
    /// Highest priority first; the first label whose condition holds wins
    pub const PRIORITY: [GestureLabel; 8] = [
        GestureLabel::PairGrasp,
        GestureLabel::Grasp,
        GestureLabel::OpenHand,
        GestureLabel::BothHands,
        GestureLabel::Pinch,
        GestureLabel::Wave,
        GestureLabel::HandDetected,
        GestureLabel::None,
    ];

    /// Whether this label's condition holds for `state`
    pub fn applies(self, state: &GestureState) -> bool {
        match self {
            GestureLabel::PairGrasp => state.pair.grasping,
            GestureLabel::Grasp => state.any_hand(|h| h.grasping),
            GestureLabel::OpenHand => state.any_hand(|h| h.open),
            GestureLabel::BothHands => state.pair.detected,
            GestureLabel::Pinch => state.any_hand(|h| h.pinch.is_pinching),
            GestureLabel::Wave => state.any_hand(|h| h.wave.is_waving),
            GestureLabel::HandDetected => state.any_hand(|h| h.detected),
            GestureLabel::None => true,
        }
    }

    pub fn select(state: &GestureState) -> GestureLabel {
        Self::PRIORITY
            .into_iter()
            .find(|label| label.applies(state))
            .unwrap_or(GestureLabel::None)
    }

    /// Status text for the on-screen indicator
    pub fn as_str(&self) -> &'static str {
        match self {
            GestureLabel::PairGrasp => "Both hands grasping",
            GestureLabel::Grasp => "Grasp",
            GestureLabel::OpenHand => "Open hand",
            GestureLabel::BothHands => "Both hands",
            GestureLabel::Pinch => "Pinch",
            GestureLabel::Wave => "Wave",
            GestureLabel::HandDetected => "Hand detected",
            GestureLabel::None => "No hands",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::classify::HandGesture;

    fn detected() -> HandGesture {
        HandGesture {
            detected: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_state_is_none() {
        assert_eq!(GestureLabel::select(&GestureState::default()), GestureLabel::None);
    }

    #[test]
    fn test_single_hand_detected() {
        let state = GestureState {
            left: detected(),
            ..Default::default()
        };
        assert_eq!(GestureLabel::select(&state), GestureLabel::HandDetected);
    }

    #[test]
    fn test_grasp_beats_open_on_overlap() {
        let mut hand = detected();
        hand.grasping = true;
        hand.open = true;
        hand.pinch.is_pinching = true;
        let state = GestureState {
            right: hand,
            ..Default::default()
        };
        assert_eq!(GestureLabel::select(&state), GestureLabel::Grasp);
    }

    #[test]
    fn test_pair_without_gesture_beats_pinch_and_wave() {
        let mut left = detected();
        left.pinch.is_pinching = true;
        let mut right = detected();
        right.wave.is_waving = true;
        let mut state = GestureState {
            left,
            right,
            ..Default::default()
        };
        state.pair.detected = true;
        assert_eq!(GestureLabel::select(&state), GestureLabel::BothHands);

        state.pair.detected = false;
        assert_eq!(GestureLabel::select(&state), GestureLabel::Pinch);
    }

    #[test]
    fn test_pair_grasp_is_top_priority() {
        let mut hand = detected();
        hand.grasping = true;
        let mut state = GestureState {
            left: hand,
            right: hand,
            ..Default::default()
        };
        state.pair.detected = true;
        state.pair.grasping = true;
        assert_eq!(GestureLabel::select(&state), GestureLabel::PairGrasp);
        assert_eq!(GestureLabel::select(&state).as_str(), "Both hands grasping");
    }

    #[test]
    fn test_each_label_outranks_the_next() {
        let mut left = detected();
        left.grasping = true;
        left.pinch.is_pinching = true;
        let mut right = detected();
        right.open = true;
        right.wave.is_waving = true;
        let mut state = GestureState {
            left,
            right,
            ..Default::default()
        };
        state.pair.detected = true;
        state.pair.grasping = true;

        // Drop the winning condition each time; the next label must take over
        let mut seen = vec![GestureLabel::select(&state)];
        let peel: [fn(&mut GestureState); 7] = [
            |s| s.pair.grasping = false,
            |s| s.left.grasping = false,
            |s| s.right.open = false,
            |s| s.pair.detected = false,
            |s| s.left.pinch.is_pinching = false,
            |s| s.right.wave.is_waving = false,
            |s| {
                s.left.detected = false;
                s.right.detected = false;
            },
        ];
        for clear in peel {
            clear(&mut state);
            seen.push(GestureLabel::select(&state));
        }
        assert_eq!(seen, GestureLabel::PRIORITY);
    }
}
