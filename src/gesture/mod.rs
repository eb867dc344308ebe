pub mod classify;
pub mod history;
pub mod label;

pub use classify::*;
pub use history::*;
pub use label::*;

/// Synthetic hands for tests across the crate
#[cfg(test)]
pub(crate) mod test_support {
    use glam::{Vec2, Vec3};

    use crate::landmarks::{Finger, HandLandmarkSet, HAND_LANDMARK_COUNT, THUMB_TIP, WRIST};

    /// A hand whose palm sits near `(x, y)`.
    ///
    /// `curl` runs from 0 (fingers straight out, open) to 1 (tips folded
    /// back to the wrist, fist). The thumb is held away from the index finger.
    pub fn hand_at(x: f32, y: f32, curl: f32) -> HandLandmarkSet {
        let wrist = Vec3::new(x, y + 0.1, 0.0);
        let mut points = [wrist; HAND_LANDMARK_COUNT];
        let tip_reach = 0.25 + (0.05 - 0.25) * curl.clamp(0.0, 1.0);

        for (i, finger) in Finger::ALL.iter().enumerate() {
            // Fan the fingers upward (image y decreases upward)
            let angle = -std::f32::consts::FRAC_PI_2 - 0.3 + 0.2 * i as f32;
            let dir = Vec2::from_angle(angle).extend(0.0);
            points[finger.base()] = wrist + dir * 0.1;
            points[finger.pip()] = wrist + dir * 0.15;
            points[finger.tip()] = wrist + dir * tip_reach;
        }
        points[WRIST] = wrist;
        points[THUMB_TIP] = wrist + Vec3::new(-0.15, -0.02, 0.0);
        HandLandmarkSet::new(points)
    }

    pub fn synthetic_hand(x: f32, curl: f32) -> HandLandmarkSet {
        hand_at(x, 0.5, curl)
    }

    /// A pose that reads as both grasping and open: each tip sits just past
    /// its PIP radius but inside 1.2x its base radius.
    pub fn overlap_hand() -> HandLandmarkSet {
        let mut points = [Vec3::new(0.5, 0.8, 0.0); HAND_LANDMARK_COUNT];
        for (i, f) in Finger::ALL.iter().enumerate() {
            let dir = Vec2::from_angle(-1.2 - i as f32 * 0.25).extend(0.0);
            points[f.base()] = points[WRIST] + dir * 0.1;
            points[f.pip()] = points[WRIST] + dir * 0.1;
            points[f.tip()] = points[WRIST] + dir * 0.115;
        }
        HandLandmarkSet::new(points)
    }

    /// Move the thumb tip to `distance` from the index tip
    pub fn with_pinch(mut set: HandLandmarkSet, distance: f32) -> HandLandmarkSet {
        let index_tip = set.point(Finger::Index.tip());
        set.points[THUMB_TIP] = index_tip + Vec3::new(distance, 0.0, 0.0);
        set
    }
}
