//! Landmark input types: the 21-point hand skeleton, mirrored handedness,
//! and the two face anchors the experience consumes.
//!
//! All coordinates are normalized to the camera frame (x/y in [0, 1], z a
//! relative depth). A missing hand is `None`, never an empty set.

use glam::{Vec2, Vec3};
use static_assertions::const_assert;
use thiserror::Error;

// ============================================================================
// HAND LANDMARK INDICES
// ============================================================================

pub const HAND_LANDMARK_COUNT: usize = 21;

pub const WRIST: usize = 0;
pub const THUMB_TIP: usize = 4;
pub const INDEX_MCP: usize = 5;
pub const INDEX_PIP: usize = 6;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_TIP: usize = 12;
pub const RING_MCP: usize = 13;
pub const RING_PIP: usize = 14;
pub const RING_TIP: usize = 16;
pub const PINKY_MCP: usize = 17;
pub const PINKY_PIP: usize = 18;
pub const PINKY_TIP: usize = 20;

const_assert!(PINKY_TIP < HAND_LANDMARK_COUNT);

/// Face mesh index of the nose tip
pub const FACE_NOSE_TIP: usize = 1;
/// Face mesh index of the forehead center
pub const FACE_FOREHEAD: usize = 10;

/// Landmarks whose mean is the palm center
const PALM_POINTS: [usize; 5] = [WRIST, INDEX_MCP, MIDDLE_MCP, RING_MCP, PINKY_MCP];

// ============================================================================
// ERRORS
// ============================================================================

/// Malformed frame from the landmark tracker
#[derive(Debug, Error, PartialEq)]
pub enum InputError {
    #[error("expected {expected} landmark floats, got {actual}")]
    WrongLength { expected: usize, actual: usize },
    #[error("unknown handedness label '{0}'")]
    UnknownHandedness(String),
    #[error("non-finite coordinate at float {0}")]
    NonFinite(usize),
    #[error("at most two hands are tracked, got {0}")]
    TooManyHands(usize),
}

// ============================================================================
// HAND SIDE
// ============================================================================

/// Which of the user's hands, after correcting for the mirrored selfie view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HandSide {
    Left = 0,
    Right = 1,
}

impl HandSide {
    pub const ALL: [HandSide; 2] = [HandSide::Left, HandSide::Right];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Map the tracker's raw handedness label to the side it really is.
    ///
    /// The video feed is mirrored, so the tracker's "Left" is the user's right
    /// hand and vice versa.
    pub fn from_tracker_label(label: &str) -> Result<Self, InputError> {
        match label.trim().to_ascii_lowercase().as_str() {
            "left" => Ok(HandSide::Right),
            "right" => Ok(HandSide::Left),
            _ => Err(InputError::UnknownHandedness(label.to_string())),
        }
    }
}

// ============================================================================
// FINGERS
// ============================================================================

/// The four non-thumb fingers used by grasp/open classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Finger {
    Index,
    Middle,
    Ring,
    Pinky,
}

impl Finger {
    pub const ALL: [Finger; 4] = [Finger::Index, Finger::Middle, Finger::Ring, Finger::Pinky];

    pub const fn tip(self) -> usize {
        match self {
            Finger::Index => INDEX_TIP,
            Finger::Middle => MIDDLE_TIP,
            Finger::Ring => RING_TIP,
            Finger::Pinky => PINKY_TIP,
        }
    }

    /// Base knuckle (MCP joint)
    pub const fn base(self) -> usize {
        match self {
            Finger::Index => INDEX_MCP,
            Finger::Middle => MIDDLE_MCP,
            Finger::Ring => RING_MCP,
            Finger::Pinky => PINKY_MCP,
        }
    }

    pub const fn pip(self) -> usize {
        match self {
            Finger::Index => INDEX_PIP,
            Finger::Middle => MIDDLE_PIP,
            Finger::Ring => RING_PIP,
            Finger::Pinky => PINKY_PIP,
        }
    }
}

// ============================================================================
// HAND LANDMARK SET
// ============================================================================

/// One hand's 21 landmarks for the current frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandLandmarkSet {
    pub points: [Vec3; HAND_LANDMARK_COUNT],
}

impl HandLandmarkSet {
    pub fn new(points: [Vec3; HAND_LANDMARK_COUNT]) -> Self {
        Self { points }
    }

    /// Decode `21 * 3` floats laid out as x, y, z per landmark
    pub fn from_flat(data: &[f32]) -> Result<Self, InputError> {
        let expected = HAND_LANDMARK_COUNT * 3;
        if data.len() != expected {
            return Err(InputError::WrongLength {
                expected,
                actual: data.len(),
            });
        }
        if let Some(i) = data.iter().position(|v| !v.is_finite()) {
            return Err(InputError::NonFinite(i));
        }

        let mut points = [Vec3::ZERO; HAND_LANDMARK_COUNT];
        for (p, xyz) in points.iter_mut().zip(data.chunks_exact(3)) {
            *p = Vec3::new(xyz[0], xyz[1], xyz[2]);
        }
        Ok(Self { points })
    }

    #[inline]
    pub fn point(&self, index: usize) -> Vec3 {
        self.points[index]
    }

    /// 2D (image plane) distance between two landmarks
    #[inline]
    pub fn distance_2d(&self, a: usize, b: usize) -> f32 {
        self.points[a].truncate().distance(self.points[b].truncate())
    }

    /// Mean of the wrist and the four finger-base knuckles
    pub fn palm_center(&self) -> Vec3 {
        let sum: Vec3 = PALM_POINTS.iter().map(|&i| self.points[i]).sum();
        sum / PALM_POINTS.len() as f32
    }
}

// ============================================================================
// PER-FRAME HAND INPUT
// ============================================================================

/// Hands present in one tracker frame, already side-corrected
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HandsFrame {
    pub left: Option<HandLandmarkSet>,
    pub right: Option<HandLandmarkSet>,
}

impl HandsFrame {
    pub fn hand(&self, side: HandSide) -> Option<&HandLandmarkSet> {
        match side {
            HandSide::Left => self.left.as_ref(),
            HandSide::Right => self.right.as_ref(),
        }
    }

    /// Decode the tracker's flat output: one `21 * 3` block per label.
    ///
    /// Labels are the tracker's raw handedness and get inverted. If the tracker
    /// reports the same side twice, the later hand wins.
    pub fn from_tracker(data: &[f32], labels: &[String]) -> Result<Self, InputError> {
        if labels.len() > 2 {
            return Err(InputError::TooManyHands(labels.len()));
        }
        let block = HAND_LANDMARK_COUNT * 3;
        let expected = block * labels.len();
        if data.len() != expected {
            return Err(InputError::WrongLength {
                expected,
                actual: data.len(),
            });
        }

        let mut frame = HandsFrame::default();
        for (label, chunk) in labels.iter().zip(data.chunks_exact(block)) {
            let side = HandSide::from_tracker_label(label)?;
            let set = HandLandmarkSet::from_flat(chunk)?;
            match side {
                HandSide::Left => frame.left = Some(set),
                HandSide::Right => frame.right = Some(set),
            }
        }
        Ok(frame)
    }
}

// ============================================================================
// FACE ANCHORS
// ============================================================================

/// The two face landmarks used for head parallax
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceAnchors {
    pub nose: Vec3,
    pub forehead: Vec2,
}

impl FaceAnchors {
    /// Pick the nose tip and forehead out of a full flat face mesh (x, y, z per point)
    pub fn from_flat(data: &[f32]) -> Result<Self, InputError> {
        let needed = (FACE_FOREHEAD + 1) * 3;
        if data.len() < needed || data.len() % 3 != 0 {
            return Err(InputError::WrongLength {
                expected: needed,
                actual: data.len(),
            });
        }
        let at = |i: usize| Vec3::new(data[i * 3], data[i * 3 + 1], data[i * 3 + 2]);
        let nose = at(FACE_NOSE_TIP);
        let forehead = at(FACE_FOREHEAD);
        if !nose.is_finite() || !forehead.is_finite() {
            return Err(InputError::NonFinite(FACE_NOSE_TIP * 3));
        }
        Ok(Self {
            nose,
            forehead: forehead.truncate(),
        })
    }

    /// Head roll in radians: angle of the nose→forehead vector from image-up
    pub fn roll(&self) -> f32 {
        let up = self.forehead - self.nose.truncate();
        // Image y grows downward, so "up" is negative y.
        up.x.atan2(-up.y)
    }
}
