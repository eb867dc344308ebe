//! Celestial Hands - Wasm Core
//!
//! Hand and face landmarks in, gestures and particle-globe state out. The
//! JS host owns the camera, the tracker and rendering; this crate classifies
//! gestures, runs the single/dual object lifecycle and integrates particles.

#![cfg_attr(feature = "portable_simd", feature(portable_simd))]

#[cfg(target_arch = "wasm32")]
mod bench;
#[cfg(target_arch = "wasm32")]
pub mod bridge;
pub mod celestial;
pub mod controls;
pub mod gesture;
pub mod landmarks;
pub mod lifecycle;
mod math;
pub mod particles;
pub mod scene;
pub mod state;
pub mod tuning;
mod tuning_limits;

#[cfg(target_arch = "wasm32")]
pub use bench::run_benchmarks;

pub use celestial::{CelestialObject, ObjectRole, ObjectSnapshot, Transform};
pub use gesture::{GestureEngine, GestureLabel, GestureState};
pub use glam::{Vec2, Vec3};
pub use landmarks::{FaceAnchors, HandLandmarkSet, HandSide, HandsFrame, InputError};
pub use lifecycle::{DualController, LifecycleState};
pub use particles::ParticleBody;
pub use scene::{FrameInput, FrameOutput, Scene};
pub use tuning::{Tuning, TuningError};
