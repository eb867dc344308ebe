//! Sliding window of palm-center samples per hand, used for wave velocity.

use std::collections::VecDeque;

use glam::Vec3;

use crate::landmarks::HandSide;

/// Palm center at a capture time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PalmSample {
    pub position: Vec3,
    /// Capture time in milliseconds (host clock)
    pub timestamp_ms: f64,
}

/// Horizontal palm velocity over the retained window
#[derive(Debug, Clone, Copy, Default, PartialEq, serde::Serialize)]
pub struct VelocityEstimate {
    /// Normalized frame widths per second
    pub magnitude: f32,
    /// -1 moving left, 1 moving right, 0 not moving
    pub direction: f32,
}

impl VelocityEstimate {
    pub const ZERO: VelocityEstimate = VelocityEstimate {
        magnitude: 0.0,
        direction: 0.0,
    };
}

/// Per-hand palm history. Lives for the whole session; samples only leave by eviction.
#[derive(Debug, Clone)]
pub struct HandHistory {
    samples: [VecDeque<PalmSample>; 2],
    capacity: usize,
    min_elapsed_ms: f64,
}

impl HandHistory {
    pub fn new(capacity: usize, min_elapsed_ms: f64) -> Self {
        let capacity = capacity.max(2);
        Self {
            samples: [
                VecDeque::with_capacity(capacity + 1),
                VecDeque::with_capacity(capacity + 1),
            ],
            capacity,
            min_elapsed_ms,
        }
    }

    /// Append a sample, evicting the oldest once over capacity
    pub fn record(&mut self, side: HandSide, sample: PalmSample) {
        let buf = &mut self.samples[side.index()];
        buf.push_back(sample);
        while buf.len() > self.capacity {
            buf.pop_front();
        }
    }

    pub fn len(&self, side: HandSide) -> usize {
        self.samples[side.index()].len()
    }

    pub fn is_empty(&self, side: HandSide) -> bool {
        self.samples[side.index()].is_empty()
    }

    /// Velocity from the oldest to the newest retained sample.
    ///
    /// Zero if fewer than two samples exist or they span less than the
    /// minimum elapsed time.
    pub fn estimate_velocity(&self, side: HandSide) -> VelocityEstimate {
        let buf = &self.samples[side.index()];
        let (Some(oldest), Some(newest)) = (buf.front(), buf.back()) else {
            return VelocityEstimate::ZERO;
        };
        if buf.len() < 2 {
            return VelocityEstimate::ZERO;
        }

        let elapsed_ms = newest.timestamp_ms - oldest.timestamp_ms;
        if elapsed_ms < self.min_elapsed_ms {
            return VelocityEstimate::ZERO;
        }

        let dx = newest.position.x - oldest.position.x;
        let direction = if dx > 0.0 {
            1.0
        } else if dx < 0.0 {
            -1.0
        } else {
            0.0
        };

        VelocityEstimate {
            magnitude: dx.abs() / (elapsed_ms / 1000.0) as f32,
            direction,
        }
    }
}
