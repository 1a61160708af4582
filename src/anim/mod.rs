pub mod animator;
pub mod clips;

pub use animator::FrameAnimator;

use thiserror::Error;

/// Rejected [`AnimationSpec`]. Reported at activation, never clamped.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnimError {
    #[error("end frame {end} comes before start frame {start}")]
    ReversedRange { start: u32, end: u32 },

    #[error("cycle {start}..={end} needs a positive duration, got {duration_ms}ms")]
    NonPositiveDuration { start: u32, end: u32, duration_ms: f64 },
}

/// A sprite-sheet cycle: which frames to show and how long one full pass takes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationSpec {
    /// First frame index of the cycle.
    pub start_frame: u32,
    /// Last frame index of the cycle (inclusive).
    pub end_frame: u32,
    /// Wall-clock time to go from `start_frame` to `end_frame` once.
    pub duration_ms: f64,
    /// Pixel width of one frame in the sheet. Passed through to the renderer.
    pub frame_size: f32,
}

impl AnimationSpec {
    pub const fn cycle(start_frame: u32, end_frame: u32, duration_ms: f64, frame_size: f32) -> Self {
        Self {
            start_frame,
            end_frame,
            duration_ms,
            frame_size,
        }
    }

    /// A single held frame. Never advances.
    pub const fn pose(frame: u32, frame_size: f32) -> Self {
        Self {
            start_frame: frame,
            end_frame: frame,
            duration_ms: 0.0,
            frame_size,
        }
    }

    pub fn is_static(&self) -> bool {
        self.start_frame == self.end_frame
    }

    pub fn validate(&self) -> Result<(), AnimError> {
        if self.end_frame < self.start_frame {
            return Err(AnimError::ReversedRange {
                start: self.start_frame,
                end: self.end_frame,
            });
        }
        // `!(x > 0)` also rejects NaN.
        if !self.is_static() && !(self.duration_ms > 0.0) {
            return Err(AnimError::NonPositiveDuration {
                start: self.start_frame,
                end: self.end_frame,
                duration_ms: self.duration_ms,
            });
        }
        Ok(())
    }

    /// Time between frame advances. `None` for static poses.
    pub fn step_interval_ms(&self) -> Option<f64> {
        if self.is_static() {
            return None;
        }
        Some(self.duration_ms / f64::from(self.end_frame - self.start_frame))
    }
}
