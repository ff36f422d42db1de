//! Tracking state machine with frame-counted hold-over.
//!
//! A single dropped frame (blink, brief occlusion) should not make the cursor
//! vanish. While tracking, a failed frame moves the machine to
//! [`TrackingState::Lost`] and the last valid point is re-emitted for up to
//! `grace_period_frames` consecutive failures. After that nothing is emitted
//! until a valid point arrives.
//!
//! ```text
//! Idle --frame--> Acquiring --valid--> Tracking --invalid--> Lost
//!                     ^  |invalid        ^   |valid            |
//!                     +--+               +---+<-------valid----+
//! any --disable--> Idle
//! ```

use crate::{error::FrameError, screen::GazePoint};
use log::{debug, trace};

/// Lifecycle of gaze tracking for one stream
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TrackingState {
    /// No frames processed since start or the last disable
    #[default]
    Idle,
    /// Receiving frames, no valid point yet in this run
    Acquiring,
    /// The latest frame produced a valid point
    Tracking,
    /// Was tracking, the latest frame failed
    Lost,
}

/// What the consumer receives for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameResult {
    /// Fresh point from this frame
    Tracking(GazePoint),
    /// Last valid point, re-emitted during a short gap
    Held(GazePoint),
    /// Nothing to show this frame
    NoResult,
}

impl FrameResult {
    /// The point to display, fresh or held
    pub fn point(&self) -> Option<&GazePoint> {
        match self {
            Self::Tracking(point) | Self::Held(point) => Some(point),
            Self::NoResult => None,
        }
    }

    pub fn is_held(&self) -> bool {
        matches!(self, Self::Held(_))
    }
}

/// Frame-to-frame tracking memory
#[derive(Debug, Clone)]
pub struct Tracker {
    state: TrackingState,
    grace_period: u32,
    held: Option<GazePoint>,
    missed_frames: u32,
    last_failure: Option<FrameError>,
}

impl Tracker {
    /// Create a tracker that bridges up to `grace_period` failed frames
    pub const fn new(grace_period: u32) -> Self {
        Self {
            state: TrackingState::Idle,
            grace_period,
            held: None,
            missed_frames: 0,
            last_failure: None,
        }
    }

    pub fn state(&self) -> TrackingState {
        self.state
    }

    pub fn grace_period(&self) -> u32 {
        self.grace_period
    }

    /// Consecutive failed frames since the last valid point
    pub fn missed_frames(&self) -> u32 {
        self.missed_frames
    }

    /// Point currently available for hold-over
    pub fn held_point(&self) -> Option<&GazePoint> {
        self.held.as_ref()
    }

    /// Why the most recent failed frame failed
    pub fn last_failure(&self) -> Option<&FrameError> {
        self.last_failure.as_ref()
    }

    /// Whether the hold-over window has run out
    pub fn is_expired(&self) -> bool {
        matches!(self.state, TrackingState::Lost) && self.held.is_none()
    }

    /// Feed one frame's outcome and decide what to emit
    pub fn advance(&mut self, outcome: Result<GazePoint, FrameError>) -> FrameResult {
        let previous = self.state;
        let result = match outcome {
            Ok(point) => self.accept(point),
            Err(reason) => self.reject(reason),
        };

        if previous != self.state {
            debug!("Tracking state {:?} -> {:?}", previous, self.state);
        }
        result
    }

    fn accept(&mut self, point: GazePoint) -> FrameResult {
        self.state = TrackingState::Tracking;
        self.held = Some(point);
        self.missed_frames = 0;
        self.last_failure = None;
        FrameResult::Tracking(point)
    }

    fn reject(&mut self, reason: FrameError) -> FrameResult {
        trace!("Frame produced no gaze point: {reason}");
        self.last_failure = Some(reason);

        match self.state {
            TrackingState::Idle | TrackingState::Acquiring => {
                self.state = TrackingState::Acquiring;
                FrameResult::NoResult
            }
            TrackingState::Tracking | TrackingState::Lost => {
                self.state = TrackingState::Lost;
                self.missed_frames = self.missed_frames.saturating_add(1);
                if self.missed_frames > self.grace_period {
                    if self.held.take().is_some() {
                        debug!("Hold-over expired after {} frames", self.grace_period);
                    }
                    return FrameResult::NoResult;
                }
                self.held.map_or(FrameResult::NoResult, FrameResult::Held)
            }
        }
    }

    /// Stop tracking: return to `Idle` and drop the held point
    pub fn disable(&mut self) {
        if self.state != TrackingState::Idle {
            debug!("Tracking disabled in state {:?}", self.state);
        }
        self.state = TrackingState::Idle;
        self.held = None;
        self.missed_frames = 0;
        self.last_failure = None;
    }
}

impl Default for Tracker {
    fn default() -> Self {
        Self::new(crate::constants::DEFAULT_GRACE_PERIOD_FRAMES)
    }
}
