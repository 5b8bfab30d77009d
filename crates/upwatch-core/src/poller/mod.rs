//! Upload progress poller.
//!
//! An [`UploadProgressBar`] is attached to a view, connected to a form, and
//! from the moment the form is submitted polls a [`crate::status::StatusSource`]
//! every couple of seconds until the upload is complete. [`UploadSession`]
//! holds the per-upload state and decides what each status means; the loop in
//! `run` only sleeps, fetches and paints.

mod bar;
mod run;
mod session;

pub use bar::{PollHandle, UploadProgressBar};
pub use session::{Step, UploadSession};

use std::time::Duration;
use thiserror::Error;

use crate::status::DecodeError;

/// Timing and give-up limits for one poll loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollTiming {
    /// Delay between submission and the first status check.
    pub initial_delay: Duration,
    /// Delay between consecutive status checks.
    pub interval: Duration,
    /// An error while the last percentage is at or below this means "not ready yet";
    /// above it, an error means the server already cleared a finished upload.
    pub tolerance_percent: u8,
    /// Stop with [`PollFailure::GaveUp`] after this many not-ready checks in a row.
    pub max_not_ready_ticks: Option<u32>,
    /// Stop with [`PollFailure::TimedOut`] once this much time has passed since submission.
    pub max_elapsed: Option<Duration>,
}

/// Shortest allowed delay between status checks.
pub const MIN_INTERVAL: Duration = Duration::from_millis(100);

impl PollTiming {
    /// Sets the delay between checks, raised to [`MIN_INTERVAL`] if shorter.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval.max(MIN_INTERVAL);
        self
    }
}

impl Default for PollTiming {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_millis(2000),
            interval: Duration::from_millis(2000),
            tolerance_percent: 95,
            max_not_ready_ticks: Some(30),
            max_elapsed: None,
        }
    }
}

/// Lifecycle of a connected progress bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    /// Waiting for the form to be submitted.
    Idle,
    Polling,
    Done,
    Failed,
}

/// Why a poll loop stopped without reaching completion.
#[derive(Debug, Error)]
pub enum PollFailure {
    #[error("status service sent an unreadable response: {0}")]
    Decode(DecodeError),
    #[error("upload status still unavailable after {ticks} consecutive checks")]
    GaveUp { ticks: u32 },
    #[error("upload not finished after {elapsed:?}")]
    TimedOut { elapsed: Duration },
}

/// How a poll loop ended.
#[derive(Debug)]
pub enum PollOutcome {
    /// Bar shows 100% and the ready message.
    Done,
    /// Bar shows the failure message.
    Failed(PollFailure),
    /// The form went away before it was submitted; nothing was polled.
    Cancelled,
}

impl PollOutcome {
    pub fn is_done(&self) -> bool {
        matches!(self, PollOutcome::Done)
    }

    /// State published once the loop has ended with this outcome.
    pub fn final_state(&self) -> PollState {
        match self {
            PollOutcome::Done => PollState::Done,
            PollOutcome::Failed(_) => PollState::Failed,
            PollOutcome::Cancelled => PollState::Idle,
        }
    }
}
