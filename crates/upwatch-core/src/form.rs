//! Form submission signal.
//!
//! A [`Form`] stands in for the upload form: whoever submits it calls
//! [`Form::submit`], and a progress bar connected to it waits on a
//! [`SubmitListener`]. Submitting never blocks and never waits for listeners.

use std::sync::Arc;
use tokio::sync::watch;

#[derive(Debug, Clone)]
pub struct Form {
    submitted: Arc<watch::Sender<bool>>,
}

impl Default for Form {
    fn default() -> Self {
        Self::new()
    }
}

impl Form {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self {
            submitted: Arc::new(tx),
        }
    }

    /// Mark the form as submitted. Repeated calls are no-ops.
    pub fn submit(&self) {
        let first = !self.submitted.send_replace(true);
        if first {
            tracing::debug!("form submitted");
        }
    }

    pub fn listen(&self) -> SubmitListener {
        SubmitListener {
            rx: self.submitted.subscribe(),
        }
    }
}

/// Receiving side of a [`Form`].
#[derive(Debug)]
pub struct SubmitListener {
    rx: watch::Receiver<bool>,
}

impl SubmitListener {
    /// Wait for submission. Returns false if every `Form` handle was dropped
    /// first (the page went away before the user submitted).
    pub async fn submitted(&mut self) -> bool {
        self.rx.wait_for(|submitted| *submitted).await.is_ok()
    }
}
