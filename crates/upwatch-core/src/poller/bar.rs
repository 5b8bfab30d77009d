//! Progress bar bound to a form: the public entry point of the poller.

use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::run::poll_until_settled;
use super::session::UploadSession;
use super::{PollOutcome, PollState, PollTiming};
use crate::config::Messages;
use crate::form::Form;
use crate::status::StatusSource;
use crate::view::{BarWidth, ProgressView};

/// A progress bar for one upload, not yet connected to a form.
pub struct UploadProgressBar<V> {
    view: V,
    transport_id: String,
    ready_message: String,
    starting_message: String,
    failed_message: String,
    timing: PollTiming,
}

impl<V: ProgressView> UploadProgressBar<V> {
    /// Mounts a bar and label in `view` for the upload identified by `transport_id`.
    /// Without `ready_message`, completion shows the default "finishing" text.
    pub fn attach(
        mut view: V,
        transport_id: impl Into<String>,
        ready_message: Option<String>,
    ) -> Self {
        view.mount();
        let messages = Messages::default();
        Self {
            view,
            transport_id: transport_id.into(),
            ready_message: ready_message.unwrap_or(messages.ready),
            starting_message: messages.starting,
            failed_message: messages.failed,
            timing: PollTiming::default(),
        }
    }

    pub fn with_timing(mut self, timing: PollTiming) -> Self {
        self.timing = timing;
        self
    }

    /// Use configured starting/failure texts. The ready text stays as given to `attach`.
    pub fn with_messages(mut self, messages: &Messages) -> Self {
        self.starting_message = messages.starting.clone();
        self.failed_message = messages.failed.clone();
        self
    }

    /// Collapses the bar and starts watching `form`. Once it is submitted, the
    /// view is revealed and `source` is polled until the upload settles.
    ///
    /// Must be called from within a tokio runtime. The returned handle aborts
    /// the poll task when dropped.
    pub fn connect_to<S: StatusSource>(mut self, form: &Form, source: S) -> PollHandle {
        self.view.set_bar_width(BarWidth::COLLAPSED);
        let mut listener = form.listen();
        let (state_tx, state_rx) = watch::channel(PollState::Idle);

        let task = tokio::spawn(async move {
            if !listener.submitted().await {
                tracing::debug!(transport_id = %self.transport_id, "form dropped before submit");
                return PollOutcome::Cancelled;
            }

            self.view.reveal();
            self.view.set_label(&self.starting_message);
            state_tx.send_replace(PollState::Polling);
            tracing::info!(transport_id = %self.transport_id, "polling upload status");

            let mut session = UploadSession::new(
                self.transport_id,
                self.ready_message,
                self.timing.tolerance_percent,
            );
            let outcome = poll_until_settled(
                &mut session,
                &source,
                &mut self.view,
                &self.timing,
                &self.failed_message,
            )
            .await;
            state_tx.send_replace(outcome.final_state());
            outcome
        });

        PollHandle {
            task: Some(task),
            state: state_rx,
        }
    }
}

/// Running poll task of a connected [`UploadProgressBar`].
///
/// Dropping the handle stops polling, like removing the bar from the page.
#[derive(Debug)]
pub struct PollHandle {
    task: Option<JoinHandle<PollOutcome>>,
    state: watch::Receiver<PollState>,
}

impl PollHandle {
    pub fn state(&self) -> PollState {
        *self.state.borrow()
    }

    /// Wait for the next state change and return the new state.
    /// Returns the current state at once if the poll task has already ended.
    pub async fn changed(&mut self) -> PollState {
        let _ = self.state.changed().await;
        *self.state.borrow_and_update()
    }

    /// Wait for the poll loop to end.
    pub async fn wait(mut self) -> PollOutcome {
        let Some(task) = self.task.take() else {
            return PollOutcome::Cancelled;
        };
        match task.await {
            Ok(outcome) => outcome,
            Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
            Err(_) => PollOutcome::Cancelled,
        }
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
