//! Timer-driven poll loop: sleep, fetch, paint, repeat.

use tokio::time::Instant;

use super::session::{Step, UploadSession};
use super::{PollFailure, PollOutcome, PollTiming};
use crate::status::StatusSource;
use crate::view::{BarWidth, ProgressView};

/// Polls `source` until the session is done or a give-up limit is hit.
/// The display is only touched on progress, completion, and failure.
pub(super) async fn poll_until_settled<S, V>(
    session: &mut UploadSession,
    source: &S,
    view: &mut V,
    timing: &PollTiming,
    failed_message: &str,
) -> PollOutcome
where
    S: StatusSource,
    V: ProgressView,
{
    let started = Instant::now();
    tokio::time::sleep(timing.initial_delay).await;

    let mut tick = 0u32;
    loop {
        if let Some(max) = timing.max_elapsed {
            let elapsed = started.elapsed();
            if elapsed >= max {
                return fail(view, failed_message, session, PollFailure::TimedOut { elapsed });
            }
        }

        tick += 1;
        let result = source.fetch(session.transport_id()).await;
        match session.observe(result) {
            Step::NotReady => {
                tracing::debug!(transport_id = %session.transport_id(), tick, "status not ready");
                if let Some(max) = timing.max_not_ready_ticks {
                    let ticks = session.consecutive_not_ready();
                    if ticks >= max {
                        return fail(view, failed_message, session, PollFailure::GaveUp { ticks });
                    }
                }
            }
            Step::Progress(percent) => {
                tracing::debug!(transport_id = %session.transport_id(), tick, percent, "upload progress");
                view.set_label(&format!("{}%", percent));
                view.set_bar_width(BarWidth::Percent(percent));
            }
            Step::Done => {
                tracing::info!(transport_id = %session.transport_id(), tick, "upload finished");
                view.set_bar_width(BarWidth::FULL);
                view.set_label(session.ready_message());
                return PollOutcome::Done;
            }
            Step::Broken(e) => {
                return fail(view, failed_message, session, PollFailure::Decode(e));
            }
        }

        tokio::time::sleep(timing.interval).await;
    }
}

fn fail<V: ProgressView>(
    view: &mut V,
    failed_message: &str,
    session: &UploadSession,
    failure: PollFailure,
) -> PollOutcome {
    tracing::warn!(transport_id = %session.transport_id(), "giving up on upload status: {}", failure);
    view.set_label(failed_message);
    PollOutcome::Failed(failure)
}
