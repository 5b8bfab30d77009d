//! `upwatch watch` – poll an upload and draw its bar in the terminal.

use anyhow::Result;
use upwatch_core::config::UpwatchConfig;
use upwatch_core::form::Form;
use upwatch_core::poller::{PollOutcome, PollTiming, UploadProgressBar};
use upwatch_core::status::HttpStatusSource;

use crate::cli::view::TerminalView;
use crate::cli::EXIT_POLL_FAILED;

/// Command-line overrides for config values.
#[derive(Debug, Default)]
pub struct WatchOverrides {
    pub ready_message: Option<String>,
    pub interval_ms: Option<u64>,
    /// `Some(0)` disables the limit.
    pub max_not_ready: Option<u32>,
}

fn timing(cfg: &UpwatchConfig, overrides: &WatchOverrides) -> PollTiming {
    let mut timing = cfg.poll.timing();
    if let Some(ms) = overrides.interval_ms {
        timing = timing.with_interval(std::time::Duration::from_millis(ms));
    }
    match overrides.max_not_ready {
        Some(0) => timing.max_not_ready_ticks = None,
        Some(n) => timing.max_not_ready_ticks = Some(n),
        None => {}
    }
    timing
}

pub async fn run_watch(
    cfg: &UpwatchConfig,
    transport_id: &str,
    overrides: WatchOverrides,
) -> Result<i32> {
    let source = HttpStatusSource::from_config(cfg)?;
    let timing = timing(cfg, &overrides);
    let ready = overrides
        .ready_message
        .unwrap_or_else(|| cfg.messages.ready.clone());

    // The upload was already started elsewhere; submitting right away starts the clock.
    let form = Form::new();
    let handle = UploadProgressBar::attach(TerminalView::stdout(), transport_id, Some(ready))
        .with_timing(timing)
        .with_messages(&cfg.messages)
        .connect_to(&form, source);
    form.submit();

    let outcome = handle.wait().await;
    println!();
    match outcome {
        PollOutcome::Done => Ok(0),
        PollOutcome::Failed(failure) => {
            eprintln!("upwatch: {}", failure);
            Ok(EXIT_POLL_FAILED)
        }
        PollOutcome::Cancelled => Ok(EXIT_POLL_FAILED),
    }
}
