//! `upwatch status` – one status check, printed.

use anyhow::{Context, Result};
use upwatch_core::config::UpwatchConfig;
use upwatch_core::status::{HttpStatusSource, StatusResponse, StatusSource};

pub async fn run_status(cfg: &UpwatchConfig, transport_id: &str) -> Result<()> {
    let source = HttpStatusSource::from_config(cfg)?;
    let status = source
        .fetch(transport_id)
        .await
        .with_context(|| format!("fetching status of upload {}", transport_id))?;
    println!("{}", describe(transport_id, &status));
    Ok(())
}

fn describe(transport_id: &str, status: &StatusResponse) -> String {
    match *status {
        StatusResponse::Unavailable => format!(
            "{}: no status (upload not started yet, or already finished)",
            transport_id
        ),
        StatusResponse::Progress { pos, length } => format!(
            "{}: {} / {} bytes ({}%)",
            transport_id,
            pos,
            length,
            status.percent().unwrap_or(0)
        ),
    }
}
