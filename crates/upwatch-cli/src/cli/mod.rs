//! CLI for upwatch.

mod commands;
mod view;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use upwatch_core::config::{self, UpwatchConfig};

use commands::{run_status, run_watch, WatchOverrides};

/// Top-level CLI for upwatch.
#[derive(Debug, Parser)]
#[command(name = "upwatch")]
#[command(about = "upwatch: follow a server-side upload and draw its progress bar", long_about = None)]
pub struct Cli {
    /// Config file to use instead of ~/.config/upwatch/config.toml.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Base URL of the site (overrides `base_url` from the config).
    #[arg(long, global = true, value_name = "URL")]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Poll an upload until it finishes, drawing a progress bar.
    Watch {
        /// Upload token the server tracks the transfer under.
        transport_id: String,

        /// Text shown when the upload is complete.
        #[arg(long, value_name = "TEXT")]
        ready_message: Option<String>,

        /// Milliseconds between status checks (default from config, 2000).
        #[arg(long, value_name = "MS")]
        interval_ms: Option<u64>,

        /// Give up after N consecutive checks without a status (0 = never).
        #[arg(long, value_name = "N")]
        max_not_ready: Option<u32>,
    },

    /// Fetch and print the current status of an upload once.
    Status {
        /// Upload token the server tracks the transfer under.
        transport_id: String,
    },
}

/// Exit code for a watch that ended without the upload completing.
pub const EXIT_POLL_FAILED: i32 = 2;

impl CliCommand {
    /// Parses arguments, runs the command, and returns the process exit code.
    pub async fn run_from_args() -> Result<i32> {
        let cli = Cli::parse();
        let cfg = load_config(cli.config.as_deref(), cli.base_url)?;
        tracing::debug!("loaded config: {:?}", cfg);

        let code = match cli.command {
            CliCommand::Watch {
                transport_id,
                ready_message,
                interval_ms,
                max_not_ready,
            } => {
                let overrides = WatchOverrides {
                    ready_message,
                    interval_ms,
                    max_not_ready,
                };
                run_watch(&cfg, &transport_id, overrides).await?
            }
            CliCommand::Status { transport_id } => {
                run_status(&cfg, &transport_id).await?;
                0
            }
        };
        Ok(code)
    }
}

fn load_config(path: Option<&Path>, base_url: Option<String>) -> Result<UpwatchConfig> {
    let mut cfg = match path {
        Some(p) => config::load_from_path(p)?,
        None => config::load_or_init()?,
    };
    if let Some(url) = base_url {
        cfg.base_url = url;
    }
    Ok(cfg)
}

#[cfg(test)]
mod tests;
