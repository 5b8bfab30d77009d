//! CLI command handlers.

mod status;
mod watch;

pub use status::run_status;
pub use watch::{run_watch, WatchOverrides};
