//! Command dispatch: bridges CLI args -> monitor -> output formatting.

pub mod check;
pub mod config_cmd;
pub mod speed_test;
pub mod watch;

use netwatch_core::MonitorConfig;

use crate::cli::Command;
use crate::config::OutputOpts;
use crate::error::CliError;

/// Dispatch a monitor-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    monitor_config: MonitorConfig,
    out: &OutputOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Watch(args) => watch::handle(monitor_config, args, out).await,
        Command::Check(args) => check::handle(monitor_config, args, out).await,
        Command::SpeedTest => speed_test::handle(monitor_config, out).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
