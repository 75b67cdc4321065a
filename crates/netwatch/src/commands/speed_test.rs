//! `speed-test`: one download measurement.

use netwatch_core::{MonitorConfig, NetworkMonitor, SpeedTestResult};

use crate::config::OutputOpts;
use crate::error::CliError;
use crate::output;

fn detail(r: &SpeedTestResult) -> String {
    [
        format!("Download: {:.2} Mbps", r.download_mbps),
        format!("Latency:  {:.0} ms", r.latency_ms),
        "Upload:   not measured".to_string(),
    ]
    .join("\n")
}

pub async fn handle(monitor_config: MonitorConfig, out: &OutputOpts) -> Result<(), CliError> {
    let monitor = NetworkMonitor::new(monitor_config)?;
    let result = monitor.perform_speed_test().await?;

    let rendered = output::render_single(out.format, &result, detail, |r| {
        format!("{:.2}", r.download_mbps)
    });
    output::print_output(&rendered, out.quiet);
    Ok(())
}
