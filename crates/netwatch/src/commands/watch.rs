//! `watch`: run the monitor and print every update batch.

use std::io;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_stream::StreamExt;
use tokio_stream::wrappers::LinesStream;
use tracing::{debug, warn};

use netwatch_core::{ConnectivityEvent, MonitorConfig, MonitorSnapshot, NetworkMonitor};

use crate::cli::{OutputFormat, WatchArgs};
use crate::config::OutputOpts;
use crate::error::CliError;
use crate::output;

pub async fn handle(
    mut monitor_config: MonitorConfig,
    args: WatchArgs,
    out: &OutputOpts,
) -> Result<(), CliError> {
    if let Some(every) = args.speed_test_every {
        monitor_config.speed_test.auto_interval = Some(every);
    }

    let monitor = NetworkMonitor::new(monitor_config)?;
    let mut updates = monitor.subscribe();

    if args.stdin_events {
        let lines = LinesStream::new(BufReader::new(tokio::io::stdin()).lines());
        monitor
            .attach_event_source(lines.filter_map(parse_event_line))
            .await;
    }
    monitor.start().await;

    let stop = async move {
        match args.duration {
            Some(d) => tokio::time::sleep(d).await,
            None => std::future::pending::<()>().await,
        }
    };
    tokio::pin!(stop);

    loop {
        tokio::select! {
            biased;
            signal = tokio::signal::ctrl_c() => {
                if let Err(e) = signal {
                    warn!(error = %e, "failed to listen for Ctrl-C");
                }
                break;
            }
            () = &mut stop => break,
            snap = updates.changed() => {
                let Some(snap) = snap else { break };
                output::print_output(&render_update(&snap, out), out.quiet);
            }
        }
    }

    monitor.shutdown().await;
    Ok(())
}

/// One JSON-encoded `ConnectivityEvent` per line. Blank and malformed
/// lines are skipped.
fn parse_event_line(line: io::Result<String>) -> Option<ConnectivityEvent> {
    let line = match line {
        Ok(line) => line,
        Err(e) => {
            warn!(error = %e, "failed to read event from stdin");
            return None;
        }
    };
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }
    match serde_json::from_str(trimmed) {
        Ok(event) => Some(event),
        Err(e) => {
            debug!(line = trimmed, error = %e, "ignoring malformed event line");
            None
        }
    }
}

fn render_update(snap: &MonitorSnapshot, out: &OutputOpts) -> String {
    match out.format {
        OutputFormat::Table | OutputFormat::Plain => status_line(snap, out.color),
        OutputFormat::Json | OutputFormat::JsonCompact => output::render_json_compact(snap),
        OutputFormat::Yaml => format!("---\n{}", output::render_yaml(snap)),
    }
}

fn status_line(snap: &MonitorSnapshot, color: bool) -> String {
    let mut line = format!(
        "{}  {:<7}  {} ({:>3})  latency {:>5.0} ms  loss {:>5.1}%  downlink {:>6.1} Mbps  next probe {}",
        snap.updated_at.format("%H:%M:%S"),
        output::status_label(snap.is_offline(), color),
        output::level_label(snap.quality.level, color),
        snap.quality.score,
        snap.state.latency,
        snap.state.packet_loss,
        snap.state.downlink,
        output::fmt_duration(snap.next_probe_in),
    );
    if snap.manual_override.is_some() {
        line.push_str("  [manual]");
    }
    if snap.visibility.show_warning {
        line.push_str("  !");
    }
    line
}
