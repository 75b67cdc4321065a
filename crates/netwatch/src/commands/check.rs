//! `check`: one probe round, optionally a speed test, then a quality report.

use serde::Serialize;
use tabled::Tabled;

use netwatch_core::{
    MonitorConfig, MonitorSnapshot, NetworkMonitor, QualityLevel, SpeedTestResult,
};

use crate::cli::CheckArgs;
use crate::config::OutputOpts;
use crate::error::CliError;
use crate::output;

// ── Report ──────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct CheckReport {
    pub online: bool,
    pub level: QualityLevel,
    pub score: u8,
    pub latency_ms: f64,
    pub packet_loss_pct: f64,
    pub reliability_pct: f64,
    pub downlink_mbps: f64,
    pub stability: QualityLevel,
    pub recommendations: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed_test: Option<SpeedTestResult>,
}

impl CheckReport {
    fn new(snap: &MonitorSnapshot, speed_test: Option<SpeedTestResult>) -> Self {
        Self {
            online: !snap.is_offline(),
            level: snap.quality.level,
            score: snap.quality.score,
            latency_ms: snap.state.latency,
            packet_loss_pct: snap.state.packet_loss,
            reliability_pct: snap.state.reliability,
            downlink_mbps: snap.state.downlink,
            stability: snap.stability.level,
            recommendations: snap
                .quality
                .recommendations
                .iter()
                .map(ToString::to_string)
                .collect(),
            speed_test,
        }
    }
}

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct MetricRow {
    #[tabled(rename = "Metric")]
    metric: &'static str,
    #[tabled(rename = "Value")]
    value: String,
}

fn detail(report: &CheckReport, color: bool) -> String {
    let mut rows = vec![
        MetricRow {
            metric: "Status",
            value: output::status_label(!report.online, color),
        },
        MetricRow {
            metric: "Quality",
            value: format!(
                "{} ({}/100)",
                output::level_label(report.level, color),
                report.score
            ),
        },
        MetricRow {
            metric: "Latency",
            value: format!("{:.0} ms", report.latency_ms),
        },
        MetricRow {
            metric: "Packet loss",
            value: format!("{:.1}%", report.packet_loss_pct),
        },
        MetricRow {
            metric: "Reliability",
            value: format!("{:.1}%", report.reliability_pct),
        },
        MetricRow {
            metric: "Downlink",
            value: format!("{:.1} Mbps", report.downlink_mbps),
        },
        MetricRow {
            metric: "Stability",
            value: output::level_label(report.stability, color),
        },
    ];
    if let Some(ref st) = report.speed_test {
        rows.push(MetricRow {
            metric: "Speed test",
            value: format!(
                "{:.1} Mbps down, {:.0} ms",
                st.download_mbps, st.latency_ms
            ),
        });
    }

    let mut out = output::render_table(&rows);
    for rec in &report.recommendations {
        out.push_str("\n  • ");
        out.push_str(rec);
    }
    out
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    monitor_config: MonitorConfig,
    args: CheckArgs,
    out: &OutputOpts,
) -> Result<(), CliError> {
    let endpoints = monitor_config.endpoints.len();
    let monitor = NetworkMonitor::new(monitor_config)?;

    monitor.check_network_status().await;

    let speed_test = if args.speed_test && !monitor.is_offline() {
        Some(monitor.perform_speed_test().await?)
    } else {
        None
    };

    let snap = monitor.snapshot();
    let report = CheckReport::new(&snap, speed_test);
    let rendered = output::render_single(
        out.format,
        &report,
        |r| detail(r, out.color),
        |r| r.level.to_string(),
    );
    output::print_output(&rendered, out.quiet);

    if args.fail_offline && snap.is_offline() {
        return Err(CliError::Offline { endpoints });
    }
    Ok(())
}
