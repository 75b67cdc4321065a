// ── Probe measurement results ──
//
// Plain value types returned by `ProbeClient`. They carry no behavior
// beyond construction; interpretation belongs to `netwatch-core`.

use std::time::Duration;

/// Outcome of one reachability round across all configured endpoints.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReachabilityReport {
    /// Time from dispatch until the first endpoint answered successfully.
    /// When nothing succeeded, the time until the whole batch settled.
    pub latency_ms: f64,
    /// Share of endpoints reached, 0–100.
    pub reliability_pct: f64,
    /// `100 - reliability_pct`.
    pub packet_loss_pct: f64,
    pub successes: usize,
    pub total: usize,
    pub any_success: bool,
}

impl ReachabilityReport {
    /// Build a report from raw success counts.
    #[allow(clippy::cast_precision_loss, clippy::as_conversions)]
    pub fn from_counts(successes: usize, total: usize, latency: Duration) -> Self {
        let successes = successes.min(total);
        let reliability_pct = if total == 0 {
            0.0
        } else {
            successes as f64 / total as f64 * 100.0
        };
        Self {
            latency_ms: duration_ms(latency),
            reliability_pct,
            packet_loss_pct: 100.0 - reliability_pct,
            successes,
            total,
            any_success: successes > 0,
        }
    }
}

/// Result of a download speed test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedSample {
    /// Round-trip time of the reference HEAD request.
    pub latency_ms: f64,
    pub download_mbps: f64,
    pub bytes: usize,
}

/// Megabits per second for `bytes` transferred in `elapsed`.
///
/// Sub-millisecond transfers are clamped to one millisecond so a cached or
/// loopback response cannot produce an infinite rate.
#[allow(clippy::cast_precision_loss, clippy::as_conversions)]
pub fn throughput_mbps(bytes: usize, elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64().max(0.001);
    (bytes as f64 * 8.0) / (secs * 1_000_000.0)
}

pub(crate) fn duration_ms(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn reliability_and_loss_are_complementary() {
        for (ok, total) in [(0, 3), (1, 3), (2, 3), (3, 3), (2, 5)] {
            let r = ReachabilityReport::from_counts(ok, total, Duration::from_millis(40));
            assert!((0.0..=100.0).contains(&r.reliability_pct));
            assert_eq!(r.packet_loss_pct, 100.0 - r.reliability_pct);
            assert_eq!(r.any_success, ok > 0);
        }
    }

    #[test]
    fn empty_round_is_total_loss() {
        let r = ReachabilityReport::from_counts(0, 0, Duration::ZERO);
        assert_eq!(r.reliability_pct, 0.0);
        assert_eq!(r.packet_loss_pct, 100.0);
        assert!(!r.any_success);
    }

    #[test]
    fn throughput_of_100kb_in_one_second() {
        let mbps = throughput_mbps(100_000, Duration::from_secs(1));
        assert!((mbps - 0.8).abs() < 1e-9);
    }

    #[test]
    fn throughput_clamps_zero_elapsed() {
        let mbps = throughput_mbps(1_000, Duration::ZERO);
        assert!(mbps.is_finite());
        assert!((mbps - 8.0).abs() < 1e-9);
    }
}
