// ── Rolling metrics history ──
//
// Four parallel FIFO sequences sharing one capacity. Appends always push
// to every sequence together, so lengths never diverge.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Samples retained per series.
pub const HISTORY_CAPACITY: usize = 50;

/// Bounded history of latency, bandwidth and packet-loss samples.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsHistory {
    latency: VecDeque<f64>,
    bandwidth: VecDeque<f64>,
    packet_loss: VecDeque<f64>,
    timestamp: VecDeque<DateTime<Utc>>,
}

impl MetricsHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one sample, evicting the oldest once at capacity.
    pub fn push(&mut self, latency: f64, bandwidth: f64, packet_loss: f64, at: DateTime<Utc>) {
        if self.timestamp.len() == HISTORY_CAPACITY {
            self.latency.pop_front();
            self.bandwidth.pop_front();
            self.packet_loss.pop_front();
            self.timestamp.pop_front();
        }
        self.latency.push_back(latency);
        self.bandwidth.push_back(bandwidth);
        self.packet_loss.push_back(packet_loss);
        self.timestamp.push_back(at);
    }

    pub fn len(&self) -> usize {
        self.timestamp.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamp.is_empty()
    }

    pub fn latency(&self) -> &VecDeque<f64> {
        &self.latency
    }

    pub fn bandwidth(&self) -> &VecDeque<f64> {
        &self.bandwidth
    }

    pub fn packet_loss(&self) -> &VecDeque<f64> {
        &self.packet_loss
    }

    pub fn timestamps(&self) -> &VecDeque<DateTime<Utc>> {
        &self.timestamp
    }

    /// Up to `n` most recent latency samples, oldest first.
    pub fn recent_latency(&self, n: usize) -> impl Iterator<Item = f64> + '_ {
        recent(&self.latency, n)
    }

    /// Up to `n` most recent bandwidth samples, oldest first.
    pub fn recent_bandwidth(&self, n: usize) -> impl Iterator<Item = f64> + '_ {
        recent(&self.bandwidth, n)
    }
}

fn recent(series: &VecDeque<f64>, n: usize) -> impl Iterator<Item = f64> + '_ {
    series.iter().skip(series.len().saturating_sub(n)).copied()
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    fn assert_aligned(h: &MetricsHistory) {
        assert_eq!(h.latency().len(), h.len());
        assert_eq!(h.bandwidth().len(), h.len());
        assert_eq!(h.packet_loss().len(), h.len());
        assert_eq!(h.timestamps().len(), h.len());
    }

    #[test]
    fn never_exceeds_capacity() {
        let mut h = MetricsHistory::new();
        let now = Utc::now();
        for i in 0..(HISTORY_CAPACITY * 3 + 7) {
            h.push(f64::from(u32::try_from(i).unwrap_or(0)), 1.0, 0.0, now);
            assert!(h.len() <= HISTORY_CAPACITY);
            assert_aligned(&h);
        }
        assert_eq!(h.len(), HISTORY_CAPACITY);
    }

    #[test]
    fn evicts_oldest_first() {
        let mut h = MetricsHistory::new();
        let now = Utc::now();
        for i in 0..=HISTORY_CAPACITY {
            h.push(f64::from(u32::try_from(i).unwrap_or(0)), 0.0, 0.0, now);
        }
        assert_eq!(h.latency().front().copied(), Some(1.0));
        assert_eq!(h.latency().back().copied(), Some(50.0));
    }

    #[test]
    fn recent_takes_tail_in_order() {
        let mut h = MetricsHistory::new();
        let now = Utc::now();
        for v in [1.0, 2.0, 3.0, 4.0] {
            h.push(v, v * 10.0, 0.0, now);
        }
        assert_eq!(h.recent_latency(2).collect::<Vec<_>>(), vec![3.0, 4.0]);
        assert_eq!(h.recent_bandwidth(10).count(), 4);
    }
}
