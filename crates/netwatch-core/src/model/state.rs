// ── Network state ──
//
// The monitor's view of the current connection. Created with optimistic
// defaults, then only ever mutated by the monitor's update batches.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::QualityLevel;

/// Downlink assumed before anything has been measured (Mbps).
pub const OPTIMISTIC_DOWNLINK_MBPS: f64 = 10.0;

/// Last known connection state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkState {
    pub is_online: bool,
    /// Platform-reported link class (e.g. `"4g"`). Advisory only.
    pub effective_type: Option<String>,
    /// Platform-reported link medium (e.g. `"wifi"`). Advisory only.
    pub connection_type: Option<String>,
    /// Estimated or measured bandwidth (Mbps).
    pub downlink: f64,
    /// Platform round-trip estimate (ms).
    pub rtt: f64,
    /// Probe round-trip (ms).
    pub latency: f64,
    /// Percentage of probe requests lost in the last round.
    pub packet_loss: f64,
    /// Most recent throughput measurement (Mbps).
    pub bandwidth: f64,
    /// Percentage of probe requests that succeeded in the last round.
    pub reliability: f64,
    pub connection_stability: QualityLevel,
    /// Platform "reduce data usage" hint.
    pub save_data: bool,
    pub last_online_time: Option<DateTime<Utc>>,
}

impl Default for NetworkState {
    fn default() -> Self {
        Self {
            is_online: true,
            effective_type: None,
            connection_type: None,
            downlink: OPTIMISTIC_DOWNLINK_MBPS,
            rtt: 0.0,
            latency: 0.0,
            packet_loss: 0.0,
            bandwidth: 0.0,
            reliability: 100.0,
            connection_stability: QualityLevel::Excellent,
            save_data: false,
            last_online_time: None,
        }
    }
}

impl NetworkState {
    /// Merge platform link fields. Absent fields keep their current value.
    pub fn merge_link(&mut self, link: &LinkInfo) {
        if let Some(ref t) = link.effective_type {
            self.effective_type = Some(t.clone());
        }
        if let Some(ref t) = link.connection_type {
            self.connection_type = Some(t.clone());
        }
        if let Some(d) = link.downlink {
            self.downlink = d.max(0.0);
        }
        if let Some(r) = link.rtt {
            self.rtt = r.max(0.0);
        }
        if let Some(s) = link.save_data {
            self.save_data = s;
        }
    }

    /// Platform reports a 2G-class link.
    pub fn is_cellular_slow(&self) -> bool {
        matches!(self.effective_type.as_deref(), Some("slow-2g" | "2g"))
    }
}

/// Link attributes reported by a platform connection-change event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinkInfo {
    pub effective_type: Option<String>,
    pub connection_type: Option<String>,
    pub downlink: Option<f64>,
    pub rtt: Option<f64>,
    pub save_data: Option<bool>,
}

/// User-asserted connectivity that supersedes automated detection until
/// the next real platform online/offline event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ManualOverride {
    Online,
    Offline,
}

/// Derived warning surface for the rendering layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Visibility {
    pub show_warning: bool,
    pub show_full_screen_modal: bool,
}

impl Visibility {
    /// Offline always warns and raises the modal (unless the user
    /// dismissed it); fair or worse warns; good and excellent stay quiet.
    pub fn derive(offline: bool, level: QualityLevel, modal_dismissed: bool) -> Self {
        if offline {
            return Self {
                show_warning: true,
                show_full_screen_modal: !modal_dismissed,
            };
        }
        Self {
            show_warning: level.warrants_warning(),
            show_full_screen_modal: false,
        }
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_optimistic() {
        let s = NetworkState::default();
        assert!(s.is_online);
        assert_eq!(s.connection_stability, QualityLevel::Excellent);
        assert_eq!(s.reliability, 100.0);
        assert!(s.last_online_time.is_none());
    }

    #[test]
    fn merge_link_keeps_absent_fields() {
        let mut s = NetworkState::default();
        s.merge_link(&LinkInfo {
            effective_type: Some("4g".into()),
            rtt: Some(80.0),
            ..LinkInfo::default()
        });
        assert_eq!(s.effective_type.as_deref(), Some("4g"));
        assert_eq!(s.rtt, 80.0);
        assert_eq!(s.downlink, OPTIMISTIC_DOWNLINK_MBPS);
        assert!(s.connection_type.is_none());
        assert!(s.is_online);
    }

    #[test]
    fn visibility_table() {
        let v = Visibility::derive(true, QualityLevel::Excellent, false);
        assert!(v.show_warning && v.show_full_screen_modal);

        let v = Visibility::derive(true, QualityLevel::Excellent, true);
        assert!(v.show_warning && !v.show_full_screen_modal);

        for level in [QualityLevel::Unstable, QualityLevel::Poor, QualityLevel::Fair] {
            let v = Visibility::derive(false, level, false);
            assert!(v.show_warning, "{level} should warn");
            assert!(!v.show_full_screen_modal);
        }

        for level in [QualityLevel::Good, QualityLevel::Excellent] {
            assert_eq!(Visibility::derive(false, level, false), Visibility::default());
        }
    }
}
