use std::fmt;

use serde::{Deserialize, Serialize};

use netwatch_probe::SpeedSample;

use super::QualityLevel;

/// Actionable advice attached to a quality assessment.
///
/// Declaration order is the order in which recommendations are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    SwitchNetwork,
    AvoidHeavyTransfers,
    RestartRouter,
    RealtimeDegraded,
}

impl Recommendation {
    pub fn message(self) -> &'static str {
        match self {
            Self::SwitchNetwork => {
                "Connection speed is low. Consider switching to a faster network."
            }
            Self::AvoidHeavyTransfers => {
                "High latency detected. Avoid bandwidth-heavy actions such as large uploads."
            }
            Self::RestartRouter => "Packet loss detected. Try restarting your router.",
            Self::RealtimeDegraded => {
                "Connection quality is poor. Real-time features like chat and live dashboards may be degraded."
            }
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Per-factor normalized scores (0–100) feeding the overall score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QualityFactors {
    pub speed: f64,
    pub latency: f64,
    pub packet_loss: f64,
    pub stability: f64,
}

/// Overall connection assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionQuality {
    /// Weighted overall score, 0–100.
    pub score: u8,
    pub level: QualityLevel,
    pub recommendations: Vec<Recommendation>,
    pub factors: QualityFactors,
}

impl Default for ConnectionQuality {
    fn default() -> Self {
        Self {
            score: 100,
            level: QualityLevel::Excellent,
            recommendations: Vec::new(),
            factors: QualityFactors {
                speed: 100.0,
                latency: 100.0,
                packet_loss: 100.0,
                stability: 100.0,
            },
        }
    }
}

/// Variance-based stability estimate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StabilityScore {
    pub score: f64,
    pub level: QualityLevel,
}

impl Default for StabilityScore {
    fn default() -> Self {
        Self {
            score: 100.0,
            level: QualityLevel::Excellent,
        }
    }
}

/// Result of a manual speed test.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpeedTestResult {
    pub download_mbps: f64,
    /// Always `None`: no upload endpoint is probed, and the value is never
    /// estimated from the download figure.
    pub upload_mbps: Option<f64>,
    pub latency_ms: f64,
}

impl From<SpeedSample> for SpeedTestResult {
    fn from(sample: SpeedSample) -> Self {
        Self {
            download_mbps: sample.download_mbps,
            upload_mbps: None,
            latency_ms: sample.latency_ms,
        }
    }
}
