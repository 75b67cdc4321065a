// ── Runtime monitor configuration ──
//
// These types describe *what* to probe and *how* to judge the results.
// They never touch disk: `netwatch-config` (or any host application)
// builds a `MonitorConfig` and hands it in.

use std::time::Duration;

use url::Url;

use crate::model::QualityLevel;

/// Default reachability endpoints: cheap, cross-origin, highly available.
pub const DEFAULT_ENDPOINTS: [&str; 3] = [
    "https://www.google.com/favicon.ico",
    "https://www.cloudflare.com/favicon.ico",
    "https://www.github.com/favicon.ico",
];

pub const DEFAULT_LATENCY_URL: &str = "https://speed.cloudflare.com/__down?bytes=0";
pub const DEFAULT_DOWNLOAD_URL: &str = "https://speed.cloudflare.com/__down?bytes=100000";

/// Automatic speed tests never run more often than this.
pub const MIN_AUTO_SPEED_TEST_INTERVAL: Duration = Duration::from_secs(60);

/// TLS verification strategy for probe requests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store.
    #[default]
    SystemDefaults,
    /// Additionally trust a custom CA certificate file.
    CustomCa(std::path::PathBuf),
}

/// Probe interval per quality level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleConfig {
    pub excellent: Duration,
    pub good: Duration,
    pub fair: Duration,
    /// Used for both poor and unstable.
    pub poor: Duration,
    /// Consecutive rounds at a new level before the interval follows it.
    /// `1` switches immediately.
    pub level_confirmation_rounds: u32,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            excellent: Duration::from_secs(60),
            good: Duration::from_secs(30),
            fair: Duration::from_secs(15),
            poor: Duration::from_secs(10),
            level_confirmation_rounds: 1,
        }
    }
}

impl ScheduleConfig {
    pub fn interval_for(&self, level: QualityLevel) -> Duration {
        match level {
            QualityLevel::Excellent => self.excellent,
            QualityLevel::Good => self.good,
            QualityLevel::Fair => self.fair,
            QualityLevel::Poor | QualityLevel::Unstable => self.poor,
        }
    }
}

/// Scoring reference points and weights. All are tunable design choices.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringConfig {
    /// Downlink at which the speed factor saturates at 100 (Mbps).
    pub excellent_downlink_mbps: f64,
    /// Latency at which the latency factor reaches 0 (ms).
    pub poor_latency_ms: f64,
    /// Packet loss at which the loss factor reaches 0 (%).
    pub poor_packet_loss_pct: f64,
    pub latency_variance_weight: f64,
    pub bandwidth_variance_weight: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            excellent_downlink_mbps: 10.0,
            poor_latency_ms: 500.0,
            poor_packet_loss_pct: 5.0,
            latency_variance_weight: 2.0,
            bandwidth_variance_weight: 0.1,
        }
    }
}

/// Download speed test targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeedTestConfig {
    pub latency_url: Url,
    pub download_url: Url,
    pub timeout: Duration,
    /// Run automatically at this period. `None` = manual only.
    /// Clamped to [`MIN_AUTO_SPEED_TEST_INTERVAL`].
    pub auto_interval: Option<Duration>,
}

impl Default for SpeedTestConfig {
    fn default() -> Self {
        Self {
            latency_url: static_url(DEFAULT_LATENCY_URL),
            download_url: static_url(DEFAULT_DOWNLOAD_URL),
            timeout: Duration::from_secs(15),
            auto_interval: None,
        }
    }
}

impl SpeedTestConfig {
    /// The effective automatic period, if enabled.
    pub fn effective_auto_interval(&self) -> Option<Duration> {
        self.auto_interval
            .filter(|d| !d.is_zero())
            .map(|d| d.max(MIN_AUTO_SPEED_TEST_INTERVAL))
    }
}

/// Configuration for one network monitor.
#[derive(Debug, Clone, PartialEq)]
pub struct MonitorConfig {
    pub endpoints: Vec<Url>,
    /// Per-endpoint timeout for reachability rounds.
    pub probe_timeout: Duration,
    pub tls: TlsVerification,
    pub user_agent: Option<String>,
    pub speed_test: SpeedTestConfig,
    pub schedule: ScheduleConfig,
    pub scoring: ScoringConfig,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            endpoints: DEFAULT_ENDPOINTS.iter().map(|u| static_url(u)).collect(),
            probe_timeout: Duration::from_secs(5),
            tls: TlsVerification::default(),
            user_agent: None,
            speed_test: SpeedTestConfig::default(),
            schedule: ScheduleConfig::default(),
            scoring: ScoringConfig::default(),
        }
    }
}

/// Parse one of the URL constants in this module.
#[allow(clippy::expect_used)]
fn static_url(s: &str) -> Url {
    // Only called with the `DEFAULT_*` constants, all covered by tests.
    Url::parse(s).expect("built-in URL constants are valid")
}
