//! Shared configuration for the netwatch monitor.
//!
//! TOML file + `NETWATCH_*` environment layering via `figment`, validation,
//! and translation to `netwatch_core::MonitorConfig`. The CLI adds
//! flag-aware overrides on top.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use netwatch_core::config::{DEFAULT_DOWNLOAD_URL, DEFAULT_ENDPOINTS, DEFAULT_LATENCY_URL};
use netwatch_core::{
    MonitorConfig, ScheduleConfig, ScoringConfig, SpeedTestConfig, TlsVerification,
};

/// Environment prefix; nested keys are separated by `__`
/// (e.g. `NETWATCH_PROBE__TIMEOUT_SECS=3`).
pub const ENV_PREFIX: &str = "NETWATCH_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

fn invalid(field: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Validation {
        field: field.into(),
        reason: reason.into(),
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Output defaults for the CLI.
    #[serde(default)]
    pub defaults: Defaults,

    #[serde(default)]
    pub probe: ProbeSection,

    #[serde(default)]
    pub speed_test: SpeedTestSection,

    #[serde(default)]
    pub schedule: ScheduleSection,

    #[serde(default)]
    pub scoring: ScoringSection,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}

/// `[probe]`: reachability endpoints and transport.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ProbeSection {
    #[serde(default = "default_endpoints")]
    pub endpoints: Vec<String>,

    #[serde(default = "default_probe_timeout")]
    pub timeout_secs: u64,

    /// Overrides the default `netwatch/<version>` agent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,

    /// Additional CA certificate to trust (PEM).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca_cert: Option<PathBuf>,
}

impl Default for ProbeSection {
    fn default() -> Self {
        Self {
            endpoints: default_endpoints(),
            timeout_secs: default_probe_timeout(),
            user_agent: None,
            ca_cert: None,
        }
    }
}

fn default_endpoints() -> Vec<String> {
    DEFAULT_ENDPOINTS.iter().map(ToString::to_string).collect()
}
fn default_probe_timeout() -> u64 {
    5
}

/// `[speed_test]`: download measurement targets.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SpeedTestSection {
    #[serde(default = "default_latency_url")]
    pub latency_url: String,

    #[serde(default = "default_download_url")]
    pub download_url: String,

    #[serde(default = "default_speed_test_timeout")]
    pub timeout_secs: u64,

    /// `0` = manual only; anything else is clamped to at least 60.
    #[serde(default)]
    pub auto_interval_secs: u64,
}

impl Default for SpeedTestSection {
    fn default() -> Self {
        Self {
            latency_url: default_latency_url(),
            download_url: default_download_url(),
            timeout_secs: default_speed_test_timeout(),
            auto_interval_secs: 0,
        }
    }
}

fn default_latency_url() -> String {
    DEFAULT_LATENCY_URL.into()
}
fn default_download_url() -> String {
    DEFAULT_DOWNLOAD_URL.into()
}
fn default_speed_test_timeout() -> u64 {
    15
}

/// `[schedule]`: probe interval per quality level.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ScheduleSection {
    pub excellent_secs: u64,
    pub good_secs: u64,
    pub fair_secs: u64,
    pub poor_secs: u64,
    pub level_confirmation_rounds: u32,
}

impl Default for ScheduleSection {
    fn default() -> Self {
        let runtime = ScheduleConfig::default();
        Self {
            excellent_secs: runtime.excellent.as_secs(),
            good_secs: runtime.good.as_secs(),
            fair_secs: runtime.fair.as_secs(),
            poor_secs: runtime.poor.as_secs(),
            level_confirmation_rounds: runtime.level_confirmation_rounds,
        }
    }
}

/// `[scoring]`: reference points and stability weights.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ScoringSection {
    pub excellent_downlink_mbps: f64,
    pub poor_latency_ms: f64,
    pub poor_packet_loss_pct: f64,
    pub latency_variance_weight: f64,
    pub bandwidth_variance_weight: f64,
}

impl Default for ScoringSection {
    fn default() -> Self {
        let runtime = ScoringConfig::default();
        Self {
            excellent_downlink_mbps: runtime.excellent_downlink_mbps,
            poor_latency_ms: runtime.poor_latency_ms,
            poor_packet_loss_pct: runtime.poor_packet_loss_pct,
            latency_variance_weight: runtime.latency_variance_weight,
            bandwidth_variance_weight: runtime.bandwidth_variance_weight,
        }
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("dev", "netwatch", "netwatch").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("netwatch");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load the full Config from `path` + environment. A missing file is
/// not an error: defaults and environment still apply.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"));

    let config: Config = figment.extract()?;
    config.validate()?;
    Ok(config)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

/// Serialize config to TOML and write it to `path`.
pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Validation & translation ────────────────────────────────────────

impl Config {
    /// Reject values the monitor cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.probe.endpoints.is_empty() {
            return Err(invalid("probe.endpoints", "at least one endpoint is required"));
        }
        for endpoint in &self.probe.endpoints {
            parse_url("probe.endpoints", endpoint)?;
        }
        if self.probe.timeout_secs == 0 {
            return Err(invalid("probe.timeout_secs", "must be greater than 0"));
        }

        parse_url("speed_test.latency_url", &self.speed_test.latency_url)?;
        parse_url("speed_test.download_url", &self.speed_test.download_url)?;
        if self.speed_test.timeout_secs == 0 {
            return Err(invalid("speed_test.timeout_secs", "must be greater than 0"));
        }

        let s = &self.schedule;
        for (field, secs) in [
            ("schedule.excellent_secs", s.excellent_secs),
            ("schedule.good_secs", s.good_secs),
            ("schedule.fair_secs", s.fair_secs),
            ("schedule.poor_secs", s.poor_secs),
        ] {
            if secs == 0 {
                return Err(invalid(field, "must be greater than 0"));
            }
        }
        if s.level_confirmation_rounds == 0 {
            return Err(invalid(
                "schedule.level_confirmation_rounds",
                "must be at least 1",
            ));
        }

        let sc = &self.scoring;
        for (field, value) in [
            ("scoring.excellent_downlink_mbps", sc.excellent_downlink_mbps),
            ("scoring.poor_latency_ms", sc.poor_latency_ms),
            ("scoring.poor_packet_loss_pct", sc.poor_packet_loss_pct),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(invalid(field, format!("must be a positive number, got {value}")));
            }
        }
        for (field, value) in [
            ("scoring.latency_variance_weight", sc.latency_variance_weight),
            ("scoring.bandwidth_variance_weight", sc.bandwidth_variance_weight),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(invalid(field, format!("must be non-negative, got {value}")));
            }
        }

        Ok(())
    }

    /// Build the runtime `MonitorConfig`.
    pub fn to_monitor_config(&self) -> Result<MonitorConfig, ConfigError> {
        self.validate()?;

        let endpoints = self
            .probe
            .endpoints
            .iter()
            .map(|e| parse_url("probe.endpoints", e))
            .collect::<Result<Vec<_>, _>>()?;

        let tls = self
            .probe
            .ca_cert
            .clone()
            .map_or(TlsVerification::SystemDefaults, TlsVerification::CustomCa);

        let auto_interval = match self.speed_test.auto_interval_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        };

        Ok(MonitorConfig {
            endpoints,
            probe_timeout: Duration::from_secs(self.probe.timeout_secs),
            tls,
            user_agent: self.probe.user_agent.clone(),
            speed_test: SpeedTestConfig {
                latency_url: parse_url("speed_test.latency_url", &self.speed_test.latency_url)?,
                download_url: parse_url("speed_test.download_url", &self.speed_test.download_url)?,
                timeout: Duration::from_secs(self.speed_test.timeout_secs),
                auto_interval,
            },
            schedule: ScheduleConfig {
                excellent: Duration::from_secs(self.schedule.excellent_secs),
                good: Duration::from_secs(self.schedule.good_secs),
                fair: Duration::from_secs(self.schedule.fair_secs),
                poor: Duration::from_secs(self.schedule.poor_secs),
                level_confirmation_rounds: self.schedule.level_confirmation_rounds,
            },
            scoring: ScoringConfig {
                excellent_downlink_mbps: self.scoring.excellent_downlink_mbps,
                poor_latency_ms: self.scoring.poor_latency_ms,
                poor_packet_loss_pct: self.scoring.poor_packet_loss_pct,
                latency_variance_weight: self.scoring.latency_variance_weight,
                bandwidth_variance_weight: self.scoring.bandwidth_variance_weight,
            },
        })
    }
}

fn parse_url(field: &str, raw: &str) -> Result<Url, ConfigError> {
    let url: Url = raw
        .parse()
        .map_err(|_| invalid(field, format!("invalid URL: {raw}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(field, format!("expected an http(s) URL, got {raw}")));
    }
    Ok(url)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use figment::Jail;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn defaults_translate_to_runtime_defaults() {
        let runtime = Config::default().to_monitor_config().unwrap();
        assert_eq!(runtime, MonitorConfig::default());
    }

    #[test]
    fn file_then_env_layering() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "netwatch.toml",
                r#"
                [probe]
                endpoints = ["https://example.com/ping"]
                timeout_secs = 3

                [schedule]
                poor_secs = 5
                "#,
            )?;
            jail.set_env("NETWATCH_PROBE__TIMEOUT_SECS", "7");
            jail.set_env("NETWATCH_SCHEDULE__LEVEL_CONFIRMATION_ROUNDS", "2");

            let cfg = load_config_from(Path::new("netwatch.toml")).unwrap();
            assert_eq!(cfg.probe.endpoints, vec!["https://example.com/ping"]);
            assert_eq!(cfg.probe.timeout_secs, 7);
            assert_eq!(cfg.schedule.poor_secs, 5);
            assert_eq!(cfg.schedule.good_secs, 30);
            assert_eq!(cfg.schedule.level_confirmation_rounds, 2);
            Ok(())
        });
    }

    #[test]
    fn missing_file_uses_defaults() {
        Jail::expect_with(|_| {
            let cfg = load_config_from(Path::new("does-not-exist.toml")).unwrap();
            assert_eq!(cfg, Config::default());
            Ok(())
        });
    }

    #[test]
    fn invalid_values_are_rejected() {
        Jail::expect_with(|jail| {
            jail.create_file("bad.toml", "[schedule]\nfair_secs = 0\n")?;
            let err = load_config_from(Path::new("bad.toml")).unwrap_err();
            assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "schedule.fair_secs"));
            Ok(())
        });
    }

    #[test]
    fn rejects_empty_and_malformed_endpoints() {
        let mut cfg = Config::default();
        cfg.probe.endpoints.clear();
        assert!(cfg.validate().is_err());

        cfg.probe.endpoints = vec!["not a url".into()];
        assert!(cfg.validate().is_err());

        cfg.probe.endpoints = vec!["ftp://example.com/file".into()];
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_non_positive_scoring() {
        let mut cfg = Config::default();
        cfg.scoring.poor_latency_ms = 0.0;
        assert!(cfg.validate().is_err());

        let mut cfg = Config::default();
        cfg.scoring.latency_variance_weight = -1.0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn auto_interval_and_ca_cert_translate() {
        let mut cfg = Config::default();
        cfg.speed_test.auto_interval_secs = 30;
        cfg.probe.ca_cert = Some(PathBuf::from("/etc/netwatch/ca.pem"));

        let runtime = cfg.to_monitor_config().unwrap();
        assert_eq!(runtime.speed_test.auto_interval, Some(Duration::from_secs(30)));
        assert_eq!(
            runtime.speed_test.effective_auto_interval(),
            Some(Duration::from_secs(60))
        );
        assert_eq!(
            runtime.tls,
            TlsVerification::CustomCa(PathBuf::from("/etc/netwatch/ca.pem"))
        );
    }

    #[test]
    fn save_then_load_preserves_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.schedule.excellent_secs = 120;
        cfg.probe.user_agent = Some("probe-bot/1.0".into());
        save_config_to(&cfg, &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("excellent_secs = 120"));
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed, cfg);
    }
}
