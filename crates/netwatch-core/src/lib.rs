//! Connection-quality monitoring between `netwatch-probe` and UI consumers.
//!
//! This crate owns the scoring logic, the domain model, and the reactive
//! state for the netwatch workspace:
//!
//! - **[`NetworkMonitor`]**: Process-wide facade.
//!   [`start()`](NetworkMonitor::start) spawns the adaptive probe loop (and
//!   the optional automatic speed test); platform events arrive through
//!   [`handle_event()`](NetworkMonitor::handle_event) or
//!   [`attach_event_source()`](NetworkMonitor::attach_event_source).
//!
//! - **[`MonitorSnapshot`]**: One consistent view of state, quality,
//!   stability and warning visibility. Published atomically through a
//!   `tokio::sync::watch` channel after every update batch.
//!
//! - **[`MonitorStream`]**: Subscription handle exposing `current()` /
//!   `latest()` / `changed()` for reactive rendering.
//!
//! - **Analysis** ([`analysis`]): Pure functions: stability from the
//!   rolling [`MetricsHistory`], the weighted quality score, and the
//!   level-driven probe interval.

pub mod analysis;
pub mod config;
pub mod error;
pub mod event;
pub mod model;
pub mod monitor;
pub mod store;
pub mod stream;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{
    MonitorConfig, ScheduleConfig, ScoringConfig, SpeedTestConfig, TlsVerification,
};
pub use error::CoreError;
pub use event::ConnectivityEvent;
pub use monitor::NetworkMonitor;
pub use store::{HISTORY_CAPACITY, MetricsHistory, MonitorSnapshot};
pub use stream::{MonitorStream, SnapshotWatchStream};

pub use model::{
    ConnectionQuality, LinkInfo, ManualOverride, NetworkState, QualityFactors, QualityLevel,
    Recommendation, SpeedTestResult, StabilityScore, Visibility,
};

// Probe output types appear in the monitor's injection API.
pub use netwatch_probe::{ReachabilityReport, SpeedSample};
