// ── Monitor state store ──
//
// Single source of truth for everything the monitor derives. The whole
// snapshot lives in one `watch` channel, so every update batch is
// published atomically and readers only ever see complete snapshots.

mod apply;
mod history;

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::watch;

use crate::analysis::IntervalScheduler;
use crate::config::ScheduleConfig;
use crate::model::{
    ConnectionQuality, ManualOverride, NetworkState, StabilityScore, Visibility,
};

pub use history::{HISTORY_CAPACITY, MetricsHistory};

/// Everything a consumer may read about the connection, captured at one
/// instant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonitorSnapshot {
    pub state: NetworkState,
    pub quality: ConnectionQuality,
    pub stability: StabilityScore,
    pub visibility: Visibility,
    pub manual_override: Option<ManualOverride>,
    /// Delay before the next scheduled probe round.
    #[serde(with = "duration_secs")]
    pub next_probe_in: Duration,
    pub updated_at: DateTime<Utc>,
    #[serde(skip)]
    pub(crate) history: MetricsHistory,
    #[serde(skip)]
    pub(crate) scheduler: IntervalScheduler,
    #[serde(skip)]
    pub(crate) modal_dismissed: bool,
    /// Set by an offline platform event, cleared by an online event or a
    /// successful round. Outages detected only by failed rounds leave it
    /// unset.
    #[serde(skip)]
    pub(crate) platform_offline: bool,
    /// Bumped by every platform event and manual override. Probe rounds
    /// that started under an older epoch are discarded.
    #[serde(skip)]
    pub(crate) epoch: u64,
}

impl MonitorSnapshot {
    pub(crate) fn new(schedule: ScheduleConfig) -> Self {
        let scheduler = IntervalScheduler::new(schedule);
        Self {
            state: NetworkState::default(),
            quality: ConnectionQuality::default(),
            stability: StabilityScore::default(),
            visibility: Visibility::default(),
            manual_override: None,
            next_probe_in: scheduler.next_interval(),
            updated_at: Utc::now(),
            history: MetricsHistory::new(),
            scheduler,
            modal_dismissed: false,
            platform_offline: false,
            epoch: 0,
        }
    }

    /// A manual override wins over detected state.
    pub fn is_offline(&self) -> bool {
        match self.manual_override {
            Some(ManualOverride::Online) => false,
            Some(ManualOverride::Offline) => true,
            None => !self.state.is_online,
        }
    }

    /// Whether the probe loop should wait for the next update instead of
    /// probing. Only a platform offline event or a manual offline
    /// override pauses it; after a failed round it keeps probing at the
    /// outage interval until a round succeeds.
    pub(crate) fn probing_paused(&self) -> bool {
        match self.manual_override {
            Some(ManualOverride::Offline) => true,
            Some(ManualOverride::Online) => false,
            None => self.platform_offline,
        }
    }

    /// Online, but either the overall level is poor/unstable or the
    /// platform reports a 2G-class link.
    pub fn is_slow_connection(&self) -> bool {
        !self.is_offline() && (self.quality.level.is_degraded() || self.state.is_cellular_slow())
    }

    /// Online with a poor or unstable stability level.
    pub fn is_unstable_connection(&self) -> bool {
        !self.is_offline() && self.state.connection_stability.is_degraded()
    }

    pub fn history(&self) -> &MetricsHistory {
        &self.history
    }
}

/// Owner of the snapshot channel.
pub(crate) struct MonitorStore {
    snapshot: watch::Sender<MonitorSnapshot>,
}

impl MonitorStore {
    pub(crate) fn new(schedule: ScheduleConfig) -> Self {
        let (snapshot, _) = watch::channel(MonitorSnapshot::new(schedule));
        Self { snapshot }
    }

    /// Borrow the current snapshot. Keep the borrow short: it holds a read
    /// lock on the channel.
    pub(crate) fn borrow(&self) -> watch::Ref<'_, MonitorSnapshot> {
        self.snapshot.borrow()
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<MonitorSnapshot> {
        self.snapshot.subscribe()
    }

    /// Apply one update batch. Subscribers are notified only when `f`
    /// reports a change.
    pub(crate) fn update(&self, f: impl FnOnce(&mut MonitorSnapshot) -> bool) -> bool {
        self.snapshot.send_if_modified(|snap| {
            let changed = f(snap);
            if changed {
                snap.updated_at = Utc::now();
            }
            changed
        })
    }
}

mod duration_secs {
    use std::time::Duration;

    use serde::Serializer;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_f64(d.as_secs_f64())
    }
}
