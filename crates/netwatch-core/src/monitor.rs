// ── Network monitor ──
//
// Lifecycle owner for connection-quality monitoring. Holds the probe
// client and the state store, runs the adaptive probe loop and the
// optional automatic speed test as background tasks, and exposes
// read-only derived views to consumers.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use futures_core::Stream;
use futures_util::StreamExt;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use netwatch_probe::{
    ProbeClient, ReachabilityReport, SpeedSample, SpeedTestTarget, TlsMode, TransportConfig,
};

use crate::config::{MonitorConfig, TlsVerification};
use crate::error::CoreError;
use crate::event::ConnectivityEvent;
use crate::model::{ConnectionQuality, ManualOverride, NetworkState, SpeedTestResult};
use crate::store::{MetricsHistory, MonitorSnapshot, MonitorStore};
use crate::stream::MonitorStream;

// ── NetworkMonitor ───────────────────────────────────────────────

/// Process-wide connection monitor.
///
/// Construct one per application and share it: the handle is cheaply
/// cloneable via `Arc<MonitorInner>`. Nothing runs until
/// [`start()`](Self::start); [`shutdown()`](Self::shutdown) cancels and
/// joins every background task.
#[derive(Clone)]
pub struct NetworkMonitor {
    inner: Arc<MonitorInner>,
}

struct MonitorInner {
    config: MonitorConfig,
    probe: ProbeClient,
    store: MonitorStore,
    /// Child token for the current run. Cancelled on shutdown and
    /// replaced, so the monitor can be started again.
    cancel: Mutex<CancellationToken>,
    task_handles: Mutex<Vec<JoinHandle<()>>>,
}

impl NetworkMonitor {
    /// Create a monitor from configuration. Does NOT start probing.
    pub fn new(config: MonitorConfig) -> Result<Self, CoreError> {
        let probe = ProbeClient::new(
            config.endpoints.clone(),
            speed_test_target(&config),
            &build_transport(&config),
        )?;
        Ok(Self::with_probe(config, probe))
    }

    /// Create a monitor around an existing probe client.
    pub fn with_probe(config: MonitorConfig, probe: ProbeClient) -> Self {
        let store = MonitorStore::new(config.schedule.clone());
        Self {
            inner: Arc::new(MonitorInner {
                config,
                probe,
                store,
                cancel: Mutex::new(CancellationToken::new()),
                task_handles: Mutex::new(Vec::new()),
            }),
        }
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.inner.config
    }

    // ── Lifecycle ────────────────────────────────────────────────

    /// Spawn the adaptive probe loop and, if configured, the automatic
    /// speed test. Calling `start()` on a running monitor is a no-op.
    pub async fn start(&self) {
        let mut handles = self.inner.task_handles.lock().await;
        if !handles.is_empty() {
            debug!("monitor already running");
            return;
        }
        let cancel = self.inner.cancel.lock().await.clone();

        handles.push(tokio::spawn(probe_loop_task(self.clone(), cancel.clone())));

        if let Some(period) = self.inner.config.speed_test.effective_auto_interval() {
            handles.push(tokio::spawn(speed_test_task(self.clone(), period, cancel)));
        }

        info!(
            endpoints = self.inner.probe.endpoints().len(),
            "network monitor started"
        );
    }

    /// Feed platform connectivity events from `events` until the stream
    /// ends or the monitor shuts down. When the stream ends the monitor
    /// keeps running probe-only.
    pub async fn attach_event_source<S>(&self, events: S)
    where
        S: Stream<Item = ConnectivityEvent> + Send + 'static,
    {
        let cancel = self.inner.cancel.lock().await.clone();
        let handle = tokio::spawn(event_listener_task(self.clone(), events, cancel));
        self.inner.task_handles.lock().await.push(handle);
    }

    /// Cancel and join all background tasks. In-flight probes are
    /// dropped, abandoning their requests.
    pub async fn shutdown(&self) {
        {
            let mut cancel = self.inner.cancel.lock().await;
            cancel.cancel();
            *cancel = CancellationToken::new();
        }

        let mut handles = self.inner.task_handles.lock().await;
        for handle in handles.drain(..) {
            let _ = handle.await;
        }
        info!("network monitor stopped");
    }

    // ── Read-only views ──────────────────────────────────────────

    /// Full snapshot of the current state.
    pub fn snapshot(&self) -> MonitorSnapshot {
        self.inner.store.borrow().clone()
    }

    /// Subscribe to every update batch.
    pub fn subscribe(&self) -> MonitorStream {
        MonitorStream::new(self.inner.store.subscribe())
    }

    pub fn state(&self) -> NetworkState {
        self.inner.store.borrow().state.clone()
    }

    pub fn connection_quality(&self) -> ConnectionQuality {
        self.inner.store.borrow().quality.clone()
    }

    pub fn network_history(&self) -> MetricsHistory {
        self.inner.store.borrow().history.clone()
    }

    pub fn is_offline(&self) -> bool {
        self.inner.store.borrow().is_offline()
    }

    pub fn is_slow_connection(&self) -> bool {
        self.inner.store.borrow().is_slow_connection()
    }

    pub fn is_unstable_connection(&self) -> bool {
        self.inner.store.borrow().is_unstable_connection()
    }

    pub fn show_network_warning(&self) -> bool {
        self.inner.store.borrow().visibility.show_warning
    }

    pub fn show_full_screen_modal(&self) -> bool {
        self.inner.store.borrow().visibility.show_full_screen_modal
    }

    /// Delay the probe loop will wait before its next round.
    pub fn next_probe_interval(&self) -> Duration {
        self.inner.store.borrow().next_probe_in
    }

    // ── Actions ──────────────────────────────────────────────────

    /// Run one probe round now (e.g. a "retry connection" button).
    ///
    /// Returns `false` without any network I/O if a round is already in
    /// flight, or if the result was superseded by a platform event or
    /// manual override that arrived while it ran.
    pub async fn check_network_status(&self) -> bool {
        let epoch = self.inner.store.borrow().epoch;
        let Some(report) = self.inner.probe.check_reachability().await else {
            return false;
        };
        self.apply_round(&report, epoch)
    }

    /// Run a download speed test and fold the result into the state.
    ///
    /// On failure the previous downlink is kept and nothing else changes.
    /// Upload speed is not measured; `upload_mbps` is always `None`.
    pub async fn perform_speed_test(&self) -> Result<SpeedTestResult, CoreError> {
        match self.inner.probe.speed_test().await {
            Ok(sample) => {
                self.record_speed_sample(&sample);
                Ok(SpeedTestResult::from(sample))
            }
            Err(e) => {
                warn!(error = %e, "speed test failed, keeping previous downlink");
                Err(e.into())
            }
        }
    }

    pub fn manually_set_online(&self) {
        self.apply_override(ManualOverride::Online);
    }

    pub fn manually_set_offline(&self) {
        self.apply_override(ManualOverride::Offline);
    }

    /// Show or dismiss the full-screen modal. A dismissal lasts until the
    /// next time the connection goes offline.
    pub fn set_show_full_screen_modal(&self, show: bool) {
        self.inner.store.update(|snap| snap.apply_modal_request(show));
    }

    /// Apply a platform connectivity event immediately.
    pub fn handle_event(&self, event: &ConnectivityEvent) {
        let scoring = &self.inner.config.scoring;
        self.inner.store.update(|snap| {
            snap.apply_event(event, scoring, Utc::now());
            true
        });
    }

    /// Fold an externally obtained speed sample into the state.
    pub fn record_speed_sample(&self, sample: &SpeedSample) {
        let scoring = &self.inner.config.scoring;
        self.inner.store.update(|snap| {
            snap.apply_speed_sample(sample, scoring, Utc::now());
            true
        });
    }

    // ── Internals ────────────────────────────────────────────────

    /// Apply a round unless an event or override arrived after it started.
    fn apply_round(&self, report: &ReachabilityReport, started_epoch: u64) -> bool {
        let scoring = &self.inner.config.scoring;
        self.inner.store.update(|snap| {
            if started_epoch != snap.epoch {
                debug!("discarding probe round superseded by a newer connectivity event");
                return false;
            }
            snap.apply_reachability(report, scoring, Utc::now());
            true
        })
    }

    fn apply_override(&self, manual: ManualOverride) {
        let scoring = &self.inner.config.scoring;
        self.inner.store.update(|snap| {
            snap.apply_override(manual, scoring, Utc::now());
            true
        });
    }
}

// ── Background tasks ─────────────────────────────────────────────

/// Adaptive probe loop.
///
/// Re-reads the latest snapshot at the top of every iteration. After a
/// platform offline event or a manual offline override it parks until
/// the next update batch instead of probing. An outage seen only by
/// failed rounds keeps it probing at the outage interval.
async fn probe_loop_task(monitor: NetworkMonitor, cancel: CancellationToken) {
    let mut updates = monitor.inner.store.subscribe();

    loop {
        let paused = updates.borrow_and_update().probing_paused();
        if paused {
            debug!("reported offline, probe loop paused");
            tokio::select! {
                biased;
                () = cancel.cancelled() => break,
                changed = updates.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    continue;
                }
            }
        }

        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = monitor.check_network_status() => {}
        }

        let period = monitor.next_probe_interval();
        debug!(interval_secs = period.as_secs_f64(), "next probe scheduled");
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            () = tokio::time::sleep(period) => {}
        }
    }
}

/// Periodic speed test. Skipped while offline; failures are logged by
/// `perform_speed_test` and otherwise ignored.
async fn speed_test_task(monitor: NetworkMonitor, period: Duration, cancel: CancellationToken) {
    let mut interval = tokio::time::interval(period);
    interval.tick().await; // consume the immediate first tick

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                if monitor.is_offline() {
                    debug!("offline, skipping automatic speed test");
                    continue;
                }
                tokio::select! {
                    biased;
                    () = cancel.cancelled() => break,
                    _ = monitor.perform_speed_test() => {}
                }
            }
        }
    }
}

async fn event_listener_task<S>(monitor: NetworkMonitor, events: S, cancel: CancellationToken)
where
    S: Stream<Item = ConnectivityEvent> + Send + 'static,
{
    let mut events = std::pin::pin!(events);

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            event = events.next() => {
                let Some(event) = event else {
                    info!("connectivity event source closed, continuing probe-only");
                    break;
                };
                debug!(?event, "platform connectivity event");
                monitor.handle_event(&event);
            }
        }
    }
}

// ── Helpers ──────────────────────────────────────────────────────

fn build_transport(config: &MonitorConfig) -> TransportConfig {
    let mut transport = TransportConfig {
        timeout: config.probe_timeout,
        tls: match &config.tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
        },
        ..TransportConfig::default()
    };
    if let Some(ref ua) = config.user_agent {
        transport.user_agent.clone_from(ua);
    }
    transport
}

fn speed_test_target(config: &MonitorConfig) -> SpeedTestTarget {
    SpeedTestTarget {
        latency_url: config.speed_test.latency_url.clone(),
        download_url: config.speed_test.download_url.clone(),
        timeout: config.speed_test.timeout,
    }
}
