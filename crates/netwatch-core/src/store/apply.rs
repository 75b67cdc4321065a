// ── Update batches ──
//
// Every mutation of a `MonitorSnapshot` goes through one of these
// methods, and each ends in `recompute()` so state, history, stability,
// quality and visibility always move together.

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use netwatch_probe::{ReachabilityReport, SpeedSample};

use super::MonitorSnapshot;
use crate::analysis::{QualityInputs, assess, estimate_stability};
use crate::config::ScoringConfig;
use crate::event::ConnectivityEvent;
use crate::model::{ManualOverride, Visibility};

impl MonitorSnapshot {
    /// Fold one reachability round into the snapshot.
    ///
    /// A round with no successes marks the connection offline and
    /// schedules the next round at the outage interval. While a manual override is active the
    /// round still updates the measurements but leaves online status to
    /// the user.
    pub(crate) fn apply_reachability(
        &mut self,
        report: &ReachabilityReport,
        scoring: &ScoringConfig,
        now: DateTime<Utc>,
    ) {
        self.state.packet_loss = report.packet_loss_pct;
        self.state.reliability = report.reliability_pct;

        if report.any_success {
            self.state.latency = report.latency_ms;
            self.history.push(
                report.latency_ms,
                self.state.downlink,
                report.packet_loss_pct,
                now,
            );
        }

        if self.manual_override.is_none() {
            if report.any_success {
                self.platform_offline = false;
                self.state.last_online_time = Some(now);
                self.set_online(true);
            } else {
                self.set_online(false);
            }
        }

        self.recompute(scoring);
        if self.scheduler.observe(self.quality.level) {
            debug!(
                level = %self.scheduler.active_level(),
                interval_secs = self.scheduler.next_interval().as_secs(),
                "probe interval adjusted"
            );
        }
        self.next_probe_in = if report.any_success {
            self.scheduler.next_interval()
        } else {
            self.scheduler.outage_interval()
        };
    }

    /// Fold a successful speed test into the snapshot.
    pub(crate) fn apply_speed_sample(
        &mut self,
        sample: &SpeedSample,
        scoring: &ScoringConfig,
        now: DateTime<Utc>,
    ) {
        self.state.downlink = sample.download_mbps;
        self.state.bandwidth = sample.download_mbps;
        self.state.latency = sample.latency_ms;
        self.history.push(
            sample.latency_ms,
            sample.download_mbps,
            self.state.packet_loss,
            now,
        );
        self.recompute(scoring);
    }

    /// Apply a platform connectivity event.
    pub(crate) fn apply_event(
        &mut self,
        event: &ConnectivityEvent,
        scoring: &ScoringConfig,
        now: DateTime<Utc>,
    ) {
        match event {
            ConnectivityEvent::Online => {
                self.epoch += 1;
                self.manual_override = None;
                self.platform_offline = false;
                self.state.last_online_time = Some(now);
                self.set_online(true);
            }
            ConnectivityEvent::Offline => {
                self.epoch += 1;
                self.manual_override = None;
                self.platform_offline = true;
                self.set_online(false);
            }
            ConnectivityEvent::LinkChanged(link) => {
                self.state.merge_link(link);
                debug!(
                    effective_type = ?self.state.effective_type,
                    downlink = self.state.downlink,
                    rtt = self.state.rtt,
                    "link attributes changed"
                );
            }
        }
        self.recompute(scoring);
    }

    /// Record a user-asserted connectivity state.
    pub(crate) fn apply_override(
        &mut self,
        manual: ManualOverride,
        scoring: &ScoringConfig,
        now: DateTime<Utc>,
    ) {
        self.epoch += 1;
        self.manual_override = Some(manual);
        match manual {
            ManualOverride::Online => {
                self.state.last_online_time = Some(now);
                self.set_online(true);
            }
            ManualOverride::Offline => self.set_online(false),
        }
        info!(override_state = ?manual, "manual connectivity override");
        self.recompute(scoring);
    }

    /// UI request to show or dismiss the full-screen modal. Returns
    /// `true` if visibility changed.
    pub(crate) fn apply_modal_request(&mut self, show: bool) -> bool {
        let before = self.visibility;
        self.modal_dismissed = !show;
        self.visibility =
            Visibility::derive(self.is_offline(), self.quality.level, self.modal_dismissed);
        before != self.visibility
    }

    /// Online/offline transition. Going offline re-arms the modal even if
    /// the user dismissed it during an earlier outage.
    fn set_online(&mut self, online: bool) {
        if self.state.is_online == online {
            return;
        }
        self.state.is_online = online;
        if online {
            info!("connection restored");
        } else {
            self.modal_dismissed = false;
            info!("connection lost");
        }
    }

    /// Re-derive stability, quality and visibility from state + history.
    fn recompute(&mut self, scoring: &ScoringConfig) {
        let previous_level = self.quality.level;

        self.stability = estimate_stability(&self.history, scoring);
        self.state.connection_stability = self.stability.level;
        self.quality = assess(
            QualityInputs::from_state(&self.state, self.stability.score),
            scoring,
        );
        self.visibility =
            Visibility::derive(self.is_offline(), self.quality.level, self.modal_dismissed);

        if self.quality.level != previous_level {
            info!(
                from = %previous_level,
                to = %self.quality.level,
                score = self.quality.score,
                "connection quality changed"
            );
        }
    }
}
