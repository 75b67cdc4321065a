// ── Adaptive probe interval ──
//
// Degrading connections are probed more often, healthy ones less often.
// With `level_confirmation_rounds = 1` the interval follows every level
// change immediately; larger values require that many consecutive rounds
// at the new level first, which stops a connection sitting on a threshold
// from flapping between intervals.

use std::time::Duration;

use crate::config::ScheduleConfig;
use crate::model::QualityLevel;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntervalScheduler {
    config: ScheduleConfig,
    active: QualityLevel,
    pending: Option<(QualityLevel, u32)>,
}

impl IntervalScheduler {
    pub fn new(config: ScheduleConfig) -> Self {
        Self {
            config,
            active: QualityLevel::Excellent,
            pending: None,
        }
    }

    /// Feed the level produced by the latest probe round.
    /// Returns `true` if the active level changed.
    pub fn observe(&mut self, level: QualityLevel) -> bool {
        if level == self.active {
            self.pending = None;
            return false;
        }

        let count = match self.pending {
            Some((pending, n)) if pending == level => n + 1,
            _ => 1,
        };

        if count >= self.config.level_confirmation_rounds.max(1) {
            self.active = level;
            self.pending = None;
            true
        } else {
            self.pending = Some((level, count));
            false
        }
    }

    /// Level the interval is currently based on.
    pub fn active_level(&self) -> QualityLevel {
        self.active
    }

    pub fn next_interval(&self) -> Duration {
        self.config.interval_for(self.active)
    }

    /// Retry delay after a round in which no endpoint answered.
    pub fn outage_interval(&self) -> Duration {
        self.config.interval_for(QualityLevel::Poor)
    }
}

impl Default for IntervalScheduler {
    fn default() -> Self {
        Self::new(ScheduleConfig::default())
    }
}
