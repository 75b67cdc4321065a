// ── Quality scoring ──
//
// Pure function of the current measurements and the stability score.
// Latency carries the largest weight: interactive features suffer from
// slow round trips long before they suffer from low throughput.

use crate::config::ScoringConfig;
use crate::model::{ConnectionQuality, NetworkState, QualityFactors, QualityLevel, Recommendation};

pub const SPEED_WEIGHT: f64 = 0.3;
pub const LATENCY_WEIGHT: f64 = 0.4;
pub const PACKET_LOSS_WEIGHT: f64 = 0.2;
pub const STABILITY_WEIGHT: f64 = 0.1;

/// Factor scores below these trigger their recommendation.
const SPEED_ADVICE_BELOW: f64 = 50.0;
const LATENCY_ADVICE_BELOW: f64 = 60.0;
const PACKET_LOSS_ADVICE_BELOW: f64 = 70.0;

/// Raw measurements the scorer consumes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QualityInputs {
    /// Mbps.
    pub downlink: f64,
    /// ms.
    pub latency: f64,
    /// Percent.
    pub packet_loss: f64,
    /// 0–100.
    pub stability: f64,
}

impl QualityInputs {
    pub fn from_state(state: &NetworkState, stability: f64) -> Self {
        Self {
            downlink: state.downlink,
            latency: state.latency,
            packet_loss: state.packet_loss,
            stability,
        }
    }
}

/// Score a connection and attach recommendations.
pub fn assess(inputs: QualityInputs, scoring: &ScoringConfig) -> ConnectionQuality {
    let factors = QualityFactors {
        speed: clamp_score(inputs.downlink / scoring.excellent_downlink_mbps * 100.0),
        latency: clamp_score(100.0 - inputs.latency / scoring.poor_latency_ms * 100.0),
        packet_loss: clamp_score(100.0 - inputs.packet_loss / scoring.poor_packet_loss_pct * 100.0),
        stability: clamp_score(inputs.stability),
    };

    let score = round_score(
        factors.speed * SPEED_WEIGHT
            + factors.latency * LATENCY_WEIGHT
            + factors.packet_loss * PACKET_LOSS_WEIGHT
            + factors.stability * STABILITY_WEIGHT,
    );
    let level = QualityLevel::from_score(f64::from(score));

    let mut recommendations = Vec::new();
    if factors.speed < SPEED_ADVICE_BELOW {
        recommendations.push(Recommendation::SwitchNetwork);
    }
    if factors.latency < LATENCY_ADVICE_BELOW {
        recommendations.push(Recommendation::AvoidHeavyTransfers);
    }
    if factors.packet_loss < PACKET_LOSS_ADVICE_BELOW {
        recommendations.push(Recommendation::RestartRouter);
    }
    if level.is_degraded() {
        recommendations.push(Recommendation::RealtimeDegraded);
    }

    ConnectionQuality {
        score,
        level,
        recommendations,
        factors,
    }
}

/// Clamp to 0–100; non-finite measurements score as worst.
fn clamp_score(v: f64) -> f64 {
    if v.is_finite() { v.clamp(0.0, 100.0) } else { 0.0 }
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::as_conversions
)]
fn round_score(v: f64) -> u8 {
    clamp_score(v).round() as u8
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const PERFECT: QualityInputs = QualityInputs {
        downlink: 50.0,
        latency: 0.0,
        packet_loss: 0.0,
        stability: 100.0,
    };

    fn score(inputs: QualityInputs) -> ConnectionQuality {
        assess(inputs, &ScoringConfig::default())
    }

    #[test]
    fn perfect_connection_is_excellent_without_advice() {
        let q = score(PERFECT);
        assert_eq!(q.score, 100);
        assert_eq!(q.level, QualityLevel::Excellent);
        assert!(q.recommendations.is_empty());
    }

    #[test]
    fn weights_sum_to_one() {
        let sum = SPEED_WEIGHT + LATENCY_WEIGHT + PACKET_LOSS_WEIGHT + STABILITY_WEIGHT;
        assert!((sum - 1.0).abs() < 1e-12);
    }

    #[test]
    fn weighted_formula() {
        // speed 50, latency 80, loss 60, stability 100
        let q = score(QualityInputs {
            downlink: 5.0,
            latency: 100.0,
            packet_loss: 2.0,
            stability: 100.0,
        });
        // 15 + 32 + 12 + 10
        assert_eq!(q.score, 69);
        assert_eq!(q.level, QualityLevel::Fair);
        assert_eq!(q.recommendations, vec![Recommendation::RestartRouter]);
    }

    #[test]
    fn badly_degraded_link_is_unstable_with_all_advice() {
        let q = score(QualityInputs {
            downlink: 0.3,
            latency: 600.0,
            packet_loss: 20.0,
            stability: 100.0,
        });
        assert!(q.level.is_degraded());
        assert_eq!(
            q.recommendations,
            vec![
                Recommendation::SwitchNetwork,
                Recommendation::AvoidHeavyTransfers,
                Recommendation::RestartRouter,
                Recommendation::RealtimeDegraded,
            ]
        );
    }

    #[test]
    fn scores_stay_in_range_for_extreme_inputs() {
        for inputs in [
            QualityInputs { downlink: 1e9, latency: -5.0, packet_loss: -1.0, stability: 500.0 },
            QualityInputs { downlink: -1.0, latency: 1e9, packet_loss: 1e9, stability: -50.0 },
            QualityInputs { downlink: f64::NAN, latency: f64::INFINITY, packet_loss: 0.0, stability: 0.0 },
        ] {
            let q = score(inputs);
            assert!(q.score <= 100);
            for f in [q.factors.speed, q.factors.latency, q.factors.packet_loss, q.factors.stability] {
                assert!((0.0..=100.0).contains(&f));
            }
        }
    }

    #[test]
    fn level_is_monotonic_as_each_input_worsens() {
        let steps = 40;
        for which in 0..4 {
            let mut previous = score(PERFECT);
            for i in 1..=steps {
                let t = f64::from(i);
                let mut inputs = PERFECT;
                match which {
                    0 => inputs.downlink = 50.0 - t * 1.25,
                    1 => inputs.latency = t * 20.0,
                    2 => inputs.packet_loss = t * 0.25,
                    _ => inputs.stability = 100.0 - t * 2.5,
                }
                let current = score(inputs);
                assert!(current.score <= previous.score, "factor {which} step {i}");
                assert!(current.level <= previous.level, "factor {which} step {i}");
                previous = current;
            }
        }
    }

    #[test]
    fn assessment_is_deterministic() {
        let inputs = QualityInputs {
            downlink: 3.3,
            latency: 210.0,
            packet_loss: 1.5,
            stability: 72.0,
        };
        assert_eq!(score(inputs), score(inputs));
    }
}
