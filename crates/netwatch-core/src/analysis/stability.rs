// ── Stability estimation ──
//
// How erratic recent samples have been, independent of their absolute
// values. Population variance over a short window of latency and
// bandwidth, penalized with tunable weights.

use crate::config::ScoringConfig;
use crate::model::{QualityLevel, StabilityScore};
use crate::store::MetricsHistory;

/// Samples considered per series.
pub const STABILITY_WINDOW: usize = 10;

/// Below this many samples the estimate is optimistic (100).
pub const MIN_STABILITY_SAMPLES: usize = 3;

/// Estimate stability from the most recent history window.
///
/// `score = max(0, 100 - (latency_var * w_l + bandwidth_var * w_b))`
pub fn estimate(history: &MetricsHistory, scoring: &ScoringConfig) -> StabilityScore {
    let latency: Vec<f64> = history.recent_latency(STABILITY_WINDOW).collect();
    let bandwidth: Vec<f64> = history.recent_bandwidth(STABILITY_WINDOW).collect();

    if latency.len() < MIN_STABILITY_SAMPLES {
        return StabilityScore::default();
    }

    let penalty = population_variance(&latency) * scoring.latency_variance_weight
        + population_variance(&bandwidth) * scoring.bandwidth_variance_weight;
    let score = (100.0 - penalty).clamp(0.0, 100.0);

    StabilityScore {
        score,
        level: QualityLevel::from_score(score),
    }
}

#[allow(clippy::cast_precision_loss, clippy::as_conversions)]
fn population_variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn history(samples: &[(f64, f64)]) -> MetricsHistory {
        let mut h = MetricsHistory::new();
        for &(lat, bw) in samples {
            h.push(lat, bw, 0.0, Utc::now());
        }
        h
    }

    #[test]
    fn insufficient_samples_are_optimistic() {
        let cfg = ScoringConfig::default();
        for n in 0..MIN_STABILITY_SAMPLES {
            let wild: Vec<(f64, f64)> = (0..n)
                .map(|i| if i % 2 == 0 { (5.0, 0.1) } else { (900.0, 50.0) })
                .collect();
            let s = estimate(&history(&wild), &cfg);
            assert_eq!(s.score, 100.0, "{n} samples");
            assert_eq!(s.level, QualityLevel::Excellent);
        }
    }

    #[test]
    fn constant_samples_are_perfectly_stable() {
        let s = estimate(&history(&[(40.0, 8.0); 6]), &ScoringConfig::default());
        assert_eq!(s.score, 100.0);
    }

    #[test]
    fn variance_penalty_matches_formula() {
        // latency 10, 11, 12 and bandwidth 4, 5, 6 both have variance 2/3
        let s = estimate(
            &history(&[(10.0, 4.0), (11.0, 5.0), (12.0, 6.0)]),
            &ScoringConfig::default(),
        );
        let expected = 100.0 - ((2.0 / 3.0) * 2.0 + (2.0 / 3.0) * 0.1);
        assert!((s.score - expected).abs() < 1e-9);
        assert_eq!(s.level, QualityLevel::Excellent);
    }

    #[test]
    fn erratic_latency_scores_zero() {
        let s = estimate(
            &history(&[(20.0, 5.0), (400.0, 5.0), (15.0, 5.0), (600.0, 5.0)]),
            &ScoringConfig::default(),
        );
        assert_eq!(s.score, 0.0);
        assert_eq!(s.level, QualityLevel::Unstable);
    }

    #[test]
    fn only_the_recent_window_counts() {
        let mut samples = vec![(10.0, 1.0), (900.0, 80.0), (10.0, 1.0), (900.0, 80.0)];
        samples.extend([(50.0, 10.0); STABILITY_WINDOW]);
        let s = estimate(&history(&samples), &ScoringConfig::default());
        assert_eq!(s.score, 100.0);
    }

    #[test]
    fn variance_of_known_series() {
        assert_eq!(population_variance(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]), 4.0);
        assert_eq!(population_variance(&[]), 0.0);
    }
}
