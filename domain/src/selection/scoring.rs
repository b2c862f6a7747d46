//! Performance scoring of model candidates
//!
//! ```text
//! score = 0.4 * success_rate
//!       + 0.3 * avg_confidence
//!       + 0.2 * (1 - correction_rate)
//!       + 0.1 * performance_factor
//!
//! performance_factor = 1 - (0.6 * normalized_cost + 0.4 * normalized_latency)
//! ```
//!
//! Cost and latency are normalized linearly against fixed ceilings and
//! clamped to [0, 1]. Windows backed by more than [`BOOST_MIN_RUNS`] runs get
//! a [`RUN_COUNT_BOOST`] multiplier. The final score is clamped to [0, 1].

use crate::model::PerformanceWindow;

pub const SUCCESS_WEIGHT: f64 = 0.4;
pub const CONFIDENCE_WEIGHT: f64 = 0.3;
pub const CORRECTION_WEIGHT: f64 = 0.2;
pub const PERFORMANCE_WEIGHT: f64 = 0.1;

pub const COST_SHARE: f64 = 0.6;
pub const LATENCY_SHARE: f64 = 0.4;

/// Cost per run treated as "maximally expensive"
pub const COST_CEILING: f64 = 0.10;
/// Time-to-fix treated as "maximally slow"
pub const LATENCY_CEILING_MS: f64 = 60_000.0;

/// Runs above this count earn the boost
pub const BOOST_MIN_RUNS: u64 = 10;
pub const RUN_COUNT_BOOST: f64 = 1.1;

/// Score of a candidate without any history
pub const NEUTRAL_SCORE: f64 = 0.6;
/// Confidence of a sole stable candidate (ranking skipped)
pub const SINGLE_CANDIDATE_CONFIDENCE: f64 = 0.8;
/// Confidence of a fallback pick
pub const FALLBACK_CONFIDENCE: f64 = 0.5;
/// Winning stable scores above this are reported as performance based
pub const PERFORMANCE_BASED_THRESHOLD: f64 = 0.8;

fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 1.0)
}

/// Linear normalization of `value` against `ceiling`, clamped to [0, 1]
pub fn normalize(value: f64, ceiling: f64) -> f64 {
    if ceiling <= 0.0 {
        return 0.0;
    }
    clamp_unit(value / ceiling)
}

/// Cost/latency factor in [0, 1], higher is better
pub fn performance_factor(window: &PerformanceWindow) -> f64 {
    let cost = normalize(window.cost_per_run, COST_CEILING);
    let latency = normalize(window.mean_time_to_fix_ms, LATENCY_CEILING_MS);
    clamp_unit(1.0 - (COST_SHARE * cost + LATENCY_SHARE * latency))
}

/// Score of a candidate given its latest window, or the neutral score
pub fn performance_score(window: Option<&PerformanceWindow>) -> f64 {
    let Some(window) = window else {
        return NEUTRAL_SCORE;
    };

    let mut score = SUCCESS_WEIGHT * window.success_rate
        + CONFIDENCE_WEIGHT * window.avg_confidence
        + CORRECTION_WEIGHT * (1.0 - window.correction_rate)
        + PERFORMANCE_WEIGHT * performance_factor(window);

    if window.total_runs > BOOST_MIN_RUNS {
        score *= RUN_COUNT_BOOST;
    }

    clamp_unit(score)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_missing_window_is_neutral() {
        assert_eq!(performance_score(None), NEUTRAL_SCORE);
    }

    #[test]
    fn test_perfect_free_instant_model() {
        let window = PerformanceWindow::new(1.0, 1.0, 0.0);
        assert!(approx(performance_score(Some(&window)), 1.0));
    }

    #[test]
    fn test_weighted_sum() {
        // 0.4*0.5 + 0.3*0.5 + 0.2*0.5 + 0.1*(1 - (0.6*0.5 + 0.4*0.5)) = 0.5
        let window = PerformanceWindow::new(0.5, 0.5, 0.5)
            .with_cost(0.05)
            .with_time_to_fix_ms(30_000.0);
        assert!(approx(performance_score(Some(&window)), 0.5));
    }

    #[test]
    fn test_run_count_boost() {
        let base = PerformanceWindow::new(0.5, 0.5, 0.5)
            .with_cost(0.05)
            .with_time_to_fix_ms(30_000.0);
        let ten = base.clone().with_total_runs(10);
        let eleven = base.with_total_runs(11);

        assert!(approx(performance_score(Some(&ten)), 0.5));
        assert!(approx(performance_score(Some(&eleven)), 0.55));
    }

    #[test]
    fn test_boost_is_clamped() {
        let window = PerformanceWindow::new(1.0, 1.0, 0.0).with_total_runs(1_000);
        assert_eq!(performance_score(Some(&window)), 1.0);
    }

    #[test]
    fn test_cost_and_latency_saturate() {
        let window = PerformanceWindow::new(0.0, 0.0, 1.0)
            .with_cost(5.0)
            .with_time_to_fix_ms(10_000_000.0);
        assert_eq!(performance_factor(&window), 0.0);
        assert_eq!(performance_score(Some(&window)), 0.0);
    }

    #[test]
    fn test_score_bounds_over_grid() {
        let steps = [0.0, 0.25, 0.5, 0.75, 1.0];
        for &success in &steps {
            for &confidence in &steps {
                for &correction in &steps {
                    for &(cost, latency, runs) in
                        &[(0.0, 0.0, 0), (0.2, 90_000.0, 50), (0.01, 500.0, 11)]
                    {
                        let window = PerformanceWindow::new(success, confidence, correction)
                            .with_cost(cost)
                            .with_time_to_fix_ms(latency)
                            .with_total_runs(runs);
                        let score = performance_score(Some(&window));
                        assert!((0.0..=1.0).contains(&score), "score {score} out of bounds");
                    }
                }
            }
        }
    }
}
