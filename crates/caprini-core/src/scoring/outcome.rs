//! Joint-awareness outcome score and benchmark comparison.

use serde::Serialize;

use super::round1;
use crate::models::{OutcomeAnswers, OutcomeScore, PeriodBenchmark, RecoveryPeriod, MAX_ANSWER, QUESTION_COUNT};
use crate::reference::{benchmark, ACCEPTABLE_SYMPTOM_STATE, FORGOTTEN_JOINT_THRESHOLD};

/// Highest possible raw sum (12 items x 4).
const MAX_RAW_SUM: f64 = (QUESTION_COUNT as u32 * MAX_ANSWER as u32) as f64;

/// `100 - sum / 48 * 100`, rounded to one decimal, or `Incomplete` unless
/// all twelve items are answered.
pub fn compute_outcome_score(answers: &OutcomeAnswers) -> OutcomeScore {
    match answers.complete_sum() {
        Some(sum) => OutcomeScore::Complete(round1(100.0 - f64::from(sum) / MAX_RAW_SUM * 100.0)),
        None => OutcomeScore::Incomplete,
    }
}

/// Where a score sits relative to its recovery-period population.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct BenchmarkComparison {
    pub benchmark: PeriodBenchmark,
    pub score: f64,
    /// Standard deviations from the population mean, one decimal
    pub z_score: f64,
    /// `None` when the fixed thresholds do not apply to this period
    pub acceptable_symptom_state: Option<bool>,
    pub forgotten_joint: Option<bool>,
}

/// Compare a complete score with the benchmark for `period`.
///
/// Returns `None` for an incomplete questionnaire.
pub fn compare_to_benchmark(score: OutcomeScore, period: RecoveryPeriod) -> Option<BenchmarkComparison> {
    let score = score.value()?;
    let benchmark = benchmark(period);
    let z_score = if benchmark.std_dev > 0.0 {
        round1((score - benchmark.mean) / benchmark.std_dev)
    } else {
        0.0
    };
    let (acceptable_symptom_state, forgotten_joint) = if benchmark.thresholds_apply {
        (
            Some(score >= ACCEPTABLE_SYMPTOM_STATE),
            Some(score >= FORGOTTEN_JOINT_THRESHOLD),
        )
    } else {
        (None, None)
    };
    Some(BenchmarkComparison {
        benchmark,
        score,
        z_score,
        acceptable_symptom_state,
        forgotten_joint,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_extremes() {
        assert_eq!(
            compute_outcome_score(&OutcomeAnswers::uniform(0).unwrap()),
            OutcomeScore::Complete(100.0)
        );
        assert_eq!(
            compute_outcome_score(&OutcomeAnswers::uniform(4).unwrap()),
            OutcomeScore::Complete(0.0)
        );
        assert_eq!(
            compute_outcome_score(&OutcomeAnswers::uniform(2).unwrap()),
            OutcomeScore::Complete(50.0)
        );
    }

    #[test]
    fn test_outcome_rounding() {
        let mut values = [Some(0u8); QUESTION_COUNT];
        values[0] = Some(1);
        let sheet = OutcomeAnswers::from_values(&values).unwrap();
        // 100 - 1/48*100 = 97.916..
        assert_eq!(compute_outcome_score(&sheet), OutcomeScore::Complete(97.9));
    }

    #[test]
    fn test_eleven_answers_incomplete() {
        let mut sheet = OutcomeAnswers::new();
        for i in 0..11 {
            sheet.set(i, 0).unwrap();
        }
        assert_eq!(compute_outcome_score(&sheet), OutcomeScore::Incomplete);
    }

    #[test]
    fn test_benchmark_thresholds_only_when_applicable() {
        let early = compare_to_benchmark(OutcomeScore::Complete(90.0), RecoveryPeriod::ThreeMonths).unwrap();
        assert_eq!(early.acceptable_symptom_state, None);
        assert_eq!(early.forgotten_joint, None);
        assert_eq!(early.z_score, 2.1);

        let late = compare_to_benchmark(OutcomeScore::Complete(50.0), RecoveryPeriod::OneYear).unwrap();
        assert_eq!(late.acceptable_symptom_state, Some(true));
        assert_eq!(late.forgotten_joint, Some(false));
    }

    #[test]
    fn test_benchmark_incomplete() {
        assert!(compare_to_benchmark(OutcomeScore::Incomplete, RecoveryPeriod::OneYear).is_none());
    }
}
