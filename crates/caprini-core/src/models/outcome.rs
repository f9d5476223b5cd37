//! Joint-awareness questionnaire and recovery-period models.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::scoring::{ScoringError, ScoringResult};

/// Number of questionnaire items.
pub const QUESTION_COUNT: usize = 12;

/// Highest answer on the 0-4 frequency scale.
pub const MAX_ANSWER: u8 = 4;

/// Answers to the 12-item questionnaire; `None` marks an unanswered item.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(try_from = "Vec<Option<u8>>", into = "Vec<Option<u8>>")]
pub struct OutcomeAnswers {
    answers: [Option<u8>; QUESTION_COUNT],
}

impl OutcomeAnswers {
    /// An empty questionnaire.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a full answer sheet; every answered value must be 0-4.
    pub fn from_values(values: &[Option<u8>]) -> ScoringResult<Self> {
        if values.len() != QUESTION_COUNT {
            return Err(ScoringError::InvalidInput(format!(
                "questionnaire has {} items, got {} answers",
                QUESTION_COUNT,
                values.len()
            )));
        }
        let mut sheet = Self::new();
        for (index, value) in values.iter().enumerate() {
            if let Some(value) = value {
                sheet.set(index, *value)?;
            }
        }
        Ok(sheet)
    }

    /// All twelve items answered with the same value (mostly for tests/demos).
    pub fn uniform(value: u8) -> ScoringResult<Self> {
        Self::from_values(&[Some(value); QUESTION_COUNT])
    }

    /// Record an answer for item `index` (0-based).
    pub fn set(&mut self, index: usize, value: u8) -> ScoringResult<()> {
        if index >= QUESTION_COUNT {
            return Err(ScoringError::InvalidInput(format!(
                "question index {} out of range",
                index
            )));
        }
        if value > MAX_ANSWER {
            return Err(ScoringError::InvalidInput(format!(
                "answer {} for question {} outside 0-{}",
                value,
                index + 1,
                MAX_ANSWER
            )));
        }
        self.answers[index] = Some(value);
        Ok(())
    }

    pub fn clear(&mut self, index: usize) {
        if let Some(slot) = self.answers.get_mut(index) {
            *slot = None;
        }
    }

    pub fn get(&self, index: usize) -> Option<u8> {
        self.answers.get(index).copied().flatten()
    }

    pub fn answered_count(&self) -> usize {
        self.answers.iter().filter(|a| a.is_some()).count()
    }

    pub fn is_complete(&self) -> bool {
        self.answered_count() == QUESTION_COUNT
    }

    /// Sum of answers, only when every item is answered.
    pub fn complete_sum(&self) -> Option<u32> {
        self.answers
            .iter()
            .try_fold(0u32, |acc, a| a.map(|v| acc + u32::from(v)))
    }
}

impl TryFrom<Vec<Option<u8>>> for OutcomeAnswers {
    type Error = ScoringError;

    fn try_from(values: Vec<Option<u8>>) -> Result<Self, Self::Error> {
        Self::from_values(&values)
    }
}

impl From<OutcomeAnswers> for Vec<Option<u8>> {
    fn from(sheet: OutcomeAnswers) -> Self {
        sheet.answers.to_vec()
    }
}

/// Literal used wherever an unanswered questionnaire is serialized.
pub const INCOMPLETE_MARKER: &str = "Incomplete";

/// Outcome score on the inverted 0-100 scale, or the explicit incomplete state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(into = "OutcomeScoreRepr", try_from = "OutcomeScoreRepr")]
pub enum OutcomeScore {
    Complete(f64),
    Incomplete,
}

impl OutcomeScore {
    pub fn value(&self) -> Option<f64> {
        match self {
            OutcomeScore::Complete(v) => Some(*v),
            OutcomeScore::Incomplete => None,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, OutcomeScore::Complete(_))
    }
}

impl fmt::Display for OutcomeScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutcomeScore::Complete(v) => write!(f, "{:.1}", v),
            OutcomeScore::Incomplete => f.write_str(INCOMPLETE_MARKER),
        }
    }
}

/// Wire form: a number, or the `"Incomplete"` string.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum OutcomeScoreRepr {
    Score(f64),
    Marker(String),
}

impl From<OutcomeScore> for OutcomeScoreRepr {
    fn from(score: OutcomeScore) -> Self {
        match score {
            OutcomeScore::Complete(v) => OutcomeScoreRepr::Score(v),
            OutcomeScore::Incomplete => OutcomeScoreRepr::Marker(INCOMPLETE_MARKER.to_string()),
        }
    }
}

impl TryFrom<OutcomeScoreRepr> for OutcomeScore {
    type Error = String;

    fn try_from(repr: OutcomeScoreRepr) -> Result<Self, Self::Error> {
        match repr {
            OutcomeScoreRepr::Score(v) => Ok(OutcomeScore::Complete(v)),
            OutcomeScoreRepr::Marker(m) if m == INCOMPLETE_MARKER => Ok(OutcomeScore::Incomplete),
            OutcomeScoreRepr::Marker(m) => Err(format!("unexpected outcome marker: {}", m)),
        }
    }
}

/// Follow-up time point the questionnaire was taken at.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RecoveryPeriod {
    Preoperative,
    SixWeeks,
    ThreeMonths,
    SixMonths,
    OneYear,
    TwoYears,
}

impl RecoveryPeriod {
    pub const ALL: [RecoveryPeriod; 6] = [
        RecoveryPeriod::Preoperative,
        RecoveryPeriod::SixWeeks,
        RecoveryPeriod::ThreeMonths,
        RecoveryPeriod::SixMonths,
        RecoveryPeriod::OneYear,
        RecoveryPeriod::TwoYears,
    ];

    /// Stable key, matching the serialized form (`one_year`, ...).
    pub fn key(self) -> &'static str {
        match self {
            RecoveryPeriod::Preoperative => "preoperative",
            RecoveryPeriod::SixWeeks => "six_weeks",
            RecoveryPeriod::ThreeMonths => "three_months",
            RecoveryPeriod::SixMonths => "six_months",
            RecoveryPeriod::OneYear => "one_year",
            RecoveryPeriod::TwoYears => "two_years",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.key() == key)
    }

    /// Short label used in exports.
    pub fn label(self) -> &'static str {
        match self {
            RecoveryPeriod::Preoperative => "Pre-op",
            RecoveryPeriod::SixWeeks => "6 weeks",
            RecoveryPeriod::ThreeMonths => "3 months",
            RecoveryPeriod::SixMonths => "6 months",
            RecoveryPeriod::OneYear => "1 year",
            RecoveryPeriod::TwoYears => "2 years",
        }
    }
}

impl fmt::Display for RecoveryPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Population reference values for one recovery period.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct PeriodBenchmark {
    pub period: RecoveryPeriod,
    /// Population mean outcome score
    pub mean: f64,
    /// Population standard deviation
    pub std_dev: f64,
    pub description: &'static str,
    /// Whether the fixed acceptable-symptom / forgotten-joint thresholds
    /// are clinically meaningful at this time point
    pub thresholds_apply: bool,
}
