//! Derived metrics: BMI, weighted risk score, outcome score, pain band.
//!
//! Every function here is pure. Calling one twice with the same input gives
//! the same output; nothing is cached between calls.

mod bmi;
mod outcome;
mod pain;
mod risk;

pub use bmi::*;
pub use outcome::*;
pub use pain::*;
pub use risk::*;

use thiserror::Error;

/// Scoring errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScoringError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type ScoringResult<T> = Result<T, ScoringError>;

/// Parse a numeric form field, naming the field in the error.
pub fn parse_numeric(field: &str, text: &str) -> ScoringResult<f64> {
    let trimmed = text.trim();
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(ScoringError::InvalidInput(format!(
            "{} is not a number: {:?}",
            field, text
        ))),
    }
}

/// Round to one decimal place, half away from zero.
pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_numeric() {
        assert_eq!(parse_numeric("height", " 165 ").unwrap(), 165.0);
        assert_eq!(parse_numeric("weight", "68.5").unwrap(), 68.5);

        let err = parse_numeric("weight", "sixty").unwrap_err();
        assert!(err.to_string().contains("weight"));
        assert!(parse_numeric("age", "").is_err());
        assert!(parse_numeric("age", "NaN").is_err());
    }

    #[test]
    fn test_round1() {
        assert_eq!(round1(24.977), 25.0);
        assert_eq!(round1(25.26), 25.3);
        assert_eq!(round1(97.916), 97.9);
    }
}
