//! Pain severity banding for the 0-10 numeric rating scale.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{ScoringError, ScoringResult};

/// Highest value on the pain scale.
pub const MAX_PAIN: i32 = 10;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PainBand {
    /// 0-3
    Mild,
    /// 4-6
    Moderate,
    /// 7-10
    Severe,
}

impl PainBand {
    pub fn guidance(self) -> &'static str {
        match self {
            PainBand::Mild => "Continue scheduled oral analgesia and reassess at the next visit.",
            PainBand::Moderate => "Optimise multimodal analgesia and reassess within 24 hours.",
            PainBand::Severe => "Escalate analgesia and notify the responsible surgeon promptly.",
        }
    }
}

impl fmt::Display for PainBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PainBand::Mild => f.write_str("Mild"),
            PainBand::Moderate => f.write_str("Moderate"),
            PainBand::Severe => f.write_str("Severe"),
        }
    }
}

/// A validated pain rating in 0-10.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(try_from = "i32", into = "u8")]
pub struct PainAssessment(u8);

impl PainAssessment {
    pub fn new(score: i32) -> ScoringResult<Self> {
        if (0..=MAX_PAIN).contains(&score) {
            Ok(Self(score as u8))
        } else {
            Err(ScoringError::InvalidInput(format!(
                "pain score {} outside 0-{}",
                score, MAX_PAIN
            )))
        }
    }

    pub fn score(self) -> u8 {
        self.0
    }

    pub fn band(self) -> PainBand {
        match self.0 {
            0..=3 => PainBand::Mild,
            4..=6 => PainBand::Moderate,
            _ => PainBand::Severe,
        }
    }
}

impl TryFrom<i32> for PainAssessment {
    type Error = ScoringError;

    fn try_from(score: i32) -> Result<Self, Self::Error> {
        Self::new(score)
    }
}

impl From<PainAssessment> for u8 {
    fn from(pain: PainAssessment) -> Self {
        pain.0
    }
}

/// Band plus the guidance text shown with it.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct PainClassification {
    pub score: u8,
    pub band: PainBand,
    pub guidance: &'static str,
}

/// Classify a 0-10 pain score; anything outside the scale is `InvalidInput`.
pub fn classify_pain(score: i32) -> ScoringResult<PainClassification> {
    let pain = PainAssessment::new(score)?;
    let band = pain.band();
    Ok(PainClassification {
        score: pain.score(),
        band,
        guidance: band.guidance(),
    })
}
