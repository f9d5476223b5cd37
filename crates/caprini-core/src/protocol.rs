//! Prophylaxis protocol decision table.
//!
//! Rules are evaluated top to bottom and the first match wins:
//!
//! ```text
//! 1. CV history + antiplatelet      → SwitchingStrategy
//! 2. CV history, no antiplatelet    → HighRiskHistory
//! 3. no CV history, score ≥ 10      → HighRiskScore
//! 4. otherwise                      → StandardProtocol
//! ```
//!
//! Rule 3 deliberately ignores `is_arthroplasty`; only the dashboard group
//! label is gated on the procedure.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::ClinicalFlags;
use crate::reference::HIGH_RISK_SCORE;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProtocolCategory {
    SwitchingStrategy,
    HighRiskHistory,
    HighRiskScore,
    StandardProtocol,
}

/// Alert severity the presentation layer uses to style a recommendation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Warning,
    Danger,
    Success,
}

impl ProtocolCategory {
    pub fn title(self) -> &'static str {
        match self {
            ProtocolCategory::SwitchingStrategy => "Special: Switching Strategy",
            ProtocolCategory::HighRiskHistory => "High Risk (History)",
            ProtocolCategory::HighRiskScore => "High Risk (Score ≥ 10)",
            ProtocolCategory::StandardProtocol => "Standard Protocol (Low Risk)",
        }
    }

    pub fn summary(self) -> &'static str {
        match self {
            ProtocolCategory::SwitchingStrategy => {
                "Cardiovascular/cerebrovascular history with current antiplatelet use"
            }
            ProtocolCategory::HighRiskHistory => "High risk due to cardiovascular/cerebrovascular history",
            ProtocolCategory::HighRiskScore => "High risk by Caprini score",
            ProtocolCategory::StandardProtocol => "Standard risk",
        }
    }

    pub fn guidance(self) -> &'static [&'static str] {
        match self {
            ProtocolCategory::SwitchingStrategy => &[
                "Before surgery: stop antiplatelet (aspirin) 5-7 days prior",
                "After surgery: DOAC monotherapy + IPC",
            ],
            ProtocolCategory::HighRiskHistory => &["Recommended: DOAC monotherapy + IPC + early ambulation"],
            ProtocolCategory::HighRiskScore => &["Recommended: LMWH or DOAC + IPC"],
            ProtocolCategory::StandardProtocol => &["Recommended: aspirin + IPC + early ambulation"],
        }
    }

    pub fn severity(self) -> Severity {
        match self {
            ProtocolCategory::SwitchingStrategy => Severity::Warning,
            ProtocolCategory::HighRiskHistory | ProtocolCategory::HighRiskScore => Severity::Danger,
            ProtocolCategory::StandardProtocol => Severity::Success,
        }
    }
}

impl fmt::Display for ProtocolCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// A recommendation with the text shown alongside it.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct ProtocolRecommendation {
    pub category: ProtocolCategory,
    pub title: &'static str,
    pub summary: &'static str,
    pub guidance: &'static [&'static str],
    pub severity: Severity,
}

impl From<ProtocolCategory> for ProtocolRecommendation {
    fn from(category: ProtocolCategory) -> Self {
        Self {
            category,
            title: category.title(),
            summary: category.summary(),
            guidance: category.guidance(),
            severity: category.severity(),
        }
    }
}

/// Apply the decision table.
pub fn classify_protocol(flags: &ClinicalFlags, risk_score: u32) -> ProtocolRecommendation {
    let category = if flags.effective_antiplatelet() {
        ProtocolCategory::SwitchingStrategy
    } else if flags.has_cardiovascular_history {
        ProtocolCategory::HighRiskHistory
    } else if risk_score >= HIGH_RISK_SCORE {
        ProtocolCategory::HighRiskScore
    } else {
        ProtocolCategory::StandardProtocol
    };
    category.into()
}
