//! Canonical export record.

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{ClinicalFlags, OutcomeScore, PatientRecord, RecoveryPeriod};
use crate::reference::HIGH_RISK_SCORE;
use crate::scoring::PainAssessment;

/// Column names, in the order every serialization uses.
pub const EXPORT_FIELDS: [&str; 10] = [
    "timestamp",
    "patientId",
    "name",
    "age",
    "opDate",
    "period",
    "caprini",
    "risk_group",
    "fjs",
    "pain",
];

/// Risk grouping written to the spreadsheet.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ExportRiskGroup {
    #[serde(rename = "History High")]
    HistoryHigh,
    #[serde(rename = "Score High")]
    ScoreHigh,
    #[serde(rename = "Low")]
    Low,
}

impl ExportRiskGroup {
    pub fn from_assessment(flags: &ClinicalFlags, risk_score: u32) -> Self {
        if flags.has_cardiovascular_history {
            ExportRiskGroup::HistoryHigh
        } else if risk_score >= HIGH_RISK_SCORE {
            ExportRiskGroup::ScoreHigh
        } else {
            ExportRiskGroup::Low
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ExportRiskGroup::HistoryHigh => "History High",
            ExportRiskGroup::ScoreHigh => "Score High",
            ExportRiskGroup::Low => "Low",
        }
    }
}

impl fmt::Display for ExportRiskGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Immutable snapshot of one assessment, ready for any sink.
///
/// Field declaration order is the serialization order; keep it in step with
/// [`EXPORT_FIELDS`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExportRecord {
    /// Export timestamp (RFC 3339, UTC, milliseconds)
    pub timestamp: String,
    #[serde(rename = "patientId")]
    pub patient_id: String,
    pub name: String,
    pub age: u32,
    /// Procedure date (ISO 8601)
    #[serde(rename = "opDate")]
    pub op_date: String,
    /// Recovery period label, empty when no questionnaire period was chosen
    pub period: String,
    #[serde(rename = "caprini")]
    pub risk_score: u32,
    pub risk_group: ExportRiskGroup,
    #[serde(rename = "fjs")]
    pub outcome_score: OutcomeScore,
    pub pain: Option<PainAssessment>,
}

impl ExportRecord {
    /// `(column, value)` pairs in export order, values as they appear in
    /// delimited text.
    pub fn fields(&self) -> [(&'static str, String); 10] {
        [
            (EXPORT_FIELDS[0], self.timestamp.clone()),
            (EXPORT_FIELDS[1], self.patient_id.clone()),
            (EXPORT_FIELDS[2], self.name.clone()),
            (EXPORT_FIELDS[3], self.age.to_string()),
            (EXPORT_FIELDS[4], self.op_date.clone()),
            (EXPORT_FIELDS[5], self.period.clone()),
            (EXPORT_FIELDS[6], self.risk_score.to_string()),
            (EXPORT_FIELDS[7], self.risk_group.label().to_string()),
            (EXPORT_FIELDS[8], self.outcome_score.to_string()),
            (
                EXPORT_FIELDS[9],
                self.pain.map(|p| p.score().to_string()).unwrap_or_default(),
            ),
        ]
    }

    /// Values only, in export order.
    pub fn values(&self) -> Vec<String> {
        self.fields().into_iter().map(|(_, value)| value).collect()
    }
}

/// Assemble an export record. Pure: the timestamp is supplied by the caller.
pub fn build_export_record(
    patient: &PatientRecord,
    clinical: &ClinicalFlags,
    risk_score: u32,
    outcome_score: OutcomeScore,
    pain: Option<PainAssessment>,
    period: Option<RecoveryPeriod>,
    exported_at: DateTime<Utc>,
) -> ExportRecord {
    ExportRecord {
        timestamp: exported_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        patient_id: patient.id.clone(),
        name: patient.name.clone(),
        age: patient.age,
        op_date: patient.procedure_date.format("%Y-%m-%d").to_string(),
        period: period.map(|p| p.label().to_string()).unwrap_or_default(),
        risk_score,
        risk_group: ExportRiskGroup::from_assessment(clinical, risk_score),
        outcome_score,
        pain,
    }
}
