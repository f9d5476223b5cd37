//! One-shot recomputation of everything derived from a form snapshot.
//!
//! The presentation layer calls [`assess`] on every input change. Risk
//! scoring always runs; the outcome questionnaire and the pain rating are
//! independent optional parts and are skipped when absent.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::export::{build_export_record, ExportRecord};
use crate::models::{
    ClinicalFlags, OutcomeAnswers, OutcomeScore, PatientRecord, RecoveryPeriod, RiskFactorCatalog,
    RiskFactorSelections,
};
use crate::protocol::{classify_protocol, ProtocolRecommendation};
use crate::scoring::{
    classify_pain, compare_to_benchmark, compute_bmi, compute_outcome_score, risk_breakdown,
    risk_group_label, BenchmarkComparison, PainAssessment, PainClassification, RiskBreakdown,
    RiskGroupLabel, ScoringResult,
};

/// Everything the operator has entered so far.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssessmentInput {
    pub patient: PatientRecord,
    #[serde(default)]
    pub clinical: ClinicalFlags,
    #[serde(default)]
    pub selections: RiskFactorSelections,
    /// Questionnaire answers, when the outcome module is in use
    #[serde(default)]
    pub answers: Option<OutcomeAnswers>,
    #[serde(default)]
    pub period: Option<RecoveryPeriod>,
    /// Raw 0-10 pain rating, validated by [`assess`]
    #[serde(default)]
    pub pain: Option<i32>,
}

impl AssessmentInput {
    pub fn new(patient: PatientRecord) -> Self {
        Self {
            patient,
            clinical: ClinicalFlags::default(),
            selections: RiskFactorSelections::new(),
            answers: None,
            period: None,
            pain: None,
        }
    }
}

/// Derived results for one input snapshot.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Assessment {
    pub bmi: f64,
    pub breakdown: RiskBreakdown,
    pub risk_score: u32,
    pub risk_group: RiskGroupLabel,
    pub protocol: ProtocolRecommendation,
    /// `None` when the outcome module is not in use
    pub outcome: Option<OutcomeScore>,
    pub benchmark: Option<BenchmarkComparison>,
    pub pain: Option<PainClassification>,
}

/// Recompute every derived value. Fails only on an out-of-range pain score.
pub fn assess(input: &AssessmentInput, catalog: &RiskFactorCatalog) -> ScoringResult<Assessment> {
    let pain = input.pain.map(classify_pain).transpose()?;

    let bmi = compute_bmi(input.patient.height_cm, input.patient.weight_kg);
    let breakdown = risk_breakdown(
        input.patient.age,
        bmi,
        &input.clinical,
        &input.selections,
        catalog,
    );
    let risk_score = breakdown.total();

    let outcome = input.answers.as_ref().map(compute_outcome_score);
    let benchmark = match (outcome, input.period) {
        (Some(score), Some(period)) => compare_to_benchmark(score, period),
        _ => None,
    };

    Ok(Assessment {
        bmi,
        risk_group: risk_group_label(&input.clinical, risk_score),
        protocol: classify_protocol(&input.clinical, risk_score),
        breakdown,
        risk_score,
        outcome,
        benchmark,
        pain,
    })
}

impl Assessment {
    /// Snapshot this assessment for export.
    ///
    /// An unused questionnaire exports as `Incomplete`, same as a partial one.
    pub fn export_record(&self, input: &AssessmentInput, exported_at: DateTime<Utc>) -> ScoringResult<ExportRecord> {
        let pain = input.pain.map(PainAssessment::new).transpose()?;
        Ok(build_export_record(
            &input.patient,
            &input.clinical,
            self.risk_score,
            self.outcome.unwrap_or(OutcomeScore::Incomplete),
            pain,
            input.period,
            exported_at,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RiskFactorGroup, Selection};
    use crate::protocol::ProtocolCategory;
    use crate::reference::caprini_catalog;
    use crate::scoring::{PainBand, ScoringError};
    use chrono::NaiveDate;

    fn make_input() -> AssessmentInput {
        let mut input = AssessmentInput::new(PatientRecord::new(
            65,
            165.0,
            68.0,
            NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
        ));
        input.clinical.is_arthroplasty = true;
        input
    }

    #[test]
    fn test_default_form_values() {
        // The form opens with age 65, 165 cm, 68 kg and TKA/THA ticked.
        let assessment = assess(&make_input(), caprini_catalog()).unwrap();
        assert_eq!(assessment.bmi, 25.0);
        assert_eq!(assessment.risk_score, 7);
        assert_eq!(assessment.risk_group, RiskGroupLabel::Standard);
        assert_eq!(assessment.protocol.category, ProtocolCategory::StandardProtocol);
        assert!(assessment.outcome.is_none());
        assert!(assessment.pain.is_none());
    }

    #[test]
    fn test_high_risk_with_outcome_and_pain() {
        let mut input = make_input();
        input.selections.select(Selection::new(RiskFactorGroup::ThreePoint, "dvt_history"));
        input.answers = Some(OutcomeAnswers::uniform(1).unwrap());
        input.period = Some(RecoveryPeriod::OneYear);
        input.pain = Some(5);

        let assessment = assess(&input, caprini_catalog()).unwrap();
        assert_eq!(assessment.risk_score, 10);
        assert_eq!(assessment.risk_group, RiskGroupLabel::High);
        assert_eq!(assessment.protocol.category, ProtocolCategory::HighRiskScore);
        assert_eq!(assessment.outcome, Some(OutcomeScore::Complete(75.0)));
        assert_eq!(assessment.benchmark.unwrap().acceptable_symptom_state, Some(true));
        assert_eq!(assessment.pain.unwrap().band, PainBand::Moderate);
    }

    #[test]
    fn test_invalid_pain_fails_whole_assessment() {
        let mut input = make_input();
        input.pain = Some(12);
        assert!(matches!(
            assess(&input, caprini_catalog()),
            Err(ScoringError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_export_without_questionnaire() {
        let input = make_input();
        let assessment = assess(&input, caprini_catalog()).unwrap();
        let record = assessment.export_record(&input, Utc::now()).unwrap();
        assert_eq!(record.outcome_score, OutcomeScore::Incomplete);
        assert_eq!(record.risk_score, 7);
        assert!(record.pain.is_none());
    }

    #[test]
    fn test_input_from_json() {
        let json = r#"{
            "patient": {"id": "A1", "name": "Park", "age": 77, "sex": "female",
                        "height_cm": 155, "weight_kg": 70, "procedure_date": "2026-04-10"},
            "clinical": {"is_arthroplasty": true, "has_cardiovascular_history": true,
                         "is_taking_antiplatelet": true},
            "selections": [{"group": "group1", "item": "varicose"}],
            "pain": 2
        }"#;
        let input: AssessmentInput = serde_json::from_str(json).unwrap();
        let assessment = assess(&input, caprini_catalog()).unwrap();
        // 3 (age) + 1 (BMI 29.1) + 5 (TKA) + 1 (varicose)
        assert_eq!(assessment.risk_score, 10);
        assert_eq!(assessment.protocol.category, ProtocolCategory::SwitchingStrategy);
    }
}
