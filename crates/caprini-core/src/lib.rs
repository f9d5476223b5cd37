//! Caprini Core Library
//!
//! Point-of-care scoring and classification engine for venous
//! thromboembolism (VTE) prophylaxis and post-arthroplasty follow-up.
//!
//! # Architecture
//!
//! ```text
//!  PatientRecord, ClinicalFlags, RiskFactorSelections, OutcomeAnswers, pain
//!                                     │
//!                         ┌───────────▼───────────┐
//!                         │   Derived metrics     │  BMI, risk score,
//!                         │   (scoring)           │  outcome score, pain band
//!                         └───────────┬───────────┘
//!                                     │
//!                         ┌───────────▼───────────┐
//!                         │  Protocol classifier  │  4-rule decision table
//!                         └───────────┬───────────┘
//!                                     │
//!                         ┌───────────▼───────────┐
//!                         │  Export record        │  fixed field order
//!                         └───────────┬───────────┘
//!                                     │
//!                     ┌───────────────┼───────────────┐
//!                     ▼               ▼               ▼
//!                 Clipboard          CSV         Remote sheet
//!                  (TSV)           download       (caprini-sink)
//! ```
//!
//! # Core Principle
//!
//! **Everything is recomputed from the current input snapshot.** No
//! function in this crate keeps state between calls; the only persisted value
//! is the operator's remembered endpoint, and scoring never reads it.
//!
//! # Modules
//!
//! - [`models`]: Domain types (PatientRecord, ClinicalFlags, RiskFactorCatalog, etc.)
//! - [`reference`]: Static checklist, age bands, questionnaire, benchmarks
//! - [`scoring`]: BMI, risk score, outcome score, pain classification
//! - [`protocol`]: Prophylaxis protocol decision table
//! - [`assessment`]: Full recomputation for one input snapshot
//! - [`export`]: Canonical export record and TSV/CSV/JSON text
//! - [`db`]: SQLite settings store for the remembered endpoint

pub mod assessment;
pub mod db;
pub mod export;
pub mod models;
pub mod protocol;
pub mod reference;
pub mod scoring;

// Re-export commonly used types
pub use assessment::{assess, Assessment, AssessmentInput};
pub use db::SettingsStore;
pub use export::{build_export_record, ExportRecord, ExportRiskGroup, EXPORT_FIELDS};
pub use models::{
    ClinicalFlags, OutcomeAnswers, OutcomeScore, PatientRecord, RecoveryPeriod, RiskFactorCatalog,
    RiskFactorGroup, RiskFactorSelections, Selection, Sex,
};
pub use protocol::{classify_protocol, ProtocolCategory, ProtocolRecommendation};
pub use reference::caprini_catalog;
pub use scoring::{
    classify_pain, compute_bmi, compute_outcome_score, compute_risk_score, PainBand, ScoringError,
};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::{Arc, Mutex};

use chrono::NaiveDate;

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum CapriniError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Settings error: {0}")]
    SettingsError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<ScoringError> for CapriniError {
    fn from(e: ScoringError) -> Self {
        match e {
            ScoringError::InvalidInput(msg) => CapriniError::InvalidInput(msg),
        }
    }
}

impl From<db::DbError> for CapriniError {
    fn from(e: db::DbError) -> Self {
        CapriniError::SettingsError(e.to_string())
    }
}

impl From<serde_json::Error> for CapriniError {
    fn from(e: serde_json::Error) -> Self {
        CapriniError::SerializationError(e.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for CapriniError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        CapriniError::SettingsError(format!("Lock poisoned: {}", e))
    }
}

// =========================================================================
// Calculator Functions (exported to FFI)
// =========================================================================

/// Parse a numeric text field from the form; the error names the field.
#[uniffi::export]
pub fn parse_form_number(field: String, text: String) -> Result<f64, CapriniError> {
    Ok(scoring::parse_numeric(&field, &text)?)
}

/// Body-mass index, `0.0` when height or weight is unusable.
#[uniffi::export]
pub fn calculate_bmi(height_cm: f64, weight_kg: f64) -> f64 {
    compute_bmi(height_cm, weight_kg)
}

/// Risk score against the built-in checklist.
#[uniffi::export]
pub fn calculate_risk_score(
    age: u32,
    bmi: f64,
    flags: FfiClinicalFlags,
    selections: Vec<FfiSelection>,
) -> u32 {
    compute_risk_score(
        age,
        bmi,
        &flags.into(),
        &selections_from_ffi(&selections),
        caprini_catalog(),
    )
}

/// Outcome score, or `None` while the questionnaire is incomplete.
#[uniffi::export]
pub fn calculate_outcome_score(answers: Vec<Option<u8>>) -> Result<Option<f64>, CapriniError> {
    let sheet = OutcomeAnswers::from_values(&answers)?;
    Ok(compute_outcome_score(&sheet).value())
}

/// Pain band and guidance for a 0-10 rating.
#[uniffi::export]
pub fn pain_band(score: i32) -> Result<FfiPainClassification, CapriniError> {
    Ok(classify_pain(score)?.into())
}

/// Recommended prophylaxis protocol.
#[uniffi::export]
pub fn recommend_protocol(flags: FfiClinicalFlags, risk_score: u32) -> FfiProtocolRecommendation {
    classify_protocol(&flags.into(), risk_score).into()
}

/// Recompute everything for the current form state.
///
/// `unknown_selections` lists every selection that scored nothing, whether
/// its group key or its item id was unrecognised.
#[uniffi::export]
pub fn assess_form(input: FfiAssessmentInput) -> Result<FfiAssessment, CapriniError> {
    let unknown_groups = unknown_group_keys(&input.selections);
    let input = AssessmentInput::try_from(input)?;
    let assessment = assess(&input, caprini_catalog())?;
    let mut result = FfiAssessment::from(assessment);
    result.unknown_selections.extend(unknown_groups);
    Ok(result)
}

/// Snapshot the current form state as an export record, stamped now.
#[uniffi::export]
pub fn export_form(input: FfiAssessmentInput) -> Result<FfiExportRecord, CapriniError> {
    let input = AssessmentInput::try_from(input)?;
    let assessment = assess(&input, caprini_catalog())?;
    let record = assessment.export_record(&input, chrono::Utc::now())?;
    FfiExportRecord::try_from(&record)
}

/// The built-in checklist, for rendering the form.
#[uniffi::export]
pub fn checklist() -> Vec<FfiCatalogGroup> {
    caprini_catalog()
        .groups()
        .iter()
        .map(|g| FfiCatalogGroup {
            key: g.group.key().to_string(),
            title: g.title.clone(),
            points: g.group.points(),
            items: g
                .items
                .iter()
                .map(|item| FfiCatalogItem {
                    id: item.id.clone(),
                    label: item.label.clone(),
                })
                .collect(),
        })
        .collect()
}

/// The outcome questionnaire, for rendering the follow-up form.
#[uniffi::export]
pub fn questionnaire() -> FfiQuestionnaire {
    FfiQuestionnaire {
        stem: reference::OUTCOME_QUESTION_STEM.to_string(),
        questions: reference::OUTCOME_QUESTIONS.iter().map(|q| q.to_string()).collect(),
        answer_labels: reference::ANSWER_LABELS.iter().map(|l| l.to_string()).collect(),
    }
}

/// Population benchmarks for every recovery period.
#[uniffi::export]
pub fn benchmarks() -> Vec<FfiBenchmark> {
    reference::benchmarks().into_iter().map(Into::into).collect()
}

// =========================================================================
// Settings (exported to FFI)
// =========================================================================

/// Open or create the settings database at the given path.
#[uniffi::export]
pub fn open_settings(path: String) -> Result<Arc<CapriniSettings>, CapriniError> {
    let store = SettingsStore::open(&path)?;
    Ok(Arc::new(CapriniSettings {
        store: Arc::new(Mutex::new(store)),
    }))
}

/// Create an in-memory settings database (for testing).
#[uniffi::export]
pub fn open_settings_in_memory() -> Result<Arc<CapriniSettings>, CapriniError> {
    let store = SettingsStore::open_in_memory()?;
    Ok(Arc::new(CapriniSettings {
        store: Arc::new(Mutex::new(store)),
    }))
}

/// Thread-safe settings wrapper for FFI.
#[derive(uniffi::Object)]
pub struct CapriniSettings {
    store: Arc<Mutex<SettingsStore>>,
}

#[uniffi::export]
impl CapriniSettings {
    /// The last endpoint the operator entered.
    pub fn remembered_endpoint(&self) -> Result<Option<String>, CapriniError> {
        let store = self.store.lock()?;
        Ok(store.remembered_endpoint()?)
    }

    /// Remember an endpoint; an empty string clears it.
    pub fn remember_endpoint(&self, endpoint: String) -> Result<(), CapriniError> {
        let store = self.store.lock()?;
        store.remember_endpoint(&endpoint)?;
        Ok(())
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe clinical flags.
#[derive(Debug, Clone, Copy, uniffi::Record)]
pub struct FfiClinicalFlags {
    pub is_arthroplasty: bool,
    pub has_cardiovascular_history: bool,
    pub is_taking_antiplatelet: bool,
}

impl From<FfiClinicalFlags> for ClinicalFlags {
    fn from(flags: FfiClinicalFlags) -> Self {
        ClinicalFlags {
            is_arthroplasty: flags.is_arthroplasty,
            has_cardiovascular_history: flags.has_cardiovascular_history,
            is_taking_antiplatelet: flags.is_taking_antiplatelet,
        }
    }
}

/// FFI-safe checklist selection. `group` is the form key (`group1` ...).
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiSelection {
    pub group: String,
    pub item_id: String,
}

/// Selections with an unknown group key cannot be represented and are
/// dropped with a warning; unknown item ids are left for the scorer.
fn selections_from_ffi(selections: &[FfiSelection]) -> RiskFactorSelections {
    selections
        .iter()
        .filter_map(|s| match RiskFactorGroup::from_key(&s.group) {
            Some(group) => Some(Selection::new(group, s.item_id.clone())),
            None => {
                tracing::warn!(group = %s.group, item = %s.item_id, "ignoring selection with unknown group");
                None
            }
        })
        .collect()
}

/// Form keys (`group_item`) of selections whose group key is unknown.
fn unknown_group_keys(selections: &[FfiSelection]) -> Vec<String> {
    selections
        .iter()
        .filter(|s| RiskFactorGroup::from_key(&s.group).is_none())
        .map(|s| format!("{}_{}", s.group, s.item_id))
        .collect()
}

/// FFI-safe patient record.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPatient {
    pub id: String,
    pub name: String,
    pub age: u32,
    /// `male`, `female`, `other`; anything else is unspecified
    pub sex: String,
    pub height_cm: f64,
    pub weight_kg: f64,
    /// ISO 8601 date (YYYY-MM-DD)
    pub procedure_date: String,
}

impl TryFrom<FfiPatient> for PatientRecord {
    type Error = CapriniError;

    fn try_from(patient: FfiPatient) -> Result<Self, Self::Error> {
        let procedure_date = NaiveDate::parse_from_str(patient.procedure_date.trim(), "%Y-%m-%d")
            .map_err(|e| {
                CapriniError::InvalidInput(format!(
                    "procedure date {:?}: {}",
                    patient.procedure_date, e
                ))
            })?;
        let sex = match patient.sex.trim().to_lowercase().as_str() {
            "male" | "m" => Sex::Male,
            "female" | "f" => Sex::Female,
            "other" => Sex::Other,
            _ => Sex::Unspecified,
        };
        Ok(PatientRecord {
            id: patient.id,
            name: patient.name,
            age: patient.age,
            sex,
            height_cm: patient.height_cm,
            weight_kg: patient.weight_kg,
            procedure_date,
        })
    }
}

/// FFI-safe form snapshot.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiAssessmentInput {
    pub patient: FfiPatient,
    pub flags: FfiClinicalFlags,
    pub selections: Vec<FfiSelection>,
    /// Twelve answers, or `None` when the questionnaire is not in use
    pub answers: Option<Vec<Option<u8>>>,
    /// Recovery period key (`one_year`, `three_months`, ...)
    pub period: Option<String>,
    pub pain: Option<i32>,
}

impl TryFrom<FfiAssessmentInput> for AssessmentInput {
    type Error = CapriniError;

    fn try_from(input: FfiAssessmentInput) -> Result<Self, Self::Error> {
        let answers = input
            .answers
            .map(|values| OutcomeAnswers::from_values(&values))
            .transpose()?;
        let period = input
            .period
            .map(|key| {
                RecoveryPeriod::from_key(key.trim())
                    .ok_or_else(|| CapriniError::InvalidInput(format!("unknown recovery period: {}", key)))
            })
            .transpose()?;
        Ok(AssessmentInput {
            patient: input.patient.try_into()?,
            clinical: input.flags.into(),
            selections: selections_from_ffi(&input.selections),
            answers,
            period,
            pain: input.pain,
        })
    }
}

/// FFI-safe pain classification.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPainClassification {
    pub score: u8,
    pub band: String,
    pub guidance: String,
}

impl From<scoring::PainClassification> for FfiPainClassification {
    fn from(pain: scoring::PainClassification) -> Self {
        Self {
            score: pain.score,
            band: pain.band.to_string(),
            guidance: pain.guidance.to_string(),
        }
    }
}

/// FFI-safe protocol recommendation.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiProtocolRecommendation {
    pub category: String,
    pub title: String,
    pub summary: String,
    pub guidance: Vec<String>,
    pub severity: String,
}

impl From<ProtocolRecommendation> for FfiProtocolRecommendation {
    fn from(rec: ProtocolRecommendation) -> Self {
        Self {
            category: format!("{:?}", rec.category),
            title: rec.title.to_string(),
            summary: rec.summary.to_string(),
            guidance: rec.guidance.iter().map(|g| g.to_string()).collect(),
            severity: format!("{:?}", rec.severity),
        }
    }
}

/// FFI-safe assessment result.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiAssessment {
    pub bmi: f64,
    pub age_points: u32,
    pub obesity_points: u32,
    pub procedure_points: u32,
    pub checklist_points: u32,
    pub risk_score: u32,
    pub risk_group: String,
    pub unknown_selections: Vec<String>,
    pub protocol: FfiProtocolRecommendation,
    /// `None` while incomplete or not in use
    pub outcome_score: Option<f64>,
    pub outcome_complete: bool,
    /// Benchmark for the selected period, when a complete score has one
    pub benchmark: Option<FfiBenchmark>,
    pub benchmark_z_score: Option<f64>,
    pub acceptable_symptom_state: Option<bool>,
    pub forgotten_joint: Option<bool>,
    pub pain: Option<FfiPainClassification>,
}

impl From<Assessment> for FfiAssessment {
    fn from(a: Assessment) -> Self {
        Self {
            bmi: a.bmi,
            age_points: a.breakdown.age_points,
            obesity_points: a.breakdown.obesity_points,
            procedure_points: a.breakdown.procedure_points,
            checklist_points: a.breakdown.checklist_points,
            risk_score: a.risk_score,
            risk_group: a.risk_group.to_string(),
            unknown_selections: a
                .breakdown
                .unknown_selections
                .iter()
                .map(|s| s.legacy_key())
                .collect(),
            protocol: a.protocol.into(),
            outcome_score: a.outcome.and_then(|o| o.value()),
            outcome_complete: a.outcome.map(|o| o.is_complete()).unwrap_or(false),
            benchmark: a.benchmark.map(|b| b.benchmark.into()),
            benchmark_z_score: a.benchmark.map(|b| b.z_score),
            acceptable_symptom_state: a.benchmark.and_then(|b| b.acceptable_symptom_state),
            forgotten_joint: a.benchmark.and_then(|b| b.forgotten_joint),
            pain: a.pain.map(Into::into),
        }
    }
}

/// FFI-safe recovery-period benchmark.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiBenchmark {
    /// Period key (`one_year`, ...), as accepted by `FfiAssessmentInput`
    pub period: String,
    pub label: String,
    pub mean: f64,
    pub std_dev: f64,
    pub description: String,
    pub thresholds_apply: bool,
}

impl From<models::PeriodBenchmark> for FfiBenchmark {
    fn from(b: models::PeriodBenchmark) -> Self {
        Self {
            period: b.period.key().to_string(),
            label: b.period.label().to_string(),
            mean: b.mean,
            std_dev: b.std_dev,
            description: b.description.to_string(),
            thresholds_apply: b.thresholds_apply,
        }
    }
}

/// FFI-safe questionnaire: stem, twelve prompts, labels for answers 0-4.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiQuestionnaire {
    pub stem: String,
    pub questions: Vec<String>,
    pub answer_labels: Vec<String>,
}

/// FFI-safe export column.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiExportField {
    pub name: String,
    pub value: String,
}

/// FFI-safe export record with its ready-made text forms.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiExportRecord {
    pub fields: Vec<FfiExportField>,
    pub tsv: String,
    pub csv: String,
    pub json: String,
}

impl TryFrom<&ExportRecord> for FfiExportRecord {
    type Error = CapriniError;

    fn try_from(record: &ExportRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            fields: record
                .fields()
                .into_iter()
                .map(|(name, value)| FfiExportField {
                    name: name.to_string(),
                    value,
                })
                .collect(),
            tsv: record.to_tsv(),
            csv: record.to_csv(),
            json: record.to_json()?,
        })
    }
}

/// FFI-safe checklist group.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiCatalogGroup {
    pub key: String,
    pub title: String,
    pub points: u32,
    pub items: Vec<FfiCatalogItem>,
}

/// FFI-safe checklist item.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiCatalogItem {
    pub id: String,
    pub label: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_ffi_input() -> FfiAssessmentInput {
        FfiAssessmentInput {
            patient: FfiPatient {
                id: "A-7".into(),
                name: "Choi".into(),
                age: 58,
                sex: "F".into(),
                height_cm: 160.0,
                weight_kg: 70.0,
                procedure_date: "2026-05-20".into(),
            },
            flags: FfiClinicalFlags {
                is_arthroplasty: true,
                has_cardiovascular_history: false,
                is_taking_antiplatelet: false,
            },
            selections: vec![
                FfiSelection {
                    group: "group2".into(),
                    item_id: "cancer".into(),
                },
                FfiSelection {
                    group: "group7".into(),
                    item_id: "cancer".into(),
                },
            ],
            answers: None,
            period: Some("six_months".into()),
            pain: Some(7),
        }
    }

    #[test]
    fn test_assess_form() {
        let result = assess_form(make_ffi_input()).unwrap();
        // 1 (age) + 1 (BMI 27.3) + 5 (TKA) + 2 (cancer)
        assert_eq!(result.risk_score, 9);
        assert_eq!(result.risk_group, "Standard Risk Group");
        assert_eq!(result.protocol.category, "StandardProtocol");
        assert!(!result.outcome_complete);
        assert!(result.benchmark.is_none());
        assert_eq!(result.pain.unwrap().band, "Severe");
        assert_eq!(result.unknown_selections, vec!["group7_cancer".to_string()]);
    }

    #[test]
    fn test_assess_form_flags_unknown_group_and_item() {
        let mut input = make_ffi_input();
        input.selections = vec![
            FfiSelection {
                group: "group4".into(),
                item_id: "stroke".into(),
            },
            FfiSelection {
                group: "group5".into(),
                item_id: "strok".into(),
            },
        ];
        let result = assess_form(input).unwrap();
        assert_eq!(result.checklist_points, 0);
        assert!(result.unknown_selections.contains(&"group4_stroke".to_string()));
        assert!(result.unknown_selections.contains(&"group5_strok".to_string()));
        assert_eq!(result.unknown_selections.len(), 2);
    }

    #[test]
    fn test_assess_form_reports_benchmark() {
        let mut input = make_ffi_input();
        input.answers = Some(vec![Some(1); 12]);
        input.period = Some("one_year".into());
        let result = assess_form(input).unwrap();

        let benchmark = result.benchmark.unwrap();
        assert_eq!(benchmark.period, "one_year");
        assert_eq!(benchmark.mean, 58.0);
        assert_eq!(benchmark.std_dev, 27.0);
        assert!(benchmark.thresholds_apply);
        assert_eq!(result.outcome_score, Some(75.0));
    }

    #[test]
    fn test_parse_form_number() {
        assert_eq!(parse_form_number("height".into(), " 172.5 ".into()).unwrap(), 172.5);
        match parse_form_number("weight".into(), "70kg".into()) {
            Err(CapriniError::InvalidInput(msg)) => assert!(msg.contains("weight")),
            other => panic!("expected invalid input, got {:?}", other),
        }
    }

    #[test]
    fn test_ffi_bad_date_rejected() {
        let mut input = make_ffi_input();
        input.patient.procedure_date = "20/05/2026".into();
        assert!(matches!(assess_form(input), Err(CapriniError::InvalidInput(_))));
    }

    #[test]
    fn test_ffi_unknown_period_rejected() {
        let mut input = make_ffi_input();
        input.period = Some("ten_years".into());
        assert!(matches!(assess_form(input), Err(CapriniError::InvalidInput(_))));
    }

    #[test]
    fn test_ffi_export_record() {
        let record = export_form(make_ffi_input()).unwrap();
        let names: Vec<&str> = record.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, EXPORT_FIELDS.to_vec());
        assert_eq!(record.fields[5].value, "6 months");
        assert_eq!(record.fields[8].value, "Incomplete");
        assert!(record.tsv.starts_with("timestamp\tpatientId"));
    }

    #[test]
    fn test_ffi_outcome_score() {
        assert_eq!(calculate_outcome_score(vec![Some(0); 12]).unwrap(), Some(100.0));
        let mut partial = vec![Some(0); 12];
        partial[3] = None;
        assert_eq!(calculate_outcome_score(partial).unwrap(), None);
        assert!(calculate_outcome_score(vec![Some(0); 3]).is_err());
    }

    #[test]
    fn test_ffi_settings_roundtrip() {
        let settings = open_settings_in_memory().unwrap();
        assert_eq!(settings.remembered_endpoint().unwrap(), None);
        settings
            .remember_endpoint("https://script.example.com/exec".into())
            .unwrap();
        assert_eq!(
            settings.remembered_endpoint().unwrap(),
            Some("https://script.example.com/exec".to_string())
        );
    }

    #[test]
    fn test_checklist() {
        let groups = checklist();
        assert_eq!(groups.len(), 4);
        assert_eq!(groups[3].key, "group5");
        assert_eq!(groups[3].points, 5);
    }

    #[test]
    fn test_questionnaire() {
        let form = questionnaire();
        assert_eq!(form.questions.len(), 12);
        assert_eq!(form.answer_labels.first().map(String::as_str), Some("Never"));
        assert_eq!(form.answer_labels.len(), 5);
        assert!(form.stem.contains("artificial joint"));
    }

    #[test]
    fn test_benchmarks() {
        let table = benchmarks();
        let keys: Vec<&str> = table.iter().map(|b| b.period.as_str()).collect();
        assert_eq!(
            keys,
            vec!["preoperative", "six_weeks", "three_months", "six_months", "one_year", "two_years"]
        );
        assert_eq!(table[1].label, "6 weeks");
        assert_eq!((table[1].mean, table[1].std_dev), (30.0, 22.0));
    }
}
