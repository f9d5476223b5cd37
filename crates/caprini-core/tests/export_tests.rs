//! Export record integration tests.

use caprini_core::assessment::{assess, AssessmentInput};
use caprini_core::export::EXPORT_FIELDS;
use caprini_core::models::{OutcomeAnswers, PatientRecord, RecoveryPeriod};
use caprini_core::reference::caprini_catalog;
use chrono::{NaiveDate, TimeZone, Utc};
use proptest::prelude::*;

fn make_input(age: u32, pain: Option<i32>, answered: usize) -> AssessmentInput {
    let mut patient = PatientRecord::new(age, 168.0, 74.0, NaiveDate::from_ymd_opt(2026, 6, 1).unwrap());
    patient.id = "H-0042".into();
    patient.name = "Yoon Seo".into();

    let mut answers = OutcomeAnswers::new();
    for i in 0..answered {
        answers.set(i, 1).unwrap();
    }

    let mut input = AssessmentInput::new(patient);
    input.clinical.is_arthroplasty = true;
    input.answers = Some(answers);
    input.period = Some(RecoveryPeriod::ThreeMonths);
    input.pain = pain;
    input
}

#[test]
fn test_export_text_forms_agree() {
    let input = make_input(70, Some(2), 12);
    let assessment = assess(&input, caprini_catalog()).unwrap();
    let at = Utc.with_ymd_and_hms(2026, 6, 1, 8, 0, 0).unwrap();
    let record = assessment.export_record(&input, at).unwrap();

    let csv = record.to_csv();
    let tsv = record.to_tsv();
    let csv_values: Vec<&str> = csv.lines().nth(1).unwrap().split(',').collect();
    let tsv_values: Vec<&str> = tsv.lines().nth(1).unwrap().split('\t').collect();
    assert_eq!(csv_values, tsv_values);
    assert_eq!(
        csv_values,
        vec![
            "2026-06-01T08:00:00.000Z",
            "H-0042",
            "Yoon Seo",
            "70",
            "2026-06-01",
            "3 months",
            "8",
            "Low",
            "75.0",
            "2",
        ]
    );

    let json: serde_json::Value = serde_json::from_str(&record.to_json().unwrap()).unwrap();
    assert_eq!(json["caprini"], 8);
    assert_eq!(json["fjs"], 75.0);
    assert_eq!(json["risk_group"], "Low");
}

proptest! {
    #[test]
    fn export_always_has_every_field_in_order(
        age in 0u32..110,
        pain in proptest::option::of(0i32..=10),
        answered in 0usize..=12,
    ) {
        let input = make_input(age, pain, answered);
        let assessment = assess(&input, caprini_catalog()).unwrap();
        let record = assessment.export_record(&input, Utc::now()).unwrap();

        let fields = record.fields();
        let names: Vec<&str> = fields.iter().map(|(name, _)| *name).collect();
        prop_assert_eq!(names, EXPORT_FIELDS.to_vec());

        let fjs = &fields[8].1;
        if answered < 12 {
            prop_assert_eq!(fjs.as_str(), "Incomplete");
        } else {
            prop_assert_ne!(fjs.as_str(), "Incomplete");
        }
        prop_assert_eq!(record.to_tsv().lines().count(), 2);
    }
}
