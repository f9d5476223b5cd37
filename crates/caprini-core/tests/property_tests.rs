//! Property tests for the calculators.

use caprini_core::models::{ClinicalFlags, OutcomeAnswers, OutcomeScore, RiskFactorSelections, Selection};
use caprini_core::protocol::classify_protocol;
use caprini_core::reference::caprini_catalog;
use caprini_core::scoring::{classify_pain, compute_bmi, compute_outcome_score, compute_risk_score, risk_breakdown};
use proptest::prelude::*;

/// Every (group, item) pair in the built-in checklist.
fn catalog_selections() -> Vec<Selection> {
    caprini_catalog()
        .groups()
        .iter()
        .flat_map(|g| g.items.iter().map(move |item| Selection::new(g.group, item.id.clone())))
        .collect()
}

fn arb_flags() -> impl Strategy<Value = ClinicalFlags> {
    (any::<bool>(), any::<bool>(), any::<bool>()).prop_map(|(a, c, p)| ClinicalFlags {
        is_arthroplasty: a,
        has_cardiovascular_history: c,
        is_taking_antiplatelet: p,
    })
}

proptest! {
    #[test]
    fn checklist_sum_is_order_independent(picks in proptest::collection::vec(0usize..22, 0..30)) {
        let all = catalog_selections();
        let chosen: Vec<Selection> = picks.iter().map(|i| all[*i].clone()).collect();

        let forward: RiskFactorSelections = chosen.iter().cloned().collect();
        let reverse: RiskFactorSelections = chosen.iter().rev().cloned().collect();

        let flags = ClinicalFlags::default();
        let a = compute_risk_score(50, 24.0, &flags, &forward, caprini_catalog());
        let b = compute_risk_score(50, 24.0, &flags, &reverse, caprini_catalog());
        prop_assert_eq!(a, b);
    }

    #[test]
    fn risk_score_is_sum_of_terms(
        age in 0u32..120,
        bmi in 0.0f64..60.0,
        flags in arb_flags(),
        picks in proptest::collection::btree_set(0usize..22, 0..22),
    ) {
        let all = catalog_selections();
        let selections: RiskFactorSelections = picks.iter().map(|i| all[*i].clone()).collect();
        let expected_checklist: u32 = picks.iter().map(|i| all[*i].group.points()).sum();

        let breakdown = risk_breakdown(age, bmi, &flags, &selections, caprini_catalog());
        prop_assert_eq!(breakdown.checklist_points, expected_checklist);
        prop_assert_eq!(
            breakdown.total(),
            breakdown.age_points + breakdown.obesity_points + breakdown.procedure_points + expected_checklist
        );
    }

    #[test]
    fn calculators_are_idempotent(
        height in 0.0f64..250.0,
        weight in 0.0f64..250.0,
        age in 0u32..120,
        flags in arb_flags(),
        pain in 0i32..=10,
    ) {
        prop_assert_eq!(compute_bmi(height, weight), compute_bmi(height, weight));

        let bmi = compute_bmi(height, weight);
        let selections = RiskFactorSelections::new();
        let score = compute_risk_score(age, bmi, &flags, &selections, caprini_catalog());
        prop_assert_eq!(score, compute_risk_score(age, bmi, &flags, &selections, caprini_catalog()));
        prop_assert_eq!(classify_protocol(&flags, score), classify_protocol(&flags, score));
        prop_assert_eq!(classify_pain(pain).unwrap(), classify_pain(pain).unwrap());
    }

    #[test]
    fn pain_is_total_over_scale(score in -50i32..50) {
        prop_assert_eq!(classify_pain(score).is_ok(), (0..=10).contains(&score));
    }

    #[test]
    fn outcome_score_bounded(values in proptest::array::uniform12(0u8..=4)) {
        let sheet = OutcomeAnswers::from_values(&values.map(Some)).unwrap();
        match compute_outcome_score(&sheet) {
            OutcomeScore::Complete(v) => prop_assert!((0.0..=100.0).contains(&v)),
            OutcomeScore::Incomplete => prop_assert!(false, "complete sheet scored incomplete"),
        }
    }

    #[test]
    fn any_missing_answer_is_incomplete(
        values in proptest::array::uniform12(0u8..=4),
        missing in 0usize..12,
    ) {
        let mut sheet = OutcomeAnswers::from_values(&values.map(Some)).unwrap();
        sheet.clear(missing);
        prop_assert_eq!(compute_outcome_score(&sheet), OutcomeScore::Incomplete);
    }
}
