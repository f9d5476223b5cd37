//! Static reference data: the Caprini checklist, age bands, the
//! joint-awareness questionnaire and recovery-period benchmarks.
//!
//! Everything here is immutable. Callers may build their own
//! [`RiskFactorCatalog`] to evolve the checklist; the scorer never assumes
//! this particular one.

use std::sync::OnceLock;

use crate::models::{
    CatalogGroup, PeriodBenchmark, RecoveryPeriod, RiskFactorCatalog, RiskFactorGroup,
    RiskFactorItem, QUESTION_COUNT,
};

/// `(minimum age, points)`, checked top to bottom; first match wins.
pub const AGE_BANDS: [(u32, u32); 3] = [(75, 3), (61, 2), (41, 1)];

/// BMI strictly above this earns the obesity point.
pub const OBESITY_BMI_THRESHOLD: f64 = 25.0;

/// Points for a planned major joint replacement.
pub const ARTHROPLASTY_POINTS: u32 = 5;

/// Risk score at or above which a patient counts as high risk.
pub const HIGH_RISK_SCORE: u32 = 10;

/// Acceptable symptom state threshold on the 0-100 outcome scale.
pub const ACCEPTABLE_SYMPTOM_STATE: f64 = 40.6;

/// "Forgotten joint" threshold on the 0-100 outcome scale.
pub const FORGOTTEN_JOINT_THRESHOLD: f64 = 84.4;

/// Questionnaire prompts, completed by "... are you aware of your artificial joint".
pub const OUTCOME_QUESTIONS: [&str; QUESTION_COUNT] = [
    "in bed at night?",
    "when you are sitting on a chair for more than 1 hour?",
    "when you are walking for more than 15 minutes?",
    "when you are taking a bath/shower?",
    "when you are traveling in a car?",
    "when you are climbing stairs?",
    "when you are walking on uneven ground?",
    "when you are standing up from a low-sitting position?",
    "when you are standing for long periods of time?",
    "when you are doing housework or gardening?",
    "when you are taking a walk/hiking?",
    "when you are doing your favorite sport?",
];

/// Common stem shown above the prompts.
pub const OUTCOME_QUESTION_STEM: &str = "In your everyday life, are you aware of your artificial joint";

/// Labels for answers 0 through 4.
pub const ANSWER_LABELS: [&str; 5] = ["Never", "Almost never", "Seldom", "Sometimes", "Mostly"];

fn caprini_groups() -> Vec<CatalogGroup> {
    vec![
        CatalogGroup {
            group: RiskFactorGroup::OnePoint,
            title: "1-point factors (minor risk)".into(),
            items: vec![
                RiskFactorItem::new("swollen", "Swollen legs"),
                RiskFactorItem::new("varicose", "Varicose veins"),
                RiskFactorItem::new("bed_rest_minor", "Bed rest under 3 days (walking limited to 10 m)"),
                RiskFactorItem::new("pregnancy", "Pregnant or within 1 month postpartum"),
                RiskFactorItem::new("hormone", "Oral contraceptives or hormone therapy"),
                RiskFactorItem::new("miscarriage", "Unexplained stillbirth or miscarriage (3 or more)"),
                RiskFactorItem::new("lung", "Serious lung disease incl. pneumonia (past month)"),
                RiskFactorItem::new("heart", "Acute myocardial infarction or heart failure (past month)"),
                RiskFactorItem::new("sepsis", "Sepsis (past month)"),
                RiskFactorItem::new("minor_surgery", "Other minor surgery planned"),
            ],
        },
        CatalogGroup {
            group: RiskFactorGroup::TwoPoint,
            title: "2-point factors (moderate risk)".into(),
            items: vec![
                RiskFactorItem::new("cancer", "Malignancy (present or previous)"),
                RiskFactorItem::new("bed_rest_major", "Confined to bed for more than 72 hours"),
                RiskFactorItem::new("cline", "Central venous access"),
                RiskFactorItem::new("major_surgery", "Open or urologic surgery planned (>45 min)"),
            ],
        },
        CatalogGroup {
            group: RiskFactorGroup::ThreePoint,
            title: "3-point factors (high risk)".into(),
            items: vec![
                RiskFactorItem::new("dvt_history", "History of deep vein thrombosis"),
                RiskFactorItem::new("pe_history", "History of pulmonary embolism"),
                RiskFactorItem::new("family_history", "Family history of thrombosis"),
                RiskFactorItem::new("thrombophilia", "Thrombophilia (e.g. Factor V Leiden positive)"),
                RiskFactorItem::new("hit", "Heparin-induced thrombocytopenia"),
            ],
        },
        CatalogGroup {
            group: RiskFactorGroup::FivePoint,
            title: "5-point factors (very high risk)".into(),
            items: vec![
                RiskFactorItem::new("stroke", "Stroke (past month)"),
                RiskFactorItem::new("fracture", "Hip, pelvis or leg fracture (past month)"),
                RiskFactorItem::new("spinal_cord", "Acute spinal cord injury (paralysis)"),
            ],
        },
    ]
}

/// The built-in Caprini checklist.
pub fn caprini_catalog() -> &'static RiskFactorCatalog {
    static CATALOG: OnceLock<RiskFactorCatalog> = OnceLock::new();
    CATALOG.get_or_init(|| RiskFactorCatalog::from_trusted(caprini_groups()))
}

/// Population benchmark for a recovery period.
pub fn benchmark(period: RecoveryPeriod) -> PeriodBenchmark {
    let (mean, std_dev, description, thresholds_apply) = match period {
        RecoveryPeriod::Preoperative => (20.0, 18.0, "Before surgery; baseline awareness of the native joint", false),
        RecoveryPeriod::SixWeeks => (30.0, 22.0, "Early recovery; awareness is expected to be high", false),
        RecoveryPeriod::ThreeMonths => (40.0, 24.0, "Rehabilitation phase", false),
        RecoveryPeriod::SixMonths => (50.0, 26.0, "Late rehabilitation", false),
        RecoveryPeriod::OneYear => (58.0, 27.0, "One-year follow-up; fixed thresholds validated", true),
        RecoveryPeriod::TwoYears => (62.0, 28.0, "Two-year follow-up; fixed thresholds validated", true),
    };
    PeriodBenchmark {
        period,
        mean,
        std_dev,
        description,
        thresholds_apply,
    }
}

/// Benchmarks for every recovery period, in chronological order.
pub fn benchmarks() -> Vec<PeriodBenchmark> {
    RecoveryPeriod::ALL.into_iter().map(benchmark).collect()
}
