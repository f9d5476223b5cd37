//! Weighted thromboembolism risk score.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::{ClinicalFlags, RiskFactorCatalog, RiskFactorSelections, Selection};
use crate::reference::{AGE_BANDS, ARTHROPLASTY_POINTS, HIGH_RISK_SCORE, OBESITY_BMI_THRESHOLD};

/// Minimum Jaro-Winkler similarity for a "did you mean" hint.
const SUGGESTION_THRESHOLD: f64 = 0.85;

/// Points from the age band. Bands are exclusive; only one applies.
pub fn age_band_points(age: u32) -> u32 {
    AGE_BANDS
        .iter()
        .find(|(min_age, _)| age >= *min_age)
        .map(|(_, points)| *points)
        .unwrap_or(0)
}

/// One point for BMI strictly above 25. A `0.0` BMI never qualifies.
pub fn obesity_points(bmi: f64) -> u32 {
    if bmi > OBESITY_BMI_THRESHOLD {
        1
    } else {
        0
    }
}

/// Points for the planned procedure.
pub fn procedure_points(flags: &ClinicalFlags) -> u32 {
    if flags.is_arthroplasty {
        ARTHROPLASTY_POINTS
    } else {
        0
    }
}

/// Each additive term of the risk score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RiskBreakdown {
    pub age_points: u32,
    pub obesity_points: u32,
    pub procedure_points: u32,
    pub checklist_points: u32,
    /// Selections that did not match the catalog and scored nothing
    pub unknown_selections: Vec<Selection>,
}

impl RiskBreakdown {
    pub fn total(&self) -> u32 {
        self.age_points + self.obesity_points + self.procedure_points + self.checklist_points
    }
}

/// Compute every term of the risk score.
///
/// Selections that are not in `catalog` contribute zero and are reported in
/// [`RiskBreakdown::unknown_selections`]; they are never an error.
pub fn risk_breakdown(
    age: u32,
    bmi: f64,
    flags: &ClinicalFlags,
    selections: &RiskFactorSelections,
    catalog: &RiskFactorCatalog,
) -> RiskBreakdown {
    let mut checklist_points = 0;
    let mut unknown_selections = Vec::new();

    for selection in selections.iter() {
        match catalog.points_for(selection) {
            Some(points) => checklist_points += points,
            None => {
                warn_unknown_selection(selection, catalog);
                unknown_selections.push(selection.clone());
            }
        }
    }

    let breakdown = RiskBreakdown {
        age_points: age_band_points(age),
        obesity_points: obesity_points(bmi),
        procedure_points: procedure_points(flags),
        checklist_points,
        unknown_selections,
    };
    tracing::debug!(
        age = breakdown.age_points,
        obesity = breakdown.obesity_points,
        procedure = breakdown.procedure_points,
        checklist = breakdown.checklist_points,
        total = breakdown.total(),
        "risk score computed"
    );
    breakdown
}

/// Total risk score. Unbounded above.
pub fn compute_risk_score(
    age: u32,
    bmi: f64,
    flags: &ClinicalFlags,
    selections: &RiskFactorSelections,
    catalog: &RiskFactorCatalog,
) -> u32 {
    risk_breakdown(age, bmi, flags, selections, catalog).total()
}

fn warn_unknown_selection(selection: &Selection, catalog: &RiskFactorCatalog) {
    let suggestion = catalog
        .item_ids()
        .map(|id| (id, strsim::jaro_winkler(&selection.item_id, id)))
        .filter(|(_, similarity)| *similarity >= SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
        .and_then(|(id, _)| catalog.find_item(id))
        .map(|(group, item)| Selection::new(group, item.id.as_str()));

    match suggestion {
        Some(suggestion) => tracing::warn!(
            selection = %selection,
            suggestion = %suggestion,
            "ignoring checklist selection not in catalog"
        ),
        None => tracing::warn!(
            selection = %selection,
            "ignoring checklist selection not in catalog"
        ),
    }
}

/// Two-way grouping shown next to the score.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RiskGroupLabel {
    High,
    Standard,
    /// No major procedure planned: the score stands without a group
    ScoreOnly,
}

impl RiskGroupLabel {
    pub fn display(self) -> &'static str {
        match self {
            RiskGroupLabel::High => "High Risk Group",
            RiskGroupLabel::Standard => "Standard Risk Group",
            RiskGroupLabel::ScoreOnly => "Score Calculated",
        }
    }
}

impl fmt::Display for RiskGroupLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display())
    }
}

/// Group label for the dashboard. Only assigned for arthroplasty patients.
pub fn risk_group_label(flags: &ClinicalFlags, risk_score: u32) -> RiskGroupLabel {
    if !flags.is_arthroplasty {
        RiskGroupLabel::ScoreOnly
    } else if risk_score >= HIGH_RISK_SCORE {
        RiskGroupLabel::High
    } else {
        RiskGroupLabel::Standard
    }
}
