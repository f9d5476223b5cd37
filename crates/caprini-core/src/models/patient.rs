//! Patient and clinical-history models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Biological sex. Recorded for the chart only; never used in scoring.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    Male,
    Female,
    Other,
    #[default]
    Unspecified,
}

/// Demographics and anthropometrics captured on the patient form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PatientRecord {
    /// Hospital registration number (operator-supplied, may be empty)
    #[serde(default)]
    pub id: String,
    /// Display name (may be empty)
    #[serde(default)]
    pub name: String,
    /// Age in completed years
    pub age: u32,
    #[serde(default)]
    pub sex: Sex,
    /// Height in centimeters
    pub height_cm: f64,
    /// Weight in kilograms
    pub weight_kg: f64,
    /// Planned procedure date
    pub procedure_date: NaiveDate,
}

impl PatientRecord {
    /// Create a record with an empty identifier and name.
    pub fn new(age: u32, height_cm: f64, weight_kg: f64, procedure_date: NaiveDate) -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            age,
            sex: Sex::Unspecified,
            height_cm,
            weight_kg,
            procedure_date,
        }
    }

    /// Body-mass index for this patient, `0.0` when not computable.
    pub fn bmi(&self) -> f64 {
        crate::scoring::compute_bmi(self.height_cm, self.weight_kg)
    }
}

/// Procedure and cardiovascular flags that drive the protocol decision.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ClinicalFlags {
    /// Major joint replacement (TKA/THA) planned
    #[serde(default)]
    pub is_arthroplasty: bool,
    /// Arrhythmia, myocardial infarction or stroke history
    #[serde(default)]
    pub has_cardiovascular_history: bool,
    /// Currently on antiplatelet therapy. Only read when
    /// `has_cardiovascular_history` is set.
    #[serde(default)]
    pub is_taking_antiplatelet: bool,
}

impl ClinicalFlags {
    /// Antiplatelet use that actually counts for the decision table.
    pub fn effective_antiplatelet(&self) -> bool {
        self.has_cardiovascular_history && self.is_taking_antiplatelet
    }
}
