use serde::{Deserialize, Serialize};

use crate::core::types::PatientId;

/// ABO/Rh blood group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BloodType {
    #[serde(rename = "A+")]
    APositive,
    #[serde(rename = "A-")]
    ANegative,
    #[serde(rename = "B+")]
    BPositive,
    #[serde(rename = "B-")]
    BNegative,
    #[serde(rename = "O+")]
    OPositive,
    #[serde(rename = "O-")]
    ONegative,
    #[serde(rename = "AB+")]
    AbPositive,
    #[serde(rename = "AB-")]
    AbNegative,
}

impl BloodType {
    pub const ALL: [BloodType; 8] = [
        Self::APositive,
        Self::ANegative,
        Self::BPositive,
        Self::BNegative,
        Self::OPositive,
        Self::ONegative,
        Self::AbPositive,
        Self::AbNegative,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::APositive => "A+",
            Self::ANegative => "A-",
            Self::BPositive => "B+",
            Self::BNegative => "B-",
            Self::OPositive => "O+",
            Self::ONegative => "O-",
            Self::AbPositive => "AB+",
            Self::AbNegative => "AB-",
        }
    }

    /// Parse a blood type label such as "AB-" (case-insensitive)
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let upper = s.trim().to_uppercase();
        Self::ALL.into_iter().find(|b| b.as_str() == upper)
    }
}

impl std::fmt::Display for BloodType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Demographic profile attached to a patient
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientProfile {
    pub patient_id: PatientId,
    pub name: String,
    pub age: u32,
    pub gender: String,

    /// Height in metres
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,

    /// Weight in kilograms
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,

    pub blood_type: BloodType,
}

impl PatientProfile {
    /// Body-mass index of this patient, when height and weight are known
    #[must_use]
    pub fn bmi(&self) -> Option<f64> {
        body_mass_index(self.height, self.weight)
    }
}

/// BMI rounded to two decimals; `None` unless both values are present and height is positive
#[must_use]
pub fn body_mass_index(height: Option<f64>, weight: Option<f64>) -> Option<f64> {
    match (height, weight) {
        (Some(h), Some(w)) if h > 0.0 && h.is_finite() && w.is_finite() => {
            Some(crate::matching::scoring::round2(w / (h * h)))
        }
        _ => None,
    }
}
