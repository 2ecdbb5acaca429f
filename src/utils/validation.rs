//! Centralized validation and helper functions.

use serde::Deserialize;

use crate::core::disease::ObservedSymptoms;
use crate::core::patient::{BloodType, PatientProfile};
use crate::core::types::PatientId;

/// Maximum number of symptoms accepted in a single query (DOS protection)
pub const MAX_OBSERVED_SYMPTOMS: usize = 100;

/// Maximum length of a single symptom name
pub const MAX_SYMPTOM_NAME_LENGTH: usize = 128;

/// Maximum length of free-text profile fields
pub const MAX_PROFILE_FIELD_LENGTH: usize = 100;

/// Input validation error types
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please select at least one symptom")]
    NoSymptoms,
    #[error("Too many symptoms: at most {MAX_OBSERVED_SYMPTOMS} may be submitted")]
    TooManySymptoms,
    #[error("Symptom name too long: exceeds {MAX_SYMPTOM_NAME_LENGTH} characters")]
    SymptomNameTooLong,
    #[error("Symptom name contains invalid characters")]
    InvalidSymptomName,
    #[error("Please fill all required fields (missing {0})")]
    MissingField(&'static str),
    #[error("Field '{0}' is too long")]
    FieldTooLong(&'static str),
    #[error("Age must be a number.")]
    InvalidAge,
    #[error("Height/Weight must be numeric.")]
    InvalidMeasurement,
    #[error("Invalid blood type selected.")]
    InvalidBloodType,
}

/// Validate a submitted symptom list before it reaches the matcher.
///
/// # Errors
///
/// Returns `ValidationError::NoSymptoms` if nothing non-blank was submitted,
/// `TooManySymptoms` above [`MAX_OBSERVED_SYMPTOMS`], or a name error for
/// oversized names and names containing control characters.
pub fn validate_observed_symptoms<S: AsRef<str>>(
    names: &[S],
) -> Result<ObservedSymptoms, ValidationError> {
    if names.len() > MAX_OBSERVED_SYMPTOMS {
        return Err(ValidationError::TooManySymptoms);
    }

    for name in names {
        let name = name.as_ref();
        if name.chars().count() > MAX_SYMPTOM_NAME_LENGTH {
            return Err(ValidationError::SymptomNameTooLong);
        }
        if name.chars().any(char::is_control) {
            return Err(ValidationError::InvalidSymptomName);
        }
    }

    let observed = ObservedSymptoms::new(names);
    if observed.is_empty() {
        return Err(ValidationError::NoSymptoms);
    }
    Ok(observed)
}

/// Raw profile fields as submitted by a form or JSON body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub age: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub height: String,
    #[serde(default)]
    pub weight: String,
    #[serde(default)]
    pub blood_type: String,
}

/// Validate a submitted profile.
///
/// Name, age, gender and blood type are required; height and weight are optional
/// but must be numeric when present.
///
/// # Errors
///
/// Returns the first `ValidationError` found, checking required fields first.
pub fn validate_profile(
    patient_id: PatientId,
    form: &ProfileForm,
) -> Result<PatientProfile, ValidationError> {
    let name = required(&form.name, "name")?;
    let age = required(&form.age, "age")?;
    let gender = required(&form.gender, "gender")?;
    let blood_type = required(&form.blood_type, "blood_type")?;

    let age: u32 = age.parse().map_err(|_| ValidationError::InvalidAge)?;
    let height = optional_measurement(&form.height)?;
    let weight = optional_measurement(&form.weight)?;
    let blood_type = BloodType::parse(blood_type).ok_or(ValidationError::InvalidBloodType)?;

    Ok(PatientProfile {
        patient_id,
        name: name.to_string(),
        age,
        gender: gender.to_string(),
        height,
        weight,
        blood_type,
    })
}

fn required<'a>(value: &'a str, field: &'static str) -> Result<&'a str, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingField(field));
    }
    if trimmed.len() > MAX_PROFILE_FIELD_LENGTH {
        return Err(ValidationError::FieldTooLong(field));
    }
    Ok(trimmed)
}

fn optional_measurement(value: &str) -> Result<Option<f64>, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => Ok(Some(v)),
        _ => Err(ValidationError::InvalidMeasurement),
    }
}

/// Compute a signature hash from a list of rows.
///
/// The signature is computed by:
/// 1. Sorting the rows
/// 2. Joining them with newlines
/// 3. Computing MD5 of the concatenated string
///
/// This provides a deterministic identifier for a catalog's contents.
#[must_use]
pub fn compute_signature(rows: &[String]) -> String {
    if rows.is_empty() {
        return String::new();
    }

    let mut sorted: Vec<&str> = rows.iter().map(String::as_str).collect();
    sorted.sort_unstable();
    let concatenated = sorted.join("\n");
    let digest = md5::compute(concatenated.as_bytes());
    format!("{digest:x}")
}
