//! Core data types for symptom matching.
//!
//! This module provides the fundamental types used throughout the library:
//!
//! - [`Disease`]: A known disease with the names of its associated symptoms
//! - [`Symptom`]: A reportable symptom
//! - [`Association`]: One row of the disease/symptom relation, as supplied by a catalog provider
//! - [`PatientProfile`], [`BloodType`]: Patient demographics
//! - [`DiseaseId`], [`SymptomId`], [`PatientId`], [`Urgency`]: Identifier and result types
//!
//! ## Symptom identity
//!
//! Diseases and observed symptoms are matched on symptom **name**, not numeric id.
//! Names are compared exactly after trimming surrounding whitespace, so
//! `"Fever"` and `"fever"` are different symptoms.
//!
//! [`Disease`]: disease::Disease
//! [`Symptom`]: disease::Symptom
//! [`Association`]: disease::Association
//! [`PatientProfile`]: patient::PatientProfile
//! [`BloodType`]: patient::BloodType
//! [`DiseaseId`]: types::DiseaseId
//! [`SymptomId`]: types::SymptomId
//! [`PatientId`]: types::PatientId
//! [`Urgency`]: types::Urgency

pub mod disease;
pub mod patient;
pub mod types;
