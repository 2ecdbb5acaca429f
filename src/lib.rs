//! # symptom-check
//!
//! A library for matching reported symptoms against a catalog of known diseases.
//!
//! Each disease in the catalog is associated with a set of symptoms. Given the symptoms
//! a person reports, `symptom-check` scores every disease by the fraction of its symptoms
//! that were reported, picks the best match, lists close alternatives, and attaches a
//! recommendation and urgency level derived from the match percentage.
//!
//! ## Features
//!
//! - **Overlap scoring**: Percentage of a disease's symptoms present in the report
//! - **Alternatives**: Up to three other diseases matching at least 30%
//! - **Recommendations**: Tiered advice with a low/medium/high urgency label
//! - **Graceful degradation**: Catalog faults yield an "Error in prediction" result
//! - **Prediction history**: Matched predictions can be recorded per patient
//!
//! ## Example
//!
//! ```rust,no_run
//! use symptom_check::{DiseaseCatalog, Matcher, ObservedSymptoms};
//!
//! // Load the embedded catalog of known diseases
//! let catalog = DiseaseCatalog::load_embedded().unwrap();
//!
//! let observed = ObservedSymptoms::new(["Fever", "Cough", "Fatigue"]);
//! let result = Matcher::default().predict(&catalog, &observed);
//!
//! println!("{}: {:.2}%", result.disease_name, result.probability);
//! for alt in &result.alternative_diseases {
//!     println!("  {}: {:.2}%", alt.name, alt.probability);
//! }
//! ```
//!
//! ## Modules
//!
//! - [`catalog`]: Disease catalog storage and association providers
//! - [`core`]: Core data types for diseases, symptoms, and patients
//! - [`matching`]: Matcher, overlap scoring, and recommendation tiers
//! - [`history`]: Per-patient prediction history
//! - [`cli`]: Command-line interface implementation
//! - [`web`]: Web server and JSON API

pub mod catalog;
pub mod cli;
pub mod core;
pub mod history;
pub mod matching;
pub mod utils;
pub mod web;

// Re-export commonly used types for convenience
pub use catalog::provider::{CatalogProvider, JsonCatalogFile};
pub use catalog::store::{CatalogError, DiseaseCatalog};
pub use core::disease::{Association, Disease, ObservedSymptoms, Symptom};
pub use core::patient::{BloodType, PatientProfile};
pub use core::types::*;
pub use matching::engine::{AlternativeDisease, Matcher, MatchingConfig, PredictionResult};
