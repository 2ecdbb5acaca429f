//! Symptom-to-disease matching.
//!
//! This module provides the core matching functionality:
//!
//! - [`Matcher`]: Main entry point, ranks every catalog disease against the observed symptoms
//! - [`PredictionResult`]: Best match, alternatives and a recommendation
//! - [`Recommendation`]: Tiered advice and urgency derived from the best-match probability
//!
//! ## Matching Algorithm
//!
//! 1. **Overlap score**: for each disease with at least one symptom,
//!    `|observed ∩ disease| / |disease| * 100`
//! 2. **Best match**: strictly highest score, first disease (lowest id) on ties
//! 3. **Alternatives**: other diseases scoring at least 30%, highest first, at most 3
//! 4. **Recommendation**: above 75% is high urgency, above 50% medium, otherwise low
//!
//! A disease with no symptoms is never scored. When nothing overlaps, the result
//! names no disease and carries the low-urgency advice.
//!
//! ## Example
//!
//! ```rust,no_run
//! use symptom_check::{DiseaseCatalog, Matcher, ObservedSymptoms};
//!
//! let catalog = DiseaseCatalog::load_embedded().unwrap();
//! let observed = ObservedSymptoms::new(["Fever", "Cough"]);
//!
//! let result = Matcher::default().predict(&catalog, &observed);
//! println!("{}: {:.2}% ({})", result.disease_name, result.probability, result.urgency_level);
//! ```
//!
//! [`Matcher`]: engine::Matcher
//! [`PredictionResult`]: engine::PredictionResult
//! [`Recommendation`]: recommendation::Recommendation

pub mod engine;
pub mod recommendation;
pub mod scoring;
