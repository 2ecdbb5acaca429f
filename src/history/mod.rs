//! Prediction history.
//!
//! A prediction is recorded against a patient only when it names a disease.
//! Records are kept newest first when listed, mirroring a dashboard view.
//!
//! - [`PredictionRecord`]: one persisted prediction
//! - [`PredictionStore`]: the sink trait
//! - [`JsonLinesStore`]: append-only JSON-lines file, one record per line
//! - [`MemoryStore`]: in-process store for tests and ephemeral servers
//!
//! [`PredictionRecord`]: store::PredictionRecord
//! [`PredictionStore`]: store::PredictionStore
//! [`JsonLinesStore`]: store::JsonLinesStore
//! [`MemoryStore`]: store::MemoryStore

pub mod store;
