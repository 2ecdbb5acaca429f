//! Web server for browser-based symptom checking.
//!
//! This module provides an interactive web interface and JSON API using Axum.
//! Users pick the symptoms they have, optionally against a registered patient,
//! and get the best matching disease with alternatives and a recommendation.
//!
//! ## Starting the Server
//!
//! ```text
//! # Start on default port 8080
//! symptom-check serve
//!
//! # Custom port and auto-open browser
//! symptom-check serve --port 3000 --open
//!
//! # Bind to all interfaces, record predictions to a custom file
//! symptom-check serve --address 0.0.0.0 --history /var/lib/symptoms.jsonl
//! ```
//!
//! ## API Endpoints
//!
//! - `GET /` - Main page with the symptom picker
//! - `GET /api/symptoms` - Reportable symptoms, sorted by name
//! - `GET /api/catalog` - List all diseases in the catalog
//! - `POST /api/predict` - Predict from `{"symptoms": [...], "patient_id": n}`
//! - `POST /api/patients` - Register a patient profile
//! - `GET /api/patients/{id}` - Profile, BMI and prediction history
//! - `GET /api/patients/{id}/predictions` - Prediction history, newest first

pub mod server;
