//! Disease catalog storage and providers.
//!
//! The catalog maps each known disease to the names of its associated symptoms.
//! An embedded catalog is compiled into the binary, but custom catalogs can also
//! be loaded from JSON files.
//!
//! ## Catalog format
//!
//! ```json
//! {
//!   "version": "1.0.0",
//!   "created_at": "2026-10-01T00:00:00+00:00",
//!   "symptoms": [{"id": 1, "name": "Fever"}],
//!   "diseases": [{"id": 1, "name": "Influenza", "symptoms": ["Fever", "Cough"]}]
//! }
//! ```
//!
//! ## Example
//!
//! ```rust,no_run
//! use symptom_check::DiseaseCatalog;
//! use symptom_check::core::types::DiseaseId;
//!
//! let catalog = DiseaseCatalog::load_embedded().unwrap();
//!
//! for disease in catalog.diseases() {
//!     println!("{}: {}", disease.id, disease.name);
//! }
//!
//! let flu = catalog.get(DiseaseId::new(2));
//! ```
//!
//! ## Providers
//!
//! The matcher does not read a catalog directly; it asks a [`CatalogProvider`]
//! for the flat association rows and groups them itself on every call. The
//! catalog, a JSON file on disk and plain vectors of rows all implement it.
//!
//! [`CatalogProvider`]: provider::CatalogProvider

pub mod provider;
pub mod store;
