use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::io::Write;
use std::path::Path;
use thiserror::Error;

use crate::core::disease::{normalize_symptom_name, Association, Disease, Symptom};
use crate::core::types::DiseaseId;
use crate::utils::validation::compute_signature;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to read catalog: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse catalog: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Duplicate disease id {0} in catalog")]
    DuplicateDisease(DiseaseId),

    #[error("Disease {id} is named both '{existing}' and '{found}'")]
    ConflictingName {
        id: DiseaseId,
        existing: String,
        found: String,
    },

    #[error("Failed to write catalog: {0}")]
    WriteError(String),
}

/// Catalog version for compatibility checking
pub const CATALOG_VERSION: &str = "1.0.0";

/// Serializable catalog format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogData {
    pub version: String,
    pub created_at: String,
    #[serde(default)]
    pub symptoms: Vec<Symptom>,
    pub diseases: Vec<Disease>,
}

/// Immutable disease catalog, iterated in ascending disease id order
#[derive(Debug, Clone, Default)]
pub struct DiseaseCatalog {
    /// All known diseases keyed by id
    diseases: BTreeMap<DiseaseId, Disease>,

    /// Reference list of reportable symptoms
    symptoms: Vec<Symptom>,

    /// Index: disease name -> id
    name_to_id: HashMap<String, DiseaseId>,
}

impl DiseaseCatalog {
    /// Create an empty catalog
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the embedded default catalog
    ///
    /// # Errors
    ///
    /// Returns an error if the embedded JSON cannot be parsed.
    pub fn load_embedded() -> Result<Self, CatalogError> {
        // Validated at compile time by build.rs
        const EMBEDDED_CATALOG: &str = include_str!("../../catalogs/diseases.json");
        Self::from_json(EMBEDDED_CATALOG)
    }

    /// Load catalog from a JSON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Load from `path` when given, otherwise the embedded catalog
    ///
    /// # Errors
    ///
    /// Returns an error if the selected catalog cannot be loaded.
    pub fn load(path: Option<&Path>) -> Result<Self, CatalogError> {
        match path {
            Some(path) => Self::load_from_file(path),
            None => Self::load_embedded(),
        }
    }

    /// Parse catalog from JSON string
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or repeats a disease id.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let data: CatalogData = serde_json::from_str(json)?;

        // Version check (warn but don't fail)
        if data.version != CATALOG_VERSION {
            tracing::warn!(
                "Catalog version mismatch (expected {}, found {})",
                CATALOG_VERSION,
                data.version
            );
        }

        let mut catalog = Self::new();
        catalog.symptoms = data.symptoms;
        for disease in data.diseases {
            catalog.add_disease(disease)?;
        }
        catalog.warn_unknown_symptoms();

        Ok(catalog)
    }

    /// Group association rows into per-disease symptom sets
    ///
    /// # Errors
    ///
    /// Returns an error if one disease id appears under two different names.
    pub fn from_associations<'a, I>(rows: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = &'a Association>,
    {
        let mut grouped: BTreeMap<DiseaseId, Disease> = BTreeMap::new();
        let mut symptom_names: BTreeSet<String> = BTreeSet::new();

        for row in rows {
            let symptom = normalize_symptom_name(&row.symptom_name);
            let disease = grouped.entry(row.disease_id).or_insert_with(|| Disease {
                id: row.disease_id,
                name: row.disease_name.clone(),
                symptoms: BTreeSet::new(),
            });

            if disease.name != row.disease_name {
                return Err(CatalogError::ConflictingName {
                    id: row.disease_id,
                    existing: disease.name.clone(),
                    found: row.disease_name.clone(),
                });
            }

            if !symptom.is_empty() {
                disease.symptoms.insert(symptom.clone());
                symptom_names.insert(symptom);
            }
        }

        let mut catalog = Self::new();
        catalog.symptoms = symptom_names
            .into_iter()
            .zip(1u32..)
            .map(|(name, id)| Symptom::new(id, name))
            .collect();
        for disease in grouped.into_values() {
            catalog.add_disease(disease)?;
        }

        Ok(catalog)
    }

    /// Add a disease to the catalog
    ///
    /// # Errors
    ///
    /// Returns an error if a disease with the same id is already present.
    pub fn add_disease(&mut self, mut disease: Disease) -> Result<(), CatalogError> {
        if self.diseases.contains_key(&disease.id) {
            return Err(CatalogError::DuplicateDisease(disease.id));
        }

        disease.symptoms = disease
            .symptoms
            .iter()
            .map(|s| normalize_symptom_name(s))
            .filter(|s| !s.is_empty())
            .collect();

        self.name_to_id.insert(disease.name.to_lowercase(), disease.id);
        self.diseases.insert(disease.id, disease);
        Ok(())
    }

    /// Get a disease by id
    #[must_use]
    pub fn get(&self, id: DiseaseId) -> Option<&Disease> {
        self.diseases.get(&id)
    }

    /// Find a disease by display name (case-insensitive)
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<&Disease> {
        self.name_to_id
            .get(&name.trim().to_lowercase())
            .and_then(|id| self.diseases.get(id))
    }

    /// Diseases in ascending id order
    pub fn diseases(&self) -> impl Iterator<Item = &Disease> {
        self.diseases.values()
    }

    /// Reportable symptoms sorted by name
    #[must_use]
    pub fn symptoms_by_name(&self) -> Vec<&Symptom> {
        let mut symptoms: Vec<&Symptom> = self.symptoms.iter().collect();
        symptoms.sort_by(|a, b| a.name.cmp(&b.name));
        symptoms
    }

    /// Check whether any disease lists the given symptom
    #[must_use]
    pub fn knows_symptom(&self, name: &str) -> bool {
        let name = normalize_symptom_name(name);
        self.diseases.values().any(|d| d.symptoms.contains(&name))
    }

    /// Flatten the catalog back into association rows
    #[must_use]
    pub fn associations(&self) -> Vec<Association> {
        self.diseases
            .values()
            .flat_map(|d| {
                d.symptoms.iter().map(move |s| Association {
                    disease_id: d.id,
                    disease_name: d.name.clone(),
                    symptom_name: s.clone(),
                })
            })
            .collect()
    }

    /// Deterministic identifier for the catalog's disease/symptom content
    #[must_use]
    pub fn fingerprint(&self) -> String {
        let rows: Vec<String> = self
            .associations()
            .iter()
            .map(|a| format!("{}\t{}\t{}", a.disease_id, a.disease_name, a.symptom_name))
            .collect();
        compute_signature(&rows)
    }

    /// Export catalog to JSON
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, CatalogError> {
        let data = CatalogData {
            version: CATALOG_VERSION.to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
            symptoms: self.symptoms.clone(),
            diseases: self.diseases.values().cloned().collect(),
        };
        Ok(serde_json::to_string_pretty(&data)?)
    }

    /// Write the catalog as JSON, replacing `path` atomically
    ///
    /// # Errors
    ///
    /// Returns an error if the temporary file cannot be written or persisted.
    pub fn write_to_file(&self, path: &Path) -> Result<(), CatalogError> {
        let json = self.to_json()?;
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let write_err = |e: std::io::Error| CatalogError::WriteError(e.to_string());
        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(write_err)?;
        tmp.write_all(json.as_bytes()).map_err(write_err)?;
        tmp.write_all(b"\n").map_err(write_err)?;
        tmp.persist(path)
            .map_err(|e| CatalogError::WriteError(e.error.to_string()))?;
        Ok(())
    }

    /// Number of diseases in catalog
    #[must_use]
    pub fn len(&self) -> usize {
        self.diseases.len()
    }

    /// Check if catalog is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.diseases.is_empty()
    }

    fn warn_unknown_symptoms(&self) {
        if self.symptoms.is_empty() {
            return;
        }
        let known: BTreeSet<&str> = self.symptoms.iter().map(|s| s.name.as_str()).collect();
        for disease in self.diseases.values() {
            for symptom in &disease.symptoms {
                if !known.contains(symptom.as_str()) {
                    tracing::warn!(
                        "Disease '{}' references unlisted symptom '{}'",
                        disease.name,
                        symptom
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_embedded_catalog() {
        let catalog = DiseaseCatalog::load_embedded().unwrap();
        assert!(!catalog.is_empty());
        assert!(!catalog.symptoms_by_name().is_empty());
    }

    #[test]
    fn test_catalog_get_by_id() {
        let catalog = DiseaseCatalog::load_embedded().unwrap();

        let flu = catalog.get(DiseaseId::new(2));
        assert!(flu.is_some());
        let flu = flu.unwrap();
        assert_eq!(flu.name, "Influenza");
        assert!(flu.symptoms.contains("Fever"));
    }

    #[test]
    fn test_catalog_get_nonexistent() {
        let catalog = DiseaseCatalog::load_embedded().unwrap();
        assert!(catalog.get(DiseaseId::new(9999)).is_none());
    }

    #[test]
    fn test_find_by_name_is_case_insensitive() {
        let catalog = DiseaseCatalog::load_embedded().unwrap();
        let found = catalog.find_by_name("common cold").unwrap();
        assert_eq!(found.id, DiseaseId::new(1));
    }

    #[test]
    fn test_diseases_iterate_in_id_order() {
        let mut catalog = DiseaseCatalog::new();
        catalog.add_disease(Disease::new(9, "Later")).unwrap();
        catalog.add_disease(Disease::new(3, "Earlier")).unwrap();
        catalog.add_disease(Disease::new(5, "Middle")).unwrap();

        let ids: Vec<u32> = catalog.diseases().map(|d| d.id.0).collect();
        assert_eq!(ids, vec![3, 5, 9]);
    }

    #[test]
    fn test_duplicate_disease_rejected() {
        let mut catalog = DiseaseCatalog::new();
        catalog.add_disease(Disease::new(1, "A")).unwrap();
        let err = catalog.add_disease(Disease::new(1, "B")).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateDisease(id) if id == DiseaseId::new(1)));
    }

    #[test]
    fn test_from_associations_groups_rows() {
        let rows = vec![
            Association::new(2, "Measles", "Rash"),
            Association::new(1, "Flu", "Fever"),
            Association::new(2, "Measles", "Fever"),
            Association::new(1, "Flu", "Cough"),
            Association::new(1, "Flu", "Cough"),
        ];
        let catalog = DiseaseCatalog::from_associations(&rows).unwrap();

        assert_eq!(catalog.len(), 2);
        let flu = catalog.get(DiseaseId::new(1)).unwrap();
        assert_eq!(flu.symptoms.len(), 2);
        let names: Vec<&str> = catalog
            .symptoms_by_name()
            .iter()
            .map(|s| s.name.as_str())
            .collect();
        assert_eq!(names, vec!["Cough", "Fever", "Rash"]);
    }

    #[test]
    fn test_from_associations_conflicting_name() {
        let rows = vec![
            Association::new(1, "Flu", "Fever"),
            Association::new(1, "Influenza", "Cough"),
        ];
        let err = DiseaseCatalog::from_associations(&rows).unwrap_err();
        assert!(matches!(err, CatalogError::ConflictingName { .. }));
    }

    #[test]
    fn test_associations_round_trip_preserves_fingerprint() {
        let catalog = DiseaseCatalog::load_embedded().unwrap();
        let rebuilt = DiseaseCatalog::from_associations(&catalog.associations()).unwrap();
        assert_eq!(catalog.fingerprint(), rebuilt.fingerprint());
        assert_eq!(catalog.fingerprint().len(), 32);
    }

    #[test]
    fn test_catalog_to_json() {
        let catalog = DiseaseCatalog::load_embedded().unwrap();
        let json = catalog.to_json().unwrap();

        assert!(json.contains("\"version\""));
        assert!(json.contains("\"diseases\""));
        assert!(json.contains("Influenza"));
    }

    #[test]
    fn test_write_to_file_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");

        let catalog = DiseaseCatalog::load_embedded().unwrap();
        catalog.write_to_file(&path).unwrap();

        let reloaded = DiseaseCatalog::load_from_file(&path).unwrap();
        assert_eq!(reloaded.len(), catalog.len());
        assert_eq!(reloaded.fingerprint(), catalog.fingerprint());
    }

    #[test]
    fn test_load_missing_file() {
        let err = DiseaseCatalog::load_from_file(Path::new("/nonexistent/catalog.json"));
        assert!(matches!(err, Err(CatalogError::ReadError(_))));
    }
}
