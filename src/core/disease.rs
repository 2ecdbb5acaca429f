use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::core::types::{DiseaseId, SymptomId};

/// A symptom a patient can report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Symptom {
    /// Unique identifier
    pub id: SymptomId,

    /// Display name, also the key used for matching
    pub name: String,
}

impl Symptom {
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id: SymptomId(id),
            name: name.into(),
        }
    }
}

/// A known disease and the symptoms associated with it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Disease {
    /// Unique identifier
    pub id: DiseaseId,

    /// Human-readable display name
    pub name: String,

    /// Names of the associated symptoms
    #[serde(default)]
    pub symptoms: BTreeSet<String>,
}

impl Disease {
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id: DiseaseId::new(id),
            name: name.into(),
            symptoms: BTreeSet::new(),
        }
    }

    #[must_use]
    pub fn with_symptoms<I, S>(mut self, symptoms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.symptoms
            .extend(symptoms.into_iter().map(|s| normalize_symptom_name(&s.into())));
        self
    }

    /// A disease without symptoms can never be scored
    #[must_use]
    pub fn is_scorable(&self) -> bool {
        !self.symptoms.is_empty()
    }
}

/// One row of the disease/symptom association relation
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Association {
    pub disease_id: DiseaseId,
    pub disease_name: String,
    pub symptom_name: String,
}

impl Association {
    pub fn new(
        disease_id: u32,
        disease_name: impl Into<String>,
        symptom_name: impl Into<String>,
    ) -> Self {
        Self {
            disease_id: DiseaseId::new(disease_id),
            disease_name: disease_name.into(),
            symptom_name: symptom_name.into(),
        }
    }
}

/// Symptom names a user reported for one query
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObservedSymptoms(BTreeSet<String>);

impl ObservedSymptoms {
    /// Collect reported names, trimming them and dropping blanks and duplicates
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            names
                .into_iter()
                .map(|s| normalize_symptom_name(s.as_ref()))
                .filter(|s| !s.is_empty())
                .collect(),
        )
    }

    #[must_use]
    pub fn as_set(&self) -> &BTreeSet<String> {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Symptom names are compared exactly, apart from surrounding whitespace
#[must_use]
pub fn normalize_symptom_name(name: &str) -> String {
    name.trim().to_string()
}
