use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::{BufRead, BufReader, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::types::{DiseaseId, PatientId};
use crate::matching::engine::PredictionResult;

/// Default location of the history file
pub const DEFAULT_HISTORY_FILE: &str = "symptom_history.jsonl";

#[derive(Error, Debug)]
pub enum HistoryError {
    #[error("Failed to access history: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode history record: {0}")]
    Encode(#[from] serde_json::Error),
}

/// A prediction recorded against a patient
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRecord {
    pub patient_id: PatientId,
    pub disease_id: DiseaseId,
    pub disease_name: String,
    pub probability: f64,
    pub predicted_at: DateTime<Utc>,
}

impl PredictionRecord {
    /// Build a record from a result; `None` if the result names no disease
    #[must_use]
    pub fn from_result(
        patient_id: PatientId,
        result: &PredictionResult,
        predicted_at: DateTime<Utc>,
    ) -> Option<Self> {
        result.disease_id.map(|disease_id| Self {
            patient_id,
            disease_id,
            disease_name: result.disease_name.clone(),
            probability: result.probability,
            predicted_at,
        })
    }
}

/// Sink for persisted predictions
pub trait PredictionStore {
    /// Append a record
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be written.
    fn append(&mut self, record: PredictionRecord) -> Result<(), HistoryError>;

    /// All records, in insertion order
    ///
    /// # Errors
    ///
    /// Returns an error if the records cannot be read.
    fn records(&self) -> Result<Vec<PredictionRecord>, HistoryError>;

    /// A patient's records, newest first
    ///
    /// # Errors
    ///
    /// Returns an error if the records cannot be read.
    fn for_patient(&self, patient_id: PatientId) -> Result<Vec<PredictionRecord>, HistoryError> {
        let mut records: Vec<PredictionRecord> = self
            .records()?
            .into_iter()
            .filter(|r| r.patient_id == patient_id)
            .collect();
        // Reverse first so equal timestamps still list the later append first
        records.reverse();
        records.sort_by(|a, b| b.predicted_at.cmp(&a.predicted_at));
        Ok(records)
    }
}

/// Persist `result` for `patient_id` if it names a disease.
///
/// Returns whether a record was written.
///
/// # Errors
///
/// Returns an error if the store rejects the record.
pub fn record_prediction<S>(
    store: &mut S,
    patient_id: PatientId,
    result: &PredictionResult,
) -> Result<bool, HistoryError>
where
    S: PredictionStore + ?Sized,
{
    if !result.is_match() {
        tracing::debug!("No disease matched; nothing recorded for patient {patient_id}");
        return Ok(false);
    }

    let Some(record) = PredictionRecord::from_result(patient_id, result, Utc::now()) else {
        return Ok(false);
    };
    tracing::debug!(
        "Recording prediction {} ({:.2}%) for patient {}",
        record.disease_name,
        record.probability,
        patient_id
    );
    store.append(record)?;
    Ok(true)
}

/// In-process store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: Vec<PredictionRecord>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl PredictionStore for MemoryStore {
    fn append(&mut self, record: PredictionRecord) -> Result<(), HistoryError> {
        self.records.push(record);
        Ok(())
    }

    fn records(&self) -> Result<Vec<PredictionRecord>, HistoryError> {
        Ok(self.records.clone())
    }
}

/// Append-only JSON-lines file
#[derive(Debug, Clone)]
pub struct JsonLinesStore {
    path: PathBuf,
}

impl JsonLinesStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// True if the file has content that does not end with a newline, as left by an interrupted append
fn has_torn_tail(file: &mut std::fs::File) -> std::io::Result<bool> {
    if file.metadata()?.len() == 0 {
        return Ok(false);
    }
    file.seek(SeekFrom::End(-1))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last)?;
    Ok(last[0] != b'\n')
}

impl PredictionStore for JsonLinesStore {
    fn append(&mut self, record: PredictionRecord) -> Result<(), HistoryError> {
        let mut line = serde_json::to_string(&record)?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&self.path)?;
        if has_torn_tail(&mut file)? {
            tracing::warn!(
                "History file {} ends mid-record; starting a new line",
                self.path.display()
            );
            line.insert(0, '\n');
        }
        file.write_all(line.as_bytes())?;
        Ok(())
    }

    /// Lines that fail to parse are logged and skipped
    fn records(&self) -> Result<Vec<PredictionRecord>, HistoryError> {
        let file = match std::fs::File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut records = Vec::new();
        for (i, line) in BufReader::new(file).lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str(&line) {
                Ok(record) => records.push(record),
                Err(e) => tracing::warn!(
                    "Skipping corrupt history record on line {} of {}: {e}",
                    i + 1,
                    self.path.display()
                ),
            }
        }
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record(patient: u32, disease: u32, hour: u32) -> PredictionRecord {
        PredictionRecord {
            patient_id: PatientId(patient),
            disease_id: DiseaseId::new(disease),
            disease_name: format!("Disease {disease}"),
            probability: 50.0,
            predicted_at: Utc.with_ymd_and_hms(2026, 3, 1, hour, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_from_result_requires_disease() {
        let now = Utc::now();
        assert!(PredictionRecord::from_result(PatientId(1), &PredictionResult::unknown(), now).is_none());
        assert!(PredictionRecord::from_result(PatientId(1), &PredictionResult::failed(), now).is_none());
    }

    #[test]
    fn test_record_prediction_skips_unmatched() {
        let mut store = MemoryStore::new();
        let written = record_prediction(&mut store, PatientId(1), &PredictionResult::unknown()).unwrap();
        assert!(!written);
        assert!(store.records().unwrap().is_empty());
    }

    #[test]
    fn test_record_prediction_writes_match() {
        let mut result = PredictionResult::unknown();
        result.disease_id = Some(DiseaseId::new(4));
        result.disease_name = "Migraine".to_string();
        result.probability = 75.0;

        let mut store = MemoryStore::new();
        assert!(record_prediction(&mut store, PatientId(9), &result).unwrap());

        let records = store.for_patient(PatientId(9)).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].disease_name, "Migraine");
        assert_eq!(records[0].probability, 75.0);
    }

    #[test]
    fn test_for_patient_newest_first() {
        let mut store = MemoryStore::new();
        store.append(record(1, 1, 8)).unwrap();
        store.append(record(2, 2, 9)).unwrap();
        store.append(record(1, 3, 10)).unwrap();
        store.append(record(1, 4, 9)).unwrap();

        let ids: Vec<u32> = store
            .for_patient(PatientId(1))
            .unwrap()
            .iter()
            .map(|r| r.disease_id.0)
            .collect();
        assert_eq!(ids, vec![3, 4, 1]);
    }

    #[test]
    fn test_equal_timestamps_list_latest_append_first() {
        let mut store = MemoryStore::new();
        store.append(record(1, 1, 8)).unwrap();
        store.append(record(1, 2, 8)).unwrap();

        let ids: Vec<u32> = store
            .for_patient(PatientId(1))
            .unwrap()
            .iter()
            .map(|r| r.disease_id.0)
            .collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn test_json_lines_store_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.jsonl");

        let mut store = JsonLinesStore::new(&path);
        assert!(store.records().unwrap().is_empty());

        store.append(record(1, 1, 8)).unwrap();
        store.append(record(1, 2, 9)).unwrap();

        let reopened = JsonLinesStore::new(&path);
        let records = reopened.for_patient(PatientId(1)).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].disease_id, DiseaseId::new(2));

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2);
    }

    #[test]
    fn test_json_lines_store_skips_corrupt_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.jsonl");
        let good = serde_json::to_string(&record(1, 3, 8)).unwrap();
        std::fs::write(&path, format!("\n{{not json}}\n{good}\n")).unwrap();

        let records = JsonLinesStore::new(&path).records().unwrap();
        assert_eq!(records, vec![record(1, 3, 8)]);
    }

    #[test]
    fn test_json_lines_store_recovers_from_truncated_tail() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.jsonl");

        let mut store = JsonLinesStore::new(&path);
        store.append(record(1, 1, 8)).unwrap();

        // Interrupted append left half a record without a newline
        let mut file = OpenOptions::new().append(true).open(&path).unwrap();
        file.write_all(br#"{"patient_id":2,"disease_id":"#).unwrap();
        drop(file);

        let records = store.for_patient(PatientId(1)).unwrap();
        assert_eq!(records.len(), 1);

        store.append(record(1, 2, 9)).unwrap();

        let ids: Vec<u32> = store
            .for_patient(PatientId(1))
            .unwrap()
            .iter()
            .map(|r| r.disease_id.0)
            .collect();
        assert_eq!(ids, vec![2, 1]);
        assert!(store.for_patient(PatientId(2)).unwrap().is_empty());

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 3);
        assert!(content.ends_with('\n'));
    }
}
