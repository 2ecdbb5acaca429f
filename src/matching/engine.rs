use serde::{Deserialize, Serialize};

use crate::catalog::provider::CatalogProvider;
use crate::catalog::store::{CatalogError, DiseaseCatalog};
use crate::core::disease::{Disease, ObservedSymptoms};
use crate::core::types::{DiseaseId, Urgency};
use crate::matching::recommendation::{Recommendation, FAILURE_MESSAGE};
use crate::matching::scoring::{round2, OverlapScore};

/// Display name used when no disease overlaps the observed symptoms
pub const UNKNOWN_DISEASE: &str = "Unknown";

/// Display name used when the catalog could not be read
pub const FAILED_DISEASE: &str = "Error in prediction";

/// Another disease worth mentioning next to the best match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlternativeDisease {
    pub name: String,
    pub probability: f64,
}

/// Outcome of matching observed symptoms against the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Best matching disease, or `None` when nothing matched
    pub disease_id: Option<DiseaseId>,

    pub disease_name: String,

    /// Overlap percentage of the best match (0-100, two decimals)
    pub probability: f64,

    /// Observed symptoms the best match lists, in name order
    pub matched_symptoms: Vec<String>,

    /// Up to `max_alternatives` other diseases, highest probability first
    pub alternative_diseases: Vec<AlternativeDisease>,

    pub recommendation: String,

    pub urgency_level: Urgency,
}

impl PredictionResult {
    /// Result when no disease shares a symptom with the observed set
    #[must_use]
    pub fn unknown() -> Self {
        let tier = Recommendation::lowest();
        Self {
            disease_id: None,
            disease_name: UNKNOWN_DISEASE.to_string(),
            probability: 0.0,
            matched_symptoms: Vec::new(),
            alternative_diseases: Vec::new(),
            recommendation: tier.message.to_string(),
            urgency_level: tier.urgency,
        }
    }

    /// Degraded result returned instead of an error
    #[must_use]
    pub fn failed() -> Self {
        Self {
            disease_id: None,
            disease_name: FAILED_DISEASE.to_string(),
            probability: 0.0,
            matched_symptoms: Vec::new(),
            alternative_diseases: Vec::new(),
            recommendation: FAILURE_MESSAGE.to_string(),
            urgency_level: Urgency::Low,
        }
    }

    /// True when a disease was identified and the result may be recorded
    #[must_use]
    pub fn is_match(&self) -> bool {
        self.disease_id.is_some()
    }
}

/// Default minimum probability for listing an alternative
pub const DEFAULT_ALTERNATIVE_THRESHOLD: f64 = 30.0;

/// Default number of alternatives reported
pub const DEFAULT_MAX_ALTERNATIVES: usize = 3;

/// Configuration for the matcher
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchingConfig {
    /// Minimum probability (0-100) for an alternative to be listed
    pub alternative_threshold: f64,
    /// Maximum number of alternatives
    pub max_alternatives: usize,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            alternative_threshold: DEFAULT_ALTERNATIVE_THRESHOLD,
            max_alternatives: DEFAULT_MAX_ALTERNATIVES,
        }
    }
}

/// Scores observed symptoms against every disease in a catalog
#[derive(Debug, Clone, Default)]
pub struct Matcher {
    config: MatchingConfig,
}

impl Matcher {
    /// Create a matcher with custom configuration
    #[must_use]
    pub fn new(config: MatchingConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &MatchingConfig {
        &self.config
    }

    /// Build the catalog from the provider's associations and rank it.
    ///
    /// Never fails: any fault while reading or grouping the associations is
    /// logged and turned into [`PredictionResult::failed`].
    pub fn predict<P>(&self, provider: &P, observed: &ObservedSymptoms) -> PredictionResult
    where
        P: CatalogProvider + ?Sized,
    {
        match self.try_predict(provider, observed) {
            Ok(result) => result,
            Err(e) => {
                tracing::error!("Prediction error: {e}");
                PredictionResult::failed()
            }
        }
    }

    fn try_predict<P>(
        &self,
        provider: &P,
        observed: &ObservedSymptoms,
    ) -> Result<PredictionResult, CatalogError>
    where
        P: CatalogProvider + ?Sized,
    {
        let rows = provider.associations()?;
        let catalog = DiseaseCatalog::from_associations(&rows)?;
        Ok(self.rank(&catalog, observed))
    }

    /// Rank an already-built catalog against the observed symptoms
    #[must_use]
    pub fn rank(&self, catalog: &DiseaseCatalog, observed: &ObservedSymptoms) -> PredictionResult {
        let Some((best, best_score)) = find_best(catalog, observed) else {
            tracing::debug!(
                "No disease shares a symptom with {} observed symptom(s)",
                observed.len()
            );
            return PredictionResult::unknown();
        };

        let probability = best_score.rounded();
        let tier = Recommendation::for_probability(probability);
        let alternative_diseases = self.find_alternatives(catalog, observed, best.id);

        tracing::debug!(
            "Best match {} ({}) at {:.2}% with {} alternative(s)",
            best.name,
            best.id,
            probability,
            alternative_diseases.len()
        );

        PredictionResult {
            disease_id: Some(best.id),
            disease_name: best.name.clone(),
            probability,
            matched_symptoms: best_score.matched,
            alternative_diseases,
            recommendation: tier.message.to_string(),
            urgency_level: tier.urgency,
        }
    }

    fn find_alternatives(
        &self,
        catalog: &DiseaseCatalog,
        observed: &ObservedSymptoms,
        best_id: DiseaseId,
    ) -> Vec<AlternativeDisease> {
        let mut candidates: Vec<(&Disease, f64)> = catalog
            .diseases()
            .filter(|d| d.id != best_id && d.is_scorable())
            .filter_map(|d| {
                OverlapScore::calculate(observed.as_set(), &d.symptoms).map(|s| (d, s.percent))
            })
            .filter(|(_, percent)| *percent >= self.config.alternative_threshold)
            .collect();

        // Stable sort keeps ascending id order among equal scores
        candidates.sort_by(|a, b| b.1.total_cmp(&a.1));

        candidates
            .into_iter()
            .take(self.config.max_alternatives)
            .map(|(d, percent)| AlternativeDisease {
                name: d.name.clone(),
                probability: round2(percent),
            })
            .collect()
    }
}

/// Highest-scoring disease; the first one seen wins ties and a score of 0 never wins
fn find_best<'a>(
    catalog: &'a DiseaseCatalog,
    observed: &ObservedSymptoms,
) -> Option<(&'a Disease, OverlapScore)> {
    let mut best: Option<(&Disease, OverlapScore)> = None;

    for disease in catalog.diseases().filter(|d| d.is_scorable()) {
        let Some(score) = OverlapScore::calculate(observed.as_set(), &disease.symptoms) else {
            continue;
        };
        let best_percent = best.as_ref().map_or(0.0, |(_, s)| s.percent);
        if score.percent > best_percent {
            best = Some((disease, score));
        }
    }

    best
}
