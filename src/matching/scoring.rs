use std::collections::BTreeSet;

/// Safely convert usize to f64 for percentage calculations
#[inline]
fn count_to_f64(count: usize) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    {
        count as f64
    }
}

/// Overlap between an observed symptom set and one disease's symptoms
#[derive(Debug, Clone, PartialEq)]
pub struct OverlapScore {
    /// Observed symptoms the disease lists, in name order
    pub matched: Vec<String>,

    /// |matched| / |disease symptoms| * 100, unrounded
    pub percent: f64,
}

impl OverlapScore {
    /// Score a disease against the observed set.
    ///
    /// Returns `None` when the disease has no symptoms, since the ratio is undefined.
    #[must_use]
    pub fn calculate(observed: &BTreeSet<String>, disease_symptoms: &BTreeSet<String>) -> Option<Self> {
        if disease_symptoms.is_empty() {
            return None;
        }

        let matched: Vec<String> = observed.intersection(disease_symptoms).cloned().collect();
        let percent = count_to_f64(matched.len()) / count_to_f64(disease_symptoms.len()) * 100.0;

        Some(Self { matched, percent })
    }

    /// Percentage rounded to two decimals
    #[must_use]
    pub fn rounded(&self) -> f64 {
        round2(self.percent)
    }
}

/// Round to two decimal places, half away from zero
#[must_use]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
