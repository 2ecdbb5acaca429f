use crate::core::types::Urgency;

/// Advice shown alongside a prediction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Recommendation {
    /// Probabilities strictly above this bound fall in the tier
    pub above: f64,
    pub message: &'static str,
    pub urgency: Urgency,
}

/// Tiers ordered from the highest bound down; the last one catches everything else.
const TIERS: [Recommendation; 3] = [
    Recommendation {
        above: 75.0,
        message: "High probability of this condition. Please consult a healthcare provider soon.",
        urgency: Urgency::High,
    },
    Recommendation {
        above: 50.0,
        message: "Moderate likelihood. Monitor symptoms and consult a doctor if they worsen.",
        urgency: Urgency::Medium,
    },
    Recommendation {
        above: f64::NEG_INFINITY,
        message: "Low probability match. Monitor your symptoms.",
        urgency: Urgency::Low,
    },
];

/// Message used when the prediction could not be computed
pub const FAILURE_MESSAGE: &str = "Unable to make prediction. Please try again.";

impl Recommendation {
    /// Look up the tier for a best-match probability (0-100)
    #[must_use]
    pub fn for_probability(probability: f64) -> &'static Recommendation {
        TIERS
            .iter()
            .find(|tier| probability > tier.above)
            .unwrap_or(&TIERS[TIERS.len() - 1])
    }

    /// The tier used for an empty or failed prediction
    #[must_use]
    pub fn lowest() -> &'static Recommendation {
        &TIERS[TIERS.len() - 1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urgency_boundaries() {
        assert_eq!(Recommendation::for_probability(0.0).urgency, Urgency::Low);
        assert_eq!(Recommendation::for_probability(50.0).urgency, Urgency::Low);
        assert_eq!(Recommendation::for_probability(50.01).urgency, Urgency::Medium);
        assert_eq!(Recommendation::for_probability(75.0).urgency, Urgency::Medium);
        assert_eq!(Recommendation::for_probability(75.01).urgency, Urgency::High);
        assert_eq!(Recommendation::for_probability(100.0).urgency, Urgency::High);
    }

    #[test]
    fn test_messages() {
        assert!(Recommendation::for_probability(90.0)
            .message
            .starts_with("High probability"));
        assert!(Recommendation::for_probability(60.0)
            .message
            .starts_with("Moderate likelihood"));
        assert!(Recommendation::for_probability(10.0)
            .message
            .starts_with("Low probability match"));
    }

    #[test]
    fn test_nan_falls_to_lowest_tier() {
        assert_eq!(Recommendation::for_probability(f64::NAN).urgency, Urgency::Low);
        assert_eq!(Recommendation::lowest().urgency, Urgency::Low);
    }

    #[test]
    fn test_tiers_descend() {
        assert!(TIERS.windows(2).all(|w| w[0].above > w[1].above));
    }
}
