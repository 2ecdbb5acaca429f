use std::path::PathBuf;

use clap::Args;

use crate::catalog::provider::JsonCatalogFile;
use crate::catalog::store::DiseaseCatalog;
use crate::cli::OutputFormat;
use crate::core::disease::ObservedSymptoms;
use crate::core::types::{PatientId, Urgency};
use crate::history::store::{record_prediction, JsonLinesStore, DEFAULT_HISTORY_FILE};
use crate::matching::engine::{
    Matcher, MatchingConfig, PredictionResult, DEFAULT_ALTERNATIVE_THRESHOLD,
    DEFAULT_MAX_ALTERNATIVES,
};
use crate::utils::validation::validate_observed_symptoms;

#[derive(Args)]
pub struct PredictArgs {
    /// Symptom names, exactly as listed by `catalog symptoms` (quote names with spaces)
    pub symptoms: Vec<String>,

    /// Path to custom catalog file
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Record the prediction against this patient id
    #[arg(long)]
    pub patient: Option<u32>,

    /// File predictions are recorded to (only used with --patient)
    #[arg(long, default_value = DEFAULT_HISTORY_FILE)]
    pub history: PathBuf,

    /// Minimum match percentage for an alternative disease (0-100)
    #[arg(long, default_value_t = DEFAULT_ALTERNATIVE_THRESHOLD)]
    pub alternative_threshold: f64,

    /// Number of alternative diseases to show
    #[arg(long, default_value_t = DEFAULT_MAX_ALTERNATIVES)]
    pub max_alternatives: usize,
}

/// Execute predict subcommand
///
/// # Errors
///
/// Returns an error if no usable symptom was given or the prediction cannot be recorded.
/// Catalog faults do not error; they produce the degraded result.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: PredictArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let observed = validate_observed_symptoms(&args.symptoms)?;

    let config = MatchingConfig {
        alternative_threshold: args.alternative_threshold.clamp(0.0, 100.0),
        max_alternatives: args.max_alternatives,
    };
    let matcher = Matcher::new(config);

    let result = match &args.catalog {
        Some(path) => matcher.predict(&JsonCatalogFile::new(path), &observed),
        None => match DiseaseCatalog::load_embedded() {
            Ok(catalog) => matcher.predict(&catalog, &observed),
            Err(e) => {
                tracing::error!("Failed to load embedded catalog: {e}");
                PredictionResult::failed()
            }
        },
    };

    if verbose {
        let config = matcher.config();
        eprintln!(
            "Matched {} symptom(s) against the catalog (alternatives: at least {:.2}%, up to {})",
            observed.len(),
            config.alternative_threshold,
            config.max_alternatives
        );
        warn_unknown_symptoms(&args, &observed);
    }

    match format {
        OutputFormat::Text => print_text_result(&result),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
        OutputFormat::Tsv => print_tsv_result(&result),
    }

    if let Some(patient) = args.patient {
        let mut store = JsonLinesStore::new(&args.history);
        let recorded = record_prediction(&mut store, PatientId(patient), &result)?;
        if verbose {
            if recorded {
                eprintln!("Recorded prediction in {}", store.path().display());
            } else {
                eprintln!("No disease matched; nothing recorded");
            }
        }
    }

    Ok(())
}

fn warn_unknown_symptoms(args: &PredictArgs, observed: &ObservedSymptoms) {
    let Ok(catalog) = DiseaseCatalog::load(args.catalog.as_deref()) else {
        return;
    };
    for name in observed.as_set() {
        if !catalog.knows_symptom(name) {
            eprintln!("Note: no disease in the catalog lists '{name}'");
        }
    }
}

fn print_text_result(result: &PredictionResult) {
    let urgency_str = match result.urgency_level {
        Urgency::High => "HIGH",
        Urgency::Medium => "MEDIUM",
        Urgency::Low => "LOW",
    };

    println!("Prediction Results");
    println!("{}", "=".repeat(60));

    match result.disease_id {
        Some(id) => println!("\n{} (ID: {id})", result.disease_name),
        None => println!("\n{}", result.disease_name),
    }
    println!("   Probability: {:.2}%", result.probability);
    println!("   Urgency: {urgency_str}");

    if !result.matched_symptoms.is_empty() {
        println!("   Matched symptoms: {}", result.matched_symptoms.join(", "));
    }

    if !result.alternative_diseases.is_empty() {
        println!("\nAlternatives:");
        for alt in &result.alternative_diseases {
            println!("   - {} ({:.2}%)", alt.name, alt.probability);
        }
    }

    println!("\nRecommendation: {}", result.recommendation);
}

fn print_tsv_result(result: &PredictionResult) {
    println!("disease_id\tdisease_name\tprobability\turgency\tmatched_symptoms\talternatives");
    let alternatives: Vec<String> = result
        .alternative_diseases
        .iter()
        .map(|a| format!("{}:{:.2}", a.name, a.probability))
        .collect();
    println!(
        "{}\t{}\t{:.2}\t{}\t{}\t{}",
        result
            .disease_id
            .map_or_else(|| "NA".to_string(), |id| id.to_string()),
        result.disease_name,
        result.probability,
        result.urgency_level,
        result.matched_symptoms.join(","),
        alternatives.join(","),
    );
}
