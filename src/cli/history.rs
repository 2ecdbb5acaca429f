use std::path::PathBuf;

use clap::Args;

use crate::cli::OutputFormat;
use crate::core::types::PatientId;
use crate::history::store::{JsonLinesStore, PredictionStore, DEFAULT_HISTORY_FILE};

#[derive(Args)]
pub struct HistoryArgs {
    /// Patient ID
    #[arg(required = true)]
    pub patient: u32,

    /// File predictions were recorded to
    #[arg(long, default_value = DEFAULT_HISTORY_FILE)]
    pub history: PathBuf,

    /// Only show the most recent N predictions
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,
}

/// Execute history subcommand
///
/// # Errors
///
/// Returns an error if the history file exists but cannot be read.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: HistoryArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let store = JsonLinesStore::new(&args.history);
    let mut records = store.for_patient(PatientId(args.patient))?;
    if let Some(limit) = args.limit {
        records.truncate(limit);
    }

    if verbose {
        eprintln!(
            "Read {} prediction(s) for patient {} from {}",
            records.len(),
            args.patient,
            store.path().display()
        );
    }

    match format {
        OutputFormat::Text => {
            if records.is_empty() {
                println!("No predictions recorded for patient {}.", args.patient);
                return Ok(());
            }
            println!("{:<25} {:<30} {:>11}", "Date", "Disease", "Probability");
            println!("{}", "-".repeat(68));
            for r in &records {
                println!(
                    "{:<25} {:<30} {:>10.2}%",
                    r.predicted_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
                    r.disease_name,
                    r.probability
                );
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
        OutputFormat::Tsv => {
            println!("predicted_at\tdisease_id\tdisease_name\tprobability");
            for r in &records {
                println!(
                    "{}\t{}\t{}\t{:.2}",
                    r.predicted_at.to_rfc3339(),
                    r.disease_id,
                    r.disease_name,
                    r.probability
                );
            }
        }
    }

    Ok(())
}
