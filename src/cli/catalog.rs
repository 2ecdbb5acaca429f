use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::catalog::store::DiseaseCatalog;
use crate::cli::OutputFormat;
use crate::core::disease::Disease;
use crate::core::types::DiseaseId;

#[derive(Args)]
pub struct CatalogArgs {
    #[command(subcommand)]
    pub command: CatalogCommands,
}

#[derive(Subcommand)]
pub enum CatalogCommands {
    /// List all diseases in the catalog
    List {
        /// Path to custom catalog file
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Only list diseases associated with this symptom
        #[arg(long)]
        symptom: Option<String>,
    },

    /// Show details of a specific disease
    Show {
        /// Disease ID or name
        #[arg(required = true)]
        disease: String,

        /// Path to custom catalog file
        #[arg(long)]
        catalog: Option<PathBuf>,
    },

    /// List all reportable symptoms, sorted by name
    Symptoms {
        /// Path to custom catalog file
        #[arg(long)]
        catalog: Option<PathBuf>,
    },

    /// Export the catalog to a file
    Export {
        /// Output file path
        #[arg(required = true)]
        output: PathBuf,

        /// Path to custom catalog file to export (defaults to embedded)
        #[arg(long)]
        catalog: Option<PathBuf>,
    },
}

/// Execute catalog subcommand
///
/// # Errors
///
/// Returns an error if the catalog cannot be loaded or the operation fails.
pub fn run(args: CatalogArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    match args.command {
        CatalogCommands::List { catalog, symptom } => {
            run_list(catalog, symptom.as_deref(), format, verbose)
        }
        CatalogCommands::Show { disease, catalog } => run_show(&disease, catalog, format),
        CatalogCommands::Symptoms { catalog } => run_symptoms(catalog, format),
        CatalogCommands::Export { output, catalog } => run_export(output, catalog),
    }
}

fn run_list(
    catalog_path: Option<PathBuf>,
    symptom: Option<&str>,
    format: OutputFormat,
    verbose: bool,
) -> anyhow::Result<()> {
    let catalog = DiseaseCatalog::load(catalog_path.as_deref())?;

    if verbose {
        eprintln!(
            "Loaded catalog with {} diseases (fingerprint {})",
            catalog.len(),
            catalog.fingerprint()
        );
    }

    let diseases: Vec<&Disease> = catalog
        .diseases()
        .filter(|d| symptom.map_or(true, |s| d.symptoms.contains(s.trim())))
        .collect();

    match format {
        OutputFormat::Text => {
            println!("{:<6} {:<30} {:>8}", "ID", "Name", "Symptoms");
            println!("{}", "-".repeat(46));
            for d in &diseases {
                println!(
                    "{:<6} {:<30} {:>8}",
                    d.id.0,
                    truncate(&d.name, 30),
                    d.symptoms.len()
                );
            }
            println!("\nTotal: {} diseases", diseases.len());
        }
        OutputFormat::Json => {
            let output: Vec<serde_json::Value> = diseases
                .iter()
                .map(|d| {
                    serde_json::json!({
                        "id": d.id,
                        "name": d.name,
                        "symptom_count": d.symptoms.len(),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Tsv => {
            println!("id\tname\tsymptom_count");
            for d in &diseases {
                println!("{}\t{}\t{}", d.id, d.name, d.symptoms.len());
            }
        }
    }

    Ok(())
}

fn run_show(disease: &str, catalog_path: Option<PathBuf>, format: OutputFormat) -> anyhow::Result<()> {
    let catalog = DiseaseCatalog::load(catalog_path.as_deref())?;

    let found = disease
        .trim()
        .parse::<u32>()
        .ok()
        .and_then(|id| catalog.get(DiseaseId::new(id)))
        .or_else(|| catalog.find_by_name(disease))
        .ok_or_else(|| anyhow::anyhow!("Disease '{disease}' not found in catalog"))?;

    match format {
        OutputFormat::Text => {
            println!("ID:       {}", found.id);
            println!("Name:     {}", found.name);
            println!("Symptoms: {}", found.symptoms.len());
            for symptom in &found.symptoms {
                println!("  - {symptom}");
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(found)?);
        }
        OutputFormat::Tsv => {
            println!("id\tname\tsymptom");
            for symptom in &found.symptoms {
                println!("{}\t{}\t{symptom}", found.id, found.name);
            }
        }
    }

    Ok(())
}

fn run_symptoms(catalog_path: Option<PathBuf>, format: OutputFormat) -> anyhow::Result<()> {
    let catalog = DiseaseCatalog::load(catalog_path.as_deref())?;
    let symptoms = catalog.symptoms_by_name();

    match format {
        OutputFormat::Text => {
            for s in &symptoms {
                println!("{}", s.name);
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&symptoms)?);
        }
        OutputFormat::Tsv => {
            println!("id\tname");
            for s in &symptoms {
                println!("{}\t{}", s.id, s.name);
            }
        }
    }

    Ok(())
}

fn run_export(output: PathBuf, catalog_path: Option<PathBuf>) -> anyhow::Result<()> {
    let catalog = DiseaseCatalog::load(catalog_path.as_deref())?;
    catalog.write_to_file(&output)?;
    eprintln!(
        "Exported {} diseases to {}",
        catalog.len(),
        output.display()
    );
    Ok(())
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}
