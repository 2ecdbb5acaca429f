//! Command-line interface for symptom-check.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **predict**: Match a list of symptoms against the disease catalog
//! - **catalog**: List, show, or export diseases and symptoms from the catalog
//! - **history**: Show the predictions recorded for a patient
//! - **serve**: Start the web interface and JSON API
//!
//! ## Usage
//!
//! ```text
//! # Match symptoms against the embedded catalog
//! symptom-check predict Fever Cough Fatigue
//!
//! # Record the prediction for patient 7 and print JSON
//! symptom-check predict Fever Cough --patient 7 --format json
//!
//! # Show what patient 7 has been told so far
//! symptom-check history 7
//!
//! # Start web UI
//! symptom-check serve --port 8080 --open
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::history::store::DEFAULT_HISTORY_FILE;

pub mod catalog;
pub mod history;
pub mod predict;

#[derive(Parser)]
#[command(name = "symptom-check")]
#[command(author = "Fulcrum Genomics")]
#[command(version)]
#[command(about = "Match reported symptoms against a catalog of known diseases")]
#[command(
    long_about = "symptom-check compares the symptoms you report with the symptoms associated with each disease in its catalog.\n\nFor every disease it computes the fraction of that disease's symptoms you reported and provides:\n- The best matching disease and its match percentage\n- Up to three alternative diseases matching at least 30%\n- A recommendation and urgency level\n\nThis is a heuristic, not a diagnosis."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Predict the most likely disease for a set of symptoms
    Predict(predict::PredictArgs),

    /// Inspect the disease catalog
    Catalog(catalog::CatalogArgs),

    /// Show recorded predictions for a patient
    History(history::HistoryArgs),

    /// Start the web server
    Serve(ServeArgs),
}

#[derive(clap::Args)]
pub struct ServeArgs {
    /// Port to listen on
    #[arg(short, long, default_value = "8080")]
    pub port: u16,

    /// Address to bind to
    #[arg(short, long, default_value = "127.0.0.1")]
    pub address: String,

    /// Open browser automatically
    #[arg(long)]
    pub open: bool,

    /// Path to custom catalog file
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// File predictions are recorded to
    #[arg(long, default_value = DEFAULT_HISTORY_FILE)]
    pub history: PathBuf,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}
