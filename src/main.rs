use clap::Parser;
use tracing_subscriber::EnvFilter;

mod catalog;
mod cli;
mod core;
mod history;
mod matching;
mod utils;
mod web;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging based on verbosity flag
    let filter = if cli.verbose {
        EnvFilter::new("symptom_check=debug,info")
    } else {
        EnvFilter::new("symptom_check=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();

    match cli.command {
        cli::Commands::Predict(args) => {
            cli::predict::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Catalog(args) => {
            cli::catalog::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::History(args) => {
            cli::history::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Serve(args) => {
            web::server::run(args)?;
        }
    }

    Ok(())
}
