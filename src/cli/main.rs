//! care-analytics CLI entry point

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use care_analytics::{AnalyticsError, Config};

#[derive(Debug, Parser)]
#[command(
    name = "care-analytics",
    version,
    about = "Console analytics toolkit for the care platform demo database"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the full analytics report against the precomputed views
    Report,
    /// Install analytics view definitions from a directory of NN_*.sql files
    InstallViews {
        /// Directory containing the ordered view definition files
        #[arg(long, default_value = "database/analytics")]
        dir: PathBuf,
    },
    /// Install the AI enhancement schema extension and verify it
    InstallAi {
        /// Path to the AI extension statement file
        #[arg(long, default_value = "database/project/99_ai_extensions.sql")]
        file: PathBuf,
    },
    /// Insert synthetic embedding rows for demo data
    Seed,
    /// Nearest-neighbor suggestion lookup for a patient note
    Suggest {
        /// Patient identifier
        #[arg(value_parser = clap::builder::NonEmptyStringValueParser::new())]
        patient_id: String,
        /// Free-text note
        #[arg(value_parser = clap::builder::NonEmptyStringValueParser::new())]
        note: String,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}


#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    // Fail fast on bad configuration, before any connection attempt
    let config = Config::from_env().map_err(AnalyticsError::from)?;

    match cli.command {
        Command::Report => commands::report::run(&config).await,
        Command::InstallViews { dir } => commands::install::run_views(&config, &dir).await,
        Command::InstallAi { file } => commands::install::run_ai(&config, &file).await,
        Command::Seed => commands::embed::run(&config).await,
        Command::Suggest { patient_id, note } => {
            commands::suggest::run(&config, &patient_id, &note).await
        }
    }
}
