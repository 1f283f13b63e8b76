mod commands;
mod input;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "tabcheck")]
#[command(version, about = "Declarative validation for tabular data", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a validation pipeline against a data file
    Validate {
        /// Path to the input data (.csv with a header row, or .json array of records)
        #[arg(short, long)]
        input: PathBuf,

        /// Path to the validation config file (JSON or YAML)
        #[arg(short, long)]
        config: PathBuf,

        /// Path to write the JSON validation report
        #[arg(short, long)]
        output: PathBuf,

        /// Exit with a non-zero status when any validation fails
        #[arg(long)]
        fail_on_failure: bool,
    },

    /// Load and normalize a config file without running it
    Check {
        /// Path to the validation config file (JSON or YAML)
        config: PathBuf,

        /// Output format: text, json
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// List the registered validators and their parameters
    List,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let log_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_level(true)
                .compact(),
        )
        .with(tracing_subscriber::filter::LevelFilter::from_level(
            log_level,
        ))
        .init();

    tabcheck_validator::init()?;

    match cli.command {
        Commands::Validate {
            input,
            config,
            output,
            fail_on_failure,
        } => commands::validate::execute(&input, &config, &output, fail_on_failure),

        Commands::Check { config, format } => commands::check::execute(&config, &format),

        Commands::List => commands::list::execute(),
    }
}
