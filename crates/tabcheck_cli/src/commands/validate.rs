use anyhow::{Context, Result};
use std::path::Path;
use tabcheck_parser::parse_file;
use tabcheck_validator::ValidationPipeline;
use tracing::info;

use crate::input::load_dataset;
use crate::output;

pub fn execute(input: &Path, config: &Path, report_path: &Path, fail_on_failure: bool) -> Result<()> {
    info!("Loading data from {}...", input.display());
    let dataset = load_dataset(input)?;
    info!(
        "Loaded {} records with {} columns",
        dataset.len(),
        dataset.columns().len()
    );

    let registry = super::registry()?;

    info!("Loading validation config from {}...", config.display());
    let spec = parse_file(config, &registry)
        .with_context(|| format!("Failed to load config file: {}", config.display()))?;
    info!("Found {} validations to run", spec.len());

    let mut pipeline =
        ValidationPipeline::new(&spec, &registry).context("Failed to build validation pipeline")?;

    info!("Running validation pipeline...");
    let result = pipeline.run(&dataset).context("Validation run failed")?;

    println!();
    println!("{}", pipeline.summary()?);
    output::print_outcome(&result);

    output::write_report(&result, report_path)
        .with_context(|| format!("Failed to write report to {}", report_path.display()))?;
    info!("Detailed report saved to: {}", report_path.display());

    if fail_on_failure && !result.passed {
        std::process::exit(1);
    }

    Ok(())
}
