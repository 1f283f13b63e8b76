use anyhow::{Context, Result};
use std::path::Path;
use tabcheck_parser::parse_file;
use tracing::info;

use crate::output;

pub fn execute(config: &Path, format: &str) -> Result<()> {
    info!("Checking validation config: {}", config.display());

    let registry = super::registry()?;
    let spec = parse_file(config, &registry)
        .with_context(|| format!("Failed to load config file: {}", config.display()))?;

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&spec)?);
        return Ok(());
    }

    output::print_success(&format!(
        "Config is valid: {} validation(s)",
        spec.len()
    ));

    println!("\nNormalized Validations:");
    for (i, entry) in spec.iter().enumerate() {
        println!(
            "  {}. {} (column: {})",
            i + 1,
            entry.validator,
            entry.column
        );
        for (name, value) in &entry.params {
            println!("       {} = {}", name, value);
        }
    }

    Ok(())
}
