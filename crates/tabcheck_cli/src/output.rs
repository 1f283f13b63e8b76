use anyhow::Result;
use colored::*;
use serde::Serialize;
use std::path::Path;
use tabcheck_core::{PipelineResult, ValidatorDescriptor};

/// Top-level shape of the JSON report file.
#[derive(Serialize)]
struct Report<'a> {
    pipeline: &'a PipelineResult,
}

pub fn write_report(result: &PipelineResult, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(&Report { pipeline: result })?;
    std::fs::write(path, json)?;
    Ok(())
}

pub fn print_outcome(result: &PipelineResult) {
    println!();
    if result.passed {
        println!(
            "{} {}",
            "✓".green().bold(),
            "Validation PASSED".green().bold()
        );
    } else {
        println!(
            "{} {} ({} of {} validations failed)",
            "✗".red().bold(),
            "Validation FAILED".red().bold(),
            result.failed_validations,
            result.total_validations
        );
    }
}

pub fn print_descriptor(descriptor: &ValidatorDescriptor) {
    println!("\n  {} - {}", descriptor.name.bold(), descriptor.description);
    for (name, spec) in &descriptor.params {
        let mut traits = vec![spec.kinds_display()];
        if spec.required {
            traits.push("required".to_string());
        }
        if let Some(default) = &spec.default {
            traits.push(format!("default: {}", default));
        }
        if let Some(choices) = &spec.choices {
            traits.push(format!("one of: {}", choices.join(", ")));
        }
        println!(
            "      {} ({}): {}",
            name.cyan(),
            traits.join(", "),
            spec.description
        );
    }
}

pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message.green());
}
