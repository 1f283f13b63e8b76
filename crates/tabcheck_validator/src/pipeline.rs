//! Validation pipeline.
//!
//! This module provides the `ValidationPipeline` that builds validator
//! instances from a spec, runs them in order against a dataset and aggregates
//! their results.

use std::time::Instant;
use tabcheck_core::{
    DataSet, PipelineResult, PipelineSpec, Result, ValidationError, Validator, ValidatorRegistry,
};
use tracing::{debug, error, info};

/// A validator bound to its target column.
struct Stage {
    column: String,
    validator: Box<dyn Validator>,
}

/// Ordered sequence of column validators.
///
/// Construction is fail-fast: if any entry names an unregistered validator or
/// passes a parameter its validator does not declare, no pipeline is built.
/// Defaults and parameter types are not checked here; specs built in code
/// should go through `tabcheck_parser::normalize_spec` first. Each run executes the validators strictly in spec
/// order and keeps the result for [`summary`](Self::summary).
///
/// # Example
///
/// ```rust
/// use tabcheck_core::{DataSet, DataValue, PipelineSpecBuilder};
/// use tabcheck_validator::{builtin_registry, ValidationPipeline};
///
/// let registry = builtin_registry().unwrap();
/// let spec = PipelineSpecBuilder::new().check("id", "null_check").build();
/// let dataset = DataSet::from_columns(vec![("id", vec![DataValue::Int(1), DataValue::Null])]);
///
/// let mut pipeline = ValidationPipeline::new(&spec, &registry).unwrap();
/// let result = pipeline.run(&dataset).unwrap();
///
/// assert_eq!(result.failed_validations, 1);
/// assert!(pipeline.summary().unwrap().contains("Row 2"));
/// ```
pub struct ValidationPipeline {
    stages: Vec<Stage>,
    last_result: Option<PipelineResult>,
}

impl ValidationPipeline {
    /// Builds a pipeline by resolving every entry through the registry.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::UnknownValidator` naming the first entry whose
    /// validator is not registered, or `ValidationError::InvalidParameter` for
    /// a parameter key missing from the validator's schema.
    pub fn new(spec: &PipelineSpec, registry: &ValidatorRegistry) -> Result<Self> {
        let stages = spec
            .iter()
            .enumerate()
            .map(|(index, entry)| -> Result<Stage> {
                let registered = registry
                    .lookup(&entry.validator)
                    .ok_or_else(|| ValidationError::unknown_validator(&entry.validator, index))?;
                let schema = &registered.descriptor().params;
                if let Some(key) = entry.params.keys().find(|key| !schema.contains_key(*key)) {
                    return Err(ValidationError::invalid_param(
                        &entry.validator,
                        key,
                        format!("not declared (validation entry {})", index),
                    ));
                }
                Ok(Stage {
                    column: entry.column.clone(),
                    validator: registered.create(entry.params.clone()),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            stages,
            last_result: None,
        })
    }

    /// Returns the number of validators in the pipeline.
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Returns true if the pipeline has no validators.
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Runs every validator against the dataset, in order.
    ///
    /// # Errors
    ///
    /// Fails the whole run, with no partial result, if a target column is
    /// missing or a validator cannot execute (for example an invalid pattern).
    /// The previous result is kept in that case.
    pub fn run(&mut self, dataset: &DataSet) -> Result<PipelineResult> {
        let start = Instant::now();
        let total = self.stages.len();
        info!(
            "Running {} validation(s) against {} record(s)",
            total,
            dataset.len()
        );

        let mut results = Vec::with_capacity(total);
        for (index, stage) in self.stages.iter().enumerate() {
            if !dataset.has_column(&stage.column) {
                error!("Column '{}' not found in input data", stage.column);
                return Err(ValidationError::column_not_found(
                    &stage.column,
                    stage.validator.name(),
                ));
            }

            debug!(
                "Running validator '{}' on column '{}' ({}/{})",
                stage.validator.name(),
                stage.column,
                index + 1,
                total
            );

            let validator_start = Instant::now();
            let mut result = stage.validator.validate(dataset, &stage.column)?;
            result.duration_seconds = Some(validator_start.elapsed().as_secs_f64());
            results.push(result);
        }

        let mut pipeline_result = PipelineResult::from_results(results);
        pipeline_result.duration_seconds = Some(start.elapsed().as_secs_f64());

        info!(
            "Validation finished: {}/{} passed",
            pipeline_result.passed_validations, pipeline_result.total_validations
        );

        self.last_result = Some(pipeline_result.clone());
        Ok(pipeline_result)
    }

    /// Returns the result of the most recent successful run.
    pub fn last_result(&self) -> Option<&PipelineResult> {
        self.last_result.as_ref()
    }

    /// Renders a human-readable summary of the most recent run.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidState` if the pipeline has not run yet.
    pub fn summary(&self) -> Result<String> {
        let result = self
            .last_result
            .as_ref()
            .ok_or_else(|| ValidationError::invalid_state("pipeline has not been run yet"))?;

        let mut lines = vec![
            "Validation Results:".to_string(),
            "==================".to_string(),
        ];

        for (index, (stage, outcome)) in self.stages.iter().zip(&result.results).enumerate() {
            let status = if outcome.passed { "✓ PASSED" } else { "✗ FAILED" };
            lines.push(format!(
                "\n{}. Validator: {} (column: {})",
                index + 1,
                outcome.validator_name,
                stage.column
            ));
            lines.push(format!("   Status: {}", status));
            lines.push(format!("   Message: {}", outcome.message));

            if !outcome.passed {
                lines.push("   Failed Records:".to_string());
                for detail in &outcome.error_details {
                    lines.push(format!(
                        "     - Row {}: value={}, reason={}",
                        detail.row.display_number(),
                        detail.value.repr(),
                        detail.reason
                    ));
                }
            }
        }

        lines.push("\n==================".to_string());
        lines.push(format!(
            "Overall Result: {}",
            if result.passed { "PASSED" } else { "FAILED" }
        ));
        lines.push(format!(
            "Passed: {}/{} validations",
            result.passed_validations, result.total_validations
        ));
        lines.push(format!(
            "Failed: {}/{} validations",
            result.failed_validations, result.total_validations
        ));
        if let Some(duration) = result.duration_seconds {
            lines.push(format!("Total validation time: {:.3} seconds.", duration));
        }

        Ok(lines.join("\n"))
    }
}

impl std::fmt::Debug for ValidationPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let stages: Vec<_> = self
            .stages
            .iter()
            .map(|stage| (stage.validator.name(), stage.column.as_str()))
            .collect();
        f.debug_struct("ValidationPipeline")
            .field("stages", &stages)
            .field("has_run", &self.last_result.is_some())
            .finish()
    }
}
