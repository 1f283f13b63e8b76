//! Validator contract and result types.
//!
//! This module defines the traits every check implements and the structured
//! results a validation run produces.

use crate::{DataSet, DataValue, ParamSchema, Params, Result, RowId, ValidatorDescriptor};
use serde::Serialize;

/// Core trait for column validators.
///
/// Implementations read one column of a [`DataSet`] in row order and classify
/// every row as passing or failing. Ordinary per-row failures are data, not
/// errors: `validate` only returns `Err` when the validator itself cannot run
/// (a required parameter is absent, a pattern does not compile, ...).
///
/// # Example
///
/// ```rust
/// use tabcheck_core::{DataSet, FailureDetail, ParamSchema, Result, ValidationResult, Validator};
///
/// struct NonEmpty;
///
/// impl Validator for NonEmpty {
///     fn name(&self) -> &str { "non_empty" }
///     fn description(&self) -> &str { "Rejects empty strings" }
///     fn required_params(&self) -> ParamSchema { ParamSchema::new() }
///
///     fn validate(&self, dataset: &DataSet, column: &str) -> Result<ValidationResult> {
///         let failures = dataset
///             .column(column)
///             .into_iter()
///             .flatten()
///             .filter(|(_, value)| value.as_string() == Some(""))
///             .map(|(row, value)| FailureDetail::new(row.clone(), value.clone(), "Empty string"))
///             .collect();
///         Ok(ValidationResult::from_failures(self.name(), dataset.len(), failures, "non-empty"))
///     }
/// }
/// ```
pub trait Validator: Send + Sync {
    /// Registry key of this validator.
    fn name(&self) -> &str;

    /// Human-readable description.
    fn description(&self) -> &str;

    /// Parameter schema. Pure; valid on an unconfigured instance.
    fn required_params(&self) -> ParamSchema;

    /// Validates one column of a dataset.
    ///
    /// # Errors
    ///
    /// Returns an error if the validator is misconfigured. Must not mutate the
    /// dataset.
    fn validate(&self, dataset: &DataSet, column: &str) -> Result<ValidationResult>;
}

/// A validator type that can be registered by name.
///
/// The name is a constant of the type, so the registry never has to build an
/// instance just to learn what to call it.
pub trait ValidatorType: Validator + Sized + 'static {
    /// Registry key.
    const NAME: &'static str;

    /// Human-readable description.
    const DESCRIPTION: &'static str;

    /// Parameter schema of the type.
    fn schema() -> ParamSchema;

    /// Constructs an instance from (normalized or raw) parameters.
    fn from_params(params: Params) -> Self;

    /// Returns the descriptor stored in the registry.
    fn descriptor() -> ValidatorDescriptor {
        ValidatorDescriptor {
            name: Self::NAME.to_string(),
            description: Self::DESCRIPTION.to_string(),
            params: Self::schema(),
        }
    }
}

/// A single-row failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailureDetail {
    /// Identifier of the failing row
    pub row: RowId,
    /// Offending value
    pub value: DataValue,
    /// Human-readable cause
    pub reason: String,
}

impl FailureDetail {
    /// Creates a new failure record.
    pub fn new(row: RowId, value: DataValue, reason: impl Into<String>) -> Self {
        Self {
            row,
            value,
            reason: reason.into(),
        }
    }
}

/// Outcome of one validator execution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationResult {
    /// Name of the validator that ran
    pub validator_name: String,
    /// True iff no record failed
    pub passed: bool,
    /// Number of records examined
    pub total_records: usize,
    /// Number of records that failed
    pub failed_records: usize,
    /// One entry per failing row, in row order
    pub error_details: Vec<FailureDetail>,
    /// Summary text
    pub message: String,
    /// Runtime in seconds, attached by the pipeline
    pub duration_seconds: Option<f64>,
}

impl ValidationResult {
    /// Builds a result from the collected failures.
    ///
    /// `check_kind` names the check in the failure message, e.g. `"range"`
    /// yields `"2/10 records failed range validation"`.
    pub fn from_failures(
        validator_name: impl Into<String>,
        total_records: usize,
        error_details: Vec<FailureDetail>,
        check_kind: &str,
    ) -> Self {
        let failed_records = error_details.len();
        let passed = failed_records == 0;
        let message = if passed {
            format!("All {} records passed", total_records)
        } else {
            format!(
                "{}/{} records failed {} validation",
                failed_records, total_records, check_kind
            )
        };

        Self {
            validator_name: validator_name.into(),
            passed,
            total_records,
            failed_records,
            error_details,
            message,
            duration_seconds: None,
        }
    }
}

/// Outcome of one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineResult {
    /// True iff every validation passed
    pub passed: bool,
    /// Number of validations run
    pub total_validations: usize,
    /// Number of validations that passed
    pub passed_validations: usize,
    /// Number of validations that failed
    pub failed_validations: usize,
    /// Per-validation results in spec order
    pub results: Vec<ValidationResult>,
    /// Total runtime in seconds
    pub duration_seconds: Option<f64>,
}

impl PipelineResult {
    /// Aggregates per-validation results, keeping their order.
    pub fn from_results(results: Vec<ValidationResult>) -> Self {
        let passed_validations = results.iter().filter(|r| r.passed).count();
        let failed_validations = results.len() - passed_validations;

        Self {
            passed: failed_validations == 0,
            total_validations: results.len(),
            passed_validations,
            failed_validations,
            results,
            duration_seconds: None,
        }
    }
}
