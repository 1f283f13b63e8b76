//! User-supplied validation functions.

use tabcheck_core::{
    DataSet, FailureDetail, ParamKind, ParamSchema, ParamSpec, ParamValue, Params, Result,
    ValidationError, ValidationResult, Validator, ValidatorType,
};

/// Validates values with a caller-provided function.
///
/// The function sees every value, nulls included. `Ok(false)` fails the row
/// with `error_message` (or a generic reason); `Err` fails it with the fault
/// text. A fault never stops the remaining rows from being checked.
#[derive(Debug, Clone)]
pub struct CustomFunctionValidator {
    params: Params,
}

impl Validator for CustomFunctionValidator {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn description(&self) -> &str {
        Self::DESCRIPTION
    }

    fn required_params(&self) -> ParamSchema {
        Self::schema()
    }

    fn validate(&self, dataset: &DataSet, column: &str) -> Result<ValidationResult> {
        let func = match self.params.get("validation_func") {
            None | Some(ParamValue::Null) => {
                return Err(ValidationError::missing_param(Self::NAME, "validation_func"));
            }
            Some(value) => value.as_function().ok_or_else(|| {
                ValidationError::invalid_param(
                    Self::NAME,
                    "validation_func",
                    format!("expected a callable, got {}", value.kind_name()),
                )
            })?,
        };

        let error_message = self
            .params
            .get("error_message")
            .filter(|value| !value.is_null())
            .map(ToString::to_string)
            .filter(|message| !message.is_empty())
            .unwrap_or_else(|| "Custom validation failed".to_string());

        let values = dataset
            .column(column)
            .ok_or_else(|| ValidationError::column_not_found(column, Self::NAME))?;

        let mut failures = Vec::new();
        for (row, value) in values {
            match func.call(value) {
                Ok(true) => {}
                Ok(false) => failures.push(FailureDetail::new(
                    row.clone(),
                    value.clone(),
                    error_message.clone(),
                )),
                Err(fault) => failures.push(FailureDetail::new(
                    row.clone(),
                    value.clone(),
                    format!("Exception in validation function: {}", fault),
                )),
            }
        }

        Ok(ValidationResult::from_failures(
            Self::NAME,
            dataset.len(),
            failures,
            "custom",
        ))
    }
}

impl ValidatorType for CustomFunctionValidator {
    const NAME: &'static str = "custom_function";
    const DESCRIPTION: &'static str = "Validate values using a user-provided function";

    fn schema() -> ParamSchema {
        let mut schema = ParamSchema::new();
        schema.insert(
            "validation_func".to_string(),
            ParamSpec::new(
                ParamKind::Callable,
                "Function that takes a single value and returns whether it passes",
            )
            .required(),
        );
        schema.insert(
            "error_message".to_string(),
            ParamSpec::new(ParamKind::Text, "Custom error message for failures"),
        );
        schema
    }

    fn from_params(params: Params) -> Self {
        Self { params }
    }
}
