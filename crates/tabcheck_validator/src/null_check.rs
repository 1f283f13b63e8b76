//! Null value validation.

use tabcheck_core::{
    DataSet, DataValue, FailureDetail, ParamKind, ParamSchema, ParamSpec, ParamValue, Params, Result,
    ValidationError, ValidationResult, Validator, ValidatorType,
};
use tracing::debug;

/// Checks for null values in a column.
///
/// - `allow_null = false` (default): every null row fails.
/// - `allow_null = true` with `max_null_percent`: if the null share exceeds
///   the ceiling every null row fails; otherwise the nulls are accepted and
///   do not appear in the failure details.
/// - `allow_null = true` without a ceiling: nulls are accepted.
#[derive(Debug, Clone)]
pub struct NullCheckValidator {
    params: Params,
}

impl NullCheckValidator {
    fn allow_null(&self) -> Result<bool> {
        match self.params.get("allow_null") {
            None | Some(ParamValue::Null) => Ok(false),
            Some(value) => value.as_bool().ok_or_else(|| {
                ValidationError::invalid_param(Self::NAME, "allow_null", "expected a boolean")
            }),
        }
    }

    fn max_null_percent(&self) -> Result<Option<(f64, String)>> {
        match self.params.get("max_null_percent") {
            None | Some(ParamValue::Null) => Ok(None),
            Some(value) => value
                .as_f64()
                .map(|limit| Some((limit, value.to_string())))
                .ok_or_else(|| {
                    ValidationError::invalid_param(
                        Self::NAME,
                        "max_null_percent",
                        "expected a number",
                    )
                }),
        }
    }
}

impl Validator for NullCheckValidator {
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
        let allow_null = self.allow_null()?;
        let max_null_percent = self.max_null_percent()?;

        let nulls: Vec<FailureDetail> = dataset
            .column(column)
            .ok_or_else(|| ValidationError::column_not_found(column, Self::NAME))?
            .filter(|(_, value)| value.is_null())
            .map(|(row, _)| FailureDetail::new(row.clone(), DataValue::Null, ""))
            .collect();

        let total = dataset.len();
        let failures = match (allow_null, max_null_percent) {
            (false, _) => nulls
                .into_iter()
                .map(|detail| FailureDetail {
                    reason: "Null value not allowed".to_string(),
                    ..detail
                })
                .collect(),
            (true, Some((limit, limit_display))) => {
                let percent = if total == 0 {
                    0.0
                } else {
                    nulls.len() as f64 / total as f64 * 100.0
                };

                if percent > limit {
                    nulls
                        .into_iter()
                        .map(|detail| FailureDetail {
                            reason: format!(
                                "Null percentage {:.2}% exceeds limit {}%",
                                percent, limit_display
                            ),
                            ..detail
                        })
                        .collect()
                } else {
                    debug!(
                        "Column '{}': {} null value(s) ({:.2}%) within allowed {}% limit",
                        column,
                        nulls.len(),
                        percent,
                        limit_display
                    );
                    Vec::new()
                }
            }
            (true, None) => Vec::new(),
        };

        Ok(ValidationResult::from_failures(
            Self::NAME,
            total,
            failures,
            "null check",
        ))
    }
}

impl ValidatorType for NullCheckValidator {
    const NAME: &'static str = "null_check";
    const DESCRIPTION: &'static str = "Check for null values in a column";

    fn schema() -> ParamSchema {
        let mut schema = ParamSchema::new();
        schema.insert(
            "allow_null".to_string(),
            ParamSpec::new(ParamKind::Boolean, "Whether null values are allowed")
                .with_default(false),
        );
        schema.insert(
            "max_null_percent".to_string(),
            ParamSpec::new(
                ParamKind::Number,
                "Maximum percentage of null values allowed (0-100) when nulls are allowed",
            ),
        );
        schema
    }

    fn from_params(params: Params) -> Self {
        Self { params }
    }
}
