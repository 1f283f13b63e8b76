//! Numeric range validation.
//!
//! Every value must be numeric and lie within the configured bounds. A bound
//! left unset disables that side of the check.

use tabcheck_core::{
    DataSet, DataValue, FailureDetail, ParamKind, ParamSchema, ParamSpec, ParamValue, Params,
    Result, ValidationError, ValidationResult, Validator, ValidatorType,
};

/// Checks that numeric values fall within `[min_value, max_value]`.
///
/// With `inclusive = false` the bounds themselves are rejected too. Nulls and
/// non-numeric values always fail.
#[derive(Debug, Clone)]
pub struct RangeValidator {
    params: Params,
}

/// A configured bound, kept with its original form for messages.
struct Bound {
    value: f64,
    display: String,
}

impl RangeValidator {
    fn bound(&self, name: &str) -> Result<Option<Bound>> {
        match self.params.get(name) {
            None | Some(ParamValue::Null) => Ok(None),
            Some(value) => {
                let number = value.as_f64().ok_or_else(|| {
                    ValidationError::invalid_param(
                        Self::NAME,
                        name,
                        format!("expected a number, got {}", value.kind_name()),
                    )
                })?;
                Ok(Some(Bound {
                    value: number,
                    display: value.to_string(),
                }))
            }
        }
    }

    fn inclusive(&self) -> Result<bool> {
        match self.params.get("inclusive") {
            None | Some(ParamValue::Null) => Ok(true),
            Some(value) => value.as_bool().ok_or_else(|| {
                ValidationError::invalid_param(Self::NAME, "inclusive", "expected a boolean")
            }),
        }
    }

    /// Returns the failure reason for one non-null value, if it fails.
    fn check_value(
        value: &DataValue,
        min: Option<&Bound>,
        max: Option<&Bound>,
        inclusive: bool,
    ) -> Option<String> {
        let number = match as_number(value) {
            Some(n) => n,
            None => return Some("Value is not numeric".to_string()),
        };

        if let Some(min) = min {
            if inclusive && number < min.value {
                return Some(format!("Value below minimum {}", min.display));
            }
            if !inclusive && number <= min.value {
                return Some(format!("Value not greater than minimum {}", min.display));
            }
        }

        if let Some(max) = max {
            if inclusive && number > max.value {
                return Some(format!("Value above maximum {}", max.display));
            }
            if !inclusive && number >= max.value {
                return Some(format!("Value not less than maximum {}", max.display));
            }
        }

        None
    }
}

/// Interprets a cell as a number. Numeric text counts; booleans do not.
fn as_number(value: &DataValue) -> Option<f64> {
    match value {
        DataValue::Int(i) => Some(*i as f64),
        DataValue::Float(f) => Some(*f),
        DataValue::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

impl Validator for RangeValidator {
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
        let min = self.bound("min_value")?;
        let max = self.bound("max_value")?;
        let inclusive = self.inclusive()?;

        let values = dataset
            .column(column)
            .ok_or_else(|| ValidationError::column_not_found(column, Self::NAME))?;

        let mut failures = Vec::new();
        for (row, value) in values {
            if value.is_null() {
                failures.push(FailureDetail::new(row.clone(), value.clone(), "Null value"));
                continue;
            }
            if let Some(reason) = Self::check_value(value, min.as_ref(), max.as_ref(), inclusive) {
                failures.push(FailureDetail::new(row.clone(), value.clone(), reason));
            }
        }

        Ok(ValidationResult::from_failures(
            Self::NAME,
            dataset.len(),
            failures,
            "range",
        ))
    }
}

impl ValidatorType for RangeValidator {
    const NAME: &'static str = "range";
    const DESCRIPTION: &'static str = "Check that numeric values fall within a range";

    fn schema() -> ParamSchema {
        let mut schema = ParamSchema::new();
        schema.insert(
            "min_value".to_string(),
            ParamSpec::new(ParamKind::Number, "Minimum allowed value"),
        );
        schema.insert(
            "max_value".to_string(),
            ParamSpec::new(ParamKind::Number, "Maximum allowed value"),
        );
        schema.insert(
            "inclusive".to_string(),
            ParamSpec::new(ParamKind::Boolean, "Whether the bounds themselves are allowed")
                .with_default(true),
        );
        schema
    }

    fn from_params(params: Params) -> Self {
        Self { params }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tabcheck_core::{RowId, ValidationSpecBuilder};

    fn validator(min: Option<f64>, max: Option<f64>, inclusive: bool) -> RangeValidator {
        let mut builder = ValidationSpecBuilder::new("num", "range").param("inclusive", inclusive);
        if let Some(min) = min {
            builder = builder.param("min_value", min);
        }
        if let Some(max) = max {
            builder = builder.param("max_value", max);
        }
        RangeValidator::from_params(builder.build().params)
    }

    fn ints(values: &[i64]) -> DataSet {
        DataSet::from_columns(vec![("num", values.iter().map(|v| DataValue::Int(*v)).collect())])
    }

    #[test]
    fn test_inclusive_bounds() {
        let result = validator(Some(0.0), Some(10.0), true)
            .validate(&ints(&[5, -1, 11]), "num")
            .unwrap();

        assert!(!result.passed);
        assert_eq!(result.failed_records, 2);
        let failing: Vec<_> = result.error_details.iter().map(|d| d.value.clone()).collect();
        assert_eq!(failing, vec![DataValue::Int(-1), DataValue::Int(11)]);
        assert_eq!(result.error_details[0].row, RowId::Ordinal(1));
        assert_eq!(result.message, "2/3 records failed range validation");
    }

    #[test]
    fn test_exclusive_bounds() {
        let result = validator(Some(0.0), Some(10.0), false)
            .validate(&ints(&[0, 5, 10]), "num")
            .unwrap();

        assert_eq!(result.failed_records, 2);
        assert!(result.error_details[0].reason.contains("not greater than minimum"));
        assert!(result.error_details[1].reason.contains("not less than maximum"));
    }

    #[test]
    fn test_inclusive_accepts_bounds() {
        let result = validator(Some(0.0), Some(10.0), true)
            .validate(&ints(&[0, 10]), "num")
            .unwrap();
        assert!(result.passed);
        assert_eq!(result.message, "All 2 records passed");
    }

    #[test]
    fn test_unset_bound_disables_side() {
        let result = validator(None, Some(10.0), true)
            .validate(&ints(&[-1000, 3]), "num")
            .unwrap();
        assert!(result.passed);
    }

    #[test]
    fn test_null_and_non_numeric() {
        let dataset = DataSet::from_columns(vec![(
            "num",
            vec![
                DataValue::Null,
                DataValue::from("abc"),
                DataValue::from("7"),
                DataValue::Bool(true),
            ],
        )]);

        let result = validator(Some(0.0), Some(10.0), true).validate(&dataset, "num").unwrap();

        let reasons: Vec<_> = result.error_details.iter().map(|d| d.reason.as_str()).collect();
        assert_eq!(
            reasons,
            vec!["Null value", "Value is not numeric", "Value is not numeric"]
        );
    }

    #[test]
    fn test_lower_bound_reported_first() {
        // Both bounds fail for 5 when min > max; the lower bound wins.
        let result = validator(Some(10.0), Some(0.0), true)
            .validate(&ints(&[5]), "num")
            .unwrap();
        assert_eq!(result.error_details[0].reason, "Value below minimum 10");
    }

    #[test]
    fn test_integer_bound_display() {
        let params = ValidationSpecBuilder::new("num", "range")
            .param("max_value", 3)
            .build()
            .params;
        let result = RangeValidator::from_params(params)
            .validate(&ints(&[4]), "num")
            .unwrap();
        assert_eq!(result.error_details[0].reason, "Value above maximum 3");
    }

    #[test]
    fn test_mistyped_bound_is_error() {
        let params = ValidationSpecBuilder::new("num", "range")
            .param("min_value", "zero")
            .build()
            .params;
        let result = RangeValidator::from_params(params).validate(&ints(&[1]), "num");
        assert!(matches!(result, Err(ValidationError::InvalidParameter { .. })));
    }
}
