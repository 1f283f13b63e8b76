//! Regular expression validation.

use regex::{Regex, RegexBuilder};
use tabcheck_core::{
    DataSet, DataValue, FailureDetail, ParamKind, ParamSchema, ParamSpec, ParamValue, Params,
    Result, ValidationError, ValidationResult, Validator, ValidatorType,
};

/// Checks that values match a regular expression.
///
/// The match is anchored at the start of the value but not at the end, so
/// `^` is implied and `$` must be written explicitly for a full match. Values
/// are matched in their text form (see [`match_text`]); nulls always fail.
#[derive(Debug, Clone)]
pub struct RegexValidator {
    params: Params,
}

impl RegexValidator {
    /// Compiles the configured pattern.
    fn compile(&self) -> Result<Regex> {
        let pattern = match self.params.get("pattern") {
            None | Some(ParamValue::Null) => {
                return Err(ValidationError::missing_param(Self::NAME, "pattern"));
            }
            Some(ParamValue::Text(pattern)) => pattern.clone(),
            Some(other) => other.to_string(),
        };

        let case_sensitive = match self.params.get("case_sensitive") {
            None | Some(ParamValue::Null) => true,
            Some(value) => value.as_bool().ok_or_else(|| {
                ValidationError::invalid_param(Self::NAME, "case_sensitive", "expected a boolean")
            })?,
        };

        RegexBuilder::new(&pattern)
            .case_insensitive(!case_sensitive)
            .build()
            .map_err(|e| ValidationError::InvalidRegex {
                pattern,
                error: e.to_string(),
            })
    }
}

/// True if the regex matches at the beginning of `text`.
///
/// Leftmost-first search returns a match at offset 0 whenever one exists.
fn matches_at_start(regex: &Regex, text: &str) -> bool {
    regex.find(text).is_some_and(|m| m.start() == 0)
}

impl Validator for RegexValidator {
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
        let regex = self.compile()?;

        let values = dataset
            .column(column)
            .ok_or_else(|| ValidationError::column_not_found(column, Self::NAME))?;

        let mut failures = Vec::new();
        for (row, value) in values {
            if value.is_null() {
                failures.push(FailureDetail::new(
                    row.clone(),
                    DataValue::Null,
                    "Null value cannot match pattern",
                ));
                continue;
            }

            let text = match_text(value);
            if !matches_at_start(&regex, &text) {
                failures.push(FailureDetail::new(
                    row.clone(),
                    DataValue::String(text),
                    "Does not match pattern",
                ));
            }
        }

        Ok(ValidationResult::from_failures(
            Self::NAME,
            dataset.len(),
            failures,
            "regex",
        ))
    }
}

/// Text form a non-null value is matched in.
///
/// Whole floats keep a trailing `.0` and booleans are capitalized, so
/// `Float(5.0)` reads `"5.0"` and `Bool(true)` reads `"True"`.
pub fn match_text(value: &DataValue) -> String {
    match value {
        DataValue::Float(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e16 => {
            format!("{:.1}", f)
        }
        DataValue::Bool(true) => "True".to_string(),
        DataValue::Bool(false) => "False".to_string(),
        other => other.to_string(),
    }
}

impl ValidatorType for RegexValidator {
    const NAME: &'static str = "regex";
    const DESCRIPTION: &'static str = "Check that values match a regular expression";

    fn schema() -> ParamSchema {
        let mut schema = ParamSchema::new();
        schema.insert(
            "pattern".to_string(),
            ParamSpec::new(ParamKind::Text, "Regular expression pattern to match").required(),
        );
        schema.insert(
            "case_sensitive".to_string(),
            ParamSpec::new(ParamKind::Boolean, "Whether matching is case sensitive")
                .with_default(true),
        );
        schema
    }

    fn from_params(params: Params) -> Self {
        Self { params }
    }
}
