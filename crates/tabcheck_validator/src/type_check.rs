//! Data type validation.
//!
//! In strict mode a value must already be of the expected type. Otherwise it
//! only has to be convertible to it, following these rules:
//!
//! | expected   | accepted without strict                                      |
//! |------------|--------------------------------------------------------------|
//! | `int`      | any number, boolean or numeric text with no fractional part  |
//! | `float`    | any number, boolean or numeric text                          |
//! | `string`   | anything                                                     |
//! | `datetime` | timestamps, epoch numbers, RFC 3339 and `YYYY-MM-DD[ HH:MM:SS]` text |
//! | `bool`     | booleans, `0`/`1`, and `true`/`false`/`1`/`0` text in any case |

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use std::fmt;
use std::str::FromStr;
use tabcheck_core::{
    DataSet, DataValue, FailureDetail, ParamKind, ParamSchema, ParamSpec, ParamValue, Params,
    Result, ValidationError, ValidationResult, Validator, ValidatorType,
};

/// Type names understood by [`TypeValidator`].
pub const SUPPORTED_TYPES: [&str; 5] = ["int", "float", "string", "datetime", "bool"];

/// A type a column is expected to hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpectedType {
    Int,
    Float,
    String,
    Datetime,
    Bool,
}

impl FromStr for ExpectedType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "int" => Ok(Self::Int),
            "float" => Ok(Self::Float),
            "string" => Ok(Self::String),
            "datetime" => Ok(Self::Datetime),
            "bool" => Ok(Self::Bool),
            other => Err(format!(
                "unsupported type '{}', expected one of: {}",
                other,
                SUPPORTED_TYPES.join(", ")
            )),
        }
    }
}

impl fmt::Display for ExpectedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Int => "int",
            Self::Float => "float",
            Self::String => "string",
            Self::Datetime => "datetime",
            Self::Bool => "bool",
        };
        write!(f, "{}", name)
    }
}

/// Checks that values are of, or convert to, an expected type.
///
/// Nulls always fail.
#[derive(Debug, Clone)]
pub struct TypeValidator {
    params: Params,
}

impl TypeValidator {
    fn expected_type(&self) -> Result<ExpectedType> {
        match self.params.get("expected_type") {
            None | Some(ParamValue::Null) => {
                Err(ValidationError::missing_param(Self::NAME, "expected_type"))
            }
            Some(value) => value
                .to_string()
                .parse::<ExpectedType>()
                .map_err(|e: String| ValidationError::invalid_param(Self::NAME, "expected_type", e)),
        }
    }

    fn strict(&self) -> Result<bool> {
        match self.params.get("strict") {
            None | Some(ParamValue::Null) => Ok(false),
            Some(value) => value.as_bool().ok_or_else(|| {
                ValidationError::invalid_param(Self::NAME, "strict", "expected a boolean")
            }),
        }
    }
}

/// Strict check: the value must already be of the expected variant.
fn check_strict(value: &DataValue, expected: ExpectedType) -> std::result::Result<(), String> {
    let matches = matches!(
        (expected, value),
        (ExpectedType::Int, DataValue::Int(_))
            | (ExpectedType::Float, DataValue::Float(_))
            | (ExpectedType::String, DataValue::String(_))
            | (ExpectedType::Datetime, DataValue::Timestamp(_))
            | (ExpectedType::Bool, DataValue::Bool(_))
    );

    if matches {
        Ok(())
    } else {
        Err(format!("Expected {} but got {}", expected, value.type_name()))
    }
}

/// Lenient check: the value must convert to the expected type.
fn check_coercible(value: &DataValue, expected: ExpectedType) -> std::result::Result<(), String> {
    match expected {
        ExpectedType::Int => {
            let number = to_number(value)?;
            if number.is_finite() && number.fract() == 0.0 {
                Ok(())
            } else {
                Err("Non-integer value cannot be coerced to int".to_string())
            }
        }
        ExpectedType::Float => to_number(value).map(|_| ()),
        ExpectedType::String => Ok(()),
        ExpectedType::Datetime => match value {
            DataValue::Timestamp(_) => Ok(()),
            DataValue::Int(_) | DataValue::Float(_) => Ok(()),
            DataValue::String(s) => parse_datetime(s).map(|_| ()),
            other => Err(format!("Cannot convert {} to datetime", other.type_name())),
        },
        ExpectedType::Bool => match value {
            DataValue::Bool(_) => Ok(()),
            DataValue::Int(0 | 1) => Ok(()),
            DataValue::Float(f) if *f == 0.0 || *f == 1.0 => Ok(()),
            DataValue::String(s)
                if matches!(s.to_lowercase().as_str(), "true" | "false" | "1" | "0") =>
            {
                Ok(())
            }
            _ => Err("Cannot coerce value to bool".to_string()),
        },
    }
}

fn to_number(value: &DataValue) -> std::result::Result<f64, String> {
    match value {
        DataValue::Int(i) => Ok(*i as f64),
        DataValue::Float(f) => Ok(*f),
        DataValue::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
        DataValue::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| format!("Cannot convert '{}' to a number", s)),
        other => Err(format!("Cannot convert {} to a number", other.type_name())),
    }
}

const NAIVE_DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parses a datetime in any of the accepted text forms.
///
/// Tried in order: RFC 3339, naive ISO-8601 with a `T` or space separator
/// and optional fractional seconds (read as UTC), unix epoch (milliseconds
/// when the value is larger than 10^10, seconds otherwise), `YYYY-MM-DD`
/// (midnight UTC) and finally chrono's own `DateTime<Utc>` parser.
pub fn parse_datetime(text: &str) -> std::result::Result<DateTime<Utc>, String> {
    let text = text.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Ok(dt.with_timezone(&Utc));
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Ok(naive.and_utc());
        }
    }

    if let Ok(epoch) = text.parse::<i64>() {
        let parsed = if epoch > 10_000_000_000 {
            DateTime::from_timestamp_millis(epoch)
        } else {
            DateTime::from_timestamp(epoch, 0)
        };
        if let Some(dt) = parsed {
            return Ok(dt);
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(midnight.and_utc());
        }
    }

    text.parse::<DateTime<Utc>>()
        .map_err(|_| format!("Cannot parse '{}' as datetime", text))
}

impl Validator for TypeValidator {
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
        let expected = self.expected_type()?;
        let strict = self.strict()?;

        let values = dataset
            .column(column)
            .ok_or_else(|| ValidationError::column_not_found(column, Self::NAME))?;

        let mut failures = Vec::new();
        for (row, value) in values {
            if value.is_null() {
                failures.push(FailureDetail::new(row.clone(), DataValue::Null, "Null value"));
                continue;
            }

            let outcome = if strict {
                check_strict(value, expected)
            } else {
                check_coercible(value, expected)
            };
            if let Err(reason) = outcome {
                failures.push(FailureDetail::new(row.clone(), value.clone(), reason));
            }
        }

        Ok(ValidationResult::from_failures(
            Self::NAME,
            dataset.len(),
            failures,
            "type",
        ))
    }
}

impl ValidatorType for TypeValidator {
    const NAME: &'static str = "type";
    const DESCRIPTION: &'static str = "Validate that values are of a specified type";

    fn schema() -> ParamSchema {
        let mut schema = ParamSchema::new();
        schema.insert(
            "expected_type".to_string(),
            ParamSpec::new(
                ParamKind::Text,
                "Expected type ('int', 'float', 'string', 'datetime', 'bool')",
            )
            .required()
            .with_choices(SUPPORTED_TYPES),
        );
        schema.insert(
            "strict".to_string(),
            ParamSpec::new(
                ParamKind::Boolean,
                "Whether to require the exact type without conversion",
            )
            .with_default(false),
        );
        schema
    }

    fn from_params(params: Params) -> Self {
        Self { params }
    }
}
