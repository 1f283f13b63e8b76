//! Error types for the validation engine.
//!
//! Per-row validation failures are not errors: they are recorded as
//! [`FailureDetail`](crate::FailureDetail) entries. The variants here cover the
//! conditions that abort a registration, a pipeline construction or a run.

use thiserror::Error;

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, ValidationError>;

/// Errors raised by validators, the registry and the pipeline.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Malformed or inconsistent configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A spec entry references a validator that is not registered
    #[error("Unknown validator '{name}' in validation entry {index}")]
    UnknownValidator { name: String, index: usize },

    /// The target column does not exist in the table
    #[error("Column '{column}' not found in input data (validator '{validator}')")]
    ColumnNotFound { column: String, validator: String },

    /// A parameter needed at execution time is absent
    #[error("Parameter '{param}' is required for validator '{validator}'")]
    MissingParameter { validator: String, param: String },

    /// A parameter is present but unusable
    #[error("Invalid parameter '{param}' for validator '{validator}': {message}")]
    InvalidParameter {
        validator: String,
        param: String,
        message: String,
    },

    /// The regex pattern does not compile
    #[error("Invalid regular expression pattern '{pattern}': {error}")]
    InvalidRegex { pattern: String, error: String },

    /// The table handed to the engine is inconsistent
    #[error("Invalid table: {0}")]
    InvalidTable(String),

    /// A validator type could not be registered
    #[error("Failed to register validator: {0}")]
    Registration(String),

    /// The operation is not valid in the current state
    #[error("Invalid state: {0}")]
    InvalidState(String),
}

impl ValidationError {
    /// Creates a new configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }

    /// Creates a new unknown validator error.
    pub fn unknown_validator(name: impl Into<String>, index: usize) -> Self {
        Self::UnknownValidator {
            name: name.into(),
            index,
        }
    }

    /// Creates a new missing column error.
    pub fn column_not_found(column: impl Into<String>, validator: impl Into<String>) -> Self {
        Self::ColumnNotFound {
            column: column.into(),
            validator: validator.into(),
        }
    }

    /// Creates a new missing parameter error.
    pub fn missing_param(validator: impl Into<String>, param: impl Into<String>) -> Self {
        Self::MissingParameter {
            validator: validator.into(),
            param: param.into(),
        }
    }

    /// Creates a new invalid parameter error.
    pub fn invalid_param(
        validator: impl Into<String>,
        param: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidParameter {
            validator: validator.into(),
            param: param.into(),
            message: message.into(),
        }
    }

    /// Creates a new invalid state error.
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState(message.into())
    }

    /// Returns true for the "referenced validator does not exist" kind.
    pub fn is_unknown_validator(&self) -> bool {
        matches!(self, Self::UnknownValidator { .. })
    }

    /// Returns true for configuration-class errors, including those only
    /// detectable at run time (missing column, unusable parameters).
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidConfig(_)
                | Self::ColumnNotFound { .. }
                | Self::MissingParameter { .. }
                | Self::InvalidParameter { .. }
                | Self::InvalidRegex { .. }
        )
    }
}
