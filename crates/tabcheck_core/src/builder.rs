//! Builder pattern for creating validation specs.
//!
//! This module provides ergonomic builders for constructing pipeline specs
//! in code with a fluent API, as an alternative to configuration files.

use crate::{ParamValue, Params, PipelineSpec, ValidationSpec};

/// Builder for creating a `PipelineSpec`.
///
/// # Example
///
/// ```rust
/// use tabcheck_core::{PipelineSpecBuilder, ValidationSpecBuilder};
///
/// let spec = PipelineSpecBuilder::new()
///     .validation(ValidationSpecBuilder::new("email", "regex").param("pattern", "^.+@.+$").build())
///     .check("email", "null_check")
///     .build();
///
/// assert_eq!(spec.len(), 2);
/// ```
#[derive(Debug, Default)]
pub struct PipelineSpecBuilder {
    validations: Vec<ValidationSpec>,
}

impl PipelineSpecBuilder {
    /// Creates an empty pipeline builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a validation entry.
    pub fn validation(mut self, spec: ValidationSpec) -> Self {
        self.validations.push(spec);
        self
    }

    /// Appends a validation entry that takes no parameters.
    pub fn check(self, column: impl Into<String>, validator: impl Into<String>) -> Self {
        self.validation(ValidationSpec::new(column, validator))
    }

    /// Builds the pipeline spec.
    pub fn build(self) -> PipelineSpec {
        PipelineSpec::new(self.validations)
    }
}

/// Builder for creating a `ValidationSpec`.
///
/// # Example
///
/// ```rust
/// use tabcheck_core::{ParamValue, ValidationSpecBuilder};
///
/// let spec = ValidationSpecBuilder::new("age", "range")
///     .param("min_value", 0)
///     .param("inclusive", false)
///     .build();
///
/// assert_eq!(spec.params.get("inclusive"), Some(&ParamValue::Bool(false)));
/// ```
#[derive(Debug)]
pub struct ValidationSpecBuilder {
    column: String,
    validator: String,
    params: Params,
}

impl ValidationSpecBuilder {
    /// Creates a new entry builder for a column and validator name.
    pub fn new(column: impl Into<String>, validator: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            validator: validator.into(),
            params: Params::new(),
        }
    }

    /// Sets a parameter value.
    pub fn param(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// Builds the entry.
    pub fn build(self) -> ValidationSpec {
        ValidationSpec {
            column: self.column,
            validator: self.validator,
            params: self.params,
        }
    }
}
