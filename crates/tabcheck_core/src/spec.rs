//! Declarative validation specifications.
//!
//! A [`PipelineSpec`] is an ordered list of [`ValidationSpec`] entries, each
//! naming a column, a registered validator and that validator's parameters.
//! Order is both execution order and reporting order.

use crate::Params;
use serde::Serialize;

/// One entry of a validation configuration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationSpec {
    /// Column the validator runs against
    pub column: String,

    /// Registered validator name
    pub validator: String,

    /// Validator parameters
    pub params: Params,
}

impl ValidationSpec {
    /// Creates a new spec entry with no parameters.
    pub fn new(column: impl Into<String>, validator: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            validator: validator.into(),
            params: Params::new(),
        }
    }
}

/// Ordered sequence of validations to run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PipelineSpec {
    /// Validation entries in execution order
    pub validations: Vec<ValidationSpec>,
}

impl PipelineSpec {
    /// Creates a pipeline spec from entries.
    pub fn new(validations: Vec<ValidationSpec>) -> Self {
        Self { validations }
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.validations.len()
    }

    /// Returns true if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.validations.is_empty()
    }

    /// Returns an iterator over the entries in order.
    pub fn iter(&self) -> impl Iterator<Item = &ValidationSpec> {
        self.validations.iter()
    }
}

impl FromIterator<ValidationSpec> for PipelineSpec {
    fn from_iter<T: IntoIterator<Item = ValidationSpec>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
