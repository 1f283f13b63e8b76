//! # tabcheck validators
//!
//! Validation engine for tabcheck. This crate provides:
//!
//! - The built-in column validators (`range`, `null_check`, `regex`, `type`,
//!   `custom_function`)
//! - The registration routine that loads them into a [`ValidatorRegistry`],
//!   and the process-wide registry
//! - The [`ValidationPipeline`] that runs a [`PipelineSpec`] against a
//!   [`DataSet`] and renders a summary
//!
//! ## Example
//!
//! ```rust
//! use tabcheck_core::{DataSet, DataValue, PipelineSpecBuilder, ValidationSpecBuilder};
//! use tabcheck_validator::{builtin_registry, ValidationPipeline};
//!
//! let registry = builtin_registry().unwrap();
//! let spec = PipelineSpecBuilder::new()
//!     .validation(
//!         ValidationSpecBuilder::new("age", "range")
//!             .param("min_value", 0)
//!             .param("max_value", 120)
//!             .build(),
//!     )
//!     .build();
//!
//! let dataset = DataSet::from_columns(vec![("age", vec![DataValue::Int(34), DataValue::Int(140)])]);
//! let mut pipeline = ValidationPipeline::new(&spec, &registry).unwrap();
//! let result = pipeline.run(&dataset).unwrap();
//!
//! assert!(!result.passed);
//! println!("{}", pipeline.summary().unwrap());
//! ```

mod custom;
mod null_check;
mod pattern;
mod pipeline;
mod range;
mod registry;
mod type_check;

pub use custom::*;
pub use null_check::*;
pub use pattern::*;
pub use pipeline::*;
pub use range::*;
pub use registry::*;
pub use type_check::*;

pub use tabcheck_core::{
    DataSet, PipelineResult, PipelineSpec, ValidationError, ValidationResult, Validator,
    ValidatorRegistry,
};
