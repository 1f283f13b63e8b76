//! # tabcheck core
//!
//! Core data structures and types for the tabcheck validation engine.
//!
//! This crate provides the building blocks shared by the configuration loader,
//! the built-in validators and the pipeline: the in-memory table a validator
//! reads, the parameter schema every validator declares, the declarative
//! validation specs, the structured results, and the registry that maps
//! validator names to constructors.
//!
//! ## Key Concepts
//!
//! - **Validator**: a named check against one column of a [`DataSet`]
//! - **Registry**: the name → constructor catalog ([`ValidatorRegistry`])
//! - **Spec**: what to run ([`PipelineSpec`], [`ValidationSpec`])
//! - **Result**: what happened ([`PipelineResult`], [`ValidationResult`])
//!
//! ## Example
//!
//! ```rust
//! use tabcheck_core::{PipelineSpecBuilder, ValidationSpecBuilder};
//!
//! let spec = PipelineSpecBuilder::new()
//!     .validation(
//!         ValidationSpecBuilder::new("age", "range")
//!             .param("min_value", 0)
//!             .param("max_value", 120)
//!             .build(),
//!     )
//!     .build();
//!
//! assert_eq!(spec.len(), 1);
//! assert_eq!(spec.validations[0].validator, "range");
//! ```

pub mod builder;
pub mod dataset;
pub mod error;
pub mod params;
pub mod registry;
pub mod spec;
pub mod validator;

pub use builder::*;
pub use dataset::*;
pub use error::*;
pub use params::*;
pub use registry::*;
pub use spec::*;
pub use validator::*;
