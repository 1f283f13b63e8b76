//! Validator registry.
//!
//! The registry maps validator names to descriptors and constructors. It also
//! holds named validation functions so that configuration files, which cannot
//! carry code, can refer to a callable by name.

use crate::{
    CustomFn, Params, Result, ValidationError, Validator, ValidatorDescriptor, ValidatorType,
};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Constructor stored for a registered validator.
pub type ValidatorConstructor = Arc<dyn Fn(Params) -> Box<dyn Validator> + Send + Sync>;

/// A registry entry: what the validator is and how to build it.
#[derive(Clone)]
pub struct RegisteredValidator {
    descriptor: ValidatorDescriptor,
    constructor: ValidatorConstructor,
}

impl RegisteredValidator {
    /// Returns the validator descriptor.
    pub fn descriptor(&self) -> &ValidatorDescriptor {
        &self.descriptor
    }

    /// Builds an instance with the given parameters.
    pub fn create(&self, params: Params) -> Box<dyn Validator> {
        (self.constructor)(params)
    }
}

impl std::fmt::Debug for RegisteredValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisteredValidator")
            .field("descriptor", &self.descriptor)
            .finish_non_exhaustive()
    }
}

/// Name → validator catalog.
///
/// Registering a name that already exists replaces the previous entry, which
/// is how a built-in is overridden.
///
/// # Example
///
/// ```rust
/// use tabcheck_core::{CustomFn, ValidatorRegistry};
///
/// let mut registry = ValidatorRegistry::new();
/// registry.register_function(CustomFn::predicate("positive", |v| {
///     v.as_float().is_some_and(|f| f > 0.0)
/// }));
///
/// assert!(registry.function("positive").is_some());
/// assert!(registry.list_names().is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ValidatorRegistry {
    validators: BTreeMap<String, RegisteredValidator>,
    functions: BTreeMap<String, CustomFn>,
}

impl ValidatorRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a validator type under its constant name.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::Registration` if the type declares an empty name.
    pub fn register<T: ValidatorType>(&mut self) -> Result<&mut Self> {
        self.register_with(T::descriptor(), |params| -> Box<dyn Validator> {
            Box::new(T::from_params(params))
        })
    }

    /// Registers a validator from a descriptor and a constructor closure.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::Registration` if the descriptor name is empty.
    pub fn register_with<F>(&mut self, descriptor: ValidatorDescriptor, constructor: F) -> Result<&mut Self>
    where
        F: Fn(Params) -> Box<dyn Validator> + Send + Sync + 'static,
    {
        if descriptor.name.trim().is_empty() {
            return Err(ValidationError::Registration(
                "validator name must not be empty".to_string(),
            ));
        }

        self.validators.insert(
            descriptor.name.clone(),
            RegisteredValidator {
                descriptor,
                constructor: Arc::new(constructor),
            },
        );
        Ok(self)
    }

    /// Looks up a validator by name.
    pub fn lookup(&self, name: &str) -> Option<&RegisteredValidator> {
        self.validators.get(name)
    }

    /// Returns true if a validator with this name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.validators.contains_key(name)
    }

    /// Creates a validator instance, or `None` if the name is not registered.
    pub fn create(&self, name: &str, params: Params) -> Option<Box<dyn Validator>> {
        self.lookup(name).map(|entry| entry.create(params))
    }

    /// Returns the registered names in sorted order.
    pub fn list_names(&self) -> Vec<&str> {
        self.validators.keys().map(String::as_str).collect()
    }

    /// Returns the descriptors in name order.
    pub fn descriptors(&self) -> impl Iterator<Item = &ValidatorDescriptor> {
        self.validators.values().map(RegisteredValidator::descriptor)
    }

    /// Registers a named validation function, replacing any previous one.
    pub fn register_function(&mut self, function: CustomFn) -> &mut Self {
        self.functions.insert(function.name().to_string(), function);
        self
    }

    /// Looks up a named validation function.
    pub fn function(&self, name: &str) -> Option<&CustomFn> {
        self.functions.get(name)
    }
}
