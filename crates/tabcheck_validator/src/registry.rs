//! Built-in validator registration and the process-wide registry.
//!
//! Built-ins are registered by an explicit routine rather than at type
//! definition, so the registry contents never depend on link or import order.
//! The process-wide registry must be initialized with [`init`] before
//! [`global`] is used; library entry points take a `&ValidatorRegistry`
//! argument and do not require it.

use crate::{
    CustomFunctionValidator, NullCheckValidator, RangeValidator, RegexValidator, TypeValidator,
};
use std::sync::{OnceLock, RwLock};
use tabcheck_core::{Result, ValidationError, ValidatorRegistry};
use tracing::debug;

static GLOBAL_REGISTRY: OnceLock<RwLock<ValidatorRegistry>> = OnceLock::new();

/// Registers the five built-in validators into `registry`.
///
/// Existing entries with the same names are replaced.
pub fn register_builtins(registry: &mut ValidatorRegistry) -> Result<()> {
    registry
        .register::<RangeValidator>()?
        .register::<NullCheckValidator>()?
        .register::<RegexValidator>()?
        .register::<TypeValidator>()?
        .register::<CustomFunctionValidator>()?;

    debug!("Registered built-in validators: {:?}", registry.list_names());
    Ok(())
}

/// Creates a registry holding only the built-in validators.
pub fn builtin_registry() -> Result<ValidatorRegistry> {
    let mut registry = ValidatorRegistry::new();
    register_builtins(&mut registry)?;
    Ok(registry)
}

/// Initializes the process-wide registry with the built-ins.
///
/// Calling it again returns the already initialized registry unchanged.
pub fn init() -> Result<&'static RwLock<ValidatorRegistry>> {
    if let Some(registry) = GLOBAL_REGISTRY.get() {
        return Ok(registry);
    }

    let registry = builtin_registry()?;
    Ok(GLOBAL_REGISTRY.get_or_init(|| RwLock::new(registry)))
}

/// Returns the process-wide registry.
///
/// # Errors
///
/// Returns `ValidationError::InvalidState` if [`init`] has not been called.
pub fn global() -> Result<&'static RwLock<ValidatorRegistry>> {
    GLOBAL_REGISTRY
        .get()
        .ok_or_else(|| ValidationError::invalid_state("validator registry is not initialized"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tabcheck_core::{Params, ValidatorType};

    #[test]
    fn test_builtin_names() {
        let registry = builtin_registry().unwrap();
        assert_eq!(
            registry.list_names(),
            vec!["custom_function", "null_check", "range", "regex", "type"]
        );
    }

    #[test]
    fn test_builtin_descriptors_match_types() {
        let registry = builtin_registry().unwrap();
        let range = registry.lookup("range").unwrap().descriptor();
        assert_eq!(range.description, RangeValidator::DESCRIPTION);
        assert_eq!(
            range.params.keys().collect::<Vec<_>>(),
            vec!["inclusive", "max_value", "min_value"]
        );

        let regex = registry.lookup("regex").unwrap().descriptor();
        assert!(regex.params["pattern"].required);
    }

    #[test]
    fn test_create_builtin() {
        let registry = builtin_registry().unwrap();
        let validator = registry.create("null_check", Params::new()).unwrap();
        assert_eq!(validator.name(), "null_check");
        assert!(validator.required_params().contains_key("allow_null"));
    }

    #[test]
    fn test_global_registry() {
        let registry = init().unwrap();
        assert!(registry.read().unwrap().contains("type"));

        let again = global().unwrap();
        assert!(std::ptr::eq(registry, again));
        assert!(std::ptr::eq(init().unwrap(), again));
    }
}
