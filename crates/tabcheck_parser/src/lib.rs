//! Configuration loader for tabcheck validation pipelines (JSON/YAML formats).
//!
//! A configuration document is a top-level object with a `validations` list.
//! Each entry names a `column`, a registered `validator` and an optional
//! `params` object:
//!
//! ```yaml
//! validations:
//!   - column: age
//!     validator: range
//!     params:
//!       min_value: 0
//!       max_value: 120
//!   - column: email
//!     validator: regex
//!     params:
//!       pattern: "^[^@]+@[^@]+$"
//! ```
//!
//! Loading resolves every entry against a [`ValidatorRegistry`] and
//! normalizes its parameters against the validator's schema: defaults are
//! filled, and unknown, missing or mistyped parameters are rejected with the
//! entry index and parameter name. The resulting [`PipelineSpec`] carries the
//! full declared key set for every entry.
//!
//! # Example
//!
//! ```rust
//! use tabcheck_parser::parse_yaml;
//! use tabcheck_validator::builtin_registry;
//!
//! let yaml = r#"
//! validations:
//!   - column: word
//!     validator: regex
//!     params:
//!       pattern: "^[a-z]+$"
//! "#;
//!
//! let registry = builtin_registry().unwrap();
//! let spec = parse_yaml(yaml, &registry).expect("Failed to parse config");
//! assert_eq!(spec.validations[0].params.len(), 2);
//! ```

use serde_json::{Map, Value};
use std::path::Path;
use tabcheck_core::{
    ParamKind, ParamSchema, ParamSpec, ParamValue, Params, PipelineSpec, ValidationSpec,
    ValidatorRegistry,
};
use thiserror::Error;
use tracing::debug;

/// Errors that can occur while loading a configuration.
#[derive(Debug, Error)]
pub enum ParserError {
    /// JSON parsing failed
    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing failed
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// File I/O error
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Unsupported file format
    #[error("Unsupported configuration file extension '{0}', use .json, .yaml or .yml")]
    UnsupportedFormat(String),

    /// Invalid file extension
    #[error("Invalid or missing file extension")]
    InvalidExtension,

    /// The document does not have the expected top-level shape
    #[error("Invalid configuration: {0}")]
    InvalidStructure(String),

    /// One validation entry is malformed
    #[error("Invalid validation entry {index}, field '{field}': {message}")]
    InvalidEntry {
        index: usize,
        field: String,
        message: String,
    },

    /// An entry references a validator that is not registered
    #[error("Unknown validator '{name}' in validation entry {index}")]
    UnknownValidator { name: String, index: usize },
}

impl ParserError {
    fn entry(index: usize, field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidEntry {
            index,
            field: field.into(),
            message: message.into(),
        }
    }

    /// Returns true for the "referenced validator does not exist" kind.
    pub fn is_unknown_validator(&self) -> bool {
        matches!(self, Self::UnknownValidator { .. })
    }
}

/// Result type alias for parser operations.
pub type Result<T> = std::result::Result<T, ParserError>;

/// Supported configuration file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// JSON format (.json)
    Json,
    /// YAML format (.yml, .yaml)
    Yaml,
}

/// Detect the configuration format from a file path based on its extension.
///
/// # Supported Extensions
///
/// * `.json` → `ConfigFormat::Json`
/// * `.yaml`, `.yml` → `ConfigFormat::Yaml`
///
/// # Errors
///
/// Returns `ParserError::InvalidExtension` if the file has no extension.
/// Returns `ParserError::UnsupportedFormat` if the extension is not recognized.
pub fn detect_format(path: &Path) -> Result<ConfigFormat> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .ok_or(ParserError::InvalidExtension)?;

    match extension.to_lowercase().as_str() {
        "json" => Ok(ConfigFormat::Json),
        "yaml" | "yml" => Ok(ConfigFormat::Yaml),
        other => Err(ParserError::UnsupportedFormat(format!(".{}", other))),
    }
}

/// Parse and normalize a configuration from a JSON string.
pub fn parse_json(content: &str, registry: &ValidatorRegistry) -> Result<PipelineSpec> {
    load(content, ConfigFormat::Json, registry)
}

/// Parse and normalize a configuration from a YAML string.
pub fn parse_yaml(content: &str, registry: &ValidatorRegistry) -> Result<PipelineSpec> {
    load(content, ConfigFormat::Yaml, registry)
}

/// Parse and normalize a configuration in the given format.
///
/// # Errors
///
/// Fails on the first problem found; nothing is partially applied.
/// Unregistered validators yield `ParserError::UnknownValidator`, every other
/// entry-level problem yields `ParserError::InvalidEntry`.
pub fn load(content: &str, format: ConfigFormat, registry: &ValidatorRegistry) -> Result<PipelineSpec> {
    let document: Value = match format {
        ConfigFormat::Json => serde_json::from_str(content)?,
        ConfigFormat::Yaml => serde_yaml_ng::from_str(content)?,
    };
    load_value(&document, registry)
}

/// Parse a configuration file with automatic format detection.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use tabcheck_parser::parse_file;
/// use tabcheck_validator::builtin_registry;
///
/// let registry = builtin_registry().unwrap();
/// let spec = parse_file(Path::new("checks/orders.yml"), &registry).unwrap();
/// println!("Loaded {} validations", spec.len());
/// ```
pub fn parse_file(path: &Path, registry: &ValidatorRegistry) -> Result<PipelineSpec> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;
    load(&content, format, registry)
}

/// Normalize an already parsed configuration document.
pub fn load_value(document: &Value, registry: &ValidatorRegistry) -> Result<PipelineSpec> {
    let root = document.as_object().ok_or_else(|| {
        ParserError::InvalidStructure("top level must be an object".to_string())
    })?;

    let entries = root
        .get("validations")
        .ok_or_else(|| {
            ParserError::InvalidStructure(
                "configuration must contain a 'validations' list".to_string(),
            )
        })?
        .as_array()
        .ok_or_else(|| ParserError::InvalidStructure("'validations' must be a list".to_string()))?;

    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| parse_entry(index, entry, registry))
        .collect()
}

fn parse_entry(index: usize, entry: &Value, registry: &ValidatorRegistry) -> Result<ValidationSpec> {
    let entry = entry
        .as_object()
        .ok_or_else(|| ParserError::entry(index, "entry", "validation entry must be an object"))?;

    let column = required_text(index, entry, "column")?;
    let validator = required_text(index, entry, "validator")?;

    let mut params = Params::new();
    match entry.get("params") {
        None | Some(Value::Null) => {}
        Some(Value::Object(raw)) => {
            for (name, value) in raw {
                let value = ParamValue::from_json(value).ok_or_else(|| {
                    ParserError::entry(index, name, "parameter values must be scalars")
                })?;
                params.insert(name.clone(), value);
            }
        }
        Some(_) => return Err(ParserError::entry(index, "params", "must be an object")),
    }

    let spec = ValidationSpec {
        column,
        validator,
        params,
    };
    normalize_entry(index, &spec, registry)
}

fn required_text(index: usize, entry: &Map<String, Value>, field: &str) -> Result<String> {
    match entry.get(field) {
        None | Some(Value::Null) => Err(ParserError::entry(
            index,
            field,
            "validation entry must contain 'column' and 'validator' keys",
        )),
        Some(Value::String(text)) => Ok(text.clone()),
        Some(_) => Err(ParserError::entry(index, field, "must be a string")),
    }
}

/// Normalize a programmatically built spec with the same rules a loaded
/// configuration goes through.
pub fn normalize_spec(spec: &PipelineSpec, registry: &ValidatorRegistry) -> Result<PipelineSpec> {
    spec.iter()
        .enumerate()
        .map(|(index, entry)| normalize_entry(index, entry, registry))
        .collect()
}

fn normalize_entry(
    index: usize,
    spec: &ValidationSpec,
    registry: &ValidatorRegistry,
) -> Result<ValidationSpec> {
    let registered = registry
        .lookup(&spec.validator)
        .ok_or_else(|| ParserError::UnknownValidator {
            name: spec.validator.clone(),
            index,
        })?;

    let params = normalize_params(index, spec, &registered.descriptor().params, registry)?;

    Ok(ValidationSpec {
        column: spec.column.clone(),
        validator: spec.validator.clone(),
        params,
    })
}

/// Check one entry's parameters against a validator schema.
///
/// Returns a map with exactly the schema's keys: supplied values, then
/// defaults, then null for optional parameters with no default.
pub fn normalize_params(
    index: usize,
    spec: &ValidationSpec,
    schema: &ParamSchema,
    registry: &ValidatorRegistry,
) -> Result<Params> {
    if let Some(unknown) = spec.params.keys().find(|name| !schema.contains_key(*name)) {
        return Err(ParserError::entry(
            index,
            unknown,
            format!("unknown parameter for validator '{}'", spec.validator),
        ));
    }

    let mut normalized = Params::new();
    for (name, param) in schema {
        let supplied = spec.params.get(name).filter(|value| !value.is_null());
        let value = match (supplied, &param.default) {
            (Some(value), _) => value.clone(),
            (None, Some(default)) => {
                debug!(
                    "Entry {}: filling default {}={} for validator '{}'",
                    index, name, default, spec.validator
                );
                default.clone()
            }
            (None, None) if param.required => {
                return Err(ParserError::entry(
                    index,
                    name,
                    format!(
                        "missing required parameter '{}' for validator '{}' (column '{}')",
                        name, spec.validator, spec.column
                    ),
                ));
            }
            (None, None) => ParamValue::Null,
        };

        let value = check_param(index, &spec.validator, name, param, value, registry)?;
        normalized.insert(name.clone(), value);
    }

    Ok(normalized)
}

/// Type-checks one non-default value, resolving named functions for
/// callable parameters.
fn check_param(
    index: usize,
    validator: &str,
    name: &str,
    param: &ParamSpec,
    value: ParamValue,
    registry: &ValidatorRegistry,
) -> Result<ParamValue> {
    if value.is_null() {
        return Ok(value);
    }

    let value = match value {
        ParamValue::Text(function_name) if param.kinds.contains(&ParamKind::Callable) => {
            match registry.function(&function_name) {
                Some(function) => ParamValue::Function(function.clone()),
                None => ParamValue::Text(function_name),
            }
        }
        other => other,
    };

    if !param.accepts(&value) {
        let message = if param.kinds == [ParamKind::Callable] {
            format!("parameter for validator '{}' must be callable", validator)
        } else {
            format!(
                "parameter for validator '{}' must be of type {}, got {}",
                validator,
                param.kinds_display(),
                value.kind_name()
            )
        };
        return Err(ParserError::entry(index, name, message));
    }

    if let (Some(choices), ParamValue::Text(text)) = (&param.choices, &value) {
        if !choices.iter().any(|choice| choice.eq_ignore_ascii_case(text)) {
            return Err(ParserError::entry(
                index,
                name,
                format!("must be one of: {}", choices.join(", ")),
            ));
        }
    }

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tabcheck_core::{CustomFn, PipelineSpecBuilder, ValidationSpecBuilder};
    use tabcheck_validator::builtin_registry;

    fn registry() -> ValidatorRegistry {
        let mut registry = builtin_registry().unwrap();
        registry.register_function(CustomFn::predicate("is_positive", |v| {
            v.as_float().is_some_and(|f| f > 0.0)
        }));
        registry
    }

    fn entry_error(result: Result<PipelineSpec>) -> (usize, String, String) {
        match result {
            Err(ParserError::InvalidEntry {
                index,
                field,
                message,
            }) => (index, field, message),
            other => panic!("expected InvalidEntry, got {:?}", other),
        }
    }

    #[test]
    fn test_detect_format() {
        assert_eq!(detect_format(Path::new("a.json")).unwrap(), ConfigFormat::Json);
        assert_eq!(detect_format(Path::new("a.YML")).unwrap(), ConfigFormat::Yaml);
        assert_eq!(detect_format(Path::new("a.yaml")).unwrap(), ConfigFormat::Yaml);
        assert!(matches!(
            detect_format(Path::new("a.toml")),
            Err(ParserError::UnsupportedFormat(_))
        ));
        assert!(matches!(
            detect_format(Path::new("config")),
            Err(ParserError::InvalidExtension)
        ));
    }

    #[test]
    fn test_required_only_yields_full_key_set() {
        let json = r#"{"validations": [{"column": "w", "validator": "regex", "params": {"pattern": "^a"}}]}"#;
        let spec = parse_json(json, &registry()).unwrap();

        let params = &spec.validations[0].params;
        assert_eq!(
            params.keys().collect::<Vec<_>>(),
            vec!["case_sensitive", "pattern"]
        );
        assert_eq!(params["case_sensitive"], ParamValue::Bool(true));
    }

    #[test]
    fn test_optional_without_default_is_null() {
        let json = r#"{"validations": [{"column": "n", "validator": "range"}]}"#;
        let spec = parse_json(json, &registry()).unwrap();

        let params = &spec.validations[0].params;
        assert_eq!(params.len(), 3);
        assert_eq!(params["min_value"], ParamValue::Null);
        assert_eq!(params["inclusive"], ParamValue::Bool(true));
    }

    #[test]
    fn test_unknown_validator_kind() {
        let json = r#"{"validations": [
            {"column": "a", "validator": "null_check"},
            {"column": "a", "validator": "nope"}
        ]}"#;
        let err = parse_json(json, &registry()).unwrap_err();

        assert!(err.is_unknown_validator());
        assert!(matches!(err, ParserError::UnknownValidator { index: 1, .. }));
    }

    #[test]
    fn test_missing_required_param() {
        let json = r#"{"validations": [
            {"column": "a", "validator": "null_check"},
            {"column": "t", "validator": "type"}
        ]}"#;
        let (index, field, message) = entry_error(parse_json(json, &registry()));

        assert_eq!(index, 1);
        assert_eq!(field, "expected_type");
        assert!(message.contains("missing required parameter 'expected_type'"));
    }

    #[test]
    fn test_explicit_null_for_required_counts_as_missing() {
        let json = r#"{"validations": [{"column": "w", "validator": "regex", "params": {"pattern": null}}]}"#;
        let (_, field, message) = entry_error(parse_json(json, &registry()));
        assert_eq!(field, "pattern");
        assert!(message.contains("missing required parameter"));
    }

    #[test]
    fn test_unknown_param() {
        let json = r#"{"validations": [{"column": "n", "validator": "range", "params": {"minimum": 1}}]}"#;
        let (index, field, _) = entry_error(parse_json(json, &registry()));
        assert_eq!((index, field.as_str()), (0, "minimum"));
    }

    #[test]
    fn test_mistyped_param() {
        let json = r#"{"validations": [{"column": "n", "validator": "range", "params": {"inclusive": "yes"}}]}"#;
        let (_, field, message) = entry_error(parse_json(json, &registry()));
        assert_eq!(field, "inclusive");
        assert!(message.contains("must be of type boolean, got text"));
    }

    #[test]
    fn test_bool_is_not_a_number() {
        let json = r#"{"validations": [{"column": "n", "validator": "range", "params": {"min_value": true}}]}"#;
        let (_, field, _) = entry_error(parse_json(json, &registry()));
        assert_eq!(field, "min_value");
    }

    #[test]
    fn test_choices_enforced() {
        let json = r#"{"validations": [{"column": "t", "validator": "type", "params": {"expected_type": "decimal"}}]}"#;
        let (_, field, message) = entry_error(parse_json(json, &registry()));
        assert_eq!(field, "expected_type");
        assert!(message.contains("must be one of: int, float, string, datetime, bool"));
    }

    #[test]
    fn test_named_function_resolved() {
        let yaml = r#"
validations:
  - column: amount
    validator: custom_function
    params:
      validation_func: is_positive
"#;
        let spec = parse_yaml(yaml, &registry()).unwrap();
        let func = spec.validations[0].params["validation_func"].as_function().unwrap();
        assert_eq!(func.name(), "is_positive");
        assert_eq!(spec.validations[0].params["error_message"], ParamValue::Null);
    }

    #[test]
    fn test_unresolved_function_must_be_callable() {
        let yaml = r#"
validations:
  - column: amount
    validator: custom_function
    params:
      validation_func: not_registered
"#;
        let (_, field, message) = entry_error(parse_yaml(yaml, &registry()));
        assert_eq!(field, "validation_func");
        assert!(message.ends_with("must be callable"));
    }

    #[test]
    fn test_structural_errors() {
        let registry = registry();
        for doc in ["[]", r#"{"checks": []}"#, r#"{"validations": {}}"#] {
            assert!(matches!(
                parse_json(doc, &registry),
                Err(ParserError::InvalidStructure(_))
            ));
        }

        let (index, field, _) = entry_error(parse_json(r#"{"validations": [42]}"#, &registry));
        assert_eq!((index, field.as_str()), (0, "entry"));

        let (_, field, _) = entry_error(parse_json(
            r#"{"validations": [{"validator": "null_check"}]}"#,
            &registry,
        ));
        assert_eq!(field, "column");
    }

    #[test]
    fn test_malformed_source() {
        assert!(matches!(
            parse_json("{not json", &registry()),
            Err(ParserError::Json(_))
        ));
        assert!(matches!(
            parse_yaml("validations: [unclosed", &registry()),
            Err(ParserError::Yaml(_))
        ));
    }

    #[test]
    fn test_normalize_programmatic_spec() {
        let spec = PipelineSpecBuilder::new()
            .validation(
                ValidationSpecBuilder::new("n", "null_check")
                    .param("allow_null", true)
                    .build(),
            )
            .build();

        let normalized = normalize_spec(&spec, &registry()).unwrap();
        let params = &normalized.validations[0].params;
        assert_eq!(params["allow_null"], ParamValue::Bool(true));
        assert_eq!(params["max_null_percent"], ParamValue::Null);
    }
}
