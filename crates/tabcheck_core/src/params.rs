//! Validator parameters and parameter schemas.
//!
//! Every validator declares a [`ParamSchema`]: a mapping from parameter name
//! to [`ParamSpec`]. The configuration loader uses the schema to fill defaults
//! and reject unknown, missing or mistyped parameters before a validator is
//! ever constructed.

use crate::DataValue;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Signature of a user-supplied validation function.
///
/// `Ok(true)` passes the value, `Ok(false)` fails it, and `Err` reports a fault
/// raised while checking it.
pub type ValidationFn = dyn Fn(&DataValue) -> std::result::Result<bool, String> + Send + Sync;

/// A named, shareable validation function.
#[derive(Clone)]
pub struct CustomFn {
    name: String,
    func: Arc<ValidationFn>,
}

impl CustomFn {
    /// Wraps a closure under the given name.
    pub fn new<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&DataValue) -> std::result::Result<bool, String> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            func: Arc::new(func),
        }
    }

    /// Wraps a plain predicate that cannot fault.
    pub fn predicate<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&DataValue) -> bool + Send + Sync + 'static,
    {
        Self::new(name, move |value| Ok(func(value)))
    }

    /// Returns the function's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Invokes the function on a value.
    pub fn call(&self, value: &DataValue) -> std::result::Result<bool, String> {
        (self.func)(value)
    }
}

impl fmt::Debug for CustomFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomFn").field("name", &self.name).finish()
    }
}

impl PartialEq for CustomFn {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && Arc::ptr_eq(&self.func, &other.func)
    }
}

/// Value of a validator parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    /// Explicitly absent
    Null,
    /// Boolean flag
    Bool(bool),
    /// Integer number
    Int(i64),
    /// Floating point number
    Float(f64),
    /// Text
    Text(String),
    /// Callable
    Function(CustomFn),
}

impl ParamValue {
    /// Returns true if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, ParamValue::Null)
    }

    /// Returns the number as a float, for either numeric variant.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ParamValue::Int(i) => Some(*i as f64),
            ParamValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Returns the boolean value.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ParamValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ParamValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the function value.
    pub fn as_function(&self) -> Option<&CustomFn> {
        match self {
            ParamValue::Function(f) => Some(f),
            _ => None,
        }
    }

    /// Returns a short name of the value's kind, for error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            ParamValue::Null => "null",
            ParamValue::Bool(_) => "boolean",
            ParamValue::Int(_) => "integer",
            ParamValue::Float(_) => "float",
            ParamValue::Text(_) => "text",
            ParamValue::Function(_) => "callable",
        }
    }

    /// Converts a scalar JSON value. Arrays and objects are not parameter
    /// values and yield `None`.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Null => Some(ParamValue::Null),
            serde_json::Value::Bool(b) => Some(ParamValue::Bool(*b)),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Some(ParamValue::Int(i)),
                None => n.as_f64().map(ParamValue::Float),
            },
            serde_json::Value::String(s) => Some(ParamValue::Text(s.clone())),
            serde_json::Value::Array(_) | serde_json::Value::Object(_) => None,
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Null => write!(f, "null"),
            ParamValue::Bool(b) => write!(f, "{}", b),
            ParamValue::Int(i) => write!(f, "{}", i),
            ParamValue::Float(v) => write!(f, "{}", v),
            ParamValue::Text(s) => write!(f, "{}", s),
            ParamValue::Function(func) => write!(f, "<function {}>", func.name()),
        }
    }
}

impl Serialize for ParamValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            ParamValue::Null => serializer.serialize_none(),
            ParamValue::Bool(b) => serializer.serialize_bool(*b),
            ParamValue::Int(i) => serializer.serialize_i64(*i),
            ParamValue::Float(v) => serializer.serialize_f64(*v),
            ParamValue::Text(s) => serializer.serialize_str(s),
            ParamValue::Function(func) => serializer.serialize_str(func.name()),
        }
    }
}

impl From<bool> for ParamValue {
    fn from(b: bool) -> Self {
        ParamValue::Bool(b)
    }
}

impl From<i64> for ParamValue {
    fn from(i: i64) -> Self {
        ParamValue::Int(i)
    }
}

impl From<i32> for ParamValue {
    fn from(i: i32) -> Self {
        ParamValue::Int(i64::from(i))
    }
}

impl From<f64> for ParamValue {
    fn from(f: f64) -> Self {
        ParamValue::Float(f)
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        ParamValue::Text(s.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self {
        ParamValue::Text(s)
    }
}

impl From<CustomFn> for ParamValue {
    fn from(f: CustomFn) -> Self {
        ParamValue::Function(f)
    }
}

/// Parameter values keyed by parameter name.
pub type Params = BTreeMap<String, ParamValue>;

/// Primitive kind a parameter accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamKind {
    /// Integer or float (booleans are not numbers)
    Number,
    /// Boolean
    Boolean,
    /// Text
    Text,
    /// A callable validation function
    Callable,
}

impl ParamKind {
    /// Returns true if a non-null value is of this kind.
    pub fn accepts(&self, value: &ParamValue) -> bool {
        matches!(
            (self, value),
            (ParamKind::Number, ParamValue::Int(_) | ParamValue::Float(_))
                | (ParamKind::Boolean, ParamValue::Bool(_))
                | (ParamKind::Text, ParamValue::Text(_))
                | (ParamKind::Callable, ParamValue::Function(_))
        )
    }
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ParamKind::Number => "number",
            ParamKind::Boolean => "boolean",
            ParamKind::Text => "text",
            ParamKind::Callable => "callable",
        };
        write!(f, "{}", name)
    }
}

/// Metadata for one validator parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParamSpec {
    /// Accepted kinds (any one suffices)
    pub kinds: Vec<ParamKind>,
    /// Value used when the parameter is not supplied
    pub default: Option<ParamValue>,
    /// Whether the parameter must be supplied when it has no default
    pub required: bool,
    /// Human-readable description
    pub description: String,
    /// Allowed text values, if the parameter is an enumeration
    #[serde(skip_serializing_if = "Option::is_none")]
    pub choices: Option<Vec<String>>,
}

impl ParamSpec {
    /// Creates an optional parameter of one kind with no default.
    pub fn new(kind: ParamKind, description: impl Into<String>) -> Self {
        Self {
            kinds: vec![kind],
            default: None,
            required: false,
            description: description.into(),
            choices: None,
        }
    }

    /// Marks the parameter as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Sets the default value.
    pub fn with_default(mut self, default: impl Into<ParamValue>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Restricts a text parameter to a fixed set of values.
    pub fn with_choices<I, S>(mut self, choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.choices = Some(choices.into_iter().map(Into::into).collect());
        self
    }

    /// Returns true if a non-null value matches one of the accepted kinds.
    pub fn accepts(&self, value: &ParamValue) -> bool {
        self.kinds.iter().any(|kind| kind.accepts(value))
    }

    /// Returns a display form of the accepted kinds, e.g. `number`.
    pub fn kinds_display(&self) -> String {
        self.kinds
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" | ")
    }
}

/// Parameter schema of a validator, keyed by parameter name.
pub type ParamSchema = BTreeMap<String, ParamSpec>;

/// Identity of a validator type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidatorDescriptor {
    /// Unique registry key
    pub name: String,
    /// Human-readable description
    pub description: String,
    /// Declared parameters
    pub params: ParamSchema,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_kind_dispatch() {
        assert!(ParamKind::Number.accepts(&ParamValue::Int(1)));
        assert!(ParamKind::Number.accepts(&ParamValue::Float(1.5)));
        assert!(!ParamKind::Number.accepts(&ParamValue::Bool(true)));
        assert!(ParamKind::Boolean.accepts(&ParamValue::Bool(false)));
        assert!(!ParamKind::Text.accepts(&ParamValue::Int(0)));

        let func = CustomFn::predicate("always", |_| true);
        assert!(ParamKind::Callable.accepts(&ParamValue::Function(func)));
        assert!(!ParamKind::Callable.accepts(&ParamValue::Text("always".into())));
    }

    #[test]
    fn test_param_from_json() {
        assert_eq!(ParamValue::from_json(&json!(3)), Some(ParamValue::Int(3)));
        assert_eq!(ParamValue::from_json(&json!(2.5)), Some(ParamValue::Float(2.5)));
        assert_eq!(ParamValue::from_json(&json!("x")), Some(ParamValue::Text("x".into())));
        assert_eq!(ParamValue::from_json(&json!(null)), Some(ParamValue::Null));
        assert_eq!(ParamValue::from_json(&json!([1, 2])), None);
    }

    #[test]
    fn test_param_spec_builder() {
        let spec = ParamSpec::new(ParamKind::Text, "Expected type")
            .required()
            .with_choices(["int", "float"]);

        assert!(spec.required);
        assert_eq!(spec.default, None);
        assert_eq!(spec.choices, Some(vec!["int".to_string(), "float".to_string()]));
        assert_eq!(spec.kinds_display(), "text");
    }

    #[test]
    fn test_custom_fn_call() {
        let positive = CustomFn::new("positive", |value| match value.as_float() {
            Some(v) => Ok(v > 0.0),
            None => Err("not a number".to_string()),
        });

        assert_eq!(positive.call(&DataValue::Int(3)), Ok(true));
        assert_eq!(positive.call(&DataValue::Int(-3)), Ok(false));
        assert!(positive.call(&DataValue::from("x")).is_err());
        assert_eq!(ParamValue::from(positive).to_string(), "<function positive>");
    }
}
