//! Type tokens and operation signatures.
//!
//! A [`TypeToken`] is the language-neutral type of a parameter, result or
//! field. Runtime values are plain [`serde_json::Value`]s, and
//! [`TypeToken::accepts`] is the check applied to every argument before an
//! operation is dispatched.
//!
//! ```
//! use portico_core::types::{Signature, TypeToken};
//! use serde_json::json;
//!
//! assert!(TypeToken::String.accepts(&json!("hi")));
//! assert!(!TypeToken::Integer.accepts(&json!(1.5)));
//!
//! let sig = Signature::new("sayHello", vec![TypeToken::String]);
//! assert_eq!(sig.to_string(), "sayHello(string)");
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// The declared type of a parameter, result or field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeToken {
    /// UTF-8 string.
    String,
    /// Integral number.
    Integer,
    /// Any JSON number.
    Number,
    /// Boolean.
    Boolean,
    /// Homogeneous array.
    Array(Box<TypeToken>),
    /// Anonymous JSON object.
    Object,
    /// Named aggregate type, carried as a JSON object.
    Named(String),
    /// Any value, including null.
    Any,
    /// No value. Only representable as a return type.
    Void,
}

impl TypeToken {
    /// Creates an array type token.
    #[must_use]
    pub fn array(items: TypeToken) -> Self {
        Self::Array(Box::new(items))
    }

    /// Creates a named aggregate type token.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    /// Returns `true` if the value conforms to this type.
    #[must_use]
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Integer => value.is_i64() || value.is_u64(),
            Self::Number => value.is_number(),
            Self::Boolean => value.is_boolean(),
            Self::Array(items) => value
                .as_array()
                .is_some_and(|values| values.iter().all(|v| items.accepts(v))),
            Self::Object | Self::Named(_) => value.is_object(),
            Self::Any => true,
            Self::Void => value.is_null(),
        }
    }

    /// Returns `true` if values of this type can be passed as arguments or
    /// stored in fields.
    #[must_use]
    pub fn is_value_type(&self) -> bool {
        match self {
            Self::Void => false,
            Self::Array(items) => items.is_value_type(),
            _ => true,
        }
    }
}

impl fmt::Display for TypeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String => f.write_str("string"),
            Self::Integer => f.write_str("integer"),
            Self::Number => f.write_str("number"),
            Self::Boolean => f.write_str("boolean"),
            Self::Array(items) => write!(f, "array<{items}>"),
            Self::Object => f.write_str("object"),
            Self::Named(name) => f.write_str(name),
            Self::Any => f.write_str("any"),
            Self::Void => f.write_str("void"),
        }
    }
}

/// Returns the JSON type name of a value, for error messages.
#[must_use]
pub fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Identity of an operation: its name and ordered parameter types.
///
/// The return type is deliberately not part of the signature, so two
/// operations differing only in their result collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Signature {
    name: String,
    parameter_types: Vec<TypeToken>,
}

impl Signature {
    /// Creates a new signature.
    #[must_use]
    pub fn new(name: impl Into<String>, parameter_types: Vec<TypeToken>) -> Self {
        Self {
            name: name.into(),
            parameter_types,
        }
    }

    /// Returns the operation name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the ordered parameter types.
    #[must_use]
    pub fn parameter_types(&self) -> &[TypeToken] {
        &self.parameter_types
    }

    /// Returns the number of parameters.
    #[must_use]
    pub fn arity(&self) -> usize {
        self.parameter_types.len()
    }

    /// Returns `true` if the arguments match this signature's arity and types.
    #[must_use]
    pub fn accepts(&self, arguments: &[Value]) -> bool {
        arguments.len() == self.parameter_types.len()
            && self
                .parameter_types
                .iter()
                .zip(arguments)
                .all(|(ty, value)| ty.accepts(value))
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (idx, ty) in self.parameter_types.iter().enumerate() {
            if idx > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{ty}")?;
        }
        f.write_str(")")
    }
}
