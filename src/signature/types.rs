//! Core signature types
//!
//! This module defines the data structures that describe a callable: its
//! name, docstring, ordered parameters and the settings used to build a
//! parser for it. A signature can be built in code or loaded from YAML.

use crate::value::{Value, ValueKind};
use serde::{Deserialize, Deserializer};
use std::fmt;

/// A function-like signature
#[derive(Debug, Clone, Deserialize)]
pub struct Signature {
    /// Program name used in usage and help output
    #[serde(default = "default_name")]
    pub name: String,

    /// Structured docstring (summary plus `:param name:` fields)
    #[serde(default)]
    pub doc: Option<String>,

    /// Parser construction settings
    #[serde(default)]
    pub settings: Settings,

    /// Parameters in declaration order
    #[serde(default)]
    pub params: Vec<Param>,
}

fn default_name() -> String {
    "autoargs".to_string()
}

impl Signature {
    /// Create an empty signature for a program
    pub fn new(name: impl Into<String>) -> Self {
        Signature {
            name: name.into(),
            doc: None,
            settings: Settings::default(),
            params: Vec::new(),
        }
    }

    /// Set the docstring
    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Set parser settings
    pub fn settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    /// Append a parameter
    pub fn param(mut self, param: Param) -> Self {
        self.params.push(param);
        self
    }

    /// Parameter names in declaration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.params.iter().map(|p| p.name.as_str())
    }

    /// Find a parameter by name
    pub fn get(&self, name: &str) -> Option<&Param> {
        self.params.iter().find(|p| p.name == name)
    }
}

/// A single parameter descriptor
#[derive(Debug, Clone, Deserialize)]
pub struct Param {
    /// Parameter name; the long flag is `--<name>`
    pub name: String,

    /// Declared type
    #[serde(
        rename = "type",
        default,
        deserialize_with = "deserialize_type_tag"
    )]
    pub declared_type: TypeTag,

    /// Default value; `None` makes the flag required
    #[serde(default, deserialize_with = "deserialize_default")]
    pub default: Option<Value>,
}

impl Param {
    /// Create a required parameter
    pub fn new(name: impl Into<String>, declared_type: TypeTag) -> Self {
        Param {
            name: name.into(),
            declared_type,
            default: None,
        }
    }

    /// Create a required parameter without a declared type
    pub fn untyped(name: impl Into<String>) -> Self {
        Param::new(name, TypeTag::Unannotated)
    }

    /// Give the parameter a default value
    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }
}

/// Declared type of a parameter
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TypeTag {
    /// A named scalar type, converted through the registry (`int`, `str`, `bool`, ...)
    Scalar(String),

    /// One or more values of the inner type
    Repeated(Box<TypeTag>),

    /// The inner type, or null through the default only
    Optional(Box<TypeTag>),

    /// A dictionary with the given key and value kinds
    Mapping(ValueKind, ValueKind),

    /// No declared type; raw strings pass through
    #[default]
    Unannotated,
}

impl TypeTag {
    pub fn scalar(name: impl Into<String>) -> Self {
        TypeTag::Scalar(name.into())
    }

    pub fn str() -> Self {
        TypeTag::scalar("str")
    }

    pub fn int() -> Self {
        TypeTag::scalar("int")
    }

    pub fn float() -> Self {
        TypeTag::scalar("float")
    }

    pub fn bool() -> Self {
        TypeTag::scalar("bool")
    }

    pub fn list(inner: TypeTag) -> Self {
        TypeTag::Repeated(Box::new(inner))
    }

    pub fn optional(inner: TypeTag) -> Self {
        TypeTag::Optional(Box::new(inner))
    }

    pub fn mapping(key: ValueKind, value: ValueKind) -> Self {
        TypeTag::Mapping(key, value)
    }

    /// Whether this is the boolean scalar
    pub fn is_bool(&self) -> bool {
        matches!(self, TypeTag::Scalar(name) if name == "bool")
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeTag::Scalar(name) => write!(f, "{}", name),
            TypeTag::Repeated(inner) => write!(f, "List[{}]", inner),
            TypeTag::Optional(inner) => write!(f, "Optional[{}]", inner),
            TypeTag::Mapping(key, value) => write!(f, "Dict[{}, {}]", key, value),
            TypeTag::Unannotated => write!(f, "Any"),
        }
    }
}

/// Parser construction settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Register `-<abbrev>` flags in addition to `--<name>`
    pub add_short_args: bool,

    /// Check dictionary keys and values against their declared kinds
    pub validate_dict_types: bool,

    /// Fall back to YAML when a dictionary value is not valid JSON
    pub permissive_dicts: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            add_short_args: true,
            validate_dict_types: false,
            permissive_dicts: true,
        }
    }
}

/// Deserialize a type expression such as `Optional[List[int]]`
fn deserialize_type_tag<'de, D>(deserializer: D) -> Result<TypeTag, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let expr = Option::<String>::deserialize(deserializer)?;
    match expr {
        None => Ok(TypeTag::Unannotated),
        Some(expr) => expr.parse().map_err(D::Error::custom),
    }
}

/// Deserialize a default so that an explicit `null` is kept as a default
/// instead of being read as "no default"
fn deserialize_default<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_yaml::Value::deserialize(deserializer)?;
    Ok(Some(Value::from(value)))
}
