//! Value converters
//!
//! A converter turns one raw command-line token into a [`Value`]. Scalar
//! type names in a signature are looked up in a [`Registry`]; dictionaries
//! are handled by [`DictParser`].

pub mod dict;

pub use dict::*;

use crate::error::{ArgError, ArgResult};
use crate::value::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

type ConvertFn = dyn Fn(&str) -> ArgResult<Value> + Send + Sync;

/// A named single-string converter
#[derive(Clone)]
pub struct Converter {
    name: String,
    func: Arc<ConvertFn>,
}

impl Converter {
    pub fn new<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&str) -> ArgResult<Value> + Send + Sync + 'static,
    {
        Converter {
            name: name.into(),
            func: Arc::new(func),
        }
    }

    /// The converter used for parameters without a declared type
    pub fn passthrough() -> Self {
        Converter::new("str", |raw| Ok(Value::Str(raw.to_string())))
    }

    /// Strict `true`/`false` converter
    pub fn boolean() -> Self {
        Converter::new("bool", |raw| str2bool(raw).map(Value::Bool))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn convert(&self, raw: &str) -> ArgResult<Value> {
        (self.func)(raw)
    }
}

impl fmt::Debug for Converter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Converter").field("name", &self.name).finish()
    }
}

/// Convert a string into a boolean.
///
/// Only `true` and `false` are accepted, ignoring case and surrounding
/// whitespace.
pub fn str2bool(raw: &str) -> ArgResult<bool> {
    match raw.trim().to_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ArgError::conversion(raw, "Boolean value expected.")),
    }
}

fn parse_int(raw: &str) -> ArgResult<Value> {
    raw.trim()
        .parse::<i64>()
        .map(Value::Int)
        .map_err(|e| ArgError::conversion(raw, format!("invalid int value '{}': {}", raw, e)))
}

fn parse_float(raw: &str) -> ArgResult<Value> {
    raw.trim()
        .parse::<f64>()
        .map(Value::Float)
        .map_err(|e| ArgError::conversion(raw, format!("invalid float value '{}': {}", raw, e)))
}

/// Maps scalar type names to converters
#[derive(Debug, Clone)]
pub struct Registry {
    converters: HashMap<String, Converter>,
}

impl Registry {
    /// A registry with no converters at all
    pub fn empty() -> Self {
        Registry {
            converters: HashMap::new(),
        }
    }

    /// Register (or replace) the converter for a scalar type name
    pub fn register<F>(&mut self, name: impl Into<String>, func: F) -> &mut Self
    where
        F: Fn(&str) -> ArgResult<Value> + Send + Sync + 'static,
    {
        let name = name.into();
        self.converters
            .insert(name.clone(), Converter::new(name, func));
        self
    }

    /// Builder-style variant of [`Registry::register`]
    pub fn with<F>(mut self, name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&str) -> ArgResult<Value> + Send + Sync + 'static,
    {
        self.register(name, func);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Converter> {
        self.converters.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.converters.contains_key(name)
    }
}

impl Default for Registry {
    /// `str`, `int`, `float`, `bool` and `path`
    fn default() -> Self {
        let mut registry = Registry::empty();
        registry.register("str", |raw| Ok(Value::Str(raw.to_string())));
        registry.register("int", parse_int);
        registry.register("float", parse_float);
        registry.register("bool", |raw| str2bool(raw).map(Value::Bool));
        // Paths stay strings; `Kwargs::get::<PathBuf>` reads them back
        registry.register("path", |raw| Ok(Value::Str(raw.to_string())));
        registry
    }
}
