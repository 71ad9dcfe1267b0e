//! Keyword arguments handed to the callable
//!
//! One entry per signature parameter, in declaration order.

use crate::error::{AutoArgsError, Result};
use crate::value::{FromValue, Value};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Parsed keyword arguments
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Kwargs {
    values: Vec<(String, Value)>,
}

impl Kwargs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a value, replacing any previous value for `name`
    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        let name = name.into();
        match self.values.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => *slot = value,
            None => self.values.push((name, value)),
        }
    }

    /// Raw value for `name`
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.values
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// Typed value for `name`
    pub fn get<T: FromValue>(&self, name: &str) -> Result<T> {
        let value = self
            .value(name)
            .ok_or_else(|| AutoArgsError::UnknownKwarg(name.to_string()))?;

        T::from_value(value).ok_or_else(|| AutoArgsError::Kwarg {
            name: name.to_string(),
            expected: T::EXPECTED,
            found: value.kind().to_string(),
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.value(name).is_some()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn into_inner(self) -> Vec<(String, Value)> {
        self.values
    }
}

impl Serialize for Kwargs {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (name, value) in &self.values {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
