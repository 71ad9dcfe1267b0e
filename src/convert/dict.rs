//! Dictionary value parsing
//!
//! Dictionary arguments are read as JSON first and, when that fails, as
//! YAML. Tips for command-line users:
//!
//! - quote the whole argument: `-p '{"key": "val"}'`
//! - JSON needs double-quoted strings and string keys
//! - YAML needs a space after each colon: `{key: val}`, not `{key:val}`

use crate::convert::Converter;
use crate::error::{ArgError, ArgResult};
use crate::value::{Value, ValueKind};
use tracing::debug;

/// Parses a dictionary argument, optionally checking key and value kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DictParser {
    pub key: ValueKind,
    pub value: ValueKind,
    pub validate: bool,
    /// Whether the YAML fallback is available
    pub permissive: bool,
}

impl DictParser {
    pub fn new(key: ValueKind, value: ValueKind) -> Self {
        DictParser {
            key,
            value,
            validate: false,
            permissive: true,
        }
    }

    pub fn validate(mut self, validate: bool) -> Self {
        self.validate = validate;
        self
    }

    pub fn permissive(mut self, permissive: bool) -> Self {
        self.permissive = permissive;
        self
    }

    /// Parse `input` into a [`Value::Map`]
    pub fn parse(&self, input: &str) -> ArgResult<Value> {
        let parsed = match serde_json::from_str::<serde_json::Value>(input) {
            Ok(json) => Value::from(json),
            Err(json_err) => {
                if !self.permissive {
                    return Err(ArgError::Configuration(
                        "dictionary parsing support not installed: input is not valid JSON and the YAML fallback is disabled"
                            .to_string(),
                    ));
                }
                debug!(error = %json_err, "dictionary input is not JSON, trying YAML");
                let yaml = serde_yaml::from_str::<serde_yaml::Value>(input).map_err(|e| {
                    ArgError::Type(format!("Input did not parse as a dictionary: {}", e))
                })?;
                Value::from(yaml)
            }
        };

        if !matches!(parsed, Value::Map(_)) {
            return Err(ArgError::Type("Input did not parse as a dictionary.".to_string()));
        }

        if self.validate {
            self.check_kinds(&parsed)?;
        }

        Ok(parsed)
    }

    fn check_kinds(&self, parsed: &Value) -> ArgResult<()> {
        if let Value::Map(pairs) = parsed {
            for (k, v) in pairs {
                if !self.key.matches(k) {
                    return Err(ArgError::Type(format!(
                        "Key {} is not of expected type {}.",
                        k, self.key
                    )));
                }
                if !self.value.matches(v) {
                    return Err(ArgError::Type(format!(
                        "Value {} is not of expected type {}.",
                        v, self.value
                    )));
                }
            }
        }
        Ok(())
    }

    /// Wrap this parser as a single-string converter
    pub fn into_converter(self) -> Converter {
        let name = format!("Dict[{}, {}]", self.key, self.value);
        Converter::new(name, move |raw| self.parse(raw))
    }
}
