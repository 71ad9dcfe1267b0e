//! Docstring extraction
//!
//! A docstring is a free-text summary followed by `:param <name>: <text>`
//! fields. Field text may continue over following lines until the next line
//! starting with `:` (any field, e.g. `:returns:`).

use regex::Regex;
use std::collections::HashMap;

/// Description and per-parameter help extracted from a docstring
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Docstring {
    description: String,
    params: HashMap<String, String>,
}

impl Docstring {
    /// Parse docstring text. Never fails; missing parts are empty.
    pub fn parse(text: &str) -> Self {
        let field_line = Regex::new(r"(?m)^[ \t]*:").unwrap();
        let param_field = Regex::new(r"(?m)^[ \t]*:param[ \t]+([A-Za-z_][A-Za-z0-9_]*)[ \t]*:").unwrap();

        let summary_end = field_line.find(text).map_or(text.len(), |m| m.start());
        let description = normalize(&text[..summary_end]);

        let mut params = HashMap::new();
        for caps in param_field.captures_iter(text) {
            let (Some(field), Some(name)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let rest = &text[field.end()..];
            let help = &rest[..next_field(rest)];

            // The first field for a name wins
            params
                .entry(name.as_str().to_string())
                .or_insert_with(|| normalize(help));
        }

        Docstring {
            description,
            params,
        }
    }

    /// Text before the first field line, whitespace-collapsed
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Help text for `name`, or the empty string
    pub fn help_for(&self, name: &str) -> &str {
        self.params.get(name).map_or("", String::as_str)
    }
}

/// Offset of the next line starting with `:` within a field body
fn next_field(rest: &str) -> usize {
    let marker = Regex::new(r"\n[ \t]*:").unwrap();
    marker.find(rest).map_or(rest.len(), |m| m.start())
}

/// Collapse every newline and the indentation after it into one space
fn normalize(text: &str) -> String {
    let line_break = Regex::new(r"\n\s*").unwrap();
    line_break.replace_all(text, " ").trim().to_string()
}
