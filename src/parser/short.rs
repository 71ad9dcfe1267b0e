//! Short flag synthesis
//!
//! The short name of a parameter is the first character of each
//! `_`-delimited segment of its name (`my_arg` -> `ma`). If any two
//! parameters would share a short name, no short names are used at all.

use std::ffi::OsString;
use tracing::debug;

/// Separator between the words of a parameter name
pub const WORD_SEPARATOR: char = '_';

/// Short names the parser backend already uses
const RESERVED_SHORTS: &[&str] = &["h"];

/// Candidate short name for a parameter
pub fn abbreviate(name: &str) -> String {
    name.split(WORD_SEPARATOR)
        .filter_map(|segment| segment.chars().next())
        .collect()
}

/// Complete table of short names, one per parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortNames {
    /// (parameter name, short name) in declaration order
    entries: Vec<(String, String)>,
}

impl ShortNames {
    /// Build the table, or `None` if any two names collide
    pub fn synthesize<'a, I>(names: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut entries: Vec<(String, String)> = Vec::new();

        for name in names {
            let short = abbreviate(name);

            // Shorts must not look like negative numbers
            let usable = short.starts_with(|c: char| c.is_alphabetic())
                && !RESERVED_SHORTS.contains(&short.as_str());
            if !usable {
                debug!(param = name, short = %short, "short name unusable, disabling short flags");
                return None;
            }

            if let Some((other, _)) = entries.iter().find(|(_, s)| *s == short) {
                debug!(
                    param = name,
                    other = other.as_str(),
                    short = %short,
                    "short name collision, disabling short flags"
                );
                return None;
            }

            entries.push((name.to_string(), short));
        }

        Some(ShortNames { entries })
    }

    /// Short name for a parameter
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, s)| s.as_str())
    }

    /// Entries whose short name is longer than one character; the backend
    /// only understands single-character short flags natively
    pub fn multi_char(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .filter(|(_, s)| s.chars().count() > 1)
            .map(|(n, s)| (n.as_str(), s.as_str()))
    }

    /// Rewrite `-ma`, `-ma=value` and `-mavalue` into `--my_arg` and
    /// `--my_arg=value`.
    ///
    /// Tokens after a bare `--` are left alone.
    pub fn expand<I, T>(&self, tokens: I) -> Vec<OsString>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        let mut expanded = Vec::new();
        let mut done = false;

        for token in tokens {
            let token: OsString = token.into();
            if done {
                expanded.push(token);
                continue;
            }

            let rewritten = token.to_str().and_then(|text| {
                if text == "--" {
                    done = true;
                    return None;
                }
                self.expand_token(text)
            });

            expanded.push(rewritten.map(OsString::from).unwrap_or(token));
        }

        expanded
    }

    fn expand_token(&self, text: &str) -> Option<String> {
        let flag = text.strip_prefix('-')?;
        if flag.starts_with('-') {
            return None;
        }

        let (short, value) = match flag.split_once('=') {
            Some((short, value)) => (short, Some(value)),
            None => (flag, None),
        };

        if let Some((name, _)) = self.multi_char().find(|(_, s)| *s == short) {
            return Some(match value {
                Some(value) => format!("--{}={}", name, value),
                None => format!("--{}", name),
            });
        }

        // Attached value: the longest multi-char short that prefixes the flag
        let (name, attached) = self
            .multi_char()
            .filter_map(|(name, s)| {
                flag.strip_prefix(s)
                    .filter(|rest| !rest.is_empty())
                    .map(|rest| (name, s.len(), rest))
            })
            .max_by_key(|(_, len, _)| *len)
            .map(|(name, _, rest)| (name, rest))?;

        Some(format!("--{}={}", name, attached))
    }
}
