//! Signature descriptors
//!
//! This module describes callables explicitly (name, docstring, ordered
//! typed parameters with optional defaults), loads them from YAML signature
//! files and validates them before a parser is built.

pub mod expr;
pub mod parse;
pub mod schema;
pub mod types;

// Re-export main types
pub use parse::*;
pub use schema::*;
pub use types::*;
