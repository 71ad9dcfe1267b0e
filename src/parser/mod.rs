//! Parser generation
//!
//! This module turns a [`Signature`](crate::signature::Signature) into a
//! command-line parser: docstring help extraction, type rule resolution,
//! short flag synthesis, assembly, and running the callable.

pub mod assemble;
pub mod docstring;
pub mod invoke;
pub mod kwargs;
pub mod rules;
pub mod short;

// Re-export main types
pub use assemble::*;
pub use docstring::Docstring;
pub use invoke::*;
pub use kwargs::*;
pub use rules::*;
pub use short::*;
