//! CLI interface
//!
//! The `autoargs` tool: loads a signature file, builds its parser and
//! prints the parsed keyword arguments, or shell completions for it.

pub mod app;
pub mod logging;

// Re-export main types
pub use app::*;
pub use logging::*;
