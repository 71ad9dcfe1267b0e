//! Error types for autoargs

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for autoargs operations
pub type Result<T> = std::result::Result<T, AutoArgsError>;

/// Main error type for autoargs
#[derive(Error, Debug)]
pub enum AutoArgsError {
    /// Signature descriptor errors
    #[error("Signature error: {0}")]
    Signature(#[from] SignatureError),

    /// Errors raised by the generated command-line parser
    #[error("{0}")]
    Cli(#[from] clap::Error),

    /// Conversion errors raised outside of the parser backend
    #[error("Argument error: {0}")]
    Arg(#[from] ArgError),

    /// A keyword argument was read with the wrong type
    #[error("Keyword argument '{name}' is {found}, expected {expected}")]
    Kwarg {
        name: String,
        expected: &'static str,
        found: String,
    },

    /// A keyword argument that the signature does not declare
    #[error("Keyword argument '{0}' is not defined")]
    UnknownKwarg(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// YAML parsing errors
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Signature loading and validation errors
#[derive(Error, Debug)]
pub enum SignatureError {
    #[error("Failed to find signature file (searched: {0})")]
    NotFound(String),

    #[error("Invalid signature: {0}")]
    Invalid(String),

    #[error("Parameter '{0}' is declared more than once")]
    DuplicateNames(String),

    #[error("Parameter name '{0}' is not a valid identifier")]
    InvalidName(String),

    #[error("Parameter name '{0}' is reserved")]
    ReservedName(String),

    #[error("Parameter '{param}' has unknown type '{type_name}'")]
    UnknownType { param: String, type_name: String },

    #[error("Invalid type expression '{expr}': {reason}")]
    TypeExpression { expr: String, reason: String },

    #[error("Parameter '{param}' has unsupported type '{type_expr}': {reason}")]
    UnsupportedType {
        param: String,
        type_expr: String,
        reason: String,
    },

    #[error("Failed to read signature file '{path}': {error}")]
    ReadFile { path: PathBuf, error: String },
}

/// Errors raised while converting a single command-line value
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ArgError {
    /// A converter rejected its input
    #[error("{reason}")]
    Conversion { value: String, reason: String },

    /// Structural mismatch of a parsed dictionary
    #[error("{0}")]
    Type(String),

    /// Optional parsing support is not available
    #[error("{0}")]
    Configuration(String),
}

impl ArgError {
    pub fn conversion(value: &str, reason: impl Into<String>) -> Self {
        ArgError::Conversion {
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

/// Specialized result type for signature operations
pub type SignatureResult<T> = std::result::Result<T, SignatureError>;

/// Specialized result type for value conversion
pub type ArgResult<T> = std::result::Result<T, ArgError>;

/// Helper function to determine if a parser error is a request for help
/// (which should be printed and exit successfully, not reported as a failure)
pub fn is_help_request(err: &AutoArgsError) -> bool {
    matches!(
        err,
        AutoArgsError::Cli(e) if matches!(
            e.kind(),
            clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion
        )
    )
}
