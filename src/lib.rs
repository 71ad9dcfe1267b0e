//! autoargs - command-line parsers generated from signatures
//!
//! Describe a callable once (parameter names, declared types, defaults and a
//! docstring with `:param name:` fields) and get a `clap` parser with one
//! `--<name>` flag per parameter, short flags, typed converters and help
//! text, then run the callable with the parsed keyword arguments.
//!
//! ```no_run
//! use autoargs::{parse_args_and_run, Param, Signature, TypeTag, Value};
//!
//! let signature = Signature::new("demo")
//!     .doc("Add things to x.\n:param x: the first param\n:param things: more numbers")
//!     .param(Param::new("x", TypeTag::int()))
//!     .param(Param::new("things", TypeTag::optional(TypeTag::list(TypeTag::int()))).default(Value::Null));
//!
//! let total = parse_args_and_run(&signature, |kwargs| {
//!     let x: i64 = kwargs.get("x").unwrap();
//!     let things: Option<Vec<i64>> = kwargs.get("things").unwrap();
//!     x + things.unwrap_or_default().iter().sum::<i64>()
//! })
//! .unwrap();
//! println!("{}", total);
//! ```

// Public modules
pub mod cli;
pub mod convert;
pub mod error;
pub mod parser;
pub mod signature;
pub mod value;

// Re-export commonly used types
pub use convert::{Converter, DictParser, Registry};
pub use error::{ArgError, AutoArgsError, Result, SignatureError};
pub use parser::{make_parser, parse_args_and_run, run_from, AutoParser, Kwargs};
pub use signature::{Param, Settings, Signature, TypeTag};
pub use value::{FromValue, Value, ValueKind};

/// Current version of autoargs
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
