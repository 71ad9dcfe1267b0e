//! Running a callable with parsed arguments

use crate::convert::Registry;
use crate::error::{AutoArgsError, Result};
use crate::parser::assemble::AutoParser;
use crate::parser::kwargs::Kwargs;
use crate::signature::{Settings, Signature};
use std::ffi::OsString;

/// Build a parser for `signature` with `settings`, parse `tokens` (program
/// name first) and call `func` with the keyword arguments. The return value
/// of `func` is passed through unchanged.
pub fn run_from<I, T, F, R>(signature: &Signature, settings: &Settings, tokens: I, func: F) -> Result<R>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
    F: FnOnce(Kwargs) -> R,
{
    run_from_with_registry(signature, settings, &Registry::default(), tokens, func)
}

/// [`run_from`] with a custom converter registry
pub fn run_from_with_registry<I, T, F, R>(
    signature: &Signature,
    settings: &Settings,
    registry: &Registry,
    tokens: I,
    func: F,
) -> Result<R>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
    F: FnOnce(Kwargs) -> R,
{
    let parser = AutoParser::with_registry(signature, settings, registry)?;
    let kwargs = parser.parse_from(tokens)?;
    Ok(func(kwargs))
}

/// Create a parser for `signature` using its own settings, parse the process
/// arguments and call `func` with them.
///
/// Command-line errors (bad values, missing flags, `--help`) are printed and
/// the process exits the way the parser backend does. Signature errors are
/// returned.
pub fn parse_args_and_run<F, R>(signature: &Signature, func: F) -> Result<R>
where
    F: FnOnce(Kwargs) -> R,
{
    match run_from(signature, &signature.settings, std::env::args_os(), func) {
        Err(AutoArgsError::Cli(e)) => e.exit(),
        other => other,
    }
}
