//! Main CLI application
//!
//! `autoargs` loads a signature file, builds its parser and prints the
//! keyword arguments that the parser produces for the given tokens:
//!
//! ```text
//! autoargs -f demo.yml -- -x 1 -t 2 3 -y hi -z true
//! ```

use crate::cli::logging::{init_logging, Verbosity};
use crate::error::AutoArgsError;
use crate::parser::AutoParser;
use crate::signature::{parse_signature_auto, parse_signature_file, Signature};
use anyhow::Context as _;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use clap_complete::Shell;
use std::ffi::OsString;
use std::io;
use std::path::PathBuf;
use tracing::debug;

/// CLI application
pub struct App {
    /// The loaded signature
    signature: Signature,
    /// Signature file path
    signature_path: PathBuf,
}

impl App {
    /// Create a new app from a discovered signature file
    pub fn new() -> Result<Self, AutoArgsError> {
        let (signature, signature_path) = parse_signature_auto()?;
        Ok(App {
            signature,
            signature_path,
        })
    }

    /// Create app with a specific signature file
    pub fn with_signature_file(path: PathBuf) -> Result<Self, AutoArgsError> {
        let signature = parse_signature_file(&path)?;
        Ok(App {
            signature,
            signature_path: path,
        })
    }

    /// Build the generated parser and run it over the trailing arguments
    pub fn run(self, matches: &ArgMatches) -> anyhow::Result<()> {
        let parser = AutoParser::new(&self.signature).with_context(|| {
            format!(
                "failed to build a parser from {}",
                self.signature_path.display()
            )
        })?;

        debug!(
            path = %self.signature_path.display(),
            program = %self.signature.name,
            "loaded signature"
        );

        if let Some(shell) = matches.get_one::<Shell>("completions").copied() {
            let mut command = parser.command().clone();
            clap_complete::generate(shell, &mut command, self.signature.name.clone(), &mut io::stdout());
            return Ok(());
        }

        let tokens = std::iter::once(OsString::from(&self.signature.name)).chain(
            matches
                .get_many::<OsString>("args")
                .into_iter()
                .flatten()
                .cloned(),
        );

        let kwargs = match parser.parse_from(tokens) {
            Ok(kwargs) => kwargs,
            // Help output and usage errors follow the parser's own conventions
            Err(AutoArgsError::Cli(e)) => e.exit(),
            Err(e) => return Err(e.into()),
        };

        println!("{}", serde_json::to_string_pretty(&kwargs)?);
        Ok(())
    }
}

/// Build the clap command for the tool itself
fn build_command() -> Command {
    Command::new("autoargs")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Build a command-line parser from a signature file and show what it parses")
        .arg(
            Arg::new("file")
                .short('f')
                .long("file")
                .value_name("FILE")
                .value_parser(value_parser!(PathBuf))
                .help("Path to autoargs.yml signature file"),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .help("Only print errors")
                .action(ArgAction::SetTrue)
                .conflicts_with("verbose"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Print how each parameter was resolved")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("completions")
                .long("completions")
                .value_name("SHELL")
                .value_parser(value_parser!(Shell))
                .help("Print shell completions for the generated parser"),
        )
        .arg(
            Arg::new("args")
                .value_name("ARGS")
                .num_args(0..)
                .last(true)
                .value_parser(value_parser!(OsString))
                .help("Arguments for the generated parser (after --)"),
        )
}

/// Get verbosity level from matches
fn get_verbosity(matches: &ArgMatches) -> Verbosity {
    if matches.get_flag("quiet") {
        Verbosity::Quiet
    } else if matches.get_flag("verbose") {
        Verbosity::Verbose
    } else {
        Verbosity::Normal
    }
}

/// Run the CLI application with the process arguments
pub fn run() -> anyhow::Result<()> {
    run_from(std::env::args_os())
}

/// Run the CLI application with provided arguments
pub fn run_from<I, T>(args: I) -> anyhow::Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let matches = build_command().get_matches_from(args);
    init_logging(get_verbosity(&matches));

    let app = match matches.get_one::<PathBuf>("file") {
        Some(path) => App::with_signature_file(path.clone())
            .with_context(|| format!("failed to load signature from {}", path.display()))?,
        None => App::new()?,
    };

    app.run(&matches)
}
