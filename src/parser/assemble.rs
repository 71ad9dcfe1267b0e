//! Parser assembly
//!
//! Builds a `clap` command with one `--<name>` flag per signature parameter,
//! then turns parsed matches back into keyword arguments.

use crate::convert::Registry;
use crate::error::{AutoArgsError, Result};
use crate::parser::docstring::Docstring;
use crate::parser::kwargs::Kwargs;
use crate::parser::rules::{Multiplicity, ParseRule, Resolver};
use crate::parser::short::ShortNames;
use crate::signature::{validate_signature, Param, Settings, Signature, TypeTag};
use crate::value::Value;
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::ffi::OsString;
use tracing::debug;

/// Everything registered with the backend for one parameter
#[derive(Debug, Clone)]
pub struct FlagSpec {
    /// Long name, without the leading `--`
    pub long: String,

    /// Short name, without the leading `-`
    pub short: Option<String>,

    pub rule: ParseRule,

    /// Used verbatim when the flag is absent; `None` makes the flag required
    pub default: Option<Value>,

    pub help: String,
}

impl FlagSpec {
    pub fn required(&self) -> bool {
        self.default.is_none()
    }

    pub fn multiplicity(&self) -> Multiplicity {
        self.rule.multiplicity()
    }

    /// The backend argument for this flag.
    ///
    /// Defaults are not handed to the backend: it would run them through the
    /// converter, and a default is used as-is.
    fn to_arg(&self) -> Arg {
        let converter = self.rule.converter();

        let mut arg = Arg::new(self.long.clone())
            .long(self.long.clone())
            .value_name(self.long.to_uppercase())
            .help(self.help.clone())
            .required(self.required())
            .allow_negative_numbers(true)
            .action(ArgAction::Set)
            .value_parser(move |raw: &str| converter.convert(raw));

        if let Some(c) = self.single_char_short() {
            arg = arg.short(c);
        }

        if self.multiplicity() == Multiplicity::OneOrMore {
            arg = arg.num_args(1..);
        }

        arg
    }

    fn single_char_short(&self) -> Option<char> {
        let short = self.short.as_deref()?;
        let mut chars = short.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Some(c),
            _ => None,
        }
    }
}

/// Help text for a flag: docstring help, then the annotation and default
pub fn compose_help(help: &str, declared_type: &TypeTag, default: Option<&Value>) -> String {
    let suffix = match default {
        Some(value) => format!("[{}={}]", declared_type, value),
        None => format!("[{}]", declared_type),
    };

    if help.is_empty() {
        suffix
    } else {
        format!("{} {}", help, suffix)
    }
}

/// What is needed after parsing to rebuild one keyword argument
#[derive(Debug, Clone)]
struct Binding {
    name: String,
    multiplicity: Multiplicity,
    default: Option<Value>,
}

/// A parser generated from a [`Signature`]
#[derive(Debug, Clone)]
pub struct AutoParser {
    command: Command,
    bindings: Vec<Binding>,
    shorts: Option<ShortNames>,
}

impl AutoParser {
    /// Build a parser from the signature's own settings and the default
    /// converter registry
    pub fn new(signature: &Signature) -> Result<Self> {
        Self::with_registry(signature, &signature.settings, &Registry::default())
    }

    /// Build a parser, resolving scalar types through `registry`
    pub fn with_registry(
        signature: &Signature,
        settings: &Settings,
        registry: &Registry,
    ) -> Result<Self> {
        validate_signature(signature, registry)?;

        let docstring = Docstring::parse(signature.doc.as_deref().unwrap_or_default());

        let shorts = if settings.add_short_args {
            ShortNames::synthesize(signature.names())
        } else {
            None
        };

        let resolver = Resolver::new(registry, settings);
        let flags = signature
            .params
            .iter()
            .map(|param| build_flag(param, &resolver, &docstring, shorts.as_ref()))
            .collect::<Result<Vec<FlagSpec>>>()?;

        let mut command = Command::new(signature.name.clone()).args_override_self(true);

        if !docstring.description().is_empty() {
            command = command.about(docstring.description().to_string());
        }

        if let Some(footer) = shorts.as_ref().and_then(short_flag_footer) {
            command = command.after_help(footer);
        }

        let mut bindings = Vec::with_capacity(flags.len());
        for flag in flags {
            command = command.arg(flag.to_arg());
            bindings.push(Binding {
                name: flag.long.clone(),
                multiplicity: flag.multiplicity(),
                default: flag.default,
            });
        }

        debug!(
            program = %signature.name,
            flags = bindings.len(),
            short_flags = shorts.is_some(),
            "assembled parser"
        );

        Ok(AutoParser {
            command,
            bindings,
            shorts,
        })
    }

    /// The underlying backend command
    pub fn command(&self) -> &Command {
        &self.command
    }

    /// Short name table, if short flags are enabled
    pub fn short_names(&self) -> Option<&ShortNames> {
        self.shorts.as_ref()
    }

    /// Render the `--help` listing
    pub fn render_help(&self) -> String {
        self.command.clone().render_help().to_string()
    }

    /// Parse `tokens` (program name first) into keyword arguments
    pub fn parse_from<I, T>(&self, tokens: I) -> Result<Kwargs>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        let tokens: Vec<OsString> = match &self.shorts {
            Some(shorts) => shorts.expand(tokens),
            None => tokens.into_iter().map(Into::into).collect(),
        };

        let matches = self.command.clone().try_get_matches_from(tokens)?;
        self.collect(&matches)
    }

    fn collect(&self, matches: &ArgMatches) -> Result<Kwargs> {
        let mut kwargs = Kwargs::new();

        for binding in &self.bindings {
            let parsed = match binding.multiplicity {
                Multiplicity::Single => matches.get_one::<Value>(&binding.name).cloned(),
                Multiplicity::OneOrMore => matches
                    .get_many::<Value>(&binding.name)
                    .map(|values| Value::List(values.cloned().collect())),
            };

            // Required flags are enforced by the backend, so a missing value
            // always has a default here
            let value = parsed
                .or_else(|| binding.default.clone())
                .ok_or_else(|| AutoArgsError::UnknownKwarg(binding.name.clone()))?;

            kwargs.set(binding.name.clone(), value);
        }

        Ok(kwargs)
    }
}

fn build_flag(
    param: &Param,
    resolver: &Resolver<'_>,
    docstring: &Docstring,
    shorts: Option<&ShortNames>,
) -> Result<FlagSpec> {
    let rule = resolver.resolve(&param.name, &param.declared_type)?;
    let help = compose_help(
        docstring.help_for(&param.name),
        &param.declared_type,
        param.default.as_ref(),
    );
    let short = shorts.and_then(|s| s.get(&param.name)).map(str::to_string);

    debug!(
        param = %param.name,
        declared_type = %param.declared_type,
        rule = ?rule,
        short = ?short,
        required = param.default.is_none(),
        "resolved flag"
    );

    Ok(FlagSpec {
        long: param.name.clone(),
        short,
        rule,
        default: param.default.clone(),
        help,
    })
}

/// Help footer listing short flags the backend cannot show natively
fn short_flag_footer(shorts: &ShortNames) -> Option<String> {
    let lines: Vec<String> = shorts
        .multi_char()
        .map(|(name, short)| format!("  -{}  --{}", short, name))
        .collect();

    if lines.is_empty() {
        None
    } else {
        Some(format!("Short flags:\n{}", lines.join("\n")))
    }
}

/// Create a parser for `signature` with the default converter registry.
///
/// `settings` replaces whatever the signature file declared; pass
/// `&signature.settings` to keep those.
pub fn make_parser(signature: &Signature, settings: &Settings) -> Result<AutoParser> {
    AutoParser::with_registry(signature, settings, &Registry::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ArgError;
    use crate::value::ValueKind;
    use clap::error::ErrorKind;
    use std::error::Error as _;

    fn example() -> Signature {
        Signature::new("f")
            .doc(
                "A very useful function.\n\n    It does many things.\n    :param x: the first param\n    :param things: variable length!\n    :param y: the last param\n",
            )
            .param(Param::new("x", TypeTag::int()))
            .param(
                Param::new("things", TypeTag::optional(TypeTag::list(TypeTag::int())))
                    .default(Value::Null),
            )
            .param(Param::new("y", TypeTag::str()).default("test"))
            .param(Param::new("z", TypeTag::bool()).default(false))
    }

    fn parse(signature: &Signature, args: &[&str]) -> Result<Kwargs> {
        let parser = make_parser(signature, &signature.settings)?;
        parser.parse_from(std::iter::once("f").chain(args.iter().copied()))
    }

    fn cli_error(result: Result<Kwargs>) -> clap::Error {
        match result {
            Err(AutoArgsError::Cli(e)) => e,
            other => panic!("expected a parser error, got {:?}", other),
        }
    }

    #[test]
    fn test_end_to_end_short_flags() {
        let kwargs = parse(&example(), &["-x", "1", "-t", "2", "3", "-y", "hi", "-z", "true"]).unwrap();
        assert_eq!(kwargs.value("x"), Some(&Value::Int(1)));
        assert_eq!(kwargs.value("things"), Some(&Value::from(vec![2, 3])));
        assert_eq!(kwargs.value("y"), Some(&Value::from("hi")));
        assert_eq!(kwargs.value("z"), Some(&Value::Bool(true)));
        let names: Vec<&str> = kwargs.names().collect();
        assert_eq!(names, vec!["x", "things", "y", "z"]);
    }

    #[test]
    fn test_defaults_used_verbatim() {
        let kwargs = parse(&example(), &["--x", "5"]).unwrap();
        assert_eq!(kwargs.value("things"), Some(&Value::Null));
        assert_eq!(kwargs.value("y"), Some(&Value::from("test")));
        assert_eq!(kwargs.value("z"), Some(&Value::Bool(false)));
    }

    #[test]
    fn test_optional_int_default() {
        let signature = Signature::new("f")
            .param(Param::new("x", TypeTag::optional(TypeTag::int())).default(5));
        assert_eq!(parse(&signature, &[]).unwrap().value("x"), Some(&Value::Int(5)));
        assert_eq!(
            parse(&signature, &["--x", "7"]).unwrap().value("x"),
            Some(&Value::Int(7))
        );
    }

    #[test]
    fn test_missing_required() {
        let err = cli_error(parse(&example(), &["--y", "hi"]));
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_bad_boolean_is_conversion_error() {
        let err = cli_error(parse(&example(), &["-x", "1", "-z", "maybe"]));
        assert_eq!(err.kind(), ErrorKind::ValueValidation);
        let source = err.source().and_then(|s| s.downcast_ref::<ArgError>());
        assert!(matches!(source, Some(ArgError::Conversion { .. })));
    }

    #[test]
    fn test_boolean_requires_value() {
        let err = cli_error(parse(&example(), &["-x", "1", "--z"]));
        assert_ne!(err.kind(), ErrorKind::DisplayHelp);
        assert!(err.to_string().contains("--z"));
    }

    #[test]
    fn test_repeated_values() {
        let signature = Signature::new("f").param(Param::new("nums", TypeTag::list(TypeTag::int())));
        let kwargs = parse(&signature, &["--nums", "1", "2", "3"]).unwrap();
        assert_eq!(kwargs.get::<Vec<i64>>("nums").unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_repeated_flag_last_occurrence_wins() {
        let signature = Signature::new("f")
            .param(Param::new("nums", TypeTag::list(TypeTag::int())))
            .param(Param::new("name", TypeTag::str()).default("a"));
        let kwargs = parse(&signature, &["--nums", "1", "--name", "b", "--nums", "2", "3", "--name", "c"]).unwrap();
        assert_eq!(kwargs.get::<Vec<i64>>("nums").unwrap(), vec![2, 3]);
        assert_eq!(kwargs.get::<String>("name").unwrap(), "c");
    }

    #[test]
    fn test_negative_numbers() {
        let signature = Signature::new("f")
            .param(Param::new("offset", TypeTag::int()))
            .param(Param::new("nums", TypeTag::list(TypeTag::float())).default(Value::Null));
        let kwargs = parse(&signature, &["--offset", "-3", "--nums", "-1.5", "2"]).unwrap();
        assert_eq!(kwargs.get::<i64>("offset").unwrap(), -3);
        assert_eq!(kwargs.get::<Vec<f64>>("nums").unwrap(), vec![-1.5, 2.0]);
    }

    #[test]
    fn test_unannotated_passthrough() {
        let signature = Signature::new("f").param(Param::untyped("raw"));
        let kwargs = parse(&signature, &["--raw", "  1.0  "]).unwrap();
        assert_eq!(kwargs.value("raw"), Some(&Value::from("  1.0  ")));
    }

    #[test]
    fn test_short_collision_registers_long_only() {
        let signature = Signature::new("f")
            .param(Param::new("my_arg", TypeTag::int()).default(0))
            .param(Param::new("max_attempts", TypeTag::int()).default(3));
        let parser = make_parser(&signature, &signature.settings).unwrap();
        assert!(parser.short_names().is_none());
        assert!(parser.command().get_arguments().all(|a| a.get_short().is_none()));

        assert!(parser.parse_from(["f", "-ma", "1"]).is_err());
        let kwargs = parser.parse_from(["f", "--max_attempts", "5"]).unwrap();
        assert_eq!(kwargs.get::<i64>("max_attempts").unwrap(), 5);
    }

    #[test]
    fn test_multi_char_short_flags() {
        let signature = Signature::new("f")
            .param(Param::new("my_arg", TypeTag::int()))
            .param(Param::new("x", TypeTag::int()).default(0));
        let parser = make_parser(&signature, &signature.settings).unwrap();
        let kwargs = parser.parse_from(["f", "-ma", "4", "-x", "2"]).unwrap();
        assert_eq!(kwargs.get::<i64>("my_arg").unwrap(), 4);
        assert_eq!(kwargs.get::<i64>("x").unwrap(), 2);
        assert!(parser.render_help().contains("-ma  --my_arg"));

        let kwargs = parser.parse_from(["f", "-ma5"]).unwrap();
        assert_eq!(kwargs.get::<i64>("my_arg").unwrap(), 5);
    }

    #[test]
    fn test_short_args_disabled_by_setting() {
        let signature = example().settings(Settings {
            add_short_args: false,
            ..Settings::default()
        });
        assert!(parse(&signature, &["-x", "1"]).is_err());
        assert!(parse(&signature, &["--x", "1"]).is_ok());
    }

    #[test]
    fn test_explicit_settings_override_signature() {
        let signature = example().settings(Settings {
            add_short_args: false,
            ..Settings::default()
        });
        let parser = make_parser(&signature, &Settings::default()).unwrap();
        assert!(parser.short_names().is_some());
        assert!(parser.parse_from(["f", "-x", "1"]).is_ok());

        let parser = AutoParser::new(&signature).unwrap();
        assert!(parser.short_names().is_none());
    }

    #[test]
    fn test_dictionary_flag() {
        let signature = Signature::new("f").param(
            Param::new("opts", TypeTag::mapping(ValueKind::Str, ValueKind::Int)).default(Value::Map(vec![])),
        );
        let kwargs = parse(&signature, &["--opts", r#"{"a": 1}"#]).unwrap();
        assert_eq!(
            kwargs.value("opts"),
            Some(&Value::Map(vec![(Value::from("a"), Value::Int(1))]))
        );

        let err = cli_error(parse(&signature, &["--opts", "not a dict"]));
        let source = err.source().and_then(|s| s.downcast_ref::<ArgError>());
        assert!(matches!(source, Some(ArgError::Type(_))));
    }

    #[test]
    fn test_dictionary_validation_setting() {
        let signature = Signature::new("f")
            .settings(Settings {
                validate_dict_types: true,
                ..Settings::default()
            })
            .param(Param::new("opts", TypeTag::mapping(ValueKind::Str, ValueKind::Int)));
        let err = cli_error(parse(&signature, &["--opts", r#"{"a": "not an int"}"#]));
        assert!(err.to_string().contains("not an int"));
    }

    #[test]
    fn test_help_text() {
        let help = AutoParser::new(&example()).unwrap().render_help();
        assert!(help.contains("A very useful function. It does many things."));
        assert!(help.contains("the first param [int]"));
        assert!(help.contains("variable length! [Optional[List[int]]=null]"));
        assert!(help.contains("the last param [str=test]"));
        assert!(help.contains("[bool=false]"));
        assert!(help.contains("--things"));
    }

    #[test]
    fn test_compose_help() {
        assert_eq!(compose_help("", &TypeTag::int(), None), "[int]");
        assert_eq!(
            compose_help("count", &TypeTag::int(), Some(&Value::Int(3))),
            "count [int=3]"
        );
    }

    #[test]
    fn test_invalid_signature_rejected() {
        let signature = Signature::new("f")
            .param(Param::new("x", TypeTag::int()))
            .param(Param::new("x", TypeTag::int()));
        assert!(matches!(make_parser(&signature, &Settings::default()), Err(AutoArgsError::Signature(_))));
    }

    #[test]
    fn test_path_parameter() {
        let signature = Signature::new("f")
            .param(Param::new("out", TypeTag::scalar("path")))
            .param(Param::new("extra", TypeTag::optional(TypeTag::scalar("path"))).default(Value::Null));
        let kwargs = parse(&signature, &["--out", "build/report.txt"]).unwrap();
        assert_eq!(
            kwargs.get::<std::path::PathBuf>("out").unwrap(),
            std::path::PathBuf::from("build/report.txt")
        );
        assert_eq!(kwargs.get::<Option<std::path::PathBuf>>("extra").unwrap(), None);
    }

    #[test]
    fn test_custom_registry() {
        let registry = Registry::default().with("upper", |raw| Ok(Value::from(raw.to_uppercase())));
        let signature = Signature::new("f").param(Param::new("name", TypeTag::scalar("upper")));
        let parser = AutoParser::with_registry(&signature, &Settings::default(), &registry).unwrap();
        let kwargs = parser.parse_from(["f", "--name", "abc"]).unwrap();
        assert_eq!(kwargs.get::<String>("name").unwrap(), "ABC");
    }
}
