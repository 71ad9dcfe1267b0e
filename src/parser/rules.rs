//! Type rule resolution
//!
//! Maps a declared [`TypeTag`] onto the parse rule used for its flag. The
//! first matching rule wins:
//!
//! 1. `Repeated(T)`: one or more values, each converted as `T`
//! 2. `Optional(T)`: resolved as `T`; null only through the default
//! 3. `Mapping(K, V)`: the dictionary parser
//! 4. `bool`: strict `true`/`false`
//! 5. no declared type: raw strings
//! 6. any other scalar: its registered converter

use crate::convert::{Converter, DictParser, Registry};
use crate::error::{SignatureError, SignatureResult};
use crate::signature::{Settings, TypeTag};

/// How many tokens a flag consumes per occurrence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Multiplicity {
    Single,
    OneOrMore,
}

/// How the values of one flag are converted
#[derive(Debug, Clone)]
pub enum ParseRule {
    Scalar(Converter),
    Repeated(Converter),
    Mapping(DictParser),
    Passthrough,
}

impl ParseRule {
    pub fn multiplicity(&self) -> Multiplicity {
        match self {
            ParseRule::Repeated(_) => Multiplicity::OneOrMore,
            _ => Multiplicity::Single,
        }
    }

    /// The converter applied to every token of the flag
    pub fn converter(&self) -> Converter {
        match self {
            ParseRule::Scalar(converter) | ParseRule::Repeated(converter) => converter.clone(),
            ParseRule::Mapping(parser) => parser.into_converter(),
            ParseRule::Passthrough => Converter::passthrough(),
        }
    }
}

/// Resolves declared types against a converter registry
pub struct Resolver<'a> {
    registry: &'a Registry,
    settings: &'a Settings,
}

impl<'a> Resolver<'a> {
    pub fn new(registry: &'a Registry, settings: &'a Settings) -> Self {
        Resolver { registry, settings }
    }

    /// Resolve the rule for parameter `param` declared as `tag`
    pub fn resolve(&self, param: &str, tag: &TypeTag) -> SignatureResult<ParseRule> {
        match tag {
            TypeTag::Repeated(inner) => {
                let element = self.resolve_single(param, tag, inner)?;
                Ok(ParseRule::Repeated(element.converter()))
            }
            TypeTag::Optional(inner) => self.resolve(param, inner),
            _ => self.resolve_single(param, tag, tag),
        }
    }

    /// Rules 3 to 6, for a value consumed one token at a time
    fn resolve_single(
        &self,
        param: &str,
        declared: &TypeTag,
        tag: &TypeTag,
    ) -> SignatureResult<ParseRule> {
        match tag {
            TypeTag::Mapping(key, value) => Ok(ParseRule::Mapping(
                DictParser::new(*key, *value)
                    .validate(self.settings.validate_dict_types)
                    .permissive(self.settings.permissive_dicts),
            )),
            TypeTag::Scalar(_) if tag.is_bool() => Ok(ParseRule::Scalar(Converter::boolean())),
            TypeTag::Unannotated => Ok(ParseRule::Passthrough),
            TypeTag::Scalar(name) => self
                .registry
                .get(name)
                .cloned()
                .map(ParseRule::Scalar)
                .ok_or_else(|| SignatureError::UnknownType {
                    param: param.to_string(),
                    type_name: name.clone(),
                }),
            TypeTag::Repeated(_) | TypeTag::Optional(_) => Err(SignatureError::UnsupportedType {
                param: param.to_string(),
                type_expr: declared.to_string(),
                reason: "sequence elements must be single values".to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{Value, ValueKind};

    fn resolve(tag: TypeTag) -> SignatureResult<ParseRule> {
        let registry = Registry::default();
        let settings = Settings::default();
        Resolver::new(&registry, &settings).resolve("p", &tag)
    }

    #[test]
    fn test_repeated() {
        let rule = resolve(TypeTag::list(TypeTag::int())).unwrap();
        assert!(matches!(rule, ParseRule::Repeated(_)));
        assert_eq!(rule.multiplicity(), Multiplicity::OneOrMore);
        assert_eq!(rule.converter().convert("3"), Ok(Value::Int(3)));
    }

    #[test]
    fn test_repeated_bool_uses_boolean_converter() {
        let rule = resolve(TypeTag::list(TypeTag::bool())).unwrap();
        assert_eq!(rule.converter().convert("False"), Ok(Value::Bool(false)));
        assert!(rule.converter().convert("no").is_err());
    }

    #[test]
    fn test_optional_unwraps() {
        let rule = resolve(TypeTag::optional(TypeTag::int())).unwrap();
        assert!(matches!(rule, ParseRule::Scalar(_)));
        assert_eq!(rule.multiplicity(), Multiplicity::Single);
        assert_eq!(rule.converter().convert("7"), Ok(Value::Int(7)));
    }

    #[test]
    fn test_optional_never_converts_to_null() {
        let rule = resolve(TypeTag::optional(TypeTag::int())).unwrap();
        assert!(rule.converter().convert("None").is_err());
        assert!(rule.converter().convert("").is_err());
    }

    #[test]
    fn test_optional_of_repeated() {
        let rule = resolve(TypeTag::optional(TypeTag::list(TypeTag::int()))).unwrap();
        assert!(matches!(rule, ParseRule::Repeated(_)));
        assert_eq!(rule.multiplicity(), Multiplicity::OneOrMore);
    }

    #[test]
    fn test_optional_of_mapping_and_bool() {
        let rule = resolve(TypeTag::optional(TypeTag::mapping(
            ValueKind::Str,
            ValueKind::Int,
        )))
        .unwrap();
        assert!(matches!(rule, ParseRule::Mapping(_)));

        let rule = resolve(TypeTag::optional(TypeTag::bool())).unwrap();
        assert_eq!(rule.converter().convert(" TRUE "), Ok(Value::Bool(true)));
    }

    #[test]
    fn test_mapping_takes_settings() {
        let registry = Registry::default();
        let settings = Settings {
            validate_dict_types: true,
            permissive_dicts: false,
            ..Settings::default()
        };
        let rule = Resolver::new(&registry, &settings)
            .resolve("p", &TypeTag::mapping(ValueKind::Str, ValueKind::Int))
            .unwrap();
        match rule {
            ParseRule::Mapping(parser) => {
                assert!(parser.validate);
                assert!(!parser.permissive);
            }
            other => panic!("expected a mapping rule, got {:?}", other),
        }
    }

    #[test]
    fn test_unannotated_passes_through() {
        let rule = resolve(TypeTag::Unannotated).unwrap();
        assert!(matches!(rule, ParseRule::Passthrough));
        assert_eq!(rule.converter().convert(" 1 "), Ok(Value::from(" 1 ")));
    }

    #[test]
    fn test_registered_scalar() {
        let rule = resolve(TypeTag::float()).unwrap();
        assert_eq!(rule.converter().convert("0.5"), Ok(Value::Float(0.5)));
    }

    #[test]
    fn test_unknown_scalar() {
        let result = resolve(TypeTag::scalar("datetime"));
        assert!(matches!(result, Err(SignatureError::UnknownType { .. })));
    }

    #[test]
    fn test_nested_repeated_rejected() {
        let result = resolve(TypeTag::list(TypeTag::list(TypeTag::int())));
        assert!(matches!(result, Err(SignatureError::UnsupportedType { .. })));
    }
}
