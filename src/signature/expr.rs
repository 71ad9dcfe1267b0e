//! Type expression parsing
//!
//! Parses the textual annotations used in signature files into [`TypeTag`]s:
//!
//! - `int`, `str`, `float`, `bool` or any registered scalar name
//! - `List[T]`, `Sequence[T]` (also `list[T]`, `typing.List[T]`, ...)
//! - `Optional[T]` and `Union[T, None]`
//! - `Dict[K, V]`, `Mapping[K, V]`
//! - `Any` for "no declared type"

use crate::error::SignatureError;
use crate::signature::TypeTag;
use crate::value::ValueKind;
use std::str::FromStr;

impl FromStr for TypeTag {
    type Err = SignatureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parser = ExprParser::new(s);
        let tag = parser.parse_expr()?;
        parser.skip_whitespace();
        if !parser.at_end() {
            return Err(parser.error(format!(
                "unexpected '{}' after the type",
                &parser.input[parser.pos..]
            )));
        }
        Ok(tag)
    }
}

/// A generic annotation before it is mapped onto a [`TypeTag`]
#[derive(Debug)]
struct Annotation {
    name: String,
    args: Vec<Annotation>,
}

struct ExprParser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> ExprParser<'a> {
    fn new(input: &'a str) -> Self {
        ExprParser { input, pos: 0 }
    }

    fn error(&self, reason: impl Into<String>) -> SignatureError {
        SignatureError::TypeExpression {
            expr: self.input.to_string(),
            reason: reason.into(),
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if !c.is_whitespace() {
                break;
            }
            self.pos += c.len_utf8();
        }
    }

    fn expect(&mut self, expected: char) -> Result<(), SignatureError> {
        self.skip_whitespace();
        match self.peek() {
            Some(c) if c == expected => {
                self.pos += c.len_utf8();
                Ok(())
            }
            Some(c) => Err(self.error(format!("expected '{}', found '{}'", expected, c))),
            None => Err(self.error(format!("expected '{}', found end of input", expected))),
        }
    }

    fn parse_name(&mut self) -> Result<String, SignatureError> {
        self.skip_whitespace();
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' || c == '.' {
                self.pos += c.len_utf8();
            } else {
                break;
            }
        }
        if start == self.pos {
            return Err(self.error("expected a type name"));
        }
        Ok(self.input[start..self.pos].to_string())
    }

    fn parse_annotation(&mut self) -> Result<Annotation, SignatureError> {
        let name = self.parse_name()?;
        let mut args = Vec::new();

        self.skip_whitespace();
        if self.peek() == Some('[') {
            self.expect('[')?;
            loop {
                args.push(self.parse_annotation()?);
                self.skip_whitespace();
                match self.peek() {
                    Some(',') => self.pos += 1,
                    _ => break,
                }
            }
            self.expect(']')?;
        }

        Ok(Annotation { name, args })
    }

    fn parse_expr(&mut self) -> Result<TypeTag, SignatureError> {
        let annotation = self.parse_annotation()?;
        self.to_tag(&annotation)
    }

    fn arity(&self, annotation: &Annotation, expected: usize) -> Result<(), SignatureError> {
        if annotation.args.len() != expected {
            return Err(self.error(format!(
                "'{}' takes {} type argument(s), found {}",
                annotation.name,
                expected,
                annotation.args.len()
            )));
        }
        Ok(())
    }

    fn to_tag(&self, annotation: &Annotation) -> Result<TypeTag, SignatureError> {
        let base = annotation
            .name
            .rsplit('.')
            .next()
            .unwrap_or(annotation.name.as_str());

        match base {
            "List" | "list" | "Sequence" => {
                self.arity(annotation, 1)?;
                Ok(TypeTag::list(self.to_tag(&annotation.args[0])?))
            }
            "Optional" => {
                self.arity(annotation, 1)?;
                Ok(TypeTag::optional(self.to_tag(&annotation.args[0])?))
            }
            "Union" => {
                // Only the two-armed `Union[T, None]` spelling of Optional is supported
                self.arity(annotation, 2)?;
                let absent = &annotation.args[1];
                if !absent.args.is_empty() || !matches!(absent.name.as_str(), "None" | "NoneType") {
                    return Err(self.error("only Union[T, None] is supported"));
                }
                Ok(TypeTag::optional(self.to_tag(&annotation.args[0])?))
            }
            "Dict" | "dict" | "Mapping" => {
                self.arity(annotation, 2)?;
                let key = self.to_kind(&annotation.args[0])?;
                let value = self.to_kind(&annotation.args[1])?;
                Ok(TypeTag::mapping(key, value))
            }
            "Any" => {
                self.arity(annotation, 0)?;
                Ok(TypeTag::Unannotated)
            }
            _ => {
                if !annotation.args.is_empty() {
                    return Err(self.error(format!(
                        "'{}' is not a supported generic type",
                        annotation.name
                    )));
                }
                Ok(TypeTag::Scalar(annotation.name.clone()))
            }
        }
    }

    /// Dictionary keys and values are checked by kind only, so the element
    /// types of nested generics are dropped here.
    fn to_kind(&self, annotation: &Annotation) -> Result<ValueKind, SignatureError> {
        // Bare `list` and `dict` name kinds directly
        if annotation.args.is_empty() {
            if let Ok(kind) = annotation.name.parse::<ValueKind>() {
                return Ok(kind);
            }
        }

        match self.to_tag(annotation)? {
            TypeTag::Unannotated => Ok(ValueKind::Any),
            TypeTag::Repeated(_) => Ok(ValueKind::List),
            TypeTag::Mapping(_, _) => Ok(ValueKind::Map),
            TypeTag::Scalar(name) => name.parse().map_err(|e: String| self.error(e)),
            TypeTag::Optional(_) => Err(self.error("Optional is not supported inside Dict")),
        }
    }
}
