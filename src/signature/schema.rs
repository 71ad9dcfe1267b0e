//! Signature validation
//!
//! Rejects descriptors that cannot be turned into a parser before any flag
//! is registered.

use crate::convert::Registry;
use crate::error::{SignatureError, SignatureResult};
use crate::signature::types::{Param, Signature, TypeTag};
use regex::Regex;
use std::collections::HashSet;

/// Parameter names the parser backend already uses
const RESERVED_NAMES: &[&str] = &["help"];

/// Validate a complete signature against the converters available to it
pub fn validate_signature(signature: &Signature, registry: &Registry) -> SignatureResult<()> {
    let mut seen = HashSet::new();

    for param in &signature.params {
        validate_param(param, registry)?;

        if !seen.insert(param.name.as_str()) {
            return Err(SignatureError::DuplicateNames(param.name.clone()));
        }
    }

    Ok(())
}

/// Validate a single parameter
pub fn validate_param(param: &Param, registry: &Registry) -> SignatureResult<()> {
    let identifier = Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap();
    if !identifier.is_match(&param.name) {
        return Err(SignatureError::InvalidName(param.name.clone()));
    }

    if RESERVED_NAMES.contains(&param.name.as_str()) {
        return Err(SignatureError::ReservedName(param.name.clone()));
    }

    validate_type(param, &param.declared_type, registry, false)
}

/// Recursively check that every scalar is registered and that nesting is
/// something the resolver can express
fn validate_type(
    param: &Param,
    tag: &TypeTag,
    registry: &Registry,
    in_repeated: bool,
) -> SignatureResult<()> {
    let unsupported = |reason: &str| SignatureError::UnsupportedType {
        param: param.name.clone(),
        type_expr: param.declared_type.to_string(),
        reason: reason.to_string(),
    };

    match tag {
        TypeTag::Scalar(name) => {
            if tag.is_bool() || registry.contains(name) {
                Ok(())
            } else {
                Err(SignatureError::UnknownType {
                    param: param.name.clone(),
                    type_name: name.clone(),
                })
            }
        }
        TypeTag::Repeated(inner) => {
            if in_repeated {
                return Err(unsupported("nested sequences are not supported"));
            }
            validate_type(param, inner, registry, true)
        }
        TypeTag::Optional(inner) => {
            if in_repeated {
                return Err(unsupported("sequence elements cannot be optional"));
            }
            validate_type(param, inner, registry, in_repeated)
        }
        TypeTag::Mapping(_, _) | TypeTag::Unannotated => Ok(()),
    }
}
