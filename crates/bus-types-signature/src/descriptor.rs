//! Erased field descriptors (`I`, `[Ljava/lang/String;`).
//!
//! Descriptors are parsed into the same [`TypeSignature`] tree as generic signatures so they can be
//! translated with [`crate::ty_from_type_sig`]. Nested classes keep their `$` inside a single
//! segment, which yields the same binary name as a `Outer.Inner` signature.

use bus_types::PrimitiveType;

use crate::error::{Result, SignatureError};
use crate::signature::{ClassTypeSignature, SimpleClassTypeSignature, TypeSignature};

pub fn parse_field_descriptor(desc: &str) -> Result<TypeSignature> {
    let (ty, rest) = parse_field_type(desc)?;
    if !rest.is_empty() {
        return Err(SignatureError::InvalidDescriptor(desc.to_string()));
    }
    Ok(ty)
}

/// Most dimensions an array type may have (JVMS 4.3.2).
pub(crate) const MAX_ARRAY_DIMENSIONS: usize = 255;

/// Number of leading `[` in `input`.
pub(crate) fn array_dimensions(input: &str) -> usize {
    input.bytes().take_while(|&b| b == b'[').count()
}

/// Base type for a descriptor character, shared with the signature grammar.
pub(crate) fn base_type(c: char) -> Option<PrimitiveType> {
    Some(match c {
        'B' => PrimitiveType::Byte,
        'C' => PrimitiveType::Char,
        'D' => PrimitiveType::Double,
        'F' => PrimitiveType::Float,
        'I' => PrimitiveType::Int,
        'J' => PrimitiveType::Long,
        'S' => PrimitiveType::Short,
        'Z' => PrimitiveType::Boolean,
        _ => return None,
    })
}

fn parse_field_type(input: &str) -> Result<(TypeSignature, &str)> {
    let bytes = input.as_bytes();
    if bytes.is_empty() {
        return Err(SignatureError::InvalidDescriptor(input.to_string()));
    }
    if let Some(base) = base_type(bytes[0] as char) {
        return Ok((TypeSignature::Base(base), &input[1..]));
    }
    match bytes[0] as char {
        'L' => {
            let end = input
                .find(';')
                .ok_or_else(|| SignatureError::InvalidDescriptor(input.to_string()))?;
            let internal = &input[1..end];
            let mut parts: Vec<&str> = internal.split('/').collect();
            let name = parts.pop().unwrap_or_default();
            if name.is_empty() || parts.iter().any(|p| p.is_empty()) {
                return Err(SignatureError::InvalidDescriptor(input.to_string()));
            }
            let class = ClassTypeSignature {
                package: parts.into_iter().map(str::to_string).collect(),
                segments: vec![SimpleClassTypeSignature {
                    name: name.to_string(),
                    type_arguments: Vec::new(),
                }],
            };
            Ok((TypeSignature::Class(class), &input[end + 1..]))
        }
        '[' => {
            let dimensions = array_dimensions(input);
            if dimensions > MAX_ARRAY_DIMENSIONS {
                return Err(SignatureError::InvalidDescriptor(input.to_string()));
            }
            let (mut ty, rest) = parse_field_type(&input[dimensions..])?;
            for _ in 0..dimensions {
                ty = TypeSignature::Array(Box::new(ty));
            }
            Ok((ty, rest))
        }
        _ => Err(SignatureError::InvalidDescriptor(input.to_string())),
    }
}
