use crate::errors::Result;

use super::operations::bad_conversion;
use super::{Variant, VariantOperations, VariantType};

/// Operations that coerce the right operand to the type of the left one.
///
/// Strings are parsed into numbers and booleans, numbers and booleans are
/// formatted into strings, and scalars are wrapped into one-element arrays.
/// When the right operand cannot take the left type the left one is
/// converted instead, so `1 = 'abc'` compares as strings.
#[derive(Debug, Default, Clone, Copy)]
pub struct TypeUnsafeVariantOperations;

impl TypeUnsafeVariantOperations {
    pub fn new() -> Self {
        TypeUnsafeVariantOperations
    }
}

fn parse_bool(text: &str) -> bool {
    let text = text.trim();
    if text.eq_ignore_ascii_case("true") {
        return true;
    }
    if text.is_empty() || text.eq_ignore_ascii_case("false") {
        return false;
    }
    match text.parse::<f64>() {
        Ok(n) => n != 0.0,
        Err(_) => true,
    }
}

impl VariantOperations for TypeUnsafeVariantOperations {
    fn convert(&self, value: &Variant, target: VariantType) -> Result<Variant> {
        if value.variant_type() == target {
            return Ok(value.clone());
        }

        let converted = match (value, target) {
            (_, VariantType::Null) => Some(Variant::Null),
            (_, VariantType::String) => Some(Variant::String(value.as_string())),

            (Variant::String(s), VariantType::Boolean) => Some(Variant::Boolean(parse_bool(s))),
            (v, VariantType::Boolean) => Some(Variant::Boolean(v.as_bool())),

            (Variant::Null, VariantType::Integer) => Some(Variant::Integer(0)),
            (Variant::Boolean(b), VariantType::Integer) => Some(Variant::Integer(*b as i64)),
            (Variant::Float(f), VariantType::Integer) => Some(Variant::Integer(f.trunc() as i64)),
            (Variant::String(s), VariantType::Integer) => {
                let s = s.trim();
                s.parse::<i64>()
                    .ok()
                    .or_else(|| s.parse::<f64>().ok().map(|f| f.trunc() as i64))
                    .map(Variant::Integer)
            }

            (Variant::Null, VariantType::Float) => Some(Variant::Float(0.0)),
            (Variant::Boolean(b), VariantType::Float) => Some(Variant::Float(if *b { 1.0 } else { 0.0 })),
            (Variant::Integer(n), VariantType::Float) => Some(Variant::Float(*n as f64)),
            (Variant::String(s), VariantType::Float) => s.trim().parse::<f64>().ok().map(Variant::Float),

            (v, VariantType::Array) => Some(Variant::Array(vec![v.clone()])),

            _ => None,
        };

        converted.ok_or_else(|| bad_conversion(value, target))
    }

    fn coerce(&self, left: &Variant, right: &Variant) -> Result<(Variant, Variant)> {
        match self.convert(right, left.variant_type()) {
            Ok(right) => Ok((left.clone(), right)),
            Err(_) => Ok((self.convert(left, right.variant_type())?, right.clone())),
        }
    }
}
