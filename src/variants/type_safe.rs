use crate::errors::Result;

use super::operations::bad_conversion;
use super::{Variant, VariantOperations, VariantType};

/// Operations that refuse to mix types.
///
/// The only implicit conversion is widening an integer to a float.
#[derive(Debug, Default, Clone, Copy)]
pub struct TypeSafeVariantOperations;

impl TypeSafeVariantOperations {
    pub fn new() -> Self {
        TypeSafeVariantOperations
    }
}

impl VariantOperations for TypeSafeVariantOperations {
    fn convert(&self, value: &Variant, target: VariantType) -> Result<Variant> {
        if value.variant_type() == target {
            return Ok(value.clone());
        }
        match (value, target) {
            (_, VariantType::Null) => Ok(Variant::Null),
            (Variant::Integer(n), VariantType::Float) => Ok(Variant::Float(*n as f64)),
            (value, target) => Err(bad_conversion(value, target)),
        }
    }
}
