//! Dynamically typed values and the operations defined on them.
//!
//! - **[variant]** - the [`Variant`] value and its [`VariantType`] tag
//! - **[operations]** - the [`VariantOperations`] contract
//! - **[type_safe]** / **[type_unsafe]** - strict and coercing providers
pub mod operations;
pub mod type_safe;
pub mod type_unsafe;
pub mod variant;

pub use operations::VariantOperations;
pub use type_safe::TypeSafeVariantOperations;
pub use type_unsafe::TypeUnsafeVariantOperations;
pub use variant::{Variant, VariantType};
