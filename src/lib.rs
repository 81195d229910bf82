//! Compiles infix expressions and Mustache templates.
//!
//! Expressions are compiled to a postfix stream and evaluated over
//! [`Variant`] values; templates are parsed into a tree of sections.
pub mod cli;
pub mod errors;
pub mod expressions;
pub mod mustache;
pub mod tokenizers;
pub mod variants;

pub use errors::{Error, ErrorCode, ExpressionError, Result};
pub use expressions::{ExpressionCalculator, ExpressionParser, ExpressionToken, ExpressionTokenType};
pub use mustache::{MustacheParser, MustacheToken, MustacheTokenType};
pub use variants::{TypeSafeVariantOperations, TypeUnsafeVariantOperations, Variant, VariantType};
