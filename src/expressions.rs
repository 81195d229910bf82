//! # Expressions
//!
//! Infix expressions are compiled once into a postfix token stream and then
//! evaluated any number of times against a variable scope and a function
//! library:
//!
//! - **[tokenizer]** - expression flavour of the generic tokenizer
//! - **[parser]** - precedence-climbing compiler to postfix
//! - **[calculator]** - stack evaluator over [`Variant`](crate::Variant)s
//! - **[variables]** and **[functions]** - the evaluation environment
//!
//! ```
//! use stamen::expressions::ExpressionCalculator;
//! use stamen::Variant;
//!
//! let calculator = ExpressionCalculator::with_expression("2 + 3 * 4").unwrap();
//! let result = futures::executor::block_on(calculator.evaluate()).unwrap();
//! assert_eq!(result, Variant::Integer(14));
//! ```
pub mod calculator;
pub mod functions;
pub mod parser;
pub mod stack;
pub mod token;
pub mod tokenizer;
pub mod variables;

pub use calculator::ExpressionCalculator;
pub use functions::{
    DelegatedFunction, Function, FunctionCalculator, FunctionCollection, Functions,
    check_min_param_count, check_param_count,
};
pub use parser::ExpressionParser;
pub use stack::CalculationStack;
pub use token::{ExpressionToken, ExpressionTokenType};
pub use tokenizer::{ExpressionNumberState, ExpressionQuoteState, expression_tokenizer};
pub use variables::{Variable, VariableCollection, Variables};
