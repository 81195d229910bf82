//! Evaluate expressions from the command line

use futures::executor::block_on;

use crate::expressions::ExpressionCalculator;
use crate::variants::TypeSafeVariantOperations;

use super::{CliError, read_variables};

/// Options for the eval command
#[derive(Debug, Clone, Default)]
pub struct EvalOptions {
    /// The expression to evaluate
    pub expression: String,
    /// Variables as a JSON object
    pub variables: Option<String>,
    /// Fail on mismatched operand types instead of converting them
    pub type_safe: bool,
}

/// Compile and evaluate an expression, returning the result as JSON
pub fn execute_eval(options: &EvalOptions) -> Result<serde_json::Value, CliError> {
    let mut calculator = ExpressionCalculator::with_expression(&options.expression)?;
    if options.type_safe {
        calculator.set_variant_operations(TypeSafeVariantOperations);
    }

    if let Some(json) = &options.variables {
        read_variables(json, calculator.default_variables_mut())?;
    }

    let result = block_on(calculator.evaluate())?;
    Ok(serde_json::Value::from(&result))
}
