use log::debug;

use crate::errors::{Error, ErrorCode, Result};
use crate::tokenizers::Token;
use crate::variants::{TypeUnsafeVariantOperations, Variant, VariantOperations};

use super::functions::{FunctionCollection, Functions};
use super::parser::ExpressionParser;
use super::stack::CalculationStack;
use super::token::{ExpressionToken, ExpressionTokenType};
use super::variables::{Variable, VariableCollection, Variables};

/// Compiles an expression once and evaluates it any number of times.
///
/// The calculator owns a default variable scope, the standard function
/// library and a variant operation provider (type-unsafe unless replaced).
/// When `auto_variables` is on, every variable referenced by a newly set
/// expression is added to the default scope holding null.
///
/// # Examples
///
/// ```
/// use stamen::expressions::ExpressionCalculator;
/// use stamen::Variant;
///
/// let mut calculator = ExpressionCalculator::with_expression("price * (1 + rate)").unwrap();
/// calculator.default_variables_mut().set("price", 100);
/// calculator.default_variables_mut().set("rate", 0.5);
///
/// let result = futures::executor::block_on(calculator.evaluate()).unwrap();
/// assert_eq!(result, Variant::Float(150.0));
/// ```
pub struct ExpressionCalculator {
    parser: ExpressionParser,
    default_variables: VariableCollection,
    default_functions: FunctionCollection,
    variant_operations: Box<dyn VariantOperations>,
    auto_variables: bool,
}

impl Default for ExpressionCalculator {
    fn default() -> Self {
        ExpressionCalculator {
            parser: ExpressionParser::new(),
            default_variables: VariableCollection::new(),
            default_functions: FunctionCollection::with_defaults(),
            variant_operations: Box::new(TypeUnsafeVariantOperations),
            auto_variables: true,
        }
    }
}

impl ExpressionCalculator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_expression(expression: &str) -> Result<Self> {
        let mut calculator = Self::new();
        calculator.set_expression(expression)?;
        Ok(calculator)
    }

    /// Compiles `expression`, replacing the previous one.
    pub fn set_expression(&mut self, expression: &str) -> Result<()> {
        self.parser.parse_string(expression)?;
        self.on_expression_changed();
        Ok(())
    }

    /// Compiles an expression from already scanned tokens.
    pub fn set_original_tokens(&mut self, tokens: Vec<Token>) -> Result<()> {
        self.parser.parse_tokens(tokens)?;
        self.on_expression_changed();
        Ok(())
    }

    fn on_expression_changed(&mut self) {
        if self.auto_variables {
            add_missing_variables(self.parser.variable_names(), &mut self.default_variables);
        }
    }

    pub fn expression(&self) -> &str {
        self.parser.expression()
    }

    pub fn original_tokens(&self) -> &[Token] {
        self.parser.original_tokens()
    }

    pub fn initial_tokens(&self) -> &[ExpressionToken] {
        self.parser.initial_tokens()
    }

    pub fn result_tokens(&self) -> &[ExpressionToken] {
        self.parser.result_tokens()
    }

    pub fn variable_names(&self) -> &[String] {
        self.parser.variable_names()
    }

    pub fn default_variables(&self) -> &VariableCollection {
        &self.default_variables
    }

    pub fn default_variables_mut(&mut self) -> &mut VariableCollection {
        &mut self.default_variables
    }

    pub fn default_functions(&self) -> &FunctionCollection {
        &self.default_functions
    }

    pub fn default_functions_mut(&mut self) -> &mut FunctionCollection {
        &mut self.default_functions
    }

    pub fn variant_operations(&self) -> &dyn VariantOperations {
        self.variant_operations.as_ref()
    }

    pub fn set_variant_operations(&mut self, operations: impl VariantOperations + 'static) {
        self.variant_operations = Box::new(operations);
    }

    pub fn auto_variables(&self) -> bool {
        self.auto_variables
    }

    pub fn set_auto_variables(&mut self, auto_variables: bool) {
        self.auto_variables = auto_variables;
    }

    /// Adds every referenced variable missing from `variables`, holding null.
    pub fn create_variables(&self, variables: &mut dyn Variables) {
        add_missing_variables(self.parser.variable_names(), variables);
    }

    /// Forgets the compiled expression and the default variables.
    pub fn clear(&mut self) {
        self.parser.clear();
        self.default_variables.clear();
    }

    /// Evaluates against the default variables and functions.
    pub async fn evaluate(&self) -> Result<Variant> {
        self.evaluate_with_variables_and_functions(None, None).await
    }

    pub async fn evaluate_with_variables(&self, variables: &dyn Variables) -> Result<Variant> {
        self.evaluate_with_variables_and_functions(Some(variables), None)
            .await
    }

    /// Evaluates the compiled postfix stream. `None` selects the calculator's
    /// default scope or function library.
    pub async fn evaluate_with_variables_and_functions(
        &self,
        variables: Option<&dyn Variables>,
        functions: Option<&dyn Functions>,
    ) -> Result<Variant> {
        let variables = variables.unwrap_or(&self.default_variables);
        let functions = functions.unwrap_or(&self.default_functions);
        let operations = self.variant_operations.as_ref();

        let mut stack = CalculationStack::new();
        for token in self.parser.result_tokens() {
            let step = match token.token_type() {
                ExpressionTokenType::Constant => {
                    stack.push(token.value().clone());
                    Ok(())
                }
                ExpressionTokenType::Variable => lookup_variable(token, variables, &mut stack),
                ExpressionTokenType::Function => {
                    call_function(token, functions, operations, &mut stack).await
                }
                ExpressionTokenType::Array => build_array(&mut stack),
                _ => apply_operator(token.token_type(), operations, &mut stack),
            };
            step.map_err(|e| locate(e, token))?;
        }

        if stack.len() != 1 {
            return Err(Error::new(
                ErrorCode::Internal,
                format!("Evaluation left {} values on the stack", stack.len()),
            ));
        }
        let result = stack.pop()?;
        debug!("evaluated '{}' to {:?}", self.parser.expression(), result);
        Ok(result)
    }
}

fn add_missing_variables(names: &[String], variables: &mut dyn Variables) {
    for name in names {
        if variables.find_by_name(name).is_none() {
            variables.add(Variable::new(name.as_str()));
        }
    }
}

/// Attaches the token position to errors raised without one.
fn locate(mut error: Error, token: &ExpressionToken) -> Error {
    if error.line.is_none() {
        error.line = Some(token.line());
        error.column = Some(token.column());
    }
    error
}

fn lookup_variable(
    token: &ExpressionToken,
    variables: &dyn Variables,
    stack: &mut CalculationStack,
) -> Result<()> {
    let name = token.value().as_string();
    let variable = variables.find_by_name(&name).ok_or_else(|| {
        Error::new(ErrorCode::VarNotFound, format!("Variable {} was not found", name))
    })?;
    stack.push(variable.value.clone());
    Ok(())
}

/// Pops an element count and then that many values, restoring source order.
fn pop_counted(stack: &mut CalculationStack) -> Result<Vec<Variant>> {
    let count = stack
        .pop()?
        .as_int()
        .and_then(|count| usize::try_from(count).ok())
        .ok_or_else(|| Error::new(ErrorCode::Internal, "Invalid element count on the stack"))?;

    let mut values = Vec::with_capacity(count);
    for _ in 0..count {
        values.push(stack.pop()?);
    }
    values.reverse();
    Ok(values)
}

async fn call_function(
    token: &ExpressionToken,
    functions: &dyn Functions,
    operations: &dyn VariantOperations,
    stack: &mut CalculationStack,
) -> Result<()> {
    let name = token.value().as_string();
    let args = pop_counted(stack)?;
    let function = functions.find_by_name(&name).ok_or_else(|| {
        Error::new(ErrorCode::FuncNotFound, format!("Function {} was not found", name))
    })?;

    let result = function.calculate(args, operations).await?;
    stack.push(result);
    Ok(())
}

fn build_array(stack: &mut CalculationStack) -> Result<()> {
    let items = pop_counted(stack)?;
    stack.push(Variant::Array(items));
    Ok(())
}

fn apply_operator(
    token_type: ExpressionTokenType,
    ops: &dyn VariantOperations,
    stack: &mut CalculationStack,
) -> Result<()> {
    use ExpressionTokenType::*;

    let result = match token_type {
        Unary | Not | IsNull | IsNotNull => {
            let value = stack.pop()?;
            match token_type {
                Unary => ops.negative(&value)?,
                Not => ops.not(&value)?,
                IsNull => ops.is_null(&value)?,
                _ => ops.not(&ops.is_null(&value)?)?,
            }
        }
        Plus | Minus | Star | Slash | Percent | Power | ShiftLeft | ShiftRight | Equal
        | NotEqual | More | Less | MoreEqual | LessEqual | And | Or | Xor | In | NotIn | Like
        | NotLike | Element => {
            let right = stack.pop()?;
            let left = stack.pop()?;
            match token_type {
                Plus => ops.add(&left, &right)?,
                Minus => ops.sub(&left, &right)?,
                Star => ops.mul(&left, &right)?,
                Slash => ops.div(&left, &right)?,
                Percent => ops.modulo(&left, &right)?,
                Power => ops.pow(&left, &right)?,
                ShiftLeft => ops.lsh(&left, &right)?,
                ShiftRight => ops.rsh(&left, &right)?,
                Equal => ops.equal(&left, &right)?,
                NotEqual => ops.not_equal(&left, &right)?,
                More => ops.more(&left, &right)?,
                Less => ops.less(&left, &right)?,
                MoreEqual => ops.more_equal(&left, &right)?,
                LessEqual => ops.less_equal(&left, &right)?,
                And => ops.and(&left, &right)?,
                Or => ops.or(&left, &right)?,
                Xor => ops.xor(&left, &right)?,
                In => ops.is_in(&left, &right)?,
                NotIn => ops.not(&ops.is_in(&left, &right)?)?,
                Like => ops.like(&left, &right)?,
                NotLike => ops.not(&ops.like(&left, &right)?)?,
                _ => ops.get_element(&left, &right)?,
            }
        }
        Constant | Variable | Function | Array | LeftParen | RightParen | LeftBracket
        | RightBracket | Comma | Is | Null | Unknown => {
            return Err(Error::new(
                ErrorCode::Internal,
                format!("Unexpected {:?} token in compiled expression", token_type),
            ));
        }
    };
    stack.push(result);
    Ok(())
}
