//! Show the compiled form of an expression

use crate::expressions::{ExpressionParser, ExpressionToken, ExpressionTokenType};

use super::CliError;

/// Postfix stream and referenced variables of a compiled expression
#[derive(Debug, Clone, PartialEq)]
pub struct CompileResult {
    pub postfix: Vec<String>,
    pub variables: Vec<String>,
}

fn describe(token: &ExpressionToken) -> String {
    match token.token_type() {
        ExpressionTokenType::Constant => serde_json::Value::from(token.value()).to_string(),
        ExpressionTokenType::Variable => token.value().as_string(),
        ExpressionTokenType::Function => format!("{}()", token.value().as_string()),
        other => format!("{:?}", other),
    }
}

/// Compile an expression without evaluating it
pub fn execute_compile(expression: &str) -> Result<CompileResult, CliError> {
    let mut parser = ExpressionParser::new();
    parser.parse_string(expression)?;

    Ok(CompileResult {
        postfix: parser.result_tokens().iter().map(describe).collect(),
        variables: parser.variable_names().to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_shows_postfix() {
        let result = execute_compile("max(a, 'x') * -2").unwrap();
        assert_eq!(
            result.postfix,
            vec!["a", "\"x\"", "2", "max()", "2", "Unary", "Star"]
        );
        assert_eq!(result.variables, vec!["a"]);
    }
}
