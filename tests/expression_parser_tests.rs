// tests/expression_parser_tests.rs

use stamen::expressions::parser::MAX_NESTING_DEPTH;
use stamen::expressions::{ExpressionParser, ExpressionTokenType};
use stamen::tokenizers::generic_tokenizer;
use stamen::{ErrorCode, Variant};

use ExpressionTokenType::*;

fn postfix(expression: &str) -> Vec<ExpressionTokenType> {
    let mut parser = ExpressionParser::new();
    parser.parse_string(expression).unwrap();
    parser.result_tokens().iter().map(|t| t.token_type()).collect()
}

fn error_code(expression: &str) -> ErrorCode {
    let mut parser = ExpressionParser::new();
    parser.parse_string(expression).unwrap_err().code
}

// ============================================================================
// Precedence
// ============================================================================

#[test]
fn test_multiplication_binds_tighter() {
    assert_eq!(postfix("2+3*4"), vec![Constant, Constant, Constant, Star, Plus]);
}

#[test]
fn test_parentheses_override() {
    assert_eq!(postfix("(2+3)*4"), vec![Constant, Constant, Plus, Constant, Star]);
}

#[test]
fn test_left_associativity() {
    let mut parser = ExpressionParser::new();
    parser.parse_string("10 - 4 - 3").unwrap();
    let values: Vec<&Variant> = parser.result_tokens().iter().map(|t| t.value()).collect();
    assert_eq!(values[0], &Variant::Integer(10));
    assert_eq!(values[1], &Variant::Integer(4));
    assert_eq!(parser.result_tokens()[2].token_type(), Minus);
    assert_eq!(values[3], &Variant::Integer(3));
    assert_eq!(parser.result_tokens()[4].token_type(), Minus);
}

#[test]
fn test_logical_below_relational() {
    assert_eq!(
        postfix("a > 1 AND b < 2 OR NOT c"),
        vec![Variable, Constant, More, Variable, Constant, Less, And, Variable, Not, Or]
    );
}

#[test]
fn test_power_above_multiplication() {
    assert_eq!(postfix("2 * 3 ^ 2"), vec![Constant, Constant, Constant, Power, Star]);
}

#[test]
fn test_unary_minus_and_plus() {
    assert_eq!(postfix("-a"), vec![Variable, Unary]);
    assert_eq!(postfix("+a"), vec![Variable]);
    assert_eq!(postfix("- -1"), vec![Constant, Unary, Unary]);
}

// ============================================================================
// Multi-token operators
// ============================================================================

#[test]
fn test_is_not_null_single_token() {
    assert_eq!(postfix("a IS NOT NULL"), vec![Variable, IsNotNull]);
    assert_eq!(postfix("a   is\n not  null"), vec![Variable, IsNotNull]);
    assert_eq!(postfix("a IS NULL"), vec![Variable, IsNull]);
}

#[test]
fn test_not_like_single_token() {
    assert_eq!(postfix("a NOT LIKE 'x%'"), vec![Variable, Constant, NotLike]);
    assert_eq!(postfix("a LIKE 'x%'"), vec![Variable, Constant, Like]);
}

#[test]
fn test_not_in_value_list() {
    assert_eq!(
        postfix("a NOT IN (1,2)"),
        vec![Variable, Constant, Constant, Constant, Array, NotIn]
    );
    assert_eq!(postfix("a IN b"), vec![Variable, Variable, In]);
}

// ============================================================================
// Operands
// ============================================================================

#[test]
fn test_function_call_argument_count() {
    let mut parser = ExpressionParser::new();
    parser.parse_string("max(1,2,3)").unwrap();
    let tokens = parser.result_tokens();
    assert_eq!(tokens.len(), 5);
    assert_eq!(tokens[3].value(), &Variant::Integer(3));
    assert_eq!(tokens[4].token_type(), Function);
    assert_eq!(tokens[4].value(), &Variant::from("max"));
    assert!(parser.variable_names().is_empty());
}

#[test]
fn test_function_without_arguments() {
    assert_eq!(postfix("Pi()"), vec![Constant, Function]);
}

#[test]
fn test_nested_calls() {
    assert_eq!(
        postfix("f(g(1), 2)"),
        vec![Constant, Constant, Function, Constant, Constant, Function]
    );
}

#[test]
fn test_element_access() {
    assert_eq!(postfix("a[0][i + 1]"), vec![
        Variable, Constant, Element, Variable, Constant, Plus, Element
    ]);
}

#[test]
fn test_literals() {
    let mut parser = ExpressionParser::new();
    parser
        .parse_string("TRUE, 1.5, 'txt', NULL, 7")
        .unwrap_err();

    parser.parse_string("(TRUE, 1.5, 'txt', NULL, 7)").unwrap();
    let values: Vec<Variant> = parser
        .result_tokens()
        .iter()
        .map(|t| t.value().clone())
        .collect();
    assert_eq!(values[..5], [
        Variant::Boolean(true),
        Variant::Float(1.5),
        Variant::String("txt".into()),
        Variant::Null,
        Variant::Integer(7),
    ]);
    assert_eq!(values[5], Variant::Integer(5));
}

#[test]
fn test_quoted_identifier_is_variable() {
    let mut parser = ExpressionParser::new();
    parser.parse_string("\"unit price\" * 2").unwrap();
    assert_eq!(parser.variable_names(), ["unit price"]);
}

#[test]
fn test_variable_names_deduplicated_ignoring_case() {
    let mut parser = ExpressionParser::new();
    parser.parse_string("Total + total * b + TOTAL").unwrap();
    assert_eq!(parser.variable_names(), ["Total", "b"]);
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_missing_close_parenthesis() {
    assert_eq!(error_code("(1 + 2"), ErrorCode::MissedCloseParenthesis);
    assert_eq!(error_code("f(1, 2"), ErrorCode::MissedCloseParenthesis);
}

#[test]
fn test_missing_close_bracket() {
    assert_eq!(error_code("a[1"), ErrorCode::MissedCloseSquareBracket);
}

#[test]
fn test_trailing_tokens() {
    let mut parser = ExpressionParser::new();
    let err = parser.parse_string("1 2").unwrap_err();
    assert_eq!(err.code, ErrorCode::ErrorNear);
    assert_eq!((err.line, err.column), (Some(1), Some(3)));
}

#[test]
fn test_operator_in_operand_position() {
    assert_eq!(error_code("1 + * 2"), ErrorCode::ErrorAt);
}

#[test]
fn test_unexpected_end() {
    assert_eq!(error_code("1 +"), ErrorCode::UnexpectedEnd);
    assert_eq!(error_code(""), ErrorCode::UnexpectedEnd);
}

#[test]
fn test_unknown_symbol() {
    let mut parser = ExpressionParser::new();
    let err = parser.parse_string("a ; b").unwrap_err();
    assert_eq!(err.code, ErrorCode::UnknownSymbol);
    assert_eq!(err.column, Some(3));
}

#[test]
fn test_nesting_limit() {
    let nested = |depth: usize| format!("{}1{}", "(".repeat(depth), ")".repeat(depth));

    let mut parser = ExpressionParser::new();
    parser.parse_string(&nested(MAX_NESTING_DEPTH - 1)).unwrap();
    assert_eq!(postfix(&nested(MAX_NESTING_DEPTH - 1)), vec![Constant]);

    let err = parser.parse_string(&nested(1000)).unwrap_err();
    assert_eq!(err.code, ErrorCode::ErrorAt);
    assert_eq!((err.line, err.column), (Some(1), Some(MAX_NESTING_DEPTH + 1)));

    let nots = format!("{}TRUE", "NOT ".repeat(1000));
    assert_eq!(error_code(&nots), ErrorCode::ErrorAt);
    assert_eq!(error_code(&format!("{}1", "-".repeat(1000))), ErrorCode::ErrorAt);
}

#[test]
fn test_failure_clears_state() {
    let mut parser = ExpressionParser::new();
    parser.parse_string("a + 1").unwrap();
    assert!(parser.parse_string("a +").is_err());
    assert!(parser.result_tokens().is_empty());
    assert!(parser.variable_names().is_empty());
    assert!(parser.original_tokens().is_empty());
    assert_eq!(parser.expression(), "");
}

// ============================================================================
// Reuse
// ============================================================================

#[test]
fn test_reparse_is_idempotent() {
    let mut parser = ExpressionParser::new();
    parser.parse_string("x * (y + 2) > z").unwrap();
    let first = parser.result_tokens().to_vec();
    let names = parser.variable_names().to_vec();

    parser.parse_string("x * (y + 2) > z").unwrap();
    assert_eq!(parser.result_tokens(), first.as_slice());
    assert_eq!(parser.variable_names(), names.as_slice());
}

#[test]
fn test_parse_external_tokens() {
    let tokens = generic_tokenizer().tokenize_buffer("a >= 10").unwrap();
    let mut parser = ExpressionParser::new();
    parser.parse_tokens(tokens).unwrap();
    assert_eq!(
        parser.result_tokens().iter().map(|t| t.token_type()).collect::<Vec<_>>(),
        vec![Variable, Constant, MoreEqual]
    );
    assert_eq!(parser.expression(), "a>=10");
}
