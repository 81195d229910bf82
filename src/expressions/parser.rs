use log::debug;

use crate::errors::{Error, ErrorCode, Result};
use crate::tokenizers::{Token, TokenType};
use crate::variants::Variant;

use super::token::{ExpressionToken, ExpressionTokenType};
use super::tokenizer::expression_tokenizer;

/// Deepest nesting of groups, calls, indexes and prefix operators.
pub const MAX_NESTING_DEPTH: usize = 64;

/// Operators and keywords recognised in expressions, matched against the
/// upper-cased token text.
const OPERATORS: &[(&str, ExpressionTokenType)] = &[
    ("(", ExpressionTokenType::LeftParen),
    (")", ExpressionTokenType::RightParen),
    ("[", ExpressionTokenType::LeftBracket),
    ("]", ExpressionTokenType::RightBracket),
    (",", ExpressionTokenType::Comma),
    ("+", ExpressionTokenType::Plus),
    ("-", ExpressionTokenType::Minus),
    ("*", ExpressionTokenType::Star),
    ("/", ExpressionTokenType::Slash),
    ("%", ExpressionTokenType::Percent),
    ("^", ExpressionTokenType::Power),
    ("=", ExpressionTokenType::Equal),
    ("<>", ExpressionTokenType::NotEqual),
    ("!=", ExpressionTokenType::NotEqual),
    (">", ExpressionTokenType::More),
    ("<", ExpressionTokenType::Less),
    (">=", ExpressionTokenType::MoreEqual),
    ("<=", ExpressionTokenType::LessEqual),
    ("<<", ExpressionTokenType::ShiftLeft),
    (">>", ExpressionTokenType::ShiftRight),
    ("AND", ExpressionTokenType::And),
    ("OR", ExpressionTokenType::Or),
    ("XOR", ExpressionTokenType::Xor),
    ("NOT", ExpressionTokenType::Not),
    ("IS", ExpressionTokenType::Is),
    ("IN", ExpressionTokenType::In),
    ("NULL", ExpressionTokenType::Null),
    ("LIKE", ExpressionTokenType::Like),
];

fn find_operator(text: &str) -> Option<ExpressionTokenType> {
    let upper = text.to_uppercase();
    OPERATORS
        .iter()
        .find(|(name, _)| *name == upper)
        .map(|(_, token_type)| *token_type)
}

/// Compiles infix expressions into a postfix token stream.
///
/// The parser keeps the state of the last parse: the source, the raw tokens,
/// the classified tokens, the postfix result and the referenced variable
/// names. A failed parse leaves the parser cleared.
///
/// # Examples
///
/// ```
/// use stamen::expressions::{ExpressionParser, ExpressionTokenType};
///
/// let mut parser = ExpressionParser::new();
/// parser.parse_string("a + 2 * 3").unwrap();
///
/// let types: Vec<ExpressionTokenType> =
///     parser.result_tokens().iter().map(|t| t.token_type()).collect();
/// assert_eq!(types, vec![
///     ExpressionTokenType::Variable,
///     ExpressionTokenType::Constant,
///     ExpressionTokenType::Constant,
///     ExpressionTokenType::Star,
///     ExpressionTokenType::Plus,
/// ]);
/// assert_eq!(parser.variable_names(), ["a"]);
/// ```
#[derive(Debug, Default)]
pub struct ExpressionParser {
    expression: String,
    original_tokens: Vec<Token>,
    initial_tokens: Vec<ExpressionToken>,
    current_token_index: usize,
    depth: usize,
    result_tokens: Vec<ExpressionToken>,
    variable_names: Vec<String>,
}

impl ExpressionParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Source text of the last parsed expression
    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// Raw tokens produced by the tokenizer
    pub fn original_tokens(&self) -> &[Token] {
        &self.original_tokens
    }

    /// Classified tokens in source order
    pub fn initial_tokens(&self) -> &[ExpressionToken] {
        &self.initial_tokens
    }

    /// Compiled postfix stream
    pub fn result_tokens(&self) -> &[ExpressionToken] {
        &self.result_tokens
    }

    /// Referenced variables in order of first appearance
    pub fn variable_names(&self) -> &[String] {
        &self.variable_names
    }

    /// Resets all parsing state.
    pub fn clear(&mut self) {
        self.expression.clear();
        self.original_tokens.clear();
        self.initial_tokens.clear();
        self.current_token_index = 0;
        self.depth = 0;
        self.result_tokens.clear();
        self.variable_names.clear();
    }

    /// Tokenizes and compiles an expression.
    pub fn parse_string(&mut self, expression: &str) -> Result<()> {
        self.clear();
        self.expression = expression.to_string();

        let result = expression_tokenizer()
            .tokenize_buffer(expression)
            .and_then(|tokens| {
                self.original_tokens = tokens;
                self.perform_parsing()
            });
        self.finish(result)
    }

    /// Compiles an expression from tokens scanned by the caller.
    pub fn parse_tokens(&mut self, tokens: Vec<Token>) -> Result<()> {
        self.clear();
        self.expression = tokens.iter().map(Token::value).collect();
        self.original_tokens = tokens;

        let result = self.perform_parsing();
        self.finish(result)
    }

    fn finish(&mut self, result: Result<()>) -> Result<()> {
        match result {
            Ok(()) => {
                debug!(
                    "compiled expression '{}' into {} postfix tokens, variables: {:?}",
                    self.expression,
                    self.result_tokens.len(),
                    self.variable_names
                );
                Ok(())
            }
            Err(e) => {
                debug!("failed to compile expression '{}': {}", self.expression, e);
                self.clear();
                Err(e)
            }
        }
    }

    fn perform_parsing(&mut self) -> Result<()> {
        self.perform_lexical_analysis()?;
        self.perform_syntax_analysis()
    }

    fn perform_lexical_analysis(&mut self) -> Result<()> {
        let mut tokens = Vec::with_capacity(self.original_tokens.len());

        for token in &self.original_tokens {
            let (line, column) = (token.line(), token.column());
            let expression_token = match token.token_type() {
                TokenType::Whitespace | TokenType::Comment | TokenType::Eof | TokenType::Eol => continue,
                TokenType::Word | TokenType::Keyword => {
                    let upper = token.value().to_uppercase();
                    if upper == "TRUE" || upper == "FALSE" {
                        ExpressionToken::new(
                            ExpressionTokenType::Constant,
                            Variant::Boolean(upper == "TRUE"),
                            line,
                            column,
                        )
                    } else {
                        let token_type =
                            find_operator(&upper).unwrap_or(ExpressionTokenType::Variable);
                        ExpressionToken::new(token_type, Variant::from(token.value()), line, column)
                    }
                }
                TokenType::Integer | TokenType::Float | TokenType::Number => {
                    ExpressionToken::new(ExpressionTokenType::Constant, parse_number(token)?, line, column)
                }
                TokenType::Quoted => ExpressionToken::new(
                    ExpressionTokenType::Constant,
                    Variant::from(token.value()),
                    line,
                    column,
                ),
                TokenType::Symbol => match find_operator(token.value()) {
                    Some(token_type) => {
                        ExpressionToken::new(token_type, Variant::from(token.value()), line, column)
                    }
                    None => return Err(unknown_symbol(token)),
                },
                TokenType::HexDecimal | TokenType::Special | TokenType::Unknown => {
                    return Err(unknown_symbol(token));
                }
            };
            tokens.push(expression_token);
        }

        self.initial_tokens = tokens;
        Ok(())
    }

    fn perform_syntax_analysis(&mut self) -> Result<()> {
        self.current_token_index = 0;
        self.depth = 0;
        self.result_tokens.clear();

        self.parse_logical()?;

        if let Some(token) = self.current_token() {
            return Err(Error::at(
                ErrorCode::ErrorNear,
                format!("Syntax error near {}", token.value()),
                token.line(),
                token.column(),
            ));
        }
        Ok(())
    }

    fn current_token(&self) -> Option<&ExpressionToken> {
        self.initial_tokens.get(self.current_token_index)
    }

    fn advance(&mut self) {
        self.current_token_index += 1;
    }

    fn check(&self, token_type: ExpressionTokenType) -> bool {
        self.current_token()
            .is_some_and(|token| token.token_type() == token_type)
    }

    /// Matches a sequence of token types starting at the current token.
    fn check_sequence(&self, types: &[ExpressionTokenType]) -> bool {
        types.iter().enumerate().all(|(offset, token_type)| {
            self.initial_tokens
                .get(self.current_token_index + offset)
                .is_some_and(|token| token.token_type() == *token_type)
        })
    }

    /// Position for errors: the current token, or the last token at the end
    /// of input.
    fn error_position(&self) -> (usize, usize) {
        self.current_token()
            .or_else(|| self.initial_tokens.last())
            .map(|token| (token.line(), token.column()))
            .unwrap_or((1, 1))
    }

    /// Enters one level of nesting at `token`.
    fn descend(&mut self, token: &ExpressionToken) -> Result<()> {
        self.depth += 1;
        if self.depth > MAX_NESTING_DEPTH {
            return Err(Error::at(
                ErrorCode::ErrorAt,
                format!("Expression is nested deeper than {} levels", MAX_NESTING_DEPTH),
                token.line(),
                token.column(),
            ));
        }
        Ok(())
    }

    fn unexpected_end(&self) -> Error {
        let (line, column) = self.error_position();
        Error::at(ErrorCode::UnexpectedEnd, "Unexpected end of expression", line, column)
    }

    fn push_result(&mut self, token_type: ExpressionTokenType, value: Variant, line: usize, column: usize) {
        self.result_tokens
            .push(ExpressionToken::new(token_type, value, line, column));
    }

    /// Pushes an operator that was read at `token`.
    fn push_operator(&mut self, token_type: ExpressionTokenType, token: &ExpressionToken) {
        self.push_result(token_type, token.value().clone(), token.line(), token.column());
    }

    fn register_variable(&mut self, name: &str) {
        if !self
            .variable_names
            .iter()
            .any(|known| known.eq_ignore_ascii_case(name))
        {
            self.variable_names.push(name.to_string());
        }
    }

    /// Level 0: `AND`, `OR`, `XOR`
    fn parse_logical(&mut self) -> Result<()> {
        self.parse_not()?;

        while let Some(token) = self.current_token().cloned() {
            match token.token_type() {
                ExpressionTokenType::And | ExpressionTokenType::Or | ExpressionTokenType::Xor => {
                    self.advance();
                    self.parse_not()?;
                    self.push_operator(token.token_type(), &token);
                }
                _ => break,
            }
        }
        Ok(())
    }

    /// Level 1: prefix `NOT`
    fn parse_not(&mut self) -> Result<()> {
        match self.current_token().cloned() {
            Some(token) if token.token_type() == ExpressionTokenType::Not => {
                self.descend(&token)?;
                self.advance();
                self.parse_not()?;
                self.push_operator(ExpressionTokenType::Not, &token);
                self.depth -= 1;
                Ok(())
            }
            _ => self.parse_relational(),
        }
    }

    /// Level 2: `= <> != > < >= <=`
    fn parse_relational(&mut self) -> Result<()> {
        self.parse_additive()?;

        while let Some(token) = self.current_token().cloned() {
            match token.token_type() {
                ExpressionTokenType::Equal
                | ExpressionTokenType::NotEqual
                | ExpressionTokenType::More
                | ExpressionTokenType::Less
                | ExpressionTokenType::MoreEqual
                | ExpressionTokenType::LessEqual => {
                    self.advance();
                    self.parse_additive()?;
                    self.push_operator(token.token_type(), &token);
                }
                _ => break,
            }
        }
        Ok(())
    }

    /// Level 3: `+ - LIKE` and the combinations `NOT LIKE`, `IS NULL`,
    /// `IS NOT NULL`, `NOT IN`
    fn parse_additive(&mut self) -> Result<()> {
        use ExpressionTokenType::*;

        self.parse_multiplicative()?;

        while let Some(token) = self.current_token().cloned() {
            if self.check_sequence(&[Not, Like]) {
                self.current_token_index += 2;
                self.parse_multiplicative()?;
                self.push_operator(NotLike, &token);
            } else if self.check_sequence(&[Is, Not, Null]) {
                self.current_token_index += 3;
                self.push_operator(IsNotNull, &token);
            } else if self.check_sequence(&[Is, Null]) {
                self.current_token_index += 2;
                self.push_operator(IsNull, &token);
            } else if self.check_sequence(&[Not, In]) {
                self.current_token_index += 2;
                self.parse_multiplicative()?;
                self.push_operator(NotIn, &token);
            } else if matches!(token.token_type(), Plus | Minus | Like) {
                self.advance();
                self.parse_multiplicative()?;
                self.push_operator(token.token_type(), &token);
            } else {
                break;
            }
        }
        Ok(())
    }

    /// Level 4: `* / %`
    fn parse_multiplicative(&mut self) -> Result<()> {
        self.parse_power()?;

        while let Some(token) = self.current_token().cloned() {
            match token.token_type() {
                ExpressionTokenType::Star | ExpressionTokenType::Slash | ExpressionTokenType::Percent => {
                    self.advance();
                    self.parse_power()?;
                    self.push_operator(token.token_type(), &token);
                }
                _ => break,
            }
        }
        Ok(())
    }

    /// Level 5: `^ IN << >>`
    fn parse_power(&mut self) -> Result<()> {
        self.parse_primary()?;

        while let Some(token) = self.current_token().cloned() {
            match token.token_type() {
                ExpressionTokenType::Power
                | ExpressionTokenType::In
                | ExpressionTokenType::ShiftLeft
                | ExpressionTokenType::ShiftRight => {
                    self.advance();
                    self.parse_primary()?;
                    self.push_operator(token.token_type(), &token);
                }
                _ => break,
            }
        }
        Ok(())
    }

    /// Level 6: literals, variables, calls, groups, value lists, unary signs
    /// and postfix indexing
    fn parse_primary(&mut self) -> Result<()> {
        let Some(token) = self.current_token().cloned() else {
            return Err(self.unexpected_end());
        };
        self.descend(&token)?;

        match token.token_type() {
            ExpressionTokenType::Plus => {
                self.advance();
                self.parse_primary()?;
            }
            ExpressionTokenType::Minus => {
                self.advance();
                self.parse_primary()?;
                self.push_operator(ExpressionTokenType::Unary, &token);
            }
            ExpressionTokenType::LeftParen => {
                self.advance();
                let count = self.parse_list()?;
                self.expect_close(
                    ExpressionTokenType::RightParen,
                    ErrorCode::MissedCloseParenthesis,
                    "Missing closing parenthesis",
                )?;
                if count > 1 {
                    self.push_result(
                        ExpressionTokenType::Constant,
                        Variant::Integer(count as i64),
                        token.line(),
                        token.column(),
                    );
                    self.push_result(ExpressionTokenType::Array, Variant::Null, token.line(), token.column());
                }
            }
            ExpressionTokenType::Variable => {
                self.advance();
                if self.check(ExpressionTokenType::LeftParen) {
                    self.parse_function_call(&token)?;
                } else {
                    self.register_variable(&token.value().as_string());
                    self.result_tokens.push(token);
                }
            }
            ExpressionTokenType::Constant => {
                self.advance();
                self.result_tokens.push(token);
            }
            ExpressionTokenType::Null => {
                self.advance();
                self.push_result(ExpressionTokenType::Constant, Variant::Null, token.line(), token.column());
            }
            _ => {
                return Err(Error::at(
                    ErrorCode::ErrorAt,
                    format!("Syntax error at {}", token.value()),
                    token.line(),
                    token.column(),
                ));
            }
        }

        while let Some(bracket) = self.current_token().cloned() {
            if bracket.token_type() != ExpressionTokenType::LeftBracket {
                break;
            }
            self.advance();
            self.parse_logical()?;
            self.expect_close(
                ExpressionTokenType::RightBracket,
                ErrorCode::MissedCloseSquareBracket,
                "Missing closing square bracket",
            )?;
            self.push_operator(ExpressionTokenType::Element, &bracket);
        }
        self.depth -= 1;
        Ok(())
    }

    /// Parses `name(arg, ...)` with the current token on `(`; emits the
    /// argument count followed by the function token.
    fn parse_function_call(&mut self, name: &ExpressionToken) -> Result<()> {
        self.advance();

        let count = if self.check(ExpressionTokenType::RightParen) {
            0
        } else {
            self.parse_list()?
        };
        self.expect_close(
            ExpressionTokenType::RightParen,
            ErrorCode::MissedCloseParenthesis,
            "Missing closing parenthesis",
        )?;

        self.push_result(
            ExpressionTokenType::Constant,
            Variant::Integer(count as i64),
            name.line(),
            name.column(),
        );
        self.push_operator(ExpressionTokenType::Function, name);
        Ok(())
    }

    /// Parses comma separated expressions, returning how many were read.
    fn parse_list(&mut self) -> Result<usize> {
        self.parse_logical()?;
        let mut count = 1;
        while self.check(ExpressionTokenType::Comma) {
            self.advance();
            self.parse_logical()?;
            count += 1;
        }
        Ok(count)
    }

    fn expect_close(&mut self, expected: ExpressionTokenType, code: ErrorCode, message: &str) -> Result<()> {
        if self.check(expected) {
            self.advance();
            return Ok(());
        }
        let (line, column) = self.error_position();
        Err(Error::at(code, message, line, column))
    }
}

fn parse_number(token: &Token) -> Result<Variant> {
    let text = token.value();
    if token.token_type() != TokenType::Float
        && let Ok(n) = text.parse::<i64>()
    {
        return Ok(Variant::Integer(n));
    }
    text.parse::<f64>().map(Variant::Float).map_err(|_| {
        Error::at(
            ErrorCode::ErrorAt,
            format!("Invalid number {}", text),
            token.line(),
            token.column(),
        )
    })
}

fn unknown_symbol(token: &Token) -> Error {
    Error::at(
        ErrorCode::UnknownSymbol,
        format!("Unknown symbol {}", token.value()),
        token.line(),
        token.column(),
    )
}
