use crate::errors::Result;
use crate::tokenizers::{Scanner, Token, TokenType, Tokenizer, TokenizerState};

/// Reads integers and decimals with an optional leading minus sign.
///
/// A `-` or `.` that is not part of a number is handed to the symbol state.
#[derive(Debug, Default, Clone, Copy)]
pub struct GenericNumberState;

impl GenericNumberState {
    pub fn new() -> Self {
        GenericNumberState
    }
}

/// Consumes consecutive ASCII digits, returning how many were read.
pub(crate) fn read_digits(scanner: &mut Scanner, value: &mut String) -> usize {
    let mut count = 0;
    while let Some(ch) = scanner.peek() {
        if !ch.is_ascii_digit() {
            break;
        }
        value.push(ch);
        scanner.read();
        count += 1;
    }
    count
}

impl TokenizerState for GenericNumberState {
    fn next_token(&self, scanner: &mut Scanner, tokenizer: &Tokenizer) -> Result<Token> {
        let (line, column) = (scanner.peek_line(), scanner.peek_column());
        let mut value = String::new();

        if scanner.peek() == Some('-') {
            scanner.read();
            value.push('-');
        }

        let digits = read_digits(scanner, &mut value);

        let mut is_float = false;
        if scanner.peek() == Some('.') && scanner.peek_at(1).is_some_and(|c| c.is_ascii_digit()) {
            scanner.read();
            value.push('.');
            read_digits(scanner, &mut value);
            is_float = true;
        }

        if digits == 0 && !is_float {
            scanner.unread_many(value.chars().count());
            return tokenizer.read_symbol(scanner);
        }

        let token_type = if is_float {
            TokenType::Float
        } else {
            TokenType::Integer
        };
        Ok(Token::new(token_type, value, line, column))
    }
}
