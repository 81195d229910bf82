use crate::errors::Result;
use crate::tokenizers::states::number::read_digits;
use crate::tokenizers::states::quote::read_quoted;
use crate::tokenizers::states::{
    CppCommentState, GenericQuoteState, GenericSymbolState, GenericWhitespaceState,
    GenericWordState,
};
use crate::tokenizers::{
    CharClassState, QuoteState, Scanner, StateKind, SymbolState, Token, TokenType, Tokenizer,
    TokenizerState,
};

/// Numbers in expressions: digits, an optional fraction and an optional
/// exponent. Signs are operators, never part of the literal.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExpressionNumberState;

impl TokenizerState for ExpressionNumberState {
    fn next_token(&self, scanner: &mut Scanner, tokenizer: &Tokenizer) -> Result<Token> {
        let (line, column) = (scanner.peek_line(), scanner.peek_column());
        let mut value = String::new();

        let digits = read_digits(scanner, &mut value);

        let mut is_float = false;
        if scanner.peek() == Some('.') && scanner.peek_at(1).is_some_and(|c| c.is_ascii_digit()) {
            scanner.read();
            value.push('.');
            read_digits(scanner, &mut value);
            is_float = true;
        }

        if digits == 0 && !is_float {
            return tokenizer.read_symbol(scanner);
        }

        if let Some(e @ ('e' | 'E')) = scanner.peek() {
            let signed = matches!(scanner.peek_at(1), Some('+' | '-'));
            let first_digit = if signed { 2 } else { 1 };
            if scanner.peek_at(first_digit).is_some_and(|c| c.is_ascii_digit()) {
                scanner.read();
                value.push(e);
                if signed && let Some(sign) = scanner.read() {
                    value.push(sign);
                }
                read_digits(scanner, &mut value);
                is_float = true;
            }
        }

        let token_type = if is_float {
            TokenType::Float
        } else {
            TokenType::Integer
        };
        Ok(Token::new(token_type, value, line, column))
    }
}

/// Quotes in expressions: `'text'` is a string literal while `"name"` is a
/// quoted identifier, returned as a decoded word.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExpressionQuoteState {
    inner: GenericQuoteState,
}

impl TokenizerState for ExpressionQuoteState {
    fn next_token(&self, scanner: &mut Scanner, _tokenizer: &Tokenizer) -> Result<Token> {
        let (line, column) = (scanner.peek_line(), scanner.peek_column());
        let value = read_quoted(scanner)?;

        if value.starts_with('"') {
            let name = self.decode_string(&value, '"');
            return Ok(Token::new(TokenType::Word, name, line, column));
        }
        Ok(Token::new(TokenType::Quoted, value, line, column))
    }
}

impl QuoteState for ExpressionQuoteState {
    fn encode_string(&self, value: &str, quote: char) -> String {
        self.inner.encode_string(value, quote)
    }

    fn decode_string(&self, value: &str, quote: char) -> String {
        self.inner.decode_string(value, quote)
    }
}

/// Builds the tokenizer used by the expression parser.
///
/// Whitespace, comments and the end-of-input token are dropped and string
/// literals are decoded.
pub fn expression_tokenizer() -> Tokenizer {
    let mut tokenizer = Tokenizer::new();
    tokenizer.skip_whitespaces = true;
    tokenizer.skip_comments = true;
    tokenizer.skip_eof = true;
    tokenizer.decode_strings = true;

    let mut symbols = GenericSymbolState::new();
    for symbol in ["<=", ">=", "<>", "!=", "<<", ">>"] {
        symbols.add(symbol, TokenType::Symbol);
    }

    let mut words = GenericWordState::new();
    words.clear_chars();
    words.set_chars('a', 'z', true);
    words.set_chars('A', 'Z', true);
    words.set_chars('0', '9', true);
    words.set_chars('_', '_', true);
    words.set_chars('$', '$', true);
    words.set_chars('\u{00c0}', '\u{00ff}', true);
    words.set_chars('\u{0100}', '\u{fffe}', true);

    tokenizer.comment_state = Some(Box::new(CppCommentState::new()));
    tokenizer.number_state = Some(Box::new(ExpressionNumberState));
    tokenizer.quote_state = Some(Box::new(ExpressionQuoteState::default()));
    tokenizer.symbol_state = Some(Box::new(symbols));
    tokenizer.whitespace_state = Some(Box::new(GenericWhitespaceState::new()));
    tokenizer.word_state = Some(Box::new(words));

    tokenizer.set_character_state('\0', '\u{fffe}', StateKind::Symbol);
    tokenizer.set_character_state('\0', ' ', StateKind::Whitespace);
    tokenizer.set_character_state('a', 'z', StateKind::Word);
    tokenizer.set_character_state('A', 'Z', StateKind::Word);
    tokenizer.set_character_state('_', '_', StateKind::Word);
    tokenizer.set_character_state('$', '$', StateKind::Word);
    tokenizer.set_character_state('\u{00c0}', '\u{00ff}', StateKind::Word);
    tokenizer.set_character_state('\u{0100}', '\u{fffe}', StateKind::Word);
    tokenizer.set_character_state('0', '9', StateKind::Number);
    tokenizer.set_character_state('.', '.', StateKind::Number);
    tokenizer.set_character_state('"', '"', StateKind::Quote);
    tokenizer.set_character_state('\'', '\'', StateKind::Quote);
    tokenizer.set_character_state('/', '/', StateKind::Comment);

    tokenizer
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokenize(text: &str) -> Vec<(TokenType, String)> {
        expression_tokenizer()
            .tokenize_buffer(text)
            .unwrap()
            .into_iter()
            .map(|t| (t.token_type(), t.value().to_string()))
            .collect()
    }

    #[test]
    fn test_numbers() {
        assert_eq!(
            tokenize("12 3.5 1e3 2.5E-2"),
            vec![
                (TokenType::Integer, "12".into()),
                (TokenType::Float, "3.5".into()),
                (TokenType::Float, "1e3".into()),
                (TokenType::Float, "2.5E-2".into()),
            ]
        );
    }

    #[test]
    fn test_minus_is_not_part_of_number() {
        assert_eq!(
            tokenize("2-3"),
            vec![
                (TokenType::Integer, "2".into()),
                (TokenType::Symbol, "-".into()),
                (TokenType::Integer, "3".into()),
            ]
        );
    }

    #[test]
    fn test_quotes() {
        assert_eq!(
            tokenize(r#"'it''s' "my var""#),
            vec![
                (TokenType::Quoted, "it's".into()),
                (TokenType::Word, "my var".into()),
            ]
        );
    }

    #[test]
    fn test_comments_and_division() {
        assert_eq!(
            tokenize("a / b // trailing\n/* block */ c"),
            vec![
                (TokenType::Word, "a".into()),
                (TokenType::Symbol, "/".into()),
                (TokenType::Word, "b".into()),
                (TokenType::Word, "c".into()),
            ]
        );
    }
}
