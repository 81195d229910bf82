use crate::errors::{Error, ErrorCode, Result};
use crate::tokenizers::{Scanner, Token, TokenType, Tokenizer, TokenizerState};

/// Comment that runs until the end of the line (the line break is not part
/// of the comment).
#[derive(Debug, Default, Clone, Copy)]
pub struct GenericCommentState;

impl GenericCommentState {
    pub fn new() -> Self {
        GenericCommentState
    }
}

fn read_to_end_of_line(scanner: &mut Scanner, value: &mut String) {
    while let Some(ch) = scanner.peek() {
        if ch == '\n' || ch == '\r' {
            break;
        }
        value.push(ch);
        scanner.read();
    }
}

impl TokenizerState for GenericCommentState {
    fn next_token(&self, scanner: &mut Scanner, _tokenizer: &Tokenizer) -> Result<Token> {
        let (line, column) = (scanner.peek_line(), scanner.peek_column());
        let mut value = String::new();
        read_to_end_of_line(scanner, &mut value);
        Ok(Token::new(TokenType::Comment, value, line, column))
    }
}

/// C++ style comments: `// line` and `/* block */`.
///
/// A `/` that does not start a comment is read by the symbol state.
#[derive(Debug, Default, Clone, Copy)]
pub struct CppCommentState;

impl CppCommentState {
    pub fn new() -> Self {
        CppCommentState
    }
}

impl TokenizerState for CppCommentState {
    fn next_token(&self, scanner: &mut Scanner, tokenizer: &Tokenizer) -> Result<Token> {
        let (line, column) = (scanner.peek_line(), scanner.peek_column());

        match (scanner.peek(), scanner.peek_at(1)) {
            (Some('/'), Some('/')) => {
                let mut value = String::new();
                read_to_end_of_line(scanner, &mut value);
                Ok(Token::new(TokenType::Comment, value, line, column))
            }
            (Some('/'), Some('*')) => {
                scanner.read();
                scanner.read();
                let mut value = String::from("/*");
                loop {
                    match scanner.read() {
                        Some('*') if scanner.peek() == Some('/') => {
                            scanner.read();
                            value.push_str("*/");
                            return Ok(Token::new(TokenType::Comment, value, line, column));
                        }
                        Some(ch) => value.push(ch),
                        None => {
                            return Err(Error::at(
                                ErrorCode::UnexpectedEnd,
                                "Unterminated block comment",
                                line,
                                column,
                            ));
                        }
                    }
                }
            }
            _ => tokenizer.read_symbol(scanner),
        }
    }
}
