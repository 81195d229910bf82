/// Kinds of raw tokens produced by the tokenizer framework.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenType {
    /// Character that no state claims
    Unknown,
    /// End of input
    Eof,
    /// End of line
    Eol,
    Float,
    Integer,
    HexDecimal,
    /// Any number, produced when numbers are unified
    Number,
    /// Operator or punctuation, e.g. `<=` or `(`
    Symbol,
    /// Quoted string, e.g. `'text'`
    Quoted,
    Word,
    Keyword,
    Whitespace,
    Comment,
    /// Raw text owned by a specialised tokenizer (template text)
    Special,
}

/// A raw token with the position of its first character.
///
/// Tokens are immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token {
    token_type: TokenType,
    value: String,
    line: usize,
    column: usize,
}

impl Token {
    pub fn new(token_type: TokenType, value: impl Into<String>, line: usize, column: usize) -> Self {
        Token {
            token_type,
            value: value.into(),
            line,
            column,
        }
    }

    pub fn token_type(&self) -> TokenType {
        self.token_type
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// 1-based line of the first character
    pub fn line(&self) -> usize {
        self.line
    }

    /// 1-based column of the first character
    pub fn column(&self) -> usize {
        self.column
    }

    /// Returns a copy of the token with a different type.
    pub fn with_type(&self, token_type: TokenType) -> Self {
        Token {
            token_type,
            ..self.clone()
        }
    }

    /// Returns a copy of the token with a different value.
    pub fn with_value(&self, value: impl Into<String>) -> Self {
        Token {
            value: value.into(),
            ..self.clone()
        }
    }
}
