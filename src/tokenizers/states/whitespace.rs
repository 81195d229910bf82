use crate::errors::Result;
use crate::tokenizers::{CharClassState, CharReferenceMap, Scanner, Token, TokenType, Tokenizer, TokenizerState};

/// Reads a run of whitespace characters into one token.
///
/// By default every character from `\0` to space counts as whitespace.
pub struct GenericWhitespaceState {
    map: CharReferenceMap<bool>,
}

impl Default for GenericWhitespaceState {
    fn default() -> Self {
        Self::new()
    }
}

impl GenericWhitespaceState {
    pub fn new() -> Self {
        let mut state = GenericWhitespaceState {
            map: CharReferenceMap::new(),
        };
        state.set_chars('\0', ' ', true);
        state
    }

    fn is_whitespace(&self, ch: char) -> bool {
        self.map.lookup(ch).copied().unwrap_or(false)
    }
}

impl TokenizerState for GenericWhitespaceState {
    fn next_token(&self, scanner: &mut Scanner, _tokenizer: &Tokenizer) -> Result<Token> {
        let (line, column) = (scanner.peek_line(), scanner.peek_column());
        let mut value = String::new();

        while let Some(ch) = scanner.peek() {
            if !self.is_whitespace(ch) {
                break;
            }
            value.push(ch);
            scanner.read();
        }

        Ok(Token::new(TokenType::Whitespace, value, line, column))
    }
}

impl CharClassState for GenericWhitespaceState {
    fn set_chars(&mut self, from: char, to: char, enable: bool) {
        self.map.add_interval(from, to, enable);
    }

    fn clear_chars(&mut self) {
        self.map.clear();
    }
}
