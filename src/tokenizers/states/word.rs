use crate::errors::Result;
use crate::tokenizers::{CharClassState, CharReferenceMap, Scanner, Token, TokenType, Tokenizer, TokenizerState};

/// Reads a word: the first character was routed here by the tokenizer, the
/// following characters must be word characters.
///
/// Default word characters are ASCII letters and digits, `-`, `_`, and the
/// Latin-1 and wider letters from `U+00C0`.
pub struct GenericWordState {
    map: CharReferenceMap<bool>,
}

impl Default for GenericWordState {
    fn default() -> Self {
        Self::new()
    }
}

impl GenericWordState {
    pub fn new() -> Self {
        let mut state = GenericWordState {
            map: CharReferenceMap::new(),
        };
        state.set_chars('a', 'z', true);
        state.set_chars('A', 'Z', true);
        state.set_chars('0', '9', true);
        state.set_chars('-', '-', true);
        state.set_chars('_', '_', true);
        state.set_chars('\u{00c0}', '\u{00ff}', true);
        state.set_chars('\u{0100}', '\u{fffe}', true);
        state
    }

    pub fn is_word_char(&self, ch: char) -> bool {
        self.map.lookup(ch).copied().unwrap_or(false)
    }
}

impl TokenizerState for GenericWordState {
    fn next_token(&self, scanner: &mut Scanner, _tokenizer: &Tokenizer) -> Result<Token> {
        let (line, column) = (scanner.peek_line(), scanner.peek_column());
        let mut value = String::new();

        if let Some(first) = scanner.read() {
            value.push(first);
        }
        while let Some(ch) = scanner.peek() {
            if !self.is_word_char(ch) {
                break;
            }
            value.push(ch);
            scanner.read();
        }

        Ok(Token::new(TokenType::Word, value, line, column))
    }
}

impl CharClassState for GenericWordState {
    fn set_chars(&mut self, from: char, to: char, enable: bool) {
        self.map.add_interval(from, to, enable);
    }

    fn clear_chars(&mut self) {
        self.map.clear();
    }
}
