use log::trace;

use crate::errors::Result;
use crate::tokenizers::states::{GenericSymbolState, GenericWhitespaceState, GenericWordState};
use crate::tokenizers::{
    CharClassState, Scanner, StateKind, SymbolState, Token, TokenType, Tokenizer, TokenizerState,
};

/// Reads template text up to the next `{{` as a single `Special` token.
#[derive(Debug, Default, Clone, Copy)]
pub struct MustacheSpecialState;

impl TokenizerState for MustacheSpecialState {
    fn next_token(&self, scanner: &mut Scanner, _tokenizer: &Tokenizer) -> Result<Token> {
        let (line, column) = (scanner.peek_line(), scanner.peek_column());
        let mut value = String::new();
        while let Some(ch) = scanner.peek() {
            if ch == '{' && scanner.peek_at(1) == Some('{') {
                break;
            }
            scanner.read();
            value.push(ch);
        }
        Ok(Token::new(TokenType::Special, value, line, column))
    }
}

/// Tokenizer for Mustache templates.
///
/// Text outside tags comes out as `Special` tokens. Inside a tag whitespace
/// is dropped, `{{ }} {{{ }}}` are symbols and words may contain `_ . -`.
///
/// # Examples
///
/// ```
/// use stamen::mustache::MustacheTokenizer;
///
/// let values = MustacheTokenizer::new().tokenize_buffer_to_strings("Hi {{ name }}!").unwrap();
/// assert_eq!(values, vec!["Hi ", "{{", "name", "}}", "!"]);
/// ```
pub struct MustacheTokenizer {
    special: MustacheSpecialState,
    tokenizer: Tokenizer,
}

impl Default for MustacheTokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl MustacheTokenizer {
    pub fn new() -> Self {
        let mut tokenizer = Tokenizer::new();
        tokenizer.skip_whitespaces = true;
        tokenizer.skip_eof = true;

        let mut symbols = GenericSymbolState::new();
        for symbol in ["{{", "}}", "{{{", "}}}"] {
            symbols.add(symbol, TokenType::Symbol);
        }

        let mut words = GenericWordState::new();
        words.clear_chars();
        words.set_chars('a', 'z', true);
        words.set_chars('A', 'Z', true);
        words.set_chars('0', '9', true);
        words.set_chars('_', '_', true);
        words.set_chars('.', '.', true);
        words.set_chars('-', '-', true);
        words.set_chars('\u{00c0}', '\u{00ff}', true);
        words.set_chars('\u{0100}', '\u{fffe}', true);

        tokenizer.symbol_state = Some(Box::new(symbols));
        tokenizer.whitespace_state = Some(Box::new(GenericWhitespaceState::new()));
        tokenizer.word_state = Some(Box::new(words));

        tokenizer.set_character_state('\0', '\u{fffe}', StateKind::Symbol);
        tokenizer.set_character_state('\0', ' ', StateKind::Whitespace);
        tokenizer.set_character_state('a', 'z', StateKind::Word);
        tokenizer.set_character_state('A', 'Z', StateKind::Word);
        tokenizer.set_character_state('0', '9', StateKind::Word);
        tokenizer.set_character_state('_', '_', StateKind::Word);
        tokenizer.set_character_state('.', '.', StateKind::Word);
        tokenizer.set_character_state('-', '-', StateKind::Word);
        tokenizer.set_character_state('\u{00c0}', '\u{00ff}', StateKind::Word);
        tokenizer.set_character_state('\u{0100}', '\u{fffe}', StateKind::Word);

        MustacheTokenizer {
            special: MustacheSpecialState,
            tokenizer,
        }
    }

    /// Splits a template into tokens, switching between text and tag mode.
    pub fn tokenize_buffer(&self, buffer: &str) -> Result<Vec<Token>> {
        let mut scanner = Scanner::new(buffer);
        let mut tokens: Vec<Token> = Vec::new();
        let mut in_text = true;

        loop {
            if in_text {
                let text = self.special.next_token(&mut scanner, &self.tokenizer)?;
                if !text.value().is_empty() {
                    tokens.push(text);
                }
                if scanner.is_eof() {
                    break;
                }
            }

            let Some(token) = self.tokenizer.next_token(&mut scanner)? else {
                break;
            };
            in_text = token.token_type() == TokenType::Symbol
                && matches!(token.value(), "}}" | "}}}");
            self.tokenizer.push_token(&mut tokens, token);
        }

        trace!("tokenized template of {} characters into {} tokens", buffer.len(), tokens.len());
        Ok(tokens)
    }

    pub fn tokenize_buffer_to_strings(&self, buffer: &str) -> Result<Vec<String>> {
        Ok(self
            .tokenize_buffer(buffer)?
            .into_iter()
            .map(|token| token.value().to_string())
            .collect())
    }
}
