use log::trace;

use crate::errors::Result;

use super::{CharReferenceMap, Scanner, Token, TokenType};

/// A state reads one token starting at the scanner's current character.
///
/// States receive the owning [`Tokenizer`] so they can hand over to another
/// state (a lone `/` in a comment state becomes a symbol, a lone `.` in a
/// number state becomes a symbol, and so on).
pub trait TokenizerState {
    fn next_token(&self, scanner: &mut Scanner, tokenizer: &Tokenizer) -> Result<Token>;
}

/// State for quoted strings that also knows how to encode and decode them.
pub trait QuoteState: TokenizerState {
    /// Wraps `value` in quotes, doubling embedded quote characters.
    fn encode_string(&self, value: &str, quote: char) -> String;

    /// Strips the quotes and collapses doubled quote characters.
    fn decode_string(&self, value: &str, quote: char) -> String;
}

/// State for multi-character symbols matched by longest prefix.
pub trait SymbolState: TokenizerState {
    fn add(&mut self, value: &str, token_type: TokenType);
}

/// State whose accepted characters are configurable.
pub trait CharClassState: TokenizerState {
    fn set_chars(&mut self, from: char, to: char, enable: bool);
    fn clear_chars(&mut self);
}

/// Identifies which state handles a character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateKind {
    Comment,
    Number,
    Quote,
    Symbol,
    Whitespace,
    Word,
}

/// Character-class tokenizer.
///
/// Every character is mapped to a [`StateKind`]; the state registered for that
/// kind reads the token. Characters with no mapped state become `Unknown`
/// tokens.
///
/// # Examples
///
/// ```
/// use stamen::tokenizers::{generic_tokenizer, TokenType};
///
/// let tokenizer = generic_tokenizer();
/// let tokens = tokenizer.tokenize_buffer("a <= 12").unwrap();
/// let values: Vec<&str> = tokens.iter().map(|t| t.value()).collect();
/// assert_eq!(values, vec!["a", "<=", "12"]);
/// assert_eq!(tokens[1].token_type(), TokenType::Symbol);
/// ```
pub struct Tokenizer {
    pub skip_unknown: bool,
    pub skip_whitespaces: bool,
    pub skip_comments: bool,
    pub skip_eof: bool,
    pub merge_whitespaces: bool,
    pub unify_numbers: bool,
    pub decode_strings: bool,

    pub comment_state: Option<Box<dyn TokenizerState>>,
    pub number_state: Option<Box<dyn TokenizerState>>,
    pub quote_state: Option<Box<dyn QuoteState>>,
    pub symbol_state: Option<Box<dyn SymbolState>>,
    pub whitespace_state: Option<Box<dyn CharClassState>>,
    pub word_state: Option<Box<dyn CharClassState>>,

    map: CharReferenceMap<StateKind>,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Tokenizer {
    /// Creates a tokenizer with no states and all options off.
    pub fn new() -> Self {
        Tokenizer {
            skip_unknown: false,
            skip_whitespaces: false,
            skip_comments: false,
            skip_eof: false,
            merge_whitespaces: false,
            unify_numbers: false,
            decode_strings: false,
            comment_state: None,
            number_state: None,
            quote_state: None,
            symbol_state: None,
            whitespace_state: None,
            word_state: None,
            map: CharReferenceMap::new(),
        }
    }

    pub fn set_character_state(&mut self, from: char, to: char, state: StateKind) {
        self.map.add_interval(from, to, state);
    }

    pub fn clear_character_states(&mut self) {
        self.map.clear();
    }

    pub fn character_state(&self, symbol: char) -> Option<StateKind> {
        self.map.lookup(symbol).copied()
    }

    /// Returns the state registered for `kind`, if any.
    pub fn state(&self, kind: StateKind) -> Option<&dyn TokenizerState> {
        match kind {
            StateKind::Comment => self.comment_state.as_deref(),
            StateKind::Number => self.number_state.as_deref(),
            StateKind::Quote => self.quote_state.as_deref().map(|s| s as &dyn TokenizerState),
            StateKind::Symbol => self.symbol_state.as_deref().map(|s| s as &dyn TokenizerState),
            StateKind::Whitespace => self
                .whitespace_state
                .as_deref()
                .map(|s| s as &dyn TokenizerState),
            StateKind::Word => self.word_state.as_deref().map(|s| s as &dyn TokenizerState),
        }
    }

    /// Reads a token through the symbol state, or a one-character symbol if
    /// none is registered.
    pub fn read_symbol(&self, scanner: &mut Scanner) -> Result<Token> {
        if let Some(state) = &self.symbol_state {
            return state.next_token(scanner, self);
        }
        let (line, column) = (scanner.peek_line(), scanner.peek_column());
        let value = scanner.read().map(String::from).unwrap_or_default();
        Ok(Token::new(TokenType::Symbol, value, line, column))
    }

    /// Reads one raw token, before any skip or merge option is applied.
    pub fn read_token(&self, scanner: &mut Scanner) -> Result<Token> {
        let (line, column) = (scanner.peek_line(), scanner.peek_column());
        let Some(ch) = scanner.peek() else {
            return Ok(Token::new(TokenType::Eof, "", line, column));
        };

        if let Some(state) = self.character_state(ch).and_then(|kind| self.state(kind)) {
            let start = scanner.position();
            let token = state.next_token(scanner, self)?;
            if scanner.position() != start {
                return Ok(token);
            }
            // The state rejected a character the map assigned to it
        }
        scanner.read();
        Ok(Token::new(TokenType::Unknown, ch, line, column))
    }

    /// Reads the next token that survives the skip options.
    ///
    /// Returns `None` once the input is exhausted and the end-of-input token
    /// is skipped.
    pub fn next_token(&self, scanner: &mut Scanner) -> Result<Option<Token>> {
        loop {
            let token = self.read_token(scanner)?;

            let skip = match token.token_type() {
                TokenType::Eof => {
                    if self.skip_eof {
                        return Ok(None);
                    }
                    false
                }
                TokenType::Unknown => self.skip_unknown,
                TokenType::Whitespace => self.skip_whitespaces,
                TokenType::Comment => self.skip_comments,
                _ => false,
            };
            if skip {
                continue;
            }

            return Ok(Some(self.finish_token(token)));
        }
    }

    /// Splits the whole buffer into tokens.
    pub fn tokenize_buffer(&self, buffer: &str) -> Result<Vec<Token>> {
        let mut scanner = Scanner::new(buffer);
        let mut tokens = Vec::new();

        while let Some(token) = self.next_token(&mut scanner)? {
            let eof = token.token_type() == TokenType::Eof;
            self.push_token(&mut tokens, token);
            if eof {
                break;
            }
        }

        trace!("tokenized {} characters into {} tokens", buffer.len(), tokens.len());
        Ok(tokens)
    }

    /// Appends `token`, joining it to the last token when both are
    /// whitespace and `merge_whitespaces` is set.
    pub fn push_token(&self, tokens: &mut Vec<Token>, token: Token) {
        if self.merge_whitespaces
            && token.token_type() == TokenType::Whitespace
            && let Some(last) = tokens.last_mut()
            && last.token_type() == TokenType::Whitespace
        {
            *last = last.with_value(format!("{}{}", last.value(), token.value()));
            return;
        }
        tokens.push(token);
    }

    /// Splits the buffer into tokens and returns their values.
    pub fn tokenize_buffer_to_strings(&self, buffer: &str) -> Result<Vec<String>> {
        Ok(self
            .tokenize_buffer(buffer)?
            .into_iter()
            .map(|token| token.value().to_string())
            .collect())
    }

    fn finish_token(&self, token: Token) -> Token {
        match token.token_type() {
            TokenType::Integer | TokenType::Float | TokenType::HexDecimal if self.unify_numbers => {
                token.with_type(TokenType::Number)
            }
            TokenType::Quoted if self.decode_strings => match (&self.quote_state, token.value().chars().next()) {
                (Some(state), Some(quote)) => {
                    let decoded = state.decode_string(token.value(), quote);
                    token.with_value(decoded)
                }
                _ => token,
            },
            _ => token,
        }
    }
}
