use std::collections::HashMap;

use crate::errors::Result;
use crate::tokenizers::{Scanner, SymbolState, Token, TokenType, Tokenizer, TokenizerState};

/// Node of the symbol trie.
///
/// A node with a token type terminates a registered symbol; the path from the
/// root to it spells the symbol.
#[derive(Debug, Default, Clone)]
pub struct SymbolNode {
    children: HashMap<char, SymbolNode>,
    token_type: Option<TokenType>,
}

impl SymbolNode {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `value` as a symbol of the given type.
    pub fn add(&mut self, value: &str, token_type: TokenType) {
        let mut node = self;
        for ch in value.chars() {
            node = node.children.entry(ch).or_default();
        }
        node.token_type = Some(token_type);
    }

    /// Consumes the longest registered symbol at the scanner position.
    ///
    /// Characters read past the longest match are pushed back. Returns `None`
    /// and consumes nothing when no registered symbol matches.
    pub fn longest_match(&self, scanner: &mut Scanner) -> Option<(String, TokenType)> {
        let mut node = self;
        let mut read = String::new();
        let mut best: Option<(usize, TokenType)> = None;

        while let Some(ch) = scanner.peek() {
            let Some(child) = node.children.get(&ch) else {
                break;
            };
            scanner.read();
            read.push(ch);
            node = child;
            if let Some(token_type) = node.token_type {
                best = Some((read.chars().count(), token_type));
            }
        }

        let read_count = read.chars().count();
        match best {
            Some((length, token_type)) => {
                scanner.unread_many(read_count - length);
                Some((read.chars().take(length).collect(), token_type))
            }
            None => {
                scanner.unread_many(read_count);
                None
            }
        }
    }
}

/// Reads symbols, preferring the longest registered one.
///
/// Characters that do not start a registered symbol become one-character
/// `Symbol` tokens.
#[derive(Debug, Default, Clone)]
pub struct GenericSymbolState {
    root: SymbolNode,
}

impl GenericSymbolState {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenizerState for GenericSymbolState {
    fn next_token(&self, scanner: &mut Scanner, _tokenizer: &Tokenizer) -> Result<Token> {
        let (line, column) = (scanner.peek_line(), scanner.peek_column());

        if let Some((value, token_type)) = self.root.longest_match(scanner) {
            return Ok(Token::new(token_type, value, line, column));
        }

        let value = scanner.read().map(String::from).unwrap_or_default();
        Ok(Token::new(TokenType::Symbol, value, line, column))
    }
}

impl SymbolState for GenericSymbolState {
    fn add(&mut self, value: &str, token_type: TokenType) {
        self.root.add(value, token_type);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_longest_match_wins() {
        let mut root = SymbolNode::new();
        root.add("<", TokenType::Symbol);
        root.add("<=", TokenType::Symbol);
        root.add("<<=", TokenType::Symbol);

        let mut scanner = Scanner::new("<=x");
        assert_eq!(root.longest_match(&mut scanner), Some(("<=".into(), TokenType::Symbol)));
        assert_eq!(scanner.peek(), Some('x'));
    }

    #[test]
    fn test_partial_prefix_is_pushed_back() {
        let mut root = SymbolNode::new();
        root.add("{{{", TokenType::Symbol);

        let mut scanner = Scanner::new("{{x");
        assert_eq!(root.longest_match(&mut scanner), None);
        assert_eq!(scanner.position(), 0);

        root.add("{{", TokenType::Symbol);
        assert_eq!(root.longest_match(&mut scanner), Some(("{{".into(), TokenType::Symbol)));
        assert_eq!(scanner.peek(), Some('x'));
    }
}
