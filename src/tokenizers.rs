//! # Tokenizer framework
//!
//! A reusable, character-class driven tokenizer:
//!
//! - **[scanner]** - character stream with lookahead, pushback and positions
//! - **[char_map]** - interval map from characters to handler states
//! - **[tokenizer]** - the dispatcher and its skip/merge/decode options
//! - **[states]** - stock states for words, numbers, quotes, whitespace,
//!   comments and symbols
//! - **[generic]** - a ready-made general purpose tokenizer
//!
//! The expression and Mustache tokenizers are configurations of the same
//! [`Tokenizer`].
pub mod char_map;
pub mod generic;
pub mod scanner;
pub mod states;
pub mod token;
pub mod tokenizer;

pub use char_map::CharReferenceMap;
pub use generic::generic_tokenizer;
pub use scanner::Scanner;
pub use token::{Token, TokenType};
pub use tokenizer::{CharClassState, QuoteState, StateKind, SymbolState, Tokenizer, TokenizerState};
