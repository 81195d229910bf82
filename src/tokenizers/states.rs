//! Stock tokenizer states.
pub mod comment;
pub mod number;
pub mod quote;
pub mod symbol;
pub mod whitespace;
pub mod word;

pub use comment::{CppCommentState, GenericCommentState};
pub use number::GenericNumberState;
pub use quote::GenericQuoteState;
pub use symbol::{GenericSymbolState, SymbolNode};
pub use whitespace::GenericWhitespaceState;
pub use word::GenericWordState;
