use super::{
    StateKind, SymbolState, TokenType, Tokenizer,
    states::{
        GenericCommentState, GenericNumberState, GenericQuoteState, GenericSymbolState,
        GenericWhitespaceState, GenericWordState,
    },
};

/// Builds a general purpose tokenizer.
///
/// Words, signed numbers, `'` and `"` strings, `#` line comments and the
/// two-character symbols `<> <= >= != == && ||` are recognised. Whitespace,
/// comments, unknown characters and the end-of-input token are skipped.
pub fn generic_tokenizer() -> Tokenizer {
    let mut tokenizer = Tokenizer::new();
    tokenizer.skip_unknown = true;
    tokenizer.skip_whitespaces = true;
    tokenizer.skip_comments = true;
    tokenizer.skip_eof = true;

    let mut symbols = GenericSymbolState::new();
    for symbol in ["<>", "<=", ">=", "!=", "==", "&&", "||"] {
        symbols.add(symbol, TokenType::Symbol);
    }

    tokenizer.comment_state = Some(Box::new(GenericCommentState::new()));
    tokenizer.number_state = Some(Box::new(GenericNumberState::new()));
    tokenizer.quote_state = Some(Box::new(GenericQuoteState::new()));
    tokenizer.symbol_state = Some(Box::new(symbols));
    tokenizer.whitespace_state = Some(Box::new(GenericWhitespaceState::new()));
    tokenizer.word_state = Some(Box::new(GenericWordState::new()));

    tokenizer.set_character_state('\0', '\u{fffe}', StateKind::Symbol);
    tokenizer.set_character_state('\0', ' ', StateKind::Whitespace);
    tokenizer.set_character_state('a', 'z', StateKind::Word);
    tokenizer.set_character_state('A', 'Z', StateKind::Word);
    tokenizer.set_character_state('\u{00c0}', '\u{00ff}', StateKind::Word);
    tokenizer.set_character_state('\u{0100}', '\u{fffe}', StateKind::Word);
    tokenizer.set_character_state('-', '-', StateKind::Number);
    tokenizer.set_character_state('0', '9', StateKind::Number);
    tokenizer.set_character_state('.', '.', StateKind::Number);
    tokenizer.set_character_state('"', '"', StateKind::Quote);
    tokenizer.set_character_state('\'', '\'', StateKind::Quote);
    tokenizer.set_character_state('#', '#', StateKind::Comment);

    tokenizer
}
