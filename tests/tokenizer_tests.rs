// tests/tokenizer_tests.rs

use stamen::ErrorCode;
use stamen::expressions::expression_tokenizer;
use stamen::mustache::MustacheTokenizer;
use stamen::tokenizers::states::{GenericQuoteState, GenericWhitespaceState};
use stamen::tokenizers::{
    CharClassState, QuoteState, Scanner, StateKind, TokenType, Tokenizer, generic_tokenizer,
};

fn kinds(tokenizer: &Tokenizer, text: &str) -> Vec<(TokenType, String)> {
    tokenizer
        .tokenize_buffer(text)
        .unwrap()
        .into_iter()
        .map(|t| (t.token_type(), t.value().to_string()))
        .collect()
}

// ============================================================================
// Generic tokenizer
// ============================================================================

#[test]
fn test_longest_match_symbol() {
    let tokens = generic_tokenizer().tokenize_buffer("<=").unwrap();
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].token_type(), TokenType::Symbol);
    assert_eq!(tokens[0].value(), "<=");
}

#[test]
fn test_unregistered_prefix_falls_back_to_single_char() {
    let values = generic_tokenizer().tokenize_buffer_to_strings("<<").unwrap();
    assert_eq!(values, vec!["<", "<"]);
}

#[test]
fn test_generic_mix() {
    assert_eq!(
        kinds(&generic_tokenizer(), "name -12.5 'it''s' # tail"),
        vec![
            (TokenType::Word, "name".into()),
            (TokenType::Float, "-12.5".into()),
            (TokenType::Quoted, "'it''s'".into()),
        ]
    );
}

#[test]
fn test_lone_minus_is_symbol() {
    assert_eq!(
        kinds(&generic_tokenizer(), "a - b"),
        vec![
            (TokenType::Word, "a".into()),
            (TokenType::Symbol, "-".into()),
            (TokenType::Word, "b".into()),
        ]
    );
}

#[test]
fn test_keep_whitespace_and_eof() {
    let mut tokenizer = generic_tokenizer();
    tokenizer.skip_whitespaces = false;
    tokenizer.skip_eof = false;

    assert_eq!(
        kinds(&tokenizer, "a  b"),
        vec![
            (TokenType::Word, "a".into()),
            (TokenType::Whitespace, "  ".into()),
            (TokenType::Word, "b".into()),
            (TokenType::Eof, "".into()),
        ]
    );
}

#[test]
fn test_decode_and_unify_options() {
    let mut tokenizer = generic_tokenizer();
    tokenizer.decode_strings = true;
    tokenizer.unify_numbers = true;

    assert_eq!(
        kinds(&tokenizer, "'a''b' 7 1.5"),
        vec![
            (TokenType::Quoted, "a'b".into()),
            (TokenType::Number, "7".into()),
            (TokenType::Number, "1.5".into()),
        ]
    );
}

#[test]
fn test_unknown_characters() {
    let mut tokenizer = generic_tokenizer();
    tokenizer.clear_character_states();
    tokenizer.set_character_state('a', 'z', StateKind::Word);

    assert_eq!(
        tokenizer.tokenize_buffer_to_strings("ab+cd").unwrap(),
        vec!["ab", "cd"]
    );

    tokenizer.skip_unknown = false;
    assert_eq!(
        kinds(&tokenizer, "ab+"),
        vec![
            (TokenType::Word, "ab".into()),
            (TokenType::Unknown, "+".into()),
        ]
    );
}

#[test]
fn test_state_that_reads_nothing_yields_unknown() {
    let mut spaces = GenericWhitespaceState::new();
    spaces.clear_chars();
    spaces.set_chars(' ', ' ', true);

    let mut tokenizer = generic_tokenizer();
    tokenizer.skip_whitespaces = false;
    tokenizer.skip_unknown = false;
    tokenizer.merge_whitespaces = true;
    tokenizer.whitespace_state = Some(Box::new(spaces));

    assert_eq!(
        kinds(&tokenizer, "a \tb"),
        vec![
            (TokenType::Word, "a".into()),
            (TokenType::Whitespace, " ".into()),
            (TokenType::Unknown, "\t".into()),
            (TokenType::Word, "b".into()),
        ]
    );

    tokenizer.skip_unknown = true;
    assert_eq!(tokenizer.tokenize_buffer_to_strings("a \tb").unwrap(), vec!["a", " ", "b"]);
}

#[test]
fn test_merge_whitespaces_around_skipped_comment() {
    let mut tokenizer = expression_tokenizer();
    tokenizer.skip_whitespaces = false;
    tokenizer.skip_comments = true;

    assert_eq!(
        tokenizer.tokenize_buffer_to_strings("a /* c */ b").unwrap(),
        vec!["a", " ", " ", "b"]
    );

    tokenizer.merge_whitespaces = true;
    let tokens = tokenizer.tokenize_buffer("a /* c */\tb").unwrap();
    assert_eq!(tokens.len(), 3);
    assert_eq!(tokens[1].token_type(), TokenType::Whitespace);
    assert_eq!(tokens[1].value(), " \t");
    assert_eq!((tokens[1].line(), tokens[1].column()), (1, 2));
}

#[test]
fn test_token_positions() {
    let tokens = generic_tokenizer().tokenize_buffer("a\n  bc").unwrap();
    assert_eq!((tokens[0].line(), tokens[0].column()), (1, 1));
    assert_eq!((tokens[1].line(), tokens[1].column()), (2, 3));
}

#[test]
fn test_unterminated_string() {
    let err = generic_tokenizer().tokenize_buffer("x 'abc").unwrap_err();
    assert_eq!(err.code, ErrorCode::UnexpectedEnd);
    assert_eq!((err.line, err.column), (Some(1), Some(3)));
}

#[test]
fn test_quote_encoding() {
    let state = GenericQuoteState::new();
    assert_eq!(state.encode_string("it's", '\''), "'it''s'");
    assert_eq!(state.decode_string("'it''s'", '\''), "it's");
}

#[test]
fn test_scanner_pushback() {
    let mut scanner = Scanner::new("ab");
    assert_eq!(scanner.read(), Some('a'));
    assert_eq!(scanner.read(), Some('b'));
    assert!(scanner.is_eof());
    scanner.unread_many(2);
    assert_eq!(scanner.peek(), Some('a'));
    assert_eq!(scanner.peek_at(1), Some('b'));
}

// ============================================================================
// Expression tokenizer
// ============================================================================

#[test]
fn test_expression_symbols() {
    let values = expression_tokenizer()
        .tokenize_buffer_to_strings("a<=b<>c!=d<<1>>2")
        .unwrap();
    assert_eq!(
        values,
        vec!["a", "<=", "b", "<>", "c", "!=", "d", "<<", "1", ">>", "2"]
    );
}

#[test]
fn test_expression_words_allow_dollar() {
    let values = expression_tokenizer()
        .tokenize_buffer_to_strings("$total_2 + x")
        .unwrap();
    assert_eq!(values, vec!["$total_2", "+", "x"]);
}

#[test]
fn test_unterminated_block_comment() {
    let err = expression_tokenizer().tokenize_buffer("1 /* open").unwrap_err();
    assert_eq!(err.code, ErrorCode::UnexpectedEnd);
}

// ============================================================================
// Mustache tokenizer
// ============================================================================

#[test]
fn test_mustache_whitespace_inside_tags() {
    let values = MustacheTokenizer::new()
        .tokenize_buffer_to_strings("a {{  # list  }} b")
        .unwrap();
    assert_eq!(values, vec!["a ", "{{", "#", "list", "}}", " b"]);
}

#[test]
fn test_mustache_plain_text() {
    let tokens = MustacheTokenizer::new().tokenize_buffer("no tags here").unwrap();
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].token_type(), TokenType::Special);
}
