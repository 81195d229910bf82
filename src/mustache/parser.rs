use log::debug;

use crate::errors::{Error, ErrorCode, Result};
use crate::tokenizers::{Token, TokenType};

use super::token::{MustacheToken, MustacheTokenType};
use super::tokenizer::MustacheTokenizer;

/// Deepest nesting of sections.
pub const MAX_SECTION_DEPTH: usize = 128;

/// Modes of the lexical analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LexicalState {
    /// Outside of any tag
    Value,
    /// Right after an opening bracket
    Operator1,
    /// After `#`, where an `if`/`unless` qualifier may follow
    Operator2,
    /// A name is required next; optional after `/`
    Variable,
    /// Only the closing bracket may follow
    Closure,
    /// Inside `{{! ... }}`
    Comment,
}

/// The tag being read.
#[derive(Debug, Clone)]
struct OpenTag {
    bracket: String,
    token_type: MustacheTokenType,
    name: Option<String>,
    comment: Vec<String>,
    line: usize,
    column: usize,
}

impl OpenTag {
    fn new(bracket: &Token) -> Self {
        let token_type = if bracket.value() == "{{{" {
            MustacheTokenType::Variable
        } else {
            MustacheTokenType::EscapedVariable
        };
        OpenTag {
            bracket: bracket.value().to_string(),
            token_type,
            name: None,
            comment: Vec::new(),
            line: bracket.line(),
            column: bracket.column(),
        }
    }

    fn closing_bracket(&self) -> &'static str {
        if self.bracket == "{{{" { "}}}" } else { "}}" }
    }
}

/// Parses Mustache templates into a tree of sections.
///
/// # Examples
///
/// ```
/// use stamen::mustache::{MustacheParser, MustacheTokenType};
///
/// let mut parser = MustacheParser::new();
/// parser.parse_string("{{#items}}- {{name}}\n{{/items}}").unwrap();
///
/// let section = &parser.result_tokens()[0];
/// assert_eq!(section.token_type(), MustacheTokenType::Section);
/// assert_eq!(section.value(), Some("items"));
/// assert_eq!(section.tokens().len(), 3);
/// assert_eq!(parser.variable_names(), ["items", "name"]);
/// ```
#[derive(Debug, Default)]
pub struct MustacheParser {
    template: String,
    original_tokens: Vec<Token>,
    initial_tokens: Vec<MustacheToken>,
    result_tokens: Vec<MustacheToken>,
    variable_names: Vec<String>,
}

impl MustacheParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn original_tokens(&self) -> &[Token] {
        &self.original_tokens
    }

    /// Flat list of recognised tags and text, comments included
    pub fn initial_tokens(&self) -> &[MustacheToken] {
        &self.initial_tokens
    }

    /// Section tree without comments and section ends
    pub fn result_tokens(&self) -> &[MustacheToken] {
        &self.result_tokens
    }

    /// Referenced names in order of first appearance
    pub fn variable_names(&self) -> &[String] {
        &self.variable_names
    }

    pub fn clear(&mut self) {
        self.template.clear();
        self.original_tokens.clear();
        self.initial_tokens.clear();
        self.result_tokens.clear();
        self.variable_names.clear();
    }

    /// Tokenizes and parses a template.
    pub fn parse_string(&mut self, template: &str) -> Result<()> {
        self.clear();
        self.template = template.to_string();

        let result = MustacheTokenizer::new()
            .tokenize_buffer(template)
            .and_then(|tokens| {
                self.original_tokens = tokens;
                self.perform_parsing()
            });
        self.finish(result)
    }

    /// Parses a template from tokens scanned by the caller.
    pub fn parse_tokens(&mut self, tokens: Vec<Token>) -> Result<()> {
        self.clear();
        self.template = tokens.iter().map(Token::value).collect();
        self.original_tokens = tokens;

        let result = self.perform_parsing();
        self.finish(result)
    }

    fn finish(&mut self, result: Result<()>) -> Result<()> {
        match result {
            Ok(()) => {
                debug!(
                    "parsed template into {} top-level nodes, variables: {:?}",
                    self.result_tokens.len(),
                    self.variable_names
                );
                Ok(())
            }
            Err(e) => {
                debug!("failed to parse template: {}", e);
                self.clear();
                Err(e)
            }
        }
    }

    fn perform_parsing(&mut self) -> Result<()> {
        self.perform_lexical_analysis()?;

        let mut index = 0;
        self.result_tokens = parse_block(&self.initial_tokens, &mut index, None, 0)?;
        Ok(())
    }

    fn perform_lexical_analysis(&mut self) -> Result<()> {
        let mut state = LexicalState::Value;
        let mut tag: Option<OpenTag> = None;
        let mut tokens = Vec::new();

        for token in &self.original_tokens {
            let value = token.value();
            let is_symbol = token.token_type() == TokenType::Symbol;

            if state == LexicalState::Value {
                if token.token_type() == TokenType::Special {
                    tokens.push(MustacheToken::new(
                        MustacheTokenType::Value,
                        Some(value.to_string()),
                        token.line(),
                        token.column(),
                    ));
                } else if is_symbol && matches!(value, "{{" | "{{{") {
                    tag = Some(OpenTag::new(token));
                    state = LexicalState::Operator1;
                } else {
                    return Err(unexpected_symbol(token));
                }
                continue;
            }

            let Some(open) = tag.as_mut() else {
                return Err(Error::at(
                    ErrorCode::Internal,
                    "Tag state without an open tag",
                    token.line(),
                    token.column(),
                ));
            };

            if is_symbol && matches!(value, "}}" | "}}}") {
                let node = close_tag(open, state, token)?;
                if let Some(name) = node.value()
                    && matches!(
                        node.token_type(),
                        MustacheTokenType::Variable
                            | MustacheTokenType::EscapedVariable
                            | MustacheTokenType::Section
                            | MustacheTokenType::InvertedSection
                    )
                    && !self
                        .variable_names
                        .iter()
                        .any(|known| known.eq_ignore_ascii_case(name))
                {
                    self.variable_names.push(name.to_string());
                }
                tokens.push(node);
                tag = None;
                state = LexicalState::Value;
                continue;
            }

            state = read_tag_token(state, open, token)?;
        }

        if state != LexicalState::Value {
            let (line, column) = self
                .original_tokens
                .last()
                .map(|token| (token.line(), token.column()))
                .unwrap_or((1, 1));
            return Err(Error::at(
                ErrorCode::UnexpectedEnd,
                "Unexpected end of template inside a tag",
                line,
                column,
            ));
        }

        self.initial_tokens = tokens;
        Ok(())
    }
}

/// Consumes one token inside a tag and returns the next state.
fn read_tag_token(state: LexicalState, open: &mut OpenTag, token: &Token) -> Result<LexicalState> {
    let value = token.value();
    let is_word = token.token_type() == TokenType::Word;
    let triple = open.bracket == "{{{";

    match state {
        LexicalState::Comment => {
            open.comment.push(value.to_string());
            Ok(LexicalState::Comment)
        }
        LexicalState::Operator1 if is_word => {
            open.name = Some(value.to_string());
            Ok(LexicalState::Closure)
        }
        LexicalState::Operator1 if token.token_type() == TokenType::Symbol && !triple => {
            let (token_type, next) = match value {
                "#" => (MustacheTokenType::Section, LexicalState::Operator2),
                "^" => (MustacheTokenType::InvertedSection, LexicalState::Variable),
                "/" => (MustacheTokenType::SectionEnd, LexicalState::Variable),
                "!" => (MustacheTokenType::Comment, LexicalState::Comment),
                _ => return Err(unexpected_symbol(token)),
            };
            open.token_type = token_type;
            Ok(next)
        }
        LexicalState::Operator2 if is_word => {
            if value.eq_ignore_ascii_case("if") {
                Ok(LexicalState::Variable)
            } else if value.eq_ignore_ascii_case("unless") {
                open.token_type = MustacheTokenType::InvertedSection;
                Ok(LexicalState::Variable)
            } else {
                open.name = Some(value.to_string());
                Ok(LexicalState::Closure)
            }
        }
        LexicalState::Variable if is_word => {
            // `{{/if}}` and `{{/unless}}` close the innermost section
            let qualifier = value.eq_ignore_ascii_case("if") || value.eq_ignore_ascii_case("unless");
            if open.token_type != MustacheTokenType::SectionEnd || !qualifier {
                open.name = Some(value.to_string());
            }
            Ok(LexicalState::Closure)
        }
        _ => Err(unexpected_symbol(token)),
    }
}

/// Finishes the open tag at its closing bracket.
fn close_tag(open: &OpenTag, state: LexicalState, close: &Token) -> Result<MustacheToken> {
    check_brackets(open, close)?;

    if state == LexicalState::Comment {
        return Ok(MustacheToken::new(
            MustacheTokenType::Comment,
            Some(open.comment.join(" ")),
            open.line,
            open.column,
        ));
    }
    if open.name.is_none() && open.token_type != MustacheTokenType::SectionEnd {
        return Err(Error::at(
            ErrorCode::MissingVariable,
            "Missing variable name",
            close.line(),
            close.column(),
        ));
    }
    Ok(MustacheToken::new(
        open.token_type,
        open.name.clone(),
        open.line,
        open.column,
    ))
}

fn check_brackets(open: &OpenTag, close: &Token) -> Result<()> {
    if close.value() != open.closing_bracket() {
        return Err(Error::at(
            ErrorCode::MismatchedBrackets,
            format!("Mismatched brackets {} and {}", open.bracket, close.value()),
            close.line(),
            close.column(),
        ));
    }
    Ok(())
}

fn unexpected_symbol(token: &Token) -> Error {
    Error::at(
        ErrorCode::UnexpectedSymbol,
        format!("Unexpected symbol {}", token.value()),
        token.line(),
        token.column(),
    )
}

/// Collects nodes until the end of `section`, or the end of input at the top
/// level.
fn parse_block(
    tokens: &[MustacheToken],
    index: &mut usize,
    section: Option<&MustacheToken>,
    depth: usize,
) -> Result<Vec<MustacheToken>> {
    let mut result = Vec::new();

    while let Some(token) = tokens.get(*index) {
        *index += 1;
        match token.token_type() {
            MustacheTokenType::Comment => {}
            MustacheTokenType::Section | MustacheTokenType::InvertedSection => {
                if depth >= MAX_SECTION_DEPTH {
                    return Err(Error::at(
                        ErrorCode::UnexpectedSymbol,
                        format!("Sections are nested deeper than {} levels", MAX_SECTION_DEPTH),
                        token.line(),
                        token.column(),
                    ));
                }
                let children = parse_block(tokens, index, Some(token), depth + 1)?;
                result.push(token.clone().with_tokens(children));
            }
            MustacheTokenType::SectionEnd => {
                let closes = match (section, token.value()) {
                    (Some(_), None) => true,
                    (Some(open), Some(name)) => open
                        .value()
                        .is_some_and(|open_name| open_name.eq_ignore_ascii_case(name)),
                    (None, _) => false,
                };
                if !closes {
                    return Err(Error::at(
                        ErrorCode::UnexpectedSectionEnd,
                        format!("Unexpected section end {}", token.value().unwrap_or_default()),
                        token.line(),
                        token.column(),
                    ));
                }
                return Ok(result);
            }
            MustacheTokenType::Value
            | MustacheTokenType::Variable
            | MustacheTokenType::EscapedVariable => result.push(token.clone()),
        }
    }

    if let Some(open) = section {
        return Err(Error::at(
            ErrorCode::NotClosedSection,
            format!("Section {} is not closed", open.value().unwrap_or_default()),
            open.line(),
            open.column(),
        ));
    }
    Ok(result)
}
