/// Kinds of nodes in a parsed template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MustacheTokenType {
    /// Literal text
    Value,
    /// `{{{name}}}`, inserted as is
    Variable,
    /// `{{name}}`, inserted escaped
    EscapedVariable,
    /// `{{#name}}` or `{{#if name}}`
    Section,
    /// `{{^name}}` or `{{#unless name}}`
    InvertedSection,
    /// `{{/name}}` or `{{/}}`
    SectionEnd,
    /// `{{! ... }}`
    Comment,
}

impl MustacheTokenType {
    pub fn name(&self) -> &'static str {
        match self {
            MustacheTokenType::Value => "Value",
            MustacheTokenType::Variable => "Variable",
            MustacheTokenType::EscapedVariable => "EscapedVariable",
            MustacheTokenType::Section => "Section",
            MustacheTokenType::InvertedSection => "InvertedSection",
            MustacheTokenType::SectionEnd => "SectionEnd",
            MustacheTokenType::Comment => "Comment",
        }
    }
}

/// A node of a template tree.
///
/// Sections own the nodes between their start and end tags; every other
/// node has no children.
#[derive(Debug, Clone, PartialEq)]
pub struct MustacheToken {
    token_type: MustacheTokenType,
    value: Option<String>,
    tokens: Vec<MustacheToken>,
    line: usize,
    column: usize,
}

impl MustacheToken {
    pub fn new(
        token_type: MustacheTokenType,
        value: Option<String>,
        line: usize,
        column: usize,
    ) -> Self {
        MustacheToken {
            token_type,
            value,
            tokens: Vec::new(),
            line,
            column,
        }
    }

    pub(crate) fn with_tokens(mut self, tokens: Vec<MustacheToken>) -> Self {
        self.tokens = tokens;
        self
    }

    pub fn token_type(&self) -> MustacheTokenType {
        self.token_type
    }

    /// Text of a value node, or the variable or section name.
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Children of a section
    pub fn tokens(&self) -> &[MustacheToken] {
        &self.tokens
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn column(&self) -> usize {
        self.column
    }
}
