use crate::variants::Variant;

/// Kinds of expression tokens.
///
/// The parser's result stream only contains operand and operator kinds;
/// brackets, commas and the `IS` keyword are consumed during parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExpressionTokenType {
    Unknown,

    // Punctuation
    /// `(`
    LeftParen,
    /// `)`
    RightParen,
    /// `[`
    LeftBracket,
    /// `]`
    RightBracket,
    /// `,`
    Comma,

    // Arithmetic
    /// `+`
    Plus,
    /// `-` (binary)
    Minus,
    /// `*`
    Star,
    /// `/`
    Slash,
    /// `%`
    Percent,
    /// `^`
    Power,
    /// `<<`
    ShiftLeft,
    /// `>>`
    ShiftRight,
    /// Prefix `-`
    Unary,

    // Relational
    /// `=`
    Equal,
    /// `<>` or `!=`
    NotEqual,
    /// `>`
    More,
    /// `<`
    Less,
    /// `>=`
    MoreEqual,
    /// `<=`
    LessEqual,

    // Logical
    And,
    Or,
    Xor,
    Not,

    // Keywords and their synthetic combinations
    Is,
    In,
    NotIn,
    Like,
    NotLike,
    Null,
    IsNull,
    IsNotNull,

    // Operands
    /// Postfix `expr[index]`
    Element,
    /// Literal value
    Constant,
    /// Reference to a variable by name
    Variable,
    /// Call of a named function; preceded by its argument count
    Function,
    /// Value list `(a, b, ...)`; preceded by its element count
    Array,
}

/// A classified token of an expression.
///
/// Immutable once produced. Constants carry their literal value, variables
/// and functions their name, and operators their source text.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionToken {
    token_type: ExpressionTokenType,
    value: Variant,
    line: usize,
    column: usize,
}

impl ExpressionToken {
    pub fn new(token_type: ExpressionTokenType, value: Variant, line: usize, column: usize) -> Self {
        ExpressionToken {
            token_type,
            value,
            line,
            column,
        }
    }

    pub fn token_type(&self) -> ExpressionTokenType {
        self.token_type
    }

    pub fn value(&self) -> &Variant {
        &self.value
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn column(&self) -> usize {
        self.column
    }
}
