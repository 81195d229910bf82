//! Error type shared by the tokenizers, parsers and the expression calculator.
//!
//! Every failure carries a machine-readable [`ErrorCode`], a human readable
//! message and, when the failure can be pinned to a token, the line and column
//! of that token.

use std::fmt;

/// Machine-readable error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    Unknown,
    Internal,
    UnexpectedEnd,
    ErrorNear,
    ErrorAt,
    UnknownSymbol,
    UnexpectedSymbol,
    MissedCloseParenthesis,
    MissedCloseSquareBracket,
    MismatchedBrackets,
    MissingVariable,
    NotClosedSection,
    UnexpectedSectionEnd,
    VarNotFound,
    FuncNotFound,

    // Raised by functions and variant operations
    WrongParamCount,
    BadParamType,
    UnsupportedOperation,
    BadConversion,
    DivisionByZero,
}

impl ErrorCode {
    /// Returns the stable, upper-case name of the code (e.g. `VAR_NOT_FOUND`).
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::Unknown => "UNKNOWN",
            ErrorCode::Internal => "INTERNAL",
            ErrorCode::UnexpectedEnd => "UNEXPECTED_END",
            ErrorCode::ErrorNear => "ERROR_NEAR",
            ErrorCode::ErrorAt => "ERROR_AT",
            ErrorCode::UnknownSymbol => "UNKNOWN_SYMBOL",
            ErrorCode::UnexpectedSymbol => "UNEXPECTED_SYMBOL",
            ErrorCode::MissedCloseParenthesis => "MISSED_CLOSE_PARENTHESIS",
            ErrorCode::MissedCloseSquareBracket => "MISSED_CLOSE_SQUARE_BRACKET",
            ErrorCode::MismatchedBrackets => "MISMATCHED_BRACKETS",
            ErrorCode::MissingVariable => "MISSING_VARIABLE",
            ErrorCode::NotClosedSection => "NOT_CLOSED_SECTION",
            ErrorCode::UnexpectedSectionEnd => "UNEXPECTED_SECTION_END",
            ErrorCode::VarNotFound => "VAR_NOT_FOUND",
            ErrorCode::FuncNotFound => "FUNC_NOT_FOUND",
            ErrorCode::WrongParamCount => "WRONG_PARAM_COUNT",
            ErrorCode::BadParamType => "BAD_PARAM_TYPE",
            ErrorCode::UnsupportedOperation => "UNSUPPORTED_OPERATION",
            ErrorCode::BadConversion => "BAD_CONVERSION",
            ErrorCode::DivisionByZero => "DIVISION_BY_ZERO",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error raised while tokenizing, parsing or evaluating.
///
/// # Examples
///
/// ```
/// use stamen::errors::{Error, ErrorCode};
///
/// let err = Error::at(ErrorCode::ErrorNear, "Syntax error near ')'", 1, 7);
/// assert_eq!(err.code, ErrorCode::ErrorNear);
/// assert_eq!(err.to_string(), "ERROR_NEAR: Syntax error near ')' at line 1, column 7");
/// ```
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{code}: {message}{}", position_suffix(.line, .column))]
pub struct Error {
    /// Optional trace/correlation id supplied by the caller
    pub correlation_id: Option<String>,
    pub code: ErrorCode,
    pub message: String,
    pub line: Option<usize>,
    pub column: Option<usize>,
}

fn position_suffix(line: &Option<usize>, column: &Option<usize>) -> String {
    match (line, column) {
        (Some(line), Some(column)) => format!(" at line {}, column {}", line, column),
        (Some(line), None) => format!(" at line {}", line),
        _ => String::new(),
    }
}

impl Error {
    /// Creates an error that is not tied to a source position.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Error {
            correlation_id: None,
            code,
            message: message.into(),
            line: None,
            column: None,
        }
    }

    /// Creates an error pointing at a line and column of the source.
    pub fn at(code: ErrorCode, message: impl Into<String>, line: usize, column: usize) -> Self {
        Error {
            correlation_id: None,
            code,
            message: message.into(),
            line: Some(line),
            column: Some(column),
        }
    }

    pub fn with_correlation_id(mut self, correlation_id: impl Into<String>) -> Self {
        self.correlation_id = Some(correlation_id.into());
        self
    }
}

/// Name used by callers that deal only with expressions.
pub type ExpressionError = Error;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;
