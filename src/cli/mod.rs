//! CLI support for stamen
//!
//! Provides programmatic access to the `stamen` commands so they can be
//! embedded in other tools.

mod compile;
mod convert;
mod eval;
mod template;

pub use compile::{CompileResult, execute_compile};
pub use convert::read_variables;
pub use eval::{EvalOptions, execute_eval};
pub use template::{execute_template, template_to_json};

use std::io;

/// Errors that can occur during CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Compilation or evaluation error
    #[error("{0}")]
    Expression(#[from] crate::Error),
    /// JSON parsing error
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    /// Variables must be given as a JSON object
    #[error("Variables must be a JSON object, got {0}")]
    NotAnObject(String),
}
