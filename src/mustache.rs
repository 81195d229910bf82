//! # Mustache templates
//!
//! Templates are split into text and tags by [`MustacheTokenizer`] and then
//! parsed by [`MustacheParser`] into a tree where every section owns the
//! nodes between its start and end tags.
//!
//! Supported tags:
//!
//! - `{{name}}` escaped variable, `{{{name}}}` raw variable
//! - `{{#name}}`, `{{#if name}}` section
//! - `{{^name}}`, `{{#unless name}}` inverted section
//! - `{{/name}}`, `{{/}}`, `{{/if}}`, `{{/unless}}` section end
//! - `{{! text }}` comment
pub mod parser;
pub mod token;
pub mod tokenizer;

pub use parser::MustacheParser;
pub use token::{MustacheToken, MustacheTokenType};
pub use tokenizer::{MustacheSpecialState, MustacheTokenizer};
