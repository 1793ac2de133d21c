//! Parser errors.

use lodnorm_core::LodError;
use thiserror::Error;

use crate::Rule;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("syntax error: {0}")]
    Syntax(String),

    #[error("unknown prefix '{0}'")]
    UnknownPrefix(String),

    #[error("invalid escape sequence '{0}'")]
    InvalidEscape(String),

    #[error("empty path expression")]
    EmptyPath,
}

impl From<pest::error::Error<Rule>> for ParseError {
    fn from(err: pest::error::Error<Rule>) -> Self {
        ParseError::Syntax(err.to_string())
    }
}

impl From<ParseError> for LodError {
    fn from(err: ParseError) -> Self {
        LodError::Parse(err.to_string())
    }
}
