//! Error types for the documentation stages

use crate::lexer::{LexError, LineIndex, Location, SpannedError};
use thiserror::Error;

/// An extraction error with its source location
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractError {
    /// The kind of error
    pub kind: ExtractErrorKind,
    /// Where the error occurred
    pub location: Location,
}

impl ExtractError {
    /// Create a new extraction error
    #[must_use]
    pub fn new(kind: ExtractErrorKind, location: Location) -> Self {
        Self { kind, location }
    }

    /// Convert a lexer error, resolving its span against `lines`
    #[must_use]
    pub fn from_lex(error: &SpannedError, lines: &LineIndex) -> Self {
        let kind = match error.error {
            LexError::UnterminatedComment => ExtractErrorKind::UnterminatedComment,
            LexError::UnterminatedString => ExtractErrorKind::UnterminatedString,
        };
        Self::new(kind, lines.location(error.span.start))
    }
}

impl std::fmt::Display for ExtractError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at {}", self.kind, self.location)
    }
}

impl std::error::Error for ExtractError {}

/// The kind of extraction error
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractErrorKind {
    #[error("unterminated block comment")]
    UnterminatedComment,

    #[error("unterminated string literal")]
    UnterminatedString,

    #[error("unexpected '}}' outside any declaration")]
    UnexpectedCloseBrace,

    /// End of input with a scope still open; names the innermost one
    #[error("{scope} is never closed")]
    UnclosedScope { scope: String },

    #[error("unclosed '{delimiter}' at end of file")]
    UnclosedDelimiter { delimiter: char },
}

/// Tree serialization errors
#[derive(Error, Debug)]
pub enum SerializeError {
    #[error("documentation tree is deeper than {max} levels")]
    TooDeep { max: usize },

    #[error("documentation tree has more than {max} nodes")]
    TooLarge { max: usize },

    #[error("markup is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),

    #[error("failed to write markup: {0}")]
    Io(#[from] std::io::Error),
}

/// Markup parsing and page rendering errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error("malformed markup: {0}")]
    Malformed(String),

    #[error("markup has no root element")]
    MissingRoot,

    #[error("unknown element <{0}>")]
    UnknownElement(String),

    #[error("<{element}> is missing its name attribute")]
    MissingName { element: String },
}
