//! Error types for adapter text parsing.
//!
//! Each stage has its own error (lexing, S-expression reading, parsing) and
//! each converts into the next, so `?` carries a lexer failure all the way up
//! to the parser's caller with its original position.

use super::token::Span;
use std::fmt;

/// An error encountered during lexical analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct LexError {
    pub message: String,
    pub span: Span,
}

impl LexError {
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
        }
    }
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.span, self.message)
    }
}

impl std::error::Error for LexError {}

/// An error encountered while matching parentheses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadError {
    pub message: String,
    pub span: Span,
}

impl ReadError {
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
        }
    }
}

impl fmt::Display for ReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at line {}, column {}", self.message, self.span.line, self.span.column)
    }
}

impl std::error::Error for ReadError {}

impl From<LexError> for ReadError {
    fn from(e: LexError) -> Self {
        Self {
            message: e.message,
            span: e.span,
        }
    }
}

/// An error encountered while building adapters from S-expressions.
///
/// Validation failures are reported through this type as well, positioned at
/// the adapter that failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub message: String,
    pub span: Span,
}

impl ParseError {
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
        }
    }

    /// Creates an "expected X, found Y" error.
    pub fn expected(expected: &str, found: impl fmt::Display, span: Span) -> Self {
        Self::new(format!("expected {expected}, found {found}"), span)
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at line {}, column {}", self.message, self.span.line, self.span.column)
    }
}

impl std::error::Error for ParseError {}

impl From<ReadError> for ParseError {
    fn from(e: ReadError) -> Self {
        Self {
            message: e.message,
            span: e.span,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = LexError::new("unexpected character", Span::new(10, 11, 3, 5));
        assert_eq!(err.to_string(), "3:5: unexpected character");

        let err = ParseError::from(ReadError::from(err));
        assert_eq!(err.to_string(), "unexpected character at line 3, column 5");
    }

    #[test]
    fn expected_message() {
        let err = ParseError::expected("value type", "f32", Span::ZERO);
        assert_eq!(err.message, "expected value type, found f32");
    }
}
