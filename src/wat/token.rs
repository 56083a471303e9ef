//! Token types for the adapter text lexer.

use std::fmt;

/// A location in source text.
///
/// Byte offsets are kept for slicing; line and column (1-indexed, columns in
/// characters) are what errors report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: u32,
    pub column: u32,
}

impl Span {
    /// A zero-length span at the start of source, for errors without position.
    pub const ZERO: Span = Span {
        start: 0,
        end: 0,
        line: 1,
        column: 1,
    };

    pub fn new(start: usize, end: usize, line: u32, column: u32) -> Self {
        Self {
            start,
            end,
            line,
            column,
        }
    }

    /// Extend this span to finish where `other` finishes.
    #[must_use]
    pub fn to(self, other: Span) -> Span {
        Span {
            end: other.end,
            ..self
        }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A lexical token with its location in source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// The original source text of this token.
    ///
    /// ```
    /// use iface_adapter::wat::Lexer;
    ///
    /// let source = "(@interface func)";
    /// let tokens = Lexer::tokenise(source).unwrap();
    /// assert_eq!(tokens[1].text(source), "@interface");
    /// ```
    #[must_use]
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.span.start..self.span.end]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    LeftParen,
    RightParen,
    /// A bare word: `module`, `@interface`, `arg.get`, `i32-to-u16x`, `i64.const`.
    Keyword(String),
    /// An identifier such as `$x`, stored without the leading `$`.
    Id(String),
    /// A string literal with escapes resolved. Raw bytes; the parser decides
    /// whether they must be UTF-8.
    String(Vec<u8>),
    Integer(IntLit),
}

/// An integer literal as written: magnitude plus sign.
///
/// Keeping the sign apart lets one literal stand for any of the signed or
/// unsigned widths up to 64 bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntLit {
    pub magnitude: u64,
    pub negative: bool,
}

impl IntLit {
    pub fn new(magnitude: u64, negative: bool) -> Self {
        Self { magnitude, negative }
    }

    /// The literal's mathematical value.
    #[must_use]
    pub fn to_i128(self) -> i128 {
        let n = i128::from(self.magnitude);
        if self.negative {
            -n
        } else {
            n
        }
    }

    /// The literal as a non-negative index, if it is one and fits in u32.
    #[must_use]
    pub fn to_u32(self) -> Option<u32> {
        if self.negative && self.magnitude != 0 {
            return None;
        }
        u32::try_from(self.magnitude).ok()
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::LeftParen => write!(f, "("),
            TokenKind::RightParen => write!(f, ")"),
            TokenKind::Keyword(kw) => write!(f, "{kw}"),
            TokenKind::Id(id) => write!(f, "${id}"),
            TokenKind::String(bytes) => write!(f, "{:?}", String::from_utf8_lossy(bytes)),
            TokenKind::Integer(lit) => write!(f, "{}", lit.to_i128()),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.kind.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_lit_values() {
        assert_eq!(IntLit::new(5, true).to_i128(), -5);
        assert_eq!(IntLit::new(u64::MAX, false).to_i128(), u64::MAX as i128);
        assert_eq!(IntLit::new(1 << 63, true).to_i128(), i64::MIN as i128);
    }

    #[test]
    fn int_lit_index() {
        assert_eq!(IntLit::new(3, false).to_u32(), Some(3));
        assert_eq!(IntLit::new(0, true).to_u32(), Some(0));
        assert_eq!(IntLit::new(3, true).to_u32(), None);
        assert_eq!(IntLit::new(1 << 32, false).to_u32(), None);
    }

    #[test]
    fn span_display_and_join() {
        let a = Span::new(4, 6, 2, 3);
        let b = Span::new(10, 12, 2, 9);
        assert_eq!(a.to_string(), "2:3");
        assert_eq!(a.to(b), Span::new(4, 12, 2, 3));
    }

    #[test]
    fn token_display() {
        assert_eq!(TokenKind::Id("x".into()).to_string(), "$x");
        assert_eq!(TokenKind::Integer(IntLit::new(7, true)).to_string(), "-7");
        assert_eq!(TokenKind::String(b"a\"b".to_vec()).to_string(), "\"a\\\"b\"");
    }
}
