//! S-expression reader.
//!
//! Matches parentheses over the token stream and produces a tree, so the
//! parser can look at all children of a form before deciding what it is.
//!
//! ```
//! use iface_adapter::wat::sexpr::read;
//!
//! let sexpr = read("(module (@interface func))").unwrap();
//! let list = sexpr.as_list().unwrap();
//! assert_eq!(list.head_keyword(), Some("module"));
//! assert_eq!(list.len(), 2);
//! ```

use super::error::{LexError, ReadError};
use super::lexer::Lexer;
use super::token::{IntLit, Span, Token, TokenKind};
use std::fmt;
use std::iter::Peekable;

/// Deepest list nesting the reader accepts.
pub const MAX_NESTING: usize = 1000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SExpr {
    Atom(Token),
    /// A parenthesised list; the span covers both parentheses.
    List { span: Span, items: Vec<SExpr> },
}

impl SExpr {
    pub fn span(&self) -> Span {
        match self {
            SExpr::Atom(token) => token.span,
            SExpr::List { span, .. } => *span,
        }
    }

    pub fn as_atom(&self) -> Option<&Token> {
        match self {
            SExpr::Atom(token) => Some(token),
            SExpr::List { .. } => None,
        }
    }

    pub fn as_list(&self) -> Option<SExprList<'_>> {
        match self {
            SExpr::Atom(_) => None,
            SExpr::List { span, items } => Some(SExprList { span: *span, items }),
        }
    }

    pub fn as_keyword(&self) -> Option<&str> {
        match self.as_atom()?.kind {
            TokenKind::Keyword(ref kw) => Some(kw),
            _ => None,
        }
    }

    pub fn as_id(&self) -> Option<&str> {
        match self.as_atom()?.kind {
            TokenKind::Id(ref id) => Some(id),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<IntLit> {
        match self.as_atom()?.kind {
            TokenKind::Integer(lit) => Some(lit),
            _ => None,
        }
    }

    pub fn as_string(&self) -> Option<&[u8]> {
        match self.as_atom()?.kind {
            TokenKind::String(ref bytes) => Some(bytes),
            _ => None,
        }
    }

    /// True if this is a list whose first item is `keyword`.
    pub fn is_list_headed_by(&self, keyword: &str) -> bool {
        self.as_list().map_or(false, |list| list.head_keyword() == Some(keyword))
    }

    pub fn expect_list(&self) -> Result<SExprList<'_>, ReadError> {
        self.as_list()
            .ok_or_else(|| ReadError::new(format!("expected list, found {self}"), self.span()))
    }
}

/// A borrowed view of a list's items.
#[derive(Debug, Clone, Copy)]
pub struct SExprList<'a> {
    pub span: Span,
    pub items: &'a [SExpr],
}

impl<'a> SExprList<'a> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn head(&self) -> Option<&'a SExpr> {
        self.items.first()
    }

    pub fn head_keyword(&self) -> Option<&'a str> {
        self.head().and_then(SExpr::as_keyword)
    }

    pub fn get(&self, index: usize) -> Option<&'a SExpr> {
        self.items.get(index)
    }

    /// Items after the head.
    pub fn tail(&self) -> &'a [SExpr] {
        self.items.get(1..).unwrap_or(&[])
    }

    pub fn expect_head(&self, expected: &str) -> Result<(), ReadError> {
        match self.head() {
            Some(head) if head.as_keyword() == Some(expected) => Ok(()),
            Some(head) => Err(ReadError::new(format!("expected '{expected}', found {head}"), head.span())),
            None => Err(ReadError::new(format!("expected '{expected}'"), self.span)),
        }
    }
}

/// Read exactly one S-expression from `source`.
///
/// # Errors
/// Lexical errors, unbalanced parentheses, or trailing tokens.
pub fn read(source: &str) -> Result<SExpr, ReadError> {
    let mut tokens = Lexer::new(source).peekable();
    let sexpr = read_sexpr(&mut tokens, 0)?;
    match tokens.next() {
        Some(Ok(token)) => Err(ReadError::new("unexpected token after expression", token.span)),
        Some(Err(e)) => Err(e.into()),
        None => Ok(sexpr),
    }
}

/// Read every top-level S-expression in `source` (scripts hold many).
pub fn read_all(source: &str) -> Result<Vec<SExpr>, ReadError> {
    let mut tokens = Lexer::new(source).peekable();
    let mut forms = Vec::new();
    while tokens.peek().is_some() {
        forms.push(read_sexpr(&mut tokens, 0)?);
    }
    Ok(forms)
}

/// `depth` counts the lists already open around this expression.
fn read_sexpr<I>(tokens: &mut Peekable<I>, depth: usize) -> Result<SExpr, ReadError>
where
    I: Iterator<Item = Result<Token, LexError>>,
{
    let token = match tokens.next() {
        Some(token) => token?,
        None => return Err(ReadError::new("unexpected end of input", Span::ZERO)),
    };
    match token.kind {
        TokenKind::LeftParen => {
            let open = token.span;
            if depth >= MAX_NESTING {
                return Err(ReadError::new("nesting too deep", open));
            }
            let mut items = Vec::new();
            loop {
                match tokens.peek() {
                    None => return Err(ReadError::new("unclosed parenthesis", open)),
                    Some(Err(e)) => return Err(e.clone().into()),
                    Some(Ok(Token {
                        kind: TokenKind::RightParen,
                        span,
                    })) => {
                        let span = open.to(*span);
                        tokens.next();
                        return Ok(SExpr::List { span, items });
                    }
                    Some(Ok(_)) => items.push(read_sexpr(tokens, depth + 1)?),
                }
            }
        }
        TokenKind::RightParen => Err(ReadError::new("unexpected ')'", token.span)),
        _ => Ok(SExpr::Atom(token)),
    }
}

impl fmt::Display for SExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SExpr::Atom(token) => write!(f, "{token}"),
            SExpr::List { items, .. } => {
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, ")")
            }
        }
    }
}
