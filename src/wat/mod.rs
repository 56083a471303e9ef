//! Adapter text format.
//!
//! Adapters are written as `@interface func` fields of a module, using the
//! WebAssembly text format's lexical rules:
//!
//! ```text
//! (module
//!   (@interface func $narrow (export "narrow") (param $x i64) (result s16)
//!     (i64-to-s16x (arg.get $x))))
//! ```
//!
//! Parsing happens in three stages, each with its own error type: the
//! [`Lexer`] produces tokens, [`sexpr::read`] matches parentheses, and
//! [`parse`] builds and validates an [`AdapterModule`](crate::adapter::AdapterModule).
//!
//! ```
//! use iface_adapter::wat;
//!
//! let err = wat::parse("(module (@interface func (param i32) arg.get 0 i32-to-u8x))").unwrap_err();
//! assert_eq!(err.message, "unknown instruction: i32-to-u8x");
//! ```

mod cursor;
mod error;
mod lexer;
mod parser;
pub mod sexpr;
mod token;

pub use error::{LexError, ParseError, ReadError};
pub use lexer::Lexer;
pub use parser::{parse, parse_with_config};
pub(crate) use parser::parse_string;
pub use token::{IntLit, Span, Token, TokenKind};
