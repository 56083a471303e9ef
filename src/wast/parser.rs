//! Parser for adapter script (.wast) files.
//!
//! Uses the S-expression reader to split a script into commands. Module
//! bodies are extracted as raw source text and left for the runner to parse.

use super::command::*;
use super::values::parse_const;
use crate::wat::sexpr::{self, SExpr, SExprList};
use crate::wat::{ReadError, Span};
use std::fmt;

/// Errors encountered while parsing a script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WastParseError {
    /// S-expression read error (lexer or structure).
    Read(ReadError),
    /// Invalid command syntax.
    Syntax(WastSyntaxError),
}

/// A syntax error in the command layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WastSyntaxError {
    pub message: String,
    pub span: Span,
}

impl fmt::Display for WastParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WastParseError::Read(e) => write!(f, "{e}"),
            WastParseError::Syntax(e) => write!(f, "{}:{}: {}", e.span.line, e.span.column, e.message),
        }
    }
}

impl std::error::Error for WastParseError {}

impl From<ReadError> for WastParseError {
    fn from(e: ReadError) -> Self {
        WastParseError::Read(e)
    }
}

pub(crate) fn syntax_err(message: impl Into<String>, span: Span) -> WastParseError {
    WastParseError::Syntax(WastSyntaxError {
        message: message.into(),
        span,
    })
}

/// Parse a script into its commands.
///
/// ```
/// use iface_adapter::wast::parse_script;
///
/// let script = parse_script(r#"
///     (module (@interface func (export "f") (param i32) (result u8) arg.get 0 i32-to-u8))
///     (assert_return (invoke "f" (i32.const 257)) (u8.const 1))
/// "#).unwrap();
/// assert_eq!(script.commands.len(), 2);
/// ```
pub fn parse_script(source: &str) -> Result<WastScript, WastParseError> {
    let mut commands = Vec::new();
    for sexpr in sexpr::read_all(source)? {
        let list = sexpr
            .as_list()
            .ok_or_else(|| syntax_err("expected top-level command", sexpr.span()))?;
        let keyword = list
            .head_keyword()
            .ok_or_else(|| syntax_err("expected command keyword", list.span))?;

        let command = match keyword {
            "module" => WastCommand::Module {
                span: list.span,
                name: list.get(1).and_then(SExpr::as_id).map(String::from),
                source: module_source(source, list),
            },
            "invoke" => WastCommand::Action {
                span: list.span,
                action: parse_invoke(list)?,
            },
            "assert_return" => {
                let action = parse_action_arg(list)?;
                let expected = list.items[2..].iter().map(parse_const).collect::<Result<_, _>>()?;
                WastCommand::AssertReturn {
                    span: list.span,
                    action,
                    expected,
                }
            }
            "assert_trap" => WastCommand::AssertTrap {
                span: list.span,
                action: parse_action_arg(list)?,
                message: parse_message(list)?,
            },
            "assert_invalid" => WastCommand::AssertInvalid {
                span: list.span,
                source: parse_module_arg(source, list)?,
                message: parse_message(list)?,
            },
            "assert_malformed" => WastCommand::AssertMalformed {
                span: list.span,
                source: parse_module_arg(source, list)?,
                message: parse_message(list)?,
            },
            other => return Err(syntax_err(format!("unknown command: {other}"), list.span)),
        };
        commands.push(command);
    }
    Ok(WastScript { commands })
}

fn module_source(source: &str, list: SExprList<'_>) -> String {
    source[list.span.start..list.span.end].to_string()
}

/// Grammar: `invoke ::= '(' 'invoke' string const* ')'`
fn parse_invoke(list: SExprList<'_>) -> Result<WastAction, WastParseError> {
    let name = list
        .get(1)
        .ok_or_else(|| syntax_err("expected export name", list.span))
        .and_then(parse_string)?;
    let args = list.items[2..].iter().map(parse_const).collect::<Result<_, _>>()?;
    Ok(WastAction::Invoke { name, args })
}

/// The `(invoke ...)` in second position of an assertion.
fn parse_action_arg(list: SExprList<'_>) -> Result<WastAction, WastParseError> {
    match list.get(1).and_then(SExpr::as_list) {
        Some(action) if action.head_keyword() == Some("invoke") => parse_invoke(action),
        _ => Err(syntax_err("expected (invoke ...)", list.span)),
    }
}

/// The `(module ...)` in second position of an assertion.
fn parse_module_arg(source: &str, list: SExprList<'_>) -> Result<String, WastParseError> {
    match list.get(1).and_then(SExpr::as_list) {
        Some(module) if module.head_keyword() == Some("module") => Ok(module_source(source, module)),
        _ => Err(syntax_err("expected (module ...)", list.span)),
    }
}

/// The expected-failure message that closes an assertion.
fn parse_message(list: SExprList<'_>) -> Result<String, WastParseError> {
    match list.items {
        [_, _, message] => parse_string(message),
        _ => Err(syntax_err("expected a single failure message", list.span)),
    }
}

fn parse_string(sexpr: &SExpr) -> Result<String, WastParseError> {
    crate::wat::parse_string(sexpr).map_err(|e| syntax_err(e.message, e.span))
}
