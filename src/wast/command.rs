//! AST types for adapter script (.wast) files.
//!
//! A script is a sequence of commands that define modules, invoke their
//! exported adapters and assert on the outcome (results, traps, or a module
//! that must fail to load).

use crate::runtime::Value;
use crate::wat::Span;

/// A parsed script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WastScript {
    pub commands: Vec<WastCommand>,
}

/// A top-level command.
///
/// Module bodies are kept as source text; the runner parses them, because
/// `assert_invalid` and `assert_malformed` expect that parse to fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WastCommand {
    /// Define a module; it becomes the target of the following actions.
    Module {
        span: Span,
        name: Option<String>,
        source: String,
    },

    /// Top-level action (invoke without assertion).
    Action { span: Span, action: WastAction },

    /// Assert that an action returns exactly these values.
    AssertReturn {
        span: Span,
        action: WastAction,
        expected: Vec<Value>,
    },

    /// Assert that an action traps with the given reason.
    AssertTrap {
        span: Span,
        action: WastAction,
        message: String,
    },

    /// Assert that a module is rejected by validation.
    AssertInvalid {
        span: Span,
        source: String,
        message: String,
    },

    /// Assert that a module is rejected as syntactically malformed.
    AssertMalformed {
        span: Span,
        source: String,
        message: String,
    },
}

impl WastCommand {
    pub fn span(&self) -> Span {
        match self {
            WastCommand::Module { span, .. }
            | WastCommand::Action { span, .. }
            | WastCommand::AssertReturn { span, .. }
            | WastCommand::AssertTrap { span, .. }
            | WastCommand::AssertInvalid { span, .. }
            | WastCommand::AssertMalformed { span, .. } => *span,
        }
    }

    /// Source line the command starts on.
    pub fn line(&self) -> u32 {
        self.span().line
    }
}

/// An action: `(invoke "name" const*)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WastAction {
    Invoke { name: String, args: Vec<Value> },
}

impl WastAction {
    pub fn name(&self) -> &str {
        match self {
            WastAction::Invoke { name, .. } => name,
        }
    }
}
