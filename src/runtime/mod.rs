//! Adapter runtime
//!
//! This module provides the execution side of the adapter calling convention:
//! value representation, the conversion table, the operand stack machine and
//! the instance through which a host calls adapter exports.

pub mod dummy;
pub mod executor;
pub mod instance;
pub mod ops;
pub mod stack;
pub mod test_utils;
pub mod trap;
pub mod value;

pub use dummy::{dummy_value, dummy_values};
pub use executor::Executor;
pub use instance::Instance;
pub use trap::{Trap, TrapCode};
pub use value::Value;

use crate::adapter::ValType;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuntimeError {
    /// A checked conversion failed. Displays as the bare reason.
    #[error("{0}")]
    Trap(#[from] Trap),
    #[error("Stack underflow")]
    StackUnderflow,
    #[error("Type mismatch: expected {expected}, got {actual}")]
    TypeMismatch { expected: ValType, actual: ValType },
    #[error("Unknown export: {0}")]
    UnknownExport(String),
    #[error("Arity mismatch: expected {expected} arguments, got {actual}")]
    ArityMismatch { expected: usize, actual: usize },
    #[error("Argument type mismatch for argument {index}: expected {expected}, got {actual}")]
    ArgumentTypeMismatch {
        index: usize,
        expected: ValType,
        actual: ValType,
    },
    #[error("Argument index out of bounds: {0}")]
    ArgumentIndexOutOfBounds(u32),
    #[error("Result mismatch: expected {expected} results, got {actual}")]
    ResultMismatch { expected: usize, actual: usize },
}

impl RuntimeError {
    /// The trap carried by this error, if it is one.
    pub fn as_trap(&self) -> Option<&Trap> {
        match self {
            RuntimeError::Trap(trap) => Some(trap),
            _ => None,
        }
    }
}
