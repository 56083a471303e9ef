//! Adapter operation implementations
//!
//! `arg.get` is handled directly by the executor; everything else is a
//! conversion between a native word and an interface integer.

pub mod conversion;

// Re-export commonly used types for operation implementations
pub(crate) use crate::runtime::stack::Stack;
pub(crate) use crate::runtime::{RuntimeError, Trap, Value};
