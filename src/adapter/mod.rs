//! Adapter definitions: types, instructions, functions and modules
//!
//! Everything in here is load-time data. Nothing is executed; see
//! [`crate::runtime`] for the stack machine that runs these definitions.

pub mod function;
pub mod instruction;
pub mod module;
pub mod types;
pub mod validate;

pub use function::{AdapterFunction, AdapterSignature};
pub use instruction::{Conversion, Instruction, Mode};
pub use module::AdapterModule;
pub use types::{InterfaceType, NativeType, ValType};
pub use validate::ValidationError;

/// Default bound on an adapter's operand stack depth.
pub const DEFAULT_MAX_STACK_DEPTH: usize = 1024;

/// Loader configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Accept `@interface` adapter definitions.
    pub interface_types: bool,
    /// Reject adapters whose static stack depth exceeds this.
    pub max_stack_depth: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            interface_types: true,
            max_stack_depth: DEFAULT_MAX_STACK_DEPTH,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn wasm_interface_types(mut self, enable: bool) -> Self {
        self.interface_types = enable;
        self
    }

    pub fn max_stack_depth(mut self, depth: usize) -> Self {
        self.max_stack_depth = depth;
        self
    }
}
