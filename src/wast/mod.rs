//! Adapter script (.wast) parser and runner.
//!
//! Scripts drive adapters end to end: define a module, invoke its exports
//! with typed constants, and assert on results, traps and load failures.
//!
//! The parser builds on the text-format lexer and S-expression reader. It
//! does NOT parse module bodies; they are kept as source text so the runner
//! can decide whether loading must succeed or fail.
//!
//! ```
//! use iface_adapter::wast::run_script;
//!
//! let report = run_script(r#"
//!     (module (@interface func (export "f") (param i64) (result s32) arg.get 0 i64-to-s32x))
//!     (assert_return (invoke "f" (i64.const -2147483648)) (s32.const -2147483648))
//!     (assert_trap (invoke "f" (i64.const 2147483648)) "overflow")
//! "#).unwrap();
//! assert!(report.passed());
//! assert_eq!(report.assertions(), 2);
//! ```

pub mod command;
mod parser;
mod runner;
pub mod values;

pub use command::*;
pub use parser::{parse_script, WastParseError, WastSyntaxError};
pub use runner::{run_script, run_script_with_config, ScriptReport};
pub use values::{match_results, parse_const};
