//! Interface adapters: numeric coercion between native words and interface
//! integer types.
//!
//! A host talks to a module in interface types (`s8 u8 s16 u16 s32 u32 s64
//! u64`) while the engine underneath only has `i32` and `i64`. Adapter
//! functions bridge the two with a small stack machine: `arg.get` pushes a
//! parameter and each conversion instruction lifts a native word into an
//! interface integer or lowers one back, either wrapping or checked (trapping
//! with `overflow` when the value does not round-trip).
//!
//! # Modules
//!
//! - [`adapter`] -- Types, the conversion table, adapter functions and their load-time validation.
//! - [`runtime`] -- Values, the stack-machine executor, traps and instances.
//! - [`wat`] -- Text format parser for `(@interface func ...)` adapters.
//! - [`wast`] -- Script parser and runner for end-to-end adapter tests.
//!
//! # Example
//!
//! ```
//! use iface_adapter::runtime::{Instance, Value};
//! use iface_adapter::wat;
//!
//! let module = wat::parse(r#"
//!     (module
//!       (@interface func (export "narrow") (param i32) (result s8)
//!         arg.get 0
//!         i32-to-s8x))
//! "#).unwrap();
//!
//! let instance = Instance::new(module);
//! assert_eq!(instance.invoke("narrow", vec![Value::I32(-128)]).unwrap(), vec![Value::S8(-128)]);
//!
//! let err = instance.invoke("narrow", vec![Value::I32(128)]).unwrap_err();
//! assert_eq!(err.to_string(), "overflow");
//! ```

pub mod adapter;
pub mod runtime;
pub mod wast;
pub mod wat;
