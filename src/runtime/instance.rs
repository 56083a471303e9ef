//! Adapter module instance

use super::{executor, RuntimeError, Value};
use crate::adapter::{AdapterFunction, AdapterModule};
use std::sync::Arc;

/// An instantiated adapter module.
///
/// Instances hold no mutable state; cloning one is cheap and every clone may be
/// invoked from any thread.
#[derive(Debug, Clone)]
pub struct Instance {
    module: Arc<AdapterModule>,
}

impl Instance {
    /// Create a new instance from a loaded module
    pub fn new(module: AdapterModule) -> Self {
        Instance {
            module: Arc::new(module),
        }
    }

    /// Look up an exported adapter
    pub fn get_export(&self, name: &str) -> Option<&AdapterFunction> {
        self.module.export(name).map(|func| func.as_ref())
    }

    /// Invoke an exported adapter by name
    pub fn invoke(&self, name: &str, args: Vec<Value>) -> Result<Vec<Value>, RuntimeError> {
        let func = self
            .get_export(name)
            .ok_or_else(|| RuntimeError::UnknownExport(name.to_string()))?;
        log::debug!("invoke {name} with {} argument(s)", args.len());
        executor::invoke(func, args)
    }

    /// Get the underlying module
    pub fn module(&self) -> &AdapterModule {
        &self.module
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::{Instruction, InterfaceType, NativeType, ValType};
    use crate::runtime::test_utils::test::conv;
    use crate::runtime::Trap;

    fn instance() -> Instance {
        let mut module = AdapterModule::new(None);
        module
            .add(
                AdapterFunction::new(
                    Some("to_s8".to_string()),
                    vec![ValType::Native(NativeType::I32)],
                    vec![ValType::Interface(InterfaceType::S8)],
                    vec![Instruction::ArgGet(0), conv("i32-to-s8x")],
                )
                .unwrap(),
            )
            .unwrap();
        module
            .add(
                AdapterFunction::new(
                    Some("from_u64".to_string()),
                    vec![ValType::Interface(InterfaceType::U64)],
                    vec![ValType::Native(NativeType::I64)],
                    vec![Instruction::ArgGet(0), conv("u64-to-i64")],
                )
                .unwrap(),
            )
            .unwrap();
        Instance::new(module)
    }

    #[test]
    fn test_invoke_export() {
        let instance = instance();
        assert_eq!(instance.invoke("to_s8", vec![Value::I32(-128)]), Ok(vec![Value::S8(-128)]));
        assert_eq!(
            instance.invoke("to_s8", vec![Value::I32(128)]),
            Err(RuntimeError::Trap(Trap::overflow()))
        );
        assert_eq!(instance.invoke("from_u64", vec![Value::U64(u64::MAX)]), Ok(vec![Value::I64(-1)]));
    }

    #[test]
    fn test_unknown_export() {
        let instance = instance();
        assert!(instance.get_export("nope").is_none());
        assert_eq!(
            instance.invoke("nope", vec![]),
            Err(RuntimeError::UnknownExport("nope".to_string()))
        );
    }

    #[test]
    fn test_get_export_signature() {
        let instance = instance();
        let func = instance.get_export("from_u64").unwrap();
        assert_eq!(func.params(), &[ValType::Interface(InterfaceType::U64)]);
        assert_eq!(func.results(), &[ValType::Native(NativeType::I64)]);
    }

    #[test]
    fn test_concurrent_invocations() {
        let instance = instance();
        std::thread::scope(|s| {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    s.spawn(|| {
                        (-128..128)
                            .map(|n| instance.invoke("to_s8", vec![Value::I32(n)]))
                            .collect::<Vec<_>>()
                    })
                })
                .collect();
            let expected: Vec<_> = (-128..128).map(|n| Ok(vec![Value::S8(n as i8)])).collect();
            for handle in handles {
                assert_eq!(handle.join().unwrap(), expected);
            }
        });
    }
}
