//! Adapter instruction executor

use super::{ops, stack::Stack, RuntimeError, Value};
use crate::adapter::{AdapterFunction, Instruction};

/// Executes one call of an adapter function.
///
/// An executor owns the per-call state (bound arguments and operand stack) and
/// is consumed by [`Executor::execute`], so no state survives between calls.
pub struct Executor<'a> {
    func: &'a AdapterFunction,
    stack: Stack,
    args: Vec<Value>,
}

impl<'a> Executor<'a> {
    /// Bind `args` to the parameters of `func`.
    ///
    /// # Errors
    /// - `ArityMismatch` if the argument count differs from the parameter count
    /// - `ArgumentTypeMismatch` if any argument has the wrong type
    pub fn new(func: &'a AdapterFunction, args: Vec<Value>) -> Result<Self, RuntimeError> {
        let params = func.params();
        if args.len() != params.len() {
            return Err(RuntimeError::ArityMismatch {
                expected: params.len(),
                actual: args.len(),
            });
        }
        for (index, (arg, expected)) in args.iter().zip(params).enumerate() {
            if arg.typ() != *expected {
                return Err(RuntimeError::ArgumentTypeMismatch {
                    index,
                    expected: *expected,
                    actual: arg.typ(),
                });
            }
        }

        Ok(Executor {
            func,
            stack: Stack::with_capacity(func.max_stack_depth()),
            args,
        })
    }

    /// Run the adapter body and return its results, bottom of stack first.
    ///
    /// A trap stops execution at the failing instruction; the stack is dropped.
    pub fn execute(mut self) -> Result<Vec<Value>, RuntimeError> {
        for instruction in self.func.body() {
            log::trace!("{}: {instruction} (depth {})", self.name(), self.stack.depth());
            if let Err(e) = self.execute_instruction(instruction) {
                if let Some(trap) = e.as_trap() {
                    log::debug!("{}: trap '{trap}' at {instruction}", self.name());
                }
                return Err(e);
            }
        }

        let results = self.stack.drain();
        let expected = self.func.results();
        if results.len() != expected.len() {
            return Err(RuntimeError::ResultMismatch {
                expected: expected.len(),
                actual: results.len(),
            });
        }
        for (value, ty) in results.iter().zip(expected) {
            if value.typ() != *ty {
                return Err(RuntimeError::TypeMismatch {
                    expected: *ty,
                    actual: value.typ(),
                });
            }
        }
        Ok(results)
    }

    /// Execute a single instruction
    fn execute_instruction(&mut self, instruction: &Instruction) -> Result<(), RuntimeError> {
        match instruction {
            Instruction::ArgGet(idx) => {
                let value = self
                    .args
                    .get(*idx as usize)
                    .copied()
                    .ok_or(RuntimeError::ArgumentIndexOutOfBounds(*idx))?;
                self.stack.push(value);
                Ok(())
            }
            Instruction::Convert(conversion) => ops::conversion::convert(&mut self.stack, *conversion),
        }
    }

    fn name(&self) -> &str {
        self.func.name().unwrap_or("<anonymous>")
    }
}

/// Invoke an adapter with `args`: bind, execute, collect results.
pub fn invoke(func: &AdapterFunction, args: Vec<Value>) -> Result<Vec<Value>, RuntimeError> {
    Executor::new(func, args)?.execute()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::{InterfaceType, NativeType, ValType};
    use crate::runtime::test_utils::test::{conv, AdapterTest};
    use crate::runtime::Trap;

    const I32: ValType = ValType::Native(NativeType::I32);
    const I64: ValType = ValType::Native(NativeType::I64);
    const S8: ValType = ValType::Interface(InterfaceType::S8);
    const U16: ValType = ValType::Interface(InterfaceType::U16);
    const S32: ValType = ValType::Interface(InterfaceType::S32);

    #[test]
    fn test_end_to_end_u16() {
        AdapterTest::new()
            .param(I32)
            .inst(Instruction::ArgGet(0))
            .inst(conv("i32-to-u16"))
            .returns(vec![U16])
            .arg(Value::I32(0xFFFF_FFFFu32 as i32))
            .expect_results(vec![Value::U16(0xFFFF)]);

        AdapterTest::new()
            .param(I32)
            .inst(Instruction::ArgGet(0))
            .inst(conv("i32-to-u16"))
            .returns(vec![U16])
            .arg(Value::I32(0x0001_0001))
            .expect_results(vec![Value::U16(0x0001)]);
    }

    #[test]
    fn test_multiple_results_in_order() {
        AdapterTest::new()
            .param(I32)
            .param(I64)
            .inst(Instruction::ArgGet(1))
            .inst(conv("i64-to-s32"))
            .inst(Instruction::ArgGet(0))
            .inst(conv("i32-to-s8"))
            .returns(vec![S32, S8])
            .args(vec![Value::I32(0x17F), Value::I64(-5)])
            .expect_results(vec![Value::S32(-5), Value::S8(127)]);
    }

    #[test]
    fn test_chained_conversions() {
        // lift then lower back: s8 round trip of an in-range value
        AdapterTest::new()
            .param(I32)
            .inst(Instruction::ArgGet(0))
            .inst(conv("i32-to-s8x"))
            .inst(conv("s8-to-i64"))
            .returns(vec![I64])
            .arg(Value::I32(-100))
            .expect_results(vec![Value::I64(-100)]);
    }

    #[test]
    fn test_argument_reused() {
        AdapterTest::new()
            .param(S8)
            .inst(Instruction::ArgGet(0))
            .inst(Instruction::ArgGet(0))
            .returns(vec![S8, S8])
            .arg(Value::S8(-1))
            .expect_results(vec![Value::S8(-1), Value::S8(-1)]);
    }

    #[test]
    fn test_trap_stops_execution() {
        // The second conversion would also trap; the first one wins.
        AdapterTest::new()
            .param(I32)
            .param(I64)
            .inst(Instruction::ArgGet(0))
            .inst(conv("i32-to-s16x"))
            .inst(Instruction::ArgGet(1))
            .inst(conv("i64-to-s8x"))
            .returns(vec![ValType::Interface(InterfaceType::S16), S8])
            .args(vec![Value::I32(40000), Value::I64(1000)])
            .expect_error("overflow");
    }

    #[test]
    fn test_trap_value() {
        let func = AdapterTest::new()
            .param(I64)
            .inst(Instruction::ArgGet(0))
            .inst(conv("i64-to-s32x"))
            .returns(vec![S32])
            .build();
        assert_eq!(
            invoke(&func, vec![Value::I64(2147483648)]),
            Err(RuntimeError::Trap(Trap::overflow()))
        );
        assert_eq!(invoke(&func, vec![Value::I64(-2147483648)]), Ok(vec![Value::S32(i32::MIN)]));
    }

    #[test]
    fn test_arity_mismatch() {
        let func = AdapterTest::new()
            .param(I32)
            .inst(Instruction::ArgGet(0))
            .returns(vec![I32])
            .build();
        assert_eq!(
            invoke(&func, vec![]),
            Err(RuntimeError::ArityMismatch { expected: 1, actual: 0 })
        );
        assert_eq!(
            invoke(&func, vec![Value::I32(1), Value::I32(2)]),
            Err(RuntimeError::ArityMismatch { expected: 1, actual: 2 })
        );
    }

    #[test]
    fn test_argument_type_mismatch_before_any_conversion() {
        // Would trap if it ran; the type check must fire first.
        let func = AdapterTest::new()
            .param(I32)
            .param(I32)
            .inst(Instruction::ArgGet(0))
            .inst(conv("i32-to-s8x"))
            .returns(vec![S8])
            .build();
        assert_eq!(
            invoke(&func, vec![Value::I32(1000), Value::S32(0)]),
            Err(RuntimeError::ArgumentTypeMismatch {
                index: 1,
                expected: I32,
                actual: S32,
            })
        );
    }

    #[test]
    fn test_empty_adapter() {
        AdapterTest::new().expect_results(vec![]);
    }

    #[test]
    fn test_fresh_state_per_call() {
        let func = AdapterTest::new()
            .param(I32)
            .inst(Instruction::ArgGet(0))
            .inst(conv("i32-to-s8x"))
            .returns(vec![S8])
            .build();
        assert!(invoke(&func, vec![Value::I32(500)]).is_err());
        assert_eq!(invoke(&func, vec![Value::I32(5)]), Ok(vec![Value::S8(5)]));
        assert_eq!(invoke(&func, vec![Value::I32(6)]), Ok(vec![Value::S8(6)]));
    }
}
