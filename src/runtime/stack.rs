//! Adapter operand stack

use super::{RuntimeError, Value};
use crate::adapter::ValType;

/// The per-call operand stack
#[derive(Debug, Default)]
pub struct Stack {
    values: Vec<Value>,
}

impl Stack {
    /// Create an empty stack that can hold `depth` values without reallocating
    pub fn with_capacity(depth: usize) -> Self {
        Stack {
            values: Vec::with_capacity(depth),
        }
    }

    /// Push a value onto the stack
    pub fn push(&mut self, value: Value) {
        self.values.push(value);
    }

    /// Pop a value from the stack
    pub fn pop(&mut self) -> Result<Value, RuntimeError> {
        self.values.pop().ok_or(RuntimeError::StackUnderflow)
    }

    /// Pop a value and check its type
    pub fn pop_typed(&mut self, expected: ValType) -> Result<Value, RuntimeError> {
        let value = self.pop()?;
        if value.typ() != expected {
            return Err(RuntimeError::TypeMismatch {
                expected,
                actual: value.typ(),
            });
        }
        Ok(value)
    }

    /// Get the current stack depth
    pub fn depth(&self) -> usize {
        self.values.len()
    }

    /// Take all values, bottom first (used for returning results)
    pub fn drain(&mut self) -> Vec<Value> {
        self.values.drain(..).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::{InterfaceType, NativeType};

    #[test]
    fn test_push_pop() {
        let mut stack = Stack::default();

        stack.push(Value::I32(42));
        stack.push(Value::U8(7));

        assert_eq!(stack.depth(), 2);
        assert_eq!(stack.pop().unwrap(), Value::U8(7));
        assert_eq!(stack.pop().unwrap(), Value::I32(42));
        assert_eq!(stack.pop(), Err(RuntimeError::StackUnderflow));
    }

    #[test]
    fn test_pop_typed() {
        let mut stack = Stack::default();
        stack.push(Value::I32(42));

        // Correct type
        assert_eq!(stack.pop_typed(ValType::Native(NativeType::I32)).unwrap(), Value::I32(42));

        // Wrong type: S32 and I32 share a width but not a tag
        stack.push(Value::I32(42));
        assert_eq!(
            stack.pop_typed(ValType::Interface(InterfaceType::S32)),
            Err(RuntimeError::TypeMismatch {
                expected: ValType::Interface(InterfaceType::S32),
                actual: ValType::Native(NativeType::I32),
            })
        );
    }

    #[test]
    fn test_drain() {
        let mut stack = Stack::default();
        stack.push(Value::I32(1));
        stack.push(Value::U16(2));
        stack.push(Value::S8(3));

        let values = stack.drain();
        assert_eq!(values, vec![Value::I32(1), Value::U16(2), Value::S8(3)]);
        assert_eq!(stack.depth(), 0);
    }
}
