//! Load-time validation of adapter bodies
//!
//! Runs the instruction list over a stack of types instead of values. Every
//! defect the executor could otherwise hit at call time (bad `arg.get` index,
//! operand of the wrong type, results that do not match the signature) is
//! reported here, once, when the adapter is constructed.

use super::instruction::Instruction;
use super::types::ValType;
use super::Config;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("argument index out of range: arg.get {index} with {params} parameters")]
    ArgumentOutOfRange { index: u32, params: usize },

    #[error("type mismatch at instruction {position} ({instruction}): expected {expected}, found {actual}")]
    TypeMismatch {
        position: usize,
        instruction: String,
        expected: ValType,
        actual: ValType,
    },

    #[error("stack underflow at instruction {position} ({instruction})")]
    StackUnderflow { position: usize, instruction: String },

    #[error("result mismatch: expected [{expected}], found [{actual}]")]
    ResultMismatch { expected: String, actual: String },

    #[error("stack depth {depth} exceeds limit {limit}")]
    StackTooDeep { depth: usize, limit: usize },

    #[error("duplicate export: {0}")]
    DuplicateExport(String),
}

/// Validate a body against its signature and return the maximum operand
/// stack depth it reaches.
pub fn validate_body(
    params: &[ValType],
    results: &[ValType],
    body: &[Instruction],
    config: &Config,
) -> Result<usize, ValidationError> {
    let mut stack: Vec<ValType> = Vec::with_capacity(body.len());
    let mut max_depth = 0;

    for (position, inst) in body.iter().enumerate() {
        match inst {
            Instruction::ArgGet(index) => {
                let ty = params
                    .get(*index as usize)
                    .ok_or(ValidationError::ArgumentOutOfRange {
                        index: *index,
                        params: params.len(),
                    })?;
                stack.push(*ty);
            }
            Instruction::Convert(conversion) => {
                let actual = stack.pop().ok_or_else(|| ValidationError::StackUnderflow {
                    position,
                    instruction: inst.mnemonic(),
                })?;
                let expected = conversion.from_type();
                if actual != expected {
                    return Err(ValidationError::TypeMismatch {
                        position,
                        instruction: inst.mnemonic(),
                        expected,
                        actual,
                    });
                }
                stack.push(conversion.to_type());
            }
        }
        max_depth = max_depth.max(stack.len());
        if max_depth > config.max_stack_depth {
            return Err(ValidationError::StackTooDeep {
                depth: max_depth,
                limit: config.max_stack_depth,
            });
        }
    }

    if stack != results {
        return Err(ValidationError::ResultMismatch {
            expected: join_types(results),
            actual: join_types(&stack),
        });
    }

    Ok(max_depth)
}

fn join_types(types: &[ValType]) -> String {
    types.iter().map(|t| t.name()).collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::instruction::Conversion;
    use crate::adapter::types::{InterfaceType, NativeType};

    fn conv(mnemonic: &str) -> Instruction {
        Instruction::Convert(Conversion::from_mnemonic(mnemonic).unwrap())
    }

    const I32: ValType = ValType::Native(NativeType::I32);
    const I64: ValType = ValType::Native(NativeType::I64);
    const S8: ValType = ValType::Interface(InterfaceType::S8);
    const U16: ValType = ValType::Interface(InterfaceType::U16);

    #[test]
    fn test_valid_body_depth() {
        let body = [Instruction::ArgGet(0), conv("i32-to-s8"), Instruction::ArgGet(1), conv("i64-to-u16")];
        let depth = validate_body(&[I32, I64], &[S8, U16], &body, &Config::default()).unwrap();
        assert_eq!(depth, 2);
    }

    #[test]
    fn test_empty_body() {
        assert_eq!(validate_body(&[], &[], &[], &Config::default()), Ok(0));
    }

    #[test]
    fn test_arg_out_of_range() {
        let err = validate_body(&[I32], &[I32], &[Instruction::ArgGet(1)], &Config::default()).unwrap_err();
        assert_eq!(err, ValidationError::ArgumentOutOfRange { index: 1, params: 1 });
    }

    #[test]
    fn test_type_mismatch() {
        let body = [Instruction::ArgGet(0), conv("i32-to-s8")];
        let err = validate_body(&[I64], &[S8], &body, &Config::default()).unwrap_err();
        assert!(matches!(err, ValidationError::TypeMismatch { position: 1, expected, actual, .. } if expected == I32 && actual == I64));
    }

    #[test]
    fn test_underflow() {
        let err = validate_body(&[], &[S8], &[conv("i32-to-s8")], &Config::default()).unwrap_err();
        assert!(matches!(err, ValidationError::StackUnderflow { position: 0, .. }));
    }

    #[test]
    fn test_result_mismatch() {
        let body = [Instruction::ArgGet(0), conv("i32-to-s8")];
        let err = validate_body(&[I32], &[U16], &body, &Config::default()).unwrap_err();
        assert_eq!(err.to_string(), "result mismatch: expected [u16], found [s8]");

        // leftover values are a mismatch too
        let body = [Instruction::ArgGet(0), Instruction::ArgGet(0)];
        assert!(validate_body(&[I32], &[I32], &body, &Config::default()).is_err());
    }

    #[test]
    fn test_depth_limit() {
        let config = Config::default().max_stack_depth(2);
        let body = [Instruction::ArgGet(0), Instruction::ArgGet(0), Instruction::ArgGet(0)];
        let err = validate_body(&[I32], &[I32, I32, I32], &body, &config).unwrap_err();
        assert_eq!(err, ValidationError::StackTooDeep { depth: 3, limit: 2 });
    }
}
