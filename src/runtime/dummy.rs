//! Placeholder values for driving adapters without real inputs

use super::Value;
use crate::adapter::ValType;

/// The zero value of `ty`.
pub fn dummy_value(ty: ValType) -> Value {
    Value::zero(ty)
}

/// One zero value per type, in order.
pub fn dummy_values(tys: &[ValType]) -> Vec<Value> {
    tys.iter().copied().map(dummy_value).collect()
}
