//! Integer conversions between native words and interface types
//!
//! Every conversion is built from two bit-level steps:
//! - truncation, which keeps the low bits of the source when the destination is
//!   not wider
//! - extension, which sign- or zero-extends when the destination is wider, using
//!   the signedness of the interface side of the conversion
//!
//! A checked conversion applies the wrapping conversion, converts the result back
//! with the inverse wrapping conversion, and traps with `overflow` if that does
//! not reproduce the original value. This single round-trip rule covers every
//! checked form, including the extreme values and all-ones patterns.

use super::*;
use crate::adapter::{Conversion, Mode};

/// Sign- or zero-extend the low `width` bits of `bits` to 64 bits.
fn extend(bits: u64, width: u32, signed: bool) -> u64 {
    if width >= 64 {
        return bits;
    }
    let shift = 64 - width;
    if signed {
        (((bits << shift) as i64) >> shift) as u64
    } else {
        (bits << shift) >> shift
    }
}

/// Apply the wrapping form of `conversion`. Never fails.
///
/// The caller guarantees `value` carries the conversion's source type.
pub fn wrap(conversion: Conversion, value: Value) -> Value {
    let from = conversion.from_type();
    let to = conversion.to_type();
    let bits = if to.bit_width() > from.bit_width() {
        extend(value.bits(), from.bit_width(), conversion.interface_type().is_signed())
    } else {
        value.bits()
    };
    Value::from_bits(to, bits)
}

/// Apply `conversion` to a single value.
///
/// Pure: the result depends only on the value and the conversion.
///
/// # Errors
/// - `TypeMismatch` if `value` is not of the conversion's source type
/// - `Trap(overflow)` if a checked conversion cannot represent the value
pub fn apply(conversion: Conversion, value: Value) -> Result<Value, RuntimeError> {
    let expected = conversion.from_type();
    if value.typ() != expected {
        return Err(RuntimeError::TypeMismatch {
            expected,
            actual: value.typ(),
        });
    }

    let converted = wrap(conversion, value);
    if conversion.mode() == Mode::Checked && wrap(conversion.inverse(), converted) != value {
        return Err(Trap::overflow().into());
    }
    Ok(converted)
}

/// Pop one operand, convert it, push the result.
pub fn convert(stack: &mut Stack, conversion: Conversion) -> Result<(), RuntimeError> {
    let value = stack.pop_typed(conversion.from_type())?;
    stack.push(apply(conversion, value)?);
    Ok(())
}
