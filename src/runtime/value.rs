//! Adapter value representation

use crate::adapter::{InterfaceType, NativeType, ValType};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Runtime representation of adapter values.
///
/// Each variant stores a primitive of exactly its type's width, so no bits can
/// leak above the declared width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Value {
    I32(i32),
    I64(i64),
    S8(i8),
    U8(u8),
    S16(i16),
    U16(u16),
    S32(i32),
    U32(u32),
    S64(i64),
    U64(u64),
}

impl Value {
    /// Get the type of this value
    pub fn typ(&self) -> ValType {
        match self {
            Value::I32(_) => ValType::Native(NativeType::I32),
            Value::I64(_) => ValType::Native(NativeType::I64),
            Value::S8(_) => ValType::Interface(InterfaceType::S8),
            Value::U8(_) => ValType::Interface(InterfaceType::U8),
            Value::S16(_) => ValType::Interface(InterfaceType::S16),
            Value::U16(_) => ValType::Interface(InterfaceType::U16),
            Value::S32(_) => ValType::Interface(InterfaceType::S32),
            Value::U32(_) => ValType::Interface(InterfaceType::U32),
            Value::S64(_) => ValType::Interface(InterfaceType::S64),
            Value::U64(_) => ValType::Interface(InterfaceType::U64),
        }
    }

    /// The raw bit pattern, zero-extended to 64 bits.
    pub fn bits(&self) -> u64 {
        match *self {
            Value::I32(v) | Value::S32(v) => v as u32 as u64,
            Value::I64(v) | Value::S64(v) => v as u64,
            Value::S8(v) => v as u8 as u64,
            Value::U8(v) => v as u64,
            Value::S16(v) => v as u16 as u64,
            Value::U16(v) => v as u64,
            Value::U32(v) => v as u64,
            Value::U64(v) => v,
        }
    }

    /// Build a value of type `typ` from the low bits of `bits`.
    ///
    /// Bits above the type's width are discarded.
    pub fn from_bits(typ: ValType, bits: u64) -> Value {
        match typ {
            ValType::Native(NativeType::I32) => Value::I32(bits as u32 as i32),
            ValType::Native(NativeType::I64) => Value::I64(bits as i64),
            ValType::Interface(InterfaceType::S8) => Value::S8(bits as u8 as i8),
            ValType::Interface(InterfaceType::U8) => Value::U8(bits as u8),
            ValType::Interface(InterfaceType::S16) => Value::S16(bits as u16 as i16),
            ValType::Interface(InterfaceType::U16) => Value::U16(bits as u16),
            ValType::Interface(InterfaceType::S32) => Value::S32(bits as u32 as i32),
            ValType::Interface(InterfaceType::U32) => Value::U32(bits as u32),
            ValType::Interface(InterfaceType::S64) => Value::S64(bits as i64),
            ValType::Interface(InterfaceType::U64) => Value::U64(bits),
        }
    }

    /// The zero value of a type.
    pub fn zero(typ: ValType) -> Value {
        Value::from_bits(typ, 0)
    }

    /// The numeric value as the type interprets it. Native words read as signed.
    pub fn to_i128(&self) -> i128 {
        match *self {
            Value::I32(v) | Value::S32(v) => v as i128,
            Value::I64(v) | Value::S64(v) => v as i128,
            Value::S8(v) => v as i128,
            Value::U8(v) => v as i128,
            Value::S16(v) => v as i128,
            Value::U16(v) => v as i128,
            Value::U32(v) => v as i128,
            Value::U64(v) => v as i128,
        }
    }

    /// Create from a type string and value string.
    ///
    /// The value may be decimal or `0x` hex, with an optional sign and `_`
    /// separators. It is accepted if it fits either the signed or the unsigned
    /// interpretation of the type's width, and stored as that bit pattern.
    pub fn from_strings(typ: &str, value: &str) -> Result<Self, String> {
        let ty = typ
            .parse::<ValType>()
            .map_err(|_| format!("Unknown value type: {typ}"))?;
        let n = parse_integer(value).ok_or_else(|| format!("Failed to parse {typ}: {value}"))?;
        Value::from_integer(ty, n).ok_or_else(|| format!("Constant out of range for {typ}: {value}"))
    }

    /// Build a value from an integer that fits the signed or unsigned range of
    /// the type's width.
    pub fn from_integer(typ: ValType, n: i128) -> Option<Self> {
        let width = typ.bit_width();
        let min = -(1i128 << (width - 1));
        let max = (1i128 << width) - 1;
        (min..=max).contains(&n).then(|| Value::from_bits(typ, n as u64))
    }
}

/// Parse a signed decimal or hex integer literal.
fn parse_integer(text: &str) -> Option<i128> {
    let (negative, rest) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    if rest.is_empty() || rest.starts_with('_') || rest.ends_with('_') || rest.contains("__") {
        return None;
    }
    let clean: String = rest.chars().filter(|&c| c != '_').collect();
    let magnitude = match clean.strip_prefix("0x").or_else(|| clean.strip_prefix("0X")) {
        Some(hex) if !hex.is_empty() => u64::from_str_radix(hex, 16).ok()?,
        Some(_) => return None,
        None => clean.parse::<u64>().ok()?,
    };
    let magnitude = magnitude as i128;
    Some(if negative { -magnitude } else { magnitude })
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.typ(), self.to_i128())
    }
}
