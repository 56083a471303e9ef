//! Value types of the adapter calling convention
//!
//! Two native word types are what the core engine manipulates. Eight interface
//! integer types are what an adapter exposes at its boundary. Both sets share the
//! [`ValType`] namespace so that adapter signatures and operand stack slots can
//! carry either.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A native word of the core engine: a bit pattern with no inherent signedness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NativeType {
    I32,
    I64,
}

/// An interface integer type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterfaceType {
    S8,
    U8,
    S16,
    U16,
    S32,
    U32,
    S64,
    U64,
}

/// Any type a value on the adapter operand stack can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ValType {
    Native(NativeType),
    Interface(InterfaceType),
}

impl NativeType {
    pub const ALL: [NativeType; 2] = [NativeType::I32, NativeType::I64];

    pub fn bit_width(self) -> u32 {
        match self {
            NativeType::I32 => 32,
            NativeType::I64 => 64,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            NativeType::I32 => "i32",
            NativeType::I64 => "i64",
        }
    }
}

impl InterfaceType {
    pub const ALL: [InterfaceType; 8] = [
        InterfaceType::S8,
        InterfaceType::U8,
        InterfaceType::S16,
        InterfaceType::U16,
        InterfaceType::S32,
        InterfaceType::U32,
        InterfaceType::S64,
        InterfaceType::U64,
    ];

    pub fn bit_width(self) -> u32 {
        match self {
            InterfaceType::S8 | InterfaceType::U8 => 8,
            InterfaceType::S16 | InterfaceType::U16 => 16,
            InterfaceType::S32 | InterfaceType::U32 => 32,
            InterfaceType::S64 | InterfaceType::U64 => 64,
        }
    }

    pub fn is_signed(self) -> bool {
        matches!(
            self,
            InterfaceType::S8 | InterfaceType::S16 | InterfaceType::S32 | InterfaceType::S64
        )
    }

    pub fn name(self) -> &'static str {
        match self {
            InterfaceType::S8 => "s8",
            InterfaceType::U8 => "u8",
            InterfaceType::S16 => "s16",
            InterfaceType::U16 => "u16",
            InterfaceType::S32 => "s32",
            InterfaceType::U32 => "u32",
            InterfaceType::S64 => "s64",
            InterfaceType::U64 => "u64",
        }
    }

    /// Smallest value representable in this type, as a sign-extended i128.
    pub fn min_value(self) -> i128 {
        if self.is_signed() {
            -(1i128 << (self.bit_width() - 1))
        } else {
            0
        }
    }

    /// Largest value representable in this type.
    pub fn max_value(self) -> i128 {
        if self.is_signed() {
            (1i128 << (self.bit_width() - 1)) - 1
        } else {
            (1i128 << self.bit_width()) - 1
        }
    }
}

impl ValType {
    pub fn bit_width(self) -> u32 {
        match self {
            ValType::Native(t) => t.bit_width(),
            ValType::Interface(t) => t.bit_width(),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ValType::Native(t) => t.name(),
            ValType::Interface(t) => t.name(),
        }
    }
}

impl From<NativeType> for ValType {
    fn from(t: NativeType) -> Self {
        ValType::Native(t)
    }
}

impl From<InterfaceType> for ValType {
    fn from(t: InterfaceType) -> Self {
        ValType::Interface(t)
    }
}

impl FromStr for NativeType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NativeType::ALL.into_iter().find(|t| t.name() == s).ok_or(())
    }
}

impl FromStr for InterfaceType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        InterfaceType::ALL.into_iter().find(|t| t.name() == s).ok_or(())
    }
}

impl FromStr for ValType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<NativeType>()
            .map(ValType::Native)
            .or_else(|_| s.parse::<InterfaceType>().map(ValType::Interface))
    }
}

impl fmt::Display for NativeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for InterfaceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for ValType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
