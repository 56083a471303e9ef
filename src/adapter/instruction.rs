//! Adapter instruction set
//!
//! An adapter body is a flat list of [`Instruction`]s. Besides `arg.get`, every
//! instruction is a [`Conversion`] between a native word and an interface integer.
//! The set of legal conversions is closed: one wrapping conversion per
//! (native, interface) pair in each direction, plus a fixed handful of checked
//! narrowings. Mnemonics follow the `<from>-to-<to>[x]` pattern, where the `x`
//! suffix selects the checked form.

use super::types::{InterfaceType, NativeType, ValType};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Overflow policy of a conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Truncate or extend, discarding out-of-range bits.
    Wrapping,
    /// Trap with `overflow` unless the value round-trips exactly.
    Checked,
}

/// One entry of the conversion table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Conversion {
    /// Native word to interface integer (`i32-to-s8`, `i64-to-u64`, ...).
    Lift {
        from: NativeType,
        to: InterfaceType,
        mode: Mode,
    },
    /// Interface integer to native word (`s8-to-i32`, `u64-to-i32x`, ...).
    Lower {
        from: InterfaceType,
        to: NativeType,
        mode: Mode,
    },
}

/// A single adapter instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// Push a copy of the parameter at this index.
    ArgGet(u32),
    /// Pop one value, convert it, push the result.
    Convert(Conversion),
}

/// Whether a checked variant exists for this (native, interface) lift.
///
/// Only signed interface destinations narrower than the source word have one.
/// There is no `i32-to-u8x`.
fn lift_has_checked(from: NativeType, to: InterfaceType) -> bool {
    use InterfaceType::*;
    use NativeType::*;
    match (from, to) {
        (I32, S8) | (I32, S16) => true,
        (I64, S8) | (I64, S16) | (I64, S32) => true,
        (I32, U8 | U16 | S32 | U32 | S64 | U64) => false,
        (I64, U8 | U16 | U32 | S64 | U64) => false,
    }
}

/// Whether a checked variant exists for this (interface, native) lower.
///
/// Only the two 64-to-32 narrowings have one.
fn lower_has_checked(from: InterfaceType, to: NativeType) -> bool {
    use InterfaceType::*;
    use NativeType::*;
    match (from, to) {
        (S64, I32) | (U64, I32) => true,
        (S8 | U8 | S16 | U16 | S32 | U32, I32) => false,
        (_, I64) => false,
    }
}

impl Conversion {
    /// Build a lift, returning `None` for a checked lift that does not exist.
    pub fn lift(from: NativeType, to: InterfaceType, mode: Mode) -> Option<Self> {
        (mode == Mode::Wrapping || lift_has_checked(from, to)).then_some(Conversion::Lift { from, to, mode })
    }

    /// Build a lower, returning `None` for a checked lower that does not exist.
    pub fn lower(from: InterfaceType, to: NativeType, mode: Mode) -> Option<Self> {
        (mode == Mode::Wrapping || lower_has_checked(from, to)).then_some(Conversion::Lower { from, to, mode })
    }

    /// Every legal conversion, in mnemonic table order.
    pub fn all() -> impl Iterator<Item = Conversion> {
        let lifts = NativeType::ALL.into_iter().flat_map(|from| {
            InterfaceType::ALL.into_iter().flat_map(move |to| {
                [Mode::Wrapping, Mode::Checked]
                    .into_iter()
                    .filter_map(move |mode| Conversion::lift(from, to, mode))
            })
        });
        let lowers = NativeType::ALL.into_iter().flat_map(|to| {
            InterfaceType::ALL.into_iter().flat_map(move |from| {
                [Mode::Wrapping, Mode::Checked]
                    .into_iter()
                    .filter_map(move |mode| Conversion::lower(from, to, mode))
            })
        });
        lifts.chain(lowers)
    }

    /// Type the conversion pops.
    pub fn from_type(self) -> ValType {
        match self {
            Conversion::Lift { from, .. } => ValType::Native(from),
            Conversion::Lower { from, .. } => ValType::Interface(from),
        }
    }

    /// Type the conversion pushes.
    pub fn to_type(self) -> ValType {
        match self {
            Conversion::Lift { to, .. } => ValType::Interface(to),
            Conversion::Lower { to, .. } => ValType::Native(to),
        }
    }

    pub fn mode(self) -> Mode {
        match self {
            Conversion::Lift { mode, .. } | Conversion::Lower { mode, .. } => mode,
        }
    }

    /// The interface side of the conversion, which supplies the signedness
    /// used for any extension.
    pub fn interface_type(self) -> InterfaceType {
        match self {
            Conversion::Lift { to, .. } => to,
            Conversion::Lower { from, .. } => from,
        }
    }

    /// The wrapping conversion in the opposite direction.
    ///
    /// Every conversion has one, so a checked conversion can always verify its
    /// result by converting back.
    pub fn inverse(self) -> Conversion {
        match self {
            Conversion::Lift { from, to, .. } => Conversion::Lower {
                from: to,
                to: from,
                mode: Mode::Wrapping,
            },
            Conversion::Lower { from, to, .. } => Conversion::Lift {
                from: to,
                to: from,
                mode: Mode::Wrapping,
            },
        }
    }

    /// Whether the destination is narrower than the source.
    pub fn is_narrowing(self) -> bool {
        self.to_type().bit_width() < self.from_type().bit_width()
    }

    /// The textual mnemonic, e.g. `i32-to-s8x`.
    pub fn mnemonic(self) -> String {
        let suffix = match self.mode() {
            Mode::Wrapping => "",
            Mode::Checked => "x",
        };
        format!("{}-to-{}{}", self.from_type(), self.to_type(), suffix)
    }

    /// Look up a conversion by mnemonic. Unknown mnemonics return `None`.
    pub fn from_mnemonic(mnemonic: &str) -> Option<Conversion> {
        MNEMONICS.get(mnemonic).copied()
    }
}

static MNEMONICS: Lazy<HashMap<String, Conversion>> =
    Lazy::new(|| Conversion::all().map(|c| (c.mnemonic(), c)).collect());

impl Instruction {
    pub fn mnemonic(&self) -> String {
        match self {
            Instruction::ArgGet(idx) => format!("arg.get {idx}"),
            Instruction::Convert(c) => c.mnemonic(),
        }
    }
}

impl fmt::Display for Conversion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.mnemonic())
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.mnemonic())
    }
}
