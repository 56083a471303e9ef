//! Traps raised while executing an adapter

use std::fmt;

/// Machine-readable reason for a trap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrapCode {
    /// A checked conversion could not represent its input.
    Overflow,
}

impl TrapCode {
    pub fn reason(self) -> &'static str {
        match self {
            TrapCode::Overflow => "overflow",
        }
    }
}

/// An abort of the in-flight adapter call.
///
/// Displays as the bare reason string, so a call boundary can hand it out
/// unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct Trap {
    code: TrapCode,
}

impl Trap {
    pub fn new(code: TrapCode) -> Self {
        Trap { code }
    }

    pub fn overflow() -> Self {
        Trap::new(TrapCode::Overflow)
    }

    pub fn code(&self) -> TrapCode {
        self.code
    }

    pub fn reason(&self) -> &'static str {
        self.code.reason()
    }
}

impl fmt::Display for Trap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.reason())
    }
}

impl std::error::Error for Trap {}
