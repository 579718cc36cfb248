//! Discrete user actions understood by the engine.

use super::evaluation::Operator;

/// Memory register operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MemoryOp {
    /// `MS`: store the displayed value.
    Store,
    /// `MC`: forget the stored value.
    Clear,
    /// `MR`: recall the stored value into the entry.
    Recall,
    /// `M+`: add the displayed value to memory.
    Add,
    /// `M-`: subtract the displayed value from memory.
    Subtract,
}

impl MemoryOp {
    /// Keypad label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Store => "MS",
            Self::Clear => "MC",
            Self::Recall => "MR",
            Self::Add => "M+",
            Self::Subtract => "M-",
        }
    }
}

/// One key press forwarded by a front end.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    /// A digit `0`-`9` or the decimal point.
    Digit(char),
    Operator(Operator),
    Equals,
    Square,
    Reciprocal,
    Backspace,
    ClearEntry,
    ClearAll,
    ToggleSign,
    Memory(MemoryOp),
}
