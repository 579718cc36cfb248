//! Keypad calculator core.
//!
//! This module provides:
//! - The [`Engine`] state machine driven by discrete key presses
//! - Arithmetic with non-fatal division-by-zero notices
//! - Number formatting for display and history
//! - Tokenizing typed key input into [`Action`]s
//! - Copying results to the clipboard

mod action;
mod clipboard;
mod engine;
mod evaluation;
mod keys;
mod snapshot;

pub use action::{Action, MemoryOp};
pub use clipboard::{ClipboardHandle, copy_and_wait};
pub use engine::Engine;
pub use evaluation::{Evaluated, Notice, Operator, apply, format_number, parse_number, reciprocal};
pub use keys::parse_keys;
pub use snapshot::Snapshot;
