//! A keypad calculator: digit entry, left-to-right binary arithmetic, square
//! and reciprocal, a memory register and a history log.
//!
//! [`calculator::Engine`] is the whole state machine and needs no front end.
//! The [`ui`] module is a small line-oriented front end, and [`session`]
//! saves and resumes the engine between runs.

pub mod calculator;
pub mod config;
mod error;
pub mod items;
pub mod session;
pub mod ui;

pub use error::{Error, Result};
