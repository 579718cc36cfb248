//! Arithmetic and number formatting for the keypad engine.
//!
//! Evaluation never fails: a zero divisor yields a documented fallback
//! value together with a [`Notice`] for the front end to surface.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Fractional digits kept when rendering a computed value.
const MAX_FRACTION_DIGITS: usize = 10;

/// A binary operator on the keypad.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = "+")]
    Add,
    #[serde(rename = "-")]
    Subtract,
    #[serde(rename = "×")]
    Multiply,
    #[serde(rename = "÷")]
    Divide,
}

impl Operator {
    /// The symbol shown on the operation line and in history records.
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "×",
            Self::Divide => "÷",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Operator {
    type Err = ();

    /// Accepts the display symbols as well as their ASCII stand-ins.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "+" => Ok(Self::Add),
            "-" => Ok(Self::Subtract),
            "×" | "*" | "x" | "X" => Ok(Self::Multiply),
            "÷" | "/" => Ok(Self::Divide),
            _ => Err(()),
        }
    }
}

/// A non-fatal condition raised while evaluating.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Notice {
    /// A division or reciprocal hit a zero divisor; the fallback value was used.
    DivisionByZero,
}

impl Notice {
    /// Short message for the user.
    pub fn message(self) -> &'static str {
        match self {
            Self::DivisionByZero => "Division by zero",
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Value produced by an evaluation, plus any notice raised along the way.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Evaluated {
    pub value: f64,
    pub notice: Option<Notice>,
}

impl Evaluated {
    fn exact(value: f64) -> Self {
        Self {
            value,
            notice: None,
        }
    }

    fn fallback(value: f64, notice: Notice) -> Self {
        Self {
            value,
            notice: Some(notice),
        }
    }
}

/// Apply a binary operator.
///
/// Dividing by zero leaves `a` unchanged and raises [`Notice::DivisionByZero`].
/// With no operator the right-hand value passes through unchanged, which is
/// what lets a shown result become the new left operand.
pub fn apply(a: f64, b: f64, op: Option<Operator>) -> Evaluated {
    match op {
        Some(Operator::Add) => Evaluated::exact(a + b),
        Some(Operator::Subtract) => Evaluated::exact(a - b),
        Some(Operator::Multiply) => Evaluated::exact(a * b),
        Some(Operator::Divide) if b == 0.0 => Evaluated::fallback(a, Notice::DivisionByZero),
        Some(Operator::Divide) => Evaluated::exact(a / b),
        None => Evaluated::exact(b),
    }
}

/// `1/value`; zero comes back unchanged with a notice.
pub fn reciprocal(value: f64) -> Evaluated {
    if value == 0.0 {
        Evaluated::fallback(value, Notice::DivisionByZero)
    } else {
        Evaluated::exact(1.0 / value)
    }
}

/// Parse entry text as a number. Returns `None` for empty or malformed text,
/// including the bare `"."` that keypad entry allows.
pub fn parse_number(text: &str) -> Option<f64> {
    if text.is_empty() {
        return None;
    }
    text.parse::<f64>().ok()
}

/// Format a computed value for display.
///
/// Up to ten fractional digits, with trailing zeros and a dangling decimal
/// point removed. No digit grouping.
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let formatted = format!("{:.*}", MAX_FRACTION_DIGITS, value);
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');

    // Deliberately "0" rather than "-0" for -0.0 and tiny negatives
    if trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}
