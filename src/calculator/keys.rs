//! Key input parsing for typed front ends.
//!
//! Turns a line such as `12.5 × 4 =` or `7 ms c mr` into the sequence of
//! [`Action`]s a keypad would have produced.

use super::action::{Action, MemoryOp};
use super::evaluation::Operator;
use crate::Error;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// One key token at the start of the input. Longer names come first so
    /// `ce` wins over `c` and `1/x` over the digit `1`.
    static ref KEY_TOKEN: Regex = Regex::new(
        r"(?i)^(?:1/x|sqr|neg|ce|ac|bs|m[scr+\-]|[0-9.]|[+\-*/x×÷=c<±])"
    ).unwrap();
}

/// Parse a line of key presses. Whitespace between keys is ignored.
///
/// Fails on the first unrecognized key, reporting it with its character
/// position.
pub fn parse_keys(input: &str) -> crate::Result<Vec<Action>> {
    let mut actions = Vec::new();
    let mut offset = 0;

    loop {
        let rest = &input[offset..];
        let trimmed = rest.trim_start();
        offset += rest.len() - trimmed.len();
        if trimmed.is_empty() {
            break;
        }

        let action = KEY_TOKEN
            .find(trimmed)
            .and_then(|m| action_for(&m.as_str().to_lowercase()).map(|action| (action, m.end())));

        let Some((action, len)) = action else {
            return Err(Error::UnknownKey {
                input: trimmed.split_whitespace().next().unwrap_or(trimmed).to_string(),
                position: input[..offset].chars().count(),
            });
        };

        actions.push(action);
        offset += len;
    }

    Ok(actions)
}

fn action_for(token: &str) -> Option<Action> {
    let action = match token {
        "=" => Action::Equals,
        "sqr" => Action::Square,
        "1/x" => Action::Reciprocal,
        "neg" | "±" => Action::ToggleSign,
        "bs" | "<" => Action::Backspace,
        "ce" => Action::ClearEntry,
        "c" | "ac" => Action::ClearAll,
        "ms" => Action::Memory(MemoryOp::Store),
        "mc" => Action::Memory(MemoryOp::Clear),
        "mr" => Action::Memory(MemoryOp::Recall),
        "m+" => Action::Memory(MemoryOp::Add),
        "m-" => Action::Memory(MemoryOp::Subtract),
        _ => {
            let mut chars = token.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) if c.is_ascii_digit() || c == '.' => Action::Digit(c),
                _ => Action::Operator(token.parse::<Operator>().ok()?),
            }
        }
    };
    Some(action)
}
