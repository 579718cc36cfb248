//! Serializable copy of the engine state for suspend/resume.
//!
//! Unset `operand`/`memory` are written as JSON `null` and a missing
//! `pending_op` is omitted, so the optional encoding never leaks into the
//! engine itself. JSON has no infinity or NaN, so those are written as the
//! strings `"inf"`, `"-inf"` and `"NaN"`.

use super::evaluation::Operator;
use serde::{Deserialize, Serialize};

/// Every field the engine needs to pick up where it left off.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    pub entry: String,
    #[serde(with = "optional_number")]
    pub operand: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pending_op: Option<Operator>,
    pub after_equals: bool,
    pub history: Vec<String>,
    #[serde(with = "optional_number")]
    pub memory: Option<f64>,
}

impl Snapshot {
    /// Decode a snapshot from its JSON form.
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Encode as pretty JSON.
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// `Option<f64>` as a JSON number, `null`, or a string for non-finite values.
mod optional_number {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(f64),
        Text(String),
    }

    pub fn serialize<S: Serializer>(value: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error> {
        let repr = value.map(|value| {
            if value.is_finite() {
                Repr::Number(value)
            } else {
                Repr::Text(value.to_string())
            }
        });
        repr.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
        match Option::<Repr>::deserialize(deserializer)? {
            None => Ok(None),
            Some(Repr::Number(value)) => Ok(Some(value)),
            Some(Repr::Text(text)) => text
                .parse::<f64>()
                .map(Some)
                .map_err(|_| D::Error::custom(format!("invalid number {text:?}"))),
        }
    }
}
