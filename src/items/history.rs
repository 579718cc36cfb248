//! History item representing one past calculation.

/// A history record split for display.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoryItem {
    /// Left side of the record, e.g. `5 + 3` or `sqr(4)`.
    pub expression: String,
    /// The formatted result. Empty if the record has no `=`.
    pub result: String,
}

impl HistoryItem {
    /// Split an `"expression = result"` record at its last `=`.
    pub fn from_record(record: &str) -> Self {
        match record.rsplit_once(" = ") {
            Some((expression, result)) => Self {
                expression: expression.to_string(),
                result: result.to_string(),
            },
            None => Self {
                expression: record.to_string(),
                result: String::new(),
            },
        }
    }

    /// Text to copy: the result, or the whole expression if there is none.
    pub fn text_for_clipboard(&self) -> &str {
        if self.result.is_empty() {
            &self.expression
        } else {
            &self.result
        }
    }
}
