//! Text rendering of the calculator display and history list.

use crate::calculator::{Engine, Notice};
use crate::items::HistoryItem;

/// Render the two-line display.
///
/// The operation line comes first, the main display below it. The display
/// line carries an `M` marker while memory holds a value.
pub fn render_panel(engine: &Engine) -> String {
    let marker = if engine.is_memory_set() { "M" } else { " " };
    format!(
        "  {}\n{marker} {}",
        engine.operation_text().trim_end(),
        engine.display_text()
    )
}

/// Render history items, one per line and numbered from 1, in the order
/// given. The numbers are what `:copy <n>` takes.
pub fn render_history(items: &[HistoryItem]) -> String {
    if items.is_empty() {
        return "History is empty.".to_string();
    }

    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let number = i + 1;
            if item.result.is_empty() {
                format!("{number:>3}  {}", item.expression)
            } else {
                format!("{number:>3}  {:<24} = {}", item.expression, item.result)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_notice(notice: Notice) -> String {
    format!("! {notice}")
}
