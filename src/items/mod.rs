mod history;

pub use history::HistoryItem;

/// History records for presentation: newest first, at most `limit` of them
/// (0 means no limit).
pub fn newest_first(history: &[String], limit: usize) -> Vec<HistoryItem> {
    let take = if limit == 0 { history.len() } else { limit };
    history
        .iter()
        .rev()
        .take(take)
        .map(|record| HistoryItem::from_record(record))
        .collect()
}

/// The `n`-th most recent record, counting from 1 as the history listing
/// numbers them.
pub fn nth_newest(history: &[String], n: usize) -> Option<HistoryItem> {
    if n == 0 {
        return None;
    }
    let index = history.len().checked_sub(n)?;
    history.get(index).map(|record| HistoryItem::from_record(record))
}
