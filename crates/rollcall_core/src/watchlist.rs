use thiserror::Error;

use crate::normalize::{normalize, NameKeys};
use crate::WatchEntry;

/// Validation failures of the administrative watchlist operations.
///
/// None of them mutate the watchlist.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WatchlistError {
    #[error("player name must not be blank")]
    EmptyName,
    #[error("watchlist is full ({capacity} / {capacity})")]
    CapacityExceeded { capacity: usize },
    #[error("'{candidate}' duplicates existing entry '{existing}'")]
    DuplicateEntry { candidate: String, existing: String },
    #[error("'{name}' is not on the watchlist")]
    EntryNotFound { name: String },
}

/// Returns the watchlist with `candidate` appended.
///
/// Capacity is checked here only; lists loaded above a lowered capacity stay intact.
pub fn add_entry(
    entries: &[WatchEntry],
    candidate: &str,
    capacity: usize,
) -> Result<Vec<WatchEntry>, WatchlistError> {
    let candidate = candidate.trim();
    if candidate.is_empty() {
        return Err(WatchlistError::EmptyName);
    }
    if entries.len() >= capacity {
        return Err(WatchlistError::CapacityExceeded { capacity });
    }

    let keys = NameKeys::of(candidate);
    if let Some(existing) = entries
        .iter()
        .find(|entry| NameKeys::of(entry).collides_with(&keys))
    {
        return Err(WatchlistError::DuplicateEntry {
            candidate: candidate.to_string(),
            existing: existing.clone(),
        });
    }

    let mut next = entries.to_vec();
    next.push(candidate.to_string());
    Ok(next)
}

/// Removes the first entry matching `name` and returns `(remaining, removed)`.
///
/// Matching tries exact text, then the normalized key, then a non-empty base key.
pub fn remove_entry(
    entries: &[WatchEntry],
    name: &str,
) -> Result<(Vec<WatchEntry>, WatchEntry), WatchlistError> {
    let index = find_entry(entries, name).ok_or_else(|| WatchlistError::EntryNotFound {
        name: name.trim().to_string(),
    })?;
    let mut remaining = entries.to_vec();
    let removed = remaining.remove(index);
    Ok((remaining, removed))
}

fn find_entry(entries: &[WatchEntry], name: &str) -> Option<usize> {
    let trimmed = name.trim();
    if let Some(index) = entries.iter().position(|entry| entry == trimmed) {
        return Some(index);
    }
    let full = normalize(trimmed);
    if let Some(index) = entries.iter().position(|entry| normalize(entry) == full) {
        return Some(index);
    }
    let base = NameKeys::of(trimmed).base;
    if base.is_empty() {
        return None;
    }
    entries
        .iter()
        .position(|entry| NameKeys::of(entry).base == base)
}

/// Numbered listing of the watchlist for the `list` operation.
pub fn render_listing(entries: &[WatchEntry], capacity: usize) -> String {
    if entries.is_empty() {
        return format!("Watchlist is empty (0 / {capacity}). Use `add` to watch a player.");
    }
    let mut out = format!("Watchlist ({} / {capacity}):", entries.len());
    for (i, entry) in entries.iter().enumerate() {
        out.push_str(&format!("\n{}. {entry}", i + 1));
    }
    out
}
