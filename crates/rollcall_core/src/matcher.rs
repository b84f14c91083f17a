use std::collections::HashSet;

use crate::normalize::NameKeys;
use crate::{OnlinePlayer, WatchEntry};

/// Watchlist partitioned by presence in the online roster.
///
/// Every input entry lands in exactly one of the two lists, in input order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MatchResult {
    pub present: Vec<WatchEntry>,
    pub absent: Vec<WatchEntry>,
}

/// Partitions `watchlist` against a successfully fetched `online` roster.
///
/// An entry is present when its full key matches an online full key, or when
/// its non-empty base key matches an online base key.
pub fn match_roster(watchlist: &[WatchEntry], online: &[OnlinePlayer]) -> MatchResult {
    let mut full_set = HashSet::with_capacity(online.len());
    let mut base_set = HashSet::with_capacity(online.len());
    for name in online {
        let keys = NameKeys::of(name);
        if !keys.base.is_empty() {
            base_set.insert(keys.base);
        }
        full_set.insert(keys.full);
    }

    let mut result = MatchResult::default();
    for entry in watchlist {
        let keys = NameKeys::of(entry);
        let found = full_set.contains(&keys.full)
            || (!keys.base.is_empty() && base_set.contains(&keys.base));
        if found {
            result.present.push(entry.clone());
        } else {
            result.absent.push(entry.clone());
        }
    }
    result
}
