use std::sync::LazyLock;

use regex::Regex;

static BRACKET_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[.*?\]").expect("bracket tag pattern is valid"));

/// Canonical comparison key: lower-cased, whitespace runs collapsed, ends trimmed.
pub fn normalize(raw: &str) -> String {
    raw.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Strips every `[...]` tag (clan tags, server decorations) and trims the rest.
///
/// The result may be empty when the whole name was bracketed content.
pub fn base_identity(raw: &str) -> String {
    BRACKET_TAG.replace_all(raw, "").trim().to_string()
}

/// Both comparison keys of a single name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameKeys {
    pub full: String,
    pub base: String,
}

impl NameKeys {
    pub fn of(raw: &str) -> Self {
        Self {
            full: normalize(raw),
            base: normalize(&base_identity(raw)),
        }
    }

    /// True when either key identifies the same player as `other`.
    ///
    /// An empty base key never matches anything.
    pub fn collides_with(&self, other: &NameKeys) -> bool {
        self.full == other.full || (!self.base.is_empty() && self.base == other.base)
    }
}
