//! Render cache: the last accepted style fragment per setting key.

use std::collections::BTreeMap;

/// One generated fragment per key; a later insert replaces the earlier one.
///
/// Keys are kept ordered so the concatenated text is deterministic.
#[derive(Debug, Clone, Default)]
pub struct RenderCache {
    entries: BTreeMap<String, String>,
}

impl RenderCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `fragment` for `key`, returning the fragment it replaced.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        fragment: impl Into<String>,
    ) -> Option<String> {
        self.entries.insert(key.into(), fragment.into())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.entries.remove(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// All fragments concatenated, i.e. the style text currently applied.
    pub fn css(&self) -> String {
        self.entries.values().map(String::as_str).collect()
    }
}
