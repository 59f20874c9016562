use crate::core::Issue;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IgnoreEntry {
    pub from: i64,
    pub to: i64,
    pub message: String,
}

impl IgnoreEntry {
    pub fn new(from: i64, to: i64, message: impl Into<String>) -> Self {
        Self {
            from,
            to,
            message: message.into(),
        }
    }

    pub fn matches(&self, issue: &Issue) -> bool {
        let key = issue.ignore_key();
        self.from == key.from && self.to == key.to && self.message == key.message
    }
}

impl From<&Issue> for IgnoreEntry {
    fn from(issue: &Issue) -> Self {
        Self::new(issue.from, issue.to, issue.message.clone())
    }
}

/// Dismissed issues in dismissal order. Entries are only ever appended or
/// cleared all at once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IgnoreList {
    entries: Vec<IgnoreEntry>,
}

impl IgnoreList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: IgnoreEntry) {
        self.entries.push(entry);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn contains(&self, issue: &Issue) -> bool {
        self.entries.iter().any(|entry| entry.matches(issue))
    }

    pub fn entries(&self) -> &[IgnoreEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read ignore list {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse ignore list {}", path.display()))
    }

    pub fn save_json_file(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write ignore list {}", path.display()))
    }
}

impl FromIterator<IgnoreEntry> for IgnoreList {
    fn from_iter<T: IntoIterator<Item = IgnoreEntry>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
