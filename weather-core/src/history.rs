/// How many history entries are shown by default.
pub const DEFAULT_HISTORY_DISPLAY: usize = 10;

/// Display names of past searches, oldest first, without duplicates.
///
/// Entries are never removed; callers decide how many to show via
/// [`History::recent`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct History {
    entries: Vec<String>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `display_name` unless it is already present.
    ///
    /// Returns `true` when the name was added.
    pub fn record(&mut self, display_name: impl Into<String>) -> bool {
        let name = display_name.into();
        if self.contains(&name) {
            return false;
        }
        tracing::debug!(entry = %name, "Recorded search history entry");
        self.entries.push(name);
        true
    }

    /// The last `n` entries, most recent first.
    pub fn recent(&self, n: usize) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().rev().take(n).map(String::as_str)
    }

    pub fn contains(&self, display_name: &str) -> bool {
        self.entries.iter().any(|e| e == display_name)
    }

    /// All entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
