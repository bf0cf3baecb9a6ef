//! Calculation History
//!
//! Newest-first log of successful evaluations, capped at
//! [`HISTORY_CAPACITY`] entries. Recording past the cap evicts the oldest
//! entry. Entries are immutable and can only be removed by clearing the
//! whole log.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Maximum number of retained entries
pub const HISTORY_CAPACITY: usize = 50;

/// History entry identifier
///
/// Derived from the creation timestamp plus a process-wide sequence number,
/// so two entries created in the same millisecond still differ.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntryId(pub String);

impl EntryId {
    /// Generate a new unique entry ID for the given timestamp
    pub fn new(timestamp_ms: i64) -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        let seq = COUNTER.fetch_add(1, Ordering::SeqCst);
        Self(format!("calc_{timestamp_ms}_{seq}"))
    }
}

impl std::fmt::Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One recorded evaluation
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Unique entry ID
    pub id: EntryId,
    /// Buffer content at evaluation time
    pub expression: String,
    /// Formatted result
    pub result: String,
    /// Creation time (Unix timestamp ms)
    pub timestamp: i64,
}

impl HistoryEntry {
    /// Create an entry stamped with the current time
    pub fn new(expression: impl Into<String>, result: impl Into<String>) -> Self {
        let timestamp = chrono::Utc::now().timestamp_millis();
        Self {
            id: EntryId::new(timestamp),
            expression: expression.into(),
            result: result.into(),
            timestamp,
        }
    }

    /// Label shown above the result when the entry is recalled
    pub fn label(&self) -> String {
        format!("{} =", self.expression)
    }
}

/// Bounded, newest-first evaluation log
#[derive(Clone, Debug, Default)]
pub struct HistoryLog {
    entries: VecDeque<HistoryEntry>,
}

impl HistoryLog {
    /// Create an empty log
    pub fn new() -> Self {
        Self {
            entries: VecDeque::with_capacity(HISTORY_CAPACITY),
        }
    }

    /// Record an evaluation as the newest entry
    pub fn record(
        &mut self,
        expression: impl Into<String>,
        result: impl Into<String>,
    ) -> &HistoryEntry {
        self.entries.push_front(HistoryEntry::new(expression, result));

        if self.entries.len() > HISTORY_CAPACITY {
            if let Some(evicted) = self.entries.pop_back() {
                tracing::debug!(id = %evicted.id, "Evicted oldest history entry");
            }
        }

        &self.entries[0]
    }

    /// Remove every entry
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Recall an entry as `(expression_label, display)`
    ///
    /// Pure read: the log is not modified and nothing is re-evaluated.
    pub fn select(entry: &HistoryEntry) -> (String, String) {
        (entry.label(), entry.result.clone())
    }

    /// Find an entry by ID
    pub fn get(&self, id: &EntryId) -> Option<&HistoryEntry> {
        self.entries.iter().find(|e| &e.id == id)
    }

    /// Entry at a position, newest first
    pub fn get_index(&self, index: usize) -> Option<&HistoryEntry> {
        self.entries.get(index)
    }

    /// Most recent entry
    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.front()
    }

    /// Iterate entries, newest first
    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    /// Owned copy of all entries, newest first
    pub fn entries(&self) -> Vec<HistoryEntry> {
        self.entries.iter().cloned().collect()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the log is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_is_newest_first() {
        let mut log = HistoryLog::new();
        log.record("1+1", "2");
        log.record("2+2", "4");

        assert_eq!(log.len(), 2);
        assert_eq!(log.latest().unwrap().expression, "2+2");
        assert_eq!(log.get_index(1).unwrap().expression, "1+1");
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let mut log = HistoryLog::new();
        for i in 1..=51 {
            log.record(format!("{i}+0"), i.to_string());
        }

        assert_eq!(log.len(), HISTORY_CAPACITY);
        assert_eq!(log.get_index(0).unwrap().expression, "51+0");
        assert_eq!(log.get_index(49).unwrap().expression, "2+0");
        assert!(log.iter().all(|e| e.expression != "1+0"));
    }

    #[test]
    fn test_ids_are_unique() {
        let mut log = HistoryLog::new();
        for _ in 0..20 {
            log.record("1+1", "2");
        }

        let mut ids: Vec<_> = log.iter().map(|e| e.id.clone()).collect();
        ids.sort_by(|a, b| a.0.cmp(&b.0));
        ids.dedup();
        assert_eq!(ids.len(), 20);
    }

    #[test]
    fn test_select_is_pure() {
        let mut log = HistoryLog::new();
        let id = log.record("7+3", "10").id.clone();

        let entry = log.get(&id).unwrap();
        assert_eq!(
            HistoryLog::select(entry),
            ("7+3 =".to_string(), "10".to_string())
        );
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn test_clear() {
        let mut log = HistoryLog::new();
        log.record("1", "1");
        log.record("2", "2");
        log.clear();

        assert!(log.is_empty());
        assert!(log.latest().is_none());
    }

    #[test]
    fn test_unknown_id() {
        let log = HistoryLog::new();
        assert!(log.get(&EntryId("calc_0_0".to_string())).is_none());
    }
}
