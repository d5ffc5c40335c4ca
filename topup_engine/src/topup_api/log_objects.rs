use serde::Deserialize;

use crate::db_types::{LogCategory, LogEntry};

pub const DEFAULT_LOG_LIMIT: u32 = 100;
pub const MAX_LOG_LIMIT: u32 = 1000;

/// Filters for reading the activity log. All filters are optional and combine with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LogQuery {
    pub owner: Option<String>,
    pub category: Option<LogCategory>,
    pub ref_id: Option<String>,
    pub limit: Option<u32>,
}

impl LogQuery {
    pub fn for_owner<S: Into<String>>(owner: S) -> Self {
        Self { owner: Some(owner.into()), ..Default::default() }
    }

    pub fn with_owner<S: Into<String>>(mut self, owner: S) -> Self {
        self.owner = Some(owner.into());
        self
    }

    pub fn with_category(mut self, category: LogCategory) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_ref_id<S: Into<String>>(mut self, ref_id: S) -> Self {
        self.ref_id = Some(ref_id.into());
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// The requested limit, defaulting to 100 and capped at 1000.
    pub fn effective_limit(&self) -> u32 {
        self.limit.unwrap_or(DEFAULT_LOG_LIMIT).clamp(1, MAX_LOG_LIMIT)
    }
}

/// Folds entries into the most recent entry per reference id, newest first. Entries without a reference id are
/// dropped. The input must already be ordered newest first, as returned by the log queries.
pub fn latest_by_reference(entries: &[LogEntry]) -> Vec<LogEntry> {
    let mut seen = std::collections::HashSet::new();
    entries
        .iter()
        .filter(|e| match &e.ref_id {
            Some(r) => seen.insert(r.as_str()),
            None => false,
        })
        .cloned()
        .collect()
}
