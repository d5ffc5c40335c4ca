use std::fmt::Debug;

use log::*;

use crate::{
    db_types::{LogCategory, LogEntry, NewLogEntry, OrderRecord},
    topup_api::{errors::ActivityLogError, log_objects::LogQuery},
    traits::{ActivityLogManagement, OrderManagement},
};

const MAX_MESSAGE_LEN: usize = 2000;

/// `ActivityLogApi` appends to and reads from the activity log, and serves the per-merchant transaction history.
pub struct ActivityLogApi<B> {
    db: B,
}

impl<B> Debug for ActivityLogApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ActivityLogApi")
    }
}

impl<B> ActivityLogApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }
}

impl<B> ActivityLogApi<B>
where B: ActivityLogManagement + OrderManagement
{
    pub async fn append(&self, entry: NewLogEntry) -> Result<LogEntry, ActivityLogError> {
        if entry.message.trim().is_empty() {
            return Err(ActivityLogError::Validation("The log message cannot be empty".to_string()));
        }
        if entry.message.len() > MAX_MESSAGE_LEN {
            return Err(ActivityLogError::Validation(format!(
                "Log messages may not be longer than {MAX_MESSAGE_LEN} bytes"
            )));
        }
        let entry = self.db.insert_log_entry(entry).await?;
        trace!("📝️ Log entry #{} appended", entry.id);
        Ok(entry)
    }

    /// Records a free-form event reported by a client (sync started, logout and so on).
    pub async fn log_event(
        &self,
        owner: Option<&str>,
        category: LogCategory,
        message: &str,
    ) -> Result<LogEntry, ActivityLogError> {
        let mut entry = NewLogEntry::new(category, message.trim());
        if let Some(owner) = owner {
            entry = entry.with_owner(owner);
        }
        self.append(entry).await
    }

    pub async fn fetch_logs(&self, query: &LogQuery) -> Result<Vec<LogEntry>, ActivityLogError> {
        Ok(self.db.fetch_log_entries(query).await?)
    }

    pub async fn transaction_history(&self, owner: &str) -> Result<Vec<OrderRecord>, ActivityLogError> {
        Ok(self.db.fetch_orders_for_owner(owner).await?)
    }
}
