use crate::{
    db_types::{LogEntry, NewLogEntry},
    topup_api::log_objects::LogQuery,
    traits::StoreError,
};

#[allow(async_fn_in_trait)]
pub trait ActivityLogManagement {
    async fn insert_log_entry(&self, entry: NewLogEntry) -> Result<LogEntry, StoreError>;

    /// Entries matching the query, newest first.
    async fn fetch_log_entries(&self, query: &LogQuery) -> Result<Vec<LogEntry>, StoreError>;
}
