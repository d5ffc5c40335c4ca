use chrono::Utc;
use log::*;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection};

use crate::{
    db_types::{LogEntry, NewLogEntry},
    topup_api::log_objects::LogQuery,
    traits::StoreError,
};

pub async fn insert_log_entry(entry: NewLogEntry, conn: &mut SqliteConnection) -> Result<LogEntry, StoreError> {
    let entry = sqlx::query_as::<_, LogEntry>(
        r#"INSERT INTO activity_logs
        (category, message, ref_id, status, customer_no, buyer_sku_code, owner, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING *"#,
    )
    .bind(entry.category)
    .bind(entry.message)
    .bind(entry.ref_id)
    .bind(entry.status)
    .bind(entry.customer_no)
    .bind(entry.buyer_sku_code)
    .bind(entry.owner)
    .bind(Utc::now())
    .fetch_one(conn)
    .await?;
    trace!("🗃️ Log entry #{} appended ({})", entry.id, entry.category);
    Ok(entry)
}

pub async fn fetch_log_entries(query: &LogQuery, conn: &mut SqliteConnection) -> Result<Vec<LogEntry>, StoreError> {
    let mut builder = QueryBuilder::<Sqlite>::new("SELECT * FROM activity_logs WHERE 1 = 1");
    if let Some(owner) = &query.owner {
        builder.push(" AND owner = ").push_bind(owner.clone());
    }
    if let Some(category) = query.category {
        builder.push(" AND category = ").push_bind(category);
    }
    if let Some(ref_id) = &query.ref_id {
        builder.push(" AND ref_id = ").push_bind(ref_id.clone());
    }
    builder.push(" ORDER BY id DESC LIMIT ").push_bind(query.effective_limit());
    trace!("🗃️ Executing log query: {}", builder.sql());
    let entries = builder.build_query_as::<LogEntry>().fetch_all(conn).await?;
    Ok(entries)
}
