use chrono::Utc;
use log::*;
use sqlx::{sqlite::SqliteRow, Row, SqliteConnection};
use topup_common::Secret;

use crate::{
    db_types::{Merchant, MerchantProfile},
    traits::{is_unique_violation, NewMerchantRecord, StoreError},
};

fn merchant_from_row(row: SqliteRow) -> Result<Merchant, sqlx::Error> {
    Ok(Merchant {
        id: row.try_get("id")?,
        username: row.try_get("username")?,
        password_hash: row.try_get("password_hash")?,
        pin_hash: row.try_get("pin_hash")?,
        vendor_username: row.try_get("vendor_username")?,
        vendor_key: Secret::new(row.try_get("vendor_key")?),
        created_at: row.try_get("created_at")?,
    })
}

pub async fn insert_merchant(
    merchant: NewMerchantRecord,
    conn: &mut SqliteConnection,
) -> Result<MerchantProfile, StoreError> {
    let username = merchant.username.clone();
    let profile = sqlx::query_as::<_, MerchantProfile>(
        r#"INSERT INTO merchants (username, password_hash, pin_hash, vendor_username, vendor_key, created_at)
        VALUES (?, ?, ?, ?, ?, ?)
        RETURNING id, username, vendor_username, created_at"#,
    )
    .bind(merchant.username)
    .bind(merchant.password_hash)
    .bind(merchant.pin_hash)
    .bind(merchant.vendor_username)
    .bind(merchant.vendor_key.reveal().as_str())
    .bind(Utc::now())
    .fetch_one(conn)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            StoreError::DuplicateUsername(username.clone())
        } else {
            StoreError::from(e)
        }
    })?;
    debug!("🗃️ Merchant {} saved with id {}", profile.username, profile.id);
    Ok(profile)
}

pub async fn fetch_merchant_by_username(
    username: &str,
    conn: &mut SqliteConnection,
) -> Result<Option<Merchant>, StoreError> {
    let row = sqlx::query("SELECT * FROM merchants WHERE username = ?").bind(username).fetch_optional(conn).await?;
    let merchant = row.map(merchant_from_row).transpose()?;
    Ok(merchant)
}

pub async fn fetch_merchants(conn: &mut SqliteConnection) -> Result<Vec<MerchantProfile>, StoreError> {
    let merchants = sqlx::query_as::<_, MerchantProfile>(
        "SELECT id, username, vendor_username, created_at FROM merchants ORDER BY id DESC",
    )
    .fetch_all(conn)
    .await?;
    Ok(merchants)
}

pub async fn delete_merchant(id: i64, conn: &mut SqliteConnection) -> Result<bool, StoreError> {
    let result = sqlx::query("DELETE FROM merchants WHERE id = ?").bind(id).execute(conn).await?;
    let deleted = result.rows_affected() > 0;
    if deleted {
        debug!("🗃️ Merchant #{id} deleted");
    }
    Ok(deleted)
}
