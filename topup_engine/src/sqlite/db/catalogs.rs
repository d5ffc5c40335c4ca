use chrono::{DateTime, Utc};
use log::*;
use sqlx::{Row, SqliteConnection};

use crate::{
    db_types::{CatalogSnapshot, SkuEntry},
    traits::StoreError,
};

pub async fn upsert_catalog(
    owner: &str,
    products: &[SkuEntry],
    conn: &mut SqliteConnection,
) -> Result<CatalogSnapshot, StoreError> {
    let json = serde_json::to_string(products)?;
    let updated_at = Utc::now();
    sqlx::query(
        r#"INSERT INTO catalogs (owner, products, updated_at) VALUES (?, ?, ?)
        ON CONFLICT(owner) DO UPDATE SET products = excluded.products, updated_at = excluded.updated_at"#,
    )
    .bind(owner)
    .bind(json)
    .bind(updated_at)
    .execute(conn)
    .await?;
    debug!("🗃️ Catalog for {owner} replaced with {} products", products.len());
    Ok(CatalogSnapshot { owner: owner.to_string(), products: products.to_vec(), updated_at })
}

pub async fn fetch_catalog(owner: &str, conn: &mut SqliteConnection) -> Result<Option<CatalogSnapshot>, StoreError> {
    let row = sqlx::query("SELECT products, updated_at FROM catalogs WHERE owner = ?")
        .bind(owner)
        .fetch_optional(conn)
        .await?;
    let Some(row) = row else {
        return Ok(None);
    };
    let json: String = row.try_get("products")?;
    let updated_at: DateTime<Utc> = row.try_get("updated_at")?;
    let products = serde_json::from_str::<Vec<SkuEntry>>(&json)?;
    Ok(Some(CatalogSnapshot { owner: owner.to_string(), products, updated_at }))
}
