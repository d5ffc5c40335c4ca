//! `SqliteDatabase` is a concrete implementation of a topup engine backend.
//!
//! Unsurprisingly, it uses SQLite as the backend and implements all the traits defined in the [`crate::traits`]
//! module.
use std::fmt::Debug;

use log::*;
use sqlx::{migrate::MigrateDatabase, Sqlite, SqlitePool};

use super::db::{activity_logs, catalogs, db_url, merchants, new_pool, orders};
use crate::{
    db_types::{
        CatalogSnapshot,
        LogEntry,
        Merchant,
        MerchantProfile,
        NewLogEntry,
        NewOrderRecord,
        OrderOutcomeFields,
        OrderRecord,
        OrderState,
        SkuEntry,
    },
    topup_api::log_objects::LogQuery,
    traits::{
        ActivityLogManagement,
        CatalogManagement,
        CredentialManagement,
        NewMerchantRecord,
        OrderManagement,
        StoreError,
        StorefrontDatabase,
    },
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl SqliteDatabase {
    /// Creates a new database API object, using `TOPUP_DATABASE_URL` (or the default).
    pub async fn new(max_connections: u32) -> Result<Self, sqlx::Error> {
        let url = db_url();
        SqliteDatabase::new_with_url(&url, max_connections).await
    }

    /// Connects to the database at `url`, creating the database file first if it doesn't exist.
    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        if !Sqlite::database_exists(url).await? {
            info!("🗃️ Database {url} does not exist. Creating it.");
            Sqlite::create_database(url).await?;
        }
        let pool = new_pool(url, max_connections).await?;
        Ok(Self { url: url.to_string(), pool })
    }

    /// Brings the schema up to date. Safe to call on every start-up.
    pub async fn migrate(&self) -> Result<(), sqlx::Error> {
        sqlx::migrate!("./src/sqlite/migrations").run(&self.pool).await?;
        info!("🗃️ Database migrations complete");
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn close(&mut self) -> Result<(), sqlx::Error> {
        self.pool.close().await;
        Ok(())
    }
}

impl CredentialManagement for SqliteDatabase {
    async fn insert_merchant(&self, merchant: NewMerchantRecord) -> Result<MerchantProfile, StoreError> {
        let mut conn = self.pool.acquire().await?;
        merchants::insert_merchant(merchant, &mut conn).await
    }

    async fn fetch_merchant_by_username(&self, username: &str) -> Result<Option<Merchant>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        merchants::fetch_merchant_by_username(username, &mut conn).await
    }

    async fn fetch_merchants(&self) -> Result<Vec<MerchantProfile>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        merchants::fetch_merchants(&mut conn).await
    }

    async fn delete_merchant(&self, id: i64) -> Result<bool, StoreError> {
        let mut conn = self.pool.acquire().await?;
        merchants::delete_merchant(id, &mut conn).await
    }
}

impl CatalogManagement for SqliteDatabase {
    async fn upsert_catalog(&self, owner: &str, products: &[SkuEntry]) -> Result<CatalogSnapshot, StoreError> {
        let mut conn = self.pool.acquire().await?;
        catalogs::upsert_catalog(owner, products, &mut conn).await
    }

    async fn fetch_catalog(&self, owner: &str) -> Result<Option<CatalogSnapshot>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        catalogs::fetch_catalog(owner, &mut conn).await
    }
}

impl OrderManagement for SqliteDatabase {
    async fn insert_order(&self, order: NewOrderRecord) -> Result<OrderRecord, StoreError> {
        let mut conn = self.pool.acquire().await?;
        orders::insert_order(order, &mut conn).await
    }

    async fn fetch_order_by_ref(&self, ref_id: &str) -> Result<Option<OrderRecord>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        orders::fetch_order_by_ref(ref_id, &mut conn).await
    }

    async fn update_order(
        &self,
        ref_id: &str,
        expected: OrderState,
        status: OrderState,
        outcome: &OrderOutcomeFields,
    ) -> Result<Option<OrderRecord>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        orders::update_order(ref_id, expected, status, outcome, &mut conn).await
    }

    async fn fetch_pending_orders(&self, limit: u32) -> Result<Vec<OrderRecord>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        orders::fetch_pending_orders(limit, &mut conn).await
    }

    async fn fetch_orders_for_owner(&self, owner: &str) -> Result<Vec<OrderRecord>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        orders::fetch_orders_for_owner(owner, &mut conn).await
    }
}

impl ActivityLogManagement for SqliteDatabase {
    async fn insert_log_entry(&self, entry: NewLogEntry) -> Result<LogEntry, StoreError> {
        let mut conn = self.pool.acquire().await?;
        activity_logs::insert_log_entry(entry, &mut conn).await
    }

    async fn fetch_log_entries(&self, query: &LogQuery) -> Result<Vec<LogEntry>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        activity_logs::fetch_log_entries(query, &mut conn).await
    }
}

impl StorefrontDatabase for SqliteDatabase {
    fn url(&self) -> &str {
        self.url.as_str()
    }

    async fn record_new_order(
        &self,
        order: NewOrderRecord,
        entry: NewLogEntry,
    ) -> Result<(OrderRecord, LogEntry), StoreError> {
        let mut tx = self.pool.begin().await?;
        let order = orders::insert_order(order, &mut tx).await?;
        let entry = activity_logs::insert_log_entry(entry, &mut tx).await?;
        tx.commit().await?;
        debug!("🗃️ Order {} recorded as {} with log entry #{}", order.ref_id, order.status, entry.id);
        Ok((order, entry))
    }

    async fn record_order_change(
        &self,
        ref_id: &str,
        expected: OrderState,
        status: OrderState,
        outcome: &OrderOutcomeFields,
        entry: NewLogEntry,
    ) -> Result<Option<(OrderRecord, LogEntry)>, StoreError> {
        let mut tx = self.pool.begin().await?;
        let Some(order) = orders::update_order(ref_id, expected, status, outcome, &mut tx).await? else {
            tx.rollback().await?;
            return Ok(None);
        };
        let entry = activity_logs::insert_log_entry(entry, &mut tx).await?;
        tx.commit().await?;
        debug!("🗃️ Order {ref_id} moved to {status} with log entry #{}", entry.id);
        Ok(Some((order, entry)))
    }
}
