use thiserror::Error;
use topup_common::Secret;

/// A merchant ready for insertion. The password and PIN have already been hashed.
#[derive(Debug, Clone)]
pub struct NewMerchantRecord {
    pub username: String,
    pub password_hash: String,
    pub pin_hash: String,
    pub vendor_username: String,
    pub vendor_key: Secret<String>,
}

#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("We have an internal database engine (configuration/uptime etc.) : {0}")]
    DatabaseError(String),
    #[error("A merchant with username {0} already exists")]
    DuplicateUsername(String),
    #[error("An order with reference id {0} already exists")]
    DuplicateReference(String),
    #[error("The order with reference id {0} does not exist")]
    OrderNotFound(String),
    #[error("Could not (de)serialize stored data: {0}")]
    SerializationError(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        StoreError::DatabaseError(e.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::SerializationError(e.to_string())
    }
}

/// True if the error is a `UNIQUE` constraint violation.
pub fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(de) if de.is_unique_violation())
}
