use thiserror::Error;

use crate::traits::{StoreError, VendorError};

#[derive(Debug, Clone, Error)]
pub enum CredentialError {
    #[error("Invalid merchant details: {0}")]
    Validation(String),
    #[error("A merchant with username {0} already exists")]
    DuplicateUsername(String),
    #[error("Merchant {0} does not exist")]
    MerchantNotFound(String),
    #[error("Merchant #{0} does not exist")]
    MerchantIdNotFound(i64),
    #[error("Invalid username or password")]
    AuthenticationFailed,
    #[error("The transaction PIN is incorrect")]
    InvalidPin,
    #[error("Merchant {0} has no vendor credentials configured")]
    MissingVendorCredentials(String),
    #[error("Could not hash secret: {0}")]
    HashingError(String),
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<StoreError> for CredentialError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::DuplicateUsername(u) => CredentialError::DuplicateUsername(u),
            e => CredentialError::DatabaseError(e.to_string()),
        }
    }
}

impl From<bcrypt::BcryptError> for CredentialError {
    fn from(e: bcrypt::BcryptError) -> Self {
        CredentialError::HashingError(e.to_string())
    }
}

#[derive(Debug, Clone, Error)]
pub enum CatalogError {
    #[error("{0}")]
    Credentials(#[from] CredentialError),
    #[error("{0}")]
    Vendor(#[from] VendorError),
    #[error("No catalog has been synced for {0} yet")]
    CatalogNotFound(String),
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<StoreError> for CatalogError {
    fn from(e: StoreError) -> Self {
        CatalogError::DatabaseError(e.to_string())
    }
}

#[derive(Debug, Clone, Error)]
pub enum OrderFlowError {
    #[error("Invalid order: {0}")]
    Validation(String),
    #[error("An order with reference id {0} already exists")]
    DuplicateReference(String),
    #[error("The transaction PIN is incorrect")]
    InvalidPin,
    #[error("{0}")]
    Credentials(CredentialError),
    #[error("{0}")]
    Vendor(#[from] VendorError),
    #[error("The order with reference id {0} does not exist")]
    OrderNotFound(String),
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<CredentialError> for OrderFlowError {
    fn from(e: CredentialError) -> Self {
        match e {
            CredentialError::InvalidPin => OrderFlowError::InvalidPin,
            e => OrderFlowError::Credentials(e),
        }
    }
}

impl From<StoreError> for OrderFlowError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::DuplicateReference(r) => OrderFlowError::DuplicateReference(r),
            StoreError::OrderNotFound(r) => OrderFlowError::OrderNotFound(r),
            e => OrderFlowError::DatabaseError(e.to_string()),
        }
    }
}

#[derive(Debug, Clone, Error)]
pub enum ActivityLogError {
    #[error("Invalid log entry: {0}")]
    Validation(String),
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<StoreError> for ActivityLogError {
    fn from(e: StoreError) -> Self {
        ActivityLogError::DatabaseError(e.to_string())
    }
}
