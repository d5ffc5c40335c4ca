use crate::{
    db_types::{Merchant, MerchantProfile},
    traits::{NewMerchantRecord, StoreError},
};

#[allow(async_fn_in_trait)]
pub trait CredentialManagement {
    /// Stores a new merchant. A username that is already taken yields [`StoreError::DuplicateUsername`], even when
    /// two inserts race.
    async fn insert_merchant(&self, merchant: NewMerchantRecord) -> Result<MerchantProfile, StoreError>;

    async fn fetch_merchant_by_username(&self, username: &str) -> Result<Option<Merchant>, StoreError>;

    /// All merchants, newest first.
    async fn fetch_merchants(&self) -> Result<Vec<MerchantProfile>, StoreError>;

    /// Returns `false` if no merchant had the given id.
    async fn delete_merchant(&self, id: i64) -> Result<bool, StoreError>;
}
