use std::fmt::Debug;

use log::*;

use crate::{
    db_types::{CatalogSnapshot, Rupiah},
    topup_api::{credential_api::vendor_credentials_for, errors::CatalogError},
    traits::{CatalogManagement, CredentialManagement, VendorGateway},
    CredentialError,
};

/// `CatalogApi` keeps each merchant's product catalog in step with the vendor price list.
pub struct CatalogApi<B, V> {
    db: B,
    vendor: V,
}

impl<B, V> Debug for CatalogApi<B, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CatalogApi")
    }
}

impl<B, V> CatalogApi<B, V> {
    pub fn new(db: B, vendor: V) -> Self {
        Self { db, vendor }
    }
}

impl<B, V> CatalogApi<B, V>
where
    B: CatalogManagement + CredentialManagement,
    V: VendorGateway,
{
    /// Fetches the price list with `owner`'s vendor account, keeps the active SKUs and stores them as `owner`'s
    /// catalog, replacing whatever was there.
    pub async fn sync_catalog(&self, owner: &str) -> Result<CatalogSnapshot, CatalogError> {
        let merchant = self
            .db
            .fetch_merchant_by_username(owner)
            .await?
            .ok_or_else(|| CredentialError::MerchantNotFound(owner.to_string()))?;
        let credentials = vendor_credentials_for(&merchant)?;
        let entries = self.vendor.price_list(&credentials).await?;
        let total = entries.len();
        let active = entries.into_iter().filter(|e| e.seller_product_status).collect::<Vec<_>>();
        let snapshot = self.db.upsert_catalog(owner, &active).await?;
        info!("📦️ Catalog for {owner} synced. {} of {total} SKUs are active", snapshot.products.len());
        Ok(snapshot)
    }

    pub async fn fetch_catalog(&self, owner: &str) -> Result<CatalogSnapshot, CatalogError> {
        self.db.fetch_catalog(owner).await?.ok_or_else(|| CatalogError::CatalogNotFound(owner.to_string()))
    }

    pub async fn balance(&self, owner: &str) -> Result<Rupiah, CatalogError> {
        let merchant = self
            .db
            .fetch_merchant_by_username(owner)
            .await?
            .ok_or_else(|| CredentialError::MerchantNotFound(owner.to_string()))?;
        let credentials = vendor_credentials_for(&merchant)?;
        let balance = self.vendor.balance(&credentials).await?;
        debug!("📦️ Vendor balance for {owner} is {balance}");
        Ok(balance)
    }
}
