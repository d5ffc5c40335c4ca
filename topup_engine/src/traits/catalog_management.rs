use crate::{
    db_types::{CatalogSnapshot, SkuEntry},
    traits::StoreError,
};

#[allow(async_fn_in_trait)]
pub trait CatalogManagement {
    /// Replaces the stored catalog for `owner` wholesale.
    async fn upsert_catalog(&self, owner: &str, products: &[SkuEntry]) -> Result<CatalogSnapshot, StoreError>;

    async fn fetch_catalog(&self, owner: &str) -> Result<Option<CatalogSnapshot>, StoreError>;
}
