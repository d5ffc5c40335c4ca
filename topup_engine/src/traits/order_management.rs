use crate::{
    db_types::{NewOrderRecord, OrderOutcomeFields, OrderRecord, OrderState},
    traits::StoreError,
};

#[allow(async_fn_in_trait)]
pub trait OrderManagement {
    /// Inserts the record. A reference id that is already on record yields [`StoreError::DuplicateReference`].
    async fn insert_order(&self, order: NewOrderRecord) -> Result<OrderRecord, StoreError>;

    async fn fetch_order_by_ref(&self, ref_id: &str) -> Result<Option<OrderRecord>, StoreError>;

    /// Overwrites the state and vendor fields of a record that is still in the `expected` state and bumps
    /// `updated_at`. Returns `None`, and changes nothing, if the record has moved on in the meantime.
    async fn update_order(
        &self,
        ref_id: &str,
        expected: OrderState,
        status: OrderState,
        outcome: &OrderOutcomeFields,
    ) -> Result<Option<OrderRecord>, StoreError>;

    /// Pending records, oldest first, at most `limit` of them.
    async fn fetch_pending_orders(&self, limit: u32) -> Result<Vec<OrderRecord>, StoreError>;

    /// All records placed by `owner`, newest first.
    async fn fetch_orders_for_owner(&self, owner: &str) -> Result<Vec<OrderRecord>, StoreError>;
}
