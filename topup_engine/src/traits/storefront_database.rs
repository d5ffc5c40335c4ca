use crate::{
    db_types::{LogEntry, NewLogEntry, NewOrderRecord, OrderOutcomeFields, OrderRecord, OrderState},
    traits::{ActivityLogManagement, CatalogManagement, CredentialManagement, OrderManagement, StoreError},
};

/// This trait defines the highest level of behaviour for backends supporting the topup engine.
///
/// On top of the individual stores, it provides the two operations of the order workflow that must change the order
/// record and the activity log together.
#[allow(async_fn_in_trait)]
pub trait StorefrontDatabase:
    Clone + CredentialManagement + CatalogManagement + OrderManagement + ActivityLogManagement
{
    /// The URL of the database
    fn url(&self) -> &str;

    /// Stores the first classification of an order along with its log entry, in one atomic transaction.
    async fn record_new_order(
        &self,
        order: NewOrderRecord,
        entry: NewLogEntry,
    ) -> Result<(OrderRecord, LogEntry), StoreError>;

    /// Applies a state change to an existing order along with its log entry, in one atomic transaction.
    ///
    /// The change only applies if the order is still in the `expected` state. Otherwise nothing is written and
    /// `None` is returned.
    async fn record_order_change(
        &self,
        ref_id: &str,
        expected: OrderState,
        status: OrderState,
        outcome: &OrderOutcomeFields,
        entry: NewLogEntry,
    ) -> Result<Option<(OrderRecord, LogEntry)>, StoreError>;
}
