use serde::{Deserialize, Serialize};
use topup_common::Secret;

use crate::db_types::{OrderRecord, OrderState};

/// A purchase request as submitted by a merchant. The merchant identity is supplied separately.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderRequest {
    pub buyer_sku_code: String,
    /// The player id or phone number the goods are sent to.
    #[serde(alias = "customer_no")]
    pub destination: String,
    #[serde(default)]
    pub zone_id: Option<String>,
    /// The catalog brand of the SKU. Required to decide whether a zone id is needed.
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub ref_id: Option<String>,
    pub pin: Secret<String>,
}

impl OrderRequest {
    pub fn new<S: Into<String>>(buyer_sku_code: S, destination: S, pin: S) -> Self {
        Self {
            buyer_sku_code: buyer_sku_code.into(),
            destination: destination.into(),
            zone_id: None,
            brand: None,
            ref_id: None,
            pin: Secret::new(pin.into()),
        }
    }

    pub fn with_brand<S: Into<String>>(mut self, brand: S) -> Self {
        self.brand = Some(brand.into());
        self
    }

    pub fn with_zone_id<S: Into<String>>(mut self, zone_id: S) -> Self {
        self.zone_id = Some(zone_id.into());
        self
    }

    pub fn with_ref_id<S: Into<String>>(mut self, ref_id: S) -> Self {
        self.ref_id = Some(ref_id.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderOutcome {
    pub ref_id: String,
    pub status: OrderState,
    pub message: String,
    pub order: OrderRecord,
}

impl OrderOutcome {
    pub fn new(order: OrderRecord) -> Self {
        let message = order.message.clone().unwrap_or_else(|| default_message(order.status).to_string());
        Self { ref_id: order.ref_id.clone(), status: order.status, message, order }
    }
}

fn default_message(status: OrderState) -> &'static str {
    match status {
        OrderState::Success => "Transaction successful",
        OrderState::Pending => "Transaction is pending",
        OrderState::Failed => "Transaction failed",
    }
}

/// The tally of one reconciliation pass. `checked` counts every candidate; each one ends up in exactly one of the
/// other three buckets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReconciliationResult {
    pub checked: usize,
    pub resolved: usize,
    pub still_pending: usize,
    pub failures: usize,
}
