use thiserror::Error;

use crate::db_types::{OrderOutcomeFields, OrderState, Rupiah, SkuEntry, VendorCredentials};

#[derive(Debug, Clone, Error)]
pub enum VendorError {
    #[error("The vendor could not be reached: {0}")]
    Transport(String),
    #[error("The vendor reply did not contain any data: {0}")]
    MissingData(String),
    #[error("The vendor rejected the request: {message}")]
    Rejected { rc: Option<String>, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRequest {
    pub buyer_sku_code: String,
    pub customer_no: String,
    pub ref_id: String,
}

/// The raw `data` of a vendor transaction reply.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionReply {
    pub rc: Option<String>,
    pub sn: Option<String>,
    pub status: Option<String>,
    pub message: Option<String>,
    pub price: Option<Rupiah>,
}

impl TransactionReply {
    pub fn state(&self) -> OrderState {
        OrderState::classify(self.rc.as_deref())
    }

    pub fn outcome(&self) -> OrderOutcomeFields {
        OrderOutcomeFields {
            price: self.price,
            sn: self.sn.clone(),
            message: self.message.clone(),
            rc: self.rc.clone(),
            vendor_status: self.status.clone(),
        }
    }
}

/// The wholesale vendor, as seen by the engine. Credentials are supplied with every call.
///
/// Implementations must not retry; the order workflow decides what a failure means.
#[allow(async_fn_in_trait)]
pub trait VendorGateway {
    async fn balance(&self, credentials: &VendorCredentials) -> Result<Rupiah, VendorError>;

    async fn price_list(&self, credentials: &VendorCredentials) -> Result<Vec<SkuEntry>, VendorError>;

    /// Places the transaction, or reports on it if `ref_id` is already known to the vendor.
    async fn submit_transaction(
        &self,
        credentials: &VendorCredentials,
        request: &TransactionRequest,
    ) -> Result<TransactionReply, VendorError>;
}
