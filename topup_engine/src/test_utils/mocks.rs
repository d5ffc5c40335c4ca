use mockall::mock;

use crate::{
    db_types::{Rupiah, SkuEntry, VendorCredentials},
    traits::{TransactionReply, TransactionRequest, VendorError, VendorGateway},
};

mock! {
    pub Vendor {}
    impl VendorGateway for Vendor {
        async fn balance(&self, credentials: &VendorCredentials) -> Result<Rupiah, VendorError>;
        async fn price_list(&self, credentials: &VendorCredentials) -> Result<Vec<SkuEntry>, VendorError>;
        async fn submit_transaction(&self, credentials: &VendorCredentials, request: &TransactionRequest) -> Result<TransactionReply, VendorError>;
    }
}
