//! Connects the engine's [`VendorGateway`] to the Digiflazz HTTP client.
use digiflazz_tools::{
    DigiflazzApi,
    DigiflazzApiError,
    DigiflazzConfig,
    DigiflazzCredentials,
    PriceListEntry,
    TransactionData,
    TransactionRequest as DigiflazzTransaction,
};
use topup_engine::{
    db_types::{Rupiah, SkuEntry, VendorCredentials},
    traits::{TransactionReply, TransactionRequest, VendorError, VendorGateway},
};

#[derive(Clone)]
pub struct DigiflazzGateway {
    api: DigiflazzApi,
}

impl DigiflazzGateway {
    pub fn new(config: DigiflazzConfig) -> Result<Self, DigiflazzApiError> {
        Ok(Self { api: DigiflazzApi::new(config)? })
    }
}

impl VendorGateway for DigiflazzGateway {
    async fn balance(&self, credentials: &VendorCredentials) -> Result<Rupiah, VendorError> {
        self.api.check_balance(&account(credentials)).await.map_err(vendor_error)
    }

    async fn price_list(&self, credentials: &VendorCredentials) -> Result<Vec<SkuEntry>, VendorError> {
        let entries = self.api.price_list(&account(credentials)).await.map_err(vendor_error)?;
        Ok(entries.into_iter().map(sku_entry).collect())
    }

    async fn submit_transaction(
        &self,
        credentials: &VendorCredentials,
        request: &TransactionRequest,
    ) -> Result<TransactionReply, VendorError> {
        let tx = DigiflazzTransaction::new(
            request.buyer_sku_code.as_str(),
            request.customer_no.as_str(),
            request.ref_id.as_str(),
        );
        let data = self.api.transaction(&account(credentials), &tx).await.map_err(vendor_error)?;
        Ok(transaction_reply(data))
    }
}

fn account(credentials: &VendorCredentials) -> DigiflazzCredentials {
    DigiflazzCredentials { username: credentials.username.clone(), api_key: credentials.api_key.clone() }
}

fn sku_entry(entry: PriceListEntry) -> SkuEntry {
    SkuEntry {
        brand: entry.brand,
        category: entry.category,
        product_name: entry.product_name,
        price: Rupiah::from(entry.price),
        seller_product_status: entry.seller_product_status,
        buyer_sku_code: entry.buyer_sku_code,
        buyer_product_status: entry.buyer_product_status,
        desc: entry.desc,
    }
}

fn transaction_reply(data: TransactionData) -> TransactionReply {
    TransactionReply {
        rc: data.rc,
        sn: data.sn.filter(|sn| !sn.trim().is_empty()),
        status: data.status,
        message: data.message,
        price: data.price.map(Rupiah::from),
    }
}

fn vendor_error(e: DigiflazzApiError) -> VendorError {
    match e {
        DigiflazzApiError::Rejected { rc, message } => VendorError::Rejected { rc, message },
        DigiflazzApiError::MissingData(message) => VendorError::MissingData(message),
        e => VendorError::Transport(e.to_string()),
    }
}
