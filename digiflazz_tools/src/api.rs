use std::sync::Arc;

use log::*;
use reqwest::{
    header::{HeaderMap, HeaderValue},
    Client,
};
use serde::Serialize;
use serde_json::Value;
use topup_common::Rupiah;

use crate::{
    config::DigiflazzConfig,
    data_objects::{amount_from_value, rejection, CommandBody, TransactionBody},
    signature::{sign, SignatureTag},
    DigiflazzApiError,
    DigiflazzCredentials,
    PriceListEntry,
    TransactionData,
    TransactionRequest,
};

#[derive(Clone)]
pub struct DigiflazzApi {
    config: DigiflazzConfig,
    client: Arc<Client>,
}

impl DigiflazzApi {
    pub fn new(config: DigiflazzConfig) -> Result<Self, DigiflazzApiError> {
        let mut headers = HeaderMap::with_capacity(1);
        headers.insert("Content-Type", HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| DigiflazzApiError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client) })
    }

    pub fn config(&self) -> &DigiflazzConfig {
        &self.config
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_url)
    }

    /// Posts `body` to `path` and returns the decoded JSON reply.
    ///
    /// The vendor reports many failures with a non-2xx status *and* a JSON body explaining the problem, so a JSON
    /// body is always returned to the caller. Only non-JSON error bodies become [`DigiflazzApiError::QueryError`].
    pub async fn post<B: Serialize>(&self, path: &str, body: &B) -> Result<Value, DigiflazzApiError> {
        let url = self.url(path);
        trace!("🛰️ Sending vendor request: {url}");
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| DigiflazzApiError::Transport(e.to_string()))?;
        let status = response.status();
        let text = response.text().await.map_err(|e| DigiflazzApiError::Transport(e.to_string()))?;
        trace!("🛰️ Vendor replied {status}: {text}");
        match serde_json::from_str::<Value>(&text) {
            Ok(value) => Ok(value),
            Err(_) if !status.is_success() => {
                Err(DigiflazzApiError::QueryError { status: status.as_u16(), message: text })
            },
            Err(e) => Err(DigiflazzApiError::JsonError(e.to_string())),
        }
    }

    pub async fn check_balance(&self, account: &DigiflazzCredentials) -> Result<Rupiah, DigiflazzApiError> {
        let body = CommandBody {
            cmd: "deposit",
            username: &account.username,
            sign: sign(&account.username, account.api_key.reveal(), SignatureTag::Deposit.as_str()),
        };
        debug!("🛰️ Checking deposit balance for {}", account.username);
        let reply = self.post("/cek-saldo", &body).await?;
        let balance = amount_from_value(&reply["data"]["deposit"]).ok_or_else(|| rejection(&reply))?;
        info!("🛰️ Deposit balance for {} is {balance}", account.username);
        Ok(Rupiah::from(balance))
    }

    pub async fn price_list(&self, account: &DigiflazzCredentials) -> Result<Vec<PriceListEntry>, DigiflazzApiError> {
        let body = CommandBody {
            cmd: "prepaid",
            username: &account.username,
            sign: sign(&account.username, account.api_key.reveal(), SignatureTag::PriceList.as_str()),
        };
        debug!("🛰️ Fetching price list for {}", account.username);
        let mut reply = self.post("/price-list", &body).await?;
        if !reply["data"].is_array() {
            return Err(rejection(&reply));
        }
        let entries = serde_json::from_value::<Vec<PriceListEntry>>(reply["data"].take())
            .map_err(|e| DigiflazzApiError::JsonError(e.to_string()))?;
        info!("🛰️ Fetched {} price list entries for {}", entries.len(), account.username);
        Ok(entries)
    }

    /// Submits (or re-submits) a transaction. The vendor treats a repeated `ref_id` as a status query, so this is
    /// used both to place an order and to check on it later.
    pub async fn transaction(
        &self,
        account: &DigiflazzCredentials,
        request: &TransactionRequest,
    ) -> Result<TransactionData, DigiflazzApiError> {
        let body = TransactionBody {
            username: &account.username,
            buyer_sku_code: &request.buyer_sku_code,
            customer_no: &request.customer_no,
            ref_id: &request.ref_id,
            sign: sign(&account.username, account.api_key.reveal(), SignatureTag::Transaction(&request.ref_id).as_str()),
        };
        debug!("🛰️ Sending transaction {} ({}) for {}", request.ref_id, request.buyer_sku_code, request.customer_no);
        let mut reply = self.post("/transaction", &body).await?;
        if !reply["data"].is_object() {
            let message = reply["message"].as_str().unwrap_or("no data in transaction reply").to_string();
            return Err(DigiflazzApiError::MissingData(message));
        }
        let data = serde_json::from_value::<TransactionData>(reply["data"].take())
            .map_err(|e| DigiflazzApiError::JsonError(e.to_string()))?;
        debug!(
            "🛰️ Transaction {} replied rc={} status={}",
            request.ref_id,
            data.rc.as_deref().unwrap_or("none"),
            data.status.as_deref().unwrap_or("none")
        );
        Ok(data)
    }
}
