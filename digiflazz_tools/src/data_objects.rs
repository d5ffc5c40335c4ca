use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use topup_common::Secret;

use crate::DigiflazzApiError;

/// A reseller's vendor account. Passed explicitly with every call; the client never stores one.
#[derive(Debug, Clone)]
pub struct DigiflazzCredentials {
    pub username: String,
    pub api_key: Secret<String>,
}

impl DigiflazzCredentials {
    pub fn new<S: Into<String>>(username: S, api_key: S) -> Self {
        Self { username: username.into(), api_key: Secret::new(api_key.into()) }
    }
}

/// One row of the `/price-list` reply. Only the fields the storefront reads are required.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct PriceListEntry {
    pub product_name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default, rename = "type")]
    pub product_type: Option<String>,
    #[serde(default)]
    pub seller_name: Option<String>,
    #[serde(deserialize_with = "de_amount")]
    pub price: i64,
    pub buyer_sku_code: String,
    #[serde(default)]
    pub buyer_product_status: Option<bool>,
    #[serde(default)]
    pub seller_product_status: bool,
    #[serde(default)]
    pub unlimited_stock: Option<bool>,
    #[serde(default)]
    pub stock: Option<i64>,
    #[serde(default)]
    pub multi: Option<bool>,
    #[serde(default)]
    pub start_cut_off: Option<String>,
    #[serde(default)]
    pub end_cut_off: Option<String>,
    #[serde(default)]
    pub desc: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TransactionRequest {
    pub buyer_sku_code: String,
    pub customer_no: String,
    pub ref_id: String,
}

impl TransactionRequest {
    pub fn new<S: Into<String>>(buyer_sku_code: S, customer_no: S, ref_id: S) -> Self {
        Self { buyer_sku_code: buyer_sku_code.into(), customer_no: customer_no.into(), ref_id: ref_id.into() }
    }
}

/// The `data` object of a `/transaction` reply, returned raw. Classification is the caller's business.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct TransactionData {
    #[serde(default)]
    pub ref_id: Option<String>,
    #[serde(default)]
    pub customer_no: Option<String>,
    #[serde(default)]
    pub buyer_sku_code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub rc: Option<String>,
    #[serde(default)]
    pub sn: Option<String>,
    #[serde(default, deserialize_with = "de_opt_amount")]
    pub price: Option<i64>,
    #[serde(default, deserialize_with = "de_opt_amount")]
    pub buyer_last_saldo: Option<i64>,
}

#[derive(Serialize)]
pub(crate) struct CommandBody<'a> {
    pub cmd: &'a str,
    pub username: &'a str,
    pub sign: String,
}

#[derive(Serialize)]
pub(crate) struct TransactionBody<'a> {
    pub username: &'a str,
    pub buyer_sku_code: &'a str,
    pub customer_no: &'a str,
    pub ref_id: &'a str,
    pub sign: String,
}

/// Extracts the vendor's error message (and code, if any) from either `data.message` or a top-level `message`.
pub(crate) fn rejection(reply: &Value) -> DigiflazzApiError {
    let data = &reply["data"];
    let message = data["message"]
        .as_str()
        .or_else(|| reply["message"].as_str())
        .unwrap_or("no message given")
        .to_string();
    let rc = data["rc"].as_str().or_else(|| reply["rc"].as_str()).map(String::from);
    DigiflazzApiError::Rejected { rc, message }
}

pub(crate) fn amount_from_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

fn de_amount<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    amount_from_value(&value).ok_or_else(|| serde::de::Error::custom(format!("invalid amount: {value}")))
}

fn de_opt_amount<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(v) => amount_from_value(&v).map(Some).ok_or_else(|| serde::de::Error::custom(format!("invalid amount: {v}"))),
    }
}
