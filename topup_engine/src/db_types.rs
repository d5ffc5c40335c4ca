use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use thiserror::Error;
pub use topup_common::{Rupiah, Secret};

#[derive(Debug, Clone, Error)]
#[error("Invalid value: {0}")]
pub struct ConversionError(String);

//--------------------------------------        Role           ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Merchant,
}

impl Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::Merchant => write!(f, "merchant"),
        }
    }
}

impl FromStr for Role {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "merchant" => Ok(Self::Merchant),
            s => Err(ConversionError(format!("Invalid role: {s}"))),
        }
    }
}

//--------------------------------------      Merchant         ---------------------------------------------------------
/// A reseller account, as stored. The password and PIN are bcrypt hashes.
#[derive(Debug, Clone)]
pub struct Merchant {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub pin_hash: String,
    pub vendor_username: String,
    pub vendor_key: Secret<String>,
    pub created_at: DateTime<Utc>,
}

impl Merchant {
    pub fn profile(&self) -> MerchantProfile {
        MerchantProfile {
            id: self.id,
            username: self.username.clone(),
            vendor_username: self.vendor_username.clone(),
            created_at: self.created_at,
        }
    }
}

/// The public view of a merchant. Never carries any secrets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct MerchantProfile {
    pub id: i64,
    pub username: String,
    pub vendor_username: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewMerchant {
    pub username: String,
    pub password: Secret<String>,
    pub pin: Secret<String>,
    pub vendor_username: String,
    pub vendor_key: Secret<String>,
}

impl NewMerchant {
    pub fn new<S: Into<String>>(username: S, password: S, pin: S, vendor_username: S, vendor_key: S) -> Self {
        Self {
            username: username.into(),
            password: Secret::new(password.into()),
            pin: Secret::new(pin.into()),
            vendor_username: vendor_username.into(),
            vendor_key: Secret::new(vendor_key.into()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct VendorCredentials {
    pub username: String,
    pub api_key: Secret<String>,
}

//--------------------------------------      SkuEntry         ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkuEntry {
    pub brand: String,
    pub category: String,
    pub product_name: String,
    pub price: Rupiah,
    pub seller_product_status: bool,
    pub buyer_sku_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buyer_product_status: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
}

//--------------------------------------   CatalogSnapshot     ---------------------------------------------------------
/// The last price list synced for a merchant. Only active SKUs are kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    pub owner: String,
    pub products: Vec<SkuEntry>,
    pub updated_at: DateTime<Utc>,
}

pub const GAMES_CATEGORY: &str = "Games";

impl CatalogSnapshot {
    /// Distinct categories, alphabetical, with "Games" always first.
    pub fn categories(&self) -> Vec<String> {
        let mut categories = self.products.iter().map(|p| p.category.clone()).collect::<Vec<_>>();
        categories.sort();
        categories.dedup();
        if let Some(pos) = categories.iter().position(|c| c == GAMES_CATEGORY) {
            let games = categories.remove(pos);
            categories.insert(0, games);
        }
        categories
    }

    pub fn brands(&self, category: &str) -> Vec<String> {
        let mut brands =
            self.products.iter().filter(|p| p.category == category).map(|p| p.brand.clone()).collect::<Vec<_>>();
        brands.sort();
        brands.dedup();
        brands
    }

    /// The SKUs for a brand within a category, cheapest first.
    pub fn products(&self, brand: &str, category: &str) -> Vec<&SkuEntry> {
        let mut products = self.products.iter().filter(|p| p.brand == brand && p.category == category).collect::<Vec<_>>();
        products.sort_by_key(|p| p.price);
        products
    }

    pub fn find_sku(&self, code: &str) -> Option<&SkuEntry> {
        self.products.iter().find(|p| p.buyer_sku_code == code)
    }
}

//--------------------------------------     OrderState        ---------------------------------------------------------
pub const SUCCESS_CODE: &str = "00";
pub const PENDING_CODE: &str = "03";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderState {
    Success,
    Pending,
    Failed,
}

impl OrderState {
    /// Maps a vendor result code to an order state. `00` is a success, `03` is still in progress, and anything
    /// else (including no code at all) is a failure.
    pub fn classify(rc: Option<&str>) -> Self {
        match rc {
            Some(SUCCESS_CODE) => OrderState::Success,
            Some(PENDING_CODE) => OrderState::Pending,
            _ => OrderState::Failed,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, OrderState::Pending)
    }
}

impl Display for OrderState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderState::Success => write!(f, "SUCCESS"),
            OrderState::Pending => write!(f, "PENDING"),
            OrderState::Failed => write!(f, "FAILED"),
        }
    }
}

impl FromStr for OrderState {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SUCCESS" => Ok(Self::Success),
            "PENDING" => Ok(Self::Pending),
            "FAILED" => Ok(Self::Failed),
            s => Err(ConversionError(format!("Invalid order state: {s}"))),
        }
    }
}

//--------------------------------------     OrderRecord       ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct OrderRecord {
    pub id: i64,
    pub ref_id: String,
    pub owner: String,
    pub buyer_sku_code: String,
    pub customer_no: String,
    pub price: Option<Rupiah>,
    pub sn: Option<String>,
    pub message: Option<String>,
    pub rc: Option<String>,
    pub vendor_status: Option<String>,
    pub status: OrderState,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The vendor-supplied part of an order record. Applied on first classification and on every state change.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderOutcomeFields {
    pub price: Option<Rupiah>,
    pub sn: Option<String>,
    pub message: Option<String>,
    pub rc: Option<String>,
    pub vendor_status: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewOrderRecord {
    pub ref_id: String,
    pub owner: String,
    pub buyer_sku_code: String,
    pub customer_no: String,
    pub status: OrderState,
    pub outcome: OrderOutcomeFields,
}

//--------------------------------------     LogCategory       ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum LogCategory {
    Transaction,
    Auth,
    System,
    Error,
}

impl Display for LogCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogCategory::Transaction => write!(f, "transaction"),
            LogCategory::Auth => write!(f, "auth"),
            LogCategory::System => write!(f, "system"),
            LogCategory::Error => write!(f, "error"),
        }
    }
}

impl FromStr for LogCategory {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "transaction" => Ok(Self::Transaction),
            "auth" => Ok(Self::Auth),
            "system" => Ok(Self::System),
            "error" => Ok(Self::Error),
            _ => Err(ConversionError(format!("Invalid log category: {s}"))),
        }
    }
}

//--------------------------------------      LogEntry         ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct LogEntry {
    pub id: i64,
    pub category: LogCategory,
    pub message: String,
    pub ref_id: Option<String>,
    pub status: Option<OrderState>,
    pub customer_no: Option<String>,
    pub buyer_sku_code: Option<String>,
    pub owner: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewLogEntry {
    pub category: LogCategory,
    pub message: String,
    pub ref_id: Option<String>,
    pub status: Option<OrderState>,
    pub customer_no: Option<String>,
    pub buyer_sku_code: Option<String>,
    pub owner: Option<String>,
}

impl NewLogEntry {
    pub fn new<S: Into<String>>(category: LogCategory, message: S) -> Self {
        Self {
            category,
            message: message.into(),
            ref_id: None,
            status: None,
            customer_no: None,
            buyer_sku_code: None,
            owner: None,
        }
    }

    /// A transaction entry for an order. The message keeps the readable
    /// `[STATUS] Order <ref_id> - <sku>. <detail> | <customer_no>` shape, but readers should use the structured fields.
    pub fn for_order(category: LogCategory, order: &NewOrderRecord, status: OrderState, detail: &str) -> Self {
        let message =
            format!("[{status}] Order {} - {}. {detail} | {}", order.ref_id, order.buyer_sku_code, order.customer_no);
        Self {
            category,
            message,
            ref_id: Some(order.ref_id.clone()),
            status: Some(status),
            customer_no: Some(order.customer_no.clone()),
            buyer_sku_code: Some(order.buyer_sku_code.clone()),
            owner: Some(order.owner.clone()),
        }
    }

    pub fn with_owner<S: Into<String>>(mut self, owner: S) -> Self {
        self.owner = Some(owner.into());
        self
    }

    pub fn with_ref_id<S: Into<String>>(mut self, ref_id: S) -> Self {
        self.ref_id = Some(ref_id.into());
        self
    }
}

impl From<&OrderRecord> for NewOrderRecord {
    fn from(order: &OrderRecord) -> Self {
        Self {
            ref_id: order.ref_id.clone(),
            owner: order.owner.clone(),
            buyer_sku_code: order.buyer_sku_code.clone(),
            customer_no: order.customer_no.clone(),
            status: order.status,
            outcome: OrderOutcomeFields {
                price: order.price,
                sn: order.sn.clone(),
                message: order.message.clone(),
                rc: order.rc.clone(),
                vendor_status: order.vendor_status.clone(),
            },
        }
    }
}
