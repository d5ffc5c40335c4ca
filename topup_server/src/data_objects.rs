use std::fmt::Display;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use topup_common::Secret;
use topup_engine::{
    db_types::{CatalogSnapshot, LogCategory, OrderState, Role, SkuEntry},
    log_objects::LogQuery,
    order_objects::OrderOutcome,
};

use crate::errors::ServerError;

/// The envelope for every JSON reply: `{success, message?, status?, data?}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonResponse<T = ()> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<OrderState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl JsonResponse<()> {
    pub fn success<S: Display>(message: S) -> Self {
        Self { success: true, message: Some(message.to_string()), status: None, data: None }
    }

    pub fn failure<S: Display>(message: S) -> Self {
        Self { success: false, message: Some(message.to_string()), status: None, data: None }
    }
}

impl<T> JsonResponse<T> {
    pub fn with_data(data: T) -> Self {
        Self { success: true, message: None, status: None, data: Some(data) }
    }

    pub fn with_message<S: Display>(mut self, message: S) -> Self {
        self.message = Some(message.to_string());
        self
    }
}

impl JsonResponse<OrderOutcome> {
    /// An order that the vendor has processed. `status` says how far it got.
    pub fn order(outcome: OrderOutcome) -> Self {
        let message = outcome.message.clone();
        let status = outcome.status;
        Self { success: true, message: Some(message), status: Some(status), data: Some(outcome) }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: Secret<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub username: String,
    pub role: Role,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CheckIdRequest {
    pub game: String,
    #[serde(alias = "userId")]
    pub user_id: String,
    #[serde(default, alias = "zoneId")]
    pub zone_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NicknameResult {
    pub nickname: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatusRequest {
    pub ref_id: String,
}

/// A free-form event reported by the UI.
#[derive(Debug, Clone, Deserialize)]
pub struct LogRequest {
    #[serde(rename = "type")]
    pub category: LogCategory,
    pub message: String,
}

/// The filters a merchant may apply to their own log. The owner always comes from the access token.
///
/// With `latest=true` only the most recent entry for each order is returned.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MerchantLogParams {
    pub category: Option<LogCategory>,
    pub ref_id: Option<String>,
    pub limit: Option<u32>,
    #[serde(default)]
    pub latest: bool,
}

impl MerchantLogParams {
    pub fn into_query(self, owner: &str) -> LogQuery {
        LogQuery { owner: Some(owner.to_string()), category: self.category, ref_id: self.ref_id, limit: self.limit }
    }
}

/// `GET /api/products` filters. A brand is only meaningful within a category.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogViewParams {
    pub category: Option<String>,
    pub brand: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum CatalogView<'a> {
    Overview {
        owner: &'a str,
        categories: Vec<String>,
        products: &'a [SkuEntry],
        updated_at: DateTime<Utc>,
    },
    Brands {
        category: &'a str,
        brands: Vec<String>,
    },
    Products {
        category: &'a str,
        brand: &'a str,
        products: Vec<&'a SkuEntry>,
    },
}

impl CatalogViewParams {
    pub fn view<'a>(&'a self, catalog: &'a CatalogSnapshot) -> Result<CatalogView<'a>, ServerError> {
        let category = self.category.as_deref().map(str::trim).filter(|c| !c.is_empty());
        let brand = self.brand.as_deref().map(str::trim).filter(|b| !b.is_empty());
        match (category, brand) {
            (None, None) => Ok(CatalogView::Overview {
                owner: &catalog.owner,
                categories: catalog.categories(),
                products: &catalog.products,
                updated_at: catalog.updated_at,
            }),
            (Some(category), None) => Ok(CatalogView::Brands { category, brands: catalog.brands(category) }),
            (Some(category), Some(brand)) => {
                Ok(CatalogView::Products { category, brand, products: catalog.products(brand, category) })
            },
            (None, Some(_)) => Err(ServerError::ValidationError("A brand filter needs a category".to_string())),
        }
    }
}
