//! Topup Engine
//!
//! The topup engine is the core of a storefront that resells prepaid digital goods (game top-ups, mobile credit,
//! e-money) bought from a wholesale vendor. It is vendor-agnostic: the vendor is reached through the
//! [`traits::VendorGateway`] trait.
//!
//! The library is divided into two main sections:
//! 1. Storage ([`mod@traits`] and the SQLite backend). You should never need to access the database directly.
//!    Instead, use the public API provided by the engine. The data types used in the database are defined in the
//!    [`mod@db_types`] module and are public.
//! 2. The engine public API ([`mod@topup_api`]). Merchant credentials, catalog sync, the order workflow (placement,
//!    status checks and reconciliation of pending orders) and the activity log.
//!
//! The engine also provides a set of events that can be subscribed to. For example, when an order reaches a terminal
//! state, an `OrderResolvedEvent` is emitted.
pub mod db_types;
pub mod events;
pub mod helpers;
pub mod topup_api;
pub mod traits;

#[cfg(feature = "sqlite")]
mod sqlite;

#[cfg(any(feature = "test_utils", test))]
pub mod test_utils;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteDatabase;
pub use topup_api::{
    activity_log_api::ActivityLogApi,
    catalog_api::CatalogApi,
    credential_api::CredentialApi,
    errors::{ActivityLogError, CatalogError, CredentialError, OrderFlowError},
    log_objects,
    order_flow_api::OrderFlowApi,
    order_objects,
};
pub use traits::{
    ActivityLogManagement,
    CatalogManagement,
    CredentialManagement,
    OrderManagement,
    StoreError,
    StorefrontDatabase,
    VendorError,
    VendorGateway,
};
