//! # Storage and vendor interfaces.
//!
//! The traits in this module define what a backend has to provide for the topup engine to work.
//!
//! * [`CredentialManagement`] stores merchant accounts (hashed secrets and vendor credentials).
//! * [`CatalogManagement`] stores the last synced price list per merchant.
//! * [`OrderManagement`] stores order records and serves the pending-order queue.
//! * [`ActivityLogManagement`] is the append-only activity log.
//! * [`StorefrontDatabase`] ties them together and adds the atomic "record + log" operations.
//!
//! [`VendorGateway`] is the seam for the wholesale vendor. The engine never talks HTTP itself.
mod activity_log_management;
mod catalog_management;
mod credential_management;
mod order_management;
mod storefront_database;
mod vendor_gateway;

mod data_objects;

pub use activity_log_management::ActivityLogManagement;
pub use catalog_management::CatalogManagement;
pub use credential_management::CredentialManagement;
pub use data_objects::{is_unique_violation, NewMerchantRecord, StoreError};
pub use order_management::OrderManagement;
pub use storefront_database::StorefrontDatabase;
pub use vendor_gateway::{TransactionReply, TransactionRequest, VendorError, VendorGateway};
