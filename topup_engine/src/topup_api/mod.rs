//! # Topup engine public API
//!
//! The `topup_api` module exposes the programmatic API of the topup engine. The API is modular, so that clients of the
//! API can pick and choose the functionality they want.
//!
//! * [`credential_api`] manages merchant accounts, logins and the transaction PIN gate.
//! * [`catalog_api`] syncs the vendor price list into a per-merchant catalog snapshot.
//! * [`order_flow_api`] places orders, checks on them and reconciles pending orders.
//! * [`activity_log_api`] appends to and queries the activity log.
//!
//! # API usage
//!
//! An API instance is created by supplying a database backend that implements the backend traits required by the
//! API (and, for the vendor-facing APIs, a [`crate::traits::VendorGateway`]).
//!
//! ```rust,ignore
//! use topup_engine::{CredentialApi, SqliteDatabase};
//! let db = SqliteDatabase::new_with_url(...).await?;
//! let api = CredentialApi::new(db);
//! let merchants = api.list_merchants().await?;
//! ```

pub mod activity_log_api;
pub mod catalog_api;
pub mod credential_api;
pub mod errors;
pub mod log_objects;
pub mod order_flow_api;
pub mod order_objects;
