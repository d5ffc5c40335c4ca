//! # Topup storefront server
//! This crate hosts the HTTP server for the topup storefront. It is responsible for:
//! * Logging admins and merchants in and issuing access tokens.
//! * Letting the admin manage merchant accounts and read the activity log.
//! * Letting merchants sync their catalog, check their balance, look up player ids, place orders and follow them up.
//! * Running the reconciliation worker that resolves pending orders in the background.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! * `/health`: A health check route that returns a 200 OK response.
//! * `/auth/login`: Exchange a username and password for an access token.
//! * `/api/...`: Everything else. Requires an access token in the `topup_access_token` header. See [routes].

pub mod auth;
pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod integrations;
pub mod middleware;
pub mod reconciliation_worker;
pub mod routes;
pub mod server;

#[cfg(test)]
mod endpoint_tests;
