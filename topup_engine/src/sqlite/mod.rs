//! SQLite backend for the topup engine.
mod sqlite_impl;

pub mod db;
pub use sqlite_impl::SqliteDatabase;
