//! Helpers for tests, here and in the crates that build on the engine.
pub mod prepare_env;
pub mod scripted_vendor;

#[cfg(test)]
pub mod mocks;
