mod api;
mod config;
mod error;
mod nickname;
mod signature;

mod data_objects;

pub use api::DigiflazzApi;
pub use config::DigiflazzConfig;
pub use data_objects::{DigiflazzCredentials, PriceListEntry, TransactionData, TransactionRequest};
pub use error::DigiflazzApiError;
pub use nickname::{NicknameApi, NicknameGame};
pub use signature::{sign, SignatureTag};
