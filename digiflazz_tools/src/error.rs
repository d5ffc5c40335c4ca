use thiserror::Error;

#[derive(Debug, Error)]
pub enum DigiflazzApiError {
    #[error("Could not initialize client: {0}")]
    Initialization(String),
    #[error("Could not reach the vendor: {0}")]
    Transport(String),
    #[error("Query failed. Error {status}. {message}")]
    QueryError { status: u16, message: String },
    #[error("Could not deserialize JSON: {0}")]
    JsonError(String),
    #[error("The vendor rejected the request: {message}")]
    Rejected { rc: Option<String>, message: String },
    #[error("The vendor response did not contain any data. {0}")]
    MissingData(String),
    #[error("Nickname lookup is not supported for {0}")]
    UnsupportedGame(String),
    #[error("A zone id is required for {0}")]
    MissingZoneId(String),
}

impl DigiflazzApiError {
    /// True when the request never produced a vendor answer (network failure, timeout or an unparseable reply).
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::QueryError { .. } | Self::JsonError(_))
    }
}
