use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use digiflazz_tools::DigiflazzApiError;
use log::error;
use serde_json::json;
use thiserror::Error;
use topup_engine::{db_types::OrderState, ActivityLogError, CatalogError, CredentialError, OrderFlowError};

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An error occurred on the backend of the server. {0}")]
    BackendError(String),
    #[error("Invalid server configuration. {0}")]
    ConfigurationError(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
    #[error("Could not read request body: {0}")]
    InvalidRequestBody(String),
    #[error("{0}")]
    ValidationError(String),
    #[error("Authentication Error. {0}")]
    AuthenticationError(#[from] AuthError),
    #[error("Insufficient Permissions. {0}")]
    InsufficientPermissions(String),
    #[error("The data was not found. {0}")]
    NoRecordFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("The vendor request failed. {0}")]
    VendorError(String),
    /// An order that could not be placed. Rendered with `status: FAILED`.
    #[error("{0}")]
    OrderRejected(Box<ServerError>),
}

impl ServerError {
    pub fn rejected_order(e: OrderFlowError) -> Self {
        Self::OrderRejected(Box::new(Self::from(e)))
    }
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BackendError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ConfigurationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            Self::ValidationError(_) => StatusCode::BAD_REQUEST,
            Self::AuthenticationError(e) => match e {
                AuthError::MissingToken => StatusCode::UNAUTHORIZED,
                AuthError::ValidationError(_) => StatusCode::UNAUTHORIZED,
                AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                AuthError::LoginDisabled => StatusCode::FORBIDDEN,
                AuthError::CouldNotIssueToken(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::InsufficientPermissions(_) => StatusCode::FORBIDDEN,
            Self::NoRecordFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::VendorError(_) => StatusCode::BAD_GATEWAY,
            Self::OrderRejected(e) => e.status_code(),
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            error!("💻️ {self}");
        }
        let body = match self {
            Self::OrderRejected(_) => {
                json!({ "success": false, "message": self.to_string(), "status": OrderState::Failed })
            },
            _ => json!({ "success": false, "message": self.to_string() }),
        };
        HttpResponse::build(status).insert_header(ContentType::json()).body(body.to_string())
    }
}

#[derive(Debug, Clone, Error)]
pub enum AuthError {
    #[error("No access token was provided.")]
    MissingToken,
    #[error("The access token is invalid. {0}")]
    ValidationError(String),
    #[error("Invalid username or password.")]
    InvalidCredentials,
    #[error("Admin login is disabled on this server.")]
    LoginDisabled,
    #[error("Could not issue an access token. {0}")]
    CouldNotIssueToken(String),
}

impl From<CredentialError> for ServerError {
    fn from(e: CredentialError) -> Self {
        match e {
            CredentialError::Validation(_) => Self::ValidationError(e.to_string()),
            CredentialError::DuplicateUsername(_) => Self::Conflict(e.to_string()),
            CredentialError::MerchantNotFound(_) | CredentialError::MerchantIdNotFound(_) => {
                Self::NoRecordFound(e.to_string())
            },
            CredentialError::AuthenticationFailed => Self::AuthenticationError(AuthError::InvalidCredentials),
            CredentialError::InvalidPin => Self::InsufficientPermissions(e.to_string()),
            CredentialError::MissingVendorCredentials(_) => Self::ConfigurationError(e.to_string()),
            CredentialError::HashingError(_) | CredentialError::DatabaseError(_) => Self::BackendError(e.to_string()),
        }
    }
}

impl From<CatalogError> for ServerError {
    fn from(e: CatalogError) -> Self {
        match e {
            CatalogError::Credentials(e) => Self::from(e),
            CatalogError::Vendor(e) => Self::VendorError(e.to_string()),
            CatalogError::CatalogNotFound(_) => Self::NoRecordFound(e.to_string()),
            CatalogError::DatabaseError(_) => Self::BackendError(e.to_string()),
        }
    }
}

impl From<OrderFlowError> for ServerError {
    fn from(e: OrderFlowError) -> Self {
        match e {
            OrderFlowError::Validation(_) => Self::ValidationError(e.to_string()),
            OrderFlowError::DuplicateReference(_) => Self::Conflict(e.to_string()),
            OrderFlowError::InvalidPin => Self::InsufficientPermissions(e.to_string()),
            OrderFlowError::Credentials(e) => Self::from(e),
            OrderFlowError::Vendor(e) => Self::VendorError(e.to_string()),
            OrderFlowError::OrderNotFound(_) => Self::NoRecordFound(e.to_string()),
            OrderFlowError::DatabaseError(_) => Self::BackendError(e.to_string()),
        }
    }
}

impl From<ActivityLogError> for ServerError {
    fn from(e: ActivityLogError) -> Self {
        match e {
            ActivityLogError::Validation(_) => Self::ValidationError(e.to_string()),
            ActivityLogError::DatabaseError(_) => Self::BackendError(e.to_string()),
        }
    }
}

impl From<DigiflazzApiError> for ServerError {
    fn from(e: DigiflazzApiError) -> Self {
        match e {
            DigiflazzApiError::UnsupportedGame(_) | DigiflazzApiError::MissingZoneId(_) => {
                Self::ValidationError(e.to_string())
            },
            DigiflazzApiError::Initialization(_) => Self::InitializeError(e.to_string()),
            e => Self::VendorError(e.to_string()),
        }
    }
}
