//! Access tokens.
//!
//! A successful login is exchanged for an HS256 JWT carrying the username (`sub`) and [`Role`]. Clients send it
//! back in the `topup_access_token` header (or as an `Authorization: Bearer` token). The
//! [`crate::middleware::JwtAuthMiddlewareFactory`] verifies it and places the [`JwtClaims`] in the request
//! extensions, where handlers pick them up as an extractor.
use std::future::{ready, Ready};

use actix_web::{dev::Payload, FromRequest, HttpMessage, HttpRequest};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use log::*;
use serde::{Deserialize, Serialize};
use topup_engine::{
    db_types::Role,
    topup_api::credential_api::{hash_secret, verify_secret},
};

use crate::{
    config::{AdminConfig, AuthConfig},
    errors::{AuthError, ServerError},
};

pub const ACCESS_TOKEN_HEADER: &str = "topup_access_token";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtClaims {
    /// The username of the admin or merchant.
    pub sub: String,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

impl JwtClaims {
    pub fn new<S: Into<String>>(sub: S, role: Role, lifetime: Duration) -> Self {
        let now = Utc::now();
        Self { sub: sub.into(), role, iat: now.timestamp(), exp: (now + lifetime).timestamp() }
    }
}

impl FromRequest for JwtClaims {
    type Error = ServerError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let claims = req.extensions().get::<JwtClaims>().cloned().ok_or_else(|| {
            warn!("💻️ No JWT claims found in request extensions. Is the route behind the auth middleware?");
            ServerError::AuthenticationError(AuthError::MissingToken)
        });
        ready(claims)
    }
}

pub struct TokenIssuer {
    key: EncodingKey,
    lifetime: Duration,
}

impl TokenIssuer {
    pub fn new(config: &AuthConfig) -> Self {
        Self { key: EncodingKey::from_secret(config.jwt_secret.reveal().as_bytes()), lifetime: config.token_expiry }
    }

    /// Issue a new access token for `username`.
    /// This method DOES NOT check the user's credentials. That must be done prior to calling `issue_token`.
    pub fn issue_token(&self, username: &str, role: Role) -> Result<String, AuthError> {
        let claims = JwtClaims::new(username, role, self.lifetime);
        encode(&Header::new(Algorithm::HS256), &claims, &self.key).map_err(|e| AuthError::CouldNotIssueToken(e.to_string()))
    }
}

#[derive(Clone)]
pub struct TokenVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp", "sub"]);
        Self { key: DecodingKey::from_secret(config.jwt_secret.reveal().as_bytes()), validation }
    }

    pub fn verify(&self, token: &str) -> Result<JwtClaims, AuthError> {
        let data = decode::<JwtClaims>(token, &self.key, &self.validation).map_err(|e| {
            debug!("💻️ Access token rejected. {e}");
            AuthError::ValidationError(e.to_string())
        })?;
        Ok(data.claims)
    }
}

/// The admin login, with the password hashed once at start-up so it is never compared in plain text.
#[derive(Clone)]
pub struct AdminCredentials {
    username: String,
    password_hash: Option<String>,
}

impl AdminCredentials {
    pub async fn from_config(config: &AdminConfig, cost: u32) -> Result<Self, ServerError> {
        let password_hash = match &config.password {
            Some(password) => Some(
                hash_secret(password.clone(), cost)
                    .await
                    .map_err(|e| ServerError::InitializeError(format!("Could not hash the admin password. {e}")))?,
            ),
            None => None,
        };
        Ok(Self { username: config.username.clone(), password_hash })
    }

    pub fn is_admin(&self, username: &str) -> bool {
        self.username == username
    }

    pub async fn verify(&self, password: &str) -> Result<(), AuthError> {
        let hash = self.password_hash.as_deref().ok_or(AuthError::LoginDisabled)?;
        match verify_secret(password, hash).await {
            Ok(true) => Ok(()),
            Ok(false) => Err(AuthError::InvalidCredentials),
            Err(e) => {
                error!("💻️ Could not verify the admin password. {e}");
                Err(AuthError::InvalidCredentials)
            },
        }
    }
}
