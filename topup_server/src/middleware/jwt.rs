//! Access token middleware.
//!
//! Wrap the authenticated scope with this middleware. It reads the access token from the `topup_access_token`
//! header, falling back to an `Authorization: Bearer` header, and verifies it. Verified claims are inserted into the
//! request extensions for the [`super::AclMiddlewareFactory`] and for handlers that take [`JwtClaims`].
//!
//! Requests without a valid token are answered with 401 before they reach the route.

use std::{
    future::{ready, Ready},
    rc::Rc,
};

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::AUTHORIZATION,
    Error,
    HttpMessage,
};
use futures::future::LocalBoxFuture;
use log::{trace, warn};

use crate::{
    auth::{JwtClaims, TokenVerifier, ACCESS_TOKEN_HEADER},
    errors::{AuthError, ServerError},
};

pub struct JwtAuthMiddlewareFactory {
    verifier: TokenVerifier,
}

impl JwtAuthMiddlewareFactory {
    pub fn new(verifier: TokenVerifier) -> Self {
        JwtAuthMiddlewareFactory { verifier }
    }
}

impl<S, B> Transform<S, ServiceRequest> for JwtAuthMiddlewareFactory
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Error = Error;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;
    type InitError = ();
    type Response = ServiceResponse<B>;
    type Transform = JwtAuthMiddlewareService<S>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtAuthMiddlewareService { verifier: self.verifier.clone(), service: Rc::new(service) }))
    }
}

pub struct JwtAuthMiddlewareService<S> {
    verifier: TokenVerifier,
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for JwtAuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;
    type Response = ServiceResponse<B>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let claims = access_token(&req).ok_or(AuthError::MissingToken).and_then(|t| self.verifier.verify(&t));
        Box::pin(async move {
            match claims {
                Ok(claims) => {
                    trace!("💻️ Access token accepted for {} ({:?})", claims.sub, claims.role);
                    req.extensions_mut().insert::<JwtClaims>(claims);
                    service.call(req).await
                },
                Err(e) => {
                    warn!("💻️ Rejected request to {}. {e}", req.path());
                    Err(ServerError::AuthenticationError(e).into())
                },
            }
        })
    }
}

fn access_token(req: &ServiceRequest) -> Option<String> {
    let headers = req.headers();
    headers.get(ACCESS_TOKEN_HEADER).and_then(|v| v.to_str().ok()).map(|s| s.trim().to_string()).or_else(|| {
        headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.strip_prefix("Bearer "))
            .map(|s| s.trim().to_string())
    })
}
