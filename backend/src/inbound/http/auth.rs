//! Bearer-token authentication for protected gateway routes.
//!
//! [`BearerAuth`] runs before every handler in the scope it wraps. Requests
//! without a valid `Authorization: Bearer <token>` header are answered with
//! 401 and never reach the handler. Accepted requests carry an
//! [`AuthenticatedUser`] in their extensions, which handlers read through the
//! extractor of the same name.

use std::sync::Arc;
use std::task::{Context, Poll};

use actix_web::body::EitherBody;
use actix_web::dev::{Payload, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpMessage, HttpRequest, ResponseError};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::debug;

use crate::domain::ports::{TokenVerificationError, TokenVerifier};
use crate::domain::{Error, UserId};

const BEARER_SCHEME: &str = "Bearer";

/// Why a request was turned away.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Rejection {
    MissingHeader,
    MalformedHeader,
    Token(TokenVerificationError),
}

impl Rejection {
    fn message(&self) -> &'static str {
        match self {
            Self::MissingHeader => "Authorization header is missing",
            Self::MalformedHeader => "Invalid authorization header format",
            Self::Token(TokenVerificationError::BadSignature) => "Invalid token signature",
            Self::Token(TokenVerificationError::BadClaims) => "Invalid token claims",
            Self::Token(_) => "Invalid token",
        }
    }
}

/// Pull the token out of `Bearer <token>`. Exactly two space-separated parts
/// are accepted and the scheme is case-sensitive.
fn bearer_token(req: &ServiceRequest) -> Result<&str, Rejection> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .ok_or(Rejection::MissingHeader)?;
    let value = header.to_str().map_err(|_| Rejection::MalformedHeader)?;
    if value.is_empty() {
        return Err(Rejection::MissingHeader);
    }
    let mut parts = value.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(BEARER_SCHEME), Some(token), None) if !token.is_empty() => Ok(token),
        _ => Err(Rejection::MalformedHeader),
    }
}

/// Identity of the caller, established by [`BearerAuth`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser(pub UserId);

impl AuthenticatedUser {
    pub fn id(self) -> UserId {
        self.0
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        // Only reachable without an identity when a route was mounted outside
        // the authenticated scope.
        ready(
            req.extensions()
                .get::<AuthenticatedUser>()
                .copied()
                .ok_or_else(|| Error::unauthorized("Unauthorized")),
        )
    }
}

/// Middleware factory guarding a scope with bearer-token checks.
///
/// # Examples
/// ```ignore
/// web::scope("/calls").wrap(BearerAuth::new(verifier))
/// ```
#[derive(Clone)]
pub struct BearerAuth {
    verifier: Arc<dyn TokenVerifier>,
}

impl BearerAuth {
    pub fn new(verifier: Arc<dyn TokenVerifier>) -> Self {
        Self { verifier }
    }
}

impl<S, B> Transform<S, ServiceRequest> for BearerAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = BearerAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(BearerAuthMiddleware {
            service,
            verifier: Arc::clone(&self.verifier),
        }))
    }
}

/// Service wrapper produced by [`BearerAuth`].
pub struct BearerAuthMiddleware<S> {
    service: S,
    verifier: Arc<dyn TokenVerifier>,
}

impl<S> BearerAuthMiddleware<S> {
    fn authenticate(&self, req: &ServiceRequest) -> Result<UserId, Rejection> {
        let token = bearer_token(req)?;
        self.verifier.verify(token).map_err(Rejection::Token)
    }
}

impl<S, B> Service<ServiceRequest> for BearerAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        match self.authenticate(&req) {
            Ok(user_id) => {
                req.extensions_mut().insert(AuthenticatedUser(user_id));
                let fut = self.service.call(req);
                Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) })
            }
            Err(rejection) => Box::pin(async move {
                debug!(?rejection, path = %req.path(), "rejecting unauthenticated request");
                // Built inside the future so the error picks up the request's
                // trace id.
                let response = Error::unauthorized(rejection.message()).error_response();
                Ok(req.into_response(response).map_into_right_body())
            }),
        }
    }
}
