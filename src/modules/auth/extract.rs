//! Session verification as an Axum extractor.

use std::sync::Arc;

use axum::extract::{FromRef, FromRequestParts};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use libris_auth::{AuthError, SessionIssuer};
use libris_http::error::AppError;

/// Verified caller identity, extracted from `Authorization: Bearer <token>`.
///
/// Any handler taking this parameter requires a valid session: the request
/// is rejected with 401 before the handler body runs, so no ownership check
/// or mutation can ever precede session verification.
#[derive(Debug, Clone)]
pub struct Identity(pub String);

impl<S> FromRequestParts<S> for Identity
where
    Arc<SessionIssuer>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let sessions = Arc::<SessionIssuer>::from_ref(state);

        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or_else(|| unauthenticated(&AuthError::MissingToken))?;

        sessions
            .verify(token)
            .map(Identity)
            .map_err(|err| unauthenticated(&err))
    }
}

/// Map a token failure onto the 401 taxonomy. The message stays as coarse
/// as the category; nothing about the signature or claims leaks out.
pub(crate) fn unauthenticated(err: &AuthError) -> AppError {
    let code = match err {
        AuthError::MissingToken => "missing_token",
        AuthError::ExpiredToken => "expired_token",
        _ => "malformed_token",
    };
    AppError::unauthenticated(code, err.to_string())
}
