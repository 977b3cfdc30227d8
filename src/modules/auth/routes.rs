use anyhow::anyhow;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use tracing::{info, warn};

use libris_auth::AuthError;
use libris_http::error::AppError;

use super::models::{LoginRequest, LoginResponse};
use super::AuthState;

/// POST /api/auth/login
pub(super) async fn login(
    State(state): State<AuthState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, AppError> {
    let Json(request) =
        payload.map_err(|rejection| AppError::bad_request(rejection.body_text()))?;

    if request.identity.trim().is_empty() || request.secret.is_empty() {
        return Err(AppError::bad_request("identity and secret are required"));
    }

    match state.sessions.issue(&request.identity, &request.secret) {
        Ok(token) => {
            info!(identity = %request.identity, "login succeeded");
            Ok(Json(LoginResponse {
                token,
                identity: request.identity,
            }))
        }
        Err(AuthError::Signing) => Err(AppError::Internal(anyhow!("token signing failed"))),
        Err(_) => {
            warn!(identity = %request.identity, "login failed");
            // Same answer whether the identity or the secret was wrong.
            Err(AppError::bad_request("invalid credentials"))
        }
    }
}
