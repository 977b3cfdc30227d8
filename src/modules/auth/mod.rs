pub mod extract;
pub mod models;
mod routes;

use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::FromRef;
use axum::routing::post;
use axum::Router;
use serde_json::json;

use libris_auth::SessionIssuer;
use libris_kernel::{InitCtx, Module};

/// Shared state for auth routes.
#[derive(Clone)]
pub struct AuthState {
    pub sessions: Arc<SessionIssuer>,
}

impl FromRef<AuthState> for Arc<SessionIssuer> {
    fn from_ref(state: &AuthState) -> Self {
        state.sessions.clone()
    }
}

/// Session issuance module: exchanges configured credentials for signed,
/// time-limited bearer tokens.
pub struct AuthModule {
    sessions: Arc<SessionIssuer>,
}

impl AuthModule {
    pub fn new(sessions: Arc<SessionIssuer>) -> Self {
        Self { sessions }
    }
}

#[async_trait]
impl Module for AuthModule {
    fn name(&self) -> &'static str {
        "auth"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            credentials = ctx.settings.auth.credentials.len(),
            token_lifetime_secs = ctx.settings.auth.token_lifetime_secs,
            "auth module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        let state = AuthState {
            sessions: self.sessions.clone(),
        };
        Router::new()
            .route("/login", post(routes::login))
            .with_state(state)
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(json!({
            "paths": {
                "/login": {
                    "post": {
                        "summary": "Exchange credentials for a session token",
                        "tags": ["Auth"],
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/LoginRequest" }
                                }
                            }
                        },
                        "responses": {
                            "200": {
                                "description": "Signed session token",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/LoginResponse" }
                                    }
                                }
                            },
                            "400": {
                                "description": "Missing fields or invalid credentials",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                                    }
                                }
                            }
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "LoginRequest": {
                        "type": "object",
                        "properties": {
                            "identity": { "type": "string", "description": "Username" },
                            "secret": { "type": "string", "description": "Password" }
                        },
                        "required": ["identity", "secret"]
                    },
                    "LoginResponse": {
                        "type": "object",
                        "properties": {
                            "token": { "type": "string", "description": "Bearer token" },
                            "identity": { "type": "string", "description": "Authenticated username" }
                        },
                        "required": ["token", "identity"]
                    }
                }
            }
        }))
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "auth module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "auth module stopped");
        Ok(())
    }
}

/// Create a new instance of the auth module.
pub fn create_module(sessions: Arc<SessionIssuer>) -> Arc<dyn Module> {
    Arc::new(AuthModule::new(sessions))
}
