use async_trait::async_trait;
use axum::Router;

/// Context provided to modules during initialization and startup.
pub struct InitCtx<'a> {
    pub settings: &'a crate::settings::Settings,
}

/// Core module trait that all libris modules implement.
///
/// Modules own their state (stores, token issuers) and bake it into the
/// router they return, so the trait itself stays state-free.
#[async_trait]
pub trait Module: Sync + Send {
    /// Unique name for this module; routes mount under `/api/{name}`.
    fn name(&self) -> &'static str;

    /// Initialize the module. Called once during application startup.
    async fn init(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    /// Return the Axum router for this module's routes.
    fn routes(&self) -> Router {
        Router::new()
    }

    /// Return an OpenAPI specification fragment for this module as JSON.
    /// Fragments are merged with other modules' specs by the HTTP layer.
    fn openapi(&self) -> Option<serde_json::Value> {
        None
    }

    /// Start background work for this module. Called after init.
    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    /// Stop the module and release resources. Called during shutdown.
    async fn stop(&self) -> anyhow::Result<()> {
        Ok(())
    }
}
