//! HTTP server facade for libris with Axum, error handling, and OpenAPI support.

use anyhow::Context;
use axum::{routing::get, Router};

use libris_kernel::ModuleRegistry;

pub mod error;
pub mod router;

use crate::router::RouterBuilder;

/// Start the HTTP server with the given module registry.
pub async fn start_server(
    registry: &ModuleRegistry,
    settings: &libris_kernel::settings::Settings,
) -> anyhow::Result<()> {
    tracing::info!(
        "starting HTTP server on {}:{}",
        settings.server.host,
        settings.server.port
    );

    let app = build_router(registry, settings).context("failed to build HTTP router")?;

    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", settings.server.host, settings.server.port))
            .await
            .context("failed to bind to address")?;

    tracing::info!(
        "HTTP server listening on http://{}:{}",
        settings.server.host,
        settings.server.port
    );

    axum::serve(listener, app)
        .await
        .context("HTTP server failed")?;

    Ok(())
}

/// Build the main HTTP router with all module routes mounted.
///
/// Public so integration tests can drive the full router without binding
/// a listener.
pub fn build_router(
    registry: &ModuleRegistry,
    settings: &libris_kernel::settings::Settings,
) -> anyhow::Result<Router> {
    let mut router_builder = RouterBuilder::new();

    // Global middlewares.
    router_builder = router_builder
        .with_tracing()
        .with_cors()
        .with_request_id()
        .with_timeout(settings.server.request_timeout_ms);

    // Liveness route.
    router_builder = router_builder.route("/healthz", get(health_check));

    // Mount module routes.
    for module in registry.modules() {
        let module_name = module.name();
        let module_router = module.routes();

        tracing::info!(
            module = module_name,
            "mounting module routes under /api/{}",
            module_name
        );
        router_builder = router_builder.mount_module(module_name, module_router);
    }

    // Merged OpenAPI documentation.
    router_builder = router_builder.with_openapi(registry);

    Ok(router_builder.build())
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "ok"
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use libris_kernel::settings::Settings;
    use tower::ServiceExt;

    #[tokio::test]
    async fn healthz_responds_ok_on_built_router() {
        let registry = ModuleRegistry::new();
        let settings = Settings::default();
        let app = build_router(&registry, &settings).unwrap();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/healthz")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
