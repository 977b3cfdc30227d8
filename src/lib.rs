//! Libris Application Library
//!
//! Wires the auth and books modules into the kernel registry and runs the
//! HTTP server. Binaries (`libris-app`, `libris-cli serve`) call [`run`].

pub mod modules;

use libris_kernel::settings::Settings;
use libris_kernel::{InitCtx, ModuleRegistry};

/// Run the application until the HTTP server exits.
pub async fn run(settings: Settings) -> anyhow::Result<()> {
    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, &settings).await?;

    let ctx = InitCtx {
        settings: &settings,
    };
    registry.init_modules(&ctx).await?;
    registry.start_modules(&ctx).await?;

    libris_http::start_server(&registry, &settings).await?;

    registry.stop_modules().await
}
