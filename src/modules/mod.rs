pub mod auth;
pub mod books;

use std::sync::Arc;

use anyhow::Context;

use libris_auth::{Credential, CredentialSet, SessionIssuer};
use libris_kernel::settings::Settings;
use libris_kernel::ModuleRegistry;

use self::books::store::BookStore;

/// Construct shared state from settings and register all modules.
///
/// The credential set and signing secret come from configuration; the
/// catalog is loaded from its backing file before any route can observe it.
pub async fn register_all(
    registry: &mut ModuleRegistry,
    settings: &Settings,
) -> anyhow::Result<()> {
    let credentials = CredentialSet::new(
        settings
            .auth
            .credentials
            .iter()
            .map(|entry| Credential {
                identity: entry.identity.clone(),
                secret: entry.secret.clone(),
            })
            .collect(),
    );

    if credentials.is_empty() {
        tracing::warn!("credential list is empty; no login can succeed");
    }

    let sessions = Arc::new(SessionIssuer::new(
        credentials,
        &settings.auth.token_secret,
        settings.auth.token_lifetime_secs,
    ));

    let store = Arc::new(
        BookStore::open(&settings.store.data_path)
            .await
            .with_context(|| format!("failed to open catalog at {}", settings.store.data_path))?,
    );

    registry.register(auth::create_module(sessions.clone()));
    registry.register(books::create_module(store, sessions));

    Ok(())
}
