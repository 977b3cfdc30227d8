//! Tracing/logging bootstrap.

use anyhow::anyhow;
use tracing_subscriber::EnvFilter;

use libris_kernel::settings::{LogFormat, TelemetrySettings};

/// Initialize the tracing pipeline.
///
/// Filter comes from `RUST_LOG` when set, otherwise `info`. Output format
/// follows `telemetry.log_format` (pretty for local work, JSON for log
/// shippers). Fails if a global subscriber is already installed.
pub fn init(settings: &TelemetrySettings) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let result = match settings.log_format {
        LogFormat::Pretty => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .try_init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .try_init(),
    };

    result.map_err(|err| anyhow!("failed to initialize tracing subscriber: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn double_init_fails_instead_of_panicking() {
        let settings = TelemetrySettings::default();
        assert!(init(&settings).is_ok());
        assert!(init(&settings).is_err());
    }
}
