use anyhow::Context;
use clap::{Parser, Subcommand};
use libris_kernel::settings::Settings;

#[derive(Parser)]
#[command(name = "libris-cli", about = "Book catalog service utilities")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server.
    Serve,
    /// Load the layered configuration and print an effective summary.
    CheckConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = Settings::load().with_context(|| "failed to load libris settings")?;

    match cli.command {
        Command::Serve => {
            libris_telemetry::init(&settings.telemetry)?;
            tracing::info!(env = ?settings.environment, "starting libris via CLI");
            libris_app::run(settings).await
        }
        Command::CheckConfig => {
            println!("environment:        {:?}", settings.environment);
            println!(
                "server:             {}:{} (timeout {}ms)",
                settings.server.host, settings.server.port, settings.server.request_timeout_ms
            );
            println!("catalog file:       {}", settings.store.data_path);
            println!("log format:         {:?}", settings.telemetry.log_format);
            println!(
                "token lifetime:     {}s",
                settings.auth.token_lifetime_secs
            );
            // Identities only; secrets never reach stdout.
            let identities: Vec<&str> = settings
                .auth
                .credentials
                .iter()
                .map(|entry| entry.identity.as_str())
                .collect();
            println!("credentials:        {}", identities.join(", "));
            Ok(())
        }
    }
}
