//! xray-relay
//!
//! HTTP service that forwards chest X-ray uploads to a hosted vision model
//! and returns a normalized radiology report.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, Layer};
use xray_relay::{
    config::{Environment, Settings},
    server::App,
};

/// Chest X-ray analysis relay
#[derive(Parser, Debug)]
#[command(name = "xray-relay")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Port to listen on (overrides PORT env var)
    #[arg(short, long)]
    port: Option<u16>,

    /// Host to bind to (overrides HOST env var)
    #[arg(long)]
    host: Option<String>,

    /// Log level: trace, debug, info, warn, error (overrides LOG_LEVEL env var)
    #[arg(long)]
    log_level: Option<String>,

    /// Environment: dev, staging, prod (overrides ENVIRONMENT env var)
    #[arg(short, long)]
    env: Option<Environment>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration first (before logging, so we can use log_level)
    let mut settings = Settings::load()?;
    apply_overrides(&mut settings, args);

    init_tracing(&settings.log_level);

    // Runs after init_tracing: validation emits warnings
    settings.validate()?;

    tracing::info!(
        app_name = %settings.app_name,
        version = %settings.app_version,
        environment = %settings.environment,
        host = %settings.host,
        port = %settings.port,
        model = %settings.upstream.model,
        require_auth = settings.auth.require_auth,
        "Starting application"
    );

    let app = App::new(settings)?;

    app.run_with_graceful_shutdown().await?;

    tracing::info!("Application shutdown complete");

    Ok(())
}

/// CLI flags win over environment values
fn apply_overrides(settings: &mut Settings, args: Args) {
    if let Some(port) = args.port {
        settings.port = port;
    }
    if let Some(host) = args.host {
        settings.host = host;
    }
    if let Some(log_level) = args.log_level {
        settings.log_level = log_level;
    }
    if let Some(env) = args.env {
        settings.environment = env;
    }
}

/// Initialize tracing subscriber with JSON output
fn init_tracing(log_level: &str) {
    // RUST_LOG wins over the configured level
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    let console_layer = fmt::layer().json().with_filter(filter);

    tracing_subscriber::registry().with(console_layer).init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_are_validated() {
        let args = Args::parse_from(["xray-relay", "--port", "0"]);
        let mut settings = Settings::default();
        apply_overrides(&mut settings, args);

        assert_eq!(settings.port, 0);
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_overrides_replace_settings() {
        let args = Args::parse_from(["xray-relay", "--host", "127.0.0.1", "--env", "prod"]);
        let mut settings = Settings::default();
        apply_overrides(&mut settings, args);

        assert_eq!(settings.host, "127.0.0.1");
        assert_eq!(settings.environment, Environment::Production);
        assert_eq!(settings.port, 8000);
    }
}
