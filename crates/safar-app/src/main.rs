//! Safar application binary - composition root.
//!
//! Ties together all Safar crates into a single executable:
//! 1. Load configuration from TOML
//! 2. Build the in-memory timetable and capability registry
//! 3. Construct the Gemini gateway and turn orchestrator
//! 4. Start the axum REST API server

use std::sync::Arc;

use clap::Parser;

use safar_api::routes;
use safar_api::state::AppState;
use safar_assistant::{FunctionDispatcher, TurnOrchestrator};
use safar_capability::{CapabilityRegistry, Timetable};
use safar_core::config::SafarConfig;
use safar_gemini::GeminiGateway;

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = cli::CliArgs::parse();

    // Config first; the log level may come from it.
    let config_file = args.resolve_config_path();
    let mut config = SafarConfig::load_or_default(&config_file);
    if let Some(level) = args.resolve_log_level() {
        config.general.log_level = level;
    }
    config.general.port = args.resolve_port(config.general.port);

    // Tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(config.general.log_level.clone())
            }),
        )
        .init();

    tracing::info!("Starting Safar v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(path = %config_file.display(), "Configuration loaded");

    // API key comes from the environment variable named in the config;
    // the key itself never lives on disk.
    let api_key = std::env::var(&config.model.api_key_env).map_err(|_| {
        format!(
            "environment variable {} is not set",
            config.model.api_key_env
        )
    })?;

    // Timetable and capability registry.
    let timetable = Arc::new(Timetable::new());
    let mut registry = CapabilityRegistry::new();
    registry.register_defaults(Arc::clone(&timetable));
    tracing::info!(capabilities = registry.len(), "Capability registry ready");

    // Model gateway and orchestrator.
    let gateway = GeminiGateway::new(api_key, config.model.clone(), &registry)?;
    let orchestrator = TurnOrchestrator::new(
        Arc::new(gateway),
        FunctionDispatcher::new(Arc::new(registry)),
        config.assistant.clone(),
    );
    tracing::info!(model = %config.model.model, "Turn orchestrator ready");

    // HTTP server.
    let state = AppState::new(orchestrator);
    let app = routes::create_router(state);

    let addr = format!("{}:{}", config.general.bind_addr, config.general.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "API server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
