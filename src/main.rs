mod common;
mod http_client;
mod model;
mod oauth;
mod session;

use std::sync::Arc;

use clap::Parser;
use model::arg::Args;
use model::config::Config;
use model::settings::AuthSettings;

#[tokio::main]
async fn main() {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // Load configuration: file, then environment, then command line
    let config_path = args
        .config
        .unwrap_or_else(|| Config::default_config_path().to_string());
    let mut config = Config::load(&config_path).unwrap_or_else(|e| {
        tracing::error!("Failed to load config: {}", e);
        std::process::exit(1);
    });
    config.apply_env();
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }

    let settings = AuthSettings::from_config(&config).unwrap_or_else(|e| {
        tracing::error!("Invalid configuration: {:#}", e);
        std::process::exit(1);
    });

    let handler = oauth::OAuthFlowHandler::new(&settings).unwrap_or_else(|e| {
        tracing::error!("Failed to create OAuth handler: {}", e);
        std::process::exit(1);
    });
    let google_enabled = handler.is_configured();
    let app = oauth::create_app(Arc::new(handler));

    let addr = format!("{}:{}", config.host, config.port);
    tracing::info!("Starting auth server: {}", addr);
    tracing::info!("Google login enabled: {}", google_enabled);
    tracing::info!("Secure cookies: {}", settings.secure_cookies);
    tracing::info!("Available APIs:");
    tracing::info!("  GET  /auth/login/google");
    tracing::info!("  GET  /auth/callback/google");
    tracing::info!("  GET  /auth/me");
    tracing::info!("  POST /auth/logout");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("Failed to bind {}: {}", addr, e);
            std::process::exit(1);
        });
    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
