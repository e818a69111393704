//! # Component Studio Server
//!
//! Local embedded server for one component studio session.
//! Binds to localhost only.

use std::net::SocketAddr;

use anyhow::Context;
use axum::http::{header, HeaderValue, Method};
use clap::Parser;
use studio_core::{Catalog, FileHistoryStore, HistoryStore, MemoryHistoryStore, StudioState};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use studio_server::{AppState, CliArgs, GeneratorClient, ServerConfig};

/// Build a CORS layer that only allows localhost origins.
fn build_cors_layer(port: u16) -> CorsLayer {
    let localhost_origins = [
        format!("http://localhost:{port}"),
        format!("http://127.0.0.1:{port}"),
        // Common dev server ports
        "http://localhost:3000".to_string(),
        "http://localhost:5173".to_string(), // Vite
        "http://127.0.0.1:3000".to_string(),
        "http://127.0.0.1:5173".to_string(),
    ];

    let origins: Vec<HeaderValue> = localhost_origins
        .iter()
        .filter_map(|o| o.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([header::CONTENT_DISPOSITION])
}

/// Initialize structured tracing with optional JSON format.
///
/// Set `RUST_LOG` to control log levels (default: info,studio_server=debug,tower_http=debug).
/// Set `RUST_LOG_FORMAT=json` for JSON output.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,studio_server=debug,tower_http=debug"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true);

    if std::env::var("RUST_LOG_FORMAT").as_deref() == Ok("json") {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer.json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

/// Open the revision store for the configured data directory.
fn open_store(config: &ServerConfig) -> anyhow::Result<Box<dyn HistoryStore>> {
    match &config.data_dir {
        Some(dir) => {
            let store = FileHistoryStore::new(dir)
                .with_context(|| format!("Failed to open data directory {}", dir.display()))?;
            tracing::info!("Persisting revisions to {}", store.path().display());
            Ok(Box::new(store))
        }
        None => {
            tracing::warn!("No data directory configured, revisions will not survive a restart");
            Ok(Box::new(MemoryHistoryStore::new()))
        }
    }
}

/// Build the generator client, if a URL is configured.
fn init_generator(config: &ServerConfig) -> Option<GeneratorClient> {
    let url = config.ai_url.as_deref()?;
    match GeneratorClient::new(url, config.ai_timeout) {
        Ok(client) => {
            tracing::info!("AI generator at {}", client.base_url());
            Some(client)
        }
        Err(err) => {
            tracing::error!("Failed to configure AI generator: {err}");
            None
        }
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = ServerConfig::from(CliArgs::parse());
    tracing::debug!("Configuration: {config:?}");

    let store = open_store(&config)?;
    let studio = StudioState::with_store(Catalog::builtin(), config.history, store);
    tracing::info!(
        "Loaded {} templates, {} revisions",
        studio.catalog().len(),
        studio.history().len()
    );

    let state = AppState::new(studio, init_generator(&config));

    let app = studio_server::router(state)
        // Request ID for tracing correlation
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(build_cors_layer(config.port))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        );

    // Bind to localhost only
    let addr = SocketAddr::from(([127, 0, 0, 1], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    tracing::info!("Component Studio server starting on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
