// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # VAULT Crypto Services
//!
//! Entry point for the `vault-service` binary. Parses CLI arguments,
//! initializes logging and metrics, and serves the stateless crypto API
//! alongside a dedicated Prometheus metrics endpoint.
//!
//! The binary supports two subcommands:
//!
//! - `run`     — start the HTTP service
//! - `version` — print build version information

mod api;
mod cli;
mod logging;
mod metrics;

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tokio::signal;

use vault_crypto::OsRandom;

use cli::{Commands, VaultServiceCli};
use logging::LogFormat;
use metrics::ServiceMetrics;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = VaultServiceCli::parse();

    match cli.command {
        Commands::Run(args) => run_service(args).await,
        Commands::Version => {
            print_version();
            Ok(())
        }
    }
}

/// Starts the full service: API server and metrics endpoint.
async fn run_service(args: cli::RunArgs) -> Result<()> {
    logging::init_logging(
        "vault_service=info,vault_crypto=info,tower_http=debug",
        LogFormat::from_str_lossy(&args.log_format),
    );

    tracing::info!(
        bind_addr = %args.bind_addr,
        port = args.port,
        metrics_port = args.metrics_port,
        "starting vault-service"
    );

    // --- Metrics ---
    let service_metrics = Arc::new(ServiceMetrics::new());

    // --- Application state ---
    let app_state = api::AppState {
        version: env!("CARGO_PKG_VERSION").to_string(),
        rng: Arc::new(OsRandom),
        metrics: Arc::clone(&service_metrics),
    };

    // --- API server ---
    let api_router = api::create_router(app_state);
    let api_addr = format!("{}:{}", args.bind_addr, args.port);
    let api_listener = tokio::net::TcpListener::bind(&api_addr)
        .await
        .with_context(|| format!("failed to bind API listener on {}", api_addr))?;
    tracing::info!("API server listening on {}", api_addr);

    // --- Metrics server ---
    let metrics_router = axum::Router::new()
        .route("/metrics", axum::routing::get(metrics::metrics_handler))
        .with_state(Arc::clone(&service_metrics));
    let metrics_addr = format!("{}:{}", args.bind_addr, args.metrics_port);
    let metrics_listener = tokio::net::TcpListener::bind(&metrics_addr)
        .await
        .with_context(|| format!("failed to bind metrics listener on {}", metrics_addr))?;
    tracing::info!("Metrics server listening on {}", metrics_addr);

    // --- Serve ---
    tokio::select! {
        res = axum::serve(api_listener, api_router) => {
            if let Err(e) = res {
                tracing::error!("API server error: {}", e);
            }
        }
        res = axum::serve(metrics_listener, metrics_router) => {
            if let Err(e) = res {
                tracing::error!("Metrics server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            tracing::info!("shutdown signal received, draining connections");
        }
    }

    tracing::info!("vault-service stopped");
    Ok(())
}

/// Prints version information to stdout.
fn print_version() {
    println!("vault-service {}", env!("CARGO_PKG_VERSION"));
    println!("rustc         {}", rustc_version());
}

/// Returns the Rust compiler version used to build this binary.
fn rustc_version() -> &'static str {
    option_env!("RUSTC_VERSION").unwrap_or("unknown")
}

/// Waits for SIGINT (Ctrl+C) or SIGTERM, whichever comes first.
///
/// On non-Unix platforms, only Ctrl+C is supported.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
