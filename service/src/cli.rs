//! # CLI Interface
//!
//! Defines the command-line argument structure for `vault-service` using
//! `clap` derive. Two subcommands: `run` and `version`.

use clap::{Parser, Subcommand};

/// VAULT crypto services sidecar.
///
/// A stateless HTTP service offering password-based encryption,
/// deterministic DID generation, and simulated threshold commitments.
/// Exposes Prometheus metrics on a separate port.
#[derive(Parser, Debug)]
#[command(
    name = "vault-service",
    about = "VAULT crypto services sidecar",
    version,
    propagate_version = true
)]
pub struct VaultServiceCli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands for the service binary.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP service.
    Run(RunArgs),
    /// Print version information and exit.
    Version,
}

/// Arguments for the `run` subcommand.
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Address to bind the HTTP API on.
    #[arg(long, env = "VAULT_BIND_ADDR", default_value = "0.0.0.0")]
    pub bind_addr: String,

    /// Port for the HTTP API.
    #[arg(long, env = "VAULT_PORT", default_value_t = 8001)]
    pub port: u16,

    /// Port for the Prometheus metrics endpoint.
    #[arg(long, env = "VAULT_METRICS_PORT", default_value_t = 8002)]
    pub metrics_port: u16,

    /// Log output format: "pretty" or "json".
    #[arg(long, env = "VAULT_LOG_FORMAT", default_value = "pretty")]
    pub log_format: String,
}
