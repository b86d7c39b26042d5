//! `ssl-server-info` binary entry point.
//!
//! Startup sequence:
//! 1. Parse flags and resolve [`Config`] (flag > environment > default).
//! 2. Initialise structured logging.
//! 3. Load the server certificate and key into a rustls config.
//! 4. Build the Axum router, bind the listener, and serve.

mod certificate;
mod config;
mod server;
mod telemetry;
#[cfg(test)]
mod test_support;

use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use config::{Args, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // -----------------------------------------------------------------------
    // 1. Configuration
    // -----------------------------------------------------------------------
    let cfg = Config::from_env(Args::parse()).map_err(|e| {
        // Logging is not yet up; write to stderr directly.
        eprintln!("ERROR: configuration invalid: {e:#}");
        e
    })?;

    // -----------------------------------------------------------------------
    // 2. Telemetry
    // -----------------------------------------------------------------------
    telemetry::init()?;

    // -----------------------------------------------------------------------
    // 3. TLS
    // -----------------------------------------------------------------------
    let tls = server::tls::load_server_config(Path::new(&cfg.cert_file), Path::new(&cfg.key_file))?;

    // -----------------------------------------------------------------------
    // 4. HTTPS server
    // -----------------------------------------------------------------------
    let router = server::router::build();

    let addr: std::net::SocketAddr = ([0, 0, 0, 0], cfg.port).into();
    info!(
        version = env!("CARGO_PKG_VERSION"),
        port = cfg.port,
        cert_file = %cfg.cert_file,
        key_file = %cfg.key_file,
        "starting server"
    );

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    server::listener::serve(listener, tls, router).await
}
