//! Axum HTTPS server, routing, and middleware.
//!
//! # Responsibilities
//! - Build the rustls configuration (client certificate requested, never verified).
//! - Define the Axum router with all routes and shared middleware.
//! - Run the TLS accept loop and attach per-connection TLS facts to requests.

pub mod handlers;
pub mod listener;
pub mod middleware;
pub mod router;
pub mod state;
pub mod tls;
