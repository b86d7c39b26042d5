//! Axum router construction.

use axum::{routing::any, Router};
use tower_http::trace::TraceLayer;

use super::{handlers, middleware};

/// Build the application [`Router`] with all routes and middleware attached.
///
/// The root route doubles as the fallback, so every unrouted path redirects to
/// the project page.
pub fn build() -> Router {
    let diagnostics = Router::new()
        .route("/ssl/json", any(handlers::ssl_json))
        .route("/ssl/json/", any(handlers::ssl_json))
        .route("/ssl/json/*params", any(handlers::ssl_json))
        .layer(middleware::server_header());

    Router::new()
        .route("/", any(handlers::home))
        .merge(diagnostics)
        .fallback(handlers::home)
        .layer(TraceLayer::new_for_http())
}
