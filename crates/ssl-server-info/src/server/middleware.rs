//! Axum middleware layers applied to the router.

use axum::http::{header::SERVER, HeaderValue};
use tower_http::set_header::SetResponseHeaderLayer;

/// `Server` header value sent on diagnostic responses.
pub const SERVER_HEADER: &str = "ssl-server-info; https://github.com/balkin/ssl-server-info";

/// Layer stamping [`SERVER_HEADER`] on every response, including rejections.
pub fn server_header() -> SetResponseHeaderLayer<HeaderValue> {
    SetResponseHeaderLayer::overriding(SERVER, HeaderValue::from_static(SERVER_HEADER))
}
