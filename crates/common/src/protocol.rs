//! Response body returned by the diagnostic endpoint.
//!
//! Every field is optional on the wire: empty strings and a zero timestamp
//! are omitted from the serialised JSON rather than written as `null`.

use serde::{Deserialize, Serialize};

/// Fixed identifier written to the `server` field.
pub const SERVER_ID: &str = "github.com/balkin/ssl-server-info";

/// Marker written to the `https` field; the endpoint only answers over TLS.
pub const HTTPS_ON: &str = "on";

/// Diagnostic set on the response when the client sent no certificate.
pub const NO_CERTIFICATE_MESSAGE: &str = "No mTLS certificate provided";

/// Request and TLS metadata observed for one exchange.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SslInfoResponse {
    /// Set only when the request is rejected for lack of a client certificate.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub message: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub server: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub https: String,

    // ---------------------------------------------------------------------
    // Header echoes
    // ---------------------------------------------------------------------
    #[serde(skip_serializing_if = "String::is_empty")]
    pub header_content_type: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub header_accept: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub header_user_agent: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub header_connection: String,

    // ---------------------------------------------------------------------
    // Connection facts
    // ---------------------------------------------------------------------
    #[serde(skip_serializing_if = "String::is_empty")]
    pub http_host: String,
    /// Remote socket address of the client.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub http_server_addr: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub request_protocol: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub request_method: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub request_uri: String,
    /// Unix epoch seconds at which the handler started.
    #[serde(skip_serializing_if = "is_zero")]
    pub request_timestamp: i64,

    // ---------------------------------------------------------------------
    // Peer certificate
    // ---------------------------------------------------------------------
    #[serde(skip_serializing_if = "String::is_empty")]
    pub ssl_subject: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub ssl_issuer: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub ssl_not_before: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub ssl_not_after: String,
}

fn is_zero(v: &i64) -> bool {
    *v == 0
}

impl SslInfoResponse {
    /// A response carrying the fixed identification fields only.
    pub fn identified() -> Self {
        Self {
            server: SERVER_ID.into(),
            https: HTTPS_ON.into(),
            ..Self::default()
        }
    }
}
