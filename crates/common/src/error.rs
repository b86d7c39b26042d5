//! Common error types shared across crates.

use thiserror::Error;

/// Top-level service error type.
///
/// Variants map to HTTP status codes returned to callers:
/// - [`ServiceError::Forbidden`] → 403
/// - [`ServiceError::NoPeerCertificate`] → 403
/// - [`ServiceError::Certificate`] → 500
/// - [`ServiceError::InvalidStatusCode`] → 500
/// - [`ServiceError::Serialization`] → 500
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The request did not arrive over a TLS-secured connection.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// The TLS handshake completed without the client presenting a certificate.
    #[error("No mTLS certificate provided")]
    NoPeerCertificate,

    /// The presented peer certificate could not be decoded.
    #[error("invalid peer certificate: {0}")]
    Certificate(String),

    /// The requested status code cannot be written on an HTTP status line.
    #[error("status code {0} cannot be sent on an HTTP status line")]
    InvalidStatusCode(i64),

    /// The response body could not be serialised.
    #[error("serialisation failure: {0}")]
    Serialization(String),
}

impl ServiceError {
    /// Returns the HTTP status code that should be sent for this error.
    pub fn http_status(&self) -> u16 {
        match self {
            ServiceError::Forbidden(_) => 403,
            ServiceError::NoPeerCertificate => 403,
            ServiceError::Certificate(_) => 500,
            ServiceError::InvalidStatusCode(_) => 500,
            ServiceError::Serialization(_) => 500,
        }
    }
}

impl From<serde_json::Error> for ServiceError {
    fn from(e: serde_json::Error) -> Self {
        ServiceError::Serialization(e.to_string())
    }
}
