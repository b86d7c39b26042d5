//! Peer certificate inspection.

use common::ServiceError;
use x509_parser::prelude::*;

/// Identity facts read from a client's leaf certificate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerCertificate {
    /// Subject common name, empty when the subject has none.
    pub subject: String,
    /// Issuer common name, empty when the issuer has none.
    pub issuer: String,
    pub not_before: String,
    pub not_after: String,
}

/// Decode a DER certificate and extract its common names and validity window.
///
/// Validity bounds use the `Display` form of [`ASN1Time`], which is stable for
/// a given certificate.
///
/// # Errors
///
/// Returns [`ServiceError::Certificate`] if `der` is not a valid X.509 certificate.
pub fn inspect(der: &[u8]) -> Result<PeerCertificate, ServiceError> {
    let (_, cert) =
        X509Certificate::from_der(der).map_err(|e| ServiceError::Certificate(e.to_string()))?;

    let validity = cert.validity();
    Ok(PeerCertificate {
        subject: common_name(cert.subject()),
        issuer: common_name(cert.issuer()),
        not_before: validity.not_before.to_string(),
        not_after: validity.not_after.to_string(),
    })
}

/// Whether `der` decodes as an X.509 certificate.
pub fn is_well_formed(der: &[u8]) -> bool {
    X509Certificate::from_der(der).is_ok()
}

fn common_name(name: &X509Name<'_>) -> String {
    name.iter_common_name()
        .next()
        .and_then(|cn| cn.as_str().ok())
        .unwrap_or_default()
        .to_owned()
}
