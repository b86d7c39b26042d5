//! TLS listener setup using rustls.
//!
//! # Client certificates
//!
//! The server *requests* a client certificate during the handshake but does
//! not require one, and it does **not** verify the presented chain against
//! any trust store. This is insecure by design: the endpoint exists to show
//! callers which certificate a proxy or gateway forwarded, including
//! self-signed and otherwise untrusted ones. Do not use it for authentication.
//!
//! Two checks remain. The client must prove possession of the certificate's
//! private key (the handshake signature is verified), and the certificate must
//! decode as X.509.

use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use rustls::client::danger::HandshakeSignatureValid;
use rustls::crypto::{verify_tls12_signature, verify_tls13_signature, CryptoProvider, WebPkiSupportedAlgorithms};
use rustls::pki_types::{CertificateDer, UnixTime};
use rustls::server::danger::{ClientCertVerified, ClientCertVerifier};
use rustls::{CertificateError, DigitallySignedStruct, DistinguishedName, ServerConfig, SignatureScheme};

use crate::certificate;

/// ALPN identifiers offered to clients, most preferred first.
const ALPN_PROTOCOLS: [&[u8]; 2] = [b"h2", b"http/1.1"];

/// Load the PEM certificate chain and private key from disk and build the server config.
///
/// # Errors
///
/// Returns an error if either file cannot be read or [`build_server_config`] fails.
pub fn load_server_config(cert_path: &Path, key_path: &Path) -> Result<Arc<ServerConfig>> {
    let cert_pem = std::fs::read(cert_path)
        .with_context(|| format!("failed to read certificate file {}", cert_path.display()))?;
    let key_pem = std::fs::read(key_path)
        .with_context(|| format!("failed to read key file {}", key_path.display()))?;
    build_server_config(&cert_pem, &key_pem)
}

/// Build a [`rustls::ServerConfig`] from PEM-encoded certificate and private key bytes.
///
/// # Errors
///
/// Returns an error if the certificate or key cannot be parsed, or if rustls
/// rejects the configuration.
pub fn build_server_config(cert_pem: &[u8], key_pem: &[u8]) -> Result<Arc<ServerConfig>> {
    let certs = rustls_pemfile::certs(&mut BufReader::new(cert_pem))
        .collect::<Result<Vec<_>, _>>()
        .context("failed to parse TLS certificate chain")?;
    if certs.is_empty() {
        anyhow::bail!("no certificate found in PEM data");
    }

    let key = rustls_pemfile::private_key(&mut BufReader::new(key_pem))
        .context("failed to read TLS private key")?
        .context("no private key found in PEM data")?;

    let provider = Arc::new(rustls::crypto::ring::default_provider());
    let verifier = Arc::new(AcceptAnyClientCert::new(&provider));

    let mut config = ServerConfig::builder_with_provider(provider)
        .with_safe_default_protocol_versions()
        .context("failed to select TLS protocol versions")?
        .with_client_cert_verifier(verifier)
        .with_single_cert(certs, key)
        .context("failed to build rustls ServerConfig")?;
    config.alpn_protocols = ALPN_PROTOCOLS.iter().map(|p| p.to_vec()).collect();

    Ok(Arc::new(config))
}

/// Client certificate verifier that offers client authentication, never
/// requires it, and accepts any well-formed certificate without chain checks.
#[derive(Debug)]
pub struct AcceptAnyClientCert {
    algorithms: WebPkiSupportedAlgorithms,
}

impl AcceptAnyClientCert {
    pub fn new(provider: &CryptoProvider) -> Self {
        Self {
            algorithms: provider.signature_verification_algorithms,
        }
    }
}

impl ClientCertVerifier for AcceptAnyClientCert {
    fn offer_client_auth(&self) -> bool {
        true
    }

    fn client_auth_mandatory(&self) -> bool {
        false
    }

    fn root_hint_subjects(&self) -> &[DistinguishedName] {
        &[]
    }

    fn verify_client_cert(
        &self,
        end_entity: &CertificateDer<'_>,
        _intermediates: &[CertificateDer<'_>],
        _now: UnixTime,
    ) -> Result<ClientCertVerified, rustls::Error> {
        if !certificate::is_well_formed(end_entity.as_ref()) {
            return Err(rustls::Error::InvalidCertificate(CertificateError::BadEncoding));
        }
        Ok(ClientCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        verify_tls12_signature(message, cert, dss, &self.algorithms)
    }

    fn verify_tls13_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        verify_tls13_signature(message, cert, dss, &self.algorithms)
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        self.algorithms.supported_schemes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support;

    fn verifier() -> AcceptAnyClientCert {
        AcceptAnyClientCert::new(&rustls::crypto::ring::default_provider())
    }

    #[test]
    fn rejects_empty_cert_pem() {
        let result = build_server_config(b"", b"");
        assert!(result.is_err());
    }

    #[test]
    fn rejects_garbage_pem() {
        let result = build_server_config(b"not a pem", b"also not a pem");
        assert!(result.is_err());
    }

    #[test]
    fn rejects_missing_key() {
        let ca = test_support::ca("test-ca");
        let server = test_support::leaf("localhost", &["localhost"], &ca);
        let result = build_server_config(server.cert.pem().as_bytes(), b"");
        assert!(result.is_err());
    }

    #[test]
    fn builds_config_with_alpn() {
        let ca = test_support::ca("test-ca");
        let server = test_support::leaf("localhost", &["localhost"], &ca);
        let config = build_server_config(
            server.cert.pem().as_bytes(),
            server.key.serialize_pem().as_bytes(),
        )
        .unwrap();
        assert_eq!(config.alpn_protocols, vec![b"h2".to_vec(), b"http/1.1".to_vec()]);
    }

    #[test]
    fn load_reports_missing_file() {
        let err = load_server_config(
            Path::new("/nonexistent/server.crt"),
            Path::new("/nonexistent/server.key"),
        )
        .unwrap_err();
        assert!(err.to_string().contains("/nonexistent/server.crt"));
    }

    #[test]
    fn client_auth_is_requested_not_required() {
        let v = verifier();
        assert!(v.offer_client_auth());
        assert!(!v.client_auth_mandatory());
        assert!(v.root_hint_subjects().is_empty());
        assert!(!v.supported_verify_schemes().is_empty());
    }

    #[test]
    fn accepts_untrusted_self_signed_certificate() {
        let stranger = test_support::ca("nobody-trusts-me");
        let result = verifier().verify_client_cert(stranger.cert.der(), &[], UnixTime::now());
        assert!(result.is_ok());
    }

    #[test]
    fn rejects_malformed_certificate() {
        let der = CertificateDer::from(b"garbage".to_vec());
        let result = verifier().verify_client_cert(&der, &[], UnixTime::now());
        assert!(matches!(
            result,
            Err(rustls::Error::InvalidCertificate(CertificateError::BadEncoding))
        ));
    }
}
