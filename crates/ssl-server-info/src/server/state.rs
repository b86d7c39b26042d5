//! Per-connection TLS facts attached to every request served on that connection.

use std::net::SocketAddr;

use rustls::pki_types::CertificateDer;

/// What the TLS handshake established for one client connection.
///
/// The listener inserts this into the request extensions. A request without it
/// did not arrive over TLS.
#[derive(Debug, Clone)]
pub struct TlsConnectInfo {
    /// Remote socket address of the client.
    pub remote_addr: SocketAddr,
    /// Certificate chain presented by the client, leaf first. Empty when the
    /// client sent none.
    pub peer_certificates: Vec<CertificateDer<'static>>,
}

impl TlsConnectInfo {
    pub fn new(remote_addr: SocketAddr, peer_certificates: Vec<CertificateDer<'static>>) -> Self {
        Self {
            remote_addr,
            peer_certificates,
        }
    }

    /// The client's leaf certificate, if one was presented.
    pub fn leaf_certificate(&self) -> Option<&CertificateDer<'static>> {
        self.peer_certificates.first()
    }
}
