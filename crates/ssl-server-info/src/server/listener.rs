//! TLS accept loop.
//!
//! Each accepted TCP connection gets its own task: the TLS handshake runs
//! there, the negotiated facts are captured once as a [`TlsConnectInfo`], and
//! hyper then serves HTTP/1.1 or HTTP/2 on the encrypted stream, attaching
//! that info to every request before handing it to the router.

use std::error::Error as StdError;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use hyper::body::Incoming;
use hyper::service::service_fn;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto;
use rustls::ServerConfig;
use tokio::net::{TcpListener, TcpStream};
use tokio_rustls::TlsAcceptor;
use tower::Service as _;
use tracing::{debug, error, info_span, warn, Instrument as _};

use super::state::TlsConnectInfo;

/// Accept connections on `listener` and serve `router` over TLS.
///
/// Runs until the process is killed. Handshake and connection failures are
/// logged and only end the affected connection.
///
/// # Errors
///
/// Never returns under normal operation; the signature leaves room for the
/// caller to `?` it next to other startup steps.
pub async fn serve(listener: TcpListener, tls: Arc<ServerConfig>, router: Router) -> Result<()> {
    let acceptor = TlsAcceptor::from(tls);

    loop {
        match listener.accept().await {
            Ok((stream, peer_addr)) => {
                let acceptor = acceptor.clone();
                let router = router.clone();
                tokio::spawn(
                    async move {
                        if let Err(e) = handle_connection(stream, peer_addr, acceptor, router).await {
                            warn!(error = format!("{e:#}"), "connection failed");
                        }
                    }
                    .instrument(info_span!("https", client = %peer_addr)),
                );
            }
            Err(e) => {
                error!(error = %e, "accept error");
            }
        }
    }
}

async fn handle_connection(
    stream: TcpStream,
    peer_addr: SocketAddr,
    acceptor: TlsAcceptor,
    router: Router,
) -> Result<()> {
    let tls_stream = match acceptor.accept(stream).await {
        Ok(s) => s,
        Err(e) => {
            if is_benign_disconnect(&e) {
                debug!(error = %e, "TLS handshake ended by peer");
                return Ok(());
            }
            return Err(anyhow::Error::from(e).context("TLS handshake failed"));
        }
    };

    let (_, session) = tls_stream.get_ref();
    let peer_certificates = session
        .peer_certificates()
        .map(<[_]>::to_vec)
        .unwrap_or_default();
    debug!(
        client_certificates = peer_certificates.len(),
        alpn = ?session.alpn_protocol().map(String::from_utf8_lossy),
        "TLS handshake complete"
    );
    let info = TlsConnectInfo::new(peer_addr, peer_certificates);

    let service = service_fn(move |mut request: hyper::Request<Incoming>| {
        request.extensions_mut().insert(info.clone());
        // `Router` is always ready, so `poll_ready` is skipped.
        router.clone().call(request)
    });

    let result = auto::Builder::new(TokioExecutor::new())
        .serve_connection(TokioIo::new(tls_stream), service)
        .await;

    match result {
        Ok(()) => Ok(()),
        Err(e) if is_benign_disconnect(&*e) => {
            debug!(error = %e, "client disconnected");
            Ok(())
        }
        Err(e) => Err(anyhow::anyhow!(e).context("HTTP connection failed")),
    }
}

/// Whether an error only reflects the peer going away.
///
/// Walks the source chain looking for a reset/EOF I/O error or a hyper error
/// for a cancelled or truncated message.
fn is_benign_disconnect(err: &(dyn StdError + 'static)) -> bool {
    use std::io::ErrorKind::{BrokenPipe, ConnectionReset, UnexpectedEof};

    let mut cause = Some(err);
    while let Some(e) = cause {
        if let Some(ioe) = e.downcast_ref::<std::io::Error>() {
            if matches!(ioe.kind(), BrokenPipe | ConnectionReset | UnexpectedEof) {
                return true;
            }
        }
        if let Some(he) = e.downcast_ref::<hyper::Error>() {
            if he.is_canceled() || he.is_incomplete_message() {
                return true;
            }
        }
        cause = e.source();
    }
    false
}
