//! Axum request handlers for all service endpoints.

use std::time::{SystemTime, UNIX_EPOCH};

use axum::{
    extract::{Query, Request},
    http::{header, request::Parts, HeaderMap, HeaderName, HeaderValue, StatusCode, Uri, Version},
    response::{IntoResponse, Response},
};
use common::{
    params,
    protocol::{SslInfoResponse, NO_CERTIFICATE_MESSAGE},
    ServiceError,
};
use percent_encoding::percent_decode_str;
use tracing::{info, warn};

use super::state::TlsConnectInfo;
use crate::certificate;

/// Path prefix of the diagnostic route; parameter pairs follow it.
pub const SSL_JSON_PREFIX: &str = "/ssl/json";

/// Where the root path redirects to.
pub const PROJECT_URL: &str = "https://github.com/balkin/ssl-server-info";

/// `GET /` (and any unrouted path): redirect to the project page.
pub async fn home() -> Response {
    (StatusCode::FOUND, [(header::LOCATION, PROJECT_URL)]).into_response()
}

/// `ANY /ssl/json[/<key>/<value>...]`: echo the observed TLS and request metadata.
///
/// `delay` (milliseconds) and `statusCode` may be given as path pairs or query
/// parameters; the query wins. Malformed values are ignored.
pub async fn ssl_json(request: Request) -> Response {
    match describe(request).await {
        Ok(resp) => resp,
        Err(e) => reject(e),
    }
}

async fn describe(request: Request) -> Result<Response, ServiceError> {
    let (parts, _body) = request.into_parts();

    let tls = parts
        .extensions
        .get::<TlsConnectInfo>()
        .cloned()
        .ok_or_else(|| ServiceError::Forbidden("connection is not TLS-secured".into()))?;

    let tail = parts.uri.path().strip_prefix(SSL_JSON_PREFIX).unwrap_or_default();
    let tail = percent_decode_str(tail).decode_utf8_lossy();
    let params = params::extract(&tail, &query_pairs(&parts.uri));

    let mut body = request_facts(&parts, &tls);

    if let Some(delay) = params::delay(&params) {
        tokio::time::sleep(delay).await;
    }

    let requested_status = params::status_code(&params);

    let Some(leaf) = tls.leaf_certificate() else {
        body.message = NO_CERTIFICATE_MESSAGE.into();
        info!(
            remote_addr = %tls.remote_addr,
            reason = %body.message,
            "no peer certificates, returning 403"
        );
        return Err(ServiceError::NoPeerCertificate);
    };

    let peer = certificate::inspect(leaf.as_ref())?;
    body.ssl_subject = peer.subject;
    body.ssl_issuer = peer.issuer;
    body.ssl_not_before = peer.not_before;
    body.ssl_not_after = peer.not_after;

    let status = resolve_status(requested_status)?;
    let mut json = serde_json::to_vec(&body)?;
    json.push(b'\n');

    Ok((
        status,
        [(header::CONTENT_TYPE, HeaderValue::from_static("application/json"))],
        json,
    )
        .into_response())
}

/// Map a [`ServiceError`] to a newline-terminated plain-text response.
fn reject(e: ServiceError) -> Response {
    let status = StatusCode::from_u16(e.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let text = match e {
        ServiceError::Forbidden(_) => "Forbidden".to_owned(),
        ServiceError::NoPeerCertificate => String::new(),
        other => {
            warn!(error = %other, "diagnostic request failed");
            other.to_string()
        }
    };
    (status, format!("{text}\n")).into_response()
}

/// Request and connection facts captured at handler entry.
fn request_facts(parts: &Parts, tls: &TlsConnectInfo) -> SslInfoResponse {
    let headers = &parts.headers;
    let host = parts
        .uri
        .authority()
        .map(|a| a.as_str().to_owned())
        .unwrap_or_else(|| header_value(headers, header::HOST));

    SslInfoResponse {
        header_content_type: header_value(headers, header::CONTENT_TYPE),
        header_accept: header_value(headers, header::ACCEPT),
        header_user_agent: header_value(headers, header::USER_AGENT),
        header_connection: header_value(headers, header::CONNECTION),
        http_host: host,
        http_server_addr: tls.remote_addr.to_string(),
        request_protocol: format!("{:?}", parts.version),
        request_method: parts.method.as_str().to_owned(),
        request_uri: request_target(&parts.uri, parts.version),
        request_timestamp: unix_now(),
        ..SslInfoResponse::identified()
    }
}

/// The request-target as the client sent it.
///
/// HTTP/1 absolute-form targets keep their scheme and authority. HTTP/2
/// carries those as pseudo-headers, so only the path and query are reported.
fn request_target(uri: &Uri, version: Version) -> String {
    if uri.authority().is_some() && version < Version::HTTP_2 {
        return uri.to_string();
    }
    uri.path_and_query()
        .map(|pq| pq.as_str().to_owned())
        .unwrap_or_else(|| uri.path().to_owned())
}

/// Decoded query pairs in request order; an undecodable query counts as empty.
fn query_pairs(uri: &Uri) -> Vec<(String, String)> {
    Query::<Vec<(String, String)>>::try_from_uri(uri)
        .map(|Query(pairs)| pairs)
        .unwrap_or_default()
}

/// The header's bytes as sent; invalid UTF-8 sequences become U+FFFD.
fn header_value(headers: &HeaderMap, name: HeaderName) -> String {
    headers
        .get(name)
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
        .unwrap_or_default()
}

fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or_default()
}

/// Requested status, or 200. Any code that fits a status line is passed through.
fn resolve_status(requested: Option<i64>) -> Result<StatusCode, ServiceError> {
    let Some(code) = requested else {
        return Ok(StatusCode::OK);
    };
    u16::try_from(code)
        .ok()
        .and_then(|c| StatusCode::from_u16(c).ok())
        .ok_or(ServiceError::InvalidStatusCode(code))
}
