//! Redirect plain HTTP requests to HTTPS

use axum::extract::{Request, State};
use axum::http::header;
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use tracing::debug;

const FORWARDED_PROTO: &str = "x-forwarded-proto";

/// Middleware answering non-HTTPS requests with a 307 to the same path on
/// `https_port`. Requests without a `Host` header are passed through.
pub async fn redirect_to_https(
    State(https_port): State<u16>,
    request: Request,
    next: Next,
) -> Response {
    if is_https(&request) {
        return next.run(request).await;
    }

    let Some(host) = request
        .headers()
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
    else {
        return next.run(request).await;
    };

    let path_and_query = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");
    let target = https_url(host, https_port, path_and_query);
    debug!("Redirecting {} to {}", request.uri(), target);

    Redirect::temporary(&target).into_response()
}

fn is_https(request: &Request) -> bool {
    if request.uri().scheme_str() == Some("https") {
        return true;
    }
    request
        .headers()
        .get(FORWARDED_PROTO)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|proto| proto.eq_ignore_ascii_case("https"))
}

fn https_url(host: &str, port: u16, path_and_query: &str) -> String {
    let host = strip_port(host);
    if port == 443 {
        format!("https://{}{}", host, path_and_query)
    } else {
        format!("https://{}:{}{}", host, port, path_and_query)
    }
}

/// Drop a trailing `:port`, leaving bracketed IPv6 literals intact
fn strip_port(host: &str) -> &str {
    match host.rfind(':') {
        Some(idx) if !host[idx..].contains(']') => &host[..idx],
        _ => host,
    }
}
