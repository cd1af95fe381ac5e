//! HTTP response building module
//!
//! Provides builders for the responses the server emits, decoupled from the
//! combo logic itself.

use super::cache::CachePolicy;
use chrono::{DateTime, Utc};
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};

/// Build a script response, optionally with cache headers
///
/// `Content-Length` always reflects `data`, even for HEAD where the body is
/// dropped.
pub fn build_script_response(
    status: StatusCode,
    data: Bytes,
    content_type: &str,
    cache: Option<CachePolicy>,
    now: DateTime<Utc>,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let content_length = data.len();
    let body = if is_head { Bytes::new() } else { data };

    let mut builder = Response::builder().status(status);
    if let Some(policy) = cache {
        builder = builder.header("Cache-Control", policy.to_header_value());
        if let Some(expires) = policy.expires_at(now) {
            builder = builder.header("Expires", expires);
        }
    }

    builder
        .header("Content-Type", content_type)
        .header("Content-Length", content_length)
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error(status.as_str(), &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 404 Not Found response
pub fn build_404_response() -> Response<Full<Bytes>> {
    build_text_response(StatusCode::NOT_FOUND, "404 Not Found")
}

/// Build 405 Method Not Allowed response
pub fn build_405_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::METHOD_NOT_ALLOWED)
        .header("Content-Type", "text/plain")
        .header("Allow", "GET, HEAD, OPTIONS")
        .body(Full::new(Bytes::from("405 Method Not Allowed")))
        .unwrap_or_else(|e| {
            log_build_error("405", &e);
            Response::new(Full::new(Bytes::from("405 Method Not Allowed")))
        })
}

/// Build OPTIONS response (preflight request)
pub fn build_options_response(enable_cors: bool) -> Response<Full<Bytes>> {
    let mut builder = Response::builder()
        .status(StatusCode::NO_CONTENT)
        .header("Allow", "GET, HEAD, OPTIONS");

    if enable_cors {
        builder = builder
            .header("Access-Control-Allow-Origin", "*")
            .header("Access-Control-Allow-Methods", "GET, HEAD, OPTIONS")
            .header("Access-Control-Max-Age", "86400");
    }

    builder.body(Full::new(Bytes::new())).unwrap_or_else(|e| {
        log_build_error("OPTIONS", &e);
        Response::new(Full::new(Bytes::new()))
    })
}

/// Build health probe response (200 when healthy, 503 otherwise)
pub fn build_health_response(healthy: bool) -> Response<Full<Bytes>> {
    if healthy {
        build_text_response(StatusCode::OK, "ok")
    } else {
        build_text_response(StatusCode::SERVICE_UNAVAILABLE, "not ready")
    }
}

/// Plain-text response that caches must not store
fn build_text_response(status: StatusCode, text: &'static str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .header("Content-Type", "text/plain")
        .header("Cache-Control", CachePolicy::NoStore.to_header_value())
        .body(Full::new(Bytes::from(text)))
        .unwrap_or_else(|e| {
            log_build_error(status.as_str(), &e);
            Response::new(Full::new(Bytes::from(text)))
        })
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_response_without_cache() {
        let resp = build_script_response(
            StatusCode::OK,
            Bytes::from_static(b"var a;"),
            "application/x-javascript",
            None,
            Utc::now(),
            false,
        );
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()["content-type"], "application/x-javascript");
        assert_eq!(resp.headers()["content-length"], "6");
        assert!(resp.headers().get("cache-control").is_none());
        assert!(resp.headers().get("expires").is_none());
    }

    #[test]
    fn test_script_response_with_far_future_cache() {
        let resp = build_script_response(
            StatusCode::BAD_REQUEST,
            Bytes::new(),
            "application/x-javascript",
            Some(CachePolicy::far_future()),
            Utc::now(),
            true,
        );
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(resp.headers()["cache-control"], "max-age=315360000");
        assert!(resp.headers()["expires"]
            .to_str()
            .unwrap()
            .ends_with(" GMT"));
    }

    #[test]
    fn test_health_response() {
        assert_eq!(build_health_response(true).status(), StatusCode::OK);
        let resp = build_health_response(false);
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(resp.headers()["cache-control"], "no-store");
    }

    #[test]
    fn test_options_response_cors() {
        let resp = build_options_response(true);
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
        assert_eq!(resp.headers()["access-control-allow-origin"], "*");
        assert!(build_options_response(false)
            .headers()
            .get("access-control-allow-origin")
            .is_none());
    }
}
