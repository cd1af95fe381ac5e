//! Request routing dispatch module
//!
//! Entry point for HTTP request processing, responsible for method validation,
//! route matching, dispatching and access logging.

use crate::config::AppState;
use crate::handler::combo;
use crate::http;
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::header::{HeaderName, HeaderValue, REFERER, SERVER, USER_AGENT};
use hyper::http::request::Parts;
use hyper::{Method, Request, Response, Version};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Main entry point for HTTP request handling
///
/// The request body is never read, so any body type is accepted.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let (parts, _) = req.into_parts();

    let mut response = route_request(&parts, &state).await;

    match HeaderValue::from_str(&state.config.http.server_name) {
        Ok(value) => {
            response.headers_mut().insert(SERVER, value);
        }
        Err(_) => logger::log_warning("http.server_name is not a valid header value"),
    }

    if state.config.logging.access_log {
        let entry = build_access_entry(&parts, &response, peer_addr, started);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Check HTTP method and return appropriate response for non-GET/HEAD methods
fn check_http_method(method: &Method, enable_cors: bool) -> Option<Response<Full<Bytes>>> {
    match *method {
        Method::GET | Method::HEAD => None,
        Method::OPTIONS => Some(http::build_options_response(enable_cors)),
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            Some(http::build_405_response())
        }
    }
}

/// Route request based on path and configuration
async fn route_request(req: &Parts, state: &AppState) -> Response<Full<Bytes>> {
    if let Some(resp) = check_http_method(&req.method, state.config.http.enable_cors) {
        return resp;
    }

    let path = req.uri.path();
    let is_head = req.method == Method::HEAD;

    // Health check endpoints (highest priority, always fast)
    let health = &state.config.health;
    if health.enabled {
        if path == health.liveness_path {
            return http::build_health_response(true);
        }
        if path == health.readiness_path {
            return http::build_health_response(state.is_ready());
        }
    }

    if path == state.config.combo.path {
        let query = req.uri.query().unwrap_or("");
        return combo::serve_combo(query, state, is_head).await;
    }

    http::build_404_response()
}

fn build_access_entry(
    req: &Parts,
    response: &Response<Full<Bytes>>,
    peer_addr: SocketAddr,
    started: Instant,
) -> AccessLogEntry {
    let header = |name: HeaderName| {
        req.headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string)
    };

    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        req.method.to_string(),
        req.uri.path().to_string(),
    );
    entry.query = req.uri.query().map(ToString::to_string);
    entry.http_version = version_label(req.version).to_string();
    entry.status = response.status().as_u16();
    entry.body_bytes = response.body().size_hint().exact().unwrap_or(0);
    entry.referer = header(REFERER);
    entry.user_agent = header(USER_AGENT);
    entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
    entry
}

fn version_label(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        Version::HTTP_3 => "3",
        _ => "1.1",
    }
}
