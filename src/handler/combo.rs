//! Combo endpoint
//!
//! Glue between the router and the combo pipeline: parse the query, validate
//! against the configured base directory, log what was dropped, render.

use crate::combo;
use crate::config::AppState;
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;

/// Serve one combo request
pub async fn serve_combo(query: &str, state: &AppState, is_head: bool) -> Response<Full<Bytes>> {
    let request = combo::parse(query, &state.base_path);
    let selection = request.validate();

    for rejection in &selection.rejections {
        logger::log_rejection(rejection);
    }
    logger::log_debug(&format!(
        "[Combo] {}/{} script(s) accepted, versions required: {}, cacheable: {}",
        selection.scripts.len(),
        request.scripts().len(),
        selection.require_versions,
        selection.enable_cache
    ));

    combo::render_combo(&selection, is_head).await
}
