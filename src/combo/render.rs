//! Combo rendering
//!
//! Concatenates the accepted scripts and wraps them in the combo response.

use super::validate::{ComboSelection, ResolvedScript, StatusHint};
use crate::http::{self, CachePolicy};
use crate::logger;
use chrono::Utc;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use tokio::fs;

pub const CONTENT_TYPE: &str = "application/x-javascript";

/// Concatenated script bytes plus the number of scripts that could not be read
#[derive(Debug, Default)]
pub struct ComboBody {
    pub data: Vec<u8>,
    pub unreadable: usize,
}

/// Read every script in order and append its raw bytes
///
/// Each file is opened, read and closed before the next one is touched. A
/// script that vanished or became unreadable since validation is skipped.
pub async fn concat_scripts(scripts: &[ResolvedScript]) -> ComboBody {
    let mut body = ComboBody::default();

    for script in scripts {
        match fs::read(&script.path).await {
            Ok(content) => body.data.extend_from_slice(&content),
            Err(e) => {
                logger::log_error(&format!(
                    "Failed to read script '{}' ({}): {e}",
                    script.identifier,
                    script.path.display()
                ));
                body.unreadable += 1;
            }
        }
    }

    body
}

/// Render a validated selection as the HTTP response
pub async fn render_combo(selection: &ComboSelection, is_head: bool) -> Response<Full<Bytes>> {
    let body = concat_scripts(&selection.scripts).await;

    let status = if selection.status == StatusHint::BadRequest || body.unreadable > 0 {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::OK
    };
    let cache = selection.enable_cache.then(CachePolicy::far_future);

    http::build_script_response(
        status,
        Bytes::from(body.data),
        CONTENT_TYPE,
        cache,
        Utc::now(),
        is_head,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combo::{parse, select_scripts};
    use http_body_util::BodyExt;
    use std::fs as std_fs;
    use std::path::Path;

    fn write_script(base: &Path, rel: &str, content: &str) {
        let path = base.join(rel);
        std_fs::create_dir_all(path.parent().unwrap()).unwrap();
        std_fs::write(path, content).unwrap();
    }

    async fn body_bytes(resp: Response<Full<Bytes>>) -> Bytes {
        resp.into_body().collect().await.unwrap().to_bytes()
    }

    #[tokio::test]
    async fn test_render_mixed_request() {
        let base = tempfile::tempdir().unwrap();
        write_script(base.path(), "a/b.js", "var b = 1;\n");
        write_script(base.path(), "c/d.2.js", "var d = 2;");

        let selection = parse("a/b.js&c/d.2.js&missing/e.js", base.path()).validate();
        let resp = render_combo(&selection, false).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(resp.headers()["content-type"], CONTENT_TYPE);
        assert_eq!(resp.headers()["cache-control"], "max-age=315360000");
        assert!(resp.headers().contains_key("expires"));
        assert_eq!(body_bytes(resp).await, "var b = 1;\nvar d = 2;");
    }

    #[tokio::test]
    async fn test_render_empty_selection() {
        let base = tempfile::tempdir().unwrap();
        let selection = parse("", base.path()).validate();
        let resp = render_combo(&selection, false).await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()["content-type"], CONTENT_TYPE);
        assert_eq!(resp.headers()["content-length"], "0");
        assert!(resp.headers().get("cache-control").is_none());
        assert!(resp.headers().get("expires").is_none());
        assert!(body_bytes(resp).await.is_empty());
    }

    #[tokio::test]
    async fn test_render_unversioned_is_not_cached() {
        let base = tempfile::tempdir().unwrap();
        write_script(base.path(), "lib/x.js", "x();");

        let selection = parse("lib/x.js", base.path()).validate();
        let resp = render_combo(&selection, false).await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert!(resp.headers().get("cache-control").is_none());
        assert_eq!(body_bytes(resp).await, "x();");
    }

    #[tokio::test]
    async fn test_render_head_keeps_headers() {
        let base = tempfile::tempdir().unwrap();
        write_script(base.path(), "lib/x.1.js", "abcd");

        let selection = parse("lib/x.1.js&lib/x.1.js", base.path()).validate();
        let resp = render_combo(&selection, true).await;

        assert_eq!(resp.headers()["content-length"], "8");
        assert_eq!(resp.headers()["cache-control"], "max-age=315360000");
        assert!(body_bytes(resp).await.is_empty());
    }

    #[tokio::test]
    async fn test_script_removed_after_validation() {
        let base = tempfile::tempdir().unwrap();
        write_script(base.path(), "a/one.js", "1");
        write_script(base.path(), "a/two.js", "2");

        let selection = select_scripts(&["a/one.js", "a/two.js"], base.path());
        std_fs::remove_file(base.path().join("a/one.js")).unwrap();

        let body = concat_scripts(&selection.scripts).await;
        assert_eq!(body.data, b"2");
        assert_eq!(body.unreadable, 1);

        let resp = render_combo(&selection, false).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
