//! Query string encoding for combo URLs
//!
//! A combo query is the `&`-joined list of script identifiers, e.g.
//! `/combo?yui/yui-min.3.js&app/main.js`. Identifiers are used as-is: they are
//! expected to already be URL-safe, so no escaping or decoding happens.

use super::ComboRequest;
use std::path::PathBuf;

pub const SEPARATOR: &str = "&";

/// Build the query string that [`parse`] turns back into the same identifiers
pub fn generate_query_string<S: AsRef<str>>(scripts: &[S]) -> String {
    scripts
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<&str>>()
        .join(SEPARATOR)
}

/// Parse a combo query string into a request rooted at `base_path`
///
/// Empty segments (`a.js&&b.js`, a leading or trailing `&`) are dropped; they
/// appear when URL rewriting upstream leaves stray separators behind.
pub fn parse(query_string: &str, base_path: impl Into<PathBuf>) -> ComboRequest {
    let scripts = split_scripts(query_string)
        .map(ToString::to_string)
        .collect();
    ComboRequest::new(scripts, base_path)
}

fn split_scripts(query_string: &str) -> impl Iterator<Item = &str> {
    query_string.split(SEPARATOR).filter(|s| !s.is_empty())
}
