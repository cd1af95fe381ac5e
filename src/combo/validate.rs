//! Script validation and selection
//!
//! Turns the raw identifiers of a combo request into the ordered list of files
//! that will be concatenated, together with the cache eligibility and status
//! hint of the response. Nothing here writes headers: the result is a plain
//! value that the renderer consumes.

use super::error::Rejection;
use std::path::{Path, PathBuf};

/// Marker file whose presence in the base directory makes versions mandatory
pub const REQUIRE_VERSIONS_FILE: &str = ".require-versions";

/// One dot for the extension, one for the version token
pub const MAX_NAME_DOTS: usize = 2;

/// Status the response should carry once rendering starts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusHint {
    #[default]
    Ok,
    BadRequest,
}

/// A script accepted into the combo output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedScript {
    pub identifier: String,
    pub path: PathBuf,
}

/// Outcome of validating every identifier of one request
#[derive(Debug, Clone, Default)]
pub struct ComboSelection {
    /// Accepted scripts, in request order
    pub scripts: Vec<ResolvedScript>,
    /// True when at least one accepted script is version-stamped
    pub enable_cache: bool,
    /// Sentinel file was present in the base directory
    pub require_versions: bool,
    pub status: StatusHint,
    pub rejections: Vec<Rejection>,
}

impl ComboSelection {
    /// Number of identifiers that pointed at files not present on disk
    pub fn missing_files(&self) -> usize {
        self.rejections
            .iter()
            .filter(|r| r.raises_bad_request())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.scripts.is_empty()
    }
}

/// Validate identifiers against `base_path` and collect the accepted scripts
pub fn select_scripts<S: AsRef<str>>(identifiers: &[S], base_path: &Path) -> ComboSelection {
    let require_versions = base_path.join(REQUIRE_VERSIONS_FILE).exists();

    let mut selection = ComboSelection {
        require_versions,
        ..ComboSelection::default()
    };

    for identifier in identifiers {
        match resolve_script(identifier.as_ref(), base_path, require_versions) {
            Ok((script, versioned)) => {
                if versioned {
                    selection.enable_cache = true;
                }
                selection.scripts.push(script);
            }
            Err(rejection) => {
                if rejection.raises_bad_request() {
                    selection.status = StatusHint::BadRequest;
                }
                selection.rejections.push(rejection);
            }
        }
    }

    selection
}

/// Resolve one identifier, returning the script and whether it is versioned
fn resolve_script(
    identifier: &str,
    base_path: &Path,
    require_versions: bool,
) -> Result<(ResolvedScript, bool), Rejection> {
    let (dir, name) = split_identifier(identifier);

    if !is_valid_dir(dir) {
        return Err(Rejection::InvalidPath {
            identifier: identifier.to_string(),
            dir: dir.to_string(),
        });
    }

    let dots = count_dots(name);
    if dots > MAX_NAME_DOTS {
        return Err(Rejection::TooManyVersionTokens {
            identifier: identifier.to_string(),
            dots,
        });
    }

    let path = base_path.join(dir).join(name);
    if !path.is_file() {
        return Err(Rejection::MissingFile {
            identifier: identifier.to_string(),
            path,
        });
    }

    let versioned = dots == MAX_NAME_DOTS;
    if !versioned && require_versions {
        return Err(Rejection::VersionRequiredButMissing {
            identifier: identifier.to_string(),
        });
    }

    Ok((
        ResolvedScript {
            identifier: identifier.to_string(),
            path,
        },
        versioned,
    ))
}

/// Split `dir/name` at the last slash; a bare name has an empty directory
pub fn split_identifier(identifier: &str) -> (&str, &str) {
    identifier.rsplit_once('/').unwrap_or(("", identifier))
}

/// Directory policy: `^[a-z0-9-][a-z0-9-/]*$`, or empty for root-level scripts
///
/// Case-sensitive: `..`, uppercase and whitespace never pass.
pub fn is_valid_dir(dir: &str) -> bool {
    let mut chars = dir.chars();
    match chars.next() {
        None => true,
        Some(first) => is_dir_lead_char(first) && chars.all(|c| is_dir_lead_char(c) || c == '/'),
    }
}

const fn is_dir_lead_char(c: char) -> bool {
    matches!(c, 'a'..='z' | '0'..='9' | '-')
}

fn count_dots(name: &str) -> usize {
    name.bytes().filter(|&b| b == b'.').count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn fixture(files: &[(&str, &str)]) -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        for (rel, content) in files {
            let path = dir.path().join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        }
        dir
    }

    fn identifiers(selection: &ComboSelection) -> Vec<&str> {
        selection
            .scripts
            .iter()
            .map(|s| s.identifier.as_str())
            .collect()
    }

    #[test]
    fn test_split_identifier() {
        assert_eq!(split_identifier("a/b.js"), ("a", "b.js"));
        assert_eq!(split_identifier("a/b/c.js"), ("a/b", "c.js"));
        assert_eq!(split_identifier("c.js"), ("", "c.js"));
        assert_eq!(split_identifier("../../etc/passwd"), ("../../etc", "passwd"));
    }

    #[test]
    fn test_dir_policy() {
        assert!(is_valid_dir(""));
        assert!(is_valid_dir("yui"));
        assert!(is_valid_dir("yui-3/build/node-base"));
        assert!(is_valid_dir("3rd-party/"));

        assert!(!is_valid_dir("Yui"));
        assert!(!is_valid_dir("yui/Build"));
        assert!(!is_valid_dir("my dir"));
        assert!(!is_valid_dir(".."));
        assert!(!is_valid_dir("a/../b"));
        assert!(!is_valid_dir("/etc"));
        assert!(!is_valid_dir("a_b"));
    }

    #[test]
    fn test_mixed_request_scenario() {
        let base = fixture(&[("a/b.js", "var b;"), ("c/d.2.js", "var d;")]);
        let selection = select_scripts(&["a/b.js", "c/d.2.js", "missing/e.js"], base.path());

        assert_eq!(identifiers(&selection), vec!["a/b.js", "c/d.2.js"]);
        assert_eq!(selection.scripts[0].path, base.path().join("a").join("b.js"));
        assert!(selection.enable_cache);
        assert!(!selection.require_versions);
        assert_eq!(selection.status, StatusHint::BadRequest);
        assert_eq!(selection.missing_files(), 1);
    }

    #[test]
    fn test_empty_request() {
        let base = fixture(&[]);
        let selection = select_scripts::<&str>(&[], base.path());
        assert!(selection.is_empty());
        assert!(!selection.enable_cache);
        assert_eq!(selection.status, StatusHint::Ok);
    }

    #[test]
    fn test_traversal_rejected_before_existence_check() {
        let base = fixture(&[]);
        let selection = select_scripts(&["../../etc/passwd"], base.path());

        assert!(selection.is_empty());
        assert_eq!(selection.status, StatusHint::Ok);
        assert!(matches!(
            selection.rejections.as_slice(),
            [Rejection::InvalidPath { dir, .. }] if dir == "../../etc"
        ));
    }

    #[test]
    fn test_uppercase_and_space_dirs_rejected_even_if_present() {
        let base = fixture(&[("Lib/a.js", "1"), ("my lib/a.js", "2")]);
        let selection = select_scripts(&["Lib/a.js", "my lib/a.js"], base.path());
        assert!(selection.is_empty());
        assert_eq!(selection.rejections.len(), 2);
        assert_eq!(selection.status, StatusHint::Ok);
    }

    #[test]
    fn test_too_many_dots_rejected_regardless_of_existence() {
        let base = fixture(&[("a/b.1.2.js", "x")]);
        let selection = select_scripts(&["a/b.1.2.js", "a/gone.1.2.js"], base.path());

        assert!(selection.is_empty());
        assert_eq!(selection.status, StatusHint::Ok);
        assert!(selection
            .rejections
            .iter()
            .all(|r| matches!(r, Rejection::TooManyVersionTokens { dots: 3, .. })));
    }

    #[test]
    fn test_root_level_script_accepted() {
        let base = fixture(&[("loader.js", "load();")]);
        let selection = select_scripts(&["loader.js"], base.path());
        assert_eq!(identifiers(&selection), vec!["loader.js"]);
        assert!(!selection.enable_cache);
    }

    #[test]
    fn test_unversioned_accepted_without_sentinel() {
        let base = fixture(&[("a/b.js", "b"), ("a/noext", "n")]);
        let selection = select_scripts(&["a/b.js", "a/noext"], base.path());
        assert_eq!(identifiers(&selection), vec!["a/b.js", "a/noext"]);
        assert!(!selection.enable_cache);
        assert!(selection.rejections.is_empty());
    }

    #[test]
    fn test_sentinel_requires_versions() {
        let base = fixture(&[
            (REQUIRE_VERSIONS_FILE, ""),
            ("a/b.js", "b"),
            ("a/c.7.js", "c"),
        ]);
        let selection = select_scripts(&["a/b.js", "a/c.7.js"], base.path());

        assert!(selection.require_versions);
        assert_eq!(identifiers(&selection), vec!["a/c.7.js"]);
        assert!(selection.enable_cache);
        assert_eq!(selection.status, StatusHint::Ok);
        assert!(matches!(
            selection.rejections.as_slice(),
            [Rejection::VersionRequiredButMissing { identifier }] if identifier == "a/b.js"
        ));
    }

    #[test]
    fn test_missing_file_raises_once_per_file() {
        let base = fixture(&[("a/b.js", "b")]);
        let selection = select_scripts(&["x/one.js", "a/b.js", "y/two.1.js"], base.path());
        assert_eq!(identifiers(&selection), vec!["a/b.js"]);
        assert_eq!(selection.missing_files(), 2);
        assert_eq!(selection.status, StatusHint::BadRequest);
    }

    #[test]
    fn test_directory_is_not_a_script() {
        let base = fixture(&[("a/sub/x.js", "x")]);
        let selection = select_scripts(&["a/sub", "a/.."], base.path());
        assert!(selection.is_empty());
        assert_eq!(selection.missing_files(), 2);
    }

    #[test]
    fn test_duplicates_preserved_in_order() {
        let base = fixture(&[("a/b.js", "b"), ("a/c.js", "c")]);
        let selection = select_scripts(&["a/c.js", "a/b.js", "a/c.js"], base.path());
        assert_eq!(identifiers(&selection), vec!["a/c.js", "a/b.js", "a/c.js"]);
    }
}
