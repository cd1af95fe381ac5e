//! Rejection reasons for individual script identifiers
//!
//! A rejection never aborts a combo request: the identifier is skipped and the
//! rest of the list is still served. Only [`Rejection::MissingFile`] changes the
//! response status.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    /// Directory component outside the lowercase `[a-z0-9-/]` policy
    #[error("invalid directory '{dir}' in '{identifier}'")]
    InvalidPath { identifier: String, dir: String },

    /// File name with more than one extension dot and one version dot
    #[error("too many dots ({dots}) in '{identifier}'")]
    TooManyVersionTokens { identifier: String, dots: usize },

    #[error("script '{identifier}' not found at {}", path.display())]
    MissingFile { identifier: String, path: PathBuf },

    /// Unversioned script requested from a directory that mandates versions
    #[error("script '{identifier}' is not versioned but versions are required")]
    VersionRequiredButMissing { identifier: String },
}

impl Rejection {
    /// Identifier as it appeared in the query string
    pub fn identifier(&self) -> &str {
        match self {
            Self::InvalidPath { identifier, .. }
            | Self::TooManyVersionTokens { identifier, .. }
            | Self::MissingFile { identifier, .. }
            | Self::VersionRequiredButMissing { identifier } => identifier,
        }
    }

    /// Whether this rejection makes the whole response a 400
    ///
    /// The remaining scripts are still sent; the status only keeps shared
    /// caches from storing a partial combo.
    pub const fn raises_bad_request(&self) -> bool {
        matches!(self, Self::MissingFile { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_missing_file_raises_bad_request() {
        let missing = Rejection::MissingFile {
            identifier: "a/b.js".to_string(),
            path: PathBuf::from("/srv/yui/a/b.js"),
        };
        let invalid = Rejection::InvalidPath {
            identifier: "A/b.js".to_string(),
            dir: "A".to_string(),
        };
        let dots = Rejection::TooManyVersionTokens {
            identifier: "a/b.1.2.js".to_string(),
            dots: 3,
        };
        let unversioned = Rejection::VersionRequiredButMissing {
            identifier: "a/b.js".to_string(),
        };

        assert!(missing.raises_bad_request());
        assert!(!invalid.raises_bad_request());
        assert!(!dots.raises_bad_request());
        assert!(!unversioned.raises_bad_request());
    }

    #[test]
    fn test_display_and_identifier() {
        let rejection = Rejection::TooManyVersionTokens {
            identifier: "a/b.1.2.js".to_string(),
            dots: 3,
        };
        assert_eq!(rejection.identifier(), "a/b.1.2.js");
        assert_eq!(rejection.to_string(), "too many dots (3) in 'a/b.1.2.js'");
    }
}
