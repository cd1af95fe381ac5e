//! HTTP cache control module
//!
//! Provides `Cache-Control` policies and HTTP-date formatting for `Expires`.

use chrono::{DateTime, Duration, Utc};

/// Ten years, the lifetime granted to version-stamped combos
pub const FAR_FUTURE_SECS: u32 = 315_360_000;

/// Cache control policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CachePolicy {
    /// Cacheable by any cache for the given number of seconds
    MaxAge(u32),
    /// Never store (probes, errors)
    NoStore,
}

impl CachePolicy {
    /// Far-future policy for immutable, versioned content
    pub const fn far_future() -> Self {
        Self::MaxAge(FAR_FUTURE_SECS)
    }

    /// Convert to Cache-Control header value
    pub fn to_header_value(self) -> String {
        match self {
            Self::MaxAge(max_age) => format!("max-age={max_age}"),
            Self::NoStore => "no-store".to_string(),
        }
    }

    /// Absolute expiry matching this policy, as an `Expires` header value
    pub fn expires_at(self, now: DateTime<Utc>) -> Option<String> {
        match self {
            Self::MaxAge(max_age) => {
                Some(format_http_date(now + Duration::seconds(i64::from(max_age))))
            }
            Self::NoStore => None,
        }
    }
}

/// Format a timestamp as an IMF-fixdate, e.g. `Sun, 06 Nov 1994 08:49:37 GMT`
pub fn format_http_date(time: DateTime<Utc>) -> String {
    time.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}
