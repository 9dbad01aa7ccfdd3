//! Response caching policy derived from server headers

use std::time::Duration;

use reqwest::header::{HeaderMap, CACHE_CONTROL};

/// Storage directives parsed from a `Cache-Control` response header.
///
/// Only the directives the cache acts on are represented; everything else
/// in the header is ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct CachePolicy {
    /// `no-store`: the response must never be written to the cache
    pub no_store: bool,
    /// `no-cache`: the response may not be served without revalidation
    pub no_cache: bool,
    /// `max-age`: freshness lifetime granted by the server
    pub max_age: Option<Duration>,
}

impl CachePolicy {
    /// Parse the policy out of a response header map
    pub fn from_headers(headers: &HeaderMap) -> Self {
        headers
            .get(CACHE_CONTROL)
            .and_then(|value| value.to_str().ok())
            .map(Self::parse)
            .unwrap_or_default()
    }

    /// Parse a raw `Cache-Control` header value
    pub fn parse(value: &str) -> Self {
        let mut policy = Self::default();

        for directive in value.split(',') {
            let directive = directive.trim().to_ascii_lowercase();
            if directive == "no-store" {
                policy.no_store = true;
            } else if directive == "no-cache" {
                policy.no_cache = true;
            } else if let Some(seconds) = directive.strip_prefix("max-age=") {
                if let Ok(seconds) = seconds.parse::<u64>() {
                    policy.max_age = Some(Duration::from_secs(seconds));
                }
            }
        }

        policy
    }

    /// How long the response may be served from cache, or `None` when it
    /// must not be stored at all.
    pub fn freshness_lifetime(&self) -> Option<Duration> {
        if self.no_store || self.no_cache {
            return None;
        }
        self.max_age.filter(|age| !age.is_zero())
    }
}
