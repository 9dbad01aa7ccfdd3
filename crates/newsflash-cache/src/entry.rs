//! Cached response entries

use std::time::{Duration, SystemTime};

use serde::{Deserialize, Serialize};

/// A single cached HTTP response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedResponse {
    /// HTTP status code
    pub status: u16,
    /// Response headers as name/value pairs
    pub headers: Vec<(String, String)>,
    /// Raw response body
    pub body: Vec<u8>,
    /// Content length the server declared, if any
    pub declared_length: Option<u64>,
    /// When the entry was stored
    pub stored_at: SystemTime,
    /// When the entry stops being servable (optional)
    pub expires_at: Option<SystemTime>,
}

impl CachedResponse {
    /// Create a new entry, freshness bounded by `ttl` when given
    pub fn new(
        status: u16,
        headers: Vec<(String, String)>,
        body: Vec<u8>,
        declared_length: Option<u64>,
        ttl: Option<Duration>,
    ) -> Self {
        let stored_at = SystemTime::now();
        let expires_at = ttl.map(|t| stored_at + t);

        Self {
            status,
            headers,
            body,
            declared_length,
            stored_at,
            expires_at,
        }
    }

    /// Check if the entry has expired
    pub fn is_expired(&self) -> bool {
        self.expires_at
            .map(|expires| SystemTime::now() > expires)
            .unwrap_or(false)
    }

    /// Get remaining freshness lifetime
    pub fn ttl_remaining(&self) -> Option<Duration> {
        self.expires_at?.duration_since(SystemTime::now()).ok()
    }
}
