//! Traffic logging interceptor

use tracing::debug;

use crate::client::{Request, Response};
use crate::interceptor::Interceptor;
use crate::Result;

/// Logging verbosity. Exactly two states exist: full bodies or nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Emit nothing
    None,
    /// Log request and response lines including full bodies
    Body,
}

impl LogLevel {
    /// Derive the level from the build profile: full bodies in debug
    /// builds, silent in release builds.
    pub fn from_build() -> Self {
        if cfg!(debug_assertions) {
            LogLevel::Body
        } else {
            LogLevel::None
        }
    }
}

/// Interceptor that logs outbound requests and inbound responses
pub struct LoggingInterceptor {
    level: LogLevel,
}

impl LoggingInterceptor {
    /// Create a logging interceptor with an explicit level
    pub fn new(level: LogLevel) -> Self {
        Self { level }
    }

    /// Create a logging interceptor with the level the build profile selects
    pub fn from_build() -> Self {
        Self::new(LogLevel::from_build())
    }

    /// Current verbosity
    pub fn level(&self) -> LogLevel {
        self.level
    }
}

impl Interceptor for LoggingInterceptor {
    fn on_request(&self, request: &mut Request) -> Result<()> {
        if self.level == LogLevel::Body {
            match &request.body {
                Some(body) => debug!(
                    "--> {} {} ({} bytes)\n{}",
                    request.method,
                    request.url,
                    body.len(),
                    String::from_utf8_lossy(body)
                ),
                None => debug!("--> {} {}", request.method, request.url),
            }
        }
        Ok(())
    }

    fn on_response(&self, response: &Response) {
        if self.level == LogLevel::Body {
            debug!(
                "<-- {} ({} bytes{})\n{}",
                response.status,
                response.body.len(),
                if response.from_cache { ", cached" } else { "" },
                String::from_utf8_lossy(&response.body)
            );
        }
    }
}
