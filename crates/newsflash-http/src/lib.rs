//! # NewsFlash HTTP
//!
//! HTTP client for the NewsFlash networking layer.
//!
//! ## Features
//!
//! - **Interceptor chain**: request mutation and response observation in a
//!   fixed registration order
//! - **Response cache**: fresh cached GETs are served without a network hit,
//!   storage honors the server's caching headers
//! - **Body logging**: full request/response logging in debug builds, silent
//!   in release builds
//! - **Connection pooling**: managed by the underlying reqwest client

pub mod client;
pub mod error;
pub mod interceptor;
pub mod logging;
pub mod policy;

pub use client::{HttpClient, HttpClientBuilder, Request, Response};
pub use error::{HttpError, Result};
pub use interceptor::Interceptor;
pub use logging::{LogLevel, LoggingInterceptor};
pub use policy::CachePolicy;

/// Re-export commonly used types
pub use reqwest::{header, Method, StatusCode};
