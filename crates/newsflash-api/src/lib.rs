//! # NewsFlash API
//!
//! REST client layer for the NewsFlash networking stack.
//!
//! ## Features
//!
//! - **Converter chain**: fixed-order response converters, with declared-empty
//!   bodies mapped to an explicit absent value ahead of JSON decoding
//! - **Call adapter**: work is submitted onto a background tokio scheduler and
//!   returned as a cancellable call handle
//! - **REST client**: builder-assembled, bound to exactly one base endpoint

pub mod call;
pub mod client;
pub mod convert;
pub mod error;

pub use call::{Call, CallAdapter};
pub use client::{RestClient, RestClientBuilder};
pub use convert::{BodyConverter, ConverterChain, Decoded, EmptyBodyConverter, JsonConverter};
pub use error::{ApiError, Result};
