//! # NewsFlash Cache
//!
//! Bounded disk cache for HTTP responses.
//!
//! ## Features
//!
//! - **Disk persistence**: one JSON document per entry, survives restarts
//! - **Byte bound**: total size capped, least-recently-used entries evicted
//! - **Expiry on read**: stale entries are dropped the moment they are seen
//! - **Async operations**: full async/await support via tokio

pub mod disk;
pub mod entry;
pub mod error;

pub use disk::DiskCache;
pub use entry::CachedResponse;
pub use error::CacheError;

/// Default cache bound: 20 MiB.
pub const DEFAULT_MAX_BYTES: u64 = 20 * 1024 * 1024;

/// Re-export commonly used Result type
pub type Result<T> = std::result::Result<T, CacheError>;
