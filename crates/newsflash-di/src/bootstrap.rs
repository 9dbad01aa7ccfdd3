//! Network stack composition

use std::path::PathBuf;
use std::sync::Arc;

use newsflash_api::{CallAdapter, EmptyBodyConverter, JsonConverter, RestClient};
use newsflash_cache::{DiskCache, DEFAULT_MAX_BYTES};
use newsflash_http::{HttpClient, Interceptor, LoggingInterceptor};
use serde::{Deserialize, Serialize};
use tracing::info;
use url::Url;

use crate::{Container, DiError};

/// Base endpoint every request resolves against
pub const BASE_URL: &str = "https://newsapi.org/";

/// Configuration for the networking layer.
///
/// Only the cache directory has no default; the host application supplies
/// its runtime cache location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Directory the response cache lives in
    pub cache_dir: PathBuf,

    /// Total cache bound in bytes
    #[serde(default = "default_cache_max_bytes")]
    pub cache_max_bytes: u64,

    /// Endpoint requests resolve against
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// User agent presented to the server
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl NetworkConfig {
    /// Configuration with defaults for everything but the cache directory
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
            cache_max_bytes: default_cache_max_bytes(),
            base_url: default_base_url(),
            user_agent: default_user_agent(),
        }
    }

    /// Override the base URL (tests point this at a local server)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

// Default value functions for serde
fn default_cache_max_bytes() -> u64 {
    DEFAULT_MAX_BYTES
}

fn default_base_url() -> String {
    BASE_URL.to_string()
}

fn default_user_agent() -> String {
    format!("NewsFlash/{}", env!("CARGO_PKG_VERSION"))
}

/// Composition failures, wrapping whichever layer refused to come up
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error("Cache setup failed: {0}")]
    Cache(#[from] newsflash_cache::CacheError),

    #[error("HTTP client setup failed: {0}")]
    Http(#[from] newsflash_http::HttpError),

    #[error("REST client setup failed: {0}")]
    Api(#[from] newsflash_api::ApiError),

    #[error("Invalid base URL: {0}")]
    BaseUrl(#[from] url::ParseError),

    #[error("Service registration failed: {0}")]
    Container(#[from] DiError),
}

/// Immutable bundle of the composed networking singletons.
///
/// Constructed once by [`bootstrap`] and shared by reference from there
/// on; nothing in it can be replaced after construction.
pub struct NetworkServices {
    cache: Arc<DiskCache>,
    http: Arc<HttpClient>,
    rest: Arc<RestClient>,
    container: Arc<Container>,
}

impl NetworkServices {
    /// The response cache
    pub fn cache(&self) -> &Arc<DiskCache> {
        &self.cache
    }

    /// The HTTP client
    pub fn http(&self) -> &Arc<HttpClient> {
        &self.http
    }

    /// The REST client
    pub fn rest(&self) -> &Arc<RestClient> {
        &self.rest
    }

    /// The container the singletons are registered in
    pub fn container(&self) -> &Arc<Container> {
        &self.container
    }
}

/// Compose the networking stack, leaves first, and register every piece
/// as a process-lifetime singleton.
///
/// Invoke once at process startup, on the runtime the calls should run
/// on. `auth_interceptor` is the host-supplied collaborator that attaches
/// credentials; it runs before the logging interceptor on every request.
pub async fn bootstrap(
    config: NetworkConfig,
    auth_interceptor: Arc<dyn Interceptor>,
) -> Result<NetworkServices, BootstrapError> {
    let cache = Arc::new(DiskCache::open(&config.cache_dir, config.cache_max_bytes).await?);

    let logging_interceptor = Arc::new(LoggingInterceptor::from_build());

    let http = Arc::new(
        HttpClient::builder()
            .user_agent(&config.user_agent)
            .cache(Arc::clone(&cache))
            .interceptor(Arc::clone(&auth_interceptor))
            .interceptor(logging_interceptor.clone())
            .build()?,
    );

    let adapter = CallAdapter::current()?;

    let base_url = Url::parse(&config.base_url)?;
    let rest = Arc::new(
        RestClient::builder()
            .client(Arc::clone(&http))
            .call_adapter(adapter.clone())
            .converter(Arc::new(EmptyBodyConverter))
            .converter(Arc::new(JsonConverter))
            .base_url(base_url)
            .build()?,
    );

    let container = Container::new();
    {
        let cache = Arc::clone(&cache);
        container.register(move |_| Ok(Arc::clone(&cache)))?;
    }
    {
        let logging = Arc::clone(&logging_interceptor);
        container.register(move |_| Ok(Arc::clone(&logging)))?;
    }
    {
        let http = Arc::clone(&http);
        container.register(move |_| Ok(Arc::clone(&http)))?;
    }
    {
        let adapter = adapter.clone();
        container.register(move |_| Ok(Arc::new(adapter.clone())))?;
    }
    {
        let rest = Arc::clone(&rest);
        container.register(move |_| Ok(Arc::clone(&rest)))?;
    }

    info!("Network stack ready, endpoint {}", rest.base_url());

    Ok(NetworkServices {
        cache,
        http,
        rest,
        container: Arc::new(container),
    })
}
