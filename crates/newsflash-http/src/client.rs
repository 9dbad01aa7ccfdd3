//! HTTP client implementation

use std::sync::Arc;
use std::time::Duration;

use newsflash_cache::{CachedResponse, DiskCache};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_LENGTH};
use reqwest::{Method, StatusCode};
use tracing::debug;
use url::Url;

use crate::{error::HttpError, interceptor::Interceptor, policy::CachePolicy, Result};

/// Outbound HTTP request
#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Option<Vec<u8>>,
}

impl Request {
    /// Create a request with no headers and no body
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: HeaderMap::new(),
            body: None,
        }
    }

    /// Create a GET request
    pub fn get(url: Url) -> Self {
        Self::new(Method::GET, url)
    }

    /// Attach a header
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Attach a body
    pub fn body(mut self, body: Vec<u8>) -> Self {
        self.body = Some(body);
        self
    }
}

/// Inbound HTTP response
#[derive(Debug, Clone)]
pub struct Response {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
    /// Content length the server declared, if any. This is the header
    /// value, not the number of bytes actually read.
    pub declared_length: Option<u64>,
    /// Whether this response was served from the disk cache
    pub from_cache: bool,
}

impl Response {
    /// Whether the status code is in the 2xx range
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    fn from_cached(entry: &CachedResponse) -> Self {
        let mut headers = HeaderMap::new();
        for (name, value) in &entry.headers {
            if let (Ok(name), Ok(value)) = (
                HeaderName::from_bytes(name.as_bytes()),
                HeaderValue::from_str(value),
            ) {
                headers.append(name, value);
            }
        }

        Self {
            status: StatusCode::from_u16(entry.status).unwrap_or(StatusCode::OK),
            headers,
            body: entry.body.clone(),
            declared_length: entry.declared_length,
            from_cache: true,
        }
    }

    fn to_cached(&self, ttl: Duration) -> CachedResponse {
        let headers = self
            .headers
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();

        CachedResponse::new(
            self.status.as_u16(),
            headers,
            self.body.clone(),
            self.declared_length,
            Some(ttl),
        )
    }
}

/// HTTP client with a fixed interceptor chain and an optional response cache.
///
/// Interceptors run in registration order on every request. Fresh cached
/// GET responses are served without touching the network; storage honors
/// the caching headers the server returned. No retry, timeout, or backoff
/// policy is configured beyond the transport's defaults.
pub struct HttpClient {
    inner: reqwest::Client,
    cache: Option<Arc<DiskCache>>,
    interceptors: Vec<Arc<dyn Interceptor>>,
}

impl HttpClient {
    /// Start building a client
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::new()
    }

    /// Execute a GET request
    pub async fn get(&self, url: Url) -> Result<Response> {
        self.execute(Request::get(url)).await
    }

    /// Execute a request through the interceptor chain and cache
    pub async fn execute(&self, mut request: Request) -> Result<Response> {
        for interceptor in &self.interceptors {
            interceptor.on_request(&mut request)?;
        }

        let cache_key = request.url.to_string();

        if request.method == Method::GET {
            if let Some(cache) = &self.cache {
                if let Some(entry) = cache.get(&cache_key).await? {
                    debug!("Serving {} from cache", request.url);
                    let response = Response::from_cached(&entry);
                    for interceptor in &self.interceptors {
                        interceptor.on_response(&response);
                    }
                    return Ok(response);
                }
            }
        }

        let mut upstream = self
            .inner
            .request(request.method.clone(), request.url.clone())
            .headers(request.headers.clone());
        if let Some(body) = request.body.clone() {
            upstream = upstream.body(body);
        }

        let raw = upstream.send().await?;
        let status = raw.status();
        let headers = raw.headers().clone();
        let declared_length = declared_length(&headers);
        let body = raw.bytes().await?.to_vec();

        let response = Response {
            status,
            headers,
            body,
            declared_length,
            from_cache: false,
        };

        for interceptor in &self.interceptors {
            interceptor.on_response(&response);
        }

        if !response.is_success() {
            return Err(HttpError::HttpStatus {
                status: response.status,
                message: String::from_utf8_lossy(&response.body).into_owned(),
            });
        }

        if request.method == Method::GET {
            if let Some(cache) = &self.cache {
                let policy = CachePolicy::from_headers(&response.headers);
                if let Some(ttl) = policy.freshness_lifetime() {
                    cache.put(&cache_key, &response.to_cached(ttl)).await?;
                }
            }
        }

        Ok(response)
    }
}

/// Builder for [`HttpClient`]
pub struct HttpClientBuilder {
    user_agent: String,
    cache: Option<Arc<DiskCache>>,
    interceptors: Vec<Arc<dyn Interceptor>>,
}

impl HttpClientBuilder {
    /// Create a builder with the default user agent and no interceptors
    pub fn new() -> Self {
        Self {
            user_agent: default_user_agent(),
            cache: None,
            interceptors: Vec::new(),
        }
    }

    /// Set the user agent
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Attach a response cache
    pub fn cache(mut self, cache: Arc<DiskCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Append an interceptor. Interceptors run in the order they are added.
    pub fn interceptor(mut self, interceptor: Arc<dyn Interceptor>) -> Self {
        self.interceptors.push(interceptor);
        self
    }

    /// Build the client
    pub fn build(self) -> Result<HttpClient> {
        let inner = reqwest::Client::builder()
            .user_agent(&self.user_agent)
            .build()
            .map_err(|e| HttpError::BuildError(e.to_string()))?;

        Ok(HttpClient {
            inner,
            cache: self.cache,
            interceptors: self.interceptors,
        })
    }
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn default_user_agent() -> String {
    format!("NewsFlash/{}", env!("CARGO_PKG_VERSION"))
}

fn declared_length(headers: &HeaderMap) -> Option<u64> {
    headers.get(CONTENT_LENGTH)?.to_str().ok()?.parse().ok()
}
