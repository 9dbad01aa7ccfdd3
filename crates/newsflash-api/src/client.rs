//! REST client bound to a single base endpoint

use std::sync::Arc;

use newsflash_http::HttpClient;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::call::{Call, CallAdapter};
use crate::convert::{BodyConverter, ConverterChain};
use crate::{ApiError, Result};

/// Reusable REST client: HTTP transport, call adapter, and converter chain
/// bound to exactly one base URL for the client's lifetime.
pub struct RestClient {
    http: Arc<HttpClient>,
    adapter: CallAdapter,
    converters: Arc<ConverterChain>,
    base_url: Url,
}

impl RestClient {
    /// Start building a REST client
    pub fn builder() -> RestClientBuilder {
        RestClientBuilder::new()
    }

    /// The endpoint every path is resolved against
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Issue a GET for `path`, decoded as `T`.
    ///
    /// The request runs on the adapter's scheduler; the returned handle can
    /// be awaited or cancelled. `Ok(None)` is the absent value produced for
    /// declared-empty bodies.
    pub fn get<T>(&self, path: &str) -> Call<Option<T>>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let url = self.base_url.join(path);
        let http = Arc::clone(&self.http);
        let converters = Arc::clone(&self.converters);

        self.adapter.submit(async move {
            let url = url?;
            debug!("GET {url}");
            let response = http.get(url).await?;
            converters.decode::<T>(&response)
        })
    }
}

/// Builder for [`RestClient`]
pub struct RestClientBuilder {
    http: Option<Arc<HttpClient>>,
    adapter: Option<CallAdapter>,
    converters: Vec<Arc<dyn BodyConverter>>,
    base_url: Option<Url>,
}

impl RestClientBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self {
            http: None,
            adapter: None,
            converters: Vec::new(),
            base_url: None,
        }
    }

    /// Set the HTTP client (required)
    pub fn client(mut self, http: Arc<HttpClient>) -> Self {
        self.http = Some(http);
        self
    }

    /// Set the call adapter (required)
    pub fn call_adapter(mut self, adapter: CallAdapter) -> Self {
        self.adapter = Some(adapter);
        self
    }

    /// Append a converter; converters are consulted in the order added
    pub fn converter(mut self, converter: Arc<dyn BodyConverter>) -> Self {
        self.converters.push(converter);
        self
    }

    /// Set the base URL (required)
    pub fn base_url(mut self, base_url: Url) -> Self {
        self.base_url = Some(base_url);
        self
    }

    /// Build the client
    pub fn build(self) -> Result<RestClient> {
        let http = self.http.ok_or_else(|| ApiError::Builder {
            message: "an HTTP client is required".to_string(),
        })?;
        let adapter = self.adapter.ok_or_else(|| ApiError::Builder {
            message: "a call adapter is required".to_string(),
        })?;
        let base_url = self.base_url.ok_or_else(|| ApiError::Builder {
            message: "a base URL is required".to_string(),
        })?;
        if self.converters.is_empty() {
            return Err(ApiError::Builder {
                message: "at least one converter is required".to_string(),
            });
        }

        Ok(RestClient {
            http,
            adapter,
            converters: Arc::new(ConverterChain::new(self.converters)),
            base_url,
        })
    }
}

impl Default for RestClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
