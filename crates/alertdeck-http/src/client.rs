//! HTTP client implementation

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::{
    config::HttpConfig,
    error::{HttpError, Result},
    middleware::RetryPolicy,
    request::{HttpRequest, HttpResponse},
};

/// Mockable HTTP client trait
#[async_trait]
pub trait HttpClientTrait: Send + Sync {
    /// Execute a request; non-2xx answers come back as [`HttpError::HttpStatus`]
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse>;

    /// Execute a GET request
    async fn get(&self, url: &str) -> Result<HttpResponse> {
        self.send(HttpRequest::get(url)).await
    }

    /// Execute a POST request with a JSON body
    async fn post(&self, url: &str, body: serde_json::Value) -> Result<HttpResponse> {
        let mut request = HttpRequest::post(url);
        request.body = Some(body);
        self.send(request).await
    }

    /// Execute a PUT request with a JSON body
    async fn put(&self, url: &str, body: serde_json::Value) -> Result<HttpResponse> {
        let mut request = HttpRequest::put(url);
        request.body = Some(body);
        self.send(request).await
    }

    /// Execute a DELETE request
    async fn delete(&self, url: &str) -> Result<HttpResponse> {
        self.send(HttpRequest::delete(url)).await
    }
}

/// Production HTTP client
pub struct HttpClient {
    inner: reqwest::Client,
    config: HttpConfig,
    retry: RetryPolicy,
}

impl HttpClient {
    /// Create a new HTTP client with configuration
    pub fn new(config: HttpConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .timeout(config.timeout())
            .connect_timeout(config.connect_timeout())
            .user_agent(config.user_agent());

        if let Some(proxy_url) = &config.proxy {
            let proxy = reqwest::Proxy::all(proxy_url)
                .map_err(|e| HttpError::InvalidProxy(e.to_string()))?;
            builder = builder.proxy(proxy);
        }

        let inner = builder
            .build()
            .map_err(|e| HttpError::BuildError(e.to_string()))?;

        Ok(Self {
            inner,
            retry: RetryPolicy::from_config(&config),
            config,
        })
    }

    /// Create HTTP client with default configuration
    pub fn with_defaults() -> Result<Self> {
        Self::new(HttpConfig::default())
    }

    /// Get underlying reqwest client (for advanced usage)
    pub fn inner(&self) -> &reqwest::Client {
        &self.inner
    }

    /// Get configuration
    pub fn config(&self) -> &HttpConfig {
        &self.config
    }

    async fn send_once(&self, request: HttpRequest) -> Result<HttpResponse> {
        let mut url = request
            .url
            .parse::<url::Url>()
            .map_err(|e| HttpError::InvalidUrl(e.to_string()))?;
        if !request.query.is_empty() {
            url.query_pairs_mut().extend_pairs(request.query.iter());
        }

        debug!("HTTP {}: {}", request.method, url);

        let mut builder = self
            .inner
            .request(request.method, url)
            .headers(request.headers);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| self.transport_error(e))?;

        let status = response.status();
        let headers = response.headers().clone();
        if !status.is_success() {
            return Err(HttpError::HttpStatus {
                status,
                message: response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Unknown error".to_string()),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| self.transport_error(e))?
            .to_vec();

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }

    fn transport_error(&self, error: reqwest::Error) -> HttpError {
        if error.is_timeout() {
            HttpError::Timeout(self.config.timeout())
        } else {
            HttpError::RequestFailed(error)
        }
    }
}

#[async_trait]
impl HttpClientTrait for HttpClient {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        // Only idempotent calls may be replayed; a POST is sent exactly once
        if self.config.retry_count > 0 && request.is_idempotent() {
            self.retry.run(|| self.send_once(request.clone())).await
        } else {
            self.send_once(request).await
        }
    }
}

/// Create a shared HTTP client (Arc-wrapped for cloning)
pub fn shared_client(config: HttpConfig) -> Result<Arc<dyn HttpClientTrait>> {
    Ok(Arc::new(HttpClient::new(config)?))
}
