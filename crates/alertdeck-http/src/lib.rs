//! HTTP transport for alertdeck
//!
//! Provides a mockable, configurable HTTP client used to talk to the remote
//! alerting service.
//!
//! ## Features
//!
//! - **Trait-based design**: Mockable via `HttpClientTrait`
//! - **Request builder**: Query pairs, headers and JSON bodies on `HttpRequest`
//! - **Configurable**: Millisecond timeouts, proxy, user-agent, opt-in retries
//! - **Replay**: `RetryPolicy` replays failed GET/PUT/DELETE calls with doubling backoff

pub mod client;
pub mod config;
pub mod error;
pub mod middleware;
pub mod request;

pub use client::{shared_client, HttpClient, HttpClientTrait};
pub use config::HttpConfig;
pub use error::{HttpError, Result};
pub use middleware::RetryPolicy;
pub use request::{HttpRequest, HttpResponse};

/// Re-export commonly used types
pub use reqwest::{header, Method, StatusCode};
