//! Request and response values exchanged through [`HttpClientTrait`](crate::HttpClientTrait)

use reqwest::{
    header::{HeaderMap, HeaderName, HeaderValue},
    Method, StatusCode,
};
use serde::{de::DeserializeOwned, Serialize};

use crate::error::Result;

/// An outgoing request
///
/// The body is kept as a JSON value so the request can be replayed by the
/// retry middleware.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub query: Vec<(String, String)>,
    pub headers: HeaderMap,
    pub body: Option<serde_json::Value>,
}

impl HttpRequest {
    /// Create a request for the given method and absolute URL
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            query: Vec::new(),
            headers: HeaderMap::new(),
            body: None,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::GET, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::POST, url)
    }

    pub fn put(url: impl Into<String>) -> Self {
        Self::new(Method::PUT, url)
    }

    pub fn delete(url: impl Into<String>) -> Self {
        Self::new(Method::DELETE, url)
    }

    /// Append a query pair
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Append every pair of an iterator
    pub fn query_pairs<I, K, V>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.query
            .extend(pairs.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Set a header. Names or values that are not valid HTTP tokens are
    /// ignored with a warning.
    pub fn header(mut self, name: &str, value: &str) -> Self {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(value)) => {
                self.headers.insert(name, value);
            }
            _ => tracing::warn!("Dropping invalid header {name:?}"),
        }
        self
    }

    /// Serialize `body` as the JSON payload
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    /// Whether replaying the request is safe
    pub fn is_idempotent(&self) -> bool {
        matches!(
            self.method,
            Method::GET | Method::PUT | Method::DELETE | Method::HEAD | Method::OPTIONS
        )
    }
}

/// A successful response with its body fully read
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Decode the body as JSON
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// Header value as a string, if present and valid UTF-8
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Body as lossy UTF-8 text
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_collects_parts() {
        let request = HttpRequest::put("http://localhost/triggers")
            .query("triggerMode", "FIRING")
            .query_pairs([("a", "1"), ("b", "2")])
            .header("X-Tenant-Id", "acme")
            .json(&serde_json::json!({"id": "t1"}))
            .unwrap();

        assert_eq!(request.method, Method::PUT);
        assert_eq!(request.query.len(), 3);
        assert_eq!(request.headers.get("x-tenant-id").unwrap(), "acme");
        assert_eq!(request.body.unwrap()["id"], "t1");
    }

    #[test]
    fn test_invalid_header_is_dropped() {
        let request = HttpRequest::get("http://localhost").header("bad header", "x");
        assert!(request.headers.is_empty());
    }

    #[test]
    fn test_idempotency() {
        assert!(HttpRequest::get("u").is_idempotent());
        assert!(HttpRequest::put("u").is_idempotent());
        assert!(!HttpRequest::post("u").is_idempotent());
    }

    #[test]
    fn test_response_helpers() {
        let mut headers = HeaderMap::new();
        headers.insert("x-total-count", HeaderValue::from_static("42"));
        let response = HttpResponse {
            status: StatusCode::OK,
            headers,
            body: br#"{"n": 1}"#.to_vec(),
        };

        let value: serde_json::Value = response.json().unwrap();
        assert_eq!(value["n"], 1);
        assert_eq!(response.header("X-Total-Count"), Some("42"));
        assert_eq!(response.header("link"), None);
    }
}
