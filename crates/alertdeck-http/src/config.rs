//! Transport settings for calls to the alerting backend
//!
//! Every field has a serde default, so an `[http]` table in the alertdeck
//! config file only needs the keys it changes. Durations are plain
//! millisecond counts.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Transport settings for the alerting backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Whole-call budget in milliseconds (default `30000`). Expiry surfaces
    /// as [`crate::HttpError::Timeout`].
    pub timeout_ms: u64,
    /// TCP/TLS connect budget in milliseconds (default `5000`)
    pub connect_timeout_ms: u64,
    /// Extra attempts for GET, PUT and DELETE (default `0`). POST is never
    /// replayed.
    pub retry_count: u32,
    /// Wait before the first replay, doubled per attempt (default `250`)
    pub retry_backoff_ms: u64,
    /// Proxy URL for every request
    pub proxy: Option<String>,
    /// Overrides the `alertdeck/<version>` user agent
    pub user_agent: Option<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 30_000,
            connect_timeout_ms: 5_000,
            retry_count: 0,
            retry_backoff_ms: 250,
            proxy: None,
            user_agent: None,
        }
    }
}

impl HttpConfig {
    /// Interactive console calls: 5s budget, 2s connect, no replays
    pub fn fast() -> Self {
        Self {
            timeout_ms: 5_000,
            connect_timeout_ms: 2_000,
            ..Default::default()
        }
    }

    pub fn with_retry_count(mut self, count: u32) -> Self {
        self.retry_count = count;
        self
    }

    pub fn with_proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }

    pub fn user_agent(&self) -> String {
        self.user_agent
            .clone()
            .unwrap_or_else(|| format!("alertdeck/{}", env!("CARGO_PKG_VERSION")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_suit_backend_calls() {
        let config = HttpConfig::default();
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.connect_timeout(), Duration::from_secs(5));
        assert_eq!(config.retry_count, 0);
        assert!(config.user_agent().starts_with("alertdeck/"));
    }

    #[test]
    fn test_fast_preset_never_retries() {
        let config = HttpConfig::fast();
        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert_eq!(config.retry_count, 0);
        assert_eq!(config.retry_backoff(), Duration::from_millis(250));
    }

    #[test]
    fn test_http_table_fills_missing_keys() {
        let config: HttpConfig =
            serde_json::from_str(r#"{"retry_count": 2, "user_agent": "console/1.0"}"#).unwrap();
        assert_eq!(config.retry_count, 2);
        assert_eq!(config.user_agent(), "console/1.0");
        assert_eq!(config.timeout_ms, 30_000);
        assert_eq!(config.proxy, None);
    }
}
