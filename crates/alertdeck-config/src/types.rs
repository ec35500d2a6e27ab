//! Configuration types

use alertdeck_http::HttpConfig;
use serde::{Deserialize, Serialize};

/// Settings for talking to the remote alerting service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertsConfig {
    /// Base URL of the alerting REST API, e.g. `http://host:8080/alerts`
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Tenant used when the caller does not name one
    #[serde(default)]
    pub tenant: Option<String>,
    /// Header carrying the tenant on every request
    #[serde(default = "default_tenant_header")]
    pub tenant_header: String,
    #[serde(default)]
    pub http: HttpConfig,
}

impl Default for AlertsConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            tenant: None,
            tenant_header: default_tenant_header(),
            http: HttpConfig::default(),
        }
    }
}

impl AlertsConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn with_tenant(mut self, tenant: impl Into<String>) -> Self {
        self.tenant = Some(tenant.into());
        self
    }

    pub fn with_http(mut self, http: HttpConfig) -> Self {
        self.http = http;
        self
    }

    /// Base URL without a trailing slash
    pub fn api_root(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}

fn default_base_url() -> String {
    "http://localhost:8080/alerts".to_string()
}

fn default_tenant_header() -> String {
    "X-Tenant-Id".to_string()
}
