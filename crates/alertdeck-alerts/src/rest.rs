//! REST implementation of [`AlertsBackend`]

use std::sync::Arc;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use alertdeck_config::AlertsConfig;
use alertdeck_http::{shared_client, HttpClientTrait, HttpRequest, HttpResponse, Method};
use alertdeck_model::{
    Action, Alert, Condition, Dampening, FullTrigger, TenantId, Trigger, TriggerMode,
};

use crate::{
    backend::AlertsBackend,
    criteria::{AlertsCriteria, TriggersCriteria},
    error::Result,
    lifecycle::{AckRequest, NoteRequest, ResolveRequest},
    paging::{Page, Paging},
};

/// Talks to the alerting service's REST API
///
/// Every request carries the tenant in `tenant_header`. Path segments are
/// percent-encoded, so ids containing `/` or spaces are addressed safely.
pub struct RestBackend {
    client: Arc<dyn HttpClientTrait>,
    base_url: String,
    tenant_header: String,
}

impl RestBackend {
    pub fn new(client: Arc<dyn HttpClientTrait>, base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            tenant_header: "X-Tenant-Id".to_string(),
        }
    }

    pub fn with_tenant_header(mut self, header: impl Into<String>) -> Self {
        self.tenant_header = header.into();
        self
    }

    /// Build a backend with its own HTTP client from configuration
    pub fn from_config(config: &AlertsConfig) -> Result<Self> {
        let client = shared_client(config.http.clone())?;
        Ok(Self::new(client, config.api_root()).with_tenant_header(config.tenant_header.clone()))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, segments: &[&str]) -> String {
        let mut url = self.base_url.clone();
        for segment in segments {
            url.push('/');
            url.push_str(&urlencoding::encode(segment));
        }
        url
    }

    fn request(&self, method: Method, tenant: &TenantId, segments: &[&str]) -> HttpRequest {
        HttpRequest::new(method, self.url(segments)).header(&self.tenant_header, tenant.as_str())
    }

    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        Ok(self.client.send(request).await?)
    }

    async fn fetch<T: DeserializeOwned>(&self, request: HttpRequest) -> Result<T> {
        Ok(self.send(request).await?.json()?)
    }

    async fn write<B, T>(&self, request: HttpRequest, body: &B) -> Result<T>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        self.fetch(request.json(body)?).await
    }

    async fn page<T: DeserializeOwned>(&self, request: HttpRequest) -> Result<Page<T>> {
        let response = self.send(request).await?;
        let items = response.json()?;
        Ok(Page::new(items, Paging::from_headers(&response.headers)))
    }
}

#[async_trait]
impl AlertsBackend for RestBackend {
    async fn create_trigger(&self, tenant: &TenantId, trigger: &Trigger) -> Result<Trigger> {
        debug!("Creating trigger {:?} for tenant {}", trigger.name, tenant);
        self.write(self.request(Method::POST, tenant, &["triggers"]), trigger)
            .await
    }

    async fn get_trigger(&self, tenant: &TenantId, trigger_id: &str) -> Result<Trigger> {
        self.fetch(self.request(Method::GET, tenant, &["triggers", trigger_id]))
            .await
    }

    async fn get_full_trigger(&self, tenant: &TenantId, trigger_id: &str) -> Result<FullTrigger> {
        self.fetch(self.request(Method::GET, tenant, &["triggers", trigger_id, "full"]))
            .await
    }

    async fn delete_trigger(&self, tenant: &TenantId, trigger_id: &str) -> Result<()> {
        self.send(self.request(Method::DELETE, tenant, &["triggers", trigger_id]))
            .await?;
        Ok(())
    }

    async fn query_triggers(
        &self,
        tenant: &TenantId,
        criteria: &TriggersCriteria,
    ) -> Result<Page<Trigger>> {
        let request = self
            .request(Method::GET, tenant, &["triggers"])
            .query_pairs(criteria.to_query_params().iter());
        self.page(request).await
    }

    async fn update_group_trigger(
        &self,
        tenant: &TenantId,
        group_id: &str,
        trigger: &Trigger,
    ) -> Result<()> {
        let request = self
            .request(Method::PUT, tenant, &["triggers", "groups", group_id])
            .json(trigger)?;
        self.send(request).await?;
        Ok(())
    }

    async fn create_dampening(
        &self,
        tenant: &TenantId,
        trigger_id: &str,
        dampening: &Dampening,
    ) -> Result<Dampening> {
        self.write(
            self.request(Method::POST, tenant, &["triggers", trigger_id, "dampenings"]),
            dampening,
        )
        .await
    }

    async fn update_group_dampening(
        &self,
        tenant: &TenantId,
        group_id: &str,
        dampening_id: &str,
        dampening: &Dampening,
    ) -> Result<Dampening> {
        self.write(
            self.request(
                Method::PUT,
                tenant,
                &["triggers", "groups", group_id, "dampenings", dampening_id],
            ),
            dampening,
        )
        .await
    }

    async fn set_conditions(
        &self,
        tenant: &TenantId,
        trigger_id: &str,
        mode: TriggerMode,
        conditions: &[Condition],
    ) -> Result<Vec<Condition>> {
        let request = self
            .request(Method::PUT, tenant, &["triggers", trigger_id, "conditions"])
            .query("triggerMode", mode.as_str());
        self.write(request, conditions).await
    }

    async fn set_group_conditions(
        &self,
        tenant: &TenantId,
        group_id: &str,
        mode: TriggerMode,
        conditions: &[Condition],
    ) -> Result<Vec<Condition>> {
        let request = self
            .request(
                Method::PUT,
                tenant,
                &["triggers", "groups", group_id, "conditions"],
            )
            .query("triggerMode", mode.as_str());
        self.write(request, conditions).await
    }

    async fn get_action(&self, tenant: &TenantId, plugin: &str, action_id: &str) -> Result<Action> {
        self.fetch(self.request(Method::GET, tenant, &["actions", plugin, action_id]))
            .await
    }

    async fn create_action(&self, tenant: &TenantId, action: &Action) -> Result<Action> {
        self.write(self.request(Method::POST, tenant, &["actions"]), action)
            .await
    }

    async fn query_alerts(
        &self,
        tenant: &TenantId,
        criteria: &AlertsCriteria,
    ) -> Result<Page<Alert>> {
        let request = self
            .request(Method::GET, tenant, &["alerts"])
            .query_pairs(criteria.to_query_params().iter());
        self.page(request).await
    }

    async fn get_alert(&self, tenant: &TenantId, alert_id: &str) -> Result<Alert> {
        self.fetch(self.request(Method::GET, tenant, &["alerts", alert_id]))
            .await
    }

    async fn resolve_alerts(&self, tenant: &TenantId, request: &ResolveRequest) -> Result<()> {
        let http = self
            .request(Method::PUT, tenant, &["alerts", "resolve"])
            .query_pairs(request.query_pairs());
        self.send(http).await?;
        Ok(())
    }

    async fn ack_alerts(&self, tenant: &TenantId, request: &AckRequest) -> Result<()> {
        let http = self
            .request(Method::PUT, tenant, &["alerts", "ack"])
            .query_pairs(request.query_pairs());
        self.send(http).await?;
        Ok(())
    }

    async fn add_note(&self, tenant: &TenantId, request: &NoteRequest) -> Result<()> {
        let http = self
            .request(Method::PUT, tenant, &["alerts", "note"])
            .query_pairs(request.query_pairs());
        self.send(http).await?;
        Ok(())
    }
}
