//! Alerting facade

use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone};
use tracing::debug;

use alertdeck_config::{AlertsConfig, ConfigManager};
use alertdeck_model::{FullTrigger, TenantId, Trigger};

use crate::{
    actions::{ensure_action, ActionDefaults, Provisioned},
    backend::AlertsBackend,
    criteria::{AlertsCriteria, TriggersCriteria},
    error::Result,
    lifecycle::{AckRequest, NoteRequest, ResolveRequest},
    normalizer::{normalize_alert, AlertSummary},
    paging::Page,
    rest::RestBackend,
    sync::{SyncReport, TriggerSynchronizer},
};

/// Entry point for trigger definition and alert handling
///
/// Every call names its tenant explicitly; [`AlertsManager::default_tenant`]
/// exposes the configured one for callers that have no other source.
pub struct AlertsManager {
    backend: Arc<dyn AlertsBackend>,
    synchronizer: TriggerSynchronizer,
    default_tenant: Option<TenantId>,
}

impl AlertsManager {
    pub fn new(backend: Arc<dyn AlertsBackend>) -> Self {
        Self {
            synchronizer: TriggerSynchronizer::new(backend.clone()),
            backend,
            default_tenant: None,
        }
    }

    /// Build a REST-backed manager from configuration
    pub fn from_config(config: &AlertsConfig) -> Result<Self> {
        let backend = RestBackend::from_config(config)?;
        let mut manager = Self::new(Arc::new(backend));
        manager.default_tenant = config.tenant.as_deref().map(TenantId::from);
        Ok(manager)
    }

    /// Load configuration from the default file and environment
    pub fn from_default_config() -> Result<Self> {
        let config = ConfigManager::new().load()?;
        Self::from_config(&config)
    }

    pub fn with_action_defaults(mut self, defaults: ActionDefaults) -> Self {
        self.synchronizer = self.synchronizer.with_action_defaults(defaults);
        self
    }

    pub fn with_default_tenant(mut self, tenant: impl Into<TenantId>) -> Self {
        self.default_tenant = Some(tenant.into());
        self
    }

    pub fn default_tenant(&self) -> Option<&TenantId> {
        self.default_tenant.as_ref()
    }

    pub fn backend(&self) -> &Arc<dyn AlertsBackend> {
        &self.backend
    }

    pub async fn create_full_trigger(
        &self,
        tenant: &TenantId,
        full: FullTrigger,
    ) -> Result<SyncReport> {
        self.synchronizer.create(tenant, full).await
    }

    pub async fn update_full_trigger(
        &self,
        tenant: &TenantId,
        full: &FullTrigger,
        backup: Option<&FullTrigger>,
    ) -> Result<SyncReport> {
        self.synchronizer.update(tenant, full, backup).await
    }

    pub async fn delete_trigger(&self, tenant: &TenantId, trigger_id: &str) -> Result<()> {
        self.synchronizer.delete(tenant, trigger_id).await
    }

    pub async fn get_full_trigger(&self, tenant: &TenantId, trigger_id: &str) -> Result<FullTrigger> {
        self.backend.get_full_trigger(tenant, trigger_id).await
    }

    pub async fn query_triggers(
        &self,
        tenant: &TenantId,
        criteria: &TriggersCriteria,
    ) -> Result<Page<Trigger>> {
        self.backend.query_triggers(tenant, criteria).await
    }

    /// Query alerts and summarize them against the local clock
    pub async fn query_alerts(
        &self,
        tenant: &TenantId,
        criteria: &AlertsCriteria,
    ) -> Result<Page<AlertSummary>> {
        self.query_alerts_at(tenant, criteria, &Local::now()).await
    }

    /// Query alerts and summarize them against `now`
    pub async fn query_alerts_at<Tz>(
        &self,
        tenant: &TenantId,
        criteria: &AlertsCriteria,
        now: &DateTime<Tz>,
    ) -> Result<Page<AlertSummary>>
    where
        Tz: TimeZone,
    {
        let page = self.backend.query_alerts(tenant, criteria).await?;
        debug!(
            "Fetched {} alerts (total {:?})",
            page.len(),
            page.paging.total
        );
        Ok(page.map(|alert| normalize_alert(&alert, now)))
    }

    pub async fn get_alert(&self, tenant: &TenantId, alert_id: &str) -> Result<AlertSummary> {
        let alert = self.backend.get_alert(tenant, alert_id).await?;
        Ok(normalize_alert(&alert, &Local::now()))
    }

    pub async fn resolve_alerts(&self, tenant: &TenantId, request: &ResolveRequest) -> Result<()> {
        self.backend.resolve_alerts(tenant, request).await
    }

    pub async fn ack_alerts(&self, tenant: &TenantId, request: &AckRequest) -> Result<()> {
        self.backend.ack_alerts(tenant, request).await
    }

    pub async fn add_note(&self, tenant: &TenantId, request: &NoteRequest) -> Result<()> {
        self.backend.add_note(tenant, request).await
    }

    /// Make sure `(plugin, action_id)` exists, creating it with plugin defaults
    pub async fn add_action(
        &self,
        tenant: &TenantId,
        plugin: &str,
        action_id: &str,
    ) -> Result<Provisioned> {
        ensure_action(
            self.backend.as_ref(),
            tenant,
            self.synchronizer.action_defaults(),
            plugin,
            action_id,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config_takes_default_tenant() {
        let config = AlertsConfig::new("http://alerts.local").with_tenant("acme");
        let manager = AlertsManager::from_config(&config).unwrap();
        assert_eq!(manager.default_tenant().map(TenantId::as_str), Some("acme"));
    }

    #[test]
    fn test_from_config_rejects_bad_proxy() {
        let mut config = AlertsConfig::new("http://alerts.local");
        config.http.proxy = Some("invalid-proxy".to_string());
        assert!(matches!(
            AlertsManager::from_config(&config),
            Err(crate::AlertsError::Config(_))
        ));
    }
}
