//! The remote alerting service seam
//!
//! Everything above this trait (synchronizer, provisioning, lifecycle calls)
//! talks to the service only through [`AlertsBackend`], so tests can swap in
//! an in-memory implementation. [`RestBackend`](crate::rest::RestBackend) is
//! the HTTP implementation.

use async_trait::async_trait;

use alertdeck_model::{
    Action, Alert, Condition, Dampening, FullTrigger, TenantId, Trigger, TriggerMode,
};

use crate::{
    criteria::{AlertsCriteria, TriggersCriteria},
    error::Result,
    lifecycle::{AckRequest, NoteRequest, ResolveRequest},
    paging::Page,
};

#[async_trait]
pub trait AlertsBackend: Send + Sync {
    /// Save a new trigger; the returned copy carries the assigned id
    async fn create_trigger(&self, tenant: &TenantId, trigger: &Trigger) -> Result<Trigger>;

    async fn get_trigger(&self, tenant: &TenantId, trigger_id: &str) -> Result<Trigger>;

    async fn get_full_trigger(&self, tenant: &TenantId, trigger_id: &str) -> Result<FullTrigger>;

    /// Delete a trigger; its dampenings and conditions go with it
    async fn delete_trigger(&self, tenant: &TenantId, trigger_id: &str) -> Result<()>;

    async fn query_triggers(
        &self,
        tenant: &TenantId,
        criteria: &TriggersCriteria,
    ) -> Result<Page<Trigger>>;

    async fn update_group_trigger(
        &self,
        tenant: &TenantId,
        group_id: &str,
        trigger: &Trigger,
    ) -> Result<()>;

    async fn create_dampening(
        &self,
        tenant: &TenantId,
        trigger_id: &str,
        dampening: &Dampening,
    ) -> Result<Dampening>;

    async fn update_group_dampening(
        &self,
        tenant: &TenantId,
        group_id: &str,
        dampening_id: &str,
        dampening: &Dampening,
    ) -> Result<Dampening>;

    /// Replace the whole condition set of `(trigger_id, mode)`
    async fn set_conditions(
        &self,
        tenant: &TenantId,
        trigger_id: &str,
        mode: TriggerMode,
        conditions: &[Condition],
    ) -> Result<Vec<Condition>>;

    /// Replace the whole condition set of `(group_id, mode)` on a group template
    async fn set_group_conditions(
        &self,
        tenant: &TenantId,
        group_id: &str,
        mode: TriggerMode,
        conditions: &[Condition],
    ) -> Result<Vec<Condition>>;

    async fn get_action(&self, tenant: &TenantId, plugin: &str, action_id: &str) -> Result<Action>;

    async fn create_action(&self, tenant: &TenantId, action: &Action) -> Result<Action>;

    async fn query_alerts(&self, tenant: &TenantId, criteria: &AlertsCriteria)
        -> Result<Page<Alert>>;

    async fn get_alert(&self, tenant: &TenantId, alert_id: &str) -> Result<Alert>;

    async fn resolve_alerts(&self, tenant: &TenantId, request: &ResolveRequest) -> Result<()>;

    async fn ack_alerts(&self, tenant: &TenantId, request: &AckRequest) -> Result<()>;

    async fn add_note(&self, tenant: &TenantId, request: &NoteRequest) -> Result<()>;
}
