//! In-memory alerting backend that records every call

#![allow(dead_code)]

use std::{
    collections::{BTreeSet, HashMap, HashSet},
    sync::Mutex,
};

use alertdeck_alerts::{
    AckRequest, AlertsBackend, AlertsCriteria, AlertsError, NoteRequest, Page, Paging,
    QueryParams, ResolveRequest, Result, TriggersCriteria,
};
use alertdeck_model::{
    Action, Alert, Condition, Dampening, FullTrigger, TenantId, Trigger, TriggerMode,
};
use async_trait::async_trait;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CreateTrigger(Trigger),
    GetTrigger(String),
    GetFullTrigger(String),
    DeleteTrigger(String),
    QueryTriggers(QueryParams),
    UpdateGroupTrigger {
        group_id: String,
        trigger: Trigger,
    },
    CreateDampening {
        trigger_id: String,
        dampening: Dampening,
    },
    UpdateGroupDampening {
        group_id: String,
        dampening_id: String,
        dampening: Dampening,
    },
    SetConditions {
        trigger_id: String,
        mode: TriggerMode,
        conditions: Vec<Condition>,
    },
    SetGroupConditions {
        group_id: String,
        mode: TriggerMode,
        conditions: Vec<Condition>,
    },
    GetAction {
        plugin: String,
        action_id: String,
    },
    CreateAction(Action),
    QueryAlerts(QueryParams),
    GetAlert(String),
    Resolve(ResolveRequest),
    Ack(AckRequest),
    Note(NoteRequest),
}

impl Call {
    pub fn is_write(&self) -> bool {
        matches!(
            self,
            Call::CreateTrigger(_)
                | Call::DeleteTrigger(_)
                | Call::UpdateGroupTrigger { .. }
                | Call::CreateDampening { .. }
                | Call::UpdateGroupDampening { .. }
                | Call::SetConditions { .. }
                | Call::SetGroupConditions { .. }
                | Call::CreateAction(_)
        )
    }
}

/// Backend double: serves stored full triggers, actions and alerts, records
/// calls in order and fails the operations named with [`fail_on`](Self::fail_on)
#[derive(Default)]
pub struct RecordingBackend {
    calls: Mutex<Vec<Call>>,
    tenants: Mutex<Vec<TenantId>>,
    full_triggers: Mutex<HashMap<String, FullTrigger>>,
    actions: Mutex<BTreeSet<(String, String)>>,
    alerts: Mutex<Vec<Alert>>,
    failing: Mutex<HashSet<&'static str>>,
    next_id: Mutex<u32>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_full_trigger(self, full: FullTrigger) -> Self {
        self.full_triggers
            .lock()
            .unwrap()
            .insert(full.trigger.id.clone(), full);
        self
    }

    pub fn with_action(self, plugin: &str, action_id: &str) -> Self {
        self.actions
            .lock()
            .unwrap()
            .insert((plugin.to_string(), action_id.to_string()));
        self
    }

    pub fn with_alert(self, alert: Alert) -> Self {
        self.alerts.lock().unwrap().push(alert);
        self
    }

    /// Make every call of `operation` fail with `BackendUnavailable`
    pub fn fail_on(self, operation: &'static str) -> Self {
        self.failing.lock().unwrap().insert(operation);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn writes(&self) -> Vec<Call> {
        self.calls().into_iter().filter(Call::is_write).collect()
    }

    pub fn tenants(&self) -> Vec<TenantId> {
        self.tenants.lock().unwrap().clone()
    }

    pub fn has_action(&self, plugin: &str, action_id: &str) -> bool {
        self.actions
            .lock()
            .unwrap()
            .contains(&(plugin.to_string(), action_id.to_string()))
    }

    fn record(&self, tenant: &TenantId, operation: &'static str, call: Call) -> Result<()> {
        self.calls.lock().unwrap().push(call);
        self.tenants.lock().unwrap().push(tenant.clone());
        if self.failing.lock().unwrap().contains(operation) {
            return Err(AlertsError::BackendUnavailable(format!(
                "{operation} unavailable"
            )));
        }
        Ok(())
    }

    fn full_trigger(&self, trigger_id: &str) -> Result<FullTrigger> {
        self.full_triggers
            .lock()
            .unwrap()
            .get(trigger_id)
            .cloned()
            .ok_or_else(|| AlertsError::not_found(format!("trigger {trigger_id}")))
    }
}

#[async_trait]
impl AlertsBackend for RecordingBackend {
    async fn create_trigger(&self, tenant: &TenantId, trigger: &Trigger) -> Result<Trigger> {
        self.record(tenant, "create_trigger", Call::CreateTrigger(trigger.clone()))?;
        let mut saved = trigger.clone();
        if saved.id.is_empty() {
            let mut next = self.next_id.lock().unwrap();
            *next += 1;
            saved.id = format!("trigger-{next}");
        }
        self.full_triggers
            .lock()
            .unwrap()
            .insert(saved.id.clone(), FullTrigger::new(saved.clone()));
        Ok(saved)
    }

    async fn get_trigger(&self, tenant: &TenantId, trigger_id: &str) -> Result<Trigger> {
        self.record(tenant, "get_trigger", Call::GetTrigger(trigger_id.to_string()))?;
        Ok(self.full_trigger(trigger_id)?.trigger)
    }

    async fn get_full_trigger(&self, tenant: &TenantId, trigger_id: &str) -> Result<FullTrigger> {
        self.record(
            tenant,
            "get_full_trigger",
            Call::GetFullTrigger(trigger_id.to_string()),
        )?;
        self.full_trigger(trigger_id)
    }

    async fn delete_trigger(&self, tenant: &TenantId, trigger_id: &str) -> Result<()> {
        self.record(
            tenant,
            "delete_trigger",
            Call::DeleteTrigger(trigger_id.to_string()),
        )?;
        self.full_triggers
            .lock()
            .unwrap()
            .remove(trigger_id)
            .map(drop)
            .ok_or_else(|| AlertsError::not_found(format!("trigger {trigger_id}")))
    }

    async fn query_triggers(
        &self,
        tenant: &TenantId,
        criteria: &TriggersCriteria,
    ) -> Result<Page<Trigger>> {
        self.record(
            tenant,
            "query_triggers",
            Call::QueryTriggers(criteria.to_query_params()),
        )?;
        let mut triggers: Vec<_> = self
            .full_triggers
            .lock()
            .unwrap()
            .values()
            .map(|full| full.trigger.clone())
            .collect();
        triggers.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(Page::new(triggers, Paging::default()))
    }

    async fn update_group_trigger(
        &self,
        tenant: &TenantId,
        group_id: &str,
        trigger: &Trigger,
    ) -> Result<()> {
        self.record(
            tenant,
            "update_group_trigger",
            Call::UpdateGroupTrigger {
                group_id: group_id.to_string(),
                trigger: trigger.clone(),
            },
        )
    }

    async fn create_dampening(
        &self,
        tenant: &TenantId,
        trigger_id: &str,
        dampening: &Dampening,
    ) -> Result<Dampening> {
        self.record(
            tenant,
            "create_dampening",
            Call::CreateDampening {
                trigger_id: trigger_id.to_string(),
                dampening: dampening.clone(),
            },
        )?;
        let mut saved = dampening.clone();
        saved.dampening_id = Some(format!("{trigger_id}-{}", dampening.trigger_mode));
        Ok(saved)
    }

    async fn update_group_dampening(
        &self,
        tenant: &TenantId,
        group_id: &str,
        dampening_id: &str,
        dampening: &Dampening,
    ) -> Result<Dampening> {
        self.record(
            tenant,
            "update_group_dampening",
            Call::UpdateGroupDampening {
                group_id: group_id.to_string(),
                dampening_id: dampening_id.to_string(),
                dampening: dampening.clone(),
            },
        )?;
        Ok(dampening.clone())
    }

    async fn set_conditions(
        &self,
        tenant: &TenantId,
        trigger_id: &str,
        mode: TriggerMode,
        conditions: &[Condition],
    ) -> Result<Vec<Condition>> {
        self.record(
            tenant,
            "set_conditions",
            Call::SetConditions {
                trigger_id: trigger_id.to_string(),
                mode,
                conditions: conditions.to_vec(),
            },
        )?;
        Ok(conditions.to_vec())
    }

    async fn set_group_conditions(
        &self,
        tenant: &TenantId,
        group_id: &str,
        mode: TriggerMode,
        conditions: &[Condition],
    ) -> Result<Vec<Condition>> {
        self.record(
            tenant,
            "set_group_conditions",
            Call::SetGroupConditions {
                group_id: group_id.to_string(),
                mode,
                conditions: conditions.to_vec(),
            },
        )?;
        Ok(conditions.to_vec())
    }

    async fn get_action(&self, tenant: &TenantId, plugin: &str, action_id: &str) -> Result<Action> {
        self.record(
            tenant,
            "get_action",
            Call::GetAction {
                plugin: plugin.to_string(),
                action_id: action_id.to_string(),
            },
        )?;
        if self.has_action(plugin, action_id) {
            Ok(Action::new(plugin, action_id))
        } else {
            Err(AlertsError::not_found(format!("action {plugin}/{action_id}")))
        }
    }

    async fn create_action(&self, tenant: &TenantId, action: &Action) -> Result<Action> {
        self.record(tenant, "create_action", Call::CreateAction(action.clone()))?;
        self.actions
            .lock()
            .unwrap()
            .insert((action.action_plugin.clone(), action.action_id.clone()));
        Ok(action.clone())
    }

    async fn query_alerts(
        &self,
        tenant: &TenantId,
        criteria: &AlertsCriteria,
    ) -> Result<Page<Alert>> {
        self.record(
            tenant,
            "query_alerts",
            Call::QueryAlerts(criteria.to_query_params()),
        )?;
        let alerts = self.alerts.lock().unwrap().clone();
        let paging = Paging {
            total: Some(alerts.len() as u64),
            ..Default::default()
        };
        Ok(Page::new(alerts, paging))
    }

    async fn get_alert(&self, tenant: &TenantId, alert_id: &str) -> Result<Alert> {
        self.record(tenant, "get_alert", Call::GetAlert(alert_id.to_string()))?;
        self.alerts
            .lock()
            .unwrap()
            .iter()
            .find(|alert| alert.id == alert_id)
            .cloned()
            .ok_or_else(|| AlertsError::not_found(format!("alert {alert_id}")))
    }

    async fn resolve_alerts(&self, tenant: &TenantId, request: &ResolveRequest) -> Result<()> {
        self.record(tenant, "resolve_alerts", Call::Resolve(request.clone()))
    }

    async fn ack_alerts(&self, tenant: &TenantId, request: &AckRequest) -> Result<()> {
        self.record(tenant, "ack_alerts", Call::Ack(request.clone()))
    }

    async fn add_note(&self, tenant: &TenantId, request: &NoteRequest) -> Result<()> {
        self.record(tenant, "add_note", Call::Note(request.clone()))
    }
}
