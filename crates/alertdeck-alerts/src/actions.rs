//! Notification action provisioning
//!
//! Triggers reference actions by `(plugin, action id)`. Before a trigger
//! referencing an action is saved, the action must exist at the backend;
//! [`ensure_action`] looks it up and creates it with plugin defaults when the
//! backend answers "not found".

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use futures::future::join_all;
use tracing::{debug, info};

use alertdeck_model::{Action, TenantId};

use crate::{backend::AlertsBackend, error::Result};

/// Per-plugin defaults for actions created on demand
///
/// Each registered plugin names the property that receives the action id,
/// e.g. an email action `ops@example.com` is created with
/// `to = ops@example.com`. Unregistered plugins get only a description.
#[derive(Debug, Clone)]
pub struct ActionDefaults {
    recipient_keys: HashMap<String, String>,
}

impl ActionDefaults {
    pub fn new() -> Self {
        Self {
            recipient_keys: HashMap::new(),
        }
    }

    pub fn register(&mut self, plugin: impl Into<String>, recipient_key: impl Into<String>) {
        self.recipient_keys
            .insert(plugin.into(), recipient_key.into());
    }

    pub fn has_plugin(&self, plugin: &str) -> bool {
        self.recipient_keys.contains_key(plugin)
    }

    pub fn recipient_key(&self, plugin: &str) -> Option<&str> {
        self.recipient_keys.get(plugin).map(String::as_str)
    }

    pub fn plugin_names(&self) -> Vec<&str> {
        self.recipient_keys.keys().map(String::as_str).collect()
    }

    /// The action created when `(plugin, action_id)` does not exist yet
    pub fn action_for(&self, plugin: &str, action_id: &str, now: DateTime<Utc>) -> Action {
        let mut action = Action::new(plugin, action_id).with_property(
            "description",
            format!("Created on {}", now.format("%Y-%m-%d %H:%M:%S UTC")),
        );
        if let Some(key) = self.recipient_key(plugin) {
            action = action.with_property(key, action_id);
        }
        action
    }
}

impl Default for ActionDefaults {
    fn default() -> Self {
        let mut defaults = Self::new();
        defaults.register("email", "to");
        defaults.register("sms", "phone");
        defaults.register("webhook", "url");
        defaults
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provisioned {
    /// The action already existed; nothing was written
    Existing,
    Created,
}

/// Get-or-create one action. Only a not-found lookup leads to a create;
/// any other lookup failure is returned as is.
pub async fn ensure_action(
    backend: &dyn AlertsBackend,
    tenant: &TenantId,
    defaults: &ActionDefaults,
    plugin: &str,
    action_id: &str,
) -> Result<Provisioned> {
    match backend.get_action(tenant, plugin, action_id).await {
        Ok(_) => {
            debug!("Action {plugin}/{action_id} exists");
            Ok(Provisioned::Existing)
        }
        Err(e) if e.is_not_found() => {
            let action = defaults.action_for(plugin, action_id, Utc::now());
            backend.create_action(tenant, &action).await?;
            info!("Created action {plugin}/{action_id}");
            Ok(Provisioned::Created)
        }
        Err(e) => Err(e),
    }
}

/// Outcome of provisioning one referenced action
#[derive(Debug)]
pub struct ActionOutcome {
    pub plugin: String,
    pub action_id: String,
    pub result: Result<Provisioned>,
}

/// Provision every `(plugin, action id)` pair concurrently, waiting for all
pub async fn ensure_actions<'a, I>(
    backend: &dyn AlertsBackend,
    tenant: &TenantId,
    defaults: &ActionDefaults,
    refs: I,
) -> Vec<ActionOutcome>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    join_all(refs.into_iter().map(|(plugin, action_id)| async move {
        ActionOutcome {
            plugin: plugin.to_string(),
            action_id: action_id.to_string(),
            result: ensure_action(backend, tenant, defaults, plugin, action_id).await,
        }
    }))
    .await
}
