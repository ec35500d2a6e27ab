//! Trigger definitions

use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Context key holding the trigger-type discriminator
pub const TRIGGER_TYPE_KEY: &str = "triggerType";

/// Trigger-type value for event-based triggers
pub const EVENT_TRIGGER_TYPE: &str = "Event";

/// Alert severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "LOW",
            Severity::Medium => "MEDIUM",
            Severity::High => "HIGH",
            Severity::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Boolean combinator applied when a trigger has several conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Match {
    #[default]
    All,
    Any,
}

/// Which half of the trigger lifecycle a dampening or condition belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TriggerMode {
    #[default]
    Firing,
    Autoresolve,
}

impl TriggerMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TriggerMode::Firing => "FIRING",
            TriggerMode::Autoresolve => "AUTORESOLVE",
        }
    }
}

impl fmt::Display for TriggerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named rule evaluating conditions against incoming data
///
/// Fields absent from a JSON payload take the same defaults as
/// [`Trigger::new`]: enabled, MEDIUM severity, ALL/ALL matching and
/// auto-resolve on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trigger {
    /// Empty until the backend assigns one
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub severity: Severity,
    #[serde(default)]
    pub firing_match: Match,
    #[serde(default)]
    pub auto_resolve_match: Match,
    #[serde(default)]
    pub auto_disable: bool,
    #[serde(default)]
    pub auto_enable: bool,
    #[serde(default = "default_true")]
    pub auto_resolve: bool,
    /// Action plugin name to action ids
    #[serde(default)]
    pub actions: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
    /// Owning group trigger, `None` for standalone triggers and group templates
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member_of: Option<String>,
    #[serde(default)]
    pub group: bool,
}

fn default_true() -> bool {
    true
}

impl Default for Trigger {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            description: None,
            enabled: true,
            severity: Severity::default(),
            firing_match: Match::All,
            auto_resolve_match: Match::All,
            auto_disable: false,
            auto_enable: false,
            auto_resolve: true,
            actions: BTreeMap::new(),
            context: BTreeMap::new(),
            tags: BTreeMap::new(),
            member_of: None,
            group: false,
        }
    }
}

impl Trigger {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_action(mut self, plugin: impl Into<String>, action_id: impl Into<String>) -> Self {
        self.actions
            .entry(plugin.into())
            .or_default()
            .push(action_id.into());
        self
    }

    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    pub fn with_tag(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(name.into(), value.into());
        self
    }

    pub fn member_of(mut self, group_id: impl Into<String>) -> Self {
        self.member_of = Some(group_id.into());
        self
    }

    /// Fill the fields a freshly created trigger must carry but the caller
    /// left out. Only the description has no constructor default.
    pub fn apply_creation_defaults(&mut self, now: DateTime<Utc>) {
        let missing = self
            .description
            .as_deref()
            .map_or(true, |d| d.trim().is_empty());
        if missing {
            self.description = Some(format!(
                "Created on {}",
                now.format("%Y-%m-%d %H:%M:%S UTC")
            ));
        }
    }

    /// The `triggerType` context discriminator
    pub fn trigger_type(&self) -> Option<&str> {
        self.context.get(TRIGGER_TYPE_KEY).map(String::as_str)
    }

    pub fn is_event_trigger(&self) -> bool {
        self.trigger_type() == Some(EVENT_TRIGGER_TYPE)
    }

    /// Every `(plugin, action id)` pair referenced by this trigger
    pub fn action_refs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.actions
            .iter()
            .flat_map(|(plugin, ids)| ids.iter().map(move |id| (plugin.as_str(), id.as_str())))
    }

    /// Compare action references, ignoring id order, duplicates and plugins
    /// with no ids
    pub fn same_actions(&self, other: &Trigger) -> bool {
        action_set(self) == action_set(other)
    }

    /// Whether the attributes shared with a group template differ
    pub fn shared_attributes_differ(&self, other: &Trigger) -> bool {
        self.enabled != other.enabled || self.severity != other.severity
    }
}

fn action_set(trigger: &Trigger) -> BTreeSet<(&str, &str)> {
    trigger.action_refs().collect()
}
