//! Notification actions

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A notification endpoint, identified by `(actionPlugin, actionId)`
///
/// Plugin-specific settings (`to`, `description`, ...) travel as flat
/// properties next to the identity fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Action {
    pub action_plugin: String,
    pub action_id: String,
    #[serde(flatten)]
    pub properties: BTreeMap<String, serde_json::Value>,
}

impl Action {
    pub fn new(plugin: impl Into<String>, action_id: impl Into<String>) -> Self {
        Self {
            action_plugin: plugin.into(),
            action_id: action_id.into(),
            properties: BTreeMap::new(),
        }
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties
            .insert(key.into(), serde_json::Value::String(value.into()));
        self
    }

    /// String property, if present
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).and_then(|v| v.as_str())
    }

    pub fn description(&self) -> Option<&str> {
        self.property("description")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_properties_are_flat_on_the_wire() {
        let action = Action::new("email", "ops@example.com")
            .with_property("to", "ops@example.com")
            .with_property("description", "On-call");
        let json = serde_json::to_value(&action).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "actionPlugin": "email",
                "actionId": "ops@example.com",
                "to": "ops@example.com",
                "description": "On-call"
            })
        );
    }

    #[test]
    fn test_backend_payload_keeps_unknown_properties() {
        let action: Action = serde_json::from_str(
            r#"{"actionPlugin":"webhook","actionId":"hook","url":"http://x","retries":3}"#,
        )
        .unwrap();

        assert_eq!(action.property("url"), Some("http://x"));
        assert_eq!(action.properties["retries"], 3);
        assert_eq!(action.description(), None);
    }
}
