//! Alerts raised by the evaluation engine

use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Deserializer, Serialize};

use crate::trigger::{Severity, EVENT_TRIGGER_TYPE, TRIGGER_TYPE_KEY};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertStatus {
    #[default]
    Open,
    Acknowledged,
    Resolved,
}

impl AlertStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertStatus::Open => "OPEN",
            AlertStatus::Acknowledged => "ACKNOWLEDGED",
            AlertStatus::Resolved => "RESOLVED",
        }
    }
}

impl fmt::Display for AlertStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user note attached to an alert
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Note {
    pub user: String,
    pub ctime: i64,
    pub text: String,
}

/// An external event carried by an event-condition evaluation
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Event {
    pub id: Option<String>,
    pub ctime: Option<i64>,
    pub category: Option<String>,
    pub text: Option<String>,
    pub context: BTreeMap<String, String>,
    pub tags: BTreeMap<String, String>,
}

/// The subset of a condition echoed inside an evaluation record
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EvalCondition {
    #[serde(rename = "type")]
    pub condition_type: Option<String>,
    pub threshold: Option<f64>,
    pub operator: Option<String>,
    pub data_id: Option<String>,
}

/// One condition evaluation inside an evaluation set
///
/// Every field is optional: records from different condition types carry
/// different subsets.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConditionEval {
    pub eval_timestamp: Option<i64>,
    pub data_timestamp: Option<i64>,
    /// Number for threshold/range evaluations, string for availability/string ones
    pub value: Option<serde_json::Value>,
    /// First operand of a compare evaluation
    pub value1: Option<f64>,
    pub value2: Option<f64>,
    pub rate: Option<f64>,
    pub condition: Option<EvalCondition>,
    pub event: Option<Event>,
}

impl ConditionEval {
    /// `value` as a number, accepting numeric strings
    pub fn numeric_value(&self) -> Option<f64> {
        match self.value.as_ref()? {
            serde_json::Value::Number(n) => n.as_f64(),
            serde_json::Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: String,
    #[serde(default)]
    pub trigger_id: String,
    #[serde(default)]
    pub status: AlertStatus,
    #[serde(default)]
    pub severity: Severity,
    /// Creation time, epoch milliseconds
    #[serde(default)]
    pub ctime: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ack_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ack_notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ack_time: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_time: Option<i64>,
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    #[serde(default)]
    pub notes: Vec<Note>,
    #[serde(default, deserialize_with = "lenient_eval_sets")]
    pub eval_sets: Vec<Vec<ConditionEval>>,
}

impl Alert {
    pub fn is_event_alert(&self) -> bool {
        self.context.get(TRIGGER_TYPE_KEY).map(String::as_str) == Some(EVENT_TRIGGER_TYPE)
    }
}

/// Malformed records become empty ones and a set that is not a list
/// becomes an empty set, so one bad record never rejects the whole alert.
fn lenient_eval_sets<'de, D>(deserializer: D) -> Result<Vec<Vec<ConditionEval>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = serde_json::Value::deserialize(deserializer)?;
    let sets = match raw {
        serde_json::Value::Array(sets) => sets,
        _ => return Ok(Vec::new()),
    };

    Ok(sets
        .into_iter()
        .map(|set| match set {
            serde_json::Value::Array(items) => items
                .into_iter()
                .map(|item| serde_json::from_value(item).unwrap_or_default())
                .collect(),
            _ => Vec::new(),
        })
        .collect())
}
