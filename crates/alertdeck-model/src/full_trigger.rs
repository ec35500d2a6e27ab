use serde::{Deserialize, Serialize};

use crate::{condition::Condition, dampening::Dampening, trigger::Trigger};

/// A trigger together with its dampenings and conditions, the unit of
/// create and update
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FullTrigger {
    pub trigger: Trigger,
    #[serde(default)]
    pub dampenings: Vec<Dampening>,
    #[serde(default)]
    pub conditions: Vec<Condition>,
}

impl FullTrigger {
    pub fn new(trigger: Trigger) -> Self {
        Self {
            trigger,
            dampenings: Vec::new(),
            conditions: Vec::new(),
        }
    }

    pub fn with_dampening(mut self, dampening: Dampening) -> Self {
        self.dampenings.push(dampening);
        self
    }

    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    /// Point every dampening and condition at `trigger_id`
    pub fn bind_children(&mut self, trigger_id: &str) {
        for dampening in &mut self.dampenings {
            dampening.trigger_id = trigger_id.to_string();
        }
        for condition in &mut self.conditions {
            condition.trigger_id = trigger_id.to_string();
        }
    }

    /// Whether every child references this trigger's id
    pub fn is_consistent(&self) -> bool {
        let id = self.trigger.id.as_str();
        self.dampenings.iter().all(|d| d.trigger_id == id)
            && self.conditions.iter().all(|c| c.trigger_id == id)
    }
}
