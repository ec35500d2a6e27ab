//! Trigger conditions

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::trigger::TriggerMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AvailabilityOperator {
    Down,
    NotUp,
    Up,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ThresholdOperator {
    Lt,
    Gt,
    Lte,
    Gte,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RangeBound {
    Inclusive,
    Exclusive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StringOperator {
    Equal,
    NotEqual,
    StartsWith,
    EndsWith,
    Contains,
    Match,
}

fn default_multiplier() -> f64 {
    1.0
}

/// Type-specific shape of a condition, tagged by `type` on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConditionKind {
    Availability {
        operator: AvailabilityOperator,
    },
    Threshold {
        operator: ThresholdOperator,
        threshold: f64,
    },
    #[serde(rename_all = "camelCase")]
    Range {
        operator_low: RangeBound,
        operator_high: RangeBound,
        threshold_low: f64,
        threshold_high: f64,
        #[serde(default = "default_true")]
        in_range: bool,
    },
    #[serde(rename_all = "camelCase")]
    Compare {
        operator: ThresholdOperator,
        data2_id: String,
        #[serde(default = "default_multiplier")]
        data2_multiplier: f64,
    },
    #[serde(rename_all = "camelCase")]
    String {
        operator: StringOperator,
        pattern: String,
        #[serde(default)]
        ignore_case: bool,
    },
}

fn default_true() -> bool {
    true
}

impl ConditionKind {
    /// The wire discriminator
    pub fn type_name(&self) -> &'static str {
        match self {
            ConditionKind::Availability { .. } => "AVAILABILITY",
            ConditionKind::Threshold { .. } => "THRESHOLD",
            ConditionKind::Range { .. } => "RANGE",
            ConditionKind::Compare { .. } => "COMPARE",
            ConditionKind::String { .. } => "STRING",
        }
    }
}

/// A predicate over one data stream (two for COMPARE)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    #[serde(default)]
    pub trigger_id: String,
    /// Absent means FIRING
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger_mode: Option<TriggerMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition_id: Option<String>,
    pub data_id: String,
    #[serde(flatten)]
    pub kind: ConditionKind,
    /// Display hints such as the unit
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub context: BTreeMap<String, String>,
}

impl Condition {
    pub fn new(data_id: impl Into<String>, kind: ConditionKind) -> Self {
        Self {
            trigger_id: String::new(),
            trigger_mode: None,
            condition_id: None,
            data_id: data_id.into(),
            kind,
            context: BTreeMap::new(),
        }
    }

    pub fn availability(data_id: impl Into<String>, operator: AvailabilityOperator) -> Self {
        Self::new(data_id, ConditionKind::Availability { operator })
    }

    pub fn threshold(data_id: impl Into<String>, operator: ThresholdOperator, threshold: f64) -> Self {
        Self::new(data_id, ConditionKind::Threshold { operator, threshold })
    }

    pub fn range(
        data_id: impl Into<String>,
        (operator_low, threshold_low): (RangeBound, f64),
        (operator_high, threshold_high): (RangeBound, f64),
        in_range: bool,
    ) -> Self {
        Self::new(
            data_id,
            ConditionKind::Range {
                operator_low,
                operator_high,
                threshold_low,
                threshold_high,
                in_range,
            },
        )
    }

    pub fn compare(
        data_id: impl Into<String>,
        operator: ThresholdOperator,
        data2_id: impl Into<String>,
        data2_multiplier: f64,
    ) -> Self {
        Self::new(
            data_id,
            ConditionKind::Compare {
                operator,
                data2_id: data2_id.into(),
                data2_multiplier,
            },
        )
    }

    pub fn string(
        data_id: impl Into<String>,
        operator: StringOperator,
        pattern: impl Into<String>,
        ignore_case: bool,
    ) -> Self {
        Self::new(
            data_id,
            ConditionKind::String {
                operator,
                pattern: pattern.into(),
                ignore_case,
            },
        )
    }

    pub fn with_mode(mut self, mode: TriggerMode) -> Self {
        self.trigger_mode = Some(mode);
        self
    }

    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    pub fn for_trigger(mut self, trigger_id: impl Into<String>) -> Self {
        self.trigger_id = trigger_id.into();
        self
    }

    /// Mode this condition is evaluated in; anything but AUTORESOLVE fires
    pub fn effective_mode(&self) -> TriggerMode {
        match self.trigger_mode {
            Some(TriggerMode::Autoresolve) => TriggerMode::Autoresolve,
            _ => TriggerMode::Firing,
        }
    }

    pub fn condition_type(&self) -> &'static str {
        self.kind.type_name()
    }

    pub fn data2_id(&self) -> Option<&str> {
        match &self.kind {
            ConditionKind::Compare { data2_id, .. } => Some(data2_id),
            _ => None,
        }
    }

    /// Take `dataId` (and `data2Id` when both sides compare) from `other`
    pub fn copy_data_ids_from(&mut self, other: &Condition) {
        self.data_id = other.data_id.clone();
        if let (
            ConditionKind::Compare { data2_id, .. },
            ConditionKind::Compare {
                data2_id: source, ..
            },
        ) = (&mut self.kind, &other.kind)
        {
            *data2_id = source.clone();
        }
    }
}

/// Conditions split by the mode they are saved under
///
/// The backend replaces the condition set of one `(trigger, mode)` pair at a
/// time, so each bucket is written as a whole.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConditionBuckets {
    pub firing: Vec<Condition>,
    pub autoresolve: Vec<Condition>,
}

impl ConditionBuckets {
    pub fn partition<I>(conditions: I) -> Self
    where
        I: IntoIterator<Item = Condition>,
    {
        let mut buckets = Self::default();
        for condition in conditions {
            match condition.effective_mode() {
                TriggerMode::Firing => buckets.firing.push(condition),
                TriggerMode::Autoresolve => buckets.autoresolve.push(condition),
            }
        }
        buckets
    }

    /// `(mode, conditions)` for every bucket holding at least one condition
    pub fn non_empty(self) -> impl Iterator<Item = (TriggerMode, Vec<Condition>)> {
        [
            (TriggerMode::Firing, self.firing),
            (TriggerMode::Autoresolve, self.autoresolve),
        ]
        .into_iter()
        .filter(|(_, bucket)| !bucket.is_empty())
    }
}
