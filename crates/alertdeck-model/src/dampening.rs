//! Dampening policies

use serde::{Deserialize, Serialize};

use crate::trigger::TriggerMode;

/// How condition matches are aggregated before a trigger fires or resolves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DampeningType {
    /// N consecutive true evaluations
    #[default]
    Strict,
    /// N true evaluations out of M
    RelaxedCount,
    /// N true evaluations within a time window
    RelaxedTime,
    /// Continuously true for a duration
    StrictTime,
    /// Continuously true for a duration, checked on a timer
    StrictTimeout,
}

/// A dampening policy owned by one trigger, at most one per [`TriggerMode`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dampening {
    #[serde(default)]
    pub trigger_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dampening_id: Option<String>,
    #[serde(default)]
    pub trigger_mode: TriggerMode,
    #[serde(rename = "type", default)]
    pub dampening_type: DampeningType,
    #[serde(default)]
    pub eval_true_setting: u32,
    #[serde(default)]
    pub eval_total_setting: u32,
    /// Milliseconds
    #[serde(default)]
    pub eval_time_setting: u64,
}

impl Dampening {
    fn base(mode: TriggerMode, dampening_type: DampeningType) -> Self {
        Self {
            trigger_id: String::new(),
            dampening_id: None,
            trigger_mode: mode,
            dampening_type,
            eval_true_setting: 0,
            eval_total_setting: 0,
            eval_time_setting: 0,
        }
    }

    pub fn strict(mode: TriggerMode, eval_true: u32) -> Self {
        Self {
            eval_true_setting: eval_true,
            eval_total_setting: eval_true,
            ..Self::base(mode, DampeningType::Strict)
        }
    }

    pub fn relaxed_count(mode: TriggerMode, eval_true: u32, eval_total: u32) -> Self {
        Self {
            eval_true_setting: eval_true,
            eval_total_setting: eval_total,
            ..Self::base(mode, DampeningType::RelaxedCount)
        }
    }

    pub fn relaxed_time(mode: TriggerMode, eval_true: u32, eval_time_ms: u64) -> Self {
        Self {
            eval_true_setting: eval_true,
            eval_time_setting: eval_time_ms,
            ..Self::base(mode, DampeningType::RelaxedTime)
        }
    }

    pub fn strict_time(mode: TriggerMode, eval_time_ms: u64) -> Self {
        Self {
            eval_time_setting: eval_time_ms,
            ..Self::base(mode, DampeningType::StrictTime)
        }
    }

    pub fn strict_timeout(mode: TriggerMode, eval_time_ms: u64) -> Self {
        Self {
            eval_time_setting: eval_time_ms,
            ..Self::base(mode, DampeningType::StrictTimeout)
        }
    }

    pub fn for_trigger(mut self, trigger_id: impl Into<String>) -> Self {
        self.trigger_id = trigger_id.into();
        self
    }
}
