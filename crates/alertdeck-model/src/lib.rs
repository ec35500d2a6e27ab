//! Alert definition model
//!
//! Wire types exchanged with the remote alerting service:
//! - [`Trigger`] with its [`Dampening`]s and [`Condition`]s, aggregated as a [`FullTrigger`]
//! - [`Action`] notification endpoints referenced by triggers
//! - [`Alert`] instances and their evaluation records
//!
//! All types serialize as camelCase JSON with upper-case enum values.

pub mod action;
pub mod alert;
pub mod condition;
pub mod dampening;
pub mod full_trigger;
pub mod tenant;
pub mod trigger;

pub use action::Action;
pub use alert::{Alert, AlertStatus, ConditionEval, EvalCondition, Event, Note};
pub use condition::{
    AvailabilityOperator, Condition, ConditionBuckets, ConditionKind, RangeBound,
    StringOperator, ThresholdOperator,
};
pub use dampening::{Dampening, DampeningType};
pub use full_trigger::FullTrigger;
pub use tenant::TenantId;
pub use trigger::{Match, Severity, Trigger, TriggerMode};
