//! Full-trigger synchronization
//!
//! A full trigger is written as several backend calls: the trigger itself,
//! one call per dampening and one bulk call per condition mode. The
//! synchronizer fans those calls out concurrently and waits for all of them.
//! A failed sub-write never cancels its siblings; it is recorded in the
//! returned [`SyncReport`] and nothing is rolled back.
//!
//! Updates target the owning group template (`memberOf`) rather than the
//! member, and only sub-objects that differ from the caller's backup are
//! written.

use std::{fmt, sync::Arc};

use chrono::Utc;
use futures::future::join_all;
use tracing::{debug, error, info, warn};

use alertdeck_model::{
    Condition, ConditionBuckets, Dampening, FullTrigger, TenantId, Trigger, TriggerMode,
};

use crate::{
    actions::{ensure_actions, ActionDefaults},
    backend::AlertsBackend,
    error::{AlertsError, Result},
};

/// The backend object a sub-write addressed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteTarget {
    GroupTrigger { group_id: String },
    Dampening { trigger_id: String, mode: TriggerMode },
    Conditions { trigger_id: String, mode: TriggerMode },
    Action { plugin: String, action_id: String },
}

impl fmt::Display for WriteTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WriteTarget::GroupTrigger { group_id } => write!(f, "group trigger {group_id}"),
            WriteTarget::Dampening { trigger_id, mode } => {
                write!(f, "{mode} dampening of {trigger_id}")
            }
            WriteTarget::Conditions { trigger_id, mode } => {
                write!(f, "{mode} conditions of {trigger_id}")
            }
            WriteTarget::Action { plugin, action_id } => write!(f, "action {plugin}/{action_id}"),
        }
    }
}

#[derive(Debug)]
pub struct SyncFailure {
    pub target: WriteTarget,
    pub error: AlertsError,
}

/// Outcome of a create or update whose primary step succeeded
#[derive(Debug)]
pub struct SyncReport {
    /// Id of the trigger that was created, or of the group that was updated
    pub trigger_id: String,
    /// Sub-writes issued
    pub attempted: usize,
    pub failures: Vec<SyncFailure>,
    /// Writes not issued because a prerequisite failed
    pub skipped: Vec<WriteTarget>,
}

impl SyncReport {
    fn new(trigger_id: impl Into<String>) -> Self {
        Self {
            trigger_id: trigger_id.into(),
            attempted: 0,
            failures: Vec::new(),
            skipped: Vec::new(),
        }
    }

    fn record(&mut self, target: WriteTarget, outcome: Result<()>) {
        self.attempted += 1;
        if let Err(error) = outcome {
            warn!("Failed to write {target}: {error}");
            self.failures.push(SyncFailure { target, error });
        }
    }

    fn record_all(&mut self, outcomes: impl IntoIterator<Item = (WriteTarget, Result<()>)>) {
        for (target, outcome) in outcomes {
            self.record(target, outcome);
        }
    }

    /// Whether every sub-write succeeded and none was skipped
    pub fn is_success(&self) -> bool {
        self.failures.is_empty() && self.skipped.is_empty()
    }

    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    /// Turn a partially applied report into an error. Writes that succeeded
    /// stay applied.
    pub fn into_result(self) -> Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(AlertsError::PartialAggregateFailure {
                failed: self.failures.len() + self.skipped.len(),
                attempted: self.attempted + self.skipped.len(),
            })
        }
    }
}

type Outcome = (WriteTarget, Result<()>);

/// Creates, updates and deletes full triggers against an [`AlertsBackend`]
pub struct TriggerSynchronizer {
    backend: Arc<dyn AlertsBackend>,
    action_defaults: ActionDefaults,
}

impl TriggerSynchronizer {
    pub fn new(backend: Arc<dyn AlertsBackend>) -> Self {
        Self {
            backend,
            action_defaults: ActionDefaults::default(),
        }
    }

    pub fn with_action_defaults(mut self, defaults: ActionDefaults) -> Self {
        self.action_defaults = defaults;
        self
    }

    pub fn action_defaults(&self) -> &ActionDefaults {
        &self.action_defaults
    }

    /// Save a trigger, then all of its dampenings and condition buckets.
    ///
    /// Fails only when the trigger itself cannot be saved.
    pub async fn create(&self, tenant: &TenantId, full: FullTrigger) -> Result<SyncReport> {
        let FullTrigger {
            mut trigger,
            dampenings,
            conditions,
        } = full;
        trigger.apply_creation_defaults(Utc::now());

        let saved = self
            .backend
            .create_trigger(tenant, &trigger)
            .await
            .map_err(|e| {
                error!("Failed to create trigger {:?}: {e}", trigger.name);
                e
            })?;
        let trigger_id = assigned_id(&saved, &trigger)?;
        let trigger_id = trigger_id.as_str();
        let backend = self.backend.as_ref();

        let dampening_writes = join_all(dampenings.into_iter().map(|dampening| async move {
            let dampening = dampening.for_trigger(trigger_id);
            let target = WriteTarget::Dampening {
                trigger_id: trigger_id.to_string(),
                mode: dampening.trigger_mode,
            };
            let outcome = backend
                .create_dampening(tenant, trigger_id, &dampening)
                .await
                .map(drop);
            (target, outcome)
        }));

        let buckets =
            ConditionBuckets::partition(conditions.into_iter().map(|c| c.for_trigger(trigger_id)));
        let condition_writes = join_all(buckets.non_empty().map(|(mode, bucket)| async move {
            let target = WriteTarget::Conditions {
                trigger_id: trigger_id.to_string(),
                mode,
            };
            let outcome = backend
                .set_conditions(tenant, trigger_id, mode, &bucket)
                .await
                .map(drop);
            (target, outcome)
        }));

        let (dampening_outcomes, condition_outcomes) =
            futures::join!(dampening_writes, condition_writes);

        let mut report = SyncReport::new(trigger_id);
        report.record_all(dampening_outcomes);
        report.record_all(condition_outcomes);
        info!(
            "Created trigger {trigger_id} ({} of {} sub-writes failed)",
            report.failed(),
            report.attempted
        );
        Ok(report)
    }

    /// Replay a member's edits onto its group template.
    ///
    /// `backup` is the state the edit started from. Dampenings and the
    /// condition set are written only where `full` differs from it; without a
    /// backup they are all written. Fails when `full` has no `memberOf` or
    /// the group cannot be fetched.
    pub async fn update(
        &self,
        tenant: &TenantId,
        full: &FullTrigger,
        backup: Option<&FullTrigger>,
    ) -> Result<SyncReport> {
        let group_id = full.trigger.member_of.as_deref().ok_or_else(|| {
            AlertsError::invalid_input(format!(
                "trigger {:?} is not a member of a group",
                full.trigger.id
            ))
        })?;

        let mut group = self
            .backend
            .get_full_trigger(tenant, group_id)
            .await
            .map_err(|e| {
                error!("Failed to fetch group trigger {group_id}: {e}");
                e
            })?;
        if group.trigger.id.is_empty() {
            group.trigger.id = group_id.to_string();
        }

        let incoming = &full.trigger;
        let changed_attrs = group.trigger.shared_attributes_differ(incoming);
        let changed_actions = !group.trigger.same_actions(incoming);
        debug!(
            "Group {group_id}: attributes changed {changed_attrs}, actions changed {changed_actions}"
        );

        let group_write = async {
            if changed_attrs || changed_actions {
                self.write_group_trigger(tenant, group_id, &group.trigger, incoming, changed_actions)
                    .await
            } else {
                (Vec::new(), None)
            }
        };

        let backend = self.backend.as_ref();
        let dampening_writes = join_all(
            changed_dampenings(full, backup)
                .map(|dampening| self.group_dampening_write(tenant, &group, dampening)),
        );

        let condition_writes = async {
            if !conditions_changed(full, backup) {
                debug!("Conditions of {group_id} unchanged, skipping");
                return Vec::new();
            }
            let buckets = ConditionBuckets::partition(group_conditions(full, &group));
            join_all(buckets.non_empty().map(|(mode, bucket)| async move {
                let target = WriteTarget::Conditions {
                    trigger_id: group_id.to_string(),
                    mode,
                };
                let outcome = backend
                    .set_group_conditions(tenant, group_id, mode, &bucket)
                    .await
                    .map(drop);
                (target, outcome)
            }))
            .await
        };

        let ((group_outcomes, skipped), dampening_outcomes, condition_outcomes) =
            futures::join!(group_write, dampening_writes, condition_writes);

        let mut report = SyncReport::new(group_id);
        report.record_all(group_outcomes);
        report.record_all(dampening_outcomes);
        report.record_all(condition_outcomes);
        if let Some(target) = skipped {
            warn!("Skipped {target}: action provisioning failed");
            report.skipped.push(target);
        }
        info!(
            "Updated group trigger {group_id} from member {:?} ({} of {} sub-writes failed)",
            incoming.id,
            report.failed(),
            report.attempted
        );
        Ok(report)
    }

    /// Delete a trigger; the backend removes its dampenings and conditions
    pub async fn delete(&self, tenant: &TenantId, trigger_id: &str) -> Result<()> {
        self.backend.delete_trigger(tenant, trigger_id).await?;
        info!("Deleted trigger {trigger_id}");
        Ok(())
    }

    /// Provision referenced actions, then PUT the group trigger carrying the
    /// incoming shared attributes. The PUT is skipped if provisioning failed.
    async fn write_group_trigger(
        &self,
        tenant: &TenantId,
        group_id: &str,
        group: &Trigger,
        incoming: &Trigger,
        changed_actions: bool,
    ) -> (Vec<Outcome>, Option<WriteTarget>) {
        let mut outcomes = Vec::new();
        if changed_actions {
            let provisioned = ensure_actions(
                self.backend.as_ref(),
                tenant,
                &self.action_defaults,
                incoming.action_refs(),
            )
            .await;
            outcomes.extend(provisioned.into_iter().map(|outcome| {
                (
                    WriteTarget::Action {
                        plugin: outcome.plugin,
                        action_id: outcome.action_id,
                    },
                    outcome.result.map(drop),
                )
            }));
        }

        let target = WriteTarget::GroupTrigger {
            group_id: group_id.to_string(),
        };
        if outcomes.iter().any(|(_, outcome)| outcome.is_err()) {
            return (outcomes, Some(target));
        }

        let mut updated = group.clone();
        updated.enabled = incoming.enabled;
        updated.severity = incoming.severity;
        updated.actions = incoming.actions.clone();
        let outcome = self
            .backend
            .update_group_trigger(tenant, group_id, &updated)
            .await;
        outcomes.push((target, outcome));
        (outcomes, None)
    }

    async fn group_dampening_write(
        &self,
        tenant: &TenantId,
        group: &FullTrigger,
        dampening: &Dampening,
    ) -> Outcome {
        let group_id = group.trigger.id.as_str();
        let target = WriteTarget::Dampening {
            trigger_id: group_id.to_string(),
            mode: dampening.trigger_mode,
        };

        let counterpart = dampening_for_mode(&group.dampenings, dampening.trigger_mode);
        let Some((dampening_id, group_dampening)) =
            counterpart.and_then(|d| d.dampening_id.as_deref().map(|id| (id, d)))
        else {
            let error = AlertsError::not_found(format!(
                "group {group_id} has no {} dampening",
                dampening.trigger_mode
            ));
            return (target, Err(error));
        };

        let mut outgoing = dampening.clone();
        outgoing.trigger_id = group_dampening.trigger_id.clone();
        outgoing.dampening_id = group_dampening.dampening_id.clone();

        let outcome = self
            .backend
            .update_group_dampening(tenant, group_id, dampening_id, &outgoing)
            .await
            .map(drop);
        (target, outcome)
    }
}

/// The id the backend assigned, or the requested one when the echo omits it
fn assigned_id(saved: &Trigger, requested: &Trigger) -> Result<String> {
    if !saved.id.is_empty() {
        return Ok(saved.id.clone());
    }
    if !requested.id.is_empty() {
        return Ok(requested.id.clone());
    }
    Err(AlertsError::Decode(
        "backend returned the created trigger without an id".to_string(),
    ))
}

fn dampening_for_mode(dampenings: &[Dampening], mode: TriggerMode) -> Option<&Dampening> {
    dampenings.iter().find(|d| d.trigger_mode == mode)
}

/// Incoming dampenings that differ from the backup's dampening of the same mode
fn changed_dampenings<'a>(
    full: &'a FullTrigger,
    backup: Option<&'a FullTrigger>,
) -> impl Iterator<Item = &'a Dampening> {
    full.dampenings.iter().filter(move |dampening| {
        let previous = backup.and_then(|b| dampening_for_mode(&b.dampenings, dampening.trigger_mode));
        let changed = previous != Some(*dampening);
        if !changed {
            debug!("{} dampening unchanged, skipping", dampening.trigger_mode);
        }
        changed
    })
}

/// Whether any condition slot differs from the backup; a different count
/// is a difference
fn conditions_changed(full: &FullTrigger, backup: Option<&FullTrigger>) -> bool {
    match backup {
        None => true,
        Some(backup) => backup.conditions != full.conditions,
    }
}

/// Incoming conditions rebound to the group, taking data ids from the group
/// condition at the same position within the same mode
fn group_conditions(full: &FullTrigger, group: &FullTrigger) -> Vec<Condition> {
    let group_id = group.trigger.id.as_str();
    let mut firing = group
        .conditions
        .iter()
        .filter(|c| c.effective_mode() == TriggerMode::Firing);
    let mut autoresolve = group
        .conditions
        .iter()
        .filter(|c| c.effective_mode() == TriggerMode::Autoresolve);

    full.conditions
        .iter()
        .map(|condition| {
            let mode = condition.effective_mode();
            let counterpart = match mode {
                TriggerMode::Firing => firing.next(),
                TriggerMode::Autoresolve => autoresolve.next(),
            };
            let mut outgoing = condition.clone().for_trigger(group_id).with_mode(mode);
            if let Some(group_condition) = counterpart {
                outgoing.copy_data_ids_from(group_condition);
            }
            outgoing
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use alertdeck_model::{AvailabilityOperator, ThresholdOperator};

    use super::*;

    fn member() -> FullTrigger {
        FullTrigger::new(Trigger::new("m1", "Member").member_of("g1"))
            .with_dampening(Dampening::strict(TriggerMode::Firing, 1).for_trigger("m1"))
            .with_condition(Condition::threshold("m1-cpu", ThresholdOperator::Gt, 90.0).for_trigger("m1"))
    }

    #[test]
    fn test_report_strict_conversion() {
        let mut report = SyncReport::new("t1");
        report.record(
            WriteTarget::Conditions {
                trigger_id: "t1".to_string(),
                mode: TriggerMode::Firing,
            },
            Ok(()),
        );
        assert!(report.is_success());

        report.record(
            WriteTarget::Dampening {
                trigger_id: "t1".to_string(),
                mode: TriggerMode::Firing,
            },
            Err(AlertsError::BackendUnavailable("down".to_string())),
        );
        assert!(!report.is_success());
        assert!(matches!(
            report.into_result(),
            Err(AlertsError::PartialAggregateFailure {
                failed: 1,
                attempted: 2
            })
        ));
    }

    #[test]
    fn test_unchanged_dampenings_are_skipped() {
        let full = member();
        let backup = full.clone();
        assert_eq!(changed_dampenings(&full, Some(&backup)).count(), 0);
        assert_eq!(changed_dampenings(&full, None).count(), 1);

        let mut edited = full.clone();
        edited.dampenings[0].eval_true_setting = 3;
        assert_eq!(changed_dampenings(&edited, Some(&backup)).count(), 1);
    }

    #[test]
    fn test_condition_count_change_is_a_change() {
        let full = member();
        let mut backup = full.clone();
        assert!(!conditions_changed(&full, Some(&backup)));

        backup
            .conditions
            .push(Condition::availability("m1-avail", AvailabilityOperator::Down));
        assert!(conditions_changed(&full, Some(&backup)));
        assert!(conditions_changed(&full, None));
    }

    #[test]
    fn test_group_conditions_take_group_data_ids_per_mode() {
        let full = FullTrigger::new(Trigger::new("m1", "Member").member_of("g1"))
            .with_condition(
                Condition::availability("m1-avail", AvailabilityOperator::Up)
                    .with_mode(TriggerMode::Autoresolve),
            )
            .with_condition(Condition::threshold("m1-cpu", ThresholdOperator::Gt, 95.0));
        let group = FullTrigger::new(Trigger::new("g1", "Group"))
            .with_condition(Condition::threshold("g1-cpu", ThresholdOperator::Gt, 90.0))
            .with_condition(
                Condition::availability("g1-avail", AvailabilityOperator::Up)
                    .with_mode(TriggerMode::Autoresolve),
            );

        let outgoing = group_conditions(&full, &group);

        assert_eq!(outgoing[0].data_id, "g1-avail");
        assert_eq!(outgoing[0].trigger_mode, Some(TriggerMode::Autoresolve));
        assert_eq!(outgoing[1].data_id, "g1-cpu");
        assert_eq!(outgoing[1].trigger_mode, Some(TriggerMode::Firing));
        assert!(outgoing.iter().all(|c| c.trigger_id == "g1"));
        assert!(matches!(
            outgoing[1].kind,
            alertdeck_model::ConditionKind::Threshold { threshold, .. } if threshold == 95.0
        ));
    }

    #[test]
    fn test_assigned_id_prefers_backend() {
        let requested = Trigger::new("t1", "CPU");
        assert_eq!(assigned_id(&Trigger::new("srv-1", "CPU"), &requested).unwrap(), "srv-1");
        assert_eq!(assigned_id(&Trigger::new("", "CPU"), &requested).unwrap(), "t1");
        assert!(assigned_id(&Trigger::new("", "CPU"), &Trigger::new("", "CPU")).is_err());
    }
}
