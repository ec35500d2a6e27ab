//! Display-ready alert summaries
//!
//! [`normalize_alert`] decorates a backend [`Alert`] with the aggregates a
//! console shows in its alert list: the averaged evaluated value, the
//! threshold and condition type that fired, the time span covered by the
//! evaluations and, for event triggers, the event message.
//!
//! Decoration is best effort. A malformed evaluation record only leaves the
//! fields it would have fed unset.

use std::collections::BTreeMap;

use alertdeck_model::{Alert, AlertStatus, ConditionEval, Note, Severity};
use chrono::{DateTime, Datelike, Local, TimeZone, Utc};
use serde::Serialize;

/// Event context key carrying the human-readable message
pub const EVENT_MESSAGE_KEY: &str = "Message";

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertSummary {
    pub id: String,
    pub trigger_id: String,
    pub status: AlertStatus,
    pub severity: Severity,
    /// Alert creation time, epoch milliseconds
    pub end: i64,
    /// Data timestamp of the first evaluation that carried one
    pub start: Option<i64>,
    /// `end - start`, when `start` is known
    pub duration_time: Option<i64>,
    pub avg: Option<f64>,
    pub threshold: Option<f64>,
    pub condition_type: Option<String>,
    /// Event triggers only
    pub message: Option<String>,
    pub is_today: bool,
    pub is_this_year: bool,
    pub ack_by: Option<String>,
    pub ack_notes: Option<String>,
    pub ack_time: Option<i64>,
    pub resolved_by: Option<String>,
    pub resolved_notes: Option<String>,
    pub resolved_time: Option<i64>,
    pub context: BTreeMap<String, String>,
    pub notes: Vec<Note>,
}

#[derive(Debug, Default)]
struct Aggregate {
    sum: f64,
    count: u32,
    start: Option<i64>,
    threshold: Option<f64>,
    condition_type: Option<String>,
}

impl Aggregate {
    fn observe(&mut self, eval: &ConditionEval) {
        if let Some(sample) = eval.rate.or_else(|| eval.numeric_value()).or(eval.value1) {
            self.sum += sample;
            self.count += 1;
        }
        if self.start.is_none() {
            self.start = eval.data_timestamp;
        }
        if let Some(condition) = &eval.condition {
            if self.threshold.is_none() {
                self.threshold = condition.threshold;
            }
            if self.condition_type.is_none() {
                self.condition_type = condition.condition_type.clone();
            }
        }
    }

    fn avg(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / f64::from(self.count))
    }
}

/// Summarize one alert, judging "today" and "this year" against `now`
pub fn normalize_alert<Tz: TimeZone>(alert: &Alert, now: &DateTime<Tz>) -> AlertSummary {
    let mut summary = AlertSummary {
        id: alert.id.clone(),
        trigger_id: alert.trigger_id.clone(),
        status: alert.status,
        severity: alert.severity,
        end: alert.ctime,
        ack_by: alert.ack_by.clone(),
        ack_notes: alert.ack_notes.clone(),
        ack_time: alert.ack_time,
        resolved_by: alert.resolved_by.clone(),
        resolved_notes: alert.resolved_notes.clone(),
        resolved_time: alert.resolved_time,
        context: alert.context.clone(),
        notes: alert.notes.clone(),
        ..Default::default()
    };

    let first_items = alert.eval_sets.iter().filter_map(|set| set.first());

    if alert.is_event_alert() {
        summary.message = alert
            .eval_sets
            .first()
            .and_then(|set| set.first())
            .and_then(|eval| eval.event.as_ref())
            .and_then(|event| {
                event
                    .context
                    .get(EVENT_MESSAGE_KEY)
                    .cloned()
                    .or_else(|| event.text.clone())
            });
    } else {
        let mut aggregate = Aggregate::default();
        for eval in first_items {
            aggregate.observe(eval);
        }
        summary.avg = aggregate.avg();
        summary.start = aggregate.start;
        summary.duration_time = aggregate
            .start
            .and_then(|start| summary.end.checked_sub(start));
        summary.threshold = aggregate.threshold;
        summary.condition_type = aggregate.condition_type;
    }

    let (is_today, is_this_year) = calendar_flags(alert.ctime, now);
    summary.is_today = is_today;
    summary.is_this_year = is_this_year;
    summary
}

/// Summarize a page of alerts against one shared `now`
pub fn normalize_alerts<Tz: TimeZone>(alerts: &[Alert], now: &DateTime<Tz>) -> Vec<AlertSummary> {
    alerts.iter().map(|alert| normalize_alert(alert, now)).collect()
}

/// [`normalize_alerts`] against the local clock
pub fn normalize_alerts_local(alerts: &[Alert]) -> Vec<AlertSummary> {
    normalize_alerts(alerts, &Local::now())
}

fn calendar_flags<Tz: TimeZone>(epoch_ms: i64, now: &DateTime<Tz>) -> (bool, bool) {
    let Some(end) = Utc.timestamp_millis_opt(epoch_ms).single() else {
        return (false, false);
    };
    let end = end.with_timezone(&now.timezone());

    let this_year = end.year() == now.year();
    (this_year && end.ordinal() == now.ordinal(), this_year)
}
