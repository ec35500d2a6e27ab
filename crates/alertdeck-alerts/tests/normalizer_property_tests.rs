//! Property-based tests for alert summaries

use alertdeck_alerts::normalize_alert;
use alertdeck_model::{Alert, ConditionEval, EvalCondition};
use chrono::{TimeZone, Utc};
use proptest::prelude::*;
use serde_json::json;

fn sample(value: i32, threshold: Option<u16>) -> ConditionEval {
    ConditionEval {
        value: Some(json!(value)),
        condition: threshold.map(|t| EvalCondition {
            condition_type: Some("THRESHOLD".to_string()),
            threshold: Some(f64::from(t)),
            ..Default::default()
        }),
        ..Default::default()
    }
}

fn alert(eval_sets: Vec<Vec<ConditionEval>>) -> Alert {
    Alert {
        id: "a1".to_string(),
        trigger_id: "t1".to_string(),
        ctime: 1_700_000_000_000,
        eval_sets,
        ..Default::default()
    }
}

proptest! {
    /// The average covers the first record of every set and nothing else
    #[test]
    fn prop_average_of_first_records(
        sets in prop::collection::vec(prop::collection::vec(-1000i32..1000, 1..4), 1..10)
    ) {
        let eval_sets = sets
            .iter()
            .map(|set| set.iter().map(|v| sample(*v, None)).collect())
            .collect();
        let summary = normalize_alert(&alert(eval_sets), &Utc::now());

        let firsts: Vec<f64> = sets.iter().map(|set| f64::from(set[0])).collect();
        let expected = firsts.iter().sum::<f64>() / firsts.len() as f64;
        let avg = summary.avg.unwrap_or(f64::NAN);
        prop_assert!((avg - expected).abs() < 1e-9);
    }

    /// Later thresholds never overwrite the first one seen
    #[test]
    fn prop_threshold_first_wins(thresholds in prop::collection::vec(proptest::option::of(any::<u16>()), 1..8)) {
        let eval_sets = thresholds.iter().map(|t| vec![sample(1, *t)]).collect();
        let summary = normalize_alert(&alert(eval_sets), &Utc::now());

        let first = thresholds.iter().flatten().next().map(|t| f64::from(*t));
        prop_assert_eq!(summary.threshold, first);
        prop_assert_eq!(summary.condition_type.is_some(), first.is_some());
    }

    /// Normalization never fails on arbitrary evaluation payloads
    #[test]
    fn prop_arbitrary_eval_sets_never_fail(raw in prop::collection::vec(
        prop_oneof![
            Just(json!([{"value": "n/a"}])),
            Just(json!([{"value": 3, "dataTimestamp": "soon"}])),
            Just(json!("garbage")),
            Just(json!([])),
            Just(json!([{"rate": 2.5}])),
        ],
        0..6,
    )) {
        let payload = json!({"id": "a1", "ctime": 1000, "evalSets": raw});
        let parsed: Alert = serde_json::from_value(payload).unwrap();
        let now = Utc.timestamp_millis_opt(1000).unwrap();

        let summary = normalize_alert(&parsed, &now);
        prop_assert_eq!(summary.id, "a1");
        prop_assert!(summary.is_today);
        if let Some(avg) = summary.avg {
            prop_assert!(avg.is_finite());
        }
    }
}
