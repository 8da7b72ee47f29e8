//! Nearest-availability picker.
//!
//! Source records carry appointment availability in loosely shaped payloads:
//! a map of keys to timestamps, a list of timestamps, or nested objects with
//! an `available_at`/`time` field. This module flattens whatever arrives into
//! candidate instants and keeps the single soonest one that is still in the
//! future relative to an injected "now".

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// The soonest upcoming slot observed for a facility.
///
/// `available_at` is the raw source string, verbatim, so downstream readers
/// see exactly what the source published.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NearestAvailability {
    pub facility_id: String,
    pub available_at: String,
    pub source: String,
    pub observed_at: DateTime<Utc>,
}

/// Pick the nearest future availability out of a heterogeneous payload.
///
/// Candidates must be ISO-8601 instants with an explicit UTC offset; anything
/// unparseable, offset-less, or in the past is dropped. Ties go to the first
/// candidate in payload order, so object insertion order is significant.
pub fn pick_nearest(
    facility_id: &str,
    payload: Option<&Value>,
    source: &str,
    now: DateTime<Utc>,
) -> Option<NearestAvailability> {
    let mut candidates: Vec<&str> = Vec::new();
    match payload {
        Some(Value::Object(map)) => {
            for value in map.values() {
                collect_candidate(value, &mut candidates);
            }
        }
        Some(Value::Array(items)) => {
            for item in items {
                collect_candidate(item, &mut candidates);
            }
        }
        _ => return None,
    }

    let mut min_value: Option<&str> = None;
    let mut min_delta: Option<TimeDelta> = None;

    for raw in candidates {
        if raw.is_empty() {
            continue;
        }
        let Ok(parsed) = DateTime::parse_from_rfc3339(raw) else {
            debug!(facility_id, candidate = raw, "discarding unparseable timestamp");
            continue;
        };
        let delta = parsed.signed_duration_since(now);
        if delta < TimeDelta::zero() {
            continue;
        }
        if min_delta.is_none_or(|current| delta < current) {
            min_delta = Some(delta);
            min_value = Some(raw);
        }
    }

    min_value.map(|raw| NearestAvailability {
        facility_id: facility_id.to_string(),
        available_at: raw.to_string(),
        source: source.to_string(),
        observed_at: now,
    })
}

/// Leaf decoder shared by both container shapes: a candidate is a bare
/// string, a timestamp-bearing object, or a list of strings. An object with
/// a non-string `available_at` is consumed without falling back to `time`.
fn collect_candidate<'a>(value: &'a Value, out: &mut Vec<&'a str>) {
    match value {
        Value::String(s) => out.push(s),
        Value::Object(map) => {
            if let Some(inner) = map.get("available_at") {
                if let Value::String(s) = inner {
                    out.push(s);
                }
            } else if let Some(inner) = map.get("time") {
                if let Value::String(s) = inner {
                    out.push(s);
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                if let Value::String(s) = item {
                    out.push(s);
                }
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
    }

    fn pick(payload: Value) -> Option<NearestAvailability> {
        pick_nearest("fac-1", Some(&payload), "cortico", now())
    }

    #[test]
    fn empty_payload_yields_nothing() {
        assert!(pick_nearest("fac-1", None, "cortico", now()).is_none());
        assert!(pick(json!({})).is_none());
        assert!(pick(json!([])).is_none());
        assert!(pick(json!("2099-01-01T00:00:00Z")).is_none());
    }

    #[test]
    fn past_candidates_are_excluded() {
        let out = pick(json!({
            "a": "2099-01-01T00:00:00Z",
            "b": "2000-01-01T00:00:00Z",
        }))
        .unwrap();
        assert_eq!(out.available_at, "2099-01-01T00:00:00Z");
        assert_eq!(out.source, "cortico");
        assert_eq!(out.observed_at, now());
    }

    #[test]
    fn soonest_future_wins_regardless_of_order() {
        let near = "2025-01-02T00:00:00Z";
        let far = "2025-06-01T00:00:00Z";
        let a = pick(json!([far, near])).unwrap();
        let b = pick(json!([near, far])).unwrap();
        assert_eq!(a.available_at, near);
        assert_eq!(b.available_at, near);
    }

    #[test]
    fn tie_goes_to_first_iterated_candidate() {
        // Same instant spelled two ways; strict-less tracking keeps the first.
        let out = pick(json!([
            "2025-06-01T14:00:00+02:00",
            "2025-06-01T12:00:00Z",
        ]))
        .unwrap();
        assert_eq!(out.available_at, "2025-06-01T14:00:00+02:00");
    }

    #[test]
    fn object_values_may_be_nested() {
        let out = pick(json!({
            "walk-in": {"available_at": "2025-03-01T09:00:00Z"},
            "phone": {"time": "2025-02-01T09:00:00Z"},
            "extra": ["2025-04-01T09:00:00Z", 42],
        }))
        .unwrap();
        assert_eq!(out.available_at, "2025-02-01T09:00:00Z");
    }

    #[test]
    fn list_of_objects_is_supported() {
        let out = pick(json!([
            {"time": "2025-05-01T09:00:00Z"},
            {"available_at": "2025-02-01T09:00:00Z"},
            "not a timestamp",
        ]))
        .unwrap();
        assert_eq!(out.available_at, "2025-02-01T09:00:00Z");
    }

    #[test]
    fn non_string_available_at_does_not_fall_back_to_time() {
        let out = pick(json!([
            {"available_at": 12345, "time": "2025-02-01T09:00:00Z"},
        ]));
        assert!(out.is_none());
    }

    #[test]
    fn malformed_and_offsetless_timestamps_are_skipped() {
        let out = pick(json!([
            "next tuesday",
            "2025-02-30T09:00:00Z",
            "2025-02-01T09:00:00",
            "2025-02-01T09:00:00Z",
        ]))
        .unwrap();
        assert_eq!(out.available_at, "2025-02-01T09:00:00Z");
    }

    #[test]
    fn all_past_or_unparseable_yields_nothing() {
        assert!(pick(json!(["2000-01-01T00:00:00Z", "garbage"])).is_none());
    }

    #[test]
    fn now_itself_is_still_eligible() {
        let out = pick(json!(["2025-01-01T00:00:00Z"])).unwrap();
        assert_eq!(out.available_at, "2025-01-01T00:00:00Z");
    }
}
