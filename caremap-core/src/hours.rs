//! Operating-hours text normalizer.
//!
//! Source schedules arrive as free-form, locale-inconsistent text keyed by
//! weekday ("9am-5pm, by appointment", "24/7", "9:00-17:00 and 18:00-20:00").
//! This module turns one weekly schedule map into structured per-weekday
//! open/close intervals, best-effort: anything unparseable is dropped with a
//! debug log, never an error.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// One open/close slot for a weekday, 24-hour `HH:MM` times.
///
/// `slot` numbers multiple intervals on the same day, 1-based, in source
/// order. `open_time < close_time` always holds; both are zero-padded so the
/// string order matches the numeric order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HourInterval {
    pub facility_id: String,
    /// 0 = Monday .. 6 = Sunday
    pub weekday: u8,
    pub weekday_label: String,
    pub open_time: String,
    pub close_time: String,
    pub notes: Option<String>,
    pub slot: u32,
}

const WEEKDAYS: [&str; 7] = [
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

const WEEKDAY_LABELS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Schedules that mean "this day has no numeric hours".
static SKIP_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"^-$",
        r"^closed$",
        r"^by appointment",
        r"^call",
        r"^contact",
        r"^n/?a$",
        r"^tbd",
        r"hours vary",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

static ALL_DAY_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"24\s*(hours?|hrs?)").unwrap());

static DASH_SPACING_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s*-\s*").unwrap());

static RANGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^(?P<start>\d{1,2}(?::\d{2})?\s*(?:AM|PM|am|pm)?)",
        r"-",
        r"(?P<end>\d{1,2}(?::\d{2})?\s*(?:AM|PM|am|pm)?)",
    ))
    .unwrap()
});

static MERIDIEM_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)(AM|PM)").unwrap());

static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Normalize a weekly schedule into hour intervals.
///
/// `schedule` is either a JSON object keyed by day token (weekday name in any
/// case, or a numeric index 0-6) or a JSON array whose position is the
/// weekday, Monday first. Missing/empty input yields no intervals. Malformed
/// days, segments, and ranges are silently skipped; this never fails.
pub fn normalize_hours(facility_id: &str, schedule: Option<&Value>) -> Vec<HourInterval> {
    let mut out = Vec::new();

    let entries: Vec<(String, &Value)> = match schedule {
        Some(Value::Object(map)) => map.iter().map(|(k, v)| (k.clone(), v)).collect(),
        Some(Value::Array(items)) => items
            .iter()
            .enumerate()
            .map(|(i, v)| (i.to_string(), v))
            .collect(),
        _ => return out,
    };

    for (raw_day, raw_schedule) in entries {
        let Some(weekday) = resolve_weekday(&raw_day) else {
            debug!(facility_id, day = %raw_day, "skipping unmapped weekday token");
            continue;
        };
        let weekday_label = WEEKDAY_LABELS[weekday as usize];

        let Some(schedule_text) = coerce_text(raw_schedule) else {
            continue;
        };
        let schedule_text = schedule_text.trim().to_string();
        if schedule_text.is_empty() {
            continue;
        }

        let normalized = normalize_schedule_text(&schedule_text);
        let normalized_lower = normalized.to_lowercase();
        if normalized_lower.is_empty() {
            continue;
        }

        if SKIP_PATTERNS.iter().any(|p| p.is_match(&normalized_lower)) {
            debug!(facility_id, day = %raw_day, schedule = %schedule_text, "day not numerically schedulable");
            continue;
        }

        if normalized_lower.contains("24/7") || ALL_DAY_RE.is_match(&normalized_lower) {
            out.push(HourInterval {
                facility_id: facility_id.to_string(),
                weekday,
                weekday_label: weekday_label.to_string(),
                open_time: "00:00".to_string(),
                close_time: "23:59".to_string(),
                notes: None,
                slot: 1,
            });
            continue;
        }

        let day_segments = parse_day_segments(&normalized);
        if day_segments.is_empty() {
            debug!(facility_id, day = %raw_day, schedule = %schedule_text, "unable to parse operating hours");
            continue;
        }

        for (slot_index, (open_time, close_time)) in day_segments.into_iter().enumerate() {
            out.push(HourInterval {
                facility_id: facility_id.to_string(),
                weekday,
                weekday_label: weekday_label.to_string(),
                open_time,
                close_time,
                notes: None,
                slot: (slot_index + 1) as u32,
            });
        }
    }

    out
}

/// Map a day token onto 0-6, Monday first. Names win over numeric indexes.
fn resolve_weekday(raw_day: &str) -> Option<u8> {
    let day_key = raw_day.trim().to_lowercase();
    if let Some(idx) = WEEKDAYS.iter().position(|d| *d == day_key) {
        return Some(idx as u8);
    }
    match day_key.parse::<i64>() {
        Ok(n) if (0..=6).contains(&n) => Some(n as u8),
        _ => None,
    }
}

/// Schedule values should be strings; numbers and bools still coerce cleanly.
/// Containers and nulls have no usable text form.
fn coerce_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Normalize common punctuation and whitespace in schedule text.
fn normalize_schedule_text(text: &str) -> String {
    let mut normalized = text.to_string();
    for (target, repl) in [
        ('\u{2013}', '-'), // en dash
        ('\u{2014}', '-'), // em dash
        ('\u{2212}', '-'), // minus sign
        ('\u{2009}', ' '), // thin space
        ('\u{200a}', ' '), // hair space
        ('\u{200b}', ' '), // zero-width space
        ('\u{00a0}', ' '), // no-break space
    ] {
        normalized = normalized.replace(target, &repl.to_string());
    }

    normalized = normalized.replace(" to ", " - ");
    let normalized = WHITESPACE_RE.replace_all(&normalized, " ");
    normalized.trim().to_string()
}

/// Split a normalized schedule into time-range segments and parse each.
/// Duplicate and inverted ranges are rejected; order is preserved.
fn parse_day_segments(normalized: &str) -> Vec<(String, String)> {
    let joined = normalized.replace(" and ", ", ");
    let mut day_segments: Vec<(String, String)> = Vec::new();

    for segment in joined.split([',', ';', '/']) {
        let segment = segment.trim();
        if segment.is_empty() {
            continue;
        }
        let Some((open_time, close_time)) = parse_hour_segment(segment) else {
            debug!(segment, "discarding unparseable segment");
            continue;
        };
        if open_time >= close_time {
            debug!(segment, "discarding inverted range");
            continue;
        }
        if day_segments.iter().any(|p| p.0 == open_time && p.1 == close_time) {
            continue;
        }
        day_segments.push((open_time, close_time));
    }

    day_segments
}

/// Parse a single `START-END` segment into 24-hour open/close times.
fn parse_hour_segment(segment: &str) -> Option<(String, String)> {
    let cleaned = DASH_SPACING_RE.replace_all(segment.trim(), "-");
    let caps = RANGE_RE.captures(&cleaned)?;

    let start_raw = caps.name("start")?.as_str().trim();
    let end_raw = caps.name("end")?.as_str().trim();

    // "9-5pm" means 9am-5pm: an unmarked start inherits the end's meridiem.
    let end_meridiem = extract_meridiem(end_raw);
    let start_meridiem = extract_meridiem(start_raw).or(end_meridiem);

    let open_time = to_24h_time(start_raw, start_meridiem)?;
    let close_time = to_24h_time(end_raw, end_meridiem)?;
    Some((open_time, close_time))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Meridiem {
    Am,
    Pm,
}

fn extract_meridiem(time_str: &str) -> Option<Meridiem> {
    let m = MERIDIEM_RE.find(time_str)?;
    match m.as_str().to_ascii_uppercase().as_str() {
        "AM" => Some(Meridiem::Am),
        _ => Some(Meridiem::Pm),
    }
}

/// Convert a time like "9", "9:30", "5pm", "5.30 PM" into zero-padded HH:MM.
fn to_24h_time(time_str: &str, fallback_meridiem: Option<Meridiem>) -> Option<String> {
    let mut cleaned = time_str.trim().to_ascii_uppercase().replace('.', "");

    let meridiem = match extract_meridiem(&cleaned) {
        Some(m) => {
            cleaned = MERIDIEM_RE.replace_all(&cleaned, "").into_owned();
            Some(m)
        }
        None => fallback_meridiem,
    };

    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return None;
    }

    let (hour_str, minute_str) = match cleaned.split_once(':') {
        Some((h, m)) => (h, m),
        None => (cleaned, "00"),
    };

    let mut hour: i32 = hour_str.trim().parse().ok()?;
    let minute: i32 = minute_str.trim().parse().ok()?;
    if !(0..=59).contains(&minute) {
        return None;
    }

    match meridiem {
        Some(Meridiem::Am) if hour == 12 => hour = 0,
        Some(Meridiem::Pm) if hour != 12 => hour += 12,
        _ => {}
    }

    if !(0..=23).contains(&hour) {
        return None;
    }

    Some(format!("{hour:02}:{minute:02}"))
}
