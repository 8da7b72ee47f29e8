//! Small shared helpers for source transformers.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;

static NON_SLUG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\w\s-]").unwrap());
static SLUG_SEP_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[-\s]+").unwrap());

/// Generate a URL-friendly slug from a facility name.
///
/// A blank name falls back to `{prefix}-{unix seconds}` so the record still
/// gets a unique natural key.
pub fn generate_slug(name: &str, prefix: &str, now: DateTime<Utc>) -> String {
    if name.trim().is_empty() {
        return format!("{prefix}-{}", now.timestamp());
    }

    let lower = name.to_lowercase();
    let stripped = NON_SLUG_RE.replace_all(&lower, "");
    let slug = SLUG_SEP_RE.replace_all(&stripped, "-");
    slug.trim_matches('-').to_string()
}

/// Format a North American phone number as `(AAA) BBB-CCCC`.
///
/// Ten digits, or eleven with a leading 1, get formatted; anything else is
/// returned as it arrived. Empty input yields `None`.
pub fn clean_phone(raw: Option<&str>) -> Option<String> {
    let raw = raw?;
    if raw.is_empty() {
        return None;
    }

    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();

    if digits.len() == 10 {
        Some(format!("({}) {}-{}", &digits[..3], &digits[3..6], &digits[6..]))
    } else if digits.len() == 11 && digits.starts_with('1') {
        Some(format!("({}) {}-{}", &digits[1..4], &digits[4..7], &digits[7..]))
    } else {
        Some(raw.to_string())
    }
}
