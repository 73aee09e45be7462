//! Small utility helpers for JSON extraction, string matching, and time
//! parsing.
//!
//! The functions in this module are intentionally lightweight to keep hot
//! paths fast and reduce compile times. They are used by the remote client,
//! the filter/sort engines, and tests.

use chrono::{DateTime, Utc};
use serde_json::Value;

/// What: Case-insensitive substring containment test.
///
/// Inputs:
/// - `haystack`: Text to search within.
/// - `needle`: Text to look for.
///
/// Output:
/// - `true` when `needle` occurs in `haystack` ignoring case; an empty
///   `needle` always matches.
#[must_use]
pub fn contains_ci(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// What: Case-insensitive lexicographic ordering for display strings.
///
/// Inputs:
/// - `a`: Left-hand string.
/// - `b`: Right-hand string.
///
/// Output:
/// - `Ordering` of the lowercased forms.
#[must_use]
pub fn cmp_ci(a: &str, b: &str) -> std::cmp::Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

/// What: Extract a string value from a JSON object by key, defaulting to empty string.
///
/// Inputs:
/// - `v`: JSON value to extract from.
/// - `key`: Key to look up in the JSON object.
///
/// Output:
/// - Returns the string value if found, or an empty string if the key is missing or not a string.
#[must_use]
pub fn s(v: &Value, key: &str) -> String {
    v.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_owned()
}

/// What: Extract the first available string from a list of candidate keys.
///
/// Inputs:
/// - `v`: JSON value to extract from.
/// - `keys`: Array of candidate keys to try in order.
///
/// Output:
/// - Returns `Some(String)` for the first key that maps to a JSON string, or `None` if none match.
///
/// Details:
/// - Tries keys in the order provided and returns the first match.
#[must_use]
pub fn ss(v: &Value, keys: &[&str]) -> Option<String> {
    for k in keys {
        if let Some(s) = v.get(*k).and_then(|x| x.as_str()) {
            return Some(s.to_owned());
        }
    }
    None
}

/// What: Extract an array of strings from a JSON object by trying keys in order.
///
/// Inputs:
/// - `v`: JSON value to extract from.
/// - `keys`: Array of candidate keys to try in order.
///
/// Output:
/// - Returns the first found array as `Vec<String>`, filtering out non-string elements.
/// - Returns an empty vector if no array of strings is found.
#[must_use]
pub fn arrs(v: &Value, keys: &[&str]) -> Vec<String> {
    for k in keys {
        if let Some(arr) = v.get(*k).and_then(|x| x.as_array()) {
            return arr
                .iter()
                .filter_map(|e| e.as_str().map(ToOwned::to_owned))
                .collect();
        }
    }
    Vec::new()
}

/// What: Parse a record timestamp by trying keys in order.
///
/// Inputs:
/// - `v`: JSON value to extract from.
/// - `keys`: Array of candidate keys to try in order.
///
/// Output:
/// - Returns `Some(DateTime<Utc>)` for the first key holding an RFC 3339
///   string or an epoch-seconds number; `None` when no key parses.
///
/// Details:
/// - RFC 3339 strings keep their offset and are normalized to UTC.
/// - Integer values are interpreted as whole seconds since the Unix epoch.
#[must_use]
pub fn ts_of(v: &Value, keys: &[&str]) -> Option<DateTime<Utc>> {
    for k in keys {
        let Some(raw) = v.get(*k) else {
            continue;
        };
        if let Some(s) = raw.as_str()
            && let Ok(dt) = DateTime::parse_from_rfc3339(s.trim())
        {
            return Some(dt.with_timezone(&Utc));
        }
        if let Some(secs) = raw.as_i64()
            && let Some(dt) = DateTime::<Utc>::from_timestamp(secs, 0)
        {
            return Some(dt);
        }
    }
    None
}
