// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Temporal field codec.
//!
//! Records carry dates under a fixed set of field names. On the way out they
//! are normalized to ISO-8601 text; on the way in they are parsed back into
//! typed timestamps. A value that cannot be parsed is logged and left as
//! received, never treated as fatal.
//!
//! Recognized fields: `date`, `createdAt`, `updatedAt`, `joinDate`,
//! `uploadedAt`, `lastAccessed`, `lastModified`, and `timestamp` inside each
//! entry of an `accessLog` list.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde_json::Number;

use crate::value::FieldValue;

/// Top-level field names holding dates.
pub const TEMPORAL_FIELDS: &[&str] = &[
    "date",
    "createdAt",
    "updatedAt",
    "joinDate",
    "uploadedAt",
    "lastAccessed",
    "lastModified",
];

/// List field whose entries carry a nested timestamp.
pub const ACCESS_LOG_FIELD: &str = "accessLog";

/// Timestamp field inside each access log entry.
pub const ACCESS_LOG_TIMESTAMP: &str = "timestamp";

/// Returns true if the top-level field holds a date.
pub fn is_temporal_field(name: &str) -> bool {
    TEMPORAL_FIELDS.contains(&name)
}

/// Formats a timestamp the way it is transmitted: RFC 3339, milliseconds, `Z`.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parses an ISO-8601 timestamp, a naive date-time (taken as UTC) or a bare
/// `YYYY-MM-DD` date (midnight UTC).
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn from_epoch_millis(n: &Number) -> Option<DateTime<Utc>> {
    let millis = match n.as_i64() {
        Some(ms) => ms,
        None => n.as_f64().filter(|f| f.is_finite()).map(|f| f as i64)?,
    };
    DateTime::from_timestamp_millis(millis)
}

/// Direction a record is travelling, used for log context only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Outgoing,
    Incoming,
}

/// Coerces temporal fields before transmission.
///
/// Text in any supported format and epoch-millisecond numbers become typed
/// timestamps, which render as ISO-8601 on the wire. Returns the number of
/// temporal fields that could not be converted.
pub fn normalize_fields(fields: &mut BTreeMap<String, FieldValue>) -> usize {
    visit(fields, Direction::Outgoing)
}

/// Parses temporal fields of a record received from the remote store.
///
/// Returns the number of temporal fields left as received.
pub fn decode_fields(fields: &mut BTreeMap<String, FieldValue>) -> usize {
    visit(fields, Direction::Incoming)
}

fn visit(fields: &mut BTreeMap<String, FieldValue>, direction: Direction) -> usize {
    let mut failures = 0;

    for (name, value) in fields.iter_mut() {
        if is_temporal_field(name) {
            if !coerce(name, value, direction) {
                failures += 1;
            }
        } else if name == ACCESS_LOG_FIELD {
            if let FieldValue::List(entries) = value {
                for entry in entries.iter_mut() {
                    if let FieldValue::Map(entry) = entry {
                        if let Some(ts) = entry.get_mut(ACCESS_LOG_TIMESTAMP) {
                            if !coerce("accessLog[].timestamp", ts, direction) {
                                failures += 1;
                            }
                        }
                    }
                }
            }
        }
    }

    failures
}

/// Returns false when the value is present but unparseable.
fn coerce(name: &str, value: &mut FieldValue, direction: Direction) -> bool {
    let parsed = match value {
        FieldValue::Timestamp(_) | FieldValue::Null => return true,
        FieldValue::Text(s) => parse_timestamp(s),
        FieldValue::Number(n) => from_epoch_millis(n),
        _ => None,
    };

    match parsed {
        Some(ts) => {
            *value = FieldValue::Timestamp(ts);
            true
        }
        None => {
            tracing::warn!(
                field = name,
                direction = ?direction,
                value = ?value,
                "unparseable date left as received"
            );
            false
        }
    }
}

#[cfg(test)]
#[path = "temporal_tests.rs"]
mod tests;
