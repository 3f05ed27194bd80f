// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use chrono::TimeZone;
use serde_json::json;

#[test]
fn from_json_keeps_date_strings_as_text() {
    let value = FieldValue::from_json(json!("2026-03-01T10:00:00Z"));
    assert_eq!(value, FieldValue::Text("2026-03-01T10:00:00Z".into()));
}

#[test]
fn timestamp_renders_as_iso_with_millis() {
    let ts = Utc.with_ymd_and_hms(2026, 3, 1, 10, 0, 0).unwrap();
    assert_eq!(FieldValue::Timestamp(ts).to_json(), json!("2026-03-01T10:00:00.000Z"));
}

#[test]
fn nested_structures_convert_both_ways() {
    let input = json!({
        "amount": 12.5,
        "tags": ["a", "b"],
        "meta": { "paid": true, "note": null }
    });
    let value = FieldValue::from_json(input.clone());
    assert_eq!(value.to_json(), input);
}

#[test]
fn non_finite_float_becomes_null() {
    assert_eq!(FieldValue::from(f64::NAN), FieldValue::Null);
}

#[test]
fn accessors() {
    let ts = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
    assert_eq!(FieldValue::from(ts).as_timestamp(), Some(ts));
    assert_eq!(FieldValue::from("hi").as_str(), Some("hi"));
    assert_eq!(FieldValue::from(3i64).as_str(), None);
}
