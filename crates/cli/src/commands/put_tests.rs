// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use crate::config::init_state_dir;
use serde_json::json;
use tally_core::Collection;
use tempfile::TempDir;
use yare::parameterized;

#[parameterized(
    string = { "vendor=Corner Shop", "vendor", json!("Corner Shop") },
    number = { "amount=12.5", "amount", json!(12.5) },
    integer = { "count=3", "count", json!(3) },
    boolean = { "paid=true", "paid", json!(true) },
    quoted = { "code=\"42\"", "code", json!("42") },
    date_stays_text = { "date=2024-03-01", "date", json!("2024-03-01") },
    empty_value = { "notes=", "notes", json!("") },
    value_with_equals = { "formula=a=b", "formula", json!("a=b") },
    trimmed_name = { " vendor =x", "vendor", json!("x") },
)]
fn test_parse_field(input: &str, name: &str, expected: serde_json::Value) {
    let (parsed_name, value) = parse_field(input).unwrap();
    assert_eq!(parsed_name, name);
    assert_eq!(value.to_json(), expected);
}

#[parameterized(
    no_equals = { "vendor" },
    empty_name = { "=value" },
    id_field = { "id=R2" },
)]
fn test_parse_field_rejects(input: &str) {
    assert!(matches!(parse_field(input), Err(Error::InvalidField(_))));
}

#[test]
fn test_build_record() {
    let record = build_record(
        "R1",
        &["vendor=Corner Shop".to_string(), "amount=12.5".to_string()],
    )
    .unwrap();

    assert_eq!(record.id, "R1");
    assert_eq!(record.get("vendor").unwrap().as_str(), Some("Corner Shop"));
    assert_eq!(record.fields.len(), 2);
    assert!(!record.is_stamped());
}

#[tokio::test]
async fn test_put_offline_queues() {
    let temp = TempDir::new().unwrap();
    init_state_dir(temp.path(), None).unwrap();

    let target = RecordArgs {
        collection: Collection::Receipts,
        id: "R1".to_string(),
    };
    run(
        temp.path(),
        target,
        vec!["amount=12.5".to_string()],
        false,
        RemoteArgs::default(),
    )
    .await
    .unwrap();

    let session = Session::open(temp.path(), false).await.unwrap();
    let status = session.engine.status();
    assert_eq!(status.queue_length, 1);
    assert!(!status.online);
}

#[tokio::test]
async fn test_put_invalid_id_queues_nothing() {
    let temp = TempDir::new().unwrap();
    init_state_dir(temp.path(), None).unwrap();

    let target = RecordArgs {
        collection: Collection::Receipts,
        id: "bad/id".to_string(),
    };
    let result = run(temp.path(), target, vec![], false, RemoteArgs::default()).await;
    assert!(matches!(result, Err(Error::Core(_))));

    let session = Session::open(temp.path(), false).await.unwrap();
    assert_eq!(session.engine.status().queue_length, 0);
}

#[tokio::test]
async fn test_put_requires_init() {
    let temp = TempDir::new().unwrap();
    let target = RecordArgs {
        collection: Collection::Receipts,
        id: "R1".to_string(),
    };
    let result = run(temp.path(), target, vec![], false, RemoteArgs::default()).await;
    assert!(matches!(result, Err(Error::NotInitialized)));
}
