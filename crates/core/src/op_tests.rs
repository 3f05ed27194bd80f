// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use chrono::TimeZone;
use yare::parameterized;

fn make_op(kind: OpKind, id: &str) -> SyncOperation {
    SyncOperation::new(
        kind,
        Collection::Receipts,
        Record::new(id).with_field("amount", 10i64),
        DeviceId::from("dev-a"),
        Utc.with_ymd_and_hms(2026, 3, 1, 10, 0, 0).unwrap(),
    )
}

#[parameterized(
    create = { "create", OpKind::Create },
    update = { "UPDATE", OpKind::Update },
    delete = { "delete", OpKind::Delete },
)]
fn parse_kind(input: &str, expected: OpKind) {
    assert_eq!(input.parse::<OpKind>().unwrap(), expected);
}

#[test]
fn parse_invalid_kind() {
    assert!(matches!("upsert".parse::<OpKind>(), Err(Error::InvalidOpKind(_))));
}

#[test]
fn upsert_kinds() {
    assert!(OpKind::Create.is_upsert());
    assert!(OpKind::Update.is_upsert());
    assert!(!OpKind::Delete.is_upsert());
}

#[test]
fn new_ops_get_distinct_ids() {
    assert_ne!(make_op(OpKind::Create, "R1").id, make_op(OpKind::Create, "R1").id);
}

#[test]
fn remote_path_uses_collection_and_record_id() {
    let op = make_op(OpKind::Update, "R7");
    assert_eq!(op.record_id(), "R7");
    assert_eq!(op.remote_path().unwrap().as_str(), "receipts/R7");
}

#[test]
fn remote_path_rejects_bad_id() {
    assert!(make_op(OpKind::Delete, "a.b").remote_path().is_err());
}

#[test]
fn serializes_with_camel_case_keys() {
    let op = make_op(OpKind::Create, "R1");
    let value = serde_json::to_value(&op).unwrap();

    assert_eq!(value["kind"], "create");
    assert_eq!(value["collection"], "receipts");
    assert_eq!(value["originDevice"], "dev-a");
    assert_eq!(value["payload"]["id"], "R1");
    assert!(value.get("createdAt").is_some());

    let parsed: SyncOperation = serde_json::from_value(value).unwrap();
    assert_eq!(parsed, op);
}
