// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Merging remote snapshots into the visible list.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use tally_core::Record;

use crate::config::MergePolicy;

/// Merges `incoming` over `current` with the remote copy always winning.
pub fn merge(current: &[Record], incoming: &[Record]) -> Vec<Record> {
    merge_with(MergePolicy::RemoteWins, current, incoming)
}

/// Merges `incoming` over `current`.
///
/// Ids only present locally are kept. The result is in display order (see
/// [`sort_for_display`]).
pub fn merge_with(policy: MergePolicy, current: &[Record], incoming: &[Record]) -> Vec<Record> {
    let mut by_id: BTreeMap<&str, &Record> = current.iter().map(|r| (r.id.as_str(), r)).collect();

    for record in incoming {
        let keep_local = match (policy, by_id.get(record.id.as_str())) {
            (MergePolicy::NewestWins, Some(local)) => is_older(record, local),
            _ => false,
        };
        if !keep_local {
            by_id.insert(record.id.as_str(), record);
        }
    }

    let mut merged: Vec<Record> = by_id.into_values().cloned().collect();
    sort_for_display(&mut merged);
    merged
}

/// An unstamped copy counts as older than a stamped one.
fn is_older(incoming: &Record, local: &Record) -> bool {
    match (incoming.last_modified, local.last_modified) {
        (Some(theirs), Some(ours)) => theirs < ours,
        (None, Some(_)) => true,
        _ => false,
    }
}

/// The timestamp a record is ordered by: its `date`, else `lastModified`.
pub fn presentation_key(record: &Record) -> Option<DateTime<Utc>> {
    record.timestamp("date").or(record.last_modified)
}

/// Sorts newest first. Records without a key go last; ties break on id.
pub fn sort_for_display(records: &mut [Record]) {
    records.sort_by(|a, b| {
        let by_key = match (presentation_key(a), presentation_key(b)) {
            (Some(x), Some(y)) => y.cmp(&x),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        by_key.then_with(|| a.id.cmp(&b.id))
    });
}

#[cfg(test)]
#[path = "reconcile_tests.rs"]
mod tests;
