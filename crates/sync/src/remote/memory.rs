// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory hierarchical remote store.
//!
//! Holds the whole tree as one JSON value and fans full snapshots out to
//! every subscriber whose path overlaps a write. The relay server uses it as
//! its state; tests use it directly, with fault injection and a journal of
//! applied writes.

use std::sync::{Arc, Mutex};

use serde_json::{Map, Value};
use tally_core::RemotePath;
use tokio::sync::mpsc;

use super::{RemoteError, RemoteFuture, RemoteResult, RemoteStore, Subscription};

/// A write applied to the tree.
#[derive(Debug, Clone, PartialEq)]
pub enum JournalEntry {
    Set { path: RemotePath, value: Value },
    Remove { path: RemotePath },
}

impl JournalEntry {
    /// The path the write touched.
    pub fn path(&self) -> &RemotePath {
        match self {
            JournalEntry::Set { path, .. } | JournalEntry::Remove { path } => path,
        }
    }
}

/// Shared in-memory remote store. Clones share the same tree.
#[derive(Clone, Default)]
pub struct MemoryRemote {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    tree: Mutex<Tree>,
    faults: Mutex<Faults>,
}

#[derive(Default)]
struct Tree {
    root: Value,
    subscribers: Vec<Subscriber>,
    journal: Vec<JournalEntry>,
}

struct Subscriber {
    path: RemotePath,
    tx: mpsc::UnboundedSender<Value>,
}

#[derive(Default)]
struct Faults {
    fail_next: usize,
    unavailable: bool,
}

impl MemoryRemote {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current value at `path`, `null` when absent.
    pub fn get(&self, path: &RemotePath) -> Value {
        let tree = self.lock_tree();
        get_at(&tree.root, path).cloned().unwrap_or(Value::Null)
    }

    /// Makes the next `n` writes fail with [`RemoteError::Unavailable`].
    pub fn fail_next(&self, n: usize) {
        self.lock_faults().fail_next = n;
    }

    /// Makes every write and subscribe fail until cleared.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.lock_faults().unavailable = unavailable;
    }

    /// Returns every successful write, oldest first.
    pub fn journal(&self) -> Vec<JournalEntry> {
        self.lock_tree().journal.clone()
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        let mut tree = self.lock_tree();
        tree.subscribers.retain(|s| !s.tx.is_closed());
        tree.subscribers.len()
    }

    /// Replaces the value at `path` and notifies overlapping subscribers.
    pub fn apply_set(&self, path: &RemotePath, value: Value) -> RemoteResult<()> {
        self.check_fault()?;
        let mut tree = self.lock_tree();
        if value.is_null() {
            remove_at(&mut tree.root, &path.segments().collect::<Vec<_>>());
            tree.journal.push(JournalEntry::Remove { path: path.clone() });
        } else {
            set_at(&mut tree.root, path, value.clone());
            tree.journal.push(JournalEntry::Set { path: path.clone(), value });
        }
        tree.notify(path);
        Ok(())
    }

    /// Removes `path` and everything below it, then notifies subscribers.
    ///
    /// Removing a missing path succeeds.
    pub fn apply_remove(&self, path: &RemotePath) -> RemoteResult<()> {
        self.check_fault()?;
        let mut tree = self.lock_tree();
        remove_at(&mut tree.root, &path.segments().collect::<Vec<_>>());
        tree.journal.push(JournalEntry::Remove { path: path.clone() });
        tree.notify(path);
        Ok(())
    }

    /// Registers a subscriber and delivers the current snapshot.
    pub fn watch(&self, path: &RemotePath) -> RemoteResult<Subscription> {
        if self.lock_faults().unavailable {
            return Err(RemoteError::Unavailable("remote marked unavailable".into()));
        }
        let (tx, rx) = mpsc::unbounded_channel();
        let mut tree = self.lock_tree();
        let current = get_at(&tree.root, path).cloned().unwrap_or(Value::Null);
        // Receiver is alive, so the send cannot fail.
        let _ = tx.send(current);
        tree.subscribers.push(Subscriber { path: path.clone(), tx });
        Ok(Subscription::new(path.clone(), rx))
    }

    fn check_fault(&self) -> RemoteResult<()> {
        let mut faults = self.lock_faults();
        if faults.unavailable {
            return Err(RemoteError::Unavailable("remote marked unavailable".into()));
        }
        if faults.fail_next > 0 {
            faults.fail_next -= 1;
            return Err(RemoteError::Unavailable("injected failure".into()));
        }
        Ok(())
    }

    fn lock_tree(&self) -> std::sync::MutexGuard<'_, Tree> {
        self.inner.tree.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn lock_faults(&self) -> std::sync::MutexGuard<'_, Faults> {
        self.inner.faults.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Tree {
    /// Sends the current snapshot to every subscriber affected by a write
    /// at `changed`, dropping subscribers whose receiver is gone.
    fn notify(&mut self, changed: &RemotePath) {
        let root = &self.root;
        self.subscribers.retain(|sub| {
            if !sub.path.overlaps(changed) {
                return !sub.tx.is_closed();
            }
            let snapshot = get_at(root, &sub.path).cloned().unwrap_or(Value::Null);
            sub.tx.send(snapshot).is_ok()
        });
    }
}

impl RemoteStore for MemoryRemote {
    fn set(&self, path: &RemotePath, value: Value) -> RemoteFuture<'_, ()> {
        let result = self.apply_set(path, value);
        Box::pin(async move { result })
    }

    fn remove(&self, path: &RemotePath) -> RemoteFuture<'_, ()> {
        let result = self.apply_remove(path);
        Box::pin(async move { result })
    }

    fn subscribe(&self, path: &RemotePath) -> RemoteFuture<'_, Subscription> {
        let result = self.watch(path);
        Box::pin(async move { result })
    }
}

fn get_at<'a>(root: &'a Value, path: &RemotePath) -> Option<&'a Value> {
    let mut node = root;
    for segment in path.segments() {
        node = node.as_object()?.get(segment)?;
    }
    Some(node)
}

fn set_at(root: &mut Value, path: &RemotePath, value: Value) {
    let segments: Vec<&str> = path.segments().collect();
    let Some((last, parents)) = segments.split_last() else {
        return;
    };

    let mut node = root;
    for segment in parents {
        if !node.is_object() {
            *node = Value::Object(Map::new());
        }
        node = match node {
            Value::Object(map) => map
                .entry(segment.to_string())
                .or_insert_with(|| Value::Object(Map::new())),
            _ => return,
        };
    }
    if !node.is_object() {
        *node = Value::Object(Map::new());
    }
    if let Value::Object(map) = node {
        map.insert(last.to_string(), value);
    }
}

/// Removes the node at `segments`, pruning parents left empty.
fn remove_at(node: &mut Value, segments: &[&str]) -> bool {
    let Some((first, rest)) = segments.split_first() else {
        return false;
    };
    let Value::Object(map) = node else {
        return false;
    };
    if rest.is_empty() {
        return map.remove(*first).is_some();
    }

    let removed = match map.get_mut(*first) {
        Some(child) => remove_at(child, rest),
        None => false,
    };
    let now_empty = map
        .get(*first)
        .and_then(Value::as_object)
        .is_some_and(Map::is_empty);
    if removed && now_empty {
        map.remove(*first);
    }
    removed
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
