// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Record collections known to the sync engine.
//!
//! Each collection maps to a top-level node in the remote store. The engine
//! treats every collection the same way; the variant only fixes the path
//! segment and rejects unknown names at the boundary.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// A named collection of business records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    /// Customers and their contact details.
    Clients,
    /// Issued receipts.
    Receipts,
    /// Recorded expenses.
    Expenses,
    /// Uploaded documents (metadata only).
    Documents,
    /// Staff records.
    Employees,
}

impl Collection {
    /// All collections, in display order.
    pub const ALL: [Collection; 5] = [
        Collection::Clients,
        Collection::Receipts,
        Collection::Expenses,
        Collection::Documents,
        Collection::Employees,
    ];

    /// Returns the remote path segment for this collection.
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Clients => "clients",
            Collection::Receipts => "receipts",
            Collection::Expenses => "expenses",
            Collection::Documents => "documents",
            Collection::Employees => "employees",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Collection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "clients" => Ok(Collection::Clients),
            "receipts" => Ok(Collection::Receipts),
            "expenses" => Ok(Collection::Expenses),
            "documents" => Ok(Collection::Documents),
            "employees" => Ok(Collection::Employees),
            _ => Err(Error::UnknownCollection(s.to_string())),
        }
    }
}

#[cfg(test)]
#[path = "collection_tests.rs"]
mod tests;
