// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Generic business records.
//!
//! A record is an identified bag of fields plus the two sync stamps,
//! `lastModified` and `originDevice`. On the wire it is a flat JSON object:
//!
//! ```json
//! { "id": "R1", "date": "2026-03-01T00:00:00.000Z", "amount": 42,
//!   "lastModified": "2026-03-01T10:00:00.000Z", "originDevice": "a1b2..." }
//! ```

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::device::DeviceId;
use crate::error::{Error, Result};
use crate::path::validate_segment;
use crate::temporal;
use crate::value::FieldValue;

/// Wire name of the record id.
pub const ID_FIELD: &str = "id";
/// Wire name of the modification stamp.
pub const LAST_MODIFIED_FIELD: &str = "lastModified";
/// Wire name of the authoring device stamp.
pub const ORIGIN_DEVICE_FIELD: &str = "originDevice";

/// An identified, timestamped business record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "Value", try_from = "Value")]
pub struct Record {
    /// Unique within its collection.
    pub id: String,
    /// Domain fields, excluding the id and the sync stamps.
    pub fields: BTreeMap<String, FieldValue>,
    pub last_modified: Option<DateTime<Utc>>,
    pub origin_device: Option<DeviceId>,
}

impl Record {
    /// Creates an empty, unstamped record.
    pub fn new(id: impl Into<String>) -> Self {
        Record {
            id: id.into(),
            fields: BTreeMap::new(),
            last_modified: None,
            origin_device: None,
        }
    }

    /// Builder form of [`Record::set`].
    pub fn with_field(mut self, name: &str, value: impl Into<FieldValue>) -> Self {
        self.set(name, value);
        self
    }

    /// Sets a field.
    ///
    /// The id cannot be changed this way. Values given for the sync stamps
    /// are accepted but overwritten when the record is transmitted.
    pub fn set(&mut self, name: &str, value: impl Into<FieldValue>) {
        let value = value.into();
        match name {
            ID_FIELD => {}
            LAST_MODIFIED_FIELD => {
                self.last_modified = match &value {
                    FieldValue::Timestamp(ts) => Some(*ts),
                    FieldValue::Text(s) => temporal::parse_timestamp(s),
                    _ => None,
                };
            }
            ORIGIN_DEVICE_FIELD => {
                self.origin_device = value.as_str().map(DeviceId::from);
            }
            _ => {
                self.fields.insert(name.to_string(), value);
            }
        }
    }

    /// Returns a domain field.
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Returns a domain field if it holds a decoded timestamp.
    pub fn timestamp(&self, name: &str) -> Option<DateTime<Utc>> {
        self.get(name).and_then(FieldValue::as_timestamp)
    }

    /// Returns true if the record was authored by the given device.
    pub fn is_from(&self, device: &DeviceId) -> bool {
        self.origin_device.as_ref() == Some(device)
    }

    /// Stamps the sync fields, overwriting any caller-supplied values.
    pub fn stamp(&mut self, now: DateTime<Utc>, device: &DeviceId) {
        self.last_modified = Some(now);
        self.origin_device = Some(device.clone());
    }

    /// Returns true once both sync stamps are present.
    pub fn is_stamped(&self) -> bool {
        self.last_modified.is_some() && self.origin_device.is_some()
    }

    /// Normalizes temporal fields for transmission.
    ///
    /// Returns the number of fields that could not be converted.
    pub fn normalize_temporal(&mut self) -> usize {
        temporal::normalize_fields(&mut self.fields)
    }

    /// Checks the id is usable as a remote path segment.
    pub fn validate(&self) -> Result<()> {
        validate_segment(&self.id)
    }

    /// Renders the record as the flat JSON object sent to the remote store.
    pub fn to_wire(&self) -> Value {
        let mut out = Map::new();
        for (name, value) in &self.fields {
            out.insert(name.clone(), value.to_json());
        }
        out.insert(ID_FIELD.to_string(), Value::String(self.id.clone()));
        if let Some(ts) = &self.last_modified {
            out.insert(LAST_MODIFIED_FIELD.to_string(), Value::String(temporal::format_timestamp(ts)));
        }
        if let Some(device) = &self.origin_device {
            out.insert(ORIGIN_DEVICE_FIELD.to_string(), Value::String(device.to_string()));
        }
        Value::Object(out)
    }

    /// Parses a record received from the remote store.
    ///
    /// Temporal fields are decoded; unparseable ones are logged and kept as
    /// received. Fails only if the value is not an object or has no usable id.
    pub fn from_wire(value: Value) -> Result<Self> {
        Self::from_wire_keyed(None, value)
    }

    /// Like [`Record::from_wire`], taking the id from the snapshot key when
    /// the object carries none.
    pub fn from_wire_keyed(key: Option<&str>, value: Value) -> Result<Self> {
        let Value::Object(mut map) = value else {
            return Err(Error::InvalidRecord(format!(
                "expected object{}",
                key.map(|k| format!(" at '{k}'")).unwrap_or_default()
            )));
        };

        let id = match map.remove(ID_FIELD) {
            Some(Value::String(s)) if !s.is_empty() => s,
            Some(Value::Number(n)) => n.to_string(),
            _ => match key {
                Some(k) => k.to_string(),
                None => return Err(Error::InvalidRecord("missing id".to_string())),
            },
        };

        let mut fields: BTreeMap<String, FieldValue> =
            map.into_iter().map(|(k, v)| (k, FieldValue::from_json(v))).collect();
        temporal::decode_fields(&mut fields);

        // Stamps move out of the field map once they decode cleanly. An
        // unparseable stamp stays in the map as received.
        let last_modified = match fields.get(LAST_MODIFIED_FIELD) {
            Some(FieldValue::Timestamp(ts)) => {
                let ts = *ts;
                fields.remove(LAST_MODIFIED_FIELD);
                Some(ts)
            }
            _ => None,
        };
        let origin_device = match fields.get(ORIGIN_DEVICE_FIELD) {
            Some(FieldValue::Text(s)) => {
                let device = DeviceId::from(s.as_str());
                fields.remove(ORIGIN_DEVICE_FIELD);
                Some(device)
            }
            _ => None,
        };

        Ok(Record { id, fields, last_modified, origin_device })
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        record.to_wire()
    }
}

impl TryFrom<Value> for Record {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        Record::from_wire(value)
    }
}

#[cfg(test)]
#[path = "record_tests.rs"]
mod tests;
