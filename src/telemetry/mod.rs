// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Telemetry snapshot parsing.
//!
//! The vendor context endpoint returns the appliance "shadow": every
//! reported attribute with its latest value under `parNewVal`, plus the last
//! connectivity event.
//!
//! # Examples
//!
//! ```
//! use hon_lib::telemetry::parse_telemetry;
//!
//! let payload = r#"{
//!     "shadow": {"parameters": {"machMode": {"parNewVal": "2"}, "temp": {"parNewVal": 40}}},
//!     "lastConnEvent": {"category": "CONNECTED"}
//! }"#;
//!
//! let snapshot = parse_telemetry(payload).unwrap();
//! assert_eq!(snapshot.connection_category(), Some("CONNECTED"));
//!
//! let change = snapshot.to_state_change();
//! assert_eq!(change.value_of("temp"), Some("40"));
//! ```

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

use crate::error::ParseError;
use crate::parameter::json_to_string;
use crate::state::{LAST_CONNECTION_EVENT, StateChange};

/// One telemetry fetch.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TelemetrySnapshot {
    /// Reported attributes.
    #[serde(default)]
    pub shadow: Option<Shadow>,
    /// Last connectivity event.
    #[serde(default)]
    pub last_conn_event: Option<ConnectionEvent>,
}

/// The attribute section of a snapshot.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Shadow {
    /// Attributes keyed by telemetry name.
    #[serde(default)]
    pub parameters: BTreeMap<String, ShadowParameter>,
}

/// One reported attribute.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShadowParameter {
    /// Latest value.
    #[serde(default)]
    pub par_new_val: Value,
}

/// A connectivity event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ConnectionEvent {
    /// `CONNECTED` or `DISCONNECTED`.
    #[serde(default)]
    pub category: Option<String>,
}

impl TelemetrySnapshot {
    /// Returns the category of the last connectivity event.
    #[must_use]
    pub fn connection_category(&self) -> Option<&str> {
        self.last_conn_event.as_ref()?.category.as_deref()
    }

    /// Returns `true` if the snapshot reports nothing at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shadow.as_ref().is_none_or(|s| s.parameters.is_empty())
            && self.connection_category().is_none()
    }

    /// Flattens the snapshot into attribute changes.
    ///
    /// Values are stringified the way the appliance reports them. Attributes
    /// whose value is not a scalar are skipped.
    #[must_use]
    pub fn to_state_change(&self) -> StateChange {
        let mut changes = Vec::new();
        if let Some(shadow) = &self.shadow {
            for (key, parameter) in &shadow.parameters {
                match json_to_string(&parameter.par_new_val) {
                    Some(value) => changes.push(StateChange::attribute(key.clone(), value)),
                    None => tracing::trace!(key = %key, "Skipping non-scalar telemetry value"),
                }
            }
        }
        if let Some(category) = self.connection_category() {
            changes.push(StateChange::attribute(LAST_CONNECTION_EVENT, category));
        }
        StateChange::Batch(changes)
    }
}

/// Parses a telemetry payload.
///
/// # Errors
///
/// Returns [`ParseError::Json`] if the payload is not valid JSON or does not
/// have the snapshot shape.
pub fn parse_telemetry(payload: &str) -> Result<TelemetrySnapshot, ParseError> {
    Ok(serde_json::from_str(payload)?)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn empty_object_is_an_empty_snapshot() {
        let snapshot = parse_telemetry("{}").unwrap();
        assert!(snapshot.is_empty());
        assert!(snapshot.to_state_change().is_empty());
    }

    #[test]
    fn values_are_stringified() {
        let snapshot: TelemetrySnapshot = serde_json::from_value(json!({
            "shadow": { "parameters": {
                "machMode": { "parNewVal": "2", "lastUpdate": "2024-01-01T10:00:00Z" },
                "remainingTimeMM": { "parNewVal": 35 },
                "nested": { "parNewVal": { "a": 1 } }
            }},
            "lastConnEvent": { "category": "DISCONNECTED", "instantTime": "x" }
        }))
        .unwrap();

        let change = snapshot.to_state_change();
        assert_eq!(change.value_of("machMode"), Some("2"));
        assert_eq!(change.value_of("remainingTimeMM"), Some("35"));
        assert_eq!(change.value_of("nested"), None);
        assert_eq!(change.value_of("lastConnEvent"), Some("DISCONNECTED"));
        assert_eq!(change.len(), 3);
    }

    #[test]
    fn invalid_json_is_an_error() {
        assert!(matches!(parse_telemetry("not json"), Err(ParseError::Json(_))));
    }
}
