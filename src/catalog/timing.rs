// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Program duration estimation.
//!
//! The vendor attaches a `remainingTimes` table to some programs. Each entry
//! is keyed by a parameter name and tells how many minutes the parameter's
//! current value adds to the cycle. Three shapes occur:
//!
//! - direct (`dirtyLevel`, `dryLevel`, `dryTime`): `{code: minutes}`
//! - steam level: `{code: {phase: minutes}}`, phases summed
//! - everything else: `{phase: {code: minutes}}`, phases summed
//!
//! Every lookup falls back to a `"default"` entry. A value that is still
//! missing is logged and contributes nothing.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::types::EstimatedDuration;

/// Options whose table is indexed directly by the option value.
const DIRECT_OPTIONS: [&str; 3] = ["dirtyLevel", "dryLevel", "dryTime"];

/// Option whose table nests the phase buckets under each value.
const STEAM_LEVEL: &str = "steamLevel";

/// Fallback entry used when a code is absent from a table.
const DEFAULT_ENTRY: &str = "default";

/// Duration table of one program, stored exactly as the vendor sent it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimingTable(Map<String, Value>);

impl TimingTable {
    /// Wraps a vendor `remainingTimes` object.
    #[must_use]
    pub fn new(table: Map<String, Value>) -> Self {
        Self(table)
    }

    /// Returns `true` if the table has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns `true` if `option` contributes to the estimate.
    #[must_use]
    pub fn covers(&self, option: &str) -> bool {
        self.0.contains_key(option)
    }

    /// Sums the minutes contributed by each `(option, current value)` pair.
    ///
    /// Options without an entry in the table are ignored.
    ///
    /// # Examples
    ///
    /// ```
    /// use hon_lib::catalog::TimingTable;
    ///
    /// let table: TimingTable = serde_json::from_value(serde_json::json!({
    ///     "dryLevel": {"3": 45, "default": 30}
    /// }))
    /// .unwrap();
    ///
    /// assert_eq!(table.estimate([("dryLevel", "3")]).to_string(), "45 min");
    /// assert_eq!(table.estimate([("dryLevel", "9")]).to_string(), "30 min");
    /// ```
    #[must_use]
    pub fn estimate<'a, I>(&self, values: I) -> EstimatedDuration
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let total = values
            .into_iter()
            .filter_map(|(option, code)| {
                self.0
                    .get(option)
                    .map(|table| contribution(option, table, code))
            })
            .fold(0u32, u32::saturating_add);
        EstimatedDuration::from_minutes(total)
    }
}

/// Minutes added by one option.
fn contribution(option: &str, table: &Value, code: &str) -> u32 {
    let Some(table) = table.as_object() else {
        tracing::warn!(option, "Timing entry is not an object");
        return 0;
    };

    if DIRECT_OPTIONS.contains(&option) {
        return lookup(table, code)
            .and_then(minutes)
            .unwrap_or_else(|| missing(option, code, None));
    }

    if option == STEAM_LEVEL {
        return match lookup(table, code).and_then(Value::as_object) {
            Some(buckets) => buckets
                .iter()
                .map(|(bucket, v)| minutes(v).unwrap_or_else(|| missing(option, code, Some(bucket.as_str()))))
                .fold(0, u32::saturating_add),
            None => missing(option, code, None),
        };
    }

    table
        .iter()
        .map(|(bucket, codes)| {
            codes
                .as_object()
                .and_then(|codes| lookup(codes, code))
                .and_then(minutes)
                .unwrap_or_else(|| missing(option, code, Some(bucket.as_str())))
        })
        .fold(0, u32::saturating_add)
}

fn lookup<'a>(table: &'a Map<String, Value>, code: &str) -> Option<&'a Value> {
    table.get(code).or_else(|| table.get(DEFAULT_ENTRY))
}

/// Reads a minute count sent either as a number or as a numeric string.
fn minutes(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|m| u32::try_from(m).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn missing(option: &str, code: &str, bucket: Option<&str>) -> u32 {
    tracing::warn!(option, code, bucket, "No timing entry, counting zero minutes");
    0
}
