// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! State change representation.
//!
//! State changes are the building blocks for updating
//! [`DeviceState`](super::DeviceState), either from a telemetry fetch or from
//! the optimistic update that follows a confirmed command.
//!
//! # Examples
//!
//! ```
//! use hon_lib::state::{DeviceState, StateChange};
//! use hon_lib::types::ApplianceType;
//!
//! let mut state = DeviceState::new(ApplianceType::TumbleDryer);
//!
//! // Apply returns true if the state actually changed
//! assert!(state.apply(&StateChange::attribute("dryLevel", "3")));
//! assert!(!state.apply(&StateChange::attribute("dryLevel", "3")));
//! ```

use serde::{Deserialize, Serialize};

use crate::types::MachineMode;

use super::MACHINE_MODE;

/// A change in appliance state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StateChange {
    /// One raw attribute changed.
    Attribute {
        /// Telemetry key.
        key: String,
        /// New raw value.
        value: String,
    },

    /// Multiple changes at once, as returned by one telemetry fetch.
    Batch(Vec<StateChange>),
}

impl StateChange {
    /// Creates an attribute change.
    #[must_use]
    pub fn attribute(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Attribute {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Creates a machine mode change.
    #[must_use]
    pub fn machine_mode(mode: MachineMode) -> Self {
        Self::attribute(MACHINE_MODE, mode.code())
    }

    /// Creates a batch from `(key, value)` pairs.
    #[must_use]
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self::Batch(
            pairs
                .into_iter()
                .map(|(k, v)| Self::attribute(k, v))
                .collect(),
        )
    }

    /// Returns `true` if this is a batch change.
    #[must_use]
    pub fn is_batch(&self) -> bool {
        matches!(self, Self::Batch(_))
    }

    /// Returns the number of attribute changes, flattening batches.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Attribute { .. } => 1,
            Self::Batch(changes) => changes.iter().map(Self::len).sum(),
        }
    }

    /// Returns `true` for an empty batch.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the value this change assigns to `key`, the last one winning.
    #[must_use]
    pub fn value_of(&self, key: &str) -> Option<&str> {
        match self {
            Self::Attribute { key: k, value } => (k == key).then_some(value.as_str()),
            Self::Batch(changes) => changes.iter().rev().find_map(|c| c.value_of(key)),
        }
    }
}
