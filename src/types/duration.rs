// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Duration rendering for program estimates and remaining time.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A duration in whole minutes, displayed the way the appliance UI does.
///
/// Durations of an hour or more render as `H:MM`, shorter ones as `N min`.
///
/// # Examples
///
/// ```
/// use hon_lib::types::EstimatedDuration;
///
/// assert_eq!(EstimatedDuration::from_minutes(45).to_string(), "45 min");
/// assert_eq!(EstimatedDuration::from_minutes(65).to_string(), "1:05");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct EstimatedDuration(u32);

impl EstimatedDuration {
    /// Creates a duration from minutes.
    #[must_use]
    pub const fn from_minutes(minutes: u32) -> Self {
        Self(minutes)
    }

    /// Returns the total number of minutes.
    #[must_use]
    pub const fn minutes(&self) -> u32 {
        self.0
    }

    /// Returns the duration as a `chrono` time delta.
    #[must_use]
    pub fn as_time_delta(&self) -> chrono::TimeDelta {
        chrono::TimeDelta::minutes(i64::from(self.0))
    }
}

impl fmt::Display for EstimatedDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 >= 60 {
            write!(f, "{}:{:02}", self.0 / 60, self.0 % 60)
        } else {
            write!(f, "{} min", self.0)
        }
    }
}

impl From<u32> for EstimatedDuration {
    fn from(minutes: u32) -> Self {
        Self(minutes)
    }
}
