// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Connection configuration.

use std::time::Duration;

use crate::types::ApplianceType;

/// Configuration of a [`Connection`](super::Connection).
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use hon_lib::manager::ConnectionConfig;
/// use hon_lib::types::ApplianceType;
///
/// // Default configuration (30 s polling, washers and dryers)
/// let config = ConnectionConfig::default();
///
/// // Washers only, polled every minute
/// let config = ConnectionConfig::new()
///     .with_poll_interval(Duration::from_secs(60))
///     .with_appliance_types([ApplianceType::WashingMachine]);
/// assert!(!config.accepts(ApplianceType::TumbleDryer));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    poll_interval: Duration,
    appliance_types: Vec<ApplianceType>,
}

impl ConnectionConfig {
    /// Default telemetry poll interval.
    pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

    /// Creates a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            poll_interval: Self::DEFAULT_POLL_INTERVAL,
            appliance_types: vec![ApplianceType::WashingMachine, ApplianceType::TumbleDryer],
        }
    }

    /// Sets the poll interval.
    #[must_use]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Restricts the appliance types that get registered.
    #[must_use]
    pub fn with_appliance_types(mut self, types: impl IntoIterator<Item = ApplianceType>) -> Self {
        self.appliance_types = types.into_iter().collect();
        self
    }

    /// Returns the poll interval.
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Returns the appliance types that get registered.
    #[must_use]
    pub fn appliance_types(&self) -> &[ApplianceType] {
        &self.appliance_types
    }

    /// Returns `true` if appliances of this type get registered.
    #[must_use]
    pub fn accepts(&self, appliance_type: ApplianceType) -> bool {
        self.appliance_types.contains(&appliance_type)
    }
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self::new()
    }
}
