// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Appliance event types.

use serde::Serialize;

use crate::notification::Notification;
use crate::state::{DeviceState, StateChange};
use crate::types::MacAddress;

/// Events emitted by appliances and the connection.
///
/// Every event carries the MAC address of the appliance it concerns, so a
/// single subscriber can serve a whole account.
///
/// # Examples
///
/// ```
/// use hon_lib::event::DeviceEvent;
/// use hon_lib::notification::Notification;
/// use hon_lib::types::MacAddress;
///
/// let mac = MacAddress::new("aa-bb-cc-dd-ee-ff");
///
/// let added = DeviceEvent::ApplianceAdded { mac: mac.clone() };
/// let finished = DeviceEvent::notification(mac.clone(), Notification::CycleFinished);
///
/// assert_eq!(finished.mac(), &mac);
/// assert!(finished.is_notification());
/// assert!(!added.is_notification());
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum DeviceEvent {
    /// An appliance was registered on the connection.
    ApplianceAdded {
        /// The appliance.
        mac: MacAddress,
    },

    /// Telemetry or an optimistic command update changed the state.
    StateChanged {
        /// The appliance.
        mac: MacAddress,
        /// The change that was applied.
        change: StateChange,
        /// The complete new state.
        new_state: DeviceState,
    },

    /// A program parameter or a cross-program setting was written.
    ParameterChanged {
        /// The appliance.
        mac: MacAddress,
        /// The parameter key.
        key: String,
        /// The new value.
        value: String,
    },

    /// Another program was selected.
    ProgramSelected {
        /// The appliance.
        mac: MacAddress,
        /// The selected program key.
        program: String,
    },

    /// The program catalog was rebuilt from vendor metadata.
    CatalogRefreshed {
        /// The appliance.
        mac: MacAddress,
        /// Program keys in catalog order.
        programs: Vec<String>,
    },

    /// A message for the user.
    Notification {
        /// The appliance.
        mac: MacAddress,
        /// What to tell the user.
        notification: Notification,
    },
}

impl DeviceEvent {
    /// Returns the appliance this event concerns.
    #[must_use]
    pub fn mac(&self) -> &MacAddress {
        match self {
            Self::ApplianceAdded { mac }
            | Self::StateChanged { mac, .. }
            | Self::ParameterChanged { mac, .. }
            | Self::ProgramSelected { mac, .. }
            | Self::CatalogRefreshed { mac, .. }
            | Self::Notification { mac, .. } => mac,
        }
    }

    /// Returns `true` if this is a state change event.
    #[must_use]
    pub fn is_state_change(&self) -> bool {
        matches!(self, Self::StateChanged { .. })
    }

    /// Returns `true` if this is a user notification.
    #[must_use]
    pub fn is_notification(&self) -> bool {
        matches!(self, Self::Notification { .. })
    }

    /// Returns the notification carried by this event, if any.
    #[must_use]
    pub fn as_notification(&self) -> Option<Notification> {
        match self {
            Self::Notification { notification, .. } => Some(*notification),
            _ => None,
        }
    }

    /// Creates a state changed event.
    #[must_use]
    pub fn state_changed(mac: MacAddress, change: StateChange, new_state: DeviceState) -> Self {
        Self::StateChanged {
            mac,
            change,
            new_state,
        }
    }

    /// Creates a parameter changed event.
    #[must_use]
    pub fn parameter_changed(
        mac: MacAddress,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self::ParameterChanged {
            mac,
            key: key.into(),
            value: value.into(),
        }
    }

    /// Creates a notification event.
    #[must_use]
    pub fn notification(mac: MacAddress, notification: Notification) -> Self {
        Self::Notification { mac, notification }
    }
}
