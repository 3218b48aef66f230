// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Event system for appliance changes and user notifications.
//!
//! This module provides a pub/sub event system for notifying subscribers about
//! appliance changes. The [`EventBus`] uses tokio's broadcast channel to
//! allow multiple subscribers to receive events. Publishing never blocks and
//! never fails back into the publisher.
//!
//! # Examples
//!
//! ```
//! use hon_lib::event::{DeviceEvent, EventBus};
//! use hon_lib::types::MacAddress;
//!
//! let bus = EventBus::new();
//!
//! // Subscribe to events
//! let mut rx = bus.subscribe();
//!
//! // Publish an event
//! bus.publish(DeviceEvent::ApplianceAdded {
//!     mac: MacAddress::new("aa-bb-cc-dd-ee-ff"),
//! });
//! ```

mod device_event;
mod event_bus;

pub use device_event::DeviceEvent;
pub use event_bus::{ApplianceEvents, DEFAULT_CHANNEL_CAPACITY, EventBus};
