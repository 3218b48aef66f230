// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Broadcast of appliance events.

use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};

use crate::types::MacAddress;

use super::DeviceEvent;

/// Events buffered per subscriber before the oldest are dropped.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// Fan-out of [`DeviceEvent`]s.
///
/// A connection creates one bus and hands clones to its appliances, so a
/// single subscriber sees the whole account. Publishing never fails and
/// never blocks: without subscribers the event is dropped, and a subscriber
/// that falls more than the capacity behind gets `RecvError::Lagged`.
///
/// # Examples
///
/// ```
/// use hon_lib::event::{DeviceEvent, EventBus};
/// use hon_lib::notification::Notification;
/// use hon_lib::types::MacAddress;
///
/// let bus = EventBus::new();
/// let mut all = bus.subscribe();
/// let mut washer = bus.subscribe_appliance(MacAddress::new("aa"));
///
/// bus.publish(DeviceEvent::notification(MacAddress::new("bb"), Notification::CycleFinished));
/// bus.publish(DeviceEvent::notification(MacAddress::new("aa"), Notification::LowDetergent));
///
/// assert_eq!(all.try_recv().unwrap().mac().as_str(), "bb");
/// assert_eq!(
///     washer.try_recv().unwrap().as_notification(),
///     Some(Notification::LowDetergent)
/// );
/// ```
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<DeviceEvent>,
}

impl EventBus {
    /// Creates a bus with [`DEFAULT_CHANNEL_CAPACITY`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Creates a bus buffering `capacity` events per subscriber.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribes to every event published from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<DeviceEvent> {
        self.sender.subscribe()
    }

    /// Subscribes to the events of one appliance.
    #[must_use]
    pub fn subscribe_appliance(&self, mac: MacAddress) -> ApplianceEvents {
        ApplianceEvents {
            mac,
            receiver: self.sender.subscribe(),
        }
    }

    /// Returns the number of live subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Publishes an event.
    pub fn publish(&self, event: DeviceEvent) {
        if self.sender.send(event).is_err() {
            tracing::trace!("Event dropped, no subscriber");
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Receiver that only yields the events of one appliance.
#[derive(Debug)]
pub struct ApplianceEvents {
    mac: MacAddress,
    receiver: broadcast::Receiver<DeviceEvent>,
}

impl ApplianceEvents {
    /// Returns the appliance this receiver follows.
    #[must_use]
    pub fn mac(&self) -> &MacAddress {
        &self.mac
    }

    /// Waits for the next event of the appliance.
    ///
    /// # Errors
    ///
    /// Same as [`broadcast::Receiver::recv`].
    pub async fn recv(&mut self) -> Result<DeviceEvent, RecvError> {
        loop {
            let event = self.receiver.recv().await?;
            if event.mac() == &self.mac {
                return Ok(event);
            }
        }
    }

    /// Returns the next buffered event of the appliance, if any.
    ///
    /// # Errors
    ///
    /// Same as [`broadcast::Receiver::try_recv`].
    pub fn try_recv(&mut self) -> Result<DeviceEvent, TryRecvError> {
        loop {
            let event = self.receiver.try_recv()?;
            if event.mac() == &self.mac {
                return Ok(event);
            }
        }
    }
}
