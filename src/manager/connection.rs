// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Account connection: login, discovery and polling.

use std::fmt;
use std::sync::Arc;

use tokio::sync::broadcast;

use crate::catalog::NoTranslation;
use crate::device::{Appliance, SharedStore, SharedTranslator, filter_directory};
use crate::error::Error;
use crate::event::{DeviceEvent, EventBus};
use crate::protocol::Transport;
use crate::types::MacAddress;

use super::{ApplianceRegistry, ConnectionConfig, SharedAppliance};

/// One vendor account and the appliances registered on it.
///
/// The connection owns the transport session, the registry and an event bus
/// shared by all its appliances.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
///
/// use hon_lib::manager::{Connection, ConnectionConfig};
/// use hon_lib::protocol::HttpConfig;
/// use hon_lib::settings::JsonFileStore;
///
/// #[tokio::main]
/// async fn main() -> hon_lib::Result<()> {
///     let transport = HttpConfig::new("id-token").into_client()?;
///     let store = Arc::new(JsonFileStore::new("/var/lib/hon"));
///     let connection = Connection::new(transport, store, ConnectionConfig::default());
///
///     let mut events = connection.subscribe();
///     tokio::spawn(async move {
///         while let Ok(event) = events.recv().await {
///             println!("{event:?}");
///         }
///     });
///
///     connection.connect().await?;
///
///     let mut interval = tokio::time::interval(connection.config().poll_interval());
///     loop {
///         interval.tick().await;
///         connection.poll().await;
///     }
/// }
/// ```
pub struct Connection<T> {
    transport: Arc<T>,
    store: SharedStore,
    translator: SharedTranslator,
    config: ConnectionConfig,
    registry: ApplianceRegistry<T>,
    events: EventBus,
}

impl<T: fmt::Debug> fmt::Debug for Connection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("transport", &self.transport)
            .field("config", &self.config)
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

impl<T: Transport> Connection<T> {
    /// Creates a connection. Nothing is sent until [`connect`](Self::connect).
    #[must_use]
    pub fn new(transport: T, store: SharedStore, config: ConnectionConfig) -> Self {
        Self {
            transport: Arc::new(transport),
            store,
            translator: Arc::new(NoTranslation),
            config,
            registry: ApplianceRegistry::new(),
            events: EventBus::new(),
        }
    }

    /// Uses `translator` for program descriptions.
    #[must_use]
    pub fn with_translator(mut self, translator: SharedTranslator) -> Self {
        self.translator = translator;
        self
    }

    /// Logs in and registers every supported appliance of the account.
    ///
    /// Each appliance gets its catalog and a first telemetry snapshot before
    /// it is announced with [`DeviceEvent::ApplianceAdded`]. A failure for one
    /// appliance is logged and does not stop the others.
    ///
    /// Returns the number of appliances registered.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Protocol`] if the login or the appliance listing
    /// fails.
    pub async fn connect(&self) -> Result<usize, Error> {
        self.transport.authenticate().await?;
        let entries = self.transport.fetch_appliances().await?;

        let identities: Vec<_> = filter_directory(&entries)
            .into_iter()
            .filter(|id| self.config.accepts(id.appliance_type()))
            .collect();
        tracing::debug!(
            listed = entries.len(),
            supported = identities.len(),
            "Appliance directory read"
        );

        let mut added = 0;
        for identity in identities {
            let mac = identity.mac().clone();
            let mut appliance =
                Appliance::new(identity, Arc::clone(&self.transport), Arc::clone(&self.store))
                    .with_translator(Arc::clone(&self.translator))
                    .with_event_bus(self.events.clone());

            if !appliance.get_programs().await {
                tracing::warn!(mac = %mac, "Registering appliance with its persisted catalog");
            }
            appliance.update_telemetry().await;

            self.registry.insert(appliance).await;
            self.events.publish(DeviceEvent::ApplianceAdded { mac });
            added += 1;
        }
        Ok(added)
    }

    /// Fetches telemetry for every registered appliance.
    ///
    /// Returns the number of appliances refreshed successfully.
    pub async fn poll(&self) -> usize {
        let mut refreshed = 0;
        for appliance in self.registry.all().await {
            if appliance.lock().await.update_telemetry().await {
                refreshed += 1;
            }
        }
        refreshed
    }

    /// Returns the appliance registered under `mac`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ApplianceNotFound`] if no such appliance is
    /// registered.
    pub async fn appliance(&self, mac: &MacAddress) -> Result<SharedAppliance<T>, Error> {
        self.registry
            .get(mac)
            .await
            .ok_or_else(|| Error::ApplianceNotFound(mac.to_string()))
    }
}

impl<T> Connection<T> {
    /// Returns the registry.
    #[must_use]
    pub fn registry(&self) -> &ApplianceRegistry<T> {
        &self.registry
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    /// Returns the transport.
    #[must_use]
    pub fn transport(&self) -> &Arc<T> {
        &self.transport
    }

    /// Subscribes to the events of every appliance on this connection.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<DeviceEvent> {
        self.events.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::device::testing::{FakeTransport, washer_metadata};
    use crate::settings::MemoryStore;
    use crate::types::ApplianceType;

    fn transport() -> FakeTransport {
        let transport = FakeTransport::default();
        *transport.appliances.lock() = vec![
            json!({ "macAddress": "aa", "applianceTypeId": 1, "applianceTypeName": "WM" }),
            json!({ "macAddress": "bb", "applianceTypeId": 8, "applianceTypeName": "TD" }),
            json!({ "macAddress": "cc", "applianceTypeId": 4, "applianceTypeName": "OV" }),
            json!({ "applianceTypeId": 1, "applianceTypeName": "WM" }),
        ];
        *transport.capabilities.lock() = washer_metadata();
        transport.push_telemetry(&[("machMode", "1"), ("remoteCtrValid", "1")]);
        transport
    }

    #[tokio::test]
    async fn connect_registers_supported_appliances() {
        let connection = Connection::new(
            transport(),
            Arc::new(MemoryStore::new()),
            ConnectionConfig::default(),
        );
        let mut events = connection.subscribe();

        assert_eq!(connection.connect().await.unwrap(), 2);
        assert_eq!(
            connection.registry().macs().await,
            vec![MacAddress::new("aa"), MacAddress::new("bb")]
        );

        let washer = connection.appliance(&MacAddress::new("aa")).await.unwrap();
        let washer = washer.lock().await;
        assert_eq!(washer.current_program_name(), Some("cotton"));
        assert!(washer.is_on());

        let added: Vec<_> = std::iter::from_fn(|| events.try_recv().ok())
            .filter(|e| matches!(e, DeviceEvent::ApplianceAdded { .. }))
            .map(|e| e.mac().clone())
            .collect();
        assert_eq!(added, vec![MacAddress::new("aa"), MacAddress::new("bb")]);
    }

    #[tokio::test]
    async fn type_filter_applies() {
        let config = ConnectionConfig::new().with_appliance_types([ApplianceType::TumbleDryer]);
        let connection = Connection::new(transport(), Arc::new(MemoryStore::new()), config);
        assert_eq!(connection.connect().await.unwrap(), 1);
        assert!(connection.registry().contains(&MacAddress::new("bb")).await);
    }

    #[tokio::test]
    async fn login_failure_is_an_error() {
        let transport = transport();
        *transport.offline.lock() = true;
        let connection = Connection::new(
            transport,
            Arc::new(MemoryStore::new()),
            ConnectionConfig::default(),
        );
        assert!(matches!(connection.connect().await, Err(Error::Protocol(_))));
        assert!(connection.registry().is_empty().await);
    }

    #[tokio::test]
    async fn unknown_appliance() {
        let connection = Connection::new(
            transport(),
            Arc::new(MemoryStore::new()),
            ConnectionConfig::default(),
        );
        let err = connection.appliance(&MacAddress::new("zz")).await.unwrap_err();
        assert!(matches!(err, Error::ApplianceNotFound(ref mac) if mac == "zz"));
    }

    #[tokio::test]
    async fn poll_counts_successes() {
        let connection = Connection::new(
            transport(),
            Arc::new(MemoryStore::new()),
            ConnectionConfig::default(),
        );
        connection.connect().await.unwrap();
        // The only queued snapshot went to the first appliance.
        connection.transport().push_telemetry(&[("machMode", "2")]);
        assert_eq!(connection.poll().await, 1);
    }
}
