// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Appliances registered on a connection, keyed by MAC address.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};

use crate::device::Appliance;
use crate::types::MacAddress;

/// An appliance shared between the poller and command handlers.
///
/// The mutex serializes polling, parameter writes and commands on one
/// appliance.
pub type SharedAppliance<T> = Arc<Mutex<Appliance<T>>>;

/// Registry of appliances, owned by a [`Connection`](super::Connection).
#[derive(Debug)]
pub struct ApplianceRegistry<T> {
    appliances: RwLock<HashMap<MacAddress, SharedAppliance<T>>>,
}

impl<T> Default for ApplianceRegistry<T> {
    fn default() -> Self {
        Self {
            appliances: RwLock::new(HashMap::new()),
        }
    }
}

impl<T> ApplianceRegistry<T> {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an appliance under its MAC address and returns the shared
    /// handle. An appliance already registered under that address is
    /// replaced.
    pub async fn insert(&self, appliance: Appliance<T>) -> SharedAppliance<T> {
        let mac = appliance.mac().clone();
        let shared = Arc::new(Mutex::new(appliance));
        if self
            .appliances
            .write()
            .await
            .insert(mac.clone(), Arc::clone(&shared))
            .is_some()
        {
            tracing::debug!(mac = %mac, "Replaced registered appliance");
        }
        shared
    }

    /// Returns the appliance registered under `mac`.
    pub async fn get(&self, mac: &MacAddress) -> Option<SharedAppliance<T>> {
        self.appliances.read().await.get(mac).cloned()
    }

    /// Removes an appliance.
    pub async fn remove(&self, mac: &MacAddress) -> Option<SharedAppliance<T>> {
        self.appliances.write().await.remove(mac)
    }

    /// Returns `true` if an appliance is registered under `mac`.
    pub async fn contains(&self, mac: &MacAddress) -> bool {
        self.appliances.read().await.contains_key(mac)
    }

    /// Returns the registered MAC addresses, sorted.
    pub async fn macs(&self) -> Vec<MacAddress> {
        let mut macs: Vec<_> = self.appliances.read().await.keys().cloned().collect();
        macs.sort();
        macs
    }

    /// Returns every registered appliance.
    pub async fn all(&self) -> Vec<SharedAppliance<T>> {
        self.appliances.read().await.values().cloned().collect()
    }

    /// Returns the number of registered appliances.
    pub async fn len(&self) -> usize {
        self.appliances.read().await.len()
    }

    /// Returns `true` if no appliance is registered.
    pub async fn is_empty(&self) -> bool {
        self.appliances.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::ApplianceIdentity;
    use crate::device::testing::FakeTransport;
    use crate::settings::MemoryStore;
    use crate::types::ApplianceType;

    fn appliance(mac: &str) -> Appliance<FakeTransport> {
        Appliance::new(
            ApplianceIdentity::new(mac, ApplianceType::TumbleDryer),
            Arc::new(FakeTransport::default()),
            Arc::new(MemoryStore::new()),
        )
    }

    #[tokio::test]
    async fn insert_and_lookup() {
        let registry = ApplianceRegistry::new();
        assert!(registry.is_empty().await);

        registry.insert(appliance("bb")).await;
        registry.insert(appliance("aa")).await;

        assert_eq!(registry.len().await, 2);
        assert_eq!(
            registry.macs().await,
            vec![MacAddress::new("aa"), MacAddress::new("bb")]
        );
        let found = registry.get(&MacAddress::new("aa")).await.unwrap();
        assert_eq!(found.lock().await.mac().as_str(), "aa");
        assert!(registry.get(&MacAddress::new("cc")).await.is_none());
    }

    #[tokio::test]
    async fn insert_replaces_same_mac() {
        let registry = ApplianceRegistry::new();
        registry.insert(appliance("aa")).await;
        registry.insert(appliance("aa")).await;
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test]
    async fn remove() {
        let registry = ApplianceRegistry::new();
        registry.insert(appliance("aa")).await;
        assert!(registry.remove(&MacAddress::new("aa")).await.is_some());
        assert!(!registry.contains(&MacAddress::new("aa")).await);
    }
}
