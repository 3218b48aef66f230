// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Settings storage backends.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use serde_json::{Map, Value};

use crate::types::MacAddress;

use super::SettingsGroup;

/// Key-value blob storage for the persisted groups.
///
/// Implemented by the hosting application, which usually owns the storage.
/// Calls are synchronous and expected to be cheap.
pub trait SettingsStore {
    /// Returns the stored group, or `None` if it was never saved.
    fn load(&self, mac: &MacAddress, group: SettingsGroup) -> Option<Value>;

    /// Replaces the stored group.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the group could not be written.
    fn save(&self, mac: &MacAddress, group: SettingsGroup, value: Value) -> io::Result<()>;
}

/// In-memory store, for tests and hosts that persist elsewhere.
#[derive(Debug, Default)]
pub struct MemoryStore {
    groups: Mutex<HashMap<(MacAddress, SettingsGroup), Value>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored groups.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.lock().len()
    }

    /// Returns `true` if nothing was stored yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.lock().is_empty()
    }
}

impl SettingsStore for MemoryStore {
    fn load(&self, mac: &MacAddress, group: SettingsGroup) -> Option<Value> {
        self.groups.lock().get(&(mac.clone(), group)).cloned()
    }

    fn save(&self, mac: &MacAddress, group: SettingsGroup, value: Value) -> io::Result<()> {
        self.groups.lock().insert((mac.clone(), group), value);
        Ok(())
    }
}

/// One JSON file per appliance under a directory.
///
/// The file holds the three groups as top-level keys. Each save rewrites the
/// whole file.
#[derive(Debug)]
pub struct JsonFileStore {
    directory: PathBuf,
    // Serializes read-modify-write cycles on the same store.
    lock: Mutex<()>,
}

impl JsonFileStore {
    /// Creates a store writing under `directory`, which must exist.
    #[must_use]
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            lock: Mutex::new(()),
        }
    }

    /// Returns the file used for an appliance.
    #[must_use]
    pub fn path_for(&self, mac: &MacAddress) -> PathBuf {
        let name: String = mac
            .as_str()
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
            .collect();
        self.directory.join(format!("{name}.json"))
    }

    fn read(path: &Path) -> io::Result<Map<String, Value>> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(e),
        };
        match serde_json::from_str(&text)? {
            Value::Object(map) => Ok(map),
            _ => Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "settings file is not a JSON object",
            )),
        }
    }
}

impl SettingsStore for JsonFileStore {
    fn load(&self, mac: &MacAddress, group: SettingsGroup) -> Option<Value> {
        let path = self.path_for(mac);
        let _guard = self.lock.lock();
        match Self::read(&path) {
            Ok(mut map) => map.remove(group.as_str()),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to read settings");
                None
            }
        }
    }

    fn save(&self, mac: &MacAddress, group: SettingsGroup, value: Value) -> io::Result<()> {
        let path = self.path_for(mac);
        let _guard = self.lock.lock();
        let mut map = Self::read(&path)?;
        map.insert(group.as_str().to_string(), value);
        let text = serde_json::to_string_pretty(&Value::Object(map))?;
        fs::write(&path, text)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn mac() -> MacAddress {
        MacAddress::new("aa:bb:cc:dd:ee:ff")
    }

    #[test]
    fn memory_store_round_trip() {
        let store = MemoryStore::new();
        assert!(store.load(&mac(), SettingsGroup::Options).is_none());

        store
            .save(&mac(), SettingsGroup::Options, json!({ "current_program": "eco" }))
            .unwrap();
        assert_eq!(
            store.load(&mac(), SettingsGroup::Options),
            Some(json!({ "current_program": "eco" }))
        );
        assert!(store.load(&mac(), SettingsGroup::Settings).is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn memory_store_groups_are_independent_per_mac() {
        let store = MemoryStore::new();
        let other = MacAddress::new("11:22:33:44:55:66");
        store.save(&mac(), SettingsGroup::Settings, json!({ "a": 1 })).unwrap();
        store.save(&other, SettingsGroup::Settings, json!({ "b": 2 })).unwrap();
        assert_eq!(store.load(&mac(), SettingsGroup::Settings), Some(json!({ "a": 1 })));
        assert_eq!(store.load(&other, SettingsGroup::Settings), Some(json!({ "b": 2 })));
    }

    #[test]
    fn file_store_keeps_groups_side_by_side() {
        let dir = std::env::temp_dir().join(format!("hon_lib_store_{}", uuid::Uuid::new_v4().simple()));
        fs::create_dir_all(&dir).unwrap();
        let store = JsonFileStore::new(&dir);

        assert!(store.load(&mac(), SettingsGroup::Programs).is_none());
        store.save(&mac(), SettingsGroup::Programs, json!({ "eco": {} })).unwrap();
        store
            .save(&mac(), SettingsGroup::Options, json!({ "current_program": "eco" }))
            .unwrap();

        assert_eq!(store.load(&mac(), SettingsGroup::Programs), Some(json!({ "eco": {} })));
        assert_eq!(
            store.load(&mac(), SettingsGroup::Options),
            Some(json!({ "current_program": "eco" }))
        );
        assert!(store.path_for(&mac()).ends_with("aa-bb-cc-dd-ee-ff.json"));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn file_store_reports_corrupt_file_on_save() {
        let dir = std::env::temp_dir().join(format!("hon_lib_store_{}", uuid::Uuid::new_v4().simple()));
        fs::create_dir_all(&dir).unwrap();
        let store = JsonFileStore::new(&dir);
        fs::write(store.path_for(&mac()), "[1, 2]").unwrap();

        assert!(store.load(&mac(), SettingsGroup::Options).is_none());
        assert!(store.save(&mac(), SettingsGroup::Options, json!({})).is_err());

        fs::remove_dir_all(&dir).unwrap();
    }
}
