// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-memory transport and fixtures for the facade unit tests.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::{Value, json};

use crate::error::ProtocolError;
use crate::protocol::{CommandRequest, Transport};
use crate::settings::MemoryStore;
use crate::telemetry::TelemetrySnapshot;
use crate::types::ApplianceType;

use super::{Appliance, ApplianceIdentity};

#[derive(Debug, Default)]
pub(crate) struct FakeTransport {
    pub appliances: Mutex<Vec<Value>>,
    pub capabilities: Mutex<Value>,
    pub telemetry: Mutex<VecDeque<TelemetrySnapshot>>,
    pub commands: Mutex<Vec<CommandRequest>>,
    pub offline: Mutex<bool>,
    pub reject_commands: Mutex<bool>,
}

impl FakeTransport {
    pub fn push_telemetry(&self, pairs: &[(&str, &str)]) {
        let parameters: serde_json::Map<String, Value> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), json!({ "parNewVal": v })))
            .collect();
        let snapshot = serde_json::from_value(json!({
            "shadow": { "parameters": parameters },
            "lastConnEvent": { "category": "CONNECTED" }
        }))
        .unwrap();
        self.telemetry.lock().push_back(snapshot);
    }

    pub fn sent(&self) -> Vec<CommandRequest> {
        self.commands.lock().clone()
    }
}

impl Transport for FakeTransport {
    async fn authenticate(&self) -> Result<(), ProtocolError> {
        if *self.offline.lock() {
            return Err(ProtocolError::AuthenticationFailed);
        }
        Ok(())
    }

    async fn fetch_appliances(&self) -> Result<Vec<Value>, ProtocolError> {
        Ok(self.appliances.lock().clone())
    }

    async fn fetch_capabilities(
        &self,
        _appliance: &ApplianceIdentity,
    ) -> Result<Value, ProtocolError> {
        if *self.offline.lock() {
            return Err(ProtocolError::UnexpectedStatus(503));
        }
        Ok(self.capabilities.lock().clone())
    }

    async fn fetch_telemetry(
        &self,
        _appliance: &ApplianceIdentity,
    ) -> Result<TelemetrySnapshot, ProtocolError> {
        if *self.offline.lock() {
            return Err(ProtocolError::UnexpectedStatus(503));
        }
        self.telemetry
            .lock()
            .pop_front()
            .ok_or(ProtocolError::UnexpectedStatus(404))
    }

    async fn send_command(
        &self,
        _appliance: &ApplianceIdentity,
        command: &CommandRequest,
    ) -> Result<(), ProtocolError> {
        if *self.offline.lock() {
            return Err(ProtocolError::Rejected("offline".to_string()));
        }
        if *self.reject_commands.lock() {
            return Err(ProtocolError::Rejected("3".to_string()));
        }
        self.commands.lock().push(command.clone());
        Ok(())
    }
}

fn switch(default: &str) -> Value {
    json!({
        "typology": "range",
        "minimumValue": "0",
        "maximumValue": "1",
        "incrementValue": "1",
        "defaultValue": default,
    })
}

/// Capability metadata of a washer with two programs.
pub(crate) fn washer_metadata() -> Value {
    json!({
        "startProgram": {
            "PROGRAMS.WM_WD.COTTON": {
                "description": "Cotton",
                "parameters": {
                    "temp": { "typology": "enum", "enumValues": ["20", "40", "60"], "defaultValue": "40" },
                    "spinSpeed": {
                        "typology": "range",
                        "minimumValue": "400",
                        "maximumValue": "1400",
                        "incrementValue": "200",
                        "defaultValue": "1000"
                    },
                    "prewash": switch("0"),
                    "autoDetergentStatus": switch("1"),
                    "autoSoftenerStatus": switch("1"),
                    "prCode": { "typology": "fixed", "mandatory": 1, "fixedValue": "12" },
                    "delayTime": {
                        "typology": "range",
                        "minimumValue": "0",
                        "maximumValue": "1440",
                        "incrementValue": "30",
                        "defaultValue": "0"
                    },
                    "lang": { "typology": "enum", "enumValues": ["0", "1", "2"], "defaultValue": "1" },
                    "waterHard": {
                        "typology": "range",
                        "minimumValue": "0",
                        "maximumValue": "3",
                        "incrementValue": "1",
                        "defaultValue": "2"
                    }
                },
                "remainingTimes": {
                    "temp": {
                        "heating": { "40": 60, "60": 75, "default": 50 },
                        "washing": { "default": 30 }
                    }
                }
            },
            "PROGRAMS.WM_WD.SYNTHETIC": {
                "description": "Synthetic",
                "parameters": {
                    "temp": { "typology": "enum", "enumValues": ["30", "40"], "defaultValue": "30" }
                }
            }
        }
    })
}

/// A washer whose catalog was built from [`washer_metadata`], with `cotton`
/// selected.
pub(crate) fn washer_with_catalog() -> (Appliance<FakeTransport>, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let transport = Arc::new(FakeTransport::default());
    *transport.capabilities.lock() = washer_metadata();

    let identity = ApplianceIdentity::new("aa-bb-cc-dd-ee-ff", ApplianceType::WashingMachine);
    let mut washer = Appliance::new(identity, transport, store.clone());
    let build = crate::catalog::CatalogBuilder::new()
        .build(&washer_metadata())
        .unwrap();
    washer.install_catalog(build);
    (washer, store)
}
