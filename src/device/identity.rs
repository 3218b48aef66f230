// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Appliance identity, read from the vendor appliance directory.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ParseError;
use crate::parameter::json_to_string;
use crate::types::{ApplianceType, MacAddress};

/// Immutable description of one appliance.
///
/// # Examples
///
/// ```
/// use hon_lib::device::ApplianceIdentity;
/// use hon_lib::types::ApplianceType;
///
/// let entry = serde_json::json!({
///     "macAddress": "aa-bb-cc-dd-ee-ff",
///     "applianceTypeId": 1,
///     "applianceTypeName": "WM",
///     "brand": "candy",
///     "modelName": "RO4 H7A2TEX-S"
/// });
///
/// let identity = ApplianceIdentity::from_directory_entry(&entry).unwrap();
/// assert_eq!(identity.appliance_type(), ApplianceType::WashingMachine);
/// assert_eq!(identity.name(), "Washing Machine");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplianceIdentity {
    mac: MacAddress,
    type_id: u32,
    appliance_type: ApplianceType,
    brand: String,
    model: String,
    series: String,
    model_id: String,
    serial_number: String,
    firmware_version: String,
    code: String,
    eeprom_id: String,
    name: String,
}

impl ApplianceIdentity {
    /// Creates an identity with only the required fields.
    ///
    /// The type id follows the vendor numbering (1 for washers, 8 for
    /// dryers) and the name defaults accordingly.
    #[must_use]
    pub fn new(mac: impl Into<MacAddress>, appliance_type: ApplianceType) -> Self {
        let type_id = match appliance_type {
            ApplianceType::WashingMachine => 1,
            ApplianceType::TumbleDryer => 8,
        };
        Self {
            mac: mac.into(),
            type_id,
            appliance_type,
            brand: String::new(),
            model: String::new(),
            series: String::new(),
            model_id: String::new(),
            serial_number: String::new(),
            firmware_version: String::new(),
            code: String::new(),
            eeprom_id: String::new(),
            name: ApplianceType::default_name(type_id),
        }
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the brand and model.
    #[must_use]
    pub fn with_model(mut self, brand: impl Into<String>, model: impl Into<String>) -> Self {
        self.brand = brand.into();
        self.model = model.into();
        self
    }

    /// Reads one entry of the appliance directory.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::MissingField`] when the MAC address or the type
    /// id is missing, and [`ParseError::InvalidValue`] when the appliance is
    /// not a washer or dryer.
    pub fn from_directory_entry(entry: &Value) -> Result<Self, ParseError> {
        let text = |field: &str| entry.get(field).and_then(json_to_string).unwrap_or_default();

        let mac = entry
            .get("macAddress")
            .and_then(json_to_string)
            .filter(|m| !m.is_empty())
            .ok_or_else(|| ParseError::MissingField("macAddress".to_string()))?;

        let type_id = entry
            .get("applianceTypeId")
            .ok_or_else(|| ParseError::MissingField("applianceTypeId".to_string()))?;
        let type_id = json_to_string(type_id)
            .and_then(|id| id.trim().parse::<u32>().ok())
            .ok_or_else(|| ParseError::InvalidValue {
                field: "applianceTypeId".to_string(),
                message: format!("expected an integer, got {type_id}"),
            })?;

        let type_name = text("applianceTypeName");
        let appliance_type =
            type_name
                .parse::<ApplianceType>()
                .map_err(|e| ParseError::InvalidValue {
                    field: "applianceTypeName".to_string(),
                    message: e.to_string(),
                })?;

        let name = entry
            .get("nickName")
            .and_then(Value::as_str)
            .map_or_else(|| ApplianceType::default_name(type_id), ToString::to_string);

        Ok(Self {
            mac: MacAddress::new(mac),
            type_id,
            appliance_type,
            brand: text("brand"),
            model: text("modelName"),
            series: text("series"),
            model_id: text("applianceModelId"),
            serial_number: text("serialNumber"),
            firmware_version: text("fwVersion"),
            code: text("code"),
            eeprom_id: text("eepromId"),
            name,
        })
    }

    /// Returns the MAC address.
    #[must_use]
    pub fn mac(&self) -> &MacAddress {
        &self.mac
    }

    /// Returns the numeric vendor type id.
    #[must_use]
    pub fn type_id(&self) -> u32 {
        self.type_id
    }

    /// Returns the appliance type.
    #[must_use]
    pub fn appliance_type(&self) -> ApplianceType {
        self.appliance_type
    }

    /// Returns the brand.
    #[must_use]
    pub fn brand(&self) -> &str {
        &self.brand
    }

    /// Returns the model name.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Returns the series.
    #[must_use]
    pub fn series(&self) -> &str {
        &self.series
    }

    /// Returns the vendor model id.
    #[must_use]
    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    /// Returns the serial number.
    #[must_use]
    pub fn serial_number(&self) -> &str {
        &self.serial_number
    }

    /// Returns the firmware version.
    #[must_use]
    pub fn firmware_version(&self) -> &str {
        &self.firmware_version
    }

    /// Returns the appliance code.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Returns the firmware (EEPROM) id.
    #[must_use]
    pub fn eeprom_id(&self) -> &str {
        &self.eeprom_id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Keeps the directory entries that describe a supported appliance.
///
/// Entries without a MAC address or type id, or of another appliance type,
/// are dropped.
#[must_use]
pub fn filter_directory(entries: &[Value]) -> Vec<ApplianceIdentity> {
    entries
        .iter()
        .filter_map(|entry| match ApplianceIdentity::from_directory_entry(entry) {
            Ok(identity) => Some(identity),
            Err(e) => {
                tracing::debug!(error = %e, "Skipping appliance directory entry");
                None
            }
        })
        .collect()
}
