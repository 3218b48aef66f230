// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Program parameter model.
//!
//! Vendor capability metadata describes each configurable program parameter
//! with a loosely typed JSON object. This module turns those objects into
//! [`ParameterDescriptor`]s: a closed set of typed variants that always hold a
//! current value inside their own domain.
//!
//! Every variant implements [`Controllable`], the single interface the
//! entity layer uses to read, write and enumerate a parameter, whatever its
//! shape.
//!
//! # Examples
//!
//! ```
//! use hon_lib::parameter::{Controllable, EntityKind, ParameterDescriptor, VendorParameter};
//!
//! let vendor: VendorParameter = serde_json::from_value(serde_json::json!({
//!     "typology": "range",
//!     "minimumValue": "400",
//!     "maximumValue": "1400",
//!     "incrementValue": "200",
//!     "defaultValue": "1000"
//! }))
//! .unwrap();
//!
//! let mut spin = ParameterDescriptor::from_vendor("spinSpeed", &vendor, None)
//!     .unwrap()
//!     .unwrap();
//! assert_eq!(spin.entity_kind(), EntityKind::Select);
//! assert_eq!(spin.current_value().as_deref(), Some("1000"));
//!
//! spin.set_value("spinSpeed", "1400").unwrap();
//! assert!(spin.set_value("spinSpeed", "1300").is_err());
//! ```

mod controllable;
mod descriptor;
mod vendor;

pub use controllable::{Controllable, EntityKind};
pub use descriptor::{
    EnumParameter, FixedParameter, MAX_RANGE_OPTIONS, ParameterDescriptor, ProgramSelector,
    RangeParameter, ToggleParameter,
};
pub use vendor::VendorParameter;

pub(crate) use vendor::json_to_string;

/// Delay before the program starts, in minutes.
pub const DELAY_TIME: &str = "delayTime";
/// Display language of the appliance panel.
pub const LANGUAGE: &str = "lang";
/// Water hardness setting.
pub const WATER_HARDNESS: &str = "waterHard";
/// Virtual key under which the program selector is exposed.
pub const PROGRAM_SELECTOR: &str = "program";
/// Program flag enabling the automatic detergent dosing.
pub const AUTO_DETERGENT: &str = "autoDetergentStatus";
/// Program flag enabling the automatic softener dosing.
pub const AUTO_SOFTENER: &str = "autoSoftenerStatus";

/// Keys shared by every program and stored once in the settings group.
pub const CROSS_PROGRAM_KEYS: [&str; 3] = [DELAY_TIME, LANGUAGE, WATER_HARDNESS];

/// Returns `true` if `key` is one of the cross-program settings.
#[must_use]
pub fn is_cross_program(key: &str) -> bool {
    CROSS_PROGRAM_KEYS.contains(&key)
}
