// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Appliance state tracking.
//!
//! The [`DeviceState`] struct holds the raw telemetry attributes of an
//! appliance, while [`StateChange`] represents individual changes that can
//! be applied to it. Everything else (power, running, phase) is derived from
//! the attributes on demand.
//!
//! # Examples
//!
//! ```
//! use hon_lib::state::{DeviceState, StateChange};
//! use hon_lib::types::{ApplianceType, MachineMode};
//!
//! let mut state = DeviceState::new(ApplianceType::WashingMachine);
//!
//! state.apply(&StateChange::machine_mode(MachineMode::Running));
//!
//! assert!(state.is_running());
//! ```

mod device_state;
mod state_change;

pub use device_state::DeviceState;
pub use state_change::StateChange;

/// Coarse operating state, see [`MachineMode`](crate::types::MachineMode).
pub const MACHINE_MODE: &str = "machMode";
/// Raw program phase code.
pub const PROGRAM_PHASE: &str = "prPhase";
/// `"1"` when the appliance accepts remote commands.
pub const REMOTE_CONTROL: &str = "remoteCtrValid";
/// Category of the last connectivity event.
pub const LAST_CONNECTION_EVENT: &str = "lastConnEvent";
/// Minutes left in the running program.
pub const REMAINING_TIME: &str = "remainingTimeMM";
/// Minutes left before a delayed start.
pub const DELAY_TIME: &str = "delayTime";
/// Program temperature.
pub const TEMPERATURE: &str = "temp";
/// Spin speed.
pub const SPIN_SPEED: &str = "spinSpeed";
/// Dryness level.
pub const DRY_LEVEL: &str = "dryLevel";
/// Vendor code of the running program.
pub const PROGRAM_CODE: &str = "prCode";
/// Error code, reported under either key depending on firmware.
pub const ERROR_KEYS: [&str; 2] = ["error", "errors"];
/// `"1"` when the detergent tank is low.
pub const DETERGENT_WARNING: &str = "detWarn";
/// `"1"` when the softener tank is low.
pub const SOFTENER_WARNING: &str = "softWarn";

/// Connectivity category of an appliance that is online.
pub const CONNECTED: &str = "CONNECTED";
