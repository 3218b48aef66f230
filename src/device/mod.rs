// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! High-level appliance abstraction.
//!
//! An [`Appliance`] combines an [`ApplianceIdentity`] from the vendor
//! directory with the tracked [`DeviceState`](crate::state::DeviceState),
//! the program catalog and the persisted settings. It is the one type the
//! hosting application drives:
//!
//! - polling: [`Appliance::update_telemetry`] and [`Appliance::get_programs`]
//! - parameters: [`Appliance::get_current_program_param`] and
//!   [`Appliance::set_current_program_param`]
//! - commands: [`Appliance::send_start`], [`Appliance::send_stop`] and
//!   [`Appliance::send_pause_resume`]
//!
//! # Failure Model
//!
//! Network failures are logged and reported as `false`; the caller retries
//! on its next poll. Writes with an invalid value or an unknown program are
//! rejected with an [`Error`](crate::Error) before anything is sent.

mod appliance;
mod commands;
mod identity;
mod refresh;
mod status;

#[cfg(test)]
pub(crate) mod testing;

pub use appliance::{Appliance, SharedStore, SharedTranslator};
pub use identity::{ApplianceIdentity, filter_directory};
pub use refresh::SOFTENER_REMINDER_MINUTES;
pub use status::{DELAY_STEP_MINUTES, MORNING_HOUR, StatusAttributes, delay_until_morning};
