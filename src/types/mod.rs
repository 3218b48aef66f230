// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types for hOn appliance modelling.
//!
//! This module provides typed representations of the small vendor codes that
//! the rest of the library reasons about, so call sites never compare raw
//! strings.
//!
//! # Types
//!
//! - [`ApplianceType`] - Washing machine (`WM`) or tumble dryer (`TD`)
//! - [`MacAddress`] - Appliance identifier used as registry and persistence key
//! - [`MachineMode`] - Coarse operating state (`machMode`)
//! - [`ProgramPhase`] - Canonical program phase after normalization (`prPhase`)
//! - [`EstimatedDuration`] - Minutes rendered as `H:MM` or `N min`

mod appliance_type;
mod duration;
mod mac;
mod machine_mode;
mod phase;

pub use appliance_type::ApplianceType;
pub use duration::EstimatedDuration;
pub use mac::MacAddress;
pub use machine_mode::MachineMode;
pub use phase::{ProgramPhase, normalize_phase};
