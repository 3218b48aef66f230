// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Appliance state tracking.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::{ApplianceType, MachineMode, ProgramPhase, normalize_phase};

use super::{
    CONNECTED, DELAY_TIME, DETERGENT_WARNING, ERROR_KEYS, LAST_CONNECTION_EVENT, MACHINE_MODE,
    PROGRAM_PHASE, REMAINING_TIME, REMOTE_CONTROL, SOFTENER_WARNING, StateChange,
};

/// Tracked state of an appliance.
///
/// The state is a bag of raw telemetry attributes, exactly as the vendor
/// reports them. Derived values are computed from the attributes every time
/// they are read, so they can never go stale after a merge.
///
/// # Examples
///
/// ```
/// use hon_lib::state::DeviceState;
/// use hon_lib::types::ApplianceType;
///
/// let mut state = DeviceState::new(ApplianceType::WashingMachine);
/// state.set("remoteCtrValid", "1");
/// state.set("lastConnEvent", "CONNECTED");
/// assert!(state.is_on());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceState {
    appliance_type: ApplianceType,
    attributes: BTreeMap<String, String>,
}

impl DeviceState {
    /// Creates an empty state for an appliance of the given type.
    #[must_use]
    pub fn new(appliance_type: ApplianceType) -> Self {
        Self {
            appliance_type,
            attributes: BTreeMap::new(),
        }
    }

    /// Returns the appliance type the phase table is chosen from.
    #[must_use]
    pub const fn appliance_type(&self) -> ApplianceType {
        self.appliance_type
    }

    // ========== Raw Attributes ==========

    /// Returns a raw attribute.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// Returns all raw attributes.
    #[must_use]
    pub fn attributes(&self) -> &BTreeMap<String, String> {
        &self.attributes
    }

    /// Sets a raw attribute. Returns `true` if the value changed.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> bool {
        let value = value.into();
        let key = key.into();
        if self.attributes.get(&key) == Some(&value) {
            return false;
        }
        self.attributes.insert(key, value);
        true
    }

    /// Removes every attribute.
    pub fn clear(&mut self) {
        self.attributes.clear();
    }

    // ========== Derived State ==========

    /// Returns the raw machine mode code.
    #[must_use]
    pub fn raw_machine_mode(&self) -> Option<&str> {
        self.get(MACHINE_MODE)
    }

    /// Returns the machine mode, if known.
    #[must_use]
    pub fn machine_mode(&self) -> Option<MachineMode> {
        self.raw_machine_mode().and_then(MachineMode::from_code)
    }

    /// Returns `true` when remote control is enabled and the last
    /// connectivity event is `CONNECTED`.
    #[must_use]
    pub fn is_on(&self) -> bool {
        self.get(REMOTE_CONTROL) == Some("1") && self.get(LAST_CONNECTION_EVENT) == Some(CONNECTED)
    }

    /// Same as [`is_on`](Self::is_on).
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.is_on()
    }

    /// Returns `true` when the machine mode is one of the active modes
    /// (running, paused, delayed start, secondary running).
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.machine_mode().is_some_and(|m| m.is_active())
    }

    /// Returns the program phase collapsed onto its canonical code.
    #[must_use]
    pub fn program_phase(&self) -> Option<String> {
        self.get(PROGRAM_PHASE)
            .map(|code| normalize_phase(self.appliance_type, code))
    }

    /// Returns the program phase as an enumeration, if it is a known code.
    #[must_use]
    pub fn phase(&self) -> Option<ProgramPhase> {
        self.get(PROGRAM_PHASE)
            .and_then(|code| ProgramPhase::from_code(self.appliance_type, code))
    }

    /// Returns the minutes left in the running program.
    #[must_use]
    pub fn remaining_minutes(&self) -> Option<u32> {
        self.get(REMAINING_TIME).and_then(|v| v.trim().parse().ok())
    }

    /// Returns the minutes left before a delayed start.
    #[must_use]
    pub fn delay_minutes(&self) -> Option<u32> {
        self.get(DELAY_TIME).and_then(|v| v.trim().parse().ok())
    }

    /// Returns the active error code. `"00"` means no error.
    #[must_use]
    pub fn error_code(&self) -> Option<&str> {
        ERROR_KEYS
            .iter()
            .filter_map(|k| self.get(k))
            .rfind(|code| *code != "00")
    }

    /// Returns `true` when the appliance reports a low detergent tank.
    #[must_use]
    pub fn low_detergent(&self) -> bool {
        self.get(DETERGENT_WARNING) == Some("1")
    }

    /// Returns `true` when the appliance reports a low softener tank.
    #[must_use]
    pub fn low_softener(&self) -> bool {
        self.get(SOFTENER_WARNING) == Some("1")
    }

    // ========== State Changes ==========

    /// Applies a state change. Returns `true` if anything changed.
    pub fn apply(&mut self, change: &StateChange) -> bool {
        match change {
            StateChange::Attribute { key, value } => self.set(key.clone(), value.clone()),
            StateChange::Batch(changes) => {
                let mut changed = false;
                for change in changes {
                    changed |= self.apply(change);
                }
                changed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn washer() -> DeviceState {
        DeviceState::new(ApplianceType::WashingMachine)
    }

    #[test]
    fn new_state_is_empty() {
        let state = washer();
        assert!(state.attributes().is_empty());
        assert!(!state.is_on());
        assert!(!state.is_running());
        assert_eq!(state.machine_mode(), None);
    }

    #[test]
    fn is_on_truth_table() {
        let remote = [None, Some("0"), Some("1")];
        let event = [None, Some("DISCONNECTED"), Some("CONNECTED"), Some("connected")];
        for r in remote {
            for e in event {
                let mut state = washer();
                if let Some(r) = r {
                    state.set(REMOTE_CONTROL, r);
                }
                if let Some(e) = e {
                    state.set(LAST_CONNECTION_EVENT, e);
                }
                let expected = r == Some("1") && e == Some("CONNECTED");
                assert_eq!(state.is_on(), expected, "remote={r:?} event={e:?}");
                assert_eq!(state.is_available(), expected);
            }
        }
    }

    #[test]
    fn is_running_iff_active_mode() {
        for code in ["0", "1", "2", "3", "4", "5", "6", "7", "8", "", "x"] {
            let mut state = washer();
            state.set(MACHINE_MODE, code);
            let expected = matches!(code, "2" | "3" | "4" | "5");
            assert_eq!(state.is_running(), expected, "machMode={code}");
        }
    }

    #[test]
    fn phase_is_normalized_on_read() {
        let mut state = washer();
        state.set(PROGRAM_PHASE, "17");
        assert_eq!(state.get(PROGRAM_PHASE), Some("17"));
        assert_eq!(state.program_phase().as_deref(), Some("4"));
        assert_eq!(state.phase(), Some(ProgramPhase::Rinse));

        let mut dryer = DeviceState::new(ApplianceType::TumbleDryer);
        dryer.set(PROGRAM_PHASE, "99");
        assert_eq!(dryer.program_phase().as_deref(), Some("99"));
        assert_eq!(dryer.phase(), None);
    }

    #[test]
    fn apply_reports_changes() {
        let mut state = washer();
        let change = StateChange::from_pairs([("machMode", "2"), ("temp", "40")]);
        assert!(state.apply(&change));
        assert!(!state.apply(&change));
        assert!(state.apply(&StateChange::machine_mode(MachineMode::Paused)));
        assert_eq!(state.machine_mode(), Some(MachineMode::Paused));
    }

    #[test]
    fn error_code_ignores_no_error() {
        let mut state = washer();
        state.set("error", "00");
        assert_eq!(state.error_code(), None);
        state.set("errors", "E21");
        assert_eq!(state.error_code(), Some("E21"));
    }

    #[test]
    fn numeric_attributes() {
        let mut state = washer();
        state.set(REMAINING_TIME, "35");
        state.set(DELAY_TIME, "bogus");
        assert_eq!(state.remaining_minutes(), Some(35));
        assert_eq!(state.delay_minutes(), None);
    }

    #[test]
    fn warnings() {
        let mut state = washer();
        assert!(!state.low_detergent());
        state.set(DETERGENT_WARNING, "1");
        state.set(SOFTENER_WARNING, "0");
        assert!(state.low_detergent());
        assert!(!state.low_softener());
    }
}
