// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Machine mode (`machMode`) codes.

use std::fmt;

/// Coarse operating state reported in the `machMode` telemetry field.
///
/// The vendor code space is larger than this enum; codes not listed here are
/// treated as "unknown" by [`MachineMode::from_code`] and never as running.
///
/// # Examples
///
/// ```
/// use hon_lib::types::MachineMode;
///
/// assert_eq!(MachineMode::from_code("3"), Some(MachineMode::Paused));
/// assert!(MachineMode::Paused.is_active());
/// assert!(MachineMode::Finished.is_ready());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MachineMode {
    /// Idle and ready to start (`1`).
    Ready,
    /// A program is running (`2`).
    Running,
    /// The running program is paused (`3`).
    Paused,
    /// A start was scheduled with a delay (`4`).
    DelayedStart,
    /// Secondary running state, reported by dryers while drying (`5`).
    RunningAlt,
    /// The last program finished; the appliance accepts a new start (`7`).
    Finished,
}

impl MachineMode {
    /// Parses a vendor code. Unknown codes yield `None`.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "1" => Some(Self::Ready),
            "2" => Some(Self::Running),
            "3" => Some(Self::Paused),
            "4" => Some(Self::DelayedStart),
            "5" => Some(Self::RunningAlt),
            "7" => Some(Self::Finished),
            _ => None,
        }
    }

    /// Returns the vendor code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Ready => "1",
            Self::Running => "2",
            Self::Paused => "3",
            Self::DelayedStart => "4",
            Self::RunningAlt => "5",
            Self::Finished => "7",
        }
    }

    /// Returns `true` for the modes in which a program is in progress.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(
            self,
            Self::Running | Self::Paused | Self::DelayedStart | Self::RunningAlt
        )
    }

    /// Returns `true` for the modes from which a program can be started.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        matches!(self, Self::Ready | Self::Finished)
    }

    /// Returns `true` for the modes in which pause/resume is meaningful.
    #[must_use]
    pub const fn can_pause_resume(&self) -> bool {
        matches!(self, Self::Running | Self::Paused)
    }

    /// Returns the code shown to users.
    ///
    /// The secondary running state is reported as a delayed start, which is
    /// how the appliance app presents it.
    #[must_use]
    pub const fn display_code(&self) -> &'static str {
        match self {
            Self::RunningAlt => Self::DelayedStart.code(),
            other => other.code(),
        }
    }
}

impl fmt::Display for MachineMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip() {
        for mode in [
            MachineMode::Ready,
            MachineMode::Running,
            MachineMode::Paused,
            MachineMode::DelayedStart,
            MachineMode::RunningAlt,
            MachineMode::Finished,
        ] {
            assert_eq!(MachineMode::from_code(mode.code()), Some(mode));
        }
    }

    #[test]
    fn unknown_codes() {
        assert_eq!(MachineMode::from_code("0"), None);
        assert_eq!(MachineMode::from_code("6"), None);
        assert_eq!(MachineMode::from_code(""), None);
    }

    #[test]
    fn active_set_is_two_to_five() {
        let active: Vec<_> = ["1", "2", "3", "4", "5", "7"]
            .iter()
            .filter_map(|c| MachineMode::from_code(c))
            .filter(MachineMode::is_active)
            .map(|m| m.code())
            .collect();
        assert_eq!(active, vec!["2", "3", "4", "5"]);
    }

    #[test]
    fn alt_running_displays_as_delayed() {
        assert_eq!(MachineMode::RunningAlt.display_code(), "4");
        assert_eq!(MachineMode::Running.display_code(), "2");
    }
}
