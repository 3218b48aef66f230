// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! User notifications raised around a wash or dry cycle.
//!
//! Four notifications are one-shot per cycle: each has a [`NotifyState`]
//! in [`NotifyFlags`] that only the start gate, the stop command and the
//! finished-cycle detection move.

mod flags;

pub use flags::{NotifyClass, NotifyFlags, NotifyState, StartConditions};

use std::fmt;

use serde::{Deserialize, Serialize};

/// A message for the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Notification {
    /// Automatic dosing is on but the detergent tank is low.
    LowDetergent,
    /// Automatic dosing is on but the softener tank is low.
    LowSoftener,
    /// Automatic detergent dosing is off: add detergent by hand.
    ManualDetergent,
    /// Automatic softener dosing is off: add softener when prompted.
    ManualSoftener,
    /// The running program finished.
    CycleFinished,
    /// The cycle was paused so softener can be added now.
    AddSoftenerNow,
}

impl Notification {
    /// Returns a short English title.
    #[must_use]
    pub const fn title(&self) -> &'static str {
        match self {
            Self::LowDetergent => "Detergent low",
            Self::LowSoftener => "Softener low",
            Self::ManualDetergent => "Add detergent",
            Self::ManualSoftener | Self::AddSoftenerNow => "Add softener",
            Self::CycleFinished => "Program finished",
        }
    }

    /// Returns an English message for the user.
    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self {
            Self::LowDetergent => {
                "The detergent tank is almost empty. Refill it, then start the program again."
            }
            Self::LowSoftener => {
                "The softener tank is almost empty. Refill it, then start the program again."
            }
            Self::ManualDetergent => {
                "Automatic detergent dosing is off. Add detergent, then start the program again."
            }
            Self::ManualSoftener => "Automatic softener dosing is off. You will be asked to add softener.",
            Self::CycleFinished => "The program has finished.",
            Self::AddSoftenerNow => "The program is paused. Add softener now, then resume.",
        }
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}
