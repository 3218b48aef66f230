// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! One-shot notification state.

use super::Notification;

/// Lifecycle of one one-shot notification within a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NotifyState {
    /// Not raised this cycle.
    #[default]
    Idle,
    /// Flagged, waiting for a later trigger to act on it.
    Pending,
    /// Raised this cycle.
    Sent,
}

/// The notifications tracked by [`NotifyFlags`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotifyClass {
    /// See [`Notification::LowDetergent`].
    LowDetergent,
    /// See [`Notification::LowSoftener`].
    LowSoftener,
    /// See [`Notification::ManualDetergent`].
    ManualDetergent,
    /// See [`Notification::ManualSoftener`].
    ManualSoftener,
}

impl NotifyClass {
    /// Every class.
    pub const ALL: [Self; 4] = [
        Self::LowDetergent,
        Self::LowSoftener,
        Self::ManualDetergent,
        Self::ManualSoftener,
    ];
}

/// What the start gate looks at.
///
/// `None` for a dosing flag means the selected program has no such
/// parameter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StartConditions {
    /// Automatic detergent dosing of the program.
    pub auto_detergent: Option<bool>,
    /// Automatic softener dosing of the program.
    pub auto_softener: Option<bool>,
    /// The appliance reports a low detergent tank.
    pub low_detergent: bool,
    /// The appliance reports a low softener tank.
    pub low_softener: bool,
}

/// One-shot flags of an appliance.
///
/// # Examples
///
/// ```
/// use hon_lib::notification::{Notification, NotifyFlags, StartConditions};
///
/// let mut flags = NotifyFlags::default();
/// let low = StartConditions {
///     auto_detergent: Some(true),
///     low_detergent: true,
///     ..StartConditions::default()
/// };
///
/// // The first start is held back, the second goes through.
/// assert_eq!(flags.start_gate(&low), Some(Notification::LowDetergent));
/// assert_eq!(flags.start_gate(&low), None);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NotifyFlags {
    low_detergent: NotifyState,
    low_softener: NotifyState,
    manual_detergent: NotifyState,
    manual_softener: NotifyState,
}

impl NotifyFlags {
    /// Returns the state of one class.
    #[must_use]
    pub const fn state(&self, class: NotifyClass) -> NotifyState {
        match class {
            NotifyClass::LowDetergent => self.low_detergent,
            NotifyClass::LowSoftener => self.low_softener,
            NotifyClass::ManualDetergent => self.manual_detergent,
            NotifyClass::ManualSoftener => self.manual_softener,
        }
    }

    fn slot(&mut self, class: NotifyClass) -> &mut NotifyState {
        match class {
            NotifyClass::LowDetergent => &mut self.low_detergent,
            NotifyClass::LowSoftener => &mut self.low_softener,
            NotifyClass::ManualDetergent => &mut self.manual_detergent,
            NotifyClass::ManualSoftener => &mut self.manual_softener,
        }
    }

    /// Returns `true` if no class has been raised or flagged.
    #[must_use]
    pub fn all_idle(&self) -> bool {
        NotifyClass::ALL
            .iter()
            .all(|c| self.state(*c) == NotifyState::Idle)
    }

    /// Runs the pre-start checks, first match wins.
    ///
    /// Returns the notification to raise when the start must be held back.
    /// A program without automatic softener dosing is only flagged here; the
    /// reminder comes later, near the end of the cycle.
    pub fn start_gate(&mut self, conditions: &StartConditions) -> Option<Notification> {
        if conditions.auto_detergent == Some(true)
            && conditions.low_detergent
            && self.low_detergent == NotifyState::Idle
        {
            self.low_detergent = NotifyState::Sent;
            return Some(Notification::LowDetergent);
        }
        if conditions.auto_softener == Some(true)
            && conditions.low_softener
            && self.low_softener == NotifyState::Idle
        {
            self.low_softener = NotifyState::Sent;
            return Some(Notification::LowSoftener);
        }
        if conditions.auto_detergent == Some(false) && self.manual_detergent == NotifyState::Idle {
            self.manual_detergent = NotifyState::Sent;
            return Some(Notification::ManualDetergent);
        }
        if conditions.auto_softener == Some(false) && self.manual_softener == NotifyState::Idle {
            self.manual_softener = NotifyState::Pending;
        }
        None
    }

    /// Returns `true` while the softener reminder is waiting.
    #[must_use]
    pub fn softener_reminder_pending(&self) -> bool {
        self.manual_softener == NotifyState::Pending
    }

    /// Clears the softener reminder once it fired.
    pub fn clear_softener_reminder(&mut self) {
        *self.slot(NotifyClass::ManualSoftener) = NotifyState::Idle;
    }

    /// Returns every class to idle, at the end of a cycle.
    pub fn reset_all(&mut self) {
        for class in NotifyClass::ALL {
            *self.slot(class) = NotifyState::Idle;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conditions(
        auto_detergent: Option<bool>,
        auto_softener: Option<bool>,
        low_detergent: bool,
        low_softener: bool,
    ) -> StartConditions {
        StartConditions {
            auto_detergent,
            auto_softener,
            low_detergent,
            low_softener,
        }
    }

    #[test]
    fn nothing_to_say() {
        let mut flags = NotifyFlags::default();
        assert_eq!(flags.start_gate(&StartConditions::default()), None);
        assert!(flags.all_idle());
    }

    #[test]
    fn low_detergent_wins_over_low_softener() {
        let mut flags = NotifyFlags::default();
        let c = conditions(Some(true), Some(true), true, true);
        assert_eq!(flags.start_gate(&c), Some(Notification::LowDetergent));
        assert_eq!(flags.start_gate(&c), Some(Notification::LowSoftener));
        assert_eq!(flags.start_gate(&c), None);
    }

    #[test]
    fn low_warning_without_auto_dosing_is_ignored() {
        let mut flags = NotifyFlags::default();
        let c = conditions(None, None, true, true);
        assert_eq!(flags.start_gate(&c), None);
        assert!(flags.all_idle());
    }

    #[test]
    fn manual_detergent_holds_start_once() {
        let mut flags = NotifyFlags::default();
        let c = conditions(Some(false), None, false, false);
        assert_eq!(flags.start_gate(&c), Some(Notification::ManualDetergent));
        assert_eq!(flags.state(NotifyClass::ManualDetergent), NotifyState::Sent);
        assert_eq!(flags.start_gate(&c), None);
    }

    #[test]
    fn manual_softener_only_flags() {
        let mut flags = NotifyFlags::default();
        let c = conditions(Some(true), Some(false), false, false);
        assert_eq!(flags.start_gate(&c), None);
        assert!(flags.softener_reminder_pending());

        flags.clear_softener_reminder();
        assert!(!flags.softener_reminder_pending());
        assert_eq!(flags.state(NotifyClass::ManualSoftener), NotifyState::Idle);
    }

    #[test]
    fn reset_returns_everything_to_idle() {
        let mut flags = NotifyFlags::default();
        let c = conditions(Some(false), Some(false), false, false);
        flags.start_gate(&c);
        flags.start_gate(&c);
        assert!(!flags.all_idle());

        flags.reset_all();
        assert!(flags.all_idle());
    }
}
