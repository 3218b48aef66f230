// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Start, stop and pause/resume sequencing.

use crate::notification::StartConditions;
use crate::parameter::{AUTO_DETERGENT, AUTO_SOFTENER, Controllable, DELAY_TIME};
use crate::protocol::{CommandRequest, Transport};
use crate::state::StateChange;
use crate::types::MachineMode;

use super::Appliance;

impl<T: Transport> Appliance<T> {
    /// Sends a command, logging a failure.
    async fn send(&self, command: &CommandRequest) -> bool {
        match self.transport.send_command(&self.identity, command).await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(
                    mac = %self.identity.mac(),
                    command = %command.name(),
                    error = %e,
                    "Command failed"
                );
                false
            }
        }
    }

    fn set_mode(&mut self, mode: MachineMode) {
        self.apply_change(StateChange::machine_mode(mode));
    }

    /// Reads a dosing flag of the selected program. `None` when the program
    /// has no such parameter.
    fn program_flag(&self, key: &str) -> Option<bool> {
        self.current_program()?
            .parameter(key)?
            .current_value()
            .map(|v| v == "1")
    }

    fn delay_minutes_setting(&self) -> i64 {
        self.settings
            .get(DELAY_TIME)
            .and_then(Controllable::current_value)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(0)
    }

    /// Starts the selected program with its current values.
    ///
    /// The dosing checks run first: a low tank or a program without
    /// automatic detergent raises a notification and holds the start back
    /// once per cycle. Calling again sends the command.
    ///
    /// On success the machine mode is set to running, or delayed start when
    /// a delay is configured. Returns `false` if nothing was sent or the
    /// command failed.
    pub async fn send_start(&mut self) -> bool {
        let Some(program) = self.current_program_name().map(ToString::to_string) else {
            tracing::warn!(mac = %self.identity.mac(), "No program selected, not starting");
            return false;
        };

        let conditions = StartConditions {
            auto_detergent: self.program_flag(AUTO_DETERGENT),
            auto_softener: self.program_flag(AUTO_SOFTENER),
            low_detergent: self.state.low_detergent(),
            low_softener: self.state.low_softener(),
        };
        if let Some(notification) = self.notify.start_gate(&conditions) {
            self.notify_user(notification);
            return false;
        }

        let command = CommandRequest::start(program, self.current_program_settings());
        if !self.send(&command).await {
            return false;
        }

        if self.delay_minutes_setting() > 0 {
            self.set_mode(MachineMode::DelayedStart);
        } else {
            self.set_mode(MachineMode::Running);
        }
        true
    }

    /// Stops the running program and clears the one-shot notifications.
    pub async fn send_stop(&mut self) -> bool {
        if !self.send(&CommandRequest::stop()).await {
            return false;
        }
        self.set_mode(MachineMode::Ready);
        self.notify.reset_all();
        true
    }

    /// Pauses a running program or resumes a paused one.
    ///
    /// Does nothing in any other mode.
    pub async fn send_pause_resume(&mut self) -> bool {
        let (command, next) = match self.state.machine_mode() {
            Some(MachineMode::Running) => (CommandRequest::pause(), MachineMode::Paused),
            Some(MachineMode::Paused) => (CommandRequest::resume(), MachineMode::Running),
            mode => {
                tracing::debug!(mac = %self.identity.mac(), mode = ?mode, "Pause/resume not applicable");
                return false;
            }
        };
        if !self.send(&command).await {
            return false;
        }
        self.set_mode(next);
        true
    }

    /// Sends a pause whatever the local mode, and records paused on success.
    pub(crate) async fn pause(&mut self) -> bool {
        if !self.send(&CommandRequest::pause()).await {
            return false;
        }
        self.set_mode(MachineMode::Paused);
        true
    }

    // ========== Availability ==========

    /// Returns `true` when a start makes sense: the appliance is reachable
    /// and idle or finished.
    #[must_use]
    pub fn can_start(&self) -> bool {
        self.is_available() && self.state.machine_mode().is_some_and(|m| m.is_ready())
    }

    /// Returns `true` while a program is in progress.
    #[must_use]
    pub fn can_stop(&self) -> bool {
        self.is_running()
    }

    /// Returns `true` while running or paused.
    #[must_use]
    pub fn can_pause_resume(&self) -> bool {
        self.state
            .machine_mode()
            .is_some_and(|m| m.can_pause_resume())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::testing::washer_with_catalog;
    use crate::notification::{Notification, NotifyClass, NotifyState};
    use crate::protocol::{PAUSE_PROGRAM, RESUME_PROGRAM, START_PROGRAM, STOP_PROGRAM};

    #[tokio::test]
    async fn start_sends_program_values() {
        let (mut washer, _) = washer_with_catalog();
        washer.set_data([("machMode", "1")]);

        assert!(washer.send_start().await);

        let sent = washer.transport.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].name(), START_PROGRAM);
        assert_eq!(sent[0].program(), Some("cotton"));
        assert_eq!(sent[0].parameters()["temp"], "40");
        assert_eq!(sent[0].parameters()["delayTime"], "0");
        assert_eq!(sent[0].parameters()["prCode"], "12");
        assert_eq!(washer.state().machine_mode(), Some(MachineMode::Running));
    }

    #[tokio::test]
    async fn delayed_start_sets_delayed_mode() {
        let (mut washer, _) = washer_with_catalog();
        washer.set_current_program_param("delayTime", "90").unwrap();

        assert!(washer.send_start().await);
        assert_eq!(washer.state().machine_mode(), Some(MachineMode::DelayedStart));
    }

    #[tokio::test]
    async fn manual_detergent_holds_first_start() {
        let (mut washer, _) = washer_with_catalog();
        washer.set_current_program_param("autoDetergentStatus", "0").unwrap();
        let mut rx = washer.subscribe();

        assert!(!washer.send_start().await);
        assert!(washer.transport.sent().is_empty());
        assert_eq!(
            rx.try_recv().unwrap().as_notification(),
            Some(Notification::ManualDetergent)
        );

        assert!(washer.send_start().await);
        assert_eq!(washer.transport.sent().len(), 1);
    }

    #[tokio::test]
    async fn failed_start_keeps_mode() {
        let (mut washer, _) = washer_with_catalog();
        washer.set_data([("machMode", "1")]);
        *washer.transport.offline.lock() = true;

        assert!(!washer.send_start().await);
        assert_eq!(washer.state().machine_mode(), Some(MachineMode::Ready));
    }

    #[tokio::test]
    async fn stop_resets_flags() {
        let (mut washer, _) = washer_with_catalog();
        washer.set_current_program_param("autoSoftenerStatus", "0").unwrap();
        assert!(washer.send_start().await);
        assert_eq!(
            washer.notify_flags().state(NotifyClass::ManualSoftener),
            NotifyState::Pending
        );

        assert!(washer.send_stop().await);
        let sent = washer.transport.sent();
        assert_eq!(sent[1].name(), STOP_PROGRAM);
        assert_eq!(sent[1].parameters()["onOffStatus"], "0");
        assert_eq!(washer.state().machine_mode(), Some(MachineMode::Ready));
        assert!(washer.notify_flags().all_idle());
    }

    #[tokio::test]
    async fn pause_resume_toggles() {
        let (mut washer, _) = washer_with_catalog();
        washer.set_data([("machMode", "2")]);

        assert!(washer.send_pause_resume().await);
        assert_eq!(washer.state().machine_mode(), Some(MachineMode::Paused));
        assert!(washer.send_pause_resume().await);
        assert_eq!(washer.state().machine_mode(), Some(MachineMode::Running));

        let sent = washer.transport.sent();
        assert_eq!(sent[0].name(), PAUSE_PROGRAM);
        assert_eq!(sent[0].parameters()["pause"], "1");
        assert_eq!(sent[1].name(), RESUME_PROGRAM);
        assert_eq!(sent[1].parameters()["pause"], "0");
    }

    #[tokio::test]
    async fn pause_resume_is_noop_when_idle() {
        let (mut washer, _) = washer_with_catalog();
        for mode in ["1", "4", "7"] {
            washer.set_data([("machMode", mode)]);
            assert!(!washer.send_pause_resume().await);
        }
        assert!(washer.transport.sent().is_empty());
    }

    #[test]
    fn button_availability() {
        let (mut washer, _) = washer_with_catalog();
        washer.set_data([
            ("remoteCtrValid", "1"),
            ("lastConnEvent", "CONNECTED"),
            ("machMode", "7"),
        ]);
        assert!(washer.can_start());
        assert!(!washer.can_stop());
        assert!(!washer.can_pause_resume());

        washer.set_data([("machMode", "3")]);
        assert!(!washer.can_start());
        assert!(washer.can_stop());
        assert!(washer.can_pause_resume());

        washer.set_data([("machMode", "4")]);
        assert!(washer.can_stop());
        assert!(!washer.can_pause_resume());

        washer.set_data([("machMode", "1"), ("remoteCtrValid", "0")]);
        assert!(!washer.can_start());
    }
}
