// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Catalog rebuild and telemetry polling.

use crate::catalog::{CatalogBuild, CatalogBuilder};
use crate::event::DeviceEvent;
use crate::notification::Notification;
use crate::protocol::Transport;
use crate::state::{MACHINE_MODE, REMAINING_TIME};
use crate::types::MachineMode;

use super::Appliance;

/// The softener reminder fires when fewer minutes than this remain.
pub const SOFTENER_REMINDER_MINUTES: u32 = 20;

impl<T: Transport> Appliance<T> {
    /// Rebuilds the program catalog from vendor metadata.
    ///
    /// Persisted parameter values and descriptions are merged into the new
    /// catalog. On any failure the current catalog is kept and `false` is
    /// returned.
    pub async fn get_programs(&mut self) -> bool {
        let metadata = match self.transport.fetch_capabilities(&self.identity).await {
            Ok(metadata) => metadata,
            Err(e) => {
                tracing::warn!(mac = %self.identity.mac(), error = %e, "Failed to fetch capabilities");
                return false;
            }
        };

        let build = CatalogBuilder::new()
            .with_previous_programs(&self.catalog)
            .with_previous_settings(&self.settings)
            .with_translator(self.translator.as_ref())
            .build(&metadata);

        match build {
            Ok(build) => {
                self.install_catalog(build);
                true
            }
            Err(e) => {
                tracing::warn!(mac = %self.identity.mac(), error = %e, "Keeping previous catalog");
                false
            }
        }
    }

    /// Fetches telemetry and merges it into the state.
    ///
    /// Two transitions have side effects:
    ///
    /// - running to finished raises [`Notification::CycleFinished`] and
    ///   resets the one-shot flags;
    /// - while the softener reminder is pending, a running cycle with less
    ///   than [`SOFTENER_REMINDER_MINUTES`] left is paused and
    ///   [`Notification::AddSoftenerNow`] is raised. The rest of that snapshot
    ///   is not merged; the next poll picks it up. If the pause is refused the
    ///   snapshot is merged as usual and the reminder stays pending.
    ///
    /// Returns `false` if the telemetry could not be fetched, leaving the
    /// state untouched.
    pub async fn update_telemetry(&mut self) -> bool {
        let snapshot = match self.transport.fetch_telemetry(&self.identity).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::warn!(mac = %self.identity.mac(), error = %e, "Failed to fetch telemetry");
                return false;
            }
        };

        let change = snapshot.to_state_change();
        let previous_mode = self.state.machine_mode();
        let new_mode = change
            .value_of(MACHINE_MODE)
            .and_then(MachineMode::from_code)
            .or(previous_mode);

        if self.notify.softener_reminder_pending() && new_mode == Some(MachineMode::Running) {
            let remaining = change
                .value_of(REMAINING_TIME)
                .and_then(|v| v.trim().parse::<u32>().ok());
            if remaining.is_some_and(|m| m < SOFTENER_REMINDER_MINUTES) {
                tracing::debug!(mac = %self.identity.mac(), remaining, "Pausing for softener");
                if self.pause().await {
                    self.notify_user(Notification::AddSoftenerNow);
                    self.notify.clear_softener_reminder();
                    return true;
                }
                tracing::warn!(
                    mac = %self.identity.mac(),
                    "Softener pause failed, retrying on next poll"
                );
            }
        }

        self.apply_change(change);

        if previous_mode == Some(MachineMode::Running) && new_mode == Some(MachineMode::Finished) {
            self.notify_user(Notification::CycleFinished);
            self.notify.reset_all();
        }
        true
    }

    /// Replaces the catalog and settings with a fresh build and persists
    /// both groups in full.
    pub(crate) fn install_catalog(&mut self, build: CatalogBuild) {
        self.catalog = build.catalog;
        self.settings = build.settings;
        self.persist_programs();
        self.persist_settings();

        let keep = self
            .options
            .current_program
            .as_deref()
            .is_some_and(|p| self.catalog.contains(p));
        if !keep {
            self.options.current_program = self.catalog.first().map(|p| p.key().to_string());
        }
        self.persist_options();

        self.events.publish(DeviceEvent::CatalogRefreshed {
            mac: self.mac().clone(),
            programs: self.catalog.names(),
        });
    }
}
