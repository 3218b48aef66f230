// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The appliance facade: identity, state, catalog and parameter access.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::catalog::{
    NoTranslation, ProgramCatalog, ProgramDefinition, ProgramDetails, Translator,
    settings_from_persisted, settings_to_persisted,
};
use crate::error::{DeviceError, Error};
use crate::event::{ApplianceEvents, DeviceEvent, EventBus};
use crate::notification::{Notification, NotifyFlags};
use crate::parameter::{
    Controllable, EntityKind, LANGUAGE, PROGRAM_SELECTOR, ParameterDescriptor, ProgramSelector,
    is_cross_program,
};
use crate::protocol::Transport;
use crate::settings::{Options, SettingsGroup, SettingsStore};
use crate::state::{DeviceState, StateChange};
use crate::types::MacAddress;

use super::ApplianceIdentity;

/// Shared handle on the settings store.
pub type SharedStore = Arc<dyn SettingsStore + Send + Sync>;

/// Shared handle on the description translator.
pub type SharedTranslator = Arc<dyn Translator + Send + Sync>;

/// One washer or dryer.
///
/// The appliance owns its state, its program catalog and its persisted
/// settings. It talks to the vendor cloud through a shared [`Transport`].
///
/// Access must be serialized by the caller: methods that reach the network
/// take `&mut self`, so an appliance shared between tasks lives behind a
/// mutex (see [`ApplianceRegistry`](crate::manager::ApplianceRegistry)).
///
/// Transport failures never cross this boundary as errors. They are logged
/// where they happen and reported as `false`. Only invalid user input is
/// returned as `Err`.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
///
/// use hon_lib::device::{Appliance, ApplianceIdentity};
/// use hon_lib::protocol::HttpConfig;
/// use hon_lib::settings::MemoryStore;
/// use hon_lib::types::ApplianceType;
///
/// # async fn example() -> hon_lib::Result<()> {
/// let transport = Arc::new(HttpConfig::new("id-token").into_client()?);
/// let identity = ApplianceIdentity::new("aa-bb-cc-dd-ee-ff", ApplianceType::WashingMachine);
///
/// let mut washer = Appliance::new(identity, transport, Arc::new(MemoryStore::new()));
/// washer.get_programs().await;
/// washer.update_telemetry().await;
///
/// washer.set_current_program_param("temp", "40")?;
/// if washer.can_start() {
///     washer.send_start().await;
/// }
/// # Ok(())
/// # }
/// ```
pub struct Appliance<T> {
    pub(super) identity: ApplianceIdentity,
    pub(super) transport: Arc<T>,
    pub(super) store: SharedStore,
    pub(super) translator: SharedTranslator,
    pub(super) events: EventBus,
    pub(super) state: DeviceState,
    pub(super) catalog: ProgramCatalog,
    pub(super) settings: BTreeMap<String, ParameterDescriptor>,
    pub(super) options: Options,
    pub(super) notify: NotifyFlags,
}

impl<T> fmt::Debug for Appliance<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Appliance")
            .field("identity", &self.identity)
            .field("state", &self.state)
            .field("programs", &self.catalog.names())
            .field("options", &self.options)
            .field("notify", &self.notify)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Construction and persistence
// ============================================================================

impl<T: Transport> Appliance<T> {
    /// Creates an appliance and restores its persisted groups.
    ///
    /// The catalog is whatever was persisted last; call
    /// [`get_programs`](Self::get_programs) to rebuild it from the vendor.
    #[must_use]
    pub fn new(identity: ApplianceIdentity, transport: Arc<T>, store: SharedStore) -> Self {
        let mac = identity.mac().clone();

        let catalog = store
            .load(&mac, SettingsGroup::Programs)
            .map(|v| {
                ProgramCatalog::from_persisted(&v).unwrap_or_else(|e| {
                    tracing::warn!(mac = %mac, error = %e, "Ignoring persisted programs");
                    ProgramCatalog::default()
                })
            })
            .unwrap_or_default();

        let settings = store
            .load(&mac, SettingsGroup::Settings)
            .map(|v| settings_from_persisted(&v))
            .unwrap_or_default();

        let options = store
            .load(&mac, SettingsGroup::Options)
            .and_then(|v| serde_json::from_value::<Options>(v).ok())
            .unwrap_or_default();

        tracing::debug!(
            mac = %mac,
            programs = catalog.len(),
            settings = settings.len(),
            "Restored appliance settings"
        );

        Self {
            state: DeviceState::new(identity.appliance_type()),
            identity,
            transport,
            store,
            translator: Arc::new(NoTranslation),
            events: EventBus::new(),
            catalog,
            settings,
            options,
            notify: NotifyFlags::default(),
        }
    }

    /// Uses `translator` for program descriptions not translated yet.
    #[must_use]
    pub fn with_translator(mut self, translator: SharedTranslator) -> Self {
        self.translator = translator;
        self
    }

    /// Publishes events on `events` instead of a private bus.
    #[must_use]
    pub fn with_event_bus(mut self, events: EventBus) -> Self {
        self.events = events;
        self
    }
}

impl<T> Appliance<T> {
    pub(super) fn persist(&self, group: SettingsGroup, value: Value) {
        if let Err(e) = self.store.save(self.identity.mac(), group, value) {
            tracing::warn!(mac = %self.identity.mac(), group = %group, error = %e, "Failed to persist settings group");
        }
    }

    pub(super) fn persist_settings(&self) {
        match settings_to_persisted(&self.settings) {
            Ok(value) => self.persist(SettingsGroup::Settings, value),
            Err(e) => tracing::warn!(mac = %self.identity.mac(), error = %e, "Failed to serialize settings"),
        }
    }

    pub(super) fn persist_programs(&self) {
        match self.catalog.to_persisted() {
            Ok(value) => self.persist(SettingsGroup::Programs, value),
            Err(e) => tracing::warn!(mac = %self.identity.mac(), error = %e, "Failed to serialize programs"),
        }
    }

    pub(super) fn persist_options(&self) {
        match serde_json::to_value(&self.options) {
            Ok(value) => self.persist(SettingsGroup::Options, value),
            Err(e) => tracing::warn!(mac = %self.identity.mac(), error = %e, "Failed to serialize options"),
        }
    }

    pub(super) fn notify_user(&self, notification: Notification) {
        tracing::info!(mac = %self.identity.mac(), notification = ?notification, "{}", notification.title());
        self.events
            .publish(DeviceEvent::notification(self.mac().clone(), notification));
    }

    /// Applies a change and publishes it if anything changed.
    pub(super) fn apply_change(&mut self, change: StateChange) -> bool {
        if !self.state.apply(&change) {
            return false;
        }
        self.events.publish(DeviceEvent::state_changed(
            self.mac().clone(),
            change,
            self.state.clone(),
        ));
        true
    }

    // ========== Identity and State ==========

    /// Returns the identity.
    #[must_use]
    pub fn identity(&self) -> &ApplianceIdentity {
        &self.identity
    }

    /// Returns the MAC address.
    #[must_use]
    pub fn mac(&self) -> &MacAddress {
        self.identity.mac()
    }

    /// Returns the tracked state.
    #[must_use]
    pub fn state(&self) -> &DeviceState {
        &self.state
    }

    /// Returns the program catalog.
    #[must_use]
    pub fn catalog(&self) -> &ProgramCatalog {
        &self.catalog
    }

    /// Returns the cross-program settings.
    #[must_use]
    pub fn settings(&self) -> &BTreeMap<String, ParameterDescriptor> {
        &self.settings
    }

    /// Returns the one-shot notification flags.
    #[must_use]
    pub fn notify_flags(&self) -> &NotifyFlags {
        &self.notify
    }

    /// Returns the event bus this appliance publishes on.
    #[must_use]
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// Subscribes to this appliance's events. Events of other appliances
    /// sharing the bus are filtered out.
    #[must_use]
    pub fn subscribe(&self) -> ApplianceEvents {
        self.events.subscribe_appliance(self.mac().clone())
    }

    /// Returns a raw telemetry attribute.
    #[must_use]
    pub fn get_data(&self, key: &str) -> Option<&str> {
        self.state.get(key)
    }

    /// Merges attributes into the state and notifies subscribers.
    ///
    /// Returns `true` if anything changed.
    pub fn set_data<I, K, V>(&mut self, data: I) -> bool
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.apply_change(StateChange::from_pairs(data))
    }

    /// See [`DeviceState::is_on`].
    #[must_use]
    pub fn is_on(&self) -> bool {
        self.state.is_on()
    }

    /// See [`DeviceState::is_available`].
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.state.is_available()
    }

    /// See [`DeviceState::is_running`].
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    // ========== Program Selection ==========

    /// Returns the key of the selected program.
    #[must_use]
    pub fn current_program_name(&self) -> Option<&str> {
        self.options.current_program.as_deref()
    }

    /// Returns the selected program.
    #[must_use]
    pub fn current_program(&self) -> Option<&ProgramDefinition> {
        self.current_program_name()
            .and_then(|name| self.catalog.get(name))
    }

    /// Selects a program and persists the choice.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::UnknownProgram`] if the catalog has no such
    /// program. Nothing changes in that case.
    pub fn select_program(&mut self, program: &str) -> Result<(), DeviceError> {
        if !self.catalog.contains(program) {
            return Err(DeviceError::UnknownProgram(program.to_string()));
        }
        if self.current_program_name() == Some(program) {
            return Ok(());
        }

        self.options.current_program = Some(program.to_string());
        self.persist_options();
        tracing::debug!(mac = %self.identity.mac(), program, "Program selected");
        self.events.publish(DeviceEvent::ProgramSelected {
            mac: self.mac().clone(),
            program: program.to_string(),
        });
        Ok(())
    }

    // ========== Parameter Access ==========

    /// Returns the values to send with a start command: every parameter of
    /// the selected program, plus the cross-program settings.
    #[must_use]
    pub fn current_program_settings(&self) -> BTreeMap<String, String> {
        let mut values = self
            .current_program()
            .map(ProgramDefinition::values)
            .unwrap_or_default();
        for (key, setting) in &self.settings {
            if let Some(value) = setting.current_value() {
                values.insert(key.clone(), value);
            }
        }
        values
    }

    /// Returns a parameter of the selected program.
    ///
    /// Cross-program keys resolve to the shared setting whatever the program,
    /// and `program` resolves to the program selector. Returns `None` for a
    /// key the program does not have.
    #[must_use]
    pub fn get_current_program_param(&self, key: &str) -> Option<ParameterDescriptor> {
        if key == PROGRAM_SELECTOR {
            return Some(ParameterDescriptor::ProgramSelector(ProgramSelector::new(
                self.catalog.names(),
                self.options.current_program.clone(),
            )));
        }
        if is_cross_program(key) {
            return self.settings.get(key).cloned();
        }
        self.current_program()?.parameter(key).cloned()
    }

    /// Writes a parameter of the selected program.
    ///
    /// Cross-program keys write the shared setting and `program` selects a
    /// program. Returns `Ok(false)` when the key does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Value`] if the value is outside the parameter's
    /// domain, and [`Error::Device`] for an unknown program.
    pub fn set_current_program_param(&mut self, key: &str, value: &str) -> Result<bool, Error> {
        if key == PROGRAM_SELECTOR {
            self.select_program(value)?;
            return Ok(true);
        }

        if is_cross_program(key) {
            let Some(setting) = self.settings.get_mut(key) else {
                return Ok(false);
            };
            setting.set_value(key, value)?;
            self.persist_settings();
            self.events
                .publish(DeviceEvent::parameter_changed(self.mac().clone(), key, value));
            return Ok(true);
        }

        let Some(program) = self.options.current_program.clone() else {
            return Ok(false);
        };
        self.set_program_param(&program, key, value)
    }

    /// Writes a parameter of any program.
    ///
    /// The cross-program keys and the program selector are protected: writes
    /// to them through this path are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Device`] for an unknown program and [`Error::Value`]
    /// if the value is outside the parameter's domain.
    pub fn set_program_param(&mut self, program: &str, key: &str, value: &str) -> Result<bool, Error> {
        if is_cross_program(key) || key == PROGRAM_SELECTOR {
            tracing::debug!(mac = %self.identity.mac(), key, "Ignoring write to a protected key");
            return Ok(false);
        }

        let definition = self
            .catalog
            .get_mut(program)
            .ok_or_else(|| DeviceError::UnknownProgram(program.to_string()))?;
        let Some(parameter) = definition.parameter_mut(key) else {
            return Ok(false);
        };
        parameter.set_value(key, value)?;

        self.persist_programs();
        self.events
            .publish(DeviceEvent::parameter_changed(self.mac().clone(), key, value));
        Ok(true)
    }

    /// Lists the parameters surfaced as entities, across every program and
    /// the shared settings.
    ///
    /// Fixed parameters and the panel language are left out.
    #[must_use]
    pub fn exposed_parameters(&self) -> BTreeMap<String, EntityKind> {
        let program_parameters = self
            .catalog
            .iter()
            .flat_map(|p| p.parameters().iter());
        program_parameters
            .chain(self.settings.iter())
            .filter(|(key, p)| key.as_str() != LANGUAGE && p.is_editable())
            .map(|(key, p)| (key.clone(), p.entity_kind()))
            .collect()
    }

    /// Returns the description and estimated duration of the selected
    /// program with its current values.
    #[must_use]
    pub fn get_program_details(&self) -> Option<ProgramDetails> {
        let values = self.current_program_settings();
        self.current_program().map(|p| p.details(&values))
    }
}
