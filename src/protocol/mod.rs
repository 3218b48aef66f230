// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Transport to the vendor cloud.
//!
//! The appliance model never talks to the network itself: it goes through a
//! [`Transport`], which authenticates, lists appliances, fetches capability
//! metadata and telemetry, and posts commands.
//!
//! # Transports
//!
//! - [`HttpClient`]: the vendor REST API (feature `http`, enabled by default)
//!
//! Tests and alternative backends implement [`Transport`] directly.

#[cfg(feature = "http")]
mod http;

#[cfg(feature = "http")]
pub use http::{HttpClient, HttpConfig};

use std::collections::BTreeMap;

use serde_json::Value;

use crate::device::ApplianceIdentity;
use crate::error::ProtocolError;
use crate::telemetry::TelemetrySnapshot;

/// Command starting the selected program.
pub const START_PROGRAM: &str = "startProgram";
/// Command stopping the running program.
pub const STOP_PROGRAM: &str = "stopProgram";
/// Command pausing the running program.
pub const PAUSE_PROGRAM: &str = "pauseProgram";
/// Command resuming a paused program.
pub const RESUME_PROGRAM: &str = "resumeProgram";

/// A command for one appliance.
///
/// # Examples
///
/// ```
/// use hon_lib::protocol::CommandRequest;
///
/// let stop = CommandRequest::stop();
/// assert_eq!(stop.name(), "stopProgram");
/// assert_eq!(stop.parameters().get("onOffStatus").map(String::as_str), Some("0"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRequest {
    name: String,
    parameters: BTreeMap<String, String>,
    program: Option<String>,
}

impl CommandRequest {
    /// Creates a command without parameters.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: BTreeMap::new(),
            program: None,
        }
    }

    /// Adds one parameter.
    #[must_use]
    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }

    /// Replaces the parameters.
    #[must_use]
    pub fn with_parameters(mut self, parameters: BTreeMap<String, String>) -> Self {
        self.parameters = parameters;
        self
    }

    /// Sets the program the command refers to.
    #[must_use]
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = Some(program.into());
        self
    }

    /// Starts `program` with the given parameter values.
    #[must_use]
    pub fn start(program: impl Into<String>, parameters: BTreeMap<String, String>) -> Self {
        Self::new(START_PROGRAM)
            .with_parameters(parameters)
            .with_program(program)
    }

    /// Stops the running program.
    #[must_use]
    pub fn stop() -> Self {
        Self::new(STOP_PROGRAM).with_parameter("onOffStatus", "0")
    }

    /// Pauses the running program.
    #[must_use]
    pub fn pause() -> Self {
        Self::new(PAUSE_PROGRAM).with_parameter("pause", "1")
    }

    /// Resumes the paused program.
    #[must_use]
    pub fn resume() -> Self {
        Self::new(RESUME_PROGRAM).with_parameter("pause", "0")
    }

    /// Returns the command name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the parameters.
    #[must_use]
    pub fn parameters(&self) -> &BTreeMap<String, String> {
        &self.parameters
    }

    /// Returns the program key, if any.
    #[must_use]
    pub fn program(&self) -> Option<&str> {
        self.program.as_deref()
    }
}

/// Access to the vendor cloud.
///
/// Implementations log their own failures; callers decide whether to retry
/// on the next poll.
#[allow(async_fn_in_trait)]
pub trait Transport {
    /// Logs in and opens a session.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::AuthenticationFailed`] if the login is
    /// refused.
    async fn authenticate(&self) -> Result<(), ProtocolError>;

    /// Returns the raw appliance directory entries of the account.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the request fails.
    async fn fetch_appliances(&self) -> Result<Vec<Value>, ProtocolError>;

    /// Returns the capability metadata of an appliance: command name, then
    /// program, then `{parameters, remainingTimes?}`.
    ///
    /// A vendor-side failure yields an empty object rather than an error.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the request fails.
    async fn fetch_capabilities(&self, appliance: &ApplianceIdentity)
    -> Result<Value, ProtocolError>;

    /// Returns the latest telemetry snapshot of an appliance.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the request fails.
    async fn fetch_telemetry(
        &self,
        appliance: &ApplianceIdentity,
    ) -> Result<TelemetrySnapshot, ProtocolError>;

    /// Sends a command.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::Rejected`] if the vendor refuses the command,
    /// or another `ProtocolError` if the request fails.
    async fn send_command(
        &self,
        appliance: &ApplianceIdentity,
        command: &CommandRequest,
    ) -> Result<(), ProtocolError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_carries_program_and_values() {
        let mut values = BTreeMap::new();
        values.insert("temp".to_string(), "40".to_string());
        let start = CommandRequest::start("cotton", values);
        assert_eq!(start.name(), START_PROGRAM);
        assert_eq!(start.program(), Some("cotton"));
        assert_eq!(start.parameters().len(), 1);
    }

    #[test]
    fn pause_and_resume_payloads() {
        assert_eq!(CommandRequest::pause().name(), PAUSE_PROGRAM);
        assert_eq!(CommandRequest::pause().parameters()["pause"], "1");
        assert_eq!(CommandRequest::resume().name(), RESUME_PROGRAM);
        assert_eq!(CommandRequest::resume().parameters()["pause"], "0");
        assert_eq!(CommandRequest::resume().program(), None);
    }
}
