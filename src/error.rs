// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `hon_lib` library.
//!
//! This module provides the error hierarchy used across the library:
//! parameter value validation, transport communication, vendor JSON parsing,
//! and appliance operations.
//!
//! Most facade operations on [`Appliance`](crate::device::Appliance) never
//! return transport errors to the caller: those are logged once at the source
//! and surfaced as `false` or an empty result. The types below are what the
//! lower layers produce and what user-input validation reports.

use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// A parameter write was outside the parameter's domain.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// Communication with the vendor cloud failed.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Vendor data could not be interpreted.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// An appliance-level operation was refused.
    #[error("device error: {0}")]
    Device(#[from] DeviceError),

    /// No appliance with the given MAC address is registered.
    #[error("appliance not found: {0}")]
    ApplianceNotFound(String),
}

/// Errors raised when writing a parameter value.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// The value is not one of the parameter's allowed options.
    #[error("value {value:?} is not an allowed option for {key}")]
    NotAnOption {
        /// The parameter key.
        key: String,
        /// The rejected value.
        value: String,
    },

    /// A numeric parameter received a non-numeric value.
    #[error("value {value:?} for {key} is not a number")]
    NotANumber {
        /// The parameter key.
        key: String,
        /// The rejected value.
        value: String,
    },

    /// The parameter is fixed by the program and cannot be changed.
    #[error("parameter {0} is not editable")]
    NotEditable(String),
}

/// Errors related to the vendor cloud transport.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// HTTP request failed.
    #[cfg(feature = "http")]
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("unexpected HTTP status {0}")]
    UnexpectedStatus(u16),

    /// Login was refused or returned no token.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// The vendor rejected a command (non-zero result code).
    #[error("command rejected: {0}")]
    Rejected(String),

    /// The server answered with a body that does not have the expected shape.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Invalid URL or address.
    #[error("invalid address: {0}")]
    InvalidAddress(String),
}

/// Errors related to parsing vendor payloads.
#[derive(Debug, Error)]
pub enum ParseError {
    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Expected field is missing from the payload.
    #[error("missing field in payload: {0}")]
    MissingField(String),

    /// A field was present but could not be interpreted.
    #[error("failed to parse {field}: {message}")]
    InvalidValue {
        /// The field that failed to parse.
        field: String,
        /// Description of the parsing failure.
        message: String,
    },
}

/// Errors related to appliance operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DeviceError {
    /// The requested program does not exist in the appliance catalog.
    #[error("unknown program: {0}")]
    UnknownProgram(String),

    /// The appliance type is not a washer or dryer.
    #[error("unsupported appliance type: {0}")]
    UnsupportedAppliance(String),
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;
