// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Vendor parameter descriptor as found in capability metadata.

use serde::Deserialize;
use serde_json::Value;

use crate::error::ParseError;

/// One parameter entry of a vendor program, e.g.
/// `startProgram.<program>.parameters.spinSpeed`.
///
/// The vendor sends numbers either as JSON numbers or as numeric strings, so
/// every field is kept as a raw [`Value`] and interpreted on demand.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorParameter {
    /// `range`, `enum`, `fixed`, or something metadata-only.
    pub typology: Option<String>,
    /// Lower bound of a range.
    pub minimum_value: Option<Value>,
    /// Upper bound of a range.
    pub maximum_value: Option<Value>,
    /// Step of a range.
    pub increment_value: Option<Value>,
    /// Vendor default value.
    pub default_value: Option<Value>,
    /// Allowed values of an enumeration.
    pub enum_values: Option<Vec<Value>>,
    /// Whether the parameter must be sent with the command.
    pub mandatory: Option<Value>,
    /// Value of a fixed parameter.
    pub fixed_value: Option<Value>,
}

impl VendorParameter {
    /// Returns `true` for a range descriptor carrying an upper bound.
    #[must_use]
    pub fn is_bounded_range(&self) -> bool {
        self.typology.as_deref() == Some("range") && self.maximum_value.is_some()
    }

    /// Returns `true` for an enumeration descriptor.
    #[must_use]
    pub fn is_enum(&self) -> bool {
        self.typology.as_deref() == Some("enum")
    }

    /// Returns `true` for a mandatory parameter with a fixed value.
    #[must_use]
    pub fn is_fixed(&self) -> bool {
        self.mandatory.is_some() && self.fixed_value.is_some()
    }

    /// Reads a required integer field.
    pub(crate) fn int(field: &str, value: Option<&Value>) -> Result<i64, ParseError> {
        let value = value.ok_or_else(|| ParseError::MissingField(field.to_string()))?;
        json_to_int(value).ok_or_else(|| ParseError::InvalidValue {
            field: field.to_string(),
            message: format!("expected an integer, got {value}"),
        })
    }

    /// Reads a required field as a string.
    pub(crate) fn string(field: &str, value: Option<&Value>) -> Result<String, ParseError> {
        let value = value.ok_or_else(|| ParseError::MissingField(field.to_string()))?;
        json_to_string(value).ok_or_else(|| ParseError::InvalidValue {
            field: field.to_string(),
            message: format!("expected a scalar, got {value}"),
        })
    }
}

/// Interprets a JSON scalar as an integer.
///
/// Accepts integers, integral floats and numeric strings (`"10"`, `"10.0"`).
fn json_to_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| float_to_int(n.as_f64()?)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| float_to_int(s.parse::<f64>().ok()?))
        }
        _ => None,
    }
}

#[allow(clippy::cast_possible_truncation)]
fn float_to_int(f: f64) -> Option<i64> {
    // Integral and well inside i64 range, so the cast is exact.
    (f.fract() == 0.0 && f.abs() < 9.0e15).then_some(f as i64)
}

/// Renders a JSON scalar the way the vendor expects it back in commands.
///
/// Returns `None` for arrays, objects and `null`.
pub(crate) fn json_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(if *b { "1" } else { "0" }.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
