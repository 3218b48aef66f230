// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The common interface of every parameter variant.

use std::fmt;

use crate::error::ValueError;

/// How a parameter is surfaced to the entity layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// A two-state toggle.
    Switch,
    /// A choice among a list of string options.
    Select,
    /// A value fixed by the program, sent with commands but never editable.
    Fixed,
}

impl EntityKind {
    /// Returns the entity type name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Switch => "switch",
            Self::Select => "select",
            Self::Fixed => "fixed",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Capability set shared by all parameter variants: read the value, write
/// the value, and enumerate the allowed options.
///
/// Writes are validated against the variant's domain. A rejected write leaves
/// the parameter untouched.
pub trait Controllable {
    /// Returns the entity kind this parameter is surfaced as.
    fn entity_kind(&self) -> EntityKind;

    /// Returns the current value as sent to the appliance.
    fn current_value(&self) -> Option<String>;

    /// Returns the allowed values, in presentation order.
    fn options(&self) -> Vec<String>;

    /// Writes a new value.
    ///
    /// `key` is only used to label the error.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError`] if the value is outside the parameter's domain
    /// or the parameter is not editable.
    fn set_value(&mut self, key: &str, value: &str) -> Result<(), ValueError>;

    /// Returns `true` if the parameter can be changed by the user.
    fn is_editable(&self) -> bool {
        self.entity_kind() != EntityKind::Fixed
    }
}
