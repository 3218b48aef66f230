// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Appliance MAC address.

use std::fmt;

use serde::{Deserialize, Serialize};

/// MAC address of an appliance, as reported by the vendor directory.
///
/// This is the stable identity of an appliance: the registry, persisted
/// settings and outbound commands are all keyed by it. The vendor format is
/// kept verbatim (no case folding) because the API echoes it back exactly.
///
/// # Examples
///
/// ```
/// use hon_lib::types::MacAddress;
///
/// let mac = MacAddress::new("ab-cd-ef-01-02-03");
/// assert_eq!(mac.as_str(), "ab-cd-ef-01-02-03");
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MacAddress(String);

impl MacAddress {
    /// Wraps a vendor MAC address string.
    #[must_use]
    pub fn new(mac: impl Into<String>) -> Self {
        Self(mac.into())
    }

    /// Returns the address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MacAddress({})", self.0)
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MacAddress {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for MacAddress {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl AsRef<str> for MacAddress {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
