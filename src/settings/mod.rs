// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Persisted appliance settings.
//!
//! Each appliance keeps three independent JSON groups, keyed by MAC address:
//!
//! | Group | Layout |
//! |-------|--------|
//! | `settings` | `{paramKey: descriptor}` for the cross-program parameters |
//! | `programs` | `{program: {info, params: {paramKey: descriptor}, timing?}}` |
//! | `options` | `{current_program: name}` |
//!
//! Storage is delegated to a [`SettingsStore`]. Writes replace a whole group;
//! the last writer wins.

mod store;

pub use store::{JsonFileStore, MemoryStore, SettingsStore};

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the persisted groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SettingsGroup {
    /// Cross-program parameters (delay, language, water hardness).
    Settings,
    /// Per-program descriptors, descriptions and duration tables.
    Programs,
    /// UI selection state.
    Options,
}

impl SettingsGroup {
    /// Every group, in storage order.
    pub const ALL: [Self; 3] = [Self::Settings, Self::Programs, Self::Options];

    /// Returns the persisted key of the group.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Settings => "settings",
            Self::Programs => "programs",
            Self::Options => "options",
        }
    }
}

impl fmt::Display for SettingsGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Contents of the `options` group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Options {
    /// Key of the selected program.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_program: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_names() {
        let names: Vec<_> = SettingsGroup::ALL.iter().map(SettingsGroup::as_str).collect();
        assert_eq!(names, vec!["settings", "programs", "options"]);
    }

    #[test]
    fn options_layout() {
        let options = Options {
            current_program: Some("cotton".to_string()),
        };
        assert_eq!(
            serde_json::to_value(&options).unwrap(),
            serde_json::json!({ "current_program": "cotton" })
        );
        let empty: Options = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(empty, Options::default());
    }
}
