// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Program definitions and the per-appliance catalog.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ParseError;
use crate::parameter::{Controllable, ParameterDescriptor};
use crate::types::EstimatedDuration;

use super::TimingTable;

/// One runnable program.
///
/// Serializes to the persisted layout `{"info": …, "params": {…}, "timing": {…}}`.
/// The key is not part of the serialized form; it is the map key the
/// definition is stored under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramDefinition {
    #[serde(skip)]
    key: String,
    #[serde(rename = "info", default)]
    description: String,
    #[serde(rename = "params", default)]
    parameters: BTreeMap<String, ParameterDescriptor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    timing: Option<TimingTable>,
}

impl ProgramDefinition {
    /// Creates a program definition.
    #[must_use]
    pub fn new(
        key: impl Into<String>,
        description: impl Into<String>,
        parameters: BTreeMap<String, ParameterDescriptor>,
        timing: Option<TimingTable>,
    ) -> Self {
        Self {
            key: key.into(),
            description: description.into(),
            parameters,
            timing,
        }
    }

    /// Returns the canonical program key, e.g. `cotton`.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the human-readable description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the parameters, keyed by vendor parameter name.
    #[must_use]
    pub fn parameters(&self) -> &BTreeMap<String, ParameterDescriptor> {
        &self.parameters
    }

    /// Returns one parameter.
    #[must_use]
    pub fn parameter(&self, key: &str) -> Option<&ParameterDescriptor> {
        self.parameters.get(key)
    }

    pub(crate) fn parameter_mut(&mut self, key: &str) -> Option<&mut ParameterDescriptor> {
        self.parameters.get_mut(key)
    }

    /// Returns the duration table, if the vendor provides one.
    #[must_use]
    pub fn timing(&self) -> Option<&TimingTable> {
        self.timing.as_ref()
    }

    /// Returns `key → current value` for every parameter carrying a value.
    #[must_use]
    pub fn values(&self) -> BTreeMap<String, String> {
        self.parameters
            .iter()
            .filter_map(|(k, p)| p.current_value().map(|v| (k.clone(), v)))
            .collect()
    }

    /// Returns the description and the duration estimate for the given
    /// parameter values.
    #[must_use]
    pub fn details(&self, values: &BTreeMap<String, String>) -> ProgramDetails {
        ProgramDetails {
            info: self.description.clone(),
            timing: self.timing.as_ref().map(|t| {
                t.estimate(values.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            }),
        }
    }
}

/// Description and estimated duration of the selected program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgramDetails {
    /// Program description.
    pub info: String,
    /// Estimated duration, when the program has a timing table.
    pub timing: Option<EstimatedDuration>,
}

/// The programs one appliance can run, in vendor order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProgramCatalog {
    programs: Vec<ProgramDefinition>,
}

impl ProgramCatalog {
    /// Creates a catalog from definitions in presentation order.
    ///
    /// Later duplicates of a key are dropped.
    #[must_use]
    pub fn new(programs: Vec<ProgramDefinition>) -> Self {
        let mut catalog = Self::default();
        for program in programs {
            catalog.push(program);
        }
        catalog
    }

    pub(crate) fn push(&mut self, program: ProgramDefinition) {
        if self.contains(program.key()) {
            tracing::debug!(program = %program.key(), "Duplicate program key, keeping the first");
            return;
        }
        self.programs.push(program);
    }

    /// Returns the number of programs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.programs.len()
    }

    /// Returns `true` if the catalog has no programs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.programs.is_empty()
    }

    /// Returns `true` if a program with this key exists.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Looks a program up by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ProgramDefinition> {
        self.programs.iter().find(|p| p.key == key)
    }

    pub(crate) fn get_mut(&mut self, key: &str) -> Option<&mut ProgramDefinition> {
        self.programs.iter_mut().find(|p| p.key == key)
    }

    /// Returns the first program in vendor order.
    #[must_use]
    pub fn first(&self) -> Option<&ProgramDefinition> {
        self.programs.first()
    }

    /// Iterates over the programs in vendor order.
    pub fn iter(&self) -> impl Iterator<Item = &ProgramDefinition> {
        self.programs.iter()
    }

    /// Returns the program keys in vendor order.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.programs.iter().map(|p| p.key.clone()).collect()
    }

    /// Serializes to the persisted `programs` group, preserving order.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::Json`] if a definition cannot be serialized.
    pub fn to_persisted(&self) -> Result<Value, ParseError> {
        let mut map = Map::new();
        for program in &self.programs {
            map.insert(program.key.clone(), serde_json::to_value(program)?);
        }
        Ok(Value::Object(map))
    }

    /// Restores a catalog from the persisted `programs` group.
    ///
    /// Entries that no longer deserialize are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::InvalidValue`] if the group is not an object.
    pub fn from_persisted(value: &Value) -> Result<Self, ParseError> {
        let map = value.as_object().ok_or_else(|| ParseError::InvalidValue {
            field: "programs".to_string(),
            message: "expected an object".to_string(),
        })?;
        let mut catalog = Self::default();
        for (key, entry) in map {
            match ProgramDefinition::deserialize(entry) {
                Ok(mut program) => {
                    program.key.clone_from(key);
                    catalog.push(program);
                }
                Err(e) => {
                    tracing::warn!(program = %key, error = %e, "Skipping unreadable persisted program");
                }
            }
        }
        Ok(catalog)
    }
}

impl<'a> IntoIterator for &'a ProgramCatalog {
    type Item = &'a ProgramDefinition;
    type IntoIter = std::slice::Iter<'a, ProgramDefinition>;

    fn into_iter(self) -> Self::IntoIter {
        self.programs.iter()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::parameter::{RangeParameter, ToggleParameter};

    fn program(key: &str) -> ProgramDefinition {
        let mut params = BTreeMap::new();
        params.insert(
            "spinSpeed".to_string(),
            ParameterDescriptor::Range(RangeParameter::new(400, 1400, 200, 1000).unwrap()),
        );
        params.insert(
            "prewash".to_string(),
            ParameterDescriptor::Toggle(ToggleParameter::new(false)),
        );
        ProgramDefinition::new(key, key.to_uppercase(), params, None)
    }

    #[test]
    fn keeps_vendor_order() {
        let catalog = ProgramCatalog::new(vec![program("wool"), program("cotton"), program("eco")]);
        assert_eq!(catalog.names(), vec!["wool", "cotton", "eco"]);
        assert_eq!(catalog.first().map(ProgramDefinition::key), Some("wool"));
    }

    #[test]
    fn duplicates_are_dropped() {
        let catalog = ProgramCatalog::new(vec![program("eco"), program("eco")]);
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn values_stringify_parameters() {
        let p = program("cotton");
        let values = p.values();
        assert_eq!(values.get("spinSpeed").map(String::as_str), Some("1000"));
        assert_eq!(values.get("prewash").map(String::as_str), Some("0"));
    }

    #[test]
    fn details_without_timing() {
        let details = program("cotton").details(&BTreeMap::new());
        assert_eq!(details.info, "COTTON");
        assert_eq!(details.timing, None);
    }

    #[test]
    fn details_with_timing() {
        let timing: TimingTable =
            serde_json::from_value(json!({ "spinSpeed": { "spin": { "1000": 12 } } })).unwrap();
        let p = ProgramDefinition::new("eco", "Eco", program("eco").parameters().clone(), Some(timing));
        let details = p.details(&p.values());
        assert_eq!(details.timing.map(|t| t.minutes()), Some(12));
    }

    #[test]
    fn persisted_layout() {
        let catalog = ProgramCatalog::new(vec![program("wool"), program("cotton")]);
        let persisted = catalog.to_persisted().unwrap();

        let keys: Vec<_> = persisted.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["wool", "cotton"]);
        assert_eq!(persisted["wool"]["info"], "WOOL");
        assert_eq!(persisted["wool"]["params"]["spinSpeed"]["type"], "range");
        assert!(persisted["wool"].get("timing").is_none());

        let restored = ProgramCatalog::from_persisted(&persisted).unwrap();
        assert_eq!(restored, catalog);
    }

    #[test]
    fn unreadable_persisted_program_is_skipped() {
        let persisted = json!({
            "wool": { "info": "Wool", "params": {} },
            "broken": { "params": { "x": { "type": "nope" } } }
        });
        let restored = ProgramCatalog::from_persisted(&persisted).unwrap();
        assert_eq!(restored.names(), vec!["wool"]);
    }
}
