// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Catalog construction from vendor capability metadata.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::ParseError;
use crate::parameter::{ParameterDescriptor, VendorParameter, is_cross_program};

use super::{NoTranslation, ProgramCatalog, ProgramDefinition, TimingTable, Translator};

/// Command section listing the runnable programs.
pub const START_PROGRAM: &str = "startProgram";

/// Suffix of the steam sub-variants the vendor lists next to each program.
const STEAM_SUFFIX: &str = "_steam";

/// Separator marking vendor-internal program entries.
const INTERNAL_MARKER: &str = "__";

/// Derives the catalog key from a vendor program identifier.
///
/// # Examples
///
/// ```
/// use hon_lib::catalog::canonical_key;
///
/// assert_eq!(canonical_key("PROGRAMS.WM_WD.COTTON"), "cotton");
/// assert_eq!(canonical_key("Eco"), "eco");
/// ```
#[must_use]
pub fn canonical_key(program_id: &str) -> String {
    program_id
        .rsplit('.')
        .next()
        .unwrap_or(program_id)
        .to_lowercase()
}

/// Returns `true` for program keys that are vendor noise.
#[must_use]
pub fn is_excluded(key: &str) -> bool {
    key.ends_with(STEAM_SUFFIX) || key.contains(INTERNAL_MARKER)
}

/// Result of a catalog build.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogBuild {
    /// The rebuilt programs.
    pub catalog: ProgramCatalog,
    /// The rebuilt cross-program settings.
    pub settings: BTreeMap<String, ParameterDescriptor>,
}

/// Builds a [`ProgramCatalog`] and the shared settings from vendor metadata.
///
/// Previously persisted programs and settings are merged in: their current
/// values override the vendor defaults, and translated descriptions are
/// reused.
///
/// # Examples
///
/// ```
/// use hon_lib::catalog::CatalogBuilder;
///
/// let metadata = serde_json::json!({
///     "startProgram": {
///         "PROGRAMS.WM_WD.COTTON": {
///             "parameters": {
///                 "temp": {
///                     "typology": "range",
///                     "minimumValue": "20",
///                     "maximumValue": "60",
///                     "incrementValue": "20",
///                     "defaultValue": "40"
///                 }
///             }
///         }
///     }
/// });
///
/// let build = CatalogBuilder::new().build(&metadata).unwrap();
/// assert_eq!(build.catalog.names(), vec!["cotton"]);
/// ```
pub struct CatalogBuilder<'a> {
    previous_programs: Option<&'a ProgramCatalog>,
    previous_settings: Option<&'a BTreeMap<String, ParameterDescriptor>>,
    translator: &'a dyn Translator,
}

impl Default for CatalogBuilder<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> CatalogBuilder<'a> {
    /// Creates a builder with nothing to merge and no translation.
    #[must_use]
    pub fn new() -> Self {
        Self {
            previous_programs: None,
            previous_settings: None,
            translator: &NoTranslation,
        }
    }

    /// Merges against previously persisted programs.
    #[must_use]
    pub fn with_previous_programs(mut self, programs: &'a ProgramCatalog) -> Self {
        self.previous_programs = Some(programs);
        self
    }

    /// Merges against previously persisted settings.
    #[must_use]
    pub fn with_previous_settings(
        mut self,
        settings: &'a BTreeMap<String, ParameterDescriptor>,
    ) -> Self {
        self.previous_settings = Some(settings);
        self
    }

    /// Translates descriptions that are not cached yet.
    #[must_use]
    pub fn with_translator(mut self, translator: &'a dyn Translator) -> Self {
        self.translator = translator;
        self
    }

    /// Builds the catalog.
    ///
    /// Malformed parameters are skipped one by one; they never abort the
    /// build.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::MissingField`] if the metadata has no
    /// `startProgram` section, which happens when the vendor API has a
    /// transient failure.
    pub fn build(&self, metadata: &Value) -> Result<CatalogBuild, ParseError> {
        let programs = metadata
            .get(START_PROGRAM)
            .and_then(Value::as_object)
            .ok_or_else(|| ParseError::MissingField(START_PROGRAM.to_string()))?;

        let mut build = CatalogBuild::default();

        for (program_id, entry) in programs {
            let key = canonical_key(program_id);
            if is_excluded(&key) {
                tracing::trace!(program = %program_id, "Skipping excluded program");
                continue;
            }

            let previous = self.previous_programs.and_then(|c| c.get(&key));
            let mut parameters = BTreeMap::new();

            if let Some(vendor_params) = entry.get("parameters").and_then(Value::as_object) {
                for (name, raw) in vendor_params {
                    if is_cross_program(name) {
                        if !build.settings.contains_key(name) {
                            let prior = self.previous_settings.and_then(|s| s.get(name));
                            if let Some(descriptor) = descriptor(name, raw, prior) {
                                build.settings.insert(name.clone(), descriptor);
                            }
                        }
                        continue;
                    }
                    let prior = previous.and_then(|p| p.parameter(name));
                    if let Some(descriptor) = descriptor(name, raw, prior) {
                        parameters.insert(name.clone(), descriptor);
                    }
                }
            }

            // A cached description equal to the vendor text was never
            // translated, so the translator gets another chance.
            let text = vendor_description(entry, &key);
            let description = match previous {
                Some(p) if !p.description().is_empty() && p.description() != text => {
                    p.description().to_string()
                }
                _ => self.translator.translate(&text).unwrap_or(text),
            };

            let timing = entry
                .get("remainingTimes")
                .and_then(Value::as_object)
                .map(|t| TimingTable::new(t.clone()));

            build
                .catalog
                .push(ProgramDefinition::new(key, description, parameters, timing));
        }

        tracing::debug!(
            programs = build.catalog.len(),
            settings = build.settings.len(),
            "Catalog built"
        );
        Ok(build)
    }
}

/// Builds one descriptor, logging and skipping it when malformed.
fn descriptor(
    key: &str,
    raw: &Value,
    previous: Option<&ParameterDescriptor>,
) -> Option<ParameterDescriptor> {
    let vendor = match VendorParameter::deserialize(raw) {
        Ok(vendor) => vendor,
        Err(e) => {
            tracing::warn!(key, error = %e, "Skipping unreadable parameter");
            return None;
        }
    };
    match ParameterDescriptor::from_vendor(key, &vendor, previous) {
        Ok(descriptor) => descriptor,
        Err(e) => {
            tracing::warn!(key, error = %e, "Skipping malformed parameter");
            None
        }
    }
}

fn vendor_description(entry: &Value, key: &str) -> String {
    entry
        .get("description")
        .and_then(Value::as_str)
        .filter(|d| !d.is_empty())
        .map_or_else(|| key.to_string(), ToString::to_string)
}

/// Reads the cross-program settings group from its persisted form.
///
/// Unreadable entries are skipped.
#[must_use]
pub fn settings_from_persisted(value: &Value) -> BTreeMap<String, ParameterDescriptor> {
    let Some(map) = value.as_object() else {
        return BTreeMap::new();
    };
    map.iter()
        .filter_map(|(k, v)| match ParameterDescriptor::deserialize(v) {
            Ok(d) => Some((k.clone(), d)),
            Err(e) => {
                tracing::warn!(key = %k, error = %e, "Skipping unreadable persisted setting");
                None
            }
        })
        .collect()
}

/// Serializes the settings group to its persisted form.
///
/// # Errors
///
/// Returns [`ParseError::Json`] if a descriptor cannot be serialized.
pub fn settings_to_persisted(
    settings: &BTreeMap<String, ParameterDescriptor>,
) -> Result<Value, ParseError> {
    let mut map = Map::new();
    for (k, d) in settings {
        map.insert(k.clone(), serde_json::to_value(d)?);
    }
    Ok(Value::Object(map))
}
