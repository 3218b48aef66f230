// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Typed parameter descriptors.

use serde::{Deserialize, Serialize};

use crate::error::{ParseError, ValueError};

use super::controllable::{Controllable, EntityKind};
use super::vendor::{VendorParameter, json_to_string};
use super::DELAY_TIME;

/// A constant value imposed by the program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedParameter {
    value: String,
}

impl FixedParameter {
    /// Creates a fixed parameter.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    /// Returns the fixed value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl Controllable for FixedParameter {
    fn entity_kind(&self) -> EntityKind {
        EntityKind::Fixed
    }

    fn current_value(&self) -> Option<String> {
        Some(self.value.clone())
    }

    fn options(&self) -> Vec<String> {
        vec![self.value.clone()]
    }

    fn set_value(&mut self, key: &str, _value: &str) -> Result<(), ValueError> {
        Err(ValueError::NotEditable(key.to_string()))
    }
}

/// A range whose domain is exactly `{0, 1}`, surfaced as a switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToggleParameter {
    value: bool,
}

impl ToggleParameter {
    /// Creates a toggle in the given state.
    #[must_use]
    pub const fn new(value: bool) -> Self {
        Self { value }
    }

    /// Returns `true` if the toggle is on.
    #[must_use]
    pub const fn is_on(&self) -> bool {
        self.value
    }
}

impl Controllable for ToggleParameter {
    fn entity_kind(&self) -> EntityKind {
        EntityKind::Switch
    }

    fn current_value(&self) -> Option<String> {
        Some(if self.value { "1" } else { "0" }.to_string())
    }

    fn options(&self) -> Vec<String> {
        vec!["0".to_string(), "1".to_string()]
    }

    fn set_value(&mut self, key: &str, value: &str) -> Result<(), ValueError> {
        self.value = match value.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "on" => true,
            "0" | "false" | "off" => false,
            _ => {
                return Err(ValueError::NotAnOption {
                    key: key.to_string(),
                    value: value.to_string(),
                });
            }
        };
        Ok(())
    }
}

/// Upper bound on the number of steps a vendor range may declare.
pub const MAX_RANGE_OPTIONS: i64 = 10_000;

/// An integer range `[minimum, minimum + increment, …]`, surfaced as a select.
///
/// The option list follows the vendor convention: every step strictly below
/// `maximum + increment`. The current value is always one of the options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeParameter {
    minimum: i64,
    maximum: i64,
    increment: i64,
    default: i64,
    value: i64,
}

impl RangeParameter {
    /// Creates a range. The default is snapped onto the option grid.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::InvalidValue`] if the increment is not positive,
    /// the maximum is below the minimum, or the range has more than
    /// [`MAX_RANGE_OPTIONS`] steps.
    pub fn new(minimum: i64, maximum: i64, increment: i64, default: i64) -> Result<Self, ParseError> {
        if increment <= 0 {
            return Err(ParseError::InvalidValue {
                field: "incrementValue".to_string(),
                message: format!("increment must be positive, got {increment}"),
            });
        }
        if maximum < minimum {
            return Err(ParseError::InvalidValue {
                field: "maximumValue".to_string(),
                message: format!("maximum {maximum} is below minimum {minimum}"),
            });
        }
        let steps = (i128::from(maximum) - i128::from(minimum)) / i128::from(increment) + 1;
        if steps > i128::from(MAX_RANGE_OPTIONS) {
            return Err(ParseError::InvalidValue {
                field: "maximumValue".to_string(),
                message: format!("range {minimum}..={maximum} by {increment} has {steps} steps"),
            });
        }
        let mut range = Self {
            minimum,
            maximum,
            increment,
            default,
            value: default,
        };
        range.default = range.snap(default);
        range.value = range.default;
        Ok(range)
    }

    /// Returns the lower bound.
    #[must_use]
    pub const fn minimum(&self) -> i64 {
        self.minimum
    }

    /// Returns the upper bound as declared by the vendor.
    #[must_use]
    pub const fn maximum(&self) -> i64 {
        self.maximum
    }

    /// Returns the step.
    #[must_use]
    pub const fn increment(&self) -> i64 {
        self.increment
    }

    /// Returns the default value.
    #[must_use]
    pub const fn default_value(&self) -> i64 {
        self.default
    }

    /// Returns the current value.
    #[must_use]
    pub const fn value(&self) -> i64 {
        self.value
    }

    fn upper_exclusive(&self) -> i64 {
        self.maximum.saturating_add(self.increment)
    }

    /// Returns `true` if `value` lies on the option grid.
    #[must_use]
    pub fn contains(&self, value: i64) -> bool {
        value >= self.minimum
            && value < self.upper_exclusive()
            && (i128::from(value) - i128::from(self.minimum)) % i128::from(self.increment) == 0
    }

    /// Moves `value` onto the nearest grid step at or below it, within bounds.
    fn snap(&self, value: i64) -> i64 {
        let clamped = value.clamp(self.minimum, self.upper_exclusive() - 1);
        let offset = (i128::from(clamped) - i128::from(self.minimum)) / i128::from(self.increment)
            * i128::from(self.increment);
        i64::try_from(i128::from(self.minimum) + offset).unwrap_or(self.minimum)
    }

    /// Forces the value to zero, or to the closest step if zero is off-grid.
    pub(crate) fn reset_to_zero(&mut self) {
        self.value = self.snap(0);
    }
}

impl Controllable for RangeParameter {
    fn entity_kind(&self) -> EntityKind {
        EntityKind::Select
    }

    fn current_value(&self) -> Option<String> {
        Some(self.value.to_string())
    }

    fn options(&self) -> Vec<String> {
        let upper = self.upper_exclusive();
        std::iter::successors(Some(self.minimum), |step| step.checked_add(self.increment))
            .take_while(|step| *step < upper)
            .take(usize::try_from(MAX_RANGE_OPTIONS).unwrap_or(usize::MAX))
            .map(|step| step.to_string())
            .collect()
    }

    fn set_value(&mut self, key: &str, value: &str) -> Result<(), ValueError> {
        let parsed: i64 = value.trim().parse().map_err(|_| ValueError::NotANumber {
            key: key.to_string(),
            value: value.to_string(),
        })?;
        if !self.contains(parsed) {
            return Err(ValueError::NotAnOption {
                key: key.to_string(),
                value: value.to_string(),
            });
        }
        self.value = parsed;
        Ok(())
    }
}

/// A choice among vendor-declared string values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumParameter {
    default: String,
    options: Vec<String>,
    value: String,
}

impl EnumParameter {
    /// Creates an enumeration. A default outside the options falls back to
    /// the first option.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::InvalidValue`] if `options` is empty.
    pub fn new(default: impl Into<String>, options: Vec<String>) -> Result<Self, ParseError> {
        let default = default.into();
        let default = if options.contains(&default) {
            default
        } else {
            options
                .first()
                .cloned()
                .ok_or_else(|| ParseError::InvalidValue {
                    field: "enumValues".to_string(),
                    message: "enumeration has no values".to_string(),
                })?
        };
        Ok(Self {
            value: default.clone(),
            default,
            options,
        })
    }

    /// Returns the default value.
    #[must_use]
    pub fn default_value(&self) -> &str {
        &self.default
    }

    /// Returns the current value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl Controllable for EnumParameter {
    fn entity_kind(&self) -> EntityKind {
        EntityKind::Select
    }

    fn current_value(&self) -> Option<String> {
        Some(self.value.clone())
    }

    fn options(&self) -> Vec<String> {
        self.options.clone()
    }

    fn set_value(&mut self, key: &str, value: &str) -> Result<(), ValueError> {
        if !self.options.iter().any(|o| o == value) {
            return Err(ValueError::NotAnOption {
                key: key.to_string(),
                value: value.to_string(),
            });
        }
        self.value = value.to_string();
        Ok(())
    }
}

/// The virtual program parameter, whose options are the catalog's programs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramSelector {
    options: Vec<String>,
    value: Option<String>,
}

impl ProgramSelector {
    /// Creates a selector over `programs` with `current` selected.
    #[must_use]
    pub fn new(programs: Vec<String>, current: Option<String>) -> Self {
        Self {
            options: programs,
            value: current,
        }
    }
}

impl Controllable for ProgramSelector {
    fn entity_kind(&self) -> EntityKind {
        EntityKind::Select
    }

    fn current_value(&self) -> Option<String> {
        self.value.clone()
    }

    fn options(&self) -> Vec<String> {
        self.options.clone()
    }

    fn set_value(&mut self, key: &str, value: &str) -> Result<(), ValueError> {
        if !self.options.iter().any(|o| o == value) {
            return Err(ValueError::NotAnOption {
                key: key.to_string(),
                value: value.to_string(),
            });
        }
        self.value = Some(value.to_string());
        Ok(())
    }
}

/// A configurable program parameter.
///
/// The persisted form is a JSON object tagged with `type`, for example
/// `{"type":"range","minimum":400,"maximum":1400,"increment":200,"default":1000,"value":1200}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ParameterDescriptor {
    /// Constant imposed by the program.
    Fixed(FixedParameter),
    /// Two-state switch.
    Toggle(ToggleParameter),
    /// Integer range.
    Range(RangeParameter),
    /// Enumeration of string values.
    #[serde(rename = "enum")]
    Enumerated(EnumParameter),
    /// Program choice.
    #[serde(rename = "program")]
    ProgramSelector(ProgramSelector),
}

impl ParameterDescriptor {
    /// Builds a descriptor from a vendor parameter.
    ///
    /// When `previous` is given (the persisted descriptor for the same key),
    /// its current value replaces the vendor default if it is still valid in
    /// the new domain. The delay time is the exception: it always restarts at
    /// zero.
    ///
    /// Returns `Ok(None)` for metadata-only entries that describe nothing
    /// configurable.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] if the descriptor lacks the fields its typology
    /// requires.
    pub fn from_vendor(
        key: &str,
        vendor: &VendorParameter,
        previous: Option<&ParameterDescriptor>,
    ) -> Result<Option<Self>, ParseError> {
        let mut descriptor = if vendor.is_bounded_range() {
            let minimum = VendorParameter::int("minimumValue", vendor.minimum_value.as_ref())?;
            let maximum = VendorParameter::int("maximumValue", vendor.maximum_value.as_ref())?;
            let increment =
                VendorParameter::int("incrementValue", vendor.increment_value.as_ref())?;
            let default = VendorParameter::int("defaultValue", vendor.default_value.as_ref())?;
            if minimum == 0 && (maximum == 1 || maximum == increment) {
                Self::Toggle(ToggleParameter::new(default != 0))
            } else {
                Self::Range(RangeParameter::new(minimum, maximum, increment, default)?)
            }
        } else if vendor.is_enum() {
            let values = vendor
                .enum_values
                .as_ref()
                .ok_or_else(|| ParseError::MissingField("enumValues".to_string()))?;
            let options = values
                .iter()
                .map(|v| {
                    json_to_string(v).ok_or_else(|| ParseError::InvalidValue {
                        field: "enumValues".to_string(),
                        message: format!("unsupported value {v}"),
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            let default = VendorParameter::string("defaultValue", vendor.default_value.as_ref())?;
            Self::Enumerated(EnumParameter::new(default, options)?)
        } else if vendor.is_fixed() {
            let value = VendorParameter::string("fixedValue", vendor.fixed_value.as_ref())?;
            Self::Fixed(FixedParameter::new(value))
        } else {
            return Ok(None);
        };

        if key == DELAY_TIME {
            descriptor.reset_to_zero();
        } else if let Some(previous) = previous.and_then(Controllable::current_value)
            && descriptor.is_editable()
            && let Err(e) = descriptor.set_value(key, &previous)
        {
            tracing::debug!(key, error = %e, "Persisted value no longer valid, keeping vendor default");
        }

        Ok(Some(descriptor))
    }

    /// Forces the value back to zero (used for the delay time).
    pub fn reset_to_zero(&mut self) {
        match self {
            Self::Toggle(toggle) => toggle.value = false,
            Self::Range(range) => range.reset_to_zero(),
            Self::Enumerated(e) => {
                if e.options.iter().any(|o| o == "0") {
                    e.value = "0".to_string();
                }
            }
            Self::Fixed(_) | Self::ProgramSelector(_) => {}
        }
    }

    fn inner(&self) -> &dyn Controllable {
        match self {
            Self::Fixed(p) => p,
            Self::Toggle(p) => p,
            Self::Range(p) => p,
            Self::Enumerated(p) => p,
            Self::ProgramSelector(p) => p,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn Controllable {
        match self {
            Self::Fixed(p) => p,
            Self::Toggle(p) => p,
            Self::Range(p) => p,
            Self::Enumerated(p) => p,
            Self::ProgramSelector(p) => p,
        }
    }
}

impl Controllable for ParameterDescriptor {
    fn entity_kind(&self) -> EntityKind {
        self.inner().entity_kind()
    }

    fn current_value(&self) -> Option<String> {
        self.inner().current_value()
    }

    fn options(&self) -> Vec<String> {
        self.inner().options()
    }

    fn set_value(&mut self, key: &str, value: &str) -> Result<(), ValueError> {
        self.inner_mut().set_value(key, value)
    }
}
