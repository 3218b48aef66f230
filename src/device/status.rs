// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Status summary and the delayed start helper.

use std::fmt;

use chrono::{DateTime, NaiveTime, TimeDelta, TimeZone};
use serde::Serialize;

use crate::error::Error;
use crate::parameter::{Controllable, DELAY_TIME};
use crate::state::{DRY_LEVEL, PROGRAM_CODE, SPIN_SPEED, TEMPERATURE};
use crate::types::EstimatedDuration;

use super::Appliance;

/// Hour of day a morning delay aims at.
pub const MORNING_HOUR: u32 = 9;

/// Granularity of the morning delay, in minutes.
pub const DELAY_STEP_MINUTES: i64 = 30;

/// Human-readable status of an appliance.
///
/// Fields are `None` when they do not apply: everything is empty while the
/// appliance is off, and the cycle fields are only filled while a program is
/// in progress.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatusAttributes {
    /// Machine mode code as shown to users.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    /// Active error code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Wash temperature, e.g. `40 °C`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<String>,
    /// Dryness level.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dry_level: Option<String>,
    /// Vendor program code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub program_name: Option<String>,
    /// Normalized program phase.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub program_phase: Option<String>,
    /// Spin speed, e.g. `1200 rpm`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spin_speed: Option<String>,
    /// Time left, `H:MM` or `N min`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining_time: Option<String>,
    /// Wall-clock end of the cycle, `HH:MM`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
}

/// Minutes from `now` to the next 09:00, floored to half hours.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use hon_lib::device::delay_until_morning;
///
/// let evening = Utc.with_ymd_and_hms(2024, 5, 1, 21, 10, 0).unwrap();
/// assert_eq!(delay_until_morning(&evening), 690);
/// ```
#[must_use]
pub fn delay_until_morning<Tz: TimeZone>(now: &DateTime<Tz>) -> u32 {
    let local = now.naive_local();
    let Some(nine) = NaiveTime::from_hms_opt(MORNING_HOUR, 0, 0) else {
        return 0;
    };
    let day = if local.time() < nine {
        Some(local.date())
    } else {
        local.date().succ_opt()
    };
    let Some(target) = day.map(|d| d.and_time(nine)) else {
        return 0;
    };
    let minutes = (target - local).num_minutes();
    u32::try_from(minutes / DELAY_STEP_MINUTES * DELAY_STEP_MINUTES).unwrap_or(0)
}

fn with_unit(value: Option<&str>, unit: &str) -> Option<String> {
    value.map(|v| format!("{v} {unit}"))
}

impl<T> Appliance<T> {
    /// Summarizes the state for display at `now`.
    #[must_use]
    pub fn status_attributes<Tz>(&self, now: &DateTime<Tz>) -> StatusAttributes
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        let mut status = StatusAttributes::default();
        if !self.is_on() {
            return status;
        }

        let state = &self.state;
        status.mode = state.machine_mode().map(|m| m.display_code().to_string());
        status.error = state.error_code().map(ToString::to_string);

        if !self.is_running() {
            return status;
        }

        status.temperature = with_unit(state.get(TEMPERATURE), "°C");
        status.spin_speed = with_unit(state.get(SPIN_SPEED), "rpm");
        status.dry_level = state.get(DRY_LEVEL).map(ToString::to_string);
        status.program_name = state.get(PROGRAM_CODE).map(ToString::to_string);
        status.program_phase = state.program_phase();

        if let Some(remaining) = state.remaining_minutes() {
            let remaining = EstimatedDuration::from_minutes(remaining);
            let delay = state.delay_minutes().unwrap_or(0);
            let end = now.clone()
                + TimeDelta::minutes(i64::from(delay))
                + remaining.as_time_delta();
            status.remaining_time = Some(remaining.to_string());
            status.end_time = Some(end.format("%H:%M").to_string());
        }
        status
    }

    /// Returns `true` when a delayed start is configured.
    #[must_use]
    pub fn delay_enabled(&self) -> bool {
        self.settings
            .get(DELAY_TIME)
            .and_then(Controllable::current_value)
            .and_then(|v| v.trim().parse::<i64>().ok())
            .is_some_and(|d| d > 0)
    }

    /// Returns `true` when the delay can be changed: the appliance is
    /// reachable and no program is in progress.
    #[must_use]
    pub fn can_change_delay(&self) -> bool {
        self.is_available() && !self.is_running()
    }

    /// Sets the delay so the program starts around 09:00.
    ///
    /// Returns `Ok(false)` if the appliance has no delay setting.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Value`] if the computed delay is beyond what the
    /// appliance accepts.
    pub fn set_morning_delay<Tz: TimeZone>(&mut self, now: &DateTime<Tz>) -> Result<bool, Error> {
        let minutes = delay_until_morning(now);
        self.set_current_program_param(DELAY_TIME, &minutes.to_string())
    }

    /// Removes the delay.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Value`] if the appliance's delay range excludes zero.
    pub fn clear_delay(&mut self) -> Result<bool, Error> {
        self.set_current_program_param(DELAY_TIME, "0")
    }
}
