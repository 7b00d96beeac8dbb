// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Thing configuration validation.
//!
//! A pure function of the raw configuration map plus two flags the caller
//! derives from the registry (bridge configured, presence channel exposed).
//! No network or scheduler access; the caller turns a failure into an
//! offline/configuration-error status.

use std::time::Duration;

use crate::address::SensorAddress;
use crate::error::ConfigError;
use crate::host::{CONFIG_ID, CONFIG_REFRESH, ConfigMap};

use super::refresh::PollGate;

/// Result of a successful configuration validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedConfig {
    /// The validated sensor address.
    pub address: SensorAddress,
    /// Refresh interval; defaults to 300 s when not configured.
    pub refresh_interval: Duration,
    /// True if the thing exposes a presence channel.
    pub show_presence: bool,
}

/// Validates a raw thing configuration.
///
/// The refresh interval is read from the `refresh` key in seconds; a
/// missing or non-numeric value falls back to the default. The address is
/// the only field that can fail validation on its own.
///
/// # Errors
///
/// - [`ConfigError::BridgeMissing`] if no bridge is configured,
/// - [`ConfigError::AddressMissing`] if the `id` key is absent or not a
///   string,
/// - [`ConfigError::AddressMalformed`] if the address does not parse.
pub fn validate(
    configuration: &ConfigMap,
    bridge_exists: bool,
    has_present_channel: bool,
) -> Result<ValidatedConfig, ConfigError> {
    if !bridge_exists {
        return Err(ConfigError::BridgeMissing);
    }

    let address = match configuration.get(CONFIG_ID).and_then(|value| value.as_str()) {
        Some(raw) => SensorAddress::new(raw)?,
        None => return Err(ConfigError::AddressMissing),
    };

    let refresh_interval = configuration
        .get(CONFIG_REFRESH)
        .and_then(serde_json::Value::as_u64)
        .map_or(PollGate::DEFAULT_INTERVAL, Duration::from_secs);

    Ok(ValidatedConfig {
        address,
        refresh_interval,
        show_presence: has_present_channel,
    })
}
