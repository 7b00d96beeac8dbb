// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-process sensor handle.

use tracing::trace;

use crate::address::SensorAddress;
use crate::channel::channels_for;
use crate::device::SensorType;
use crate::error::{ConfigError, ProtocolError};
use crate::host::{BridgeHandle, PresenceSignal, Reading};

/// The core's representative of one physical sensor element behind the
/// bridge.
///
/// A thing attaches one handle per sensor element of its device; simple
/// devices have exactly one, multisensor boards have several sharing one
/// bus address. Index 0 is the primary sensor and carries the presence
/// reading the whole device depends on.
///
/// Channels are enabled on a handle during reconciliation; a refresh only
/// reads the enabled set.
#[derive(Debug, Clone)]
pub struct BusSensor {
    address: SensorAddress,
    sensor_type: SensorType,
    index: usize,
    enabled_channels: Vec<String>,
}

impl BusSensor {
    /// Creates a sensor handle for the given address and resolved type.
    #[must_use]
    pub fn new(address: SensorAddress, sensor_type: SensorType, index: usize) -> Self {
        Self {
            address,
            sensor_type,
            index,
            enabled_channels: Vec::new(),
        }
    }

    /// Returns the bus address of this sensor.
    #[must_use]
    pub fn address(&self) -> &SensorAddress {
        &self.address
    }

    /// Returns the attachment index of this sensor (0 = primary).
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns the enabled channel ids, in enablement order.
    #[must_use]
    pub fn enabled_channels(&self) -> &[String] {
        &self.enabled_channels
    }

    /// Enables a channel on this sensor.
    ///
    /// Enabling the same channel twice is a no-op; refreshes read each
    /// enabled channel exactly once.
    pub fn enable_channel(&mut self, channel_id: &str) {
        if !self.enabled_channels.iter().any(|id| id == channel_id) {
            self.enabled_channels.push(channel_id.to_string());
        }
    }

    /// Validates the enabled channel set against the catalog.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownChannel`] if a channel was enabled
    /// that the resolved sensor type cannot provide.
    pub fn configure_channels(&self) -> Result<(), ConfigError> {
        for channel_id in &self.enabled_channels {
            let known = channels_for(self.sensor_type)
                .iter()
                .any(|spec| spec.channel_id == channel_id);
            if !known {
                return Err(ConfigError::UnknownChannel {
                    channel: channel_id.clone(),
                    sensor_type: self.sensor_type.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Checks presence of this sensor on the bus.
    ///
    /// # Errors
    ///
    /// Returns a [`ProtocolError`] if the bus request fails.
    pub fn check_presence(
        &self,
        bridge: &dyn BridgeHandle,
    ) -> Result<PresenceSignal, ProtocolError> {
        bridge.check_presence(&self.address)
    }

    /// Reads the enabled channels of this sensor from the bus.
    ///
    /// `forced` marks a cold-start read (first cycle after configuration
    /// or an explicit refresh request).
    ///
    /// # Errors
    ///
    /// Returns a [`ProtocolError`] if the bus request fails.
    pub fn refresh(
        &self,
        bridge: &dyn BridgeHandle,
        forced: bool,
    ) -> Result<Vec<Reading>, ProtocolError> {
        if self.enabled_channels.is_empty() {
            trace!(address = %self.address, "no channels enabled, skipping read");
            return Ok(Vec::new());
        }
        bridge.read_channels(&self.address, &self.enabled_channels, forced)
    }
}
