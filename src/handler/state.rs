// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-thing handler state.

use crate::device::{BusSensor, SensorType};

use super::refresh::PollGate;

/// Mutable per-thing state owned by the handler.
///
/// Created at handler construction, populated during configuration and
/// destroyed with the thing. Never shared across threads; the handler's
/// mutex serializes all access.
#[derive(Debug, Clone, Default)]
pub struct DeviceState {
    /// True once configuration and channel reconciliation completed.
    pub valid_config: bool,
    /// True if the thing exposes a presence channel.
    pub show_presence: bool,
    /// Sensor type resolved from the property bag, unset until discovery
    /// completed.
    pub sensor_type: Option<SensorType>,
    /// Attached sensor handles; index 0 is the primary sensor carrying
    /// the presence reading.
    pub sensors: Vec<BusSensor>,
    /// Refresh time gate.
    pub poll: PollGate,
    /// Set by `dispose`; guards scheduled callbacks from re-entering a
    /// disposed handler.
    pub disposed: bool,
}

impl DeviceState {
    /// Creates an empty state with the default poll interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resets the parts of the state that a reconfiguration rebuilds.
    ///
    /// Sensors are detached and the configuration is invalid until the
    /// next reconciliation pass completes.
    pub fn begin_reconfiguration(&mut self) {
        self.sensors.clear();
        self.sensor_type = None;
        self.valid_config = false;
    }

    /// Returns the primary sensor, if any sensors are attached.
    #[must_use]
    pub fn primary_sensor(&self) -> Option<&BusSensor> {
        self.sensors.first()
    }
}
