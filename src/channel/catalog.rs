// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Static mapping from sensor type to the channels it must expose.

use crate::device::SensorType;

use super::ValueKind;

/// Spec of one channel a sensor type is expected to expose.
///
/// The catalog is the source of truth for channel reconciliation: after a
/// successful reconciliation pass, a thing's channel set equals exactly the
/// set of specs returned by [`channels_for`] for its resolved type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelSpec {
    /// Channel id, unique within the thing.
    pub channel_id: &'static str,
    /// Channel type id; a mismatch against an existing channel forces
    /// remove-and-recreate.
    pub channel_type_id: &'static str,
    /// Kind of value the channel accepts.
    pub accepted_kind: ValueKind,
    /// Display label, applied only when set.
    pub label: Option<&'static str>,
    /// Index of the attached sensor that feeds this channel.
    pub sensor_index: usize,
}

impl ChannelSpec {
    const fn number(channel_id: &'static str, channel_type_id: &'static str) -> Self {
        Self {
            channel_id,
            channel_type_id,
            accepted_kind: ValueKind::Number,
            label: None,
            sensor_index: 0,
        }
    }

    const fn switch(channel_id: &'static str, channel_type_id: &'static str) -> Self {
        Self {
            channel_id,
            channel_type_id,
            accepted_kind: ValueKind::Switch,
            label: None,
            sensor_index: 0,
        }
    }

    const fn with_label(mut self, label: &'static str) -> Self {
        self.label = Some(label);
        self
    }

    const fn on_sensor(mut self, sensor_index: usize) -> Self {
        self.sensor_index = sensor_index;
        self
    }
}

const TEMPERATURE: ChannelSpec =
    ChannelSpec::number("temperature", "owire:temperature").with_label("Temperature");
const HUMIDITY: ChannelSpec = ChannelSpec::number("humidity", "owire:humidity").with_label("Humidity");
const VOLTAGE: ChannelSpec = ChannelSpec::number("voltage", "owire:voltage").with_label("Voltage");
const CURRENT: ChannelSpec = ChannelSpec::number("current", "owire:current").with_label("Current");
const COUNTER0: ChannelSpec = ChannelSpec::number("counter0", "owire:counter").with_label("Counter 0");
const COUNTER1: ChannelSpec = ChannelSpec::number("counter1", "owire:counter").with_label("Counter 1");

const DIGITAL: [ChannelSpec; 8] = [
    ChannelSpec::switch("digital0", "owire:dio"),
    ChannelSpec::switch("digital1", "owire:dio"),
    ChannelSpec::switch("digital2", "owire:dio"),
    ChannelSpec::switch("digital3", "owire:dio"),
    ChannelSpec::switch("digital4", "owire:dio"),
    ChannelSpec::switch("digital5", "owire:dio"),
    ChannelSpec::switch("digital6", "owire:dio"),
    ChannelSpec::switch("digital7", "owire:dio"),
];

const THERMOMETER_CHANNELS: [ChannelSpec; 1] = [TEMPERATURE];
const DUAL_SWITCH_CHANNELS: [ChannelSpec; 2] = [DIGITAL[0], DIGITAL[1]];
const COUNTER_CHANNELS: [ChannelSpec; 2] = [COUNTER0, COUNTER1];
const DS2438_CHANNELS: [ChannelSpec; 4] = [TEMPERATURE, HUMIDITY, VOLTAGE, CURRENT];
const MS_TH_CHANNELS: [ChannelSpec; 2] = [TEMPERATURE, HUMIDITY];
// BMS: temperature comes from the auxiliary DS18B20 (sensor 1), the rest
// from the DS2438 (sensor 0).
const BMS_CHANNELS: [ChannelSpec; 4] = [
    TEMPERATURE.on_sensor(1),
    HUMIDITY,
    VOLTAGE,
    CURRENT,
];

/// Returns the channels a sensor type must expose, in catalog order.
#[must_use]
pub fn channels_for(sensor_type: SensorType) -> &'static [ChannelSpec] {
    match sensor_type {
        SensorType::Ds18b20 | SensorType::Ds18s20 | SensorType::Ds1822 => &THERMOMETER_CHANNELS,
        SensorType::Ds2401 => &[],
        SensorType::Ds2406 | SensorType::Ds2413 => &DUAL_SWITCH_CHANNELS,
        SensorType::Ds2408 => &DIGITAL,
        SensorType::Ds2423 => &COUNTER_CHANNELS,
        SensorType::Ds2438 => &DS2438_CHANNELS,
        SensorType::MsTh => &MS_TH_CHANNELS,
        SensorType::Bms => &BMS_CHANNELS,
    }
}

/// Returns how many sensor handles a thing of this type attaches.
///
/// Index 0 is always the primary sensor carrying the presence reading.
#[must_use]
pub fn sensor_count(sensor_type: SensorType) -> usize {
    match sensor_type {
        SensorType::Bms => 2,
        _ => 1,
    }
}
