// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Sensor type enumeration.

use std::fmt;
use std::str::FromStr;

/// Type of a 1-Wire device, as resolved from the bus.
///
/// Covers the Dallas/Maxim parts supported by this library plus the
/// DS2438-based multisensor boards (`MS-TH`, `BMS`) that combine several
/// chips behind one address.
///
/// The string form matches the `modelId` property written during property
/// discovery, so a thing can be reconfigured from its stored property bag
/// without touching the bus again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(serde::Serialize, serde::Deserialize)]
pub enum SensorType {
    /// DS18B20 digital thermometer.
    Ds18b20,
    /// DS18S20 digital thermometer.
    Ds18s20,
    /// DS1822 digital thermometer.
    Ds1822,
    /// DS2401 silicon serial number (presence only).
    Ds2401,
    /// DS2406 dual addressable switch.
    Ds2406,
    /// DS2408 8-channel addressable switch.
    Ds2408,
    /// DS2413 dual channel switch.
    Ds2413,
    /// DS2423 dual counter.
    Ds2423,
    /// DS2438 battery monitor.
    Ds2438,
    /// Temperature/humidity multisensor based on a DS2438.
    MsTh,
    /// Battery multisensor: DS2438 plus an auxiliary DS18B20.
    Bms,
}

impl SensorType {
    /// Returns the model string as written into the `modelId` property.
    #[must_use]
    pub fn model_id(self) -> &'static str {
        match self {
            Self::Ds18b20 => "DS18B20",
            Self::Ds18s20 => "DS18S20",
            Self::Ds1822 => "DS1822",
            Self::Ds2401 => "DS2401",
            Self::Ds2406 => "DS2406",
            Self::Ds2408 => "DS2408",
            Self::Ds2413 => "DS2413",
            Self::Ds2423 => "DS2423",
            Self::Ds2438 => "DS2438",
            Self::MsTh => "MS-TH",
            Self::Bms => "BMS",
        }
    }
}

impl fmt::Display for SensorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.model_id())
    }
}

/// Error returned when a model string does not name a known sensor type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sensor type {0:?}")]
pub struct UnknownSensorType(pub String);

impl FromStr for SensorType {
    type Err = UnknownSensorType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DS18B20" => Ok(Self::Ds18b20),
            "DS18S20" => Ok(Self::Ds18s20),
            "DS1822" => Ok(Self::Ds1822),
            "DS2401" => Ok(Self::Ds2401),
            "DS2406" => Ok(Self::Ds2406),
            "DS2408" => Ok(Self::Ds2408),
            "DS2413" => Ok(Self::Ds2413),
            "DS2423" => Ok(Self::Ds2423),
            "DS2438" => Ok(Self::Ds2438),
            "MS-TH" => Ok(Self::MsTh),
            "BMS" => Ok(Self::Bms),
            other => Err(UnknownSensorType(other.to_string())),
        }
    }
}
