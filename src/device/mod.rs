// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device-side types: sensor type enumeration and the in-process sensor
//! handle attached to a thing.

mod bus_sensor;
mod sensor_type;

pub use bus_sensor::BusSensor;
pub use sensor_type::{SensorType, UnknownSensorType};
