// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `owire` Lib - thing handlers for 1-Wire sensors.
//!
//! This library implements the per-device lifecycle core of a 1-Wire
//! binding for a home-automation host: configuration validation, property
//! discovery with fixed-interval retry, channel reconciliation against a
//! sensor-type catalog, presence-driven status transitions and a
//! time-gated poll cycle.
//!
//! The host framework's registry, scheduler, state layer and the actual
//! owserver transport stay outside; they plug in through the collaborator
//! contracts in [`host`].
//!
//! # Supported Devices
//!
//! - **Thermometers**: DS18B20, DS18S20, DS1822
//! - **Switches/IO**: DS2406, DS2408, DS2413
//! - **Counters**: DS2423
//! - **Battery monitor**: DS2438
//! - **Multisensors**: MS-TH, BMS (DS2438-based boards)
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use owire_lib::SensorType;
//! use owire_lib::handler::ThingHandler;
//! use owire_lib::host::{
//!     BridgeLookup, ConfigMap, Scheduler, StateSink, Thing, ThingId, TokioScheduler,
//! };
//!
//! # fn host_collaborators() -> (Arc<dyn BridgeLookup>, Arc<dyn StateSink>) {
//! #     unimplemented!()
//! # }
//! #[tokio::main]
//! async fn main() {
//!     let (bridges, sink) = host_collaborators();
//!     let scheduler = Arc::new(TokioScheduler::new());
//!
//!     let mut config = ConfigMap::new();
//!     config.insert("id".to_string(), serde_json::json!("28.0000045C2D19"));
//!     let thing = Thing::new(ThingId::from("owire:temperature:kitchen"), config);
//!
//!     let handler = ThingHandler::new(
//!         thing,
//!         &[SensorType::Ds18b20, SensorType::Ds18s20, SensorType::Ds1822],
//!         bridges,
//!         scheduler,
//!         sink,
//!     )
//!     .into_shared();
//!
//!     // The host calls this on thing creation and again after property
//!     // discovery resolved the model.
//!     ThingHandler::initialize(&handler);
//!
//!     // The bridge then drives `refresh(bridge, now)` on its cadence.
//! }
//! ```

mod address;
pub mod channel;
mod device;
pub mod error;
pub mod handler;
pub mod host;

pub use address::SensorAddress;
pub use channel::{CHANNEL_PRESENT, Channel, ChannelConfig, ChannelSpec, ChannelValue, ValueKind};
pub use device::{BusSensor, SensorType, UnknownSensorType};
pub use error::{AddressError, ConfigError, ProtocolError};
pub use handler::{DeviceState, PollGate, SharedThingHandler, ThingHandler};
pub use host::{
    BridgeHandle, BridgeLookup, PresenceSignal, Scheduler, StateSink, StatusDetail, StatusInfo,
    Thing, ThingId, ThingStatus, TokioScheduler,
};
