// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Bridge collaborator contract.
//!
//! The bridge is the thing providing shared bus access for its dependent
//! things. Its transport (the actual owserver client) is out of scope for
//! this library; the handler core only sees the synchronous call surface
//! defined here. Timeouts are a transport concern, so every call either
//! returns or fails with a [`ProtocolError`] on its own.

use std::sync::Arc;

use crate::address::SensorAddress;
use crate::channel::ChannelValue;
use crate::device::SensorType;
use crate::error::ProtocolError;

use super::thing::ThingId;

/// Tri-state presence signal of a device on the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresenceSignal {
    /// The device answered on the bus.
    Present,
    /// The device is known to be missing from the bus.
    Absent,
    /// Presence could not be determined (e.g. right after a bridge
    /// reconnect); forces a re-check on the next poll.
    Indeterminate,
}

/// One reading returned by a bus refresh: channel id and value.
pub type Reading = (String, ChannelValue);

/// Handle to the bridge serving this thing's bus.
///
/// Implemented by the host's bridge handler. All calls are synchronous
/// from the core's point of view; the bridge performs its own timeout
/// handling and reports failures as [`ProtocolError`].
pub trait BridgeHandle: Send + Sync {
    /// Resolves the sensor type of the device at `address`.
    ///
    /// # Errors
    ///
    /// Returns a [`ProtocolError`] if the bus request fails.
    fn resolve_type(&self, address: &SensorAddress) -> Result<SensorType, ProtocolError>;

    /// Checks whether the device at `address` currently answers on the bus.
    ///
    /// # Errors
    ///
    /// Returns a [`ProtocolError`] if the bus request fails.
    fn check_presence(&self, address: &SensorAddress) -> Result<PresenceSignal, ProtocolError>;

    /// Reads the given channels of the device at `address`.
    ///
    /// `forced` distinguishes a cold-start read from steady-state polling,
    /// so the bridge can bypass read caches on the first cycle.
    ///
    /// # Errors
    ///
    /// Returns a [`ProtocolError`] if the bus request fails.
    fn read_channels(
        &self,
        address: &SensorAddress,
        channels: &[String],
        forced: bool,
    ) -> Result<Vec<Reading>, ProtocolError>;

    /// Queues the thing for a property update on the bridge's refresh task.
    fn schedule_for_properties_update(&self, thing: &ThingId);
}

/// Host-side lookup of the bridge serving a thing.
///
/// A bridge thing can be configured while its handler is not up yet, so
/// the two questions are separate: [`bridge_exists`](Self::bridge_exists)
/// answers "is a bridge configured at all", [`bridge_handle`](Self::bridge_handle)
/// answers "is its handler available right now".
pub trait BridgeLookup: Send + Sync {
    /// Returns true if a bridge thing is configured for this thing.
    fn bridge_exists(&self) -> bool;

    /// Returns the bridge handler, if it is currently available.
    fn bridge_handle(&self) -> Option<Arc<dyn BridgeHandle>>;
}
