// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Host-registry view of a thing.
//!
//! The registry itself is owned by the host framework; this module models
//! the surface the handler core needs: the configuration map, the channel
//! set, the property bag and the status triple.

use std::collections::BTreeMap;
use std::fmt;

use crate::channel::Channel;

use super::status::{StatusDetail, StatusInfo, ThingStatus};

/// Property key for the device model, written during property discovery.
pub const PROPERTY_MODEL_ID: &str = "modelId";

/// Property key for the device vendor, written during property discovery.
pub const PROPERTY_VENDOR: &str = "vendor";

/// Configuration key holding the sensor address string.
pub const CONFIG_ID: &str = "id";

/// Configuration key holding the refresh interval in seconds.
pub const CONFIG_REFRESH: &str = "refresh";

/// Raw configuration map as stored by the host: string keys to primitive
/// JSON values.
pub type ConfigMap = BTreeMap<String, serde_json::Value>;

/// Unique identifier of a thing within the host registry.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct ThingId(String);

impl ThingId {
    /// Creates a thing id from its string form, e.g. `owire:temperature:kitchen`.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the string form of the id.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ThingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ThingId({})", self.0)
    }
}

impl fmt::Display for ThingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ThingId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// A host-managed thing, as visible to the handler core.
///
/// The core reads the configuration, replaces the channel set during
/// reconciliation, updates the property bag during discovery and drives
/// the status.
#[derive(Debug, Clone)]
pub struct Thing {
    id: ThingId,
    configuration: ConfigMap,
    channels: Vec<Channel>,
    properties: BTreeMap<String, String>,
    status: StatusInfo,
}

impl Thing {
    /// Creates a thing with the given id and configuration, no channels,
    /// an empty property bag and uninitialized status.
    #[must_use]
    pub fn new(id: ThingId, configuration: ConfigMap) -> Self {
        Self {
            id,
            configuration,
            channels: Vec::new(),
            properties: BTreeMap::new(),
            status: StatusInfo::default(),
        }
    }

    /// Returns the thing id.
    #[must_use]
    pub fn id(&self) -> &ThingId {
        &self.id
    }

    /// Returns the raw configuration map.
    #[must_use]
    pub fn configuration(&self) -> &ConfigMap {
        &self.configuration
    }

    /// Replaces the configuration map.
    pub fn set_configuration(&mut self, configuration: ConfigMap) {
        self.configuration = configuration;
    }

    /// Returns the channel with the given id, if present.
    #[must_use]
    pub fn channel(&self, channel_id: &str) -> Option<&Channel> {
        self.channels.iter().find(|channel| channel.id == channel_id)
    }

    /// Returns the full channel set.
    #[must_use]
    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    /// Replaces the full channel set.
    pub fn replace_channels(&mut self, channels: Vec<Channel>) {
        self.channels = channels;
    }

    /// Adds a channel, replacing any existing channel with the same id.
    pub fn add_channel(&mut self, channel: Channel) {
        self.remove_channel(&channel.id.clone());
        self.channels.push(channel);
    }

    /// Removes the channel with the given id, returning it if it existed.
    pub fn remove_channel(&mut self, channel_id: &str) -> Option<Channel> {
        let index = self
            .channels
            .iter()
            .position(|channel| channel.id == channel_id)?;
        Some(self.channels.remove(index))
    }

    /// Returns the property bag.
    #[must_use]
    pub fn properties(&self) -> &BTreeMap<String, String> {
        &self.properties
    }

    /// Returns the property with the given key, if present.
    #[must_use]
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    /// Inserts or replaces a property.
    pub fn set_property(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.properties.insert(key.into(), value.into());
    }

    /// Returns the current status.
    #[must_use]
    pub fn status(&self) -> &StatusInfo {
        &self.status
    }

    /// Sets the status without description.
    pub fn set_status(&mut self, status: ThingStatus, detail: StatusDetail) {
        self.status = StatusInfo::new(status, detail);
    }

    /// Sets the full status triple at once.
    pub fn set_status_info(&mut self, status: StatusInfo) {
        self.status = status;
    }

    /// Sets the status with a human-readable description.
    pub fn set_status_with_description(
        &mut self,
        status: ThingStatus,
        detail: StatusDetail,
        description: impl Into<String>,
    ) {
        self.status = StatusInfo::with_description(status, detail, description);
    }
}
