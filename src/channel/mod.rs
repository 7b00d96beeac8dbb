// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Channel model and the sensor-type channel catalog.
//!
//! A channel is a typed, named slot on a thing carrying one data point.
//! The core never mutates a channel in place: when a channel's type needs
//! to change it is removed and recreated, carrying its configuration over.

mod catalog;

use std::collections::BTreeMap;

pub use catalog::{ChannelSpec, channels_for, sensor_count};

/// Id of the presence channel, exposed by things that want to surface
/// bus-presence as a data point of their own.
pub const CHANNEL_PRESENT: &str = "present";

/// Kind of value a channel accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    /// Numeric readings (temperature, humidity, counters).
    Number,
    /// Binary on/off states (digital I/O, presence).
    Switch,
}

/// A value published to a channel.
///
/// `Undef` models the host's undefined state: the channel exists but its
/// value is currently unknown (for example presence after a bridge
/// reconnect, before the next poll has run).
#[derive(Debug, Clone, PartialEq)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelValue {
    /// Switch-like channel is on.
    On,
    /// Switch-like channel is off.
    Off,
    /// Numeric reading.
    Decimal(f64),
    /// Value is currently unknown.
    Undef,
}

/// Per-channel configuration, preserved across channel recreation.
pub type ChannelConfig = BTreeMap<String, serde_json::Value>;

/// A channel as seen by the host registry.
///
/// Identified by its id within the owning thing. The core treats channels
/// as read/replace: reconciliation removes and recreates them, it never
/// edits one in place.
#[derive(Debug, Clone, PartialEq)]
pub struct Channel {
    /// Channel id, unique within the thing.
    pub id: String,
    /// Channel type id, used to detect stale channels after a type change.
    pub channel_type_id: String,
    /// Kind of value the channel accepts.
    pub accepted_kind: ValueKind,
    /// Optional display label.
    pub label: Option<String>,
    /// Channel configuration.
    pub configuration: ChannelConfig,
}

impl Channel {
    /// Creates a channel from a catalog spec, with the given configuration.
    ///
    /// The spec's label is applied only if the spec defines one.
    #[must_use]
    pub fn from_spec(spec: &ChannelSpec, configuration: ChannelConfig) -> Self {
        Self {
            id: spec.channel_id.to_string(),
            channel_type_id: spec.channel_type_id.to_string(),
            accepted_kind: spec.accepted_kind,
            label: spec.label.map(str::to_string),
            configuration,
        }
    }
}
