// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `owire` library.
//!
//! This module provides the error types for handling failures across the
//! library: address validation, thing configuration, and bus communication
//! through the bridge. Each concern carries its own enum; the handler
//! converts them into status transitions at its boundary, so nothing
//! propagates past the public operations.

use thiserror::Error;

/// Errors related to sensor address validation.
///
/// These errors occur when attempting to construct a [`SensorAddress`]
/// from a string that does not match the 1-Wire address format.
///
/// [`SensorAddress`]: crate::SensorAddress
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AddressError {
    /// The address string is empty.
    #[error("address is empty")]
    Empty,

    /// The address does not match the `XX.XXXXXXXXXXXX` format.
    #[error("address {0:?} does not match the 1-Wire format")]
    Malformed(String),
}

/// Errors related to thing configuration.
///
/// Configuration errors are terminal until the thing is reconfigured;
/// the handler converts them into an offline/configuration-error status.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// No sensor address was configured.
    #[error("sensor id missing")]
    AddressMissing,

    /// The configured sensor address is malformed.
    #[error("sensor id format mismatch: {0}")]
    AddressMalformed(#[from] AddressError),

    /// The thing has no bridge configured.
    #[error("bridge missing")]
    BridgeMissing,

    /// The resolved sensor type is not supported by this thing type.
    #[error("sensor type {0} not supported by this thing type")]
    UnsupportedSensorType(String),

    /// One or more required properties are absent from the property bag.
    #[error("required properties missing")]
    PropertiesMissing,

    /// A channel was enabled that the resolved sensor type cannot provide.
    #[error("channel {channel} not provided by sensor type {sensor_type}")]
    UnknownChannel {
        /// The offending channel id.
        channel: String,
        /// The resolved sensor type.
        sensor_type: String,
    },
}

/// Errors raised by the bridge handle during bus communication.
///
/// The transport layer performs its own timeout handling; the core treats
/// any of these as a single synchronous outcome and converts it into an
/// offline/communication-error status at the handler boundary.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// The owserver connection is not available.
    #[error("owserver connection failed: {0}")]
    ConnectionFailed(String),

    /// The bus request timed out.
    #[error("bus request timed out after {0} ms")]
    Timeout(u64),

    /// The device did not answer on the bus.
    #[error("no answer from device {0}")]
    NoAnswer(String),

    /// The owserver returned an error for the request.
    #[error("owserver error: {0}")]
    Server(String),
}
