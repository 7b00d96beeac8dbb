// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Sensor address type.
//!
//! This module provides a type-safe representation of 1-Wire device
//! addresses, ensuring the lexical format is validated exactly once at
//! construction.

use std::fmt;
use std::str::FromStr;

use crate::error::AddressError;

/// Address of a physical device on the 1-Wire bus.
///
/// A 1-Wire address consists of a two-digit hexadecimal family code,
/// a dot, and a twelve-digit hexadecimal serial number, for example
/// `28.0000045C2D19`. An optional leading slash (as reported by owserver
/// directory listings) is accepted and stripped.
///
/// The canonical form is uppercase without the leading slash; equality and
/// hashing use the canonical form, so `10.67c6697351ff` and
/// `/10.67C6697351FF` compare equal.
///
/// # Examples
///
/// ```
/// use owire_lib::SensorAddress;
///
/// let address: SensorAddress = "10.67C6697351FF".parse().unwrap();
/// assert_eq!(address.family_code(), 0x10);
/// assert_eq!(address.to_string(), "10.67C6697351FF");
///
/// // Malformed addresses are rejected at construction
/// assert!("10.67C669".parse::<SensorAddress>().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SensorAddress(String);

impl SensorAddress {
    /// Creates a sensor address from its string form.
    ///
    /// # Errors
    ///
    /// Returns [`AddressError::Empty`] for an empty string and
    /// [`AddressError::Malformed`] if the string does not match the
    /// `XX.XXXXXXXXXXXX` format.
    pub fn new(address: &str) -> Result<Self, AddressError> {
        if address.is_empty() {
            return Err(AddressError::Empty);
        }

        let trimmed = address.strip_prefix('/').unwrap_or(address);
        let canonical = trimmed.to_ascii_uppercase();

        let mut parts = canonical.splitn(2, '.');
        let family = parts.next().unwrap_or_default();
        let serial = parts.next().unwrap_or_default();

        let family_ok = family.len() == 2 && family.bytes().all(|b| b.is_ascii_hexdigit());
        let serial_ok = serial.len() == 12 && serial.bytes().all(|b| b.is_ascii_hexdigit());

        if !family_ok || !serial_ok {
            return Err(AddressError::Malformed(address.to_string()));
        }

        Ok(Self(canonical))
    }

    /// Returns the canonical string form of the address.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the device family code.
    #[must_use]
    pub fn family_code(&self) -> u8 {
        u8::from_str_radix(&self.0[..2], 16).unwrap_or_default()
    }

    /// Returns the twelve-digit serial number part of the address.
    #[must_use]
    pub fn serial(&self) -> &str {
        &self.0[3..]
    }
}

impl fmt::Display for SensorAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for SensorAddress {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for SensorAddress {
    type Error = AddressError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<SensorAddress> for String {
    fn from(address: SensorAddress) -> Self {
        address.0
    }
}
