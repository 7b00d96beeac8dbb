// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Thing status model.

use std::fmt;

/// Externally visible status of a thing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThingStatus {
    /// The handler has not been initialized yet.
    Uninitialized,
    /// The thing is reachable and delivering values.
    Online,
    /// The thing is not operational; see the status detail.
    Offline,
    /// The thing is configured but its reachability has not been
    /// established yet (awaiting the first successful presence check).
    Unknown,
}

/// Detail qualifying a thing status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StatusDetail {
    /// No additional detail.
    None,
    /// The configuration is incomplete or invalid; terminal until the
    /// thing is reconfigured.
    ConfigurationError,
    /// Bus communication failed; cleared by the next successful poll.
    CommunicationError,
    /// The parent bridge is offline; cleared when it reports online.
    BridgeOffline,
}

/// Status, detail and optional human-readable description of a thing.
#[derive(Debug, Clone, PartialEq, Eq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct StatusInfo {
    /// The status itself.
    pub status: ThingStatus,
    /// Qualifying detail.
    pub detail: StatusDetail,
    /// Human-readable reason, if any.
    pub description: Option<String>,
}

impl StatusInfo {
    /// Creates a status info without description.
    #[must_use]
    pub fn new(status: ThingStatus, detail: StatusDetail) -> Self {
        Self {
            status,
            detail,
            description: None,
        }
    }

    /// Creates a status info with a human-readable description.
    #[must_use]
    pub fn with_description(
        status: ThingStatus,
        detail: StatusDetail,
        description: impl Into<String>,
    ) -> Self {
        Self {
            status,
            detail,
            description: Some(description.into()),
        }
    }

    /// Shorthand for `Online` without detail.
    #[must_use]
    pub fn online() -> Self {
        Self::new(ThingStatus::Online, StatusDetail::None)
    }

    /// Shorthand for `Unknown` without detail.
    #[must_use]
    pub fn unknown() -> Self {
        Self::new(ThingStatus::Unknown, StatusDetail::None)
    }
}

impl Default for StatusInfo {
    fn default() -> Self {
        Self::new(ThingStatus::Uninitialized, StatusDetail::None)
    }
}

impl fmt::Display for StatusInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}/{:?}", self.status, self.detail)?;
        if let Some(description) = &self.description {
            write!(f, " ({description})")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_uninitialized() {
        let info = StatusInfo::default();
        assert_eq!(info.status, ThingStatus::Uninitialized);
        assert_eq!(info.detail, StatusDetail::None);
        assert!(info.description.is_none());
    }

    #[test]
    fn display_includes_description() {
        let info = StatusInfo::with_description(
            ThingStatus::Offline,
            StatusDetail::CommunicationError,
            "slave missing",
        );
        assert_eq!(
            info.to_string(),
            "Offline/CommunicationError (slave missing)"
        );
    }
}
