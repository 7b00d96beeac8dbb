// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Presence status machine.
//!
//! Maps the tri-state presence signal onto the thing's externally visible
//! status and, when the thing exposes a presence channel, onto the value
//! to publish there. Invoked from the poll cycle and from bridge-status
//! propagation; the transition itself is pure.

use crate::channel::ChannelValue;
use crate::host::{PresenceSignal, StatusDetail, StatusInfo, ThingStatus};

/// Result of a presence transition: the status to apply and the optional
/// presence-channel update.
#[derive(Debug, Clone, PartialEq)]
pub struct PresenceOutcome {
    /// Status to set on the thing.
    pub status: StatusInfo,
    /// Value for the presence channel, if the thing exposes one.
    pub presence_update: Option<ChannelValue>,
}

/// Computes the status transition for a presence signal.
///
/// `Present` is the only path to `Online`; configuration and
/// reconciliation leave a thing at `Unknown` until its first successful
/// presence check.
#[must_use]
pub fn transition(signal: PresenceSignal, show_presence: bool) -> PresenceOutcome {
    let (status, channel_value) = match signal {
        PresenceSignal::Present => (StatusInfo::online(), ChannelValue::On),
        PresenceSignal::Absent => (
            StatusInfo::with_description(
                ThingStatus::Offline,
                StatusDetail::CommunicationError,
                "slave missing",
            ),
            ChannelValue::Off,
        ),
        PresenceSignal::Indeterminate => (StatusInfo::unknown(), ChannelValue::Undef),
    };

    PresenceOutcome {
        status,
        presence_update: show_presence.then_some(channel_value),
    }
}
