// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! State-update sink contract.

use crate::channel::ChannelValue;

use super::thing::ThingId;

/// Sink receiving channel state updates from the handler core.
///
/// Implemented by the host's item/state layer. The handler verifies the
/// channel exists on the thing before posting; the sink itself never fails
/// and is free to drop updates for channels it does not know.
pub trait StateSink: Send + Sync {
    /// Publishes a new value for `channel_id` on `thing`.
    fn post_update(&self, thing: &ThingId, channel_id: &str, value: ChannelValue);
}
