// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Host-framework collaborator contracts.
//!
//! The thing/channel registry, the bridge transport, the scheduler and the
//! state sink are owned by the host framework. This module defines the
//! surface the handler core relies on: an in-memory [`Thing`] view of the
//! registry, the [`BridgeHandle`]/[`BridgeLookup`] traits, the one-shot
//! [`Scheduler`], and the [`StateSink`] that carries channel updates back
//! into the host.

mod bridge;
mod scheduler;
mod sink;
mod status;
mod thing;

pub use bridge::{BridgeHandle, BridgeLookup, PresenceSignal, Reading};
pub use scheduler::{Scheduler, Task, TokioScheduler};
pub use sink::StateSink;
pub use status::{StatusDetail, StatusInfo, ThingStatus};
pub use thing::{
    CONFIG_ID, CONFIG_REFRESH, ConfigMap, PROPERTY_MODEL_ID, PROPERTY_VENDOR, Thing, ThingId,
};
