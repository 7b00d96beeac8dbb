// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Thing handler core: configuration, discovery, reconciliation,
//! presence and the poll cycle.
//!
//! # Lifecycle
//!
//! The host drives a handler through a fixed sequence:
//!
//! 1. [`ThingHandler::initialize`] validates the configuration
//!    ([`config::validate`]) and attaches sensors. When required
//!    properties are absent, [`discover_properties`] takes over and the
//!    host re-runs initialization once the bridge resolved them.
//! 2. Channel reconciliation ([`reconcile`]) aligns the thing's channel
//!    set with the catalog for the resolved type, then marks the
//!    configuration valid and the status unknown/none.
//! 3. The bridge invokes [`ThingHandler::refresh`] on its cadence; the
//!    [`PollGate`] decides whether a cycle runs, presence gates the rest
//!    of it, and readings flow back through the state sink.

pub mod config;
mod discovery;
pub mod presence;
pub mod reconcile;
mod refresh;
mod state;
mod thing_handler;

pub use config::{ValidatedConfig, validate};
pub use discovery::{PROPERTY_RETRY_DELAY, discover_properties};
pub use presence::{PresenceOutcome, transition};
pub use reconcile::{ConfigOverrides, PlannedChannel, ReconcilePlan};
pub use refresh::PollGate;
pub use state::DeviceState;
pub use thing_handler::{DEFAULT_REQUIRED_PROPERTIES, SharedThingHandler, ThingHandler};
