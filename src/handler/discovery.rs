// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Property discovery with fixed-interval retry.
//!
//! Invoked when required properties are absent from a thing's property
//! bag. Each invocation either hands the thing to the bridge for a
//! property update or schedules exactly one retry; there is no internal
//! loop and no backoff growth. The retry task holds only a weak reference
//! to the handler and checks the disposed flag, because a pending task has
//! no cancellation and may fire after the thing is gone.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::host::{StatusDetail, ThingStatus};

use super::thing_handler::{SharedThingHandler, ThingHandler};

/// Delay between discovery retries while the bridge handler is not up.
pub const PROPERTY_RETRY_DELAY: Duration = Duration::from_millis(5000);

/// Runs one step of the property discovery process.
///
/// - No bridge configured: offline/configuration-error "bridge missing",
///   done (reconfiguration is the only way out).
/// - Bridge configured but its handler not available: offline/
///   configuration-error "bridge not ready", one retry scheduled after
///   [`PROPERTY_RETRY_DELAY`].
/// - Bridge handler available: the conservative "required properties
///   missing" status is set even though resolution is about to proceed,
///   and the thing is queued on the bridge. The host re-runs
///   initialization once the bridge has written the properties.
pub fn discover_properties(handler: &SharedThingHandler) {
    let mut guard = handler.lock();
    if guard.state().disposed {
        return;
    }

    if !guard.bridge_exists() {
        guard.thing_mut().set_status_with_description(
            ThingStatus::Offline,
            StatusDetail::ConfigurationError,
            "bridge missing",
        );
        return;
    }

    match guard.bridge_handle() {
        Some(bridge) => {
            guard.thing_mut().set_status_with_description(
                ThingStatus::Offline,
                StatusDetail::ConfigurationError,
                ThingHandler::PROPERTIES_MISSING_DESCRIPTION,
            );
            bridge.schedule_for_properties_update(guard.thing().id());
        }
        None => {
            debug!(
                thing = %guard.thing().id(),
                delay_ms = PROPERTY_RETRY_DELAY.as_millis(),
                "bridge handler not available for property update, retrying"
            );
            guard.thing_mut().set_status_with_description(
                ThingStatus::Offline,
                StatusDetail::ConfigurationError,
                "bridge not ready",
            );

            let scheduler = guard.scheduler();
            let weak = Arc::downgrade(handler);
            drop(guard);
            scheduler.schedule_once(
                PROPERTY_RETRY_DELAY,
                Box::new(move || {
                    if let Some(handler) = weak.upgrade() {
                        discover_properties(&handler);
                    }
                }),
            );
        }
    }
}
