// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Channel reconciliation.
//!
//! Computes the diff between a thing's current channel set and the wanted
//! set for its resolved sensor type, then applies it as a batch: removals
//! first, creations second. A channel whose type id no longer matches its
//! spec is removed and recreated, carrying its configuration over unless
//! an explicit override is supplied.
//!
//! The presence channel is owned by the thing definition rather than the
//! sensor catalog and is left alone.

use std::collections::BTreeMap;

use tracing::debug;

use crate::channel::{CHANNEL_PRESENT, Channel, ChannelConfig, ChannelSpec};
use crate::host::Thing;

/// Per-channel configuration overrides, keyed by channel id.
///
/// When a channel is (re)created and an override is present, the override
/// wins over any configuration preserved from the replaced channel.
pub type ConfigOverrides = BTreeMap<String, ChannelConfig>;

/// A channel scheduled for creation, with the configuration it will carry.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedChannel {
    /// The catalog spec to create the channel from.
    pub spec: ChannelSpec,
    /// Configuration for the new channel.
    pub configuration: ChannelConfig,
}

/// The full diff of one reconciliation pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReconcilePlan {
    /// Channel ids to remove, including those about to be recreated.
    pub remove: Vec<String>,
    /// Channels to create after the removals.
    pub create: Vec<PlannedChannel>,
}

impl ReconcilePlan {
    /// Returns true if the pass would not change the thing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.remove.is_empty() && self.create.is_empty()
    }
}

/// Computes the reconciliation plan without overrides.
#[must_use]
pub fn plan(existing: &[Channel], wanted: &[ChannelSpec]) -> ReconcilePlan {
    plan_with_overrides(existing, wanted, &ConfigOverrides::new())
}

/// Computes the reconciliation plan, applying configuration overrides to
/// (re)created channels.
#[must_use]
pub fn plan_with_overrides(
    existing: &[Channel],
    wanted: &[ChannelSpec],
    overrides: &ConfigOverrides,
) -> ReconcilePlan {
    let mut result = ReconcilePlan::default();

    for channel in existing {
        if channel.id == CHANNEL_PRESENT {
            continue;
        }
        let is_wanted = wanted.iter().any(|spec| spec.channel_id == channel.id);
        if !is_wanted {
            result.remove.push(channel.id.clone());
        }
    }

    for spec in wanted {
        let current = existing.iter().find(|channel| channel.id == spec.channel_id);
        match current {
            Some(channel) if channel.channel_type_id == spec.channel_type_id => {
                // Channel is up to date; an override alone does not force
                // a recreate.
            }
            Some(channel) => {
                // Type changed: remove before recreate, preserve the old
                // configuration unless overridden.
                result.remove.push(channel.id.clone());
                let configuration = overrides
                    .get(spec.channel_id)
                    .cloned()
                    .unwrap_or_else(|| channel.configuration.clone());
                result.create.push(PlannedChannel {
                    spec: *spec,
                    configuration,
                });
            }
            None => {
                let configuration = overrides.get(spec.channel_id).cloned().unwrap_or_default();
                result.create.push(PlannedChannel {
                    spec: *spec,
                    configuration,
                });
            }
        }
    }

    result
}

/// Applies a plan to the thing: all removals, then all creations.
pub fn apply(thing: &mut Thing, plan: ReconcilePlan) {
    if plan.is_empty() {
        return;
    }

    debug!(
        thing = %thing.id(),
        removed = plan.remove.len(),
        created = plan.create.len(),
        "reconciling channels"
    );

    for channel_id in &plan.remove {
        thing.remove_channel(channel_id);
    }
    for planned in plan.create {
        thing.add_channel(Channel::from_spec(&planned.spec, planned.configuration));
    }
}
