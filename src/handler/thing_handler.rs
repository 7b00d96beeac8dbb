// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Thing handler orchestration.
//!
//! One handler instance per thing, shared behind a mutex so scheduler
//! callbacks can re-enter it. The generic configure/reconcile/refresh
//! logic lives here, parameterized by the supported-type set and the
//! channel catalog; there is no per-device-family subclassing.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, trace, warn};

use crate::address::SensorAddress;
use crate::channel::{CHANNEL_PRESENT, ChannelValue, channels_for, sensor_count};
use crate::device::{BusSensor, SensorType};
use crate::error::{ConfigError, ProtocolError};
use crate::host::{
    BridgeHandle, BridgeLookup, PROPERTY_MODEL_ID, PROPERTY_VENDOR, PresenceSignal, Scheduler,
    StateSink, StatusDetail, Thing, ThingStatus,
};

use super::discovery;
use super::presence;
use super::reconcile::{self, ConfigOverrides};
use super::state::DeviceState;

/// Property keys that must exist before channel reconciliation may run.
pub const DEFAULT_REQUIRED_PROPERTIES: [&str; 2] = [PROPERTY_MODEL_ID, PROPERTY_VENDOR];

/// Vendor written into the property bag during discovery.
const VENDOR_NAME: &str = "Dallas/Maxim";

/// A thing handler shared with the host scheduler.
pub type SharedThingHandler = Arc<Mutex<ThingHandler>>;

/// Outcome of one configuration attempt.
enum ConfigureOutcome {
    /// Configuration is complete; channels may be reconciled.
    Ready,
    /// Configuration failed; the status carries the reason.
    Failed,
    /// Required properties are absent; discovery must run first.
    PropertiesMissing,
}

/// Handler for one 1-Wire thing.
///
/// Owns the thing's registry view and its mutable device state, and
/// implements the lifecycle operations the host invokes: configure,
/// reconcile channels, refresh, bridge-status propagation and disposal.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use owire_lib::SensorType;
/// use owire_lib::handler::ThingHandler;
/// use owire_lib::host::{BridgeLookup, ConfigMap, Scheduler, StateSink, Thing, ThingId};
///
/// # fn collaborators() -> (Arc<dyn BridgeLookup>, Arc<dyn Scheduler>, Arc<dyn StateSink>) {
/// #     unimplemented!()
/// # }
/// let (bridges, scheduler, sink) = collaborators();
/// let thing = Thing::new(ThingId::from("owire:temperature:kitchen"), ConfigMap::new());
/// let handler = ThingHandler::new(
///     thing,
///     &[SensorType::Ds18b20, SensorType::Ds18s20],
///     bridges,
///     scheduler,
///     sink,
/// )
/// .into_shared();
///
/// ThingHandler::initialize(&handler);
/// ```
pub struct ThingHandler {
    thing: Thing,
    state: DeviceState,
    address: Option<SensorAddress>,
    supported_types: Vec<SensorType>,
    required_properties: Vec<String>,
    config_overrides: ConfigOverrides,
    bridge_lookup: Arc<dyn BridgeLookup>,
    scheduler: Arc<dyn Scheduler>,
    sink: Arc<dyn StateSink>,
}

impl ThingHandler {
    pub(crate) const PROPERTIES_MISSING_DESCRIPTION: &'static str = "required properties missing";

    /// Creates a handler for `thing`, accepting the given sensor types.
    #[must_use]
    pub fn new(
        thing: Thing,
        supported_types: &[SensorType],
        bridge_lookup: Arc<dyn BridgeLookup>,
        scheduler: Arc<dyn Scheduler>,
        sink: Arc<dyn StateSink>,
    ) -> Self {
        Self {
            thing,
            state: DeviceState::new(),
            address: None,
            supported_types: supported_types.to_vec(),
            required_properties: DEFAULT_REQUIRED_PROPERTIES
                .iter()
                .map(ToString::to_string)
                .collect(),
            config_overrides: ConfigOverrides::new(),
            bridge_lookup,
            scheduler,
            sink,
        }
    }

    /// Extends the required-property set for a concrete device subtype.
    #[must_use]
    pub fn with_required_properties<I, S>(mut self, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for key in extra {
            let key = key.into();
            if !self.required_properties.contains(&key) {
                self.required_properties.push(key);
            }
        }
        self
    }

    /// Sets channel configuration overrides applied when channels are
    /// (re)created during reconciliation.
    #[must_use]
    pub fn with_config_overrides(mut self, overrides: ConfigOverrides) -> Self {
        self.config_overrides = overrides;
        self
    }

    /// Wraps the handler for sharing with the host scheduler.
    #[must_use]
    pub fn into_shared(self) -> SharedThingHandler {
        Arc::new(Mutex::new(self))
    }

    /// Returns the thing as currently seen by the handler.
    #[must_use]
    pub fn thing(&self) -> &Thing {
        &self.thing
    }

    pub(crate) fn thing_mut(&mut self) -> &mut Thing {
        &mut self.thing
    }

    /// Returns the handler's device state.
    #[must_use]
    pub fn state(&self) -> &DeviceState {
        &self.state
    }

    /// Returns the validated sensor address, once configuration passed.
    #[must_use]
    pub fn address(&self) -> Option<&SensorAddress> {
        self.address.as_ref()
    }

    pub(crate) fn bridge_exists(&self) -> bool {
        self.bridge_lookup.bridge_exists()
    }

    pub(crate) fn bridge_handle(&self) -> Option<Arc<dyn BridgeHandle>> {
        self.bridge_lookup.bridge_handle()
    }

    pub(crate) fn scheduler(&self) -> Arc<dyn Scheduler> {
        Arc::clone(&self.scheduler)
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Initializes the handler: configuration followed by channel
    /// reconciliation when configuration succeeds.
    pub fn initialize(handler: &SharedThingHandler) {
        if Self::configure(handler) {
            handler.lock().configure_channels();
        }
    }

    /// Validates configuration and attaches sensors.
    ///
    /// Returns true if the thing is ready for channel reconciliation.
    /// On false, the thing status carries the failure; if required
    /// properties were missing, property discovery has been started and
    /// the host is expected to re-run initialization once the bridge has
    /// resolved them.
    pub fn configure(handler: &SharedThingHandler) -> bool {
        let outcome = handler.lock().configure_locked();
        match outcome {
            ConfigureOutcome::Ready => true,
            ConfigureOutcome::Failed => false,
            ConfigureOutcome::PropertiesMissing => {
                discovery::discover_properties(handler);
                false
            }
        }
    }

    fn configure_locked(&mut self) -> ConfigureOutcome {
        self.state.begin_reconfiguration();

        let validated = match super::config::validate(
            self.thing.configuration(),
            self.bridge_lookup.bridge_exists(),
            self.thing.channel(CHANNEL_PRESENT).is_some(),
        ) {
            Ok(validated) => validated,
            Err(err) => {
                self.fail_config(&err);
                return ConfigureOutcome::Failed;
            }
        };

        let address = validated.address.clone();
        self.address = Some(validated.address);
        self.state.poll = super::refresh::PollGate::new(validated.refresh_interval);
        self.state.show_presence = validated.show_presence;

        if self
            .required_properties
            .iter()
            .any(|key| self.thing.property(key).is_none())
        {
            return ConfigureOutcome::PropertiesMissing;
        }

        let model = self.thing.property(PROPERTY_MODEL_ID).unwrap_or_default();
        let sensor_type = match model.parse::<SensorType>() {
            Ok(sensor_type) if self.supported_types.contains(&sensor_type) => sensor_type,
            _ => {
                self.fail_config(&ConfigError::UnsupportedSensorType(model.to_string()));
                return ConfigureOutcome::Failed;
            }
        };

        self.state.sensor_type = Some(sensor_type);
        for index in 0..sensor_count(sensor_type) {
            self.state
                .sensors
                .push(BusSensor::new(address.clone(), sensor_type, index));
        }
        self.state.poll.force();

        ConfigureOutcome::Ready
    }

    /// Reconciles the thing's channel set against the catalog for the
    /// resolved sensor type, then enables each channel on its designated
    /// sensor.
    ///
    /// On success the configuration becomes valid and the status advances
    /// to unknown/none, awaiting the first presence check; never directly
    /// to online.
    pub fn configure_channels(&mut self) {
        let Some(sensor_type) = self.state.sensor_type else {
            return;
        };
        debug!(thing = %self.thing.id(), %sensor_type, "configuring channels");

        let wanted = channels_for(sensor_type);
        let diff =
            reconcile::plan_with_overrides(self.thing.channels(), wanted, &self.config_overrides);
        reconcile::apply(&mut self.thing, diff);

        for spec in wanted {
            if let Some(sensor) = self.state.sensors.get_mut(spec.sensor_index) {
                sensor.enable_channel(spec.channel_id);
            }
        }

        if let Some(primary) = self.state.primary_sensor()
            && let Err(err) = primary.configure_channels()
        {
            self.fail_config(&err);
            return;
        }

        self.state.valid_config = true;
        self.thing
            .set_status(ThingStatus::Unknown, StatusDetail::None);
    }

    /// Refreshes this thing if its gate says a cycle is due.
    ///
    /// Safe to invoke on a fixed external cadence; a call within the
    /// interval is a no-op. Presence of the primary sensor gates the rest
    /// of the cycle, and any bus failure aborts the remaining sensors and
    /// surfaces as offline/communication-error until the next cadence.
    pub fn refresh(&mut self, bridge: &dyn BridgeHandle, now_ms: u64) {
        if !self.state.valid_config {
            return;
        }
        let Some(forced) = self.state.poll.begin_cycle(now_ms) else {
            return;
        };
        trace!(thing = %self.thing.id(), forced, "refreshing");

        let presence = match self.state.primary_sensor().map(|sensor| sensor.check_presence(bridge))
        {
            Some(Ok(signal)) => signal,
            Some(Err(err)) => {
                self.communication_error(&err);
                return;
            }
            None => return,
        };

        self.apply_presence(presence);
        if presence != PresenceSignal::Present {
            trace!(thing = %self.thing.id(), "sensor not present");
            return;
        }

        for index in 0..self.state.sensors.len() {
            trace!(thing = %self.thing.id(), sensor = index, "refreshing sensor");
            match self.state.sensors[index].refresh(bridge, forced) {
                Ok(readings) => {
                    for (channel_id, value) in readings {
                        self.post_update(&channel_id, value);
                    }
                }
                Err(err) => {
                    self.communication_error(&err);
                    return;
                }
            }
        }
    }

    /// Requests a forced refresh on the next cycle (REFRESH command path).
    pub fn request_refresh(&mut self) {
        self.state.poll.force();
        trace!(thing = %self.thing.id(), "scheduled for refresh");
    }

    /// Returns true if the bridge may include this thing in its refresh
    /// cadence.
    #[must_use]
    pub fn is_refreshable(&self) -> bool {
        let status = self.thing.status();
        status.status != ThingStatus::Uninitialized
            && status.detail != StatusDetail::ConfigurationError
            && status.detail != StatusDetail::BridgeOffline
    }

    /// Resolves the sensor type from the bus and writes the model/vendor
    /// properties. Called by the bridge's property-update task.
    ///
    /// Returns true when the properties were written; on a bus failure the
    /// thing goes offline/communication-error and the operator-visible
    /// status carries the reason (no automatic retry).
    pub fn update_sensor_properties(&mut self, bridge: &dyn BridgeHandle) -> bool {
        let Some(address) = self.address.clone() else {
            return false;
        };
        match bridge.resolve_type(&address) {
            Ok(sensor_type) => {
                self.thing
                    .set_property(PROPERTY_MODEL_ID, sensor_type.model_id());
                self.thing.set_property(PROPERTY_VENDOR, VENDOR_NAME);
                trace!(
                    thing = %self.thing.id(),
                    model = sensor_type.model_id(),
                    vendor = VENDOR_NAME,
                    "updated model/vendor properties"
                );
                true
            }
            Err(err) => {
                debug!(thing = %self.thing.id(), %err, "property resolution failed");
                self.thing.set_status_with_description(
                    ThingStatus::Offline,
                    StatusDetail::CommunicationError,
                    err.to_string(),
                );
                false
            }
        }
    }

    /// Propagates a status change of the parent bridge.
    pub fn bridge_status_changed(&mut self, bridge_status: ThingStatus) {
        match bridge_status {
            ThingStatus::Online
                if self.thing.status().detail == StatusDetail::BridgeOffline =>
            {
                if self.state.valid_config {
                    // Reachability must be re-proven on the next poll.
                    self.apply_presence(PresenceSignal::Indeterminate);
                } else {
                    self.thing
                        .set_status(ThingStatus::Offline, StatusDetail::ConfigurationError);
                }
            }
            ThingStatus::Offline => {
                self.thing
                    .set_status(ThingStatus::Offline, StatusDetail::BridgeOffline);
            }
            _ => {}
        }
    }

    /// Publishes a value for a channel, logging (not failing) when the
    /// channel does not exist on the thing.
    pub fn post_update(&self, channel_id: &str, value: ChannelValue) {
        if self.thing.channel(channel_id).is_some() {
            self.sink.post_update(self.thing.id(), channel_id, value);
        } else {
            warn!(
                thing = %self.thing.id(),
                channel = channel_id,
                "missing channel when posting update"
            );
        }
    }

    /// Marks the handler disposed and detaches its sensors.
    ///
    /// A property-discovery retry scheduled before disposal may still
    /// fire; it checks the disposed flag and does nothing.
    pub fn dispose(&mut self) {
        debug!(thing = %self.thing.id(), "disposing handler");
        self.state.disposed = true;
        self.state.sensors.clear();
        self.state.valid_config = false;
    }

    // =========================================================================
    // Internal transitions
    // =========================================================================

    fn apply_presence(&mut self, signal: PresenceSignal) {
        let outcome = presence::transition(signal, self.state.show_presence);
        self.thing.set_status_info(outcome.status);
        if let Some(value) = outcome.presence_update {
            self.post_update(CHANNEL_PRESENT, value);
        }
    }

    fn fail_config(&mut self, err: &ConfigError) {
        debug!(thing = %self.thing.id(), %err, "configuration failed");
        self.thing.set_status_with_description(
            ThingStatus::Offline,
            StatusDetail::ConfigurationError,
            err.to_string(),
        );
    }

    fn communication_error(&mut self, err: &ProtocolError) {
        debug!(thing = %self.thing.id(), %err, "refresh failed");
        self.thing.set_status_with_description(
            ThingStatus::Offline,
            StatusDetail::CommunicationError,
            err.to_string(),
        );
    }
}

impl std::fmt::Debug for ThingHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThingHandler")
            .field("thing", &self.thing.id())
            .field("status", &self.thing.status())
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
