// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! End-to-end tests driving a thing handler through its lifecycle with
//! scripted collaborator doubles.

mod common;

use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;

use common::{ManualScheduler, MockBridge, MockBridgeLookup, RecordingSink};
use owire_lib::channel::{CHANNEL_PRESENT, Channel, ChannelConfig};
use owire_lib::handler::{SharedThingHandler, ThingHandler};
use owire_lib::host::{
    ConfigMap, PROPERTY_MODEL_ID, PROPERTY_VENDOR, PresenceSignal, StatusDetail, Thing, ThingId,
    ThingStatus,
};
use owire_lib::{ChannelValue, SensorType, ValueKind};

const ADDRESS: &str = "10.67C6697351FF";

fn thing_with_address(address: &str) -> Thing {
    let mut config = ConfigMap::new();
    config.insert("id".to_string(), serde_json::json!(address));
    Thing::new(ThingId::from("owire:temperature:kitchen"), config)
}

fn resolved_thing(address: &str, model: &str) -> Thing {
    let mut thing = thing_with_address(address);
    thing.set_property(PROPERTY_MODEL_ID, model);
    thing.set_property(PROPERTY_VENDOR, "Dallas/Maxim");
    thing
}

fn presence_channel() -> Channel {
    Channel {
        id: CHANNEL_PRESENT.to_string(),
        channel_type_id: "owire:present".to_string(),
        accepted_kind: ValueKind::Switch,
        label: Some("Present".to_string()),
        configuration: ChannelConfig::new(),
    }
}

struct Harness {
    handler: SharedThingHandler,
    bridge: Arc<MockBridge>,
    sink: Arc<RecordingSink>,
}

impl Harness {
    fn new(thing: Thing, supported: &[SensorType], sensor_type: SensorType) -> Self {
        let bridge = MockBridge::new(sensor_type);
        let lookup = MockBridgeLookup::with_handle(Arc::clone(&bridge) as _);
        let scheduler = ManualScheduler::new();
        let sink = RecordingSink::new();
        let handler = ThingHandler::new(
            thing,
            supported,
            Arc::clone(&lookup) as _,
            Arc::clone(&scheduler) as _,
            Arc::clone(&sink) as _,
        )
        .into_shared();
        Self {
            handler,
            bridge,
            sink,
        }
    }

    fn thermometer() -> Self {
        Self::new(
            resolved_thing(ADDRESS, "DS18S20"),
            &[SensorType::Ds18s20],
            SensorType::Ds18s20,
        )
    }

    fn status(&self) -> (ThingStatus, StatusDetail, Option<String>) {
        let guard = self.handler.lock();
        let info = guard.thing().status();
        (info.status, info.detail, info.description.clone())
    }

    fn refresh(&self, now_ms: u64) {
        self.handler.lock().refresh(self.bridge.as_ref(), now_ms);
    }
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn missing_address_fails_with_configuration_error() {
    let harness = Harness::new(
        Thing::new(ThingId::from("owire:temperature:kitchen"), ConfigMap::new()),
        &[SensorType::Ds18s20],
        SensorType::Ds18s20,
    );

    assert!(!ThingHandler::configure(&harness.handler));

    let (status, detail, description) = harness.status();
    assert_eq!(status, ThingStatus::Offline);
    assert_eq!(detail, StatusDetail::ConfigurationError);
    assert_eq!(description.as_deref(), Some("sensor id missing"));
    assert!(harness.handler.lock().state().sensors.is_empty());
}

#[test]
fn malformed_address_fails_with_configuration_error() {
    let harness = Harness::new(
        thing_with_address("not-an-address"),
        &[SensorType::Ds18s20],
        SensorType::Ds18s20,
    );

    assert!(!ThingHandler::configure(&harness.handler));

    let (status, detail, _) = harness.status();
    assert_eq!(status, ThingStatus::Offline);
    assert_eq!(detail, StatusDetail::ConfigurationError);
}

#[test]
fn missing_bridge_fails_before_anything_else() {
    let bridge = MockBridge::new(SensorType::Ds18s20);
    let lookup = MockBridgeLookup::without_bridge();
    let scheduler = ManualScheduler::new();
    let sink = RecordingSink::new();
    let handler = ThingHandler::new(
        resolved_thing(ADDRESS, "DS18S20"),
        &[SensorType::Ds18s20],
        lookup as _,
        scheduler as _,
        sink as _,
    )
    .into_shared();

    assert!(!ThingHandler::configure(&handler));
    assert_eq!(
        handler.lock().thing().status().description.as_deref(),
        Some("bridge missing")
    );
    assert_eq!(bridge.resolve_calls.load(Ordering::SeqCst), 0);
}

#[test]
fn unsupported_sensor_type_has_distinct_message() {
    // Thing resolved as a DS2408, but the handler only accepts thermometers
    let harness = Harness::new(
        resolved_thing(ADDRESS, "DS2408"),
        &[SensorType::Ds18s20],
        SensorType::Ds2408,
    );

    assert!(!ThingHandler::configure(&harness.handler));

    let (status, detail, description) = harness.status();
    assert_eq!(status, ThingStatus::Offline);
    assert_eq!(detail, StatusDetail::ConfigurationError);
    let description = description.unwrap();
    assert!(description.contains("not supported"), "{description}");
    assert_ne!(description, "required properties missing");
}

#[test]
fn successful_initialization_awaits_first_refresh() {
    let harness = Harness::thermometer();

    ThingHandler::initialize(&harness.handler);

    let guard = harness.handler.lock();
    assert!(guard.state().valid_config);
    assert_eq!(guard.state().sensor_type, Some(SensorType::Ds18s20));
    assert_eq!(guard.state().sensors.len(), 1);
    // Reconciliation never goes directly online
    assert_eq!(guard.thing().status().status, ThingStatus::Unknown);
    assert_eq!(guard.thing().status().detail, StatusDetail::None);
    assert!(guard.thing().channel("temperature").is_some());
}

// ============================================================================
// Property discovery
// ============================================================================

#[test]
fn missing_properties_schedule_discovery() {
    let harness = Harness::new(
        thing_with_address(ADDRESS),
        &[SensorType::Ds18s20],
        SensorType::Ds18s20,
    );

    assert!(!ThingHandler::configure(&harness.handler));

    let (status, detail, description) = harness.status();
    assert_eq!(status, ThingStatus::Offline);
    assert_eq!(detail, StatusDetail::ConfigurationError);
    assert_eq!(description.as_deref(), Some("required properties missing"));
    assert_eq!(
        harness.bridge.property_updates.lock().as_slice(),
        [ThingId::from("owire:temperature:kitchen")]
    );
}

#[test]
fn discovery_round_trip_enables_initialization() {
    let harness = Harness::new(
        thing_with_address(ADDRESS),
        &[SensorType::Ds18s20],
        SensorType::Ds18s20,
    );

    assert!(!ThingHandler::configure(&harness.handler));

    // The bridge's property-update task resolves the type...
    assert!(
        harness
            .handler
            .lock()
            .update_sensor_properties(harness.bridge.as_ref())
    );
    assert_eq!(
        harness.handler.lock().thing().property(PROPERTY_MODEL_ID),
        Some("DS18S20")
    );

    // ...and the host retries initialization.
    ThingHandler::initialize(&harness.handler);
    assert!(harness.handler.lock().state().valid_config);
}

#[test]
fn resolve_failure_goes_offline_without_retry() {
    let bridge = MockBridge::new(SensorType::Ds18s20);
    let lookup = MockBridgeLookup::with_handle(Arc::clone(&bridge) as _);
    let scheduler = ManualScheduler::new();
    let sink = RecordingSink::new();
    let handler = ThingHandler::new(
        thing_with_address(ADDRESS),
        &[SensorType::Ds18s20],
        lookup as _,
        Arc::clone(&scheduler) as _,
        sink as _,
    )
    .into_shared();

    assert!(!ThingHandler::configure(&handler));
    bridge.fail_resolve.store(true, Ordering::SeqCst);

    // The bridge's property-update task hits a bus failure
    assert!(
        !handler
            .lock()
            .update_sensor_properties(bridge.as_ref())
    );

    let guard = handler.lock();
    let info = guard.thing().status();
    assert_eq!(info.status, ThingStatus::Offline);
    assert_eq!(info.detail, StatusDetail::CommunicationError);
    assert!(guard.thing().property(PROPERTY_MODEL_ID).is_none());
    drop(guard);
    // No automatic retry: nothing was scheduled
    assert_eq!(scheduler.pending(), 0);
}

#[test]
fn bridge_not_ready_retries_after_fixed_delay() {
    let bridge = MockBridge::new(SensorType::Ds18s20);
    let lookup = MockBridgeLookup::configured_but_not_ready();
    let scheduler = ManualScheduler::new();
    let sink = RecordingSink::new();
    let handler = ThingHandler::new(
        thing_with_address(ADDRESS),
        &[SensorType::Ds18s20],
        Arc::clone(&lookup) as _,
        Arc::clone(&scheduler) as _,
        sink as _,
    )
    .into_shared();

    assert!(!ThingHandler::configure(&handler));
    assert_eq!(
        handler.lock().thing().status().description.as_deref(),
        Some("bridge not ready")
    );
    assert_eq!(scheduler.pending(), 1);
    assert_eq!(scheduler.last_delay(), Some(Duration::from_millis(5000)));

    // Bridge handler comes up before the retry fires
    lookup.make_ready(Arc::clone(&bridge) as _);
    scheduler.run_next();

    assert_eq!(
        handler.lock().thing().status().description.as_deref(),
        Some("required properties missing")
    );
    assert_eq!(bridge.property_updates.lock().len(), 1);
    assert_eq!(scheduler.pending(), 0);
}

#[test]
fn retry_keeps_rescheduling_while_bridge_is_down() {
    let lookup = MockBridgeLookup::configured_but_not_ready();
    let scheduler = ManualScheduler::new();
    let sink = RecordingSink::new();
    let handler = ThingHandler::new(
        thing_with_address(ADDRESS),
        &[SensorType::Ds18s20],
        lookup as _,
        Arc::clone(&scheduler) as _,
        sink as _,
    )
    .into_shared();

    assert!(!ThingHandler::configure(&handler));
    // Fixed-interval, unbounded: each firing schedules exactly one more
    for _ in 0..3 {
        assert_eq!(scheduler.pending(), 1);
        scheduler.run_next();
    }
    assert_eq!(scheduler.pending(), 1);
}

#[test]
fn late_retry_does_not_reenter_disposed_handler() {
    let bridge = MockBridge::new(SensorType::Ds18s20);
    let lookup = MockBridgeLookup::configured_but_not_ready();
    let scheduler = ManualScheduler::new();
    let sink = RecordingSink::new();
    let handler = ThingHandler::new(
        thing_with_address(ADDRESS),
        &[SensorType::Ds18s20],
        Arc::clone(&lookup) as _,
        Arc::clone(&scheduler) as _,
        sink as _,
    )
    .into_shared();

    assert!(!ThingHandler::configure(&handler));
    assert_eq!(scheduler.pending(), 1);

    handler.lock().dispose();
    lookup.make_ready(Arc::clone(&bridge) as _);
    scheduler.run_next();

    // The pending task fired once but touched nothing
    assert_eq!(bridge.property_updates.lock().len(), 0);
    assert_eq!(scheduler.pending(), 0);
}

// ============================================================================
// Poll cycle
// ============================================================================

#[test]
fn first_refresh_is_forced_and_goes_online() {
    let harness = Harness::thermometer();
    ThingHandler::initialize(&harness.handler);

    harness.refresh(1_000);

    let (status, detail, _) = harness.status();
    assert_eq!(status, ThingStatus::Online);
    assert_eq!(detail, StatusDetail::None);
    assert_eq!(
        harness.sink.last_value_for("temperature"),
        Some(ChannelValue::Decimal(21.5))
    );
}

#[test]
fn second_refresh_with_same_now_is_a_noop() {
    let harness = Harness::thermometer();
    ThingHandler::initialize(&harness.handler);

    harness.refresh(1_000);
    let interactions = harness.bridge.bus_interactions();
    assert!(interactions > 0);

    harness.refresh(1_000);
    assert_eq!(harness.bridge.bus_interactions(), interactions);
}

#[test]
fn refresh_runs_again_after_interval_elapses() {
    let harness = Harness::thermometer();
    ThingHandler::initialize(&harness.handler);

    harness.refresh(1_000);
    harness.refresh(300_999);
    assert_eq!(harness.bridge.presence_calls.load(Ordering::SeqCst), 1);

    harness.refresh(301_000);
    assert_eq!(harness.bridge.presence_calls.load(Ordering::SeqCst), 2);
}

#[test]
fn request_refresh_forces_next_cycle() {
    let harness = Harness::thermometer();
    ThingHandler::initialize(&harness.handler);

    harness.refresh(1_000);
    harness.handler.lock().request_refresh();
    harness.refresh(1_001);

    assert_eq!(harness.bridge.presence_calls.load(Ordering::SeqCst), 2);
}

#[test]
fn absent_sensor_aborts_cycle_but_keeps_timestamp() {
    let harness = Harness::thermometer();
    ThingHandler::initialize(&harness.handler);
    harness.bridge.set_presence(PresenceSignal::Absent);

    harness.refresh(1_000);

    let (status, detail, description) = harness.status();
    assert_eq!(status, ThingStatus::Offline);
    assert_eq!(detail, StatusDetail::CommunicationError);
    assert_eq!(description.as_deref(), Some("slave missing"));
    // No sensor reads happened
    assert_eq!(harness.bridge.read_calls.load(Ordering::SeqCst), 0);

    // The gate advanced: the next call within the interval is a no-op
    harness.refresh(2_000);
    assert_eq!(harness.bridge.presence_calls.load(Ordering::SeqCst), 1);
}

#[test]
fn presence_check_failure_aborts_cycle_but_keeps_timestamp() {
    let harness = Harness::thermometer();
    ThingHandler::initialize(&harness.handler);
    harness.bridge.fail_presence.store(true, Ordering::SeqCst);

    harness.refresh(1_000);

    let (status, detail, _) = harness.status();
    assert_eq!(status, ThingStatus::Offline);
    assert_eq!(detail, StatusDetail::CommunicationError);
    assert_eq!(harness.bridge.read_calls.load(Ordering::SeqCst), 0);

    // The gate advanced: within the interval nothing else hits the bus
    harness.refresh(2_000);
    assert_eq!(harness.bridge.presence_calls.load(Ordering::SeqCst), 1);

    // Recovered on the next cadence
    harness.bridge.fail_presence.store(false, Ordering::SeqCst);
    harness.refresh(302_000);
    let (status, _, _) = harness.status();
    assert_eq!(status, ThingStatus::Online);
}

#[test]
fn read_failure_surfaces_as_communication_error_and_recovers() {
    let harness = Harness::thermometer();
    ThingHandler::initialize(&harness.handler);
    harness.bridge.fail_reads.store(true, Ordering::SeqCst);

    harness.refresh(1_000);
    let (status, detail, _) = harness.status();
    assert_eq!(status, ThingStatus::Offline);
    assert_eq!(detail, StatusDetail::CommunicationError);

    // Retried on the next cadence, no dedicated backoff
    harness.bridge.fail_reads.store(false, Ordering::SeqCst);
    harness.refresh(302_000);
    let (status, _, _) = harness.status();
    assert_eq!(status, ThingStatus::Online);
}

#[test]
fn refresh_before_valid_configuration_publishes_nothing() {
    let harness = Harness::new(
        thing_with_address(ADDRESS),
        &[SensorType::Ds18s20],
        SensorType::Ds18s20,
    );

    harness.refresh(1_000);

    assert_eq!(harness.bridge.bus_interactions(), 0);
    assert!(harness.sink.updates().is_empty());
}

// ============================================================================
// Presence channel
// ============================================================================

#[test]
fn presence_channel_follows_presence_signal() {
    let mut thing = resolved_thing(ADDRESS, "DS18S20");
    thing.add_channel(presence_channel());
    let harness = Harness::new(thing, &[SensorType::Ds18s20], SensorType::Ds18s20);
    ThingHandler::initialize(&harness.handler);
    assert!(harness.handler.lock().state().show_presence);

    harness.refresh(1_000);
    assert_eq!(
        harness.sink.last_value_for(CHANNEL_PRESENT),
        Some(ChannelValue::On)
    );

    harness.bridge.set_presence(PresenceSignal::Absent);
    harness.refresh(302_000);
    assert_eq!(
        harness.sink.last_value_for(CHANNEL_PRESENT),
        Some(ChannelValue::Off)
    );

    harness.bridge.set_presence(PresenceSignal::Indeterminate);
    harness.refresh(603_000);
    assert_eq!(
        harness.sink.last_value_for(CHANNEL_PRESENT),
        Some(ChannelValue::Undef)
    );
    let (status, _, _) = harness.status();
    assert_eq!(status, ThingStatus::Unknown);
}

// ============================================================================
// Bridge status propagation
// ============================================================================

#[test]
fn bridge_offline_overrides_online_status() {
    let harness = Harness::thermometer();
    ThingHandler::initialize(&harness.handler);
    harness.refresh(1_000);
    assert_eq!(harness.status().0, ThingStatus::Online);

    harness
        .handler
        .lock()
        .bridge_status_changed(ThingStatus::Offline);

    let (status, detail, _) = harness.status();
    assert_eq!(status, ThingStatus::Offline);
    assert_eq!(detail, StatusDetail::BridgeOffline);
}

#[test]
fn bridge_back_online_goes_unknown_not_online() {
    let harness = Harness::thermometer();
    ThingHandler::initialize(&harness.handler);
    harness.refresh(1_000);

    harness
        .handler
        .lock()
        .bridge_status_changed(ThingStatus::Offline);
    harness
        .handler
        .lock()
        .bridge_status_changed(ThingStatus::Online);

    // Reachability must be re-proven by the next poll
    let (status, detail, _) = harness.status();
    assert_eq!(status, ThingStatus::Unknown);
    assert_eq!(detail, StatusDetail::None);
}

#[test]
fn bridge_back_online_with_invalid_config_stays_configuration_error() {
    let harness = Harness::new(
        Thing::new(ThingId::from("owire:temperature:kitchen"), ConfigMap::new()),
        &[SensorType::Ds18s20],
        SensorType::Ds18s20,
    );
    assert!(!ThingHandler::configure(&harness.handler));

    harness
        .handler
        .lock()
        .bridge_status_changed(ThingStatus::Offline);
    harness
        .handler
        .lock()
        .bridge_status_changed(ThingStatus::Online);

    let (status, detail, _) = harness.status();
    assert_eq!(status, ThingStatus::Offline);
    assert_eq!(detail, StatusDetail::ConfigurationError);
}

// ============================================================================
// Multisensor enablement
// ============================================================================

#[test]
fn bms_splits_channels_across_two_sensors() {
    let harness = Harness::new(
        resolved_thing("26.1B72D6000000", "BMS"),
        &[SensorType::MsTh, SensorType::Bms],
        SensorType::Bms,
    );
    ThingHandler::initialize(&harness.handler);

    let guard = harness.handler.lock();
    let sensors = &guard.state().sensors;
    assert_eq!(sensors.len(), 2);
    // Temperature comes from the auxiliary DS18B20
    assert!(
        sensors[1]
            .enabled_channels()
            .contains(&"temperature".to_string())
    );
    assert!(
        !sensors[0]
            .enabled_channels()
            .contains(&"temperature".to_string())
    );
    assert!(
        sensors[0]
            .enabled_channels()
            .contains(&"humidity".to_string())
    );
    drop(guard);

    harness.refresh(1_000);
    // Both sensors were read in one cycle
    assert_eq!(harness.bridge.read_calls.load(Ordering::SeqCst), 2);
}
