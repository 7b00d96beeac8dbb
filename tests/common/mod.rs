// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Hand-written doubles for the host collaborator contracts.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use parking_lot::Mutex;

use owire_lib::host::{
    BridgeHandle, BridgeLookup, PresenceSignal, Reading, Scheduler, StateSink, Task, ThingId,
};
use owire_lib::{ChannelValue, ProtocolError, SensorAddress, SensorType};

/// Bridge double with scriptable presence and failure behavior.
pub struct MockBridge {
    pub sensor_type: SensorType,
    pub presence: Mutex<PresenceSignal>,
    pub fail_reads: AtomicBool,
    pub fail_presence: AtomicBool,
    pub fail_resolve: AtomicBool,
    pub presence_calls: AtomicUsize,
    pub read_calls: AtomicUsize,
    pub resolve_calls: AtomicUsize,
    pub property_updates: Mutex<Vec<ThingId>>,
}

impl MockBridge {
    pub fn new(sensor_type: SensorType) -> Arc<Self> {
        Arc::new(Self {
            sensor_type,
            presence: Mutex::new(PresenceSignal::Present),
            fail_reads: AtomicBool::new(false),
            fail_presence: AtomicBool::new(false),
            fail_resolve: AtomicBool::new(false),
            presence_calls: AtomicUsize::new(0),
            read_calls: AtomicUsize::new(0),
            resolve_calls: AtomicUsize::new(0),
            property_updates: Mutex::new(Vec::new()),
        })
    }

    pub fn set_presence(&self, signal: PresenceSignal) {
        *self.presence.lock() = signal;
    }

    pub fn bus_interactions(&self) -> usize {
        self.presence_calls.load(Ordering::SeqCst) + self.read_calls.load(Ordering::SeqCst)
    }
}

impl BridgeHandle for MockBridge {
    fn resolve_type(&self, address: &SensorAddress) -> Result<SensorType, ProtocolError> {
        self.resolve_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_resolve.load(Ordering::SeqCst) {
            return Err(ProtocolError::NoAnswer(address.to_string()));
        }
        Ok(self.sensor_type)
    }

    fn check_presence(&self, address: &SensorAddress) -> Result<PresenceSignal, ProtocolError> {
        self.presence_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_presence.load(Ordering::SeqCst) {
            return Err(ProtocolError::NoAnswer(address.to_string()));
        }
        Ok(*self.presence.lock())
    }

    fn read_channels(
        &self,
        _address: &SensorAddress,
        channels: &[String],
        _forced: bool,
    ) -> Result<Vec<Reading>, ProtocolError> {
        self.read_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(ProtocolError::Timeout(3000));
        }
        Ok(channels
            .iter()
            .map(|id| (id.clone(), ChannelValue::Decimal(21.5)))
            .collect())
    }

    fn schedule_for_properties_update(&self, thing: &ThingId) {
        self.property_updates.lock().push(thing.clone());
    }
}

/// Bridge lookup double: bridge existence and handler availability are
/// toggled independently, like a bridge thing whose handler is still
/// starting up.
#[derive(Default)]
pub struct MockBridgeLookup {
    exists: AtomicBool,
    handle: Mutex<Option<Arc<dyn BridgeHandle>>>,
}

impl MockBridgeLookup {
    pub fn without_bridge() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_handle(bridge: Arc<dyn BridgeHandle>) -> Arc<Self> {
        let lookup = Arc::new(Self::default());
        lookup.exists.store(true, Ordering::SeqCst);
        *lookup.handle.lock() = Some(bridge);
        lookup
    }

    pub fn configured_but_not_ready() -> Arc<Self> {
        let lookup = Arc::new(Self::default());
        lookup.exists.store(true, Ordering::SeqCst);
        lookup
    }

    pub fn make_ready(&self, bridge: Arc<dyn BridgeHandle>) {
        self.exists.store(true, Ordering::SeqCst);
        *self.handle.lock() = Some(bridge);
    }
}

impl BridgeLookup for MockBridgeLookup {
    fn bridge_exists(&self) -> bool {
        self.exists.load(Ordering::SeqCst)
    }

    fn bridge_handle(&self) -> Option<Arc<dyn BridgeHandle>> {
        self.handle.lock().clone()
    }
}

/// Scheduler double that queues tasks for the test to run explicitly.
#[derive(Default)]
pub struct ManualScheduler {
    tasks: Mutex<Vec<(Duration, Task)>>,
}

impl ManualScheduler {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn pending(&self) -> usize {
        self.tasks.lock().len()
    }

    pub fn last_delay(&self) -> Option<Duration> {
        self.tasks.lock().last().map(|(delay, _)| *delay)
    }

    /// Runs the oldest pending task, as if its delay had elapsed.
    pub fn run_next(&self) {
        let task = {
            let mut tasks = self.tasks.lock();
            if tasks.is_empty() {
                return;
            }
            tasks.remove(0).1
        };
        task();
    }
}

impl Scheduler for ManualScheduler {
    fn schedule_once(&self, delay: Duration, task: Task) {
        self.tasks.lock().push((delay, task));
    }
}

/// Sink double recording every posted update.
#[derive(Default)]
pub struct RecordingSink {
    updates: Mutex<Vec<(ThingId, String, ChannelValue)>>,
}

impl RecordingSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn updates(&self) -> Vec<(ThingId, String, ChannelValue)> {
        self.updates.lock().clone()
    }

    pub fn last_value_for(&self, channel_id: &str) -> Option<ChannelValue> {
        self.updates
            .lock()
            .iter()
            .rev()
            .find(|(_, id, _)| id == channel_id)
            .map(|(_, _, value)| value.clone())
    }
}

impl StateSink for RecordingSink {
    fn post_update(&self, thing: &ThingId, channel_id: &str, value: ChannelValue) {
        self.updates
            .lock()
            .push((thing.clone(), channel_id.to_string(), value));
    }
}
