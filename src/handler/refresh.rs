// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Time gating for the poll cycle.
//!
//! The host invokes `refresh` on a fixed per-bridge cadence; the gate
//! decides whether this particular thing is due. A last-refresh timestamp
//! of zero means "never refreshed" and forces the next cycle regardless of
//! the interval, which is also how an explicit refresh request is modeled.

use std::time::Duration;

/// Gate deciding whether a refresh cycle is due.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use owire_lib::handler::PollGate;
///
/// let mut gate = PollGate::new(Duration::from_secs(300));
/// // First cycle is always forced
/// assert_eq!(gate.begin_cycle(1_000), Some(true));
/// // Within the interval nothing happens
/// assert_eq!(gate.begin_cycle(1_000), None);
/// // After the interval a regular cycle runs
/// assert_eq!(gate.begin_cycle(301_000), Some(false));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollGate {
    last_refresh_ms: u64,
    interval: Duration,
}

impl PollGate {
    /// Default refresh interval (300 s).
    pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(300);

    /// Creates a gate with the given interval, forced on first use.
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self {
            last_refresh_ms: 0,
            interval,
        }
    }

    /// Returns the refresh interval.
    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Returns the timestamp of the last started cycle (0 = never).
    #[must_use]
    pub fn last_refresh_ms(&self) -> u64 {
        self.last_refresh_ms
    }

    /// Forces the next cycle to run regardless of the interval.
    pub fn force(&mut self) {
        self.last_refresh_ms = 0;
    }

    /// Returns true if a cycle would run at `now_ms`.
    #[must_use]
    pub fn is_due(&self, now_ms: u64) -> bool {
        let interval_ms = u64::try_from(self.interval.as_millis()).unwrap_or(u64::MAX);
        self.last_refresh_ms == 0 || now_ms >= self.last_refresh_ms.saturating_add(interval_ms)
    }

    /// Starts a cycle if one is due.
    ///
    /// Advances the last-refresh timestamp immediately, so a re-entrant or
    /// same-instant second call is a no-op even if the caller's cycle is
    /// slow or fails afterwards. Returns the forced flag of the started
    /// cycle, or `None` when no cycle is due.
    pub fn begin_cycle(&mut self, now_ms: u64) -> Option<bool> {
        if !self.is_due(now_ms) {
            return None;
        }
        let forced = self.last_refresh_ms == 0;
        self.last_refresh_ms = now_ms;
        Some(forced)
    }
}

impl Default for PollGate {
    fn default() -> Self {
        Self::new(Self::DEFAULT_INTERVAL)
    }
}
