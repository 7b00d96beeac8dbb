// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! External scheduler contract and the tokio-backed implementation.
//!
//! The handler core performs no internal threading; one-shot delayed work
//! (the property-discovery retry) is handed to the host scheduler. There is
//! no cancellation: a task scheduled before a thing is disposed may still
//! fire once, so callbacks guard on the handler's disposed flag.

use std::time::Duration;

/// A one-shot task handed to the scheduler.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// One-shot delayed task scheduler provided by the host.
pub trait Scheduler: Send + Sync {
    /// Runs `task` once after `delay` has elapsed.
    fn schedule_once(&self, delay: Duration, task: Task);
}

/// Scheduler backed by the tokio runtime.
///
/// Spawns one task per scheduled callback; the callback runs on the
/// runtime's blocking-friendly worker after the delay.
///
/// # Examples
///
/// ```no_run
/// use std::time::Duration;
/// use owire_lib::host::{Scheduler, TokioScheduler};
///
/// #[tokio::main]
/// async fn main() {
///     let scheduler = TokioScheduler::new();
///     scheduler.schedule_once(Duration::from_secs(5), Box::new(|| {
///         println!("retry");
///     }));
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct TokioScheduler {
    _private: (),
}

impl TokioScheduler {
    /// Creates a scheduler using the current tokio runtime.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Scheduler for TokioScheduler {
    fn schedule_once(&self, delay: Duration, task: Task) {
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            task();
        });
    }
}
