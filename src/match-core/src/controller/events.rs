// SPDX-FileCopyrightText: 2025 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Match event notification system.
//!
//! Listeners observe what a device does without taking part in it: a
//! numeric display showing the phase ordinal, telemetry, test recorders.
//! Hooks are the behaviour; listeners only watch.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::hooks::Hook;
use crate::phase::MatchPhase;

/// Unique identifier for a registered listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

impl ListenerId {
    fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

/// Trait for components that want to observe a device.
///
/// All methods default to no-ops.
pub trait MatchListener: Send + Sync {
    /// A phase arrived, from the radio or announced locally, and has been
    /// dispatched. The device already holds the resulting phase.
    fn on_phase_received(&self, _incoming: MatchPhase) {}

    /// The current phase changed.
    fn on_phase_change(&self, _old: MatchPhase, _new: MatchPhase) {}

    /// A hook was due. `installed` is false when the slot was empty.
    fn on_hook(&self, _hook: Hook, _installed: bool) {}

    /// An inbound code did not name any phase.
    fn on_unknown_code(&self, _code: u32) {}
}

/// Manages registered listeners and dispatches events.
pub struct MatchEventEmitter {
    listeners: Vec<(ListenerId, Arc<dyn MatchListener>)>,
}

impl Default for MatchEventEmitter {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MatchEventEmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatchEventEmitter")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl MatchEventEmitter {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    /// Register a listener. The returned id unregisters it again.
    pub fn register(&mut self, listener: Arc<dyn MatchListener>) -> ListenerId {
        let id = ListenerId::new();
        self.listeners.push((id, listener));
        id
    }

    pub fn unregister(&mut self, id: ListenerId) {
        self.listeners.retain(|(lid, _)| *lid != id);
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn notify_phase_received(&self, incoming: MatchPhase) {
        for (_, listener) in &self.listeners {
            listener.on_phase_received(incoming);
        }
    }

    pub fn notify_phase_change(&self, old: MatchPhase, new: MatchPhase) {
        for (_, listener) in &self.listeners {
            listener.on_phase_change(old, new);
        }
    }

    pub fn notify_hook(&self, hook: Hook, installed: bool) {
        for (_, listener) in &self.listeners {
            listener.on_hook(hook, installed);
        }
    }

    pub fn notify_unknown_code(&self, code: u32) {
        for (_, listener) in &self.listeners {
            listener.on_unknown_code(code);
        }
    }
}
