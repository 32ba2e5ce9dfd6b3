// SPDX-FileCopyrightText: 2025 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Named callback slots fired by the dispatcher.
//!
//! Downstream code installs closures into the slots it cares about; every
//! other slot stays empty and invoking it does nothing.

use std::collections::HashMap;
use std::fmt;

use crate::role::Team;

/// Name of a hook slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hook {
    /// Re-arm the device after stop or any terminal outcome.
    Reset,
    /// One unit of gameplay, driven by the active loop while playing.
    Play,
    /// Play was suspended.
    Pause,
    Point(Team),
    Disallow(Team),
    Winner(Team),
    Loser(Team),
    Disqual(Team),
}

impl Hook {
    pub const ALL: [Hook; 13] = [
        Hook::Reset,
        Hook::Play,
        Hook::Pause,
        Hook::Point(Team::Yellow),
        Hook::Point(Team::Blue),
        Hook::Disallow(Team::Yellow),
        Hook::Disallow(Team::Blue),
        Hook::Winner(Team::Yellow),
        Hook::Winner(Team::Blue),
        Hook::Loser(Team::Yellow),
        Hook::Loser(Team::Blue),
        Hook::Disqual(Team::Yellow),
        Hook::Disqual(Team::Blue),
    ];

    pub fn name(self) -> &'static str {
        match self {
            Hook::Reset => "reset",
            Hook::Play => "play",
            Hook::Pause => "pause",
            Hook::Point(Team::Yellow) => "point-yellow",
            Hook::Point(Team::Blue) => "point-blue",
            Hook::Disallow(Team::Yellow) => "disallow-yellow",
            Hook::Disallow(Team::Blue) => "disallow-blue",
            Hook::Winner(Team::Yellow) => "winner-yellow",
            Hook::Winner(Team::Blue) => "winner-blue",
            Hook::Loser(Team::Yellow) => "loser-yellow",
            Hook::Loser(Team::Blue) => "loser-blue",
            Hook::Disqual(Team::Yellow) => "disqual-yellow",
            Hook::Disqual(Team::Blue) => "disqual-blue",
        }
    }

    /// Hooks tied to a match outcome rather than the match lifecycle.
    pub fn is_domain(self) -> bool {
        !matches!(self, Hook::Reset | Hook::Play | Hook::Pause)
    }
}

impl fmt::Display for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Callback stored in a hook slot.
pub type HookFn = Box<dyn FnMut() + Send>;

/// Table of installed hooks.
#[derive(Default)]
pub struct HookTable {
    slots: HashMap<Hook, HookFn>,
}

impl HookTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install `callback` into `hook`, replacing any earlier registration.
    pub fn install<F>(&mut self, hook: Hook, callback: F)
    where
        F: FnMut() + Send + 'static,
    {
        self.slots.insert(hook, Box::new(callback));
    }

    /// Run the callback in `hook`. Returns whether one was installed.
    pub fn invoke(&mut self, hook: Hook) -> bool {
        match self.slots.get_mut(&hook) {
            Some(callback) => {
                callback();
                true
            }
            None => false,
        }
    }

    pub fn is_installed(&self, hook: Hook) -> bool {
        self.slots.contains_key(&hook)
    }

    pub fn installed_count(&self) -> usize {
        self.slots.len()
    }
}

impl fmt::Debug for HookTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.slots.keys().map(|h| h.name()).collect();
        names.sort_unstable();
        f.debug_struct("HookTable").field("installed", &names).finish()
    }
}
