// SPDX-FileCopyrightText: 2025 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Gate for the externally supplied play body.
//!
//! Every tick checks the phase before anything else. The body runs at most
//! once per tick and only while playing, so a stop that lands between two
//! ticks is seen on the very next one. Preempting a body that is already
//! running is not attempted; long bodies must return often.

use crate::hooks::{Hook, HookTable};
use crate::phase::MatchPhase;
use crate::role::Role;

/// What a single tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not playing; nothing to do.
    Idle,
    /// The play body ran once.
    Played,
    /// Playing, but this device has no play duty or no body installed.
    Skipped,
}

/// Tick counter and gate for the play body.
#[derive(Debug, Clone, Default)]
pub struct ActiveLoop {
    ticks: u64,
    plays: u64,
}

impl ActiveLoop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run one tick for a device in `phase`.
    pub fn tick(&mut self, role: Role, phase: MatchPhase, hooks: &mut HookTable) -> TickOutcome {
        self.ticks += 1;
        if phase != MatchPhase::Play {
            return TickOutcome::Idle;
        }
        if !role.is_player() {
            return TickOutcome::Skipped;
        }
        if hooks.invoke(Hook::Play) {
            self.plays += 1;
            TickOutcome::Played
        } else {
            TickOutcome::Skipped
        }
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Number of ticks on which the play body ran.
    pub fn plays(&self) -> u64 {
        self.plays
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counting_hooks() -> (HookTable, Arc<AtomicUsize>) {
        let mut hooks = HookTable::new();
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();
        hooks.install(Hook::Play, move || {
            c.fetch_add(1, Ordering::Relaxed);
        });
        (hooks, count)
    }

    #[test]
    fn test_idle_when_not_playing() {
        let (mut hooks, count) = counting_hooks();
        let mut active = ActiveLoop::new();
        for phase in [MatchPhase::Stop, MatchPhase::Pause] {
            assert_eq!(
                active.tick(Role::PlayerYellow, phase, &mut hooks),
                TickOutcome::Idle
            );
        }
        assert_eq!(count.load(Ordering::Relaxed), 0);
        assert_eq!(active.ticks(), 2);
    }

    #[test]
    fn test_plays_once_per_tick() {
        let (mut hooks, count) = counting_hooks();
        let mut active = ActiveLoop::new();
        for _ in 0..3 {
            assert_eq!(
                active.tick(Role::PlayerBlue, MatchPhase::Play, &mut hooks),
                TickOutcome::Played
            );
        }
        assert_eq!(count.load(Ordering::Relaxed), 3);
        assert_eq!(active.plays(), 3);
    }

    #[test]
    fn test_non_players_never_play() {
        let (mut hooks, count) = counting_hooks();
        let mut active = ActiveLoop::new();
        for role in [Role::Arbiter, Role::GoalYellow, Role::GoalBlue] {
            assert_eq!(
                active.tick(role, MatchPhase::Play, &mut hooks),
                TickOutcome::Skipped
            );
        }
        assert_eq!(count.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn test_missing_body_is_skipped() {
        let mut hooks = HookTable::new();
        let mut active = ActiveLoop::new();
        assert_eq!(
            active.tick(Role::PlayerYellow, MatchPhase::Play, &mut hooks),
            TickOutcome::Skipped
        );
        assert_eq!(active.plays(), 0);
    }
}
