// SPDX-FileCopyrightText: 2025 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Pure transition rules for inbound match phases.
//!
//! [`dispatch`] looks at the device role, the phase it is in, the phase it
//! would roll back to, and the incoming phase. It returns where the device
//! ends up and which hooks fire, in order. Nothing here touches hooks or
//! shared state, so every rule can be checked in isolation.

use crate::hooks::Hook;
use crate::phase::MatchPhase;
use crate::role::{Role, Team};

/// An inbound phase split into what happened and to whom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchEvent {
    Stop,
    Play,
    Pause,
    Point(Team),
    Disallow(Team),
    Winner(Team),
    Disqual(Team),
}

impl From<MatchPhase> for MatchEvent {
    fn from(phase: MatchPhase) -> Self {
        match phase {
            MatchPhase::Stop => MatchEvent::Stop,
            MatchPhase::Play => MatchEvent::Play,
            MatchPhase::Pause => MatchEvent::Pause,
            MatchPhase::PointYellow => MatchEvent::Point(Team::Yellow),
            MatchPhase::PointBlue => MatchEvent::Point(Team::Blue),
            MatchPhase::DisallowYellow => MatchEvent::Disallow(Team::Yellow),
            MatchPhase::DisallowBlue => MatchEvent::Disallow(Team::Blue),
            MatchPhase::WinnerYellow => MatchEvent::Winner(Team::Yellow),
            MatchPhase::WinnerBlue => MatchEvent::Winner(Team::Blue),
            MatchPhase::DisqualYellow => MatchEvent::Disqual(Team::Yellow),
            MatchPhase::DisqualBlue => MatchEvent::Disqual(Team::Blue),
        }
    }
}

impl From<MatchEvent> for MatchPhase {
    fn from(event: MatchEvent) -> Self {
        match event {
            MatchEvent::Stop => MatchPhase::Stop,
            MatchEvent::Play => MatchPhase::Play,
            MatchEvent::Pause => MatchPhase::Pause,
            MatchEvent::Point(team) => MatchPhase::point(team),
            MatchEvent::Disallow(team) => MatchPhase::disallow(team),
            MatchEvent::Winner(team) => MatchPhase::winner(team),
            MatchEvent::Disqual(team) => MatchPhase::disqual(team),
        }
    }
}

/// Outcome of dispatching one inbound phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// Phase that arrived.
    pub incoming: MatchPhase,
    /// Phase held before the dispatch.
    pub from: MatchPhase,
    /// Phase held after the dispatch. Always stable.
    pub to: MatchPhase,
    /// Phase a following disallow would restore.
    pub previous: MatchPhase,
    /// Hooks to fire, in order.
    pub hooks: Vec<Hook>,
}

impl Transition {
    pub fn changed(&self) -> bool {
        self.from != self.to
    }

    pub fn fires(&self, hook: Hook) -> bool {
        self.hooks.contains(&hook)
    }
}

/// Decide the next phase and the hooks to fire for `incoming`.
///
/// Awards (point, winner, disqualification) resolve to `Stop` and end with
/// `reset`; every device runs `reset` so all of them re-converge, while the
/// outcome hook itself only fires on the device the award concerns. An
/// award remembers the phase held right before it, so a disallow restores
/// exactly that phase. A disallow never runs `reset`.
pub fn dispatch(
    role: Role,
    current: MatchPhase,
    previous: MatchPhase,
    incoming: MatchPhase,
) -> Transition {
    let mut hooks = Vec::with_capacity(2);

    let (to, remembered) = match MatchEvent::from(incoming) {
        MatchEvent::Stop => {
            hooks.push(Hook::Reset);
            (MatchPhase::Stop, MatchPhase::Stop)
        }
        MatchEvent::Play => (MatchPhase::Play, MatchPhase::Play),
        MatchEvent::Pause => {
            hooks.push(Hook::Pause);
            (MatchPhase::Pause, MatchPhase::Pause)
        }
        MatchEvent::Point(team) => {
            if role.is_goal_of(team) {
                hooks.push(Hook::Point(team));
            }
            hooks.push(Hook::Reset);
            (MatchPhase::Stop, current)
        }
        MatchEvent::Disallow(team) => {
            if role.is_goal_of(team) {
                hooks.push(Hook::Disallow(team));
            }
            (previous, previous)
        }
        MatchEvent::Winner(team) => {
            if role.is_player_of(team) {
                hooks.push(Hook::Winner(team));
            } else if role.is_player_of(team.opponent()) {
                hooks.push(Hook::Loser(team.opponent()));
            }
            hooks.push(Hook::Reset);
            (MatchPhase::Stop, current)
        }
        MatchEvent::Disqual(team) => {
            if role.is_player_of(team) {
                hooks.push(Hook::Disqual(team));
            }
            hooks.push(Hook::Reset);
            (MatchPhase::Stop, current)
        }
    };

    Transition {
        incoming,
        from: current,
        to,
        previous: remembered,
        hooks,
    }
}
