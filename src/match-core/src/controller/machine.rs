// SPDX-FileCopyrightText: 2025 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Phase state held by a single device.
//!
//! The machine owns the current phase and the one-deep rollback slot and
//! applies [`dispatch`] results to them. Hooks are fired by the caller.

use serde::Serialize;

use crate::error::MatchError;
use crate::phase::MatchPhase;
use crate::role::Role;

use super::dispatcher::{dispatch, Transition};

/// Serializable view of the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MatchSnapshot {
    pub role: Role,
    pub phase: MatchPhase,
    pub previous: MatchPhase,
    pub transition_count: u64,
}

/// Current and previous phase of one device.
#[derive(Debug, Clone)]
pub struct MatchStateMachine {
    role: Role,
    current: MatchPhase,
    previous: MatchPhase,
    transition_count: u64,
    started: bool,
}

impl MatchStateMachine {
    /// Create a machine in `Stop` with nothing to roll back to.
    pub fn new(role: Role) -> Self {
        Self {
            role,
            current: MatchPhase::Stop,
            previous: MatchPhase::Stop,
            transition_count: 0,
            started: false,
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    /// Change the role. Only allowed before the first phase is processed.
    pub fn set_role(&mut self, role: Role) -> Result<(), MatchError> {
        if self.started {
            return Err(MatchError::RoleLocked(self.role));
        }
        self.role = role;
        Ok(())
    }

    pub fn current(&self) -> MatchPhase {
        self.current
    }

    pub fn previous(&self) -> MatchPhase {
        self.previous
    }

    pub fn is_playing(&self) -> bool {
        self.current == MatchPhase::Play
    }

    /// Number of dispatches that changed the current phase.
    pub fn transition_count(&self) -> u64 {
        self.transition_count
    }

    pub fn snapshot(&self) -> MatchSnapshot {
        MatchSnapshot {
            role: self.role,
            phase: self.current,
            previous: self.previous,
            transition_count: self.transition_count,
        }
    }

    /// Apply an inbound phase and return what happened.
    ///
    /// The previous-phase slot is written at the end of the cycle, after
    /// the new current phase is known.
    pub fn process_phase(&mut self, incoming: MatchPhase) -> Transition {
        self.started = true;
        let transition = dispatch(self.role, self.current, self.previous, incoming);
        if transition.changed() {
            self.transition_count += 1;
        }
        self.current = transition.to;
        self.previous = transition.previous;
        transition
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let sm = MatchStateMachine::new(Role::PlayerYellow);
        assert_eq!(sm.current(), MatchPhase::Stop);
        assert_eq!(sm.previous(), MatchPhase::Stop);
        assert_eq!(sm.transition_count(), 0);
        assert!(!sm.is_playing());
    }

    #[test]
    fn test_previous_recorded_after_cycle() {
        let mut sm = MatchStateMachine::new(Role::GoalBlue);

        sm.process_phase(MatchPhase::Play);
        assert_eq!(sm.current(), MatchPhase::Play);
        assert_eq!(sm.previous(), MatchPhase::Play);

        sm.process_phase(MatchPhase::PointBlue);
        assert_eq!(sm.current(), MatchPhase::Stop);
        assert_eq!(sm.previous(), MatchPhase::Play);

        sm.process_phase(MatchPhase::DisallowBlue);
        assert_eq!(sm.current(), MatchPhase::Play);
        assert!(sm.is_playing());
    }

    #[test]
    fn test_role_locked_after_first_phase() {
        let mut sm = MatchStateMachine::new(Role::Arbiter);
        sm.set_role(Role::GoalYellow).unwrap();
        assert_eq!(sm.role(), Role::GoalYellow);

        sm.process_phase(MatchPhase::Stop);
        assert_eq!(
            sm.set_role(Role::PlayerBlue),
            Err(MatchError::RoleLocked(Role::GoalYellow))
        );
        assert_eq!(sm.role(), Role::GoalYellow);
    }

    #[test]
    fn test_pause_then_resume() {
        let mut sm = MatchStateMachine::new(Role::PlayerBlue);
        sm.process_phase(MatchPhase::Play);
        sm.process_phase(MatchPhase::Pause);
        assert_eq!(sm.current(), MatchPhase::Pause);
        sm.process_phase(MatchPhase::Play);
        assert_eq!(sm.current(), MatchPhase::Play);
    }

    #[test]
    fn test_transition_count_ignores_repeats() {
        let mut sm = MatchStateMachine::new(Role::Arbiter);
        sm.process_phase(MatchPhase::Play);
        sm.process_phase(MatchPhase::Play);
        sm.process_phase(MatchPhase::Stop);
        sm.process_phase(MatchPhase::Stop);
        assert_eq!(sm.transition_count(), 2);
        assert_eq!(sm.current(), MatchPhase::Stop);
    }

    #[test]
    fn test_snapshot_serializes() {
        let mut sm = MatchStateMachine::new(Role::GoalYellow);
        sm.process_phase(MatchPhase::Play);
        let snap = sm.snapshot();
        assert_eq!(snap.phase, MatchPhase::Play);
        let text = toml::to_string(&snap).unwrap();
        assert!(text.contains("role = \"goal-yellow\""));
        assert!(text.contains("phase = \"play\""));
    }
}
