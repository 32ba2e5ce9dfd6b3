// SPDX-FileCopyrightText: 2025 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! A single match device: role, phase state, hooks and the play gate.
//!
//! Everything a device needs lives in one owned value so several devices
//! can run side by side in one process. Calls are expected to come from
//! one task at a time; nothing in here locks.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::controller::{
    ActiveLoop, ListenerId, MatchEventEmitter, MatchListener, MatchSnapshot, MatchStateMachine,
    TickOutcome, Transition,
};
use crate::error::MatchError;
use crate::hooks::{Hook, HookTable};
use crate::phase::MatchPhase;
use crate::role::Role;

pub struct MatchDevice {
    machine: MatchStateMachine,
    hooks: HookTable,
    active: ActiveLoop,
    emitter: MatchEventEmitter,
    phase_tx: watch::Sender<MatchPhase>,
}

impl std::fmt::Debug for MatchDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatchDevice")
            .field("machine", &self.machine)
            .field("hooks", &self.hooks)
            .field("active", &self.active)
            .finish()
    }
}

impl MatchDevice {
    /// Create a device with the given role, stopped, with no hooks.
    pub fn new(role: Role) -> Self {
        let (phase_tx, _) = watch::channel(MatchPhase::Stop);
        Self {
            machine: MatchStateMachine::new(role),
            hooks: HookTable::new(),
            active: ActiveLoop::new(),
            emitter: MatchEventEmitter::new(),
            phase_tx,
        }
    }

    pub fn role(&self) -> Role {
        self.machine.role()
    }

    /// Pick the role at startup, before any phase has been received.
    pub fn set_role(&mut self, role: Role) -> Result<(), MatchError> {
        self.machine.set_role(role)
    }

    /// Phase the device is in. Long-running play bodies should bail out
    /// as soon as this is no longer [`MatchPhase::Play`].
    pub fn current_phase(&self) -> MatchPhase {
        self.machine.current()
    }

    pub fn previous_phase(&self) -> MatchPhase {
        self.machine.previous()
    }

    pub fn snapshot(&self) -> MatchSnapshot {
        self.machine.snapshot()
    }

    /// Follow phase changes from another task.
    pub fn subscribe(&self) -> watch::Receiver<MatchPhase> {
        self.phase_tx.subscribe()
    }

    pub fn install_hook<F>(&mut self, hook: Hook, callback: F)
    where
        F: FnMut() + Send + 'static,
    {
        self.hooks.install(hook, callback);
    }

    pub fn hooks(&self) -> &HookTable {
        &self.hooks
    }

    pub fn register_listener(&mut self, listener: Arc<dyn MatchListener>) -> ListenerId {
        self.emitter.register(listener)
    }

    pub fn unregister_listener(&mut self, id: ListenerId) {
        self.emitter.unregister(id);
    }

    pub fn active_loop(&self) -> &ActiveLoop {
        &self.active
    }

    /// Decode an inbound wire code and dispatch it.
    ///
    /// Unknown codes leave the phase untouched and are reported back; the
    /// device keeps running.
    pub fn receive_code(&mut self, code: u32) -> Result<Transition, MatchError> {
        match MatchPhase::from_code(code) {
            Some(phase) => Ok(self.apply(phase)),
            None => {
                warn!(
                    "Ignoring unknown match code {} (phase stays {})",
                    code,
                    self.current_phase()
                );
                self.emitter.notify_unknown_code(code);
                Err(MatchError::UnknownCode(code))
            }
        }
    }

    /// Dispatch a phase and fire the hooks it calls for, in order.
    pub fn apply(&mut self, incoming: MatchPhase) -> Transition {
        let transition = self.machine.process_phase(incoming);

        if transition.changed() {
            info!(
                "Phase {} -> {} (received {})",
                transition.from, transition.to, incoming
            );
            self.phase_tx.send_replace(transition.to);
            self.emitter.notify_phase_change(transition.from, transition.to);
        } else {
            debug!("Phase stays {} (received {})", transition.to, incoming);
        }
        self.emitter.notify_phase_received(incoming);

        for &hook in &transition.hooks {
            let installed = self.hooks.invoke(hook);
            debug!(
                "Hook {} {}",
                hook,
                if installed { "fired" } else { "not installed" }
            );
            self.emitter.notify_hook(hook, installed);
        }

        transition
    }

    /// One active-loop tick: run the play body if, and only if, playing.
    pub fn tick(&mut self) -> TickOutcome {
        let role = self.machine.role();
        let phase = self.machine.current();
        self.active.tick(role, phase, &mut self.hooks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::role::Team;
    use std::sync::Mutex;

    /// Installs a recording closure into every slot.
    fn recording_device(role: Role) -> (MatchDevice, Arc<Mutex<Vec<Hook>>>) {
        let mut device = MatchDevice::new(role);
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut all = vec![Hook::Reset, Hook::Play, Hook::Pause];
        for team in Team::ALL {
            all.extend([
                Hook::Point(team),
                Hook::Disallow(team),
                Hook::Winner(team),
                Hook::Loser(team),
                Hook::Disqual(team),
            ]);
        }
        for hook in all {
            let log = log.clone();
            device.install_hook(hook, move || log.lock().unwrap().push(hook));
        }
        (device, log)
    }

    fn count(log: &Arc<Mutex<Vec<Hook>>>, hook: Hook) -> usize {
        log.lock().unwrap().iter().filter(|&&h| h == hook).count()
    }

    #[test]
    fn test_goal_yellow_point_then_disallow() {
        let (mut device, log) = recording_device(Role::GoalYellow);
        let mut observed = Vec::new();
        for phase in [
            MatchPhase::Play,
            MatchPhase::PointYellow,
            MatchPhase::DisallowYellow,
        ] {
            device.apply(phase);
            observed.push(device.current_phase());
        }

        assert_eq!(
            observed,
            vec![MatchPhase::Play, MatchPhase::Stop, MatchPhase::Play]
        );
        assert_eq!(count(&log, Hook::Point(Team::Yellow)), 1);
        assert_eq!(count(&log, Hook::Disallow(Team::Yellow)), 1);
        assert_eq!(count(&log, Hook::Reset), 1);
        assert_eq!(
            *log.lock().unwrap(),
            vec![
                Hook::Point(Team::Yellow),
                Hook::Reset,
                Hook::Disallow(Team::Yellow)
            ]
        );
    }

    #[test]
    fn test_player_blue_loses() {
        let (mut device, log) = recording_device(Role::PlayerBlue);
        device.apply(MatchPhase::Play);
        device.apply(MatchPhase::WinnerYellow);

        assert_eq!(count(&log, Hook::Loser(Team::Blue)), 1);
        assert_eq!(count(&log, Hook::Winner(Team::Yellow)), 0);
        assert_eq!(count(&log, Hook::Winner(Team::Blue)), 0);
        assert_eq!(count(&log, Hook::Reset), 1);
        assert_eq!(device.current_phase(), MatchPhase::Stop);
    }

    #[test]
    fn test_arbiter_disqual_fires_only_reset() {
        let (mut device, log) = recording_device(Role::Arbiter);
        device.apply(MatchPhase::Play);
        device.apply(MatchPhase::DisqualBlue);

        assert_eq!(*log.lock().unwrap(), vec![Hook::Reset]);
        assert_eq!(device.current_phase(), MatchPhase::Stop);
    }

    #[test]
    fn test_other_team_point_fires_only_reset() {
        for role in Role::ALL {
            let (mut device, log) = recording_device(role);
            device.apply(MatchPhase::Play);
            let foreign = match role.team() {
                Some(team) => MatchPhase::point(team.opponent()),
                None => MatchPhase::PointYellow,
            };
            device.apply(foreign);
            let domain: Vec<_> = log
                .lock()
                .unwrap()
                .iter()
                .copied()
                .filter(|h| h.is_domain())
                .collect();
            assert!(domain.is_empty(), "{} fired {:?}", role, domain);
            assert_eq!(count(&log, Hook::Reset), 1);
        }
    }

    #[test]
    fn test_unknown_code_keeps_phase() {
        let (mut device, log) = recording_device(Role::PlayerYellow);
        device.receive_code(MatchPhase::Play.code()).unwrap();

        let err = device.receive_code(77).unwrap_err();
        assert_eq!(err, MatchError::UnknownCode(77));
        assert_eq!(device.current_phase(), MatchPhase::Play);
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn test_tick_stops_right_after_stop() {
        let (mut device, log) = recording_device(Role::PlayerYellow);
        assert_eq!(device.tick(), TickOutcome::Idle);

        device.apply(MatchPhase::Play);
        assert_eq!(device.tick(), TickOutcome::Played);
        assert_eq!(device.tick(), TickOutcome::Played);

        device.apply(MatchPhase::Stop);
        assert_eq!(device.tick(), TickOutcome::Idle);
        assert_eq!(count(&log, Hook::Play), 2);
    }

    #[test]
    fn test_tick_follows_point_and_disallow() {
        let (mut device, log) = recording_device(Role::PlayerYellow);
        device.apply(MatchPhase::Play);
        assert_eq!(device.tick(), TickOutcome::Played);

        device.apply(MatchPhase::PointBlue);
        assert_eq!(device.tick(), TickOutcome::Idle);

        device.apply(MatchPhase::DisallowBlue);
        assert_eq!(device.current_phase(), MatchPhase::Play);
        assert_eq!(device.tick(), TickOutcome::Played);

        device.apply(MatchPhase::Pause);
        assert_eq!(device.tick(), TickOutcome::Idle);
        assert_eq!(count(&log, Hook::Play), 2);
    }

    #[test]
    fn test_disallow_before_any_award_stays_stopped() {
        let (mut device, log) = recording_device(Role::GoalYellow);
        device.apply(MatchPhase::DisallowYellow);
        assert_eq!(device.current_phase(), MatchPhase::Stop);
        assert_eq!(*log.lock().unwrap(), vec![Hook::Disallow(Team::Yellow)]);
    }

    #[test]
    fn test_never_transient_between_ticks() {
        let (mut device, _log) = recording_device(Role::GoalBlue);
        for phase in MatchPhase::ALL {
            device.apply(phase);
            assert!(device.current_phase().is_stable());
            device.tick();
        }
    }

    #[test]
    fn test_subscribe_sees_changes() {
        let (mut device, _log) = recording_device(Role::Arbiter);
        let rx = device.subscribe();
        assert_eq!(*rx.borrow(), MatchPhase::Stop);
        device.apply(MatchPhase::Play);
        assert_eq!(*rx.borrow(), MatchPhase::Play);
        device.apply(MatchPhase::PointBlue);
        assert_eq!(*rx.borrow(), MatchPhase::Stop);
    }

    #[test]
    fn test_listener_sees_hooks_and_changes() {
        #[derive(Default)]
        struct Recorder {
            hooks: Mutex<Vec<(Hook, bool)>>,
            changes: Mutex<Vec<(MatchPhase, MatchPhase)>>,
        }
        impl MatchListener for Recorder {
            fn on_phase_change(&self, old: MatchPhase, new: MatchPhase) {
                self.changes.lock().unwrap().push((old, new));
            }
            fn on_hook(&self, hook: Hook, installed: bool) {
                self.hooks.lock().unwrap().push((hook, installed));
            }
        }

        let mut device = MatchDevice::new(Role::GoalBlue);
        let recorder = Arc::new(Recorder::default());
        device.register_listener(recorder.clone());

        device.apply(MatchPhase::Play);
        device.apply(MatchPhase::PointBlue);

        assert_eq!(
            *recorder.changes.lock().unwrap(),
            vec![
                (MatchPhase::Stop, MatchPhase::Play),
                (MatchPhase::Play, MatchPhase::Stop)
            ]
        );
        assert_eq!(
            *recorder.hooks.lock().unwrap(),
            vec![(Hook::Point(Team::Blue), false), (Hook::Reset, false)]
        );
    }

    #[test]
    fn test_received_is_reported_after_dispatch() {
        struct Seen {
            phase_rx: watch::Receiver<MatchPhase>,
            log: Mutex<Vec<(MatchPhase, MatchPhase)>>,
        }
        impl MatchListener for Seen {
            fn on_phase_received(&self, incoming: MatchPhase) {
                let now = *self.phase_rx.borrow();
                self.log.lock().unwrap().push((incoming, now));
            }
        }

        let mut device = MatchDevice::new(Role::PlayerBlue);
        let seen = Arc::new(Seen {
            phase_rx: device.subscribe(),
            log: Mutex::new(Vec::new()),
        });
        device.register_listener(seen.clone());

        device.apply(MatchPhase::Play);
        device.apply(MatchPhase::WinnerBlue);
        device.apply(MatchPhase::Stop);

        assert_eq!(
            *seen.log.lock().unwrap(),
            vec![
                (MatchPhase::Play, MatchPhase::Play),
                (MatchPhase::WinnerBlue, MatchPhase::Stop),
                (MatchPhase::Stop, MatchPhase::Stop),
            ]
        );
    }

    #[test]
    fn test_disallow_after_second_award_does_not_resume_play() {
        let (mut device, log) = recording_device(Role::PlayerYellow);
        device.apply(MatchPhase::Play);
        assert_eq!(device.tick(), TickOutcome::Played);

        device.apply(MatchPhase::PointBlue);
        device.apply(MatchPhase::PointYellow);
        let plays_after_award = count(&log, Hook::Play);

        device.apply(MatchPhase::DisallowYellow);
        assert_eq!(device.current_phase(), MatchPhase::Stop);
        assert_eq!(device.tick(), TickOutcome::Idle);
        assert_eq!(count(&log, Hook::Play), plays_after_award);
        assert_eq!(device.active_loop().plays(), 1);
    }
}
