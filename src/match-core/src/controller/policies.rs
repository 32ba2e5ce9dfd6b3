// SPDX-FileCopyrightText: 2025 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Tick pacing for the active loop.
//!
//! The tick interval bounds how long a stop or pause can go unnoticed by
//! the play body, so it is kept short while playing and relaxed otherwise.

use std::time::Duration;

use crate::phase::MatchPhase;

/// Policy for spacing active-loop ticks.
pub trait TickPolicy: Send + Sync {
    /// Interval before the next tick given the current phase.
    fn interval(&self, phase: MatchPhase) -> Duration;
}

/// Short ticks while playing, long ticks otherwise.
#[derive(Debug, Clone)]
pub struct AdaptiveTick {
    idle_interval: Duration,
    play_interval: Duration,
}

impl AdaptiveTick {
    pub fn new(idle_interval: Duration, play_interval: Duration) -> Self {
        Self {
            idle_interval,
            play_interval,
        }
    }

    /// Defaults suited to a robot control loop.
    pub fn default_device() -> Self {
        Self {
            idle_interval: Duration::from_millis(100),
            play_interval: Duration::from_millis(20),
        }
    }
}

impl Default for AdaptiveTick {
    fn default() -> Self {
        Self::default_device()
    }
}

impl TickPolicy for AdaptiveTick {
    fn interval(&self, phase: MatchPhase) -> Duration {
        if phase == MatchPhase::Play {
            self.play_interval
        } else {
            self.idle_interval
        }
    }
}

/// Constant interval regardless of phase.
#[derive(Debug, Clone)]
pub struct FixedTick {
    interval: Duration,
}

impl FixedTick {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl TickPolicy for FixedTick {
    fn interval(&self, _phase: MatchPhase) -> Duration {
        self.interval
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adaptive_tick() {
        let policy = AdaptiveTick::new(Duration::from_millis(500), Duration::from_millis(10));

        assert_eq!(policy.interval(MatchPhase::Play), Duration::from_millis(10));
        assert_eq!(policy.interval(MatchPhase::Stop), Duration::from_millis(500));
        assert_eq!(policy.interval(MatchPhase::Pause), Duration::from_millis(500));
    }

    #[test]
    fn test_fixed_tick() {
        let policy = FixedTick::new(Duration::from_millis(50));

        assert_eq!(policy.interval(MatchPhase::Play), Duration::from_millis(50));
        assert_eq!(policy.interval(MatchPhase::Stop), Duration::from_millis(50));
    }
}
