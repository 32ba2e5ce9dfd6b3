// SPDX-FileCopyrightText: 2025 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Match controller components.
//!
//! This module contains the transition rules, the per-device phase state,
//! the play-body gate, listener notification and tick pacing.

pub mod active_loop;
pub mod dispatcher;
pub mod events;
pub mod machine;
pub mod policies;

pub use active_loop::{ActiveLoop, TickOutcome};
pub use dispatcher::{dispatch, MatchEvent, Transition};
pub use events::{ListenerId, MatchEventEmitter, MatchListener};
pub use machine::{MatchSnapshot, MatchStateMachine};
pub use policies::{AdaptiveTick, FixedTick, TickPolicy};
