// SPDX-FileCopyrightText: 2025 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Phase indicator.
//!
//! Devices show the current phase ordinal on their display; here the
//! display is the log, and the last shown value is kept for inspection.

use std::sync::atomic::{AtomicU32, Ordering};

use tracing::info;

use match_core::controller::MatchListener;
use match_core::{MatchPhase, Role};

#[derive(Debug)]
pub struct PhaseDisplay {
    role: Role,
    shown: AtomicU32,
}

impl PhaseDisplay {
    pub fn new(role: Role) -> Self {
        Self {
            role,
            shown: AtomicU32::new(MatchPhase::Stop.code()),
        }
    }

    pub fn shown(&self) -> u32 {
        self.shown.load(Ordering::Relaxed)
    }
}

impl MatchListener for PhaseDisplay {
    fn on_phase_change(&self, old: MatchPhase, new: MatchPhase) {
        self.shown.store(new.code(), Ordering::Relaxed);
        info!("[{}] display {} ({} -> {})", self.role, new.code(), old, new);
    }
}
