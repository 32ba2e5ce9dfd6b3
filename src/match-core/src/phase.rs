// SPDX-FileCopyrightText: 2025 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Match phases and their wire ordinals.
//!
//! A phase travels over the radio as its bare ordinal, so the numbering
//! below is the wire format. Codes 0..=9 line up with the older
//! team-agnostic alphabet (Stop, Start, PointA, PointB, ...). New phases
//! may only ever be appended.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::MatchError;
use crate::role::Team;

/// Shared stage or outcome of the match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[repr(u32)]
pub enum MatchPhase {
    #[default]
    Stop = 0,
    Play = 1,
    PointYellow = 2,
    PointBlue = 3,
    DisallowYellow = 4,
    DisallowBlue = 5,
    WinnerYellow = 6,
    WinnerBlue = 7,
    DisqualYellow = 8,
    DisqualBlue = 9,
    Pause = 10,
}

impl MatchPhase {
    /// Every phase in wire order.
    pub const ALL: [MatchPhase; 11] = [
        MatchPhase::Stop,
        MatchPhase::Play,
        MatchPhase::PointYellow,
        MatchPhase::PointBlue,
        MatchPhase::DisallowYellow,
        MatchPhase::DisallowBlue,
        MatchPhase::WinnerYellow,
        MatchPhase::WinnerBlue,
        MatchPhase::DisqualYellow,
        MatchPhase::DisqualBlue,
        MatchPhase::Pause,
    ];

    /// Wire ordinal of this phase.
    pub fn code(self) -> u32 {
        self as u32
    }

    /// Decode a wire ordinal. Unknown codes yield `None`.
    pub fn from_code(code: u32) -> Option<Self> {
        Self::ALL.get(usize::try_from(code).ok()?).copied()
    }

    pub fn point(team: Team) -> Self {
        match team {
            Team::Yellow => MatchPhase::PointYellow,
            Team::Blue => MatchPhase::PointBlue,
        }
    }

    pub fn disallow(team: Team) -> Self {
        match team {
            Team::Yellow => MatchPhase::DisallowYellow,
            Team::Blue => MatchPhase::DisallowBlue,
        }
    }

    pub fn winner(team: Team) -> Self {
        match team {
            Team::Yellow => MatchPhase::WinnerYellow,
            Team::Blue => MatchPhase::WinnerBlue,
        }
    }

    pub fn disqual(team: Team) -> Self {
        match team {
            Team::Yellow => MatchPhase::DisqualYellow,
            Team::Blue => MatchPhase::DisqualBlue,
        }
    }

    /// Stable phases may persist until the next inbound event.
    pub fn is_stable(self) -> bool {
        matches!(self, MatchPhase::Stop | MatchPhase::Play | MatchPhase::Pause)
    }

    /// Transient phases live for a single dispatch cycle.
    pub fn is_transient(self) -> bool {
        !self.is_stable()
    }

    /// Side a transient phase concerns, `None` for stable phases.
    pub fn team(self) -> Option<Team> {
        match self {
            MatchPhase::PointYellow
            | MatchPhase::DisallowYellow
            | MatchPhase::WinnerYellow
            | MatchPhase::DisqualYellow => Some(Team::Yellow),
            MatchPhase::PointBlue
            | MatchPhase::DisallowBlue
            | MatchPhase::WinnerBlue
            | MatchPhase::DisqualBlue => Some(Team::Blue),
            MatchPhase::Stop | MatchPhase::Play | MatchPhase::Pause => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MatchPhase::Stop => "stop",
            MatchPhase::Play => "play",
            MatchPhase::PointYellow => "point-yellow",
            MatchPhase::PointBlue => "point-blue",
            MatchPhase::DisallowYellow => "disallow-yellow",
            MatchPhase::DisallowBlue => "disallow-blue",
            MatchPhase::WinnerYellow => "winner-yellow",
            MatchPhase::WinnerBlue => "winner-blue",
            MatchPhase::DisqualYellow => "disqual-yellow",
            MatchPhase::DisqualBlue => "disqual-blue",
            MatchPhase::Pause => "pause",
        }
    }
}

impl fmt::Display for MatchPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<u32> for MatchPhase {
    type Error = MatchError;

    fn try_from(code: u32) -> Result<Self, Self::Error> {
        Self::from_code(code).ok_or(MatchError::UnknownCode(code))
    }
}

impl From<MatchPhase> for u32 {
    fn from(phase: MatchPhase) -> Self {
        phase.code()
    }
}
