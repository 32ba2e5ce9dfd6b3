// SPDX-FileCopyrightText: 2025 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Mapping between the team-agnostic legacy alphabet and match phases.
//!
//! Older devices name the sides A and B instead of yellow and blue. The
//! ordinals are identical, team A is yellow and team B is blue, and the
//! legacy alphabet has no pause.

use match_core::MatchPhase;

/// Legacy match code alphabet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegacyMatch {
    Stop,
    Start,
    PointA,
    PointB,
    DisallowA,
    DisallowB,
    WinnerA,
    WinnerB,
    DisqualA,
    DisqualB,
}

impl LegacyMatch {
    pub const ALL: [LegacyMatch; 10] = [
        LegacyMatch::Stop,
        LegacyMatch::Start,
        LegacyMatch::PointA,
        LegacyMatch::PointB,
        LegacyMatch::DisallowA,
        LegacyMatch::DisallowB,
        LegacyMatch::WinnerA,
        LegacyMatch::WinnerB,
        LegacyMatch::DisqualA,
        LegacyMatch::DisqualB,
    ];

    pub fn name(self) -> &'static str {
        match self {
            LegacyMatch::Stop => "Stop",
            LegacyMatch::Start => "Start",
            LegacyMatch::PointA => "PointA",
            LegacyMatch::PointB => "PointB",
            LegacyMatch::DisallowA => "DisallowA",
            LegacyMatch::DisallowB => "DisallowB",
            LegacyMatch::WinnerA => "WinnerA",
            LegacyMatch::WinnerB => "WinnerB",
            LegacyMatch::DisqualA => "DisqualA",
            LegacyMatch::DisqualB => "DisqualB",
        }
    }
}

/// Convert a legacy code to its match phase.
pub fn legacy_to_phase(legacy: LegacyMatch) -> MatchPhase {
    match legacy {
        LegacyMatch::Stop => MatchPhase::Stop,
        LegacyMatch::Start => MatchPhase::Play,
        LegacyMatch::PointA => MatchPhase::PointYellow,
        LegacyMatch::PointB => MatchPhase::PointBlue,
        LegacyMatch::DisallowA => MatchPhase::DisallowYellow,
        LegacyMatch::DisallowB => MatchPhase::DisallowBlue,
        LegacyMatch::WinnerA => MatchPhase::WinnerYellow,
        LegacyMatch::WinnerB => MatchPhase::WinnerBlue,
        LegacyMatch::DisqualA => MatchPhase::DisqualYellow,
        LegacyMatch::DisqualB => MatchPhase::DisqualBlue,
    }
}

/// Convert a match phase to the legacy alphabet, if it has a counterpart.
pub fn phase_to_legacy(phase: MatchPhase) -> Option<LegacyMatch> {
    match phase {
        MatchPhase::Stop => Some(LegacyMatch::Stop),
        MatchPhase::Play => Some(LegacyMatch::Start),
        MatchPhase::PointYellow => Some(LegacyMatch::PointA),
        MatchPhase::PointBlue => Some(LegacyMatch::PointB),
        MatchPhase::DisallowYellow => Some(LegacyMatch::DisallowA),
        MatchPhase::DisallowBlue => Some(LegacyMatch::DisallowB),
        MatchPhase::WinnerYellow => Some(LegacyMatch::WinnerA),
        MatchPhase::WinnerBlue => Some(LegacyMatch::WinnerB),
        MatchPhase::DisqualYellow => Some(LegacyMatch::DisqualA),
        MatchPhase::DisqualBlue => Some(LegacyMatch::DisqualB),
        MatchPhase::Pause => None,
    }
}
