// SPDX-FileCopyrightText: 2025 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Device identity: which side a device plays for and what it does.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::util::normalize_name;

/// One of the two competing sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Team {
    Yellow,
    Blue,
}

impl Team {
    pub const ALL: [Team; 2] = [Team::Yellow, Team::Blue];

    pub fn opponent(self) -> Team {
        match self {
            Team::Yellow => Team::Blue,
            Team::Blue => Team::Yellow,
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Team::Yellow => write!(f, "yellow"),
            Team::Blue => write!(f, "blue"),
        }
    }
}

/// Fixed identity of a device taking part in a match.
///
/// The role is chosen once at startup and decides which hooks a phase
/// transition is allowed to fire on this device.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    #[default]
    Arbiter,
    PlayerYellow,
    PlayerBlue,
    GoalYellow,
    GoalBlue,
}

impl Role {
    pub const ALL: [Role; 5] = [
        Role::Arbiter,
        Role::PlayerYellow,
        Role::PlayerBlue,
        Role::GoalYellow,
        Role::GoalBlue,
    ];

    /// Side this role belongs to. The arbiter is neutral.
    pub fn team(self) -> Option<Team> {
        match self {
            Role::Arbiter => None,
            Role::PlayerYellow | Role::GoalYellow => Some(Team::Yellow),
            Role::PlayerBlue | Role::GoalBlue => Some(Team::Blue),
        }
    }

    pub fn is_player(self) -> bool {
        matches!(self, Role::PlayerYellow | Role::PlayerBlue)
    }

    pub fn is_goal(self) -> bool {
        matches!(self, Role::GoalYellow | Role::GoalBlue)
    }

    pub fn is_arbiter(self) -> bool {
        matches!(self, Role::Arbiter)
    }

    /// True when this device is the player of `team`.
    pub fn is_player_of(self, team: Team) -> bool {
        self.is_player() && self.team() == Some(team)
    }

    /// True when this device is the goal sensor of `team`.
    pub fn is_goal_of(self, team: Team) -> bool {
        self.is_goal() && self.team() == Some(team)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Arbiter => "arbiter",
            Role::PlayerYellow => "player-yellow",
            Role::PlayerBlue => "player-blue",
            Role::GoalYellow => "goal-yellow",
            Role::GoalBlue => "goal-blue",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    /// Accepts `player-yellow`, `player_yellow`, `PlayerYellow` and the like.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_name(s).as_str() {
            "arbiter" | "referee" => Ok(Role::Arbiter),
            "playeryellow" => Ok(Role::PlayerYellow),
            "playerblue" => Ok(Role::PlayerBlue),
            "goalyellow" => Ok(Role::GoalYellow),
            "goalblue" => Ok(Role::GoalBlue),
            _ => Err(format!(
                "unknown role '{}' (expected one of: arbiter, player-yellow, player-blue, goal-yellow, goal-blue)",
                s
            )),
        }
    }
}
