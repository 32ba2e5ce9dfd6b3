// SPDX-FileCopyrightText: 2025 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

use thiserror::Error;

/// Errors surfaced by the match core.
///
/// None of these are fatal to a device: the offending message is dropped
/// and the phase is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchError {
    #[error("unknown match code {0}")]
    UnknownCode(u32),

    #[error("radio transport error: {0}")]
    Transport(String),

    #[error("role is fixed once the match has started (device is {0})")]
    RoleLocked(crate::role::Role),
}
