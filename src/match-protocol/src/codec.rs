// SPDX-FileCopyrightText: 2025 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Codec utilities for match codes on the wire and phase names in text.
//!
//! On a datagram transport a match code is a single big-endian `u32` and
//! nothing else: no header, no checksum, no sequence number.

use thiserror::Error;

use match_core::{normalize_name, MatchPhase};

use crate::mapping::{legacy_to_phase, LegacyMatch};

/// Size of one encoded match code.
pub const FRAME_LEN: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("expected a {FRAME_LEN}-byte frame, got {0} bytes")]
    BadFrameLength(usize),

    #[error("unknown match code {0}")]
    UnknownCode(u32),

    #[error("unknown phase name '{0}'")]
    UnknownName(String),
}

/// Encode a raw match code.
pub fn encode_code(code: u32) -> [u8; FRAME_LEN] {
    code.to_be_bytes()
}

/// Decode a frame into a raw code without interpreting it.
///
/// Interpretation is left to the receiving device so that an unknown code
/// is handled in one place.
pub fn decode_frame(frame: &[u8]) -> Result<u32, CodecError> {
    let bytes: [u8; FRAME_LEN] = frame
        .try_into()
        .map_err(|_| CodecError::BadFrameLength(frame.len()))?;
    Ok(u32::from_be_bytes(bytes))
}

/// Parse a phase from text.
///
/// Accepts wire ordinals (`"2"`), kebab/snake/camel names (`point-yellow`,
/// `point_yellow`, `PointYellow`), the aliases `reset` and `start`, and the
/// legacy A/B names (`PointA`, `winner-b`).
pub fn parse_phase(s: &str) -> Result<MatchPhase, CodecError> {
    let trimmed = s.trim();
    if let Ok(code) = trimmed.parse::<u32>() {
        return MatchPhase::from_code(code).ok_or(CodecError::UnknownCode(code));
    }

    let key = normalize_name(trimmed);

    if let Some(phase) = MatchPhase::ALL
        .iter()
        .find(|p| normalize_name(p.as_str()) == key)
    {
        return Ok(*phase);
    }

    match key.as_str() {
        "reset" => return Ok(MatchPhase::Stop),
        "start" => return Ok(MatchPhase::Play),
        _ => {}
    }

    LegacyMatch::ALL
        .iter()
        .find(|l| normalize_name(l.name()) == key)
        .map(|l| legacy_to_phase(*l))
        .ok_or_else(|| CodecError::UnknownName(trimmed.to_string()))
}

/// Canonical text form of a phase; the inverse of [`parse_phase`].
pub fn phase_to_string(phase: MatchPhase) -> String {
    phase.as_str().to_string()
}
