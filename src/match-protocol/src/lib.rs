// SPDX-FileCopyrightText: 2025 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Wire and text encodings for match codes.
//!
//! This crate turns match phases into datagram frames and back, parses
//! phase names typed by an operator, and maps the legacy A/B alphabet.

pub mod codec;
pub mod mapping;

pub use codec::{decode_frame, encode_code, parse_phase, phase_to_string, CodecError, FRAME_LEN};
pub use mapping::{legacy_to_phase, phase_to_legacy, LegacyMatch};
