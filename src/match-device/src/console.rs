// SPDX-FileCopyrightText: 2025 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Line-oriented operator console for the arbiter.
//!
//! Each line names one phase to announce (`play`, `point-yellow`, `PointA`,
//! `2`, ...). `status` logs a snapshot and `help` lists the phases.

use std::io;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tracing::{info, warn};

use match_core::{normalize_name, MatchPhase};
use match_protocol::codec::{parse_phase, phase_to_string};
use match_protocol::mapping::phase_to_legacy;

use crate::device_task::DeviceCommand;

/// Turn one console line into a command. `Ok(None)` means nothing to send.
pub fn parse_command(line: &str) -> Result<Option<DeviceCommand>, String> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }

    match normalize_name(trimmed).as_str() {
        "status" => return Ok(Some(DeviceCommand::Status)),
        "help" => {
            info!("Phases: {}", phase_listing());
            return Ok(None);
        }
        _ => {}
    }

    parse_phase(trimmed)
        .map(|phase| Some(DeviceCommand::Announce(phase)))
        .map_err(|e| e.to_string())
}

/// Every phase with its ordinal and, where one exists, its legacy name.
pub fn phase_listing() -> String {
    MatchPhase::ALL
        .iter()
        .map(|&p| match phase_to_legacy(p) {
            Some(legacy) => format!("{} ({}, {})", phase_to_string(p), p.code(), legacy.name()),
            None => format!("{} ({})", phase_to_string(p), p.code()),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Read commands until EOF or until the device task is gone.
pub async fn run_console<R>(reader: R, command_tx: mpsc::Sender<DeviceCommand>) -> io::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    info!("Console ready; type a phase name or 'help'");
    let mut lines = reader.lines();

    while let Some(line) = lines.next_line().await? {
        match parse_command(&line) {
            Ok(Some(command)) => {
                if command_tx.send(command).await.is_err() {
                    break;
                }
            }
            Ok(None) => {}
            Err(e) => warn!("Ignoring '{}': {}", line.trim(), e),
        }
    }

    info!("Console closed");
    Ok(())
}
