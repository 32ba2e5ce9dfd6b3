// SPDX-FileCopyrightText: 2025 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Task owning the device.
//!
//! Ticks, inbound codes, console commands and shutdown all arrive here and
//! are handled one at a time, so the device never sees two events at once.

use std::pin::Pin;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::time::{self, Sleep};
use tracing::{debug, info, warn};

use match_core::controller::TickPolicy;
use match_core::{DynResult, MatchPhase, RadioLink, RadioTransport};

/// Requests from the operator console.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceCommand {
    /// Apply a phase locally and put it on the air.
    Announce(MatchPhase),
    /// Log a snapshot of the device.
    Status,
}

/// Run the device until shutdown or until the radio receiver goes away.
///
/// Returns the link so the caller can inspect the final state.
pub async fn run_device_task<T, P>(
    mut link: RadioLink<T>,
    policy: P,
    mut code_rx: mpsc::Receiver<u32>,
    mut command_rx: mpsc::Receiver<DeviceCommand>,
    mut shutdown_rx: watch::Receiver<bool>,
) -> DynResult<RadioLink<T>>
where
    T: RadioTransport,
    P: TickPolicy,
{
    info!(
        "Device task started (role: {}, phase: {})",
        link.device().role(),
        link.device().current_phase()
    );

    let mut tick_interval = policy.interval(link.device().current_phase());
    let mut tick_sleep: Pin<Box<Sleep>> = Box::pin(time::sleep(tick_interval));
    let mut commands_open = true;

    loop {
        let next_interval = policy.interval(link.device().current_phase());
        if next_interval != tick_interval {
            tick_interval = next_interval;
            tick_sleep = Box::pin(time::sleep(tick_interval));
        }

        tokio::select! {
            biased;

            changed = shutdown_rx.changed() => {
                if changed.is_err() || *shutdown_rx.borrow() {
                    info!("Device task shutting down");
                    break;
                }
            }
            code = code_rx.recv() => {
                let Some(code) = code else {
                    warn!("Radio receiver closed, stopping device task");
                    break;
                };
                if let Err(e) = link.on_receive(code) {
                    debug!("Inbound code rejected: {}", e);
                }
            }
            command = command_rx.recv(), if commands_open => {
                match command {
                    Some(DeviceCommand::Announce(phase)) => {
                        if let Err(e) = link.announce(phase).await {
                            warn!("Announce of {} failed: {}", phase, e);
                        }
                    }
                    Some(DeviceCommand::Status) => {
                        let snapshot = link.device().snapshot();
                        info!(
                            "Status: role {}, phase {} (previous {}), {} transitions, {} ticks, {} plays",
                            snapshot.role,
                            snapshot.phase,
                            snapshot.previous,
                            snapshot.transition_count,
                            link.device().active_loop().ticks(),
                            link.device().active_loop().plays()
                        );
                    }
                    None => {
                        debug!("Console closed");
                        commands_open = false;
                    }
                }
            }
            _ = &mut tick_sleep => {
                tick_sleep = Box::pin(time::sleep(tick_interval));
                link.tick();
            }
        }
    }

    Ok(link)
}

/// Resolves once shutdown has been requested.
pub async fn wait_for_shutdown(mut shutdown_rx: watch::Receiver<bool>) {
    if *shutdown_rx.borrow() {
        return;
    }
    while shutdown_rx.changed().await.is_ok() {
        if *shutdown_rx.borrow() {
            break;
        }
    }
}

/// Upper bound on how long shutdown waits for tasks before aborting them.
pub const SHUTDOWN_GRACE: Duration = Duration::from_millis(400);
