// SPDX-FileCopyrightText: 2025 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

mod config;
mod console;
mod device_task;
mod display;
mod radio;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::io::BufReader;
use tokio::signal;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, trace};

use match_app::init_logging;
use match_core::{DynResult, Hook, MatchDevice, RadioLink, Role};

use config::DeviceConfig;
use device_task::{run_device_task, DeviceCommand, SHUTDOWN_GRACE};
use display::PhaseDisplay;

const PKG_DESCRIPTION: &str = concat!(env!("CARGO_PKG_NAME"), " - match device daemon");
const CODE_CHANNEL_BUFFER: usize = 32;
const COMMAND_CHANNEL_BUFFER: usize = 8;

#[derive(Debug, Parser)]
#[command(
    author = env!("CARGO_PKG_AUTHORS"),
    version = env!("CARGO_PKG_VERSION"),
    about = PKG_DESCRIPTION,
)]
struct Cli {
    /// Path to configuration file
    #[arg(long = "config", short = 'C', value_name = "FILE")]
    config: Option<PathBuf>,
    /// Print example configuration and exit
    #[arg(long = "print-config")]
    print_config: bool,
    /// Device role (arbiter, player-yellow, player-blue, goal-yellow, goal-blue)
    #[arg(short = 'r', long = "role")]
    role: Option<String>,
    /// Address to receive match codes on
    #[arg(short = 'b', long = "bind", value_name = "ADDR")]
    bind: Option<SocketAddr>,
    /// Peer to send match codes to (repeatable; replaces configured peers)
    #[arg(short = 'p', long = "peer", value_name = "ADDR")]
    peers: Vec<SocketAddr>,
    /// Read phases to announce from stdin (arbiter only)
    #[arg(long = "console")]
    console: bool,
}

/// Merge CLI arguments over the loaded file configuration.
fn apply_cli_overrides(cli: &Cli, cfg: &mut DeviceConfig) -> DynResult<()> {
    if let Some(ref role) = cli.role {
        cfg.device.role = role.parse::<Role>()?;
    }
    if let Some(bind) = cli.bind {
        cfg.radio.bind = bind;
    }
    if !cli.peers.is_empty() {
        cfg.radio.peers = cli.peers.clone();
    }
    if cli.console {
        cfg.console.enabled = true;
    }
    Ok(())
}

/// Build a device whose hooks report what happens on the field.
///
/// Real hardware would drive motors or lights from these slots; this
/// binary only logs them.
fn build_device(role: Role) -> (MatchDevice, Arc<PhaseDisplay>) {
    let mut device = MatchDevice::new(role);
    for hook in Hook::ALL {
        if hook == Hook::Play {
            device.install_hook(hook, move || trace!("[{}] play", role));
        } else {
            device.install_hook(hook, move || info!("[{}] {}", role, hook));
        }
    }
    let display = Arc::new(PhaseDisplay::new(role));
    device.register_listener(display.clone());
    (device, display)
}

#[tokio::main]
async fn main() -> DynResult<()> {
    let cli = Cli::parse();

    if cli.print_config {
        println!("{}", DeviceConfig::example_combined_toml());
        return Ok(());
    }

    let (mut cfg, config_path) = if let Some(ref path) = cli.config {
        let cfg = DeviceConfig::load_from_file(path)?;
        (cfg, Some(path.clone()))
    } else {
        DeviceConfig::load_from_default_paths()?
    };
    apply_cli_overrides(&cli, &mut cfg)?;
    cfg.validate().map_err(|e| format!("Invalid device configuration: {}", e))?;

    init_logging(cfg.general.log_level.as_deref());

    if let Some(ref path) = config_path {
        info!("Loaded configuration from {}", path.display());
    }

    let role = cfg.device.role;
    info!(
        "Starting match-device (role: {}, bind: {}, peers: {})",
        role,
        cfg.radio.bind,
        cfg.radio
            .peers
            .iter()
            .map(|p| p.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    );

    let (udp_radio, udp_receiver) = radio::open(&cfg.radio).await?;
    info!(
        "Radio listening on {}, sending from {}",
        udp_receiver.local_addr()?,
        udp_radio.local_addr()?
    );
    let (device, display) = build_device(role);
    let link = RadioLink::new(device, udp_radio);

    let (code_tx, code_rx) = mpsc::channel::<u32>(CODE_CHANNEL_BUFFER);
    let (command_tx, command_rx) = mpsc::channel::<DeviceCommand>(COMMAND_CHANNEL_BUFFER);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let mut task_handles: Vec<JoinHandle<()>> = Vec::new();

    let receiver_shutdown_rx = shutdown_rx.clone();
    task_handles.push(tokio::spawn(async move {
        if let Err(e) = radio::run_receiver(udp_receiver, code_tx, receiver_shutdown_rx).await {
            error!("Radio receiver error: {:?}", e);
        }
    }));

    if cfg.console.enabled {
        let console_shutdown_rx = shutdown_rx.clone();
        task_handles.push(tokio::spawn(async move {
            let stdin = BufReader::new(tokio::io::stdin());
            tokio::select! {
                res = console::run_console(stdin, command_tx) => {
                    if let Err(e) = res {
                        error!("Console error: {:?}", e);
                    }
                }
                _ = device_task::wait_for_shutdown(console_shutdown_rx) => {}
            }
        }));
    } else {
        drop(command_tx);
    }

    let policy = cfg.tick.policy();
    let mut device_handle = tokio::spawn(run_device_task(
        link,
        policy,
        code_rx,
        command_rx,
        shutdown_rx,
    ));

    tokio::select! {
        res = signal::ctrl_c() => {
            res?;
            info!("Ctrl+C received, shutting down");
        }
        res = &mut device_handle => {
            match res {
                Ok(Ok(_)) => info!("Device task finished"),
                Ok(Err(e)) => error!("Device task error: {:?}", e),
                Err(e) => error!("Device task panicked: {:?}", e),
            }
        }
    }

    let _ = shutdown_tx.send(true);
    if !device_handle.is_finished() {
        match tokio::time::timeout(SHUTDOWN_GRACE, &mut device_handle).await {
            Ok(Ok(Ok(link))) => {
                let snapshot = link.device().snapshot();
                info!(
                    "Final phase {} after {} transitions",
                    snapshot.phase, snapshot.transition_count
                );
            }
            Ok(_) => {}
            Err(_) => device_handle.abort(),
        }
    }
    let shown = display.shown();
    debug!("Display showed {} at exit", shown);

    tokio::time::sleep(SHUTDOWN_GRACE).await;
    for handle in &task_handles {
        if !handle.is_finished() {
            handle.abort();
        }
    }
    for handle in task_handles {
        let _ = handle.await;
    }
    Ok(())
}
