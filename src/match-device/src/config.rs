// SPDX-FileCopyrightText: 2025 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Configuration file support for match-device.
//!
//! Config is loaded from the `[match-device]` section of `match-rs.toml`.
//! Default search order:
//! 1. Path specified via `--config` CLI argument
//! 2. `./match-rs.toml`
//! 3. `~/.config/match-rs/match-rs.toml`
//! 4. `/etc/match-rs/match-rs.toml`

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use match_app::{ConfigError, ConfigFile};
use match_core::controller::AdaptiveTick;
use match_core::Role;

/// Default UDP port shared by every device on the field.
pub const DEFAULT_RADIO_PORT: u16 = 4540;

/// Top-level device configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// General settings
    pub general: GeneralConfig,
    /// Device identity
    pub device: DeviceSection,
    /// Active loop pacing
    pub tick: TickConfig,
    /// UDP radio
    pub radio: RadioConfig,
    /// Arbiter stdin console
    pub console: ConsoleConfig,
}

/// General application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level (trace, debug, info, warn, error)
    pub log_level: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceSection {
    /// Fixed role for the lifetime of the process
    pub role: Role,
}

/// Active loop pacing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TickConfig {
    /// Tick interval in milliseconds outside of play
    pub idle_interval_ms: u64,
    /// Tick interval in milliseconds while playing
    pub play_interval_ms: u64,
}

impl Default for TickConfig {
    fn default() -> Self {
        Self {
            idle_interval_ms: 100,
            play_interval_ms: 20,
        }
    }
}

impl TickConfig {
    pub fn policy(&self) -> AdaptiveTick {
        AdaptiveTick::new(
            Duration::from_millis(self.idle_interval_ms),
            Duration::from_millis(self.play_interval_ms),
        )
    }
}

/// UDP radio configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RadioConfig {
    /// Address to receive match codes on
    pub bind: SocketAddr,
    /// Addresses every outgoing code is sent to
    pub peers: Vec<SocketAddr>,
    /// Allow sending to broadcast addresses
    pub broadcast: bool,
}

impl Default for RadioConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from((Ipv4Addr::UNSPECIFIED, DEFAULT_RADIO_PORT)),
            peers: vec![SocketAddr::from((Ipv4Addr::BROADCAST, DEFAULT_RADIO_PORT))],
            broadcast: true,
        }
    }
}

/// Arbiter console configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Read phases to announce from stdin
    pub enabled: bool,
}

impl DeviceConfig {
    /// Validate configuration values that serde cannot check on its own.
    pub fn validate(&self) -> Result<(), String> {
        validate_log_level(self.general.log_level.as_deref())?;

        if self.tick.idle_interval_ms == 0 {
            return Err("[tick].idle_interval_ms must be > 0".to_string());
        }
        if self.tick.play_interval_ms == 0 {
            return Err("[tick].play_interval_ms must be > 0".to_string());
        }

        if self.radio.bind.port() == 0 {
            return Err("[radio].bind port must be > 0".to_string());
        }
        for peer in &self.radio.peers {
            if peer.port() == 0 {
                return Err(format!("[radio].peers entry {} has port 0", peer));
            }
            if peer.ip().is_unspecified() {
                return Err(format!("[radio].peers entry {} is not routable", peer));
            }
            if *peer == self.radio.bind {
                return Err(format!(
                    "[radio].peers entry {} equals [radio].bind; a device cannot send to itself",
                    peer
                ));
            }
            if is_broadcast(peer.ip()) && !self.radio.broadcast {
                return Err(format!(
                    "[radio].peers entry {} is a broadcast address but [radio].broadcast is false",
                    peer
                ));
            }
        }

        if self.device.role.is_arbiter() && self.radio.peers.is_empty() {
            return Err("[radio].peers must not be empty for the arbiter".to_string());
        }
        if self.console.enabled && !self.device.role.is_arbiter() {
            return Err(format!(
                "[console].enabled requires [device].role = 'arbiter' (got '{}')",
                self.device.role
            ));
        }

        Ok(())
    }

    /// Load configuration from a specific file path.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        <Self as ConfigFile>::load_from_file(path)
    }

    /// Load configuration from the default search paths.
    /// Returns default config if no config file is found.
    pub fn load_from_default_paths() -> Result<(Self, Option<PathBuf>), ConfigError> {
        <Self as ConfigFile>::load_from_default_paths()
    }

    /// Generate an example configuration wrapped under the `[match-device]`
    /// section header, suitable for use in a combined `match-rs.toml` file.
    pub fn example_combined_toml() -> String {
        #[derive(serde::Serialize)]
        struct Wrapper {
            #[serde(rename = "match-device")]
            inner: DeviceConfig,
        }
        let example = DeviceConfig {
            general: GeneralConfig {
                log_level: Some("info".to_string()),
            },
            device: DeviceSection {
                role: Role::Arbiter,
            },
            tick: TickConfig::default(),
            radio: RadioConfig::default(),
            console: ConsoleConfig { enabled: true },
        };
        toml::to_string_pretty(&Wrapper { inner: example }).unwrap_or_default()
    }
}

fn is_broadcast(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => v4.is_broadcast() || v4.octets()[3] == 255,
        IpAddr::V6(_) => false,
    }
}

fn validate_log_level(level: Option<&str>) -> Result<(), String> {
    if let Some(level) = level {
        match level {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(format!(
                    "[general].log_level '{}' is invalid (expected one of: trace, debug, info, warn, error)",
                    level
                ))
            }
        }
    }
    Ok(())
}

impl ConfigFile for DeviceConfig {
    fn section_key() -> &'static str {
        "match-device"
    }
}
