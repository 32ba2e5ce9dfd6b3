// SPDX-FileCopyrightText: 2025 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Parse a configured level name, falling back to INFO.
pub fn parse_level(log_level: Option<&str>) -> Level {
    log_level
        .and_then(|s| s.trim().parse::<Level>().ok())
        .unwrap_or(Level::INFO)
}

/// Initialize logging with optional level from config.
///
/// Safe to call more than once; only the first call installs a subscriber.
pub fn init_logging(log_level: Option<&str>) {
    let _ = FmtSubscriber::builder()
        .with_target(false)
        .with_max_level(parse_level(log_level))
        .try_init();
}
