// SPDX-FileCopyrightText: 2025 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

pub mod controller;
pub mod device;
pub mod error;
pub mod hooks;
pub mod phase;
pub mod radio;
pub mod role;
pub mod util;

pub type DynResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

pub use controller::{TickOutcome, Transition};
pub use device::MatchDevice;
pub use error::MatchError;
pub use hooks::{Hook, HookTable};
pub use phase::MatchPhase;
pub use radio::{RadioLink, RadioTransport};
pub use role::{Role, Team};
pub use util::normalize_name;
