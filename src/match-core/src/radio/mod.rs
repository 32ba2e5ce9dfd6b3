// SPDX-FileCopyrightText: 2025 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Radio side of a device.
//!
//! A transport only knows how to put one integer on the air. The
//! [`RadioLink`] sits between a transport and a [`MatchDevice`]: inbound
//! codes go to the dispatcher, outbound phases go out as their ordinal.

pub mod bus;

use std::future::Future;
use std::pin::Pin;

use tracing::{debug, warn};

use crate::controller::{TickOutcome, Transition};
use crate::device::MatchDevice;
use crate::error::MatchError;
use crate::phase::MatchPhase;
use crate::DynResult;

pub use bus::{BusStation, RadioBus};

/// Fire-and-forget broadcast of a single match code.
///
/// There is no acknowledgement and no retry; a send that returns `Ok` only
/// means the code was handed to the medium.
pub trait RadioTransport: Send {
    fn send_code<'a>(
        &'a mut self,
        code: u32,
    ) -> Pin<Box<dyn Future<Output = DynResult<()>> + Send + 'a>>;
}

/// Transport adapter binding a device to a radio.
#[derive(Debug)]
pub struct RadioLink<T> {
    device: MatchDevice,
    transport: T,
}

impl<T: RadioTransport> RadioLink<T> {
    pub fn new(device: MatchDevice, transport: T) -> Self {
        Self { device, transport }
    }

    pub fn device(&self) -> &MatchDevice {
        &self.device
    }

    pub fn device_mut(&mut self) -> &mut MatchDevice {
        &mut self.device
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn into_parts(self) -> (MatchDevice, T) {
        (self.device, self.transport)
    }

    /// Dispatch an inbound code synchronously, in arrival order.
    pub fn on_receive(&mut self, code: u32) -> Result<Transition, MatchError> {
        self.device.receive_code(code)
    }

    /// Put `phase` on the air without touching local state.
    pub async fn broadcast(&mut self, phase: MatchPhase) -> Result<(), MatchError> {
        debug!("Broadcasting {} (code {})", phase, phase.code());
        self.transport.send_code(phase.code()).await.map_err(|e| {
            warn!("Broadcast of {} failed: {}", phase, e);
            MatchError::Transport(e.to_string())
        })
    }

    /// Apply `phase` locally, then broadcast it.
    ///
    /// This is how the arbiter originates phases: a radio never hears its
    /// own transmission, so the sender has to follow along by itself.
    pub async fn announce(&mut self, phase: MatchPhase) -> Result<Transition, MatchError> {
        let transition = self.device.apply(phase);
        self.broadcast(phase).await?;
        Ok(transition)
    }

    pub fn tick(&mut self) -> TickOutcome {
        self.device.tick()
    }
}
