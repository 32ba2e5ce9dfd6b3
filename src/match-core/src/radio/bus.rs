// SPDX-FileCopyrightText: 2025 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! In-process radio medium.
//!
//! Every station on a [`RadioBus`] hears what the others transmit, never
//! its own transmissions. Used to run several simulated devices in one
//! process.

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::warn;

use crate::DynResult;

use super::RadioTransport;

#[derive(Debug, Clone, Copy)]
struct Frame {
    sender: u64,
    code: u32,
}

/// Shared medium stations attach to.
#[derive(Debug, Clone)]
pub struct RadioBus {
    tx: broadcast::Sender<Frame>,
    next_id: Arc<AtomicU64>,
}

impl RadioBus {
    /// `capacity` is how many codes a slow station may fall behind by
    /// before it starts losing the oldest ones.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self {
            tx,
            next_id: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Attach a new station. It only hears codes sent after this call.
    pub fn station(&self) -> BusStation {
        BusStation {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            tx: self.tx.clone(),
            rx: self.tx.subscribe(),
        }
    }
}

/// One transceiver on a [`RadioBus`].
#[derive(Debug)]
pub struct BusStation {
    id: u64,
    tx: broadcast::Sender<Frame>,
    rx: broadcast::Receiver<Frame>,
}

impl BusStation {
    /// Wait for the next code from another station.
    ///
    /// Returns `None` once every other handle to the bus is gone. Codes
    /// lost to lag are skipped; later codes supersede them anyway.
    pub async fn recv(&mut self) -> Option<u32> {
        loop {
            match self.rx.recv().await {
                Ok(frame) if frame.sender == self.id => continue,
                Ok(frame) => return Some(frame.code),
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    warn!("Radio bus station {} dropped {} codes", self.id, n);
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Non-blocking variant of [`recv`](Self::recv).
    pub fn try_recv(&mut self) -> Option<u32> {
        loop {
            match self.rx.try_recv() {
                Ok(frame) if frame.sender == self.id => continue,
                Ok(frame) => return Some(frame.code),
                Err(broadcast::error::TryRecvError::Lagged(n)) => {
                    warn!("Radio bus station {} dropped {} codes", self.id, n);
                }
                Err(_) => return None,
            }
        }
    }
}

impl RadioTransport for BusStation {
    fn send_code<'a>(
        &'a mut self,
        code: u32,
    ) -> Pin<Box<dyn Future<Output = DynResult<()>> + Send + 'a>> {
        let frame = Frame {
            sender: self.id,
            code,
        };
        // Nobody listening is not an error on a broadcast medium.
        let _ = self.tx.send(frame);
        Box::pin(std::future::ready(Ok(())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::MatchDevice;
    use crate::hooks::Hook;
    use crate::phase::MatchPhase;
    use crate::radio::RadioLink;
    use crate::role::{Role, Team};
    use std::sync::atomic::AtomicUsize;

    #[tokio::test]
    async fn test_sender_does_not_hear_itself() {
        let bus = RadioBus::new(8);
        let mut a = bus.station();
        let mut b = bus.station();

        a.send_code(1).await.unwrap();
        assert_eq!(b.recv().await, Some(1));
        assert_eq!(a.try_recv(), None);
    }

    #[tokio::test]
    async fn test_codes_arrive_in_order() {
        let bus = RadioBus::new(8);
        let mut a = bus.station();
        let mut b = bus.station();

        for code in [1, 2, 4] {
            a.send_code(code).await.unwrap();
        }
        assert_eq!(b.try_recv(), Some(1));
        assert_eq!(b.try_recv(), Some(2));
        assert_eq!(b.try_recv(), Some(4));
        assert_eq!(b.try_recv(), None);
    }

    #[tokio::test]
    async fn test_lagging_station_keeps_latest() {
        let bus = RadioBus::new(2);
        let mut a = bus.station();
        let mut b = bus.station();

        for code in [0, 1, 2, 3] {
            a.send_code(code).await.unwrap();
        }
        assert_eq!(b.try_recv(), Some(2));
        assert_eq!(b.try_recv(), Some(3));
    }

    #[tokio::test]
    async fn test_arbiter_drives_goal_over_bus() {
        let bus = RadioBus::new(16);
        let mut arbiter = RadioLink::new(MatchDevice::new(Role::Arbiter), bus.station());
        let mut goal = RadioLink::new(MatchDevice::new(Role::GoalYellow), bus.station());

        let points = Arc::new(AtomicUsize::new(0));
        let p = points.clone();
        goal.device_mut().install_hook(Hook::Point(Team::Yellow), move || {
            p.fetch_add(1, Ordering::Relaxed);
        });

        for phase in [MatchPhase::Play, MatchPhase::PointYellow, MatchPhase::DisallowYellow] {
            arbiter.announce(phase).await.unwrap();
            let code = goal.transport_mut().recv().await.unwrap();
            goal.on_receive(code).unwrap();
            assert_eq!(goal.device().current_phase(), arbiter.device().current_phase());
        }

        assert_eq!(points.load(Ordering::Relaxed), 1);
        assert_eq!(goal.device().current_phase(), MatchPhase::Play);
    }
}
