// SPDX-FileCopyrightText: 2025 Stanislaw Grams <stanislawgrams@gmail.com>
//
// SPDX-License-Identifier: BSD-2-Clause

//! UDP stand-in for the broadcast radio.
//!
//! Codes go out from an ephemeral socket and come in on the configured bind
//! address. A datagram is our own echo only when it comes from our sending
//! port and carries the code we sent moments ago; echoes are dropped, so
//! broadcast loopback behaves like a radio that cannot hear itself.

use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use tokio::net::UdpSocket;
use tokio::sync::{mpsc, watch};
use tracing::{debug, warn};

use match_core::{DynResult, RadioTransport};
use match_protocol::codec::{decode_frame, encode_code, FRAME_LEN};

use crate::config::RadioConfig;

/// How long a sent code may come back to us and still count as an echo.
const ECHO_WINDOW: Duration = Duration::from_secs(1);

/// Last code put on the air and when.
type LastSent = Arc<Mutex<Option<(u32, Instant)>>>;

/// Sending half.
#[derive(Debug)]
pub struct UdpRadio {
    socket: UdpSocket,
    peers: Vec<SocketAddr>,
    last_sent: LastSent,
}

/// Receiving half.
#[derive(Debug)]
pub struct UdpReceiver {
    socket: UdpSocket,
    own_sender: SocketAddr,
    last_sent: LastSent,
}

/// Bind both halves of the radio.
pub async fn open(config: &RadioConfig) -> io::Result<(UdpRadio, UdpReceiver)> {
    let rx = UdpSocket::bind(config.bind).await?;
    let tx = UdpSocket::bind(SocketAddr::new(config.bind.ip(), 0)).await?;
    tx.set_broadcast(config.broadcast)?;

    let own_sender = tx.local_addr()?;
    let last_sent = LastSent::default();

    Ok((
        UdpRadio {
            socket: tx,
            peers: config.peers.clone(),
            last_sent: last_sent.clone(),
        },
        UdpReceiver {
            socket: rx,
            own_sender,
            last_sent,
        },
    ))
}

impl UdpRadio {
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.socket.local_addr()
    }
}

impl RadioTransport for UdpRadio {
    fn send_code<'a>(
        &'a mut self,
        code: u32,
    ) -> Pin<Box<dyn Future<Output = DynResult<()>> + Send + 'a>> {
        Box::pin(async move {
            let frame = encode_code(code);
            if let Ok(mut last) = self.last_sent.lock() {
                *last = Some((code, Instant::now()));
            }
            let mut failed = Vec::new();
            for peer in &self.peers {
                if let Err(e) = self.socket.send_to(&frame, peer).await {
                    warn!("Send of code {} to {} failed: {}", code, peer, e);
                    failed.push(peer.to_string());
                }
            }
            if failed.is_empty() {
                Ok(())
            } else {
                Err(format!("send failed for {}", failed.join(", ")).into())
            }
        })
    }
}

impl UdpReceiver {
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.socket.local_addr()
    }

    /// Whether `code` from `src` is the echo of our own last transmission.
    fn is_own(&self, src: SocketAddr, code: u32) -> bool {
        if src.port() != self.own_sender.port() {
            return false;
        }
        if !self.own_sender.ip().is_unspecified() && src.ip() != self.own_sender.ip() {
            return false;
        }
        match self.last_sent.lock() {
            Ok(last) => {
                matches!(*last, Some((sent, at)) if sent == code && at.elapsed() <= ECHO_WINDOW)
            }
            Err(_) => false,
        }
    }
}

/// Receive datagrams and forward decoded codes to the device task.
///
/// Codes are forwarded raw; deciding what an unknown code means is the
/// device's business. Returns when shutdown is signalled or the device task
/// has gone away.
pub async fn run_receiver(
    receiver: UdpReceiver,
    code_tx: mpsc::Sender<u32>,
    mut shutdown_rx: watch::Receiver<bool>,
) -> io::Result<()> {
    // One spare byte so an oversized datagram shows up as too long.
    let mut buf = [0u8; FRAME_LEN + 1];

    loop {
        tokio::select! {
            received = receiver.socket.recv_from(&mut buf) => {
                let (len, src) = received?;
                let code = match decode_frame(&buf[..len]) {
                    Ok(code) => code,
                    Err(e) => {
                        warn!("Dropping datagram from {}: {}", src, e);
                        continue;
                    }
                };
                if receiver.is_own(src, code) {
                    debug!("Dropping echo of code {} from {}", code, src);
                    continue;
                }
                debug!("Received code {} from {}", code, src);
                if code_tx.send(code).await.is_err() {
                    return Ok(());
                }
            }
            changed = shutdown_rx.changed() => {
                if changed.is_err() || *shutdown_rx.borrow() {
                    return Ok(());
                }
            }
        }
    }
}
