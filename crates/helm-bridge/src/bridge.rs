//! The bridge loop.
//!
//! One sequential task owns both serial links, the store client and all
//! loop state. Every iteration: pump the store, refresh the keypad's
//! enabled-state, relay pilot bytes to the keypad, then pump keypad bytes
//! toward the pilot while peeling off button frames. Nothing here is ever
//! fatal; errors are returned to the driver, logged, and the next tick
//! carries on with whatever state it has. The passthrough path stays alive
//! even when the store is down.

use bytes::{Buf, BytesMut};
use serde_json::Value;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::time::timeout;
use tokio_serial::{SerialPortBuilderExt, SerialStream};
use tracing::{info, warn};

use anyhow::{Context, Result};
use helm_proto::{ButtonEvent, Frame, AP_ENABLED_CODE, BUTTON_EVENT_CODE, FRAME_LEN};

use crate::keepalive::Keepalive;
use crate::state::{ApState, ENABLED, HEADING_COMMAND};
use crate::store::{StateStore, StoreError};
use crate::translate::{translate, StoreWrite};
use crate::BridgeConfig;

/// Non-fatal faults from one loop iteration, per I/O edge.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("state store poll: {0}")]
    StorePoll(StoreError),
    #[error("state store set: {0}")]
    StoreSet(StoreError),
    #[error("pilot link read: {0}")]
    PilotRead(std::io::Error),
    #[error("pilot link write: {0}")]
    PilotWrite(std::io::Error),
    #[error("keypad link read: {0}")]
    KeypadRead(std::io::Error),
    #[error("keypad link write: {0}")]
    KeypadWrite(std::io::Error),
}

/// Open one of the serial links.
pub fn open_link(dev: &str, baud: u32) -> Result<SerialStream> {
    tokio_serial::new(dev, baud)
        .open_native_async()
        .with_context(|| format!("open serial device {}", dev))
}

pub struct Bridge<K, P, S> {
    keypad: K,
    pilot: P,
    store: S,
    state: ApState,
    keepalive: Keepalive,
    rxbuf: BytesMut,
    read_timeout: Duration,
    tick: Duration,
}

impl<K, P, S> Bridge<K, P, S>
where
    K: AsyncRead + AsyncWrite + Unpin,
    P: AsyncRead + AsyncWrite + Unpin,
    S: StateStore,
{
    pub fn new(keypad: K, pilot: P, store: S, cfg: &BridgeConfig) -> Self {
        Self {
            keypad,
            pilot,
            store,
            state: ApState::default(),
            keepalive: Keepalive::new(Duration::from_millis(cfg.keepalive_ms.unwrap_or(500))),
            rxbuf: BytesMut::new(),
            read_timeout: Duration::from_millis(cfg.read_timeout_ms.unwrap_or(10)),
            tick: Duration::from_millis(cfg.tick_ms.unwrap_or(10)),
        }
    }

    /// Run forever. Terminates only with the process.
    pub async fn run(&mut self) {
        info!("bridge loop running");
        loop {
            for err in self.step(Instant::now()).await {
                warn!("{}", err);
            }
            tokio::time::sleep(self.tick).await;
        }
    }

    /// One iteration. Returns the non-fatal faults that occurred; the
    /// driver owns the log-and-continue policy.
    pub async fn step(&mut self, now: Instant) -> Vec<BridgeError> {
        let mut errors = Vec::new();

        // Pump the store into the cache. A failed poll leaves it stale.
        match self.store.poll() {
            Ok(updates) => {
                for (name, value) in updates {
                    self.state.apply(&name, &value);
                }
            }
            Err(e) => errors.push(BridgeError::StorePoll(e)),
        }

        // Enabled-state toward the keypad, on change and as keepalive.
        if let Some(payload) = self.keepalive.due(self.state.enabled, now) {
            let raw = Frame::new(AP_ENABLED_CODE, payload.into()).encode();
            match self.keypad.write_all(&raw).await {
                Ok(()) => self.keepalive.record(payload, now),
                Err(e) => errors.push(BridgeError::KeypadWrite(e)),
            }
        }

        let mut buf = [0u8; 256];

        // Pilot -> keypad: opaque relay, byte for byte.
        match read_some(&mut self.pilot, &mut buf, self.read_timeout).await {
            Ok(0) => {}
            Ok(n) => {
                if let Err(e) = self.keypad.write_all(&buf[..n]).await {
                    errors.push(BridgeError::KeypadWrite(e));
                }
            }
            Err(e) => errors.push(BridgeError::PilotRead(e)),
        }

        // Keypad -> pilot: reassemble fixed frames, forward each verbatim,
        // then dispatch the ones that are valid button events.
        match read_some(&mut self.keypad, &mut buf, self.read_timeout).await {
            Ok(0) => {}
            Ok(n) => {
                self.rxbuf.extend_from_slice(&buf[..n]);
                while self.rxbuf.len() >= FRAME_LEN {
                    let mut raw = [0u8; FRAME_LEN];
                    raw.copy_from_slice(&self.rxbuf[..FRAME_LEN]);
                    self.rxbuf.advance(FRAME_LEN);

                    if let Err(e) = self.pilot.write_all(&raw).await {
                        errors.push(BridgeError::PilotWrite(e));
                    }

                    if let Some(err) = self.dispatch(&raw) {
                        errors.push(err);
                    }
                }
            }
            Err(e) => errors.push(BridgeError::KeypadRead(e)),
        }

        errors
    }

    /// Act on one already-forwarded frame if it is a checksum-valid button
    /// event. A bad checksum is expected line noise, dropped without fuss.
    fn dispatch(&mut self, raw: &[u8; FRAME_LEN]) -> Option<BridgeError> {
        let (frame, crc_ok) = Frame::decode(raw);
        if frame.code != BUTTON_EVENT_CODE || !crc_ok {
            return None;
        }
        let event = ButtonEvent::from_value(frame.value)?;
        info!("keypad button: {:?}", event);

        let write = translate(event, &self.state)?;
        match self.set(write) {
            Ok(()) => None,
            Err(e) => Some(BridgeError::StoreSet(e)),
        }
    }

    fn set(&mut self, write: StoreWrite) -> Result<(), StoreError> {
        match write {
            StoreWrite::Enabled(target) => {
                info!("set {} -> {}", ENABLED, target);
                self.store.set(ENABLED, Value::Bool(target))
            }
            StoreWrite::Heading(deg) => {
                info!("set {} -> {:.1}", HEADING_COMMAND, deg);
                self.store.set(HEADING_COMMAND, Value::from(deg))
            }
        }
    }
}

/// Bounded read: whatever is available within the timeout, 0 bytes when the
/// link is quiet. Keeps the loop cadence owned by the tick sleep.
async fn read_some<R: AsyncRead + Unpin>(
    link: &mut R,
    buf: &mut [u8],
    wait: Duration,
) -> std::io::Result<usize> {
    match timeout(wait, link.read(buf)).await {
        Ok(n) => n,
        Err(_elapsed) => Ok(0),
    }
}
