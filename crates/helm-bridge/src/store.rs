//! State-store client.
//!
//! The autopilot daemon exposes its live values over a line-oriented TCP
//! protocol: the client asks for names with `watch={"name":true}`, the
//! server pushes `name=<json>` lines as values change, and writes go out as
//! `name=<json>` lines from the client. The bridge only ever watches two
//! names and treats everything else about the store as a black box.

use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;
use tracing::{debug, info, warn};

use serde::Deserialize;

/// Default TCP port of the autopilot state store.
pub const DEFAULT_PORT: u16 = 23322;

const REDIAL_DELAY: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Host running the autopilot daemon, normally 127.0.0.1.
    pub host: String,
    pub port: Option<u16>,
}

impl StoreConfig {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port.unwrap_or(DEFAULT_PORT))
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("state store connection lost")]
    Disconnected,
    #[error("state store connect: {0}")]
    Connect(#[from] std::io::Error),
}

/// Non-blocking surface over the store connection. `poll` drains whatever
/// updates arrived since the last call; `set` queues one write. Neither
/// waits on the network.
pub trait StateStore {
    fn poll(&mut self) -> Result<Vec<(String, Value)>, StoreError>;
    fn set(&mut self, name: &str, value: Value) -> Result<(), StoreError>;
}

/// One live connection: reader task feeds `updates`, writer task drains the
/// line queue behind `writes`.
struct Conn {
    updates: mpsc::UnboundedReceiver<(String, Value)>,
    writes: mpsc::UnboundedSender<String>,
}

pub struct PypilotClient {
    addr: String,
    watches: Vec<String>,
    conn: Option<Conn>,
    conn_tx: mpsc::UnboundedSender<Conn>,
    conn_rx: mpsc::UnboundedReceiver<Conn>,
}

impl PypilotClient {
    /// Dial the store and register the watches. Startup-fatal on failure;
    /// once up, later connection losses redial in the background.
    pub async fn connect(addr: String, watches: Vec<String>) -> Result<Self, StoreError> {
        let conn = dial(&addr, &watches).await?;
        let (conn_tx, conn_rx) = mpsc::unbounded_channel();
        Ok(Self { addr, watches, conn: Some(conn), conn_tx, conn_rx })
    }

    fn spawn_redial(&self) {
        let addr = self.addr.clone();
        let watches = self.watches.clone();
        let tx = self.conn_tx.clone();
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(REDIAL_DELAY).await;
                match dial(&addr, &watches).await {
                    Ok(conn) => {
                        let _ = tx.send(conn);
                        return;
                    }
                    Err(e) => warn!("state store redial {} failed: {}", addr, e),
                }
            }
        });
    }

    fn drop_conn(&mut self) {
        self.conn = None;
        self.spawn_redial();
    }
}

impl StateStore for PypilotClient {
    fn poll(&mut self) -> Result<Vec<(String, Value)>, StoreError> {
        if self.conn.is_none() {
            match self.conn_rx.try_recv() {
                Ok(conn) => self.conn = Some(conn),
                // Redial still in progress: quiet tick, stale cache.
                Err(_) => return Ok(Vec::new()),
            }
        }

        let mut out = Vec::new();
        let mut lost = false;
        if let Some(conn) = self.conn.as_mut() {
            loop {
                match conn.updates.try_recv() {
                    Ok(update) => out.push(update),
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => {
                        lost = true;
                        break;
                    }
                }
            }
        }
        if lost {
            self.drop_conn();
            return Err(StoreError::Disconnected);
        }
        Ok(out)
    }

    fn set(&mut self, name: &str, value: Value) -> Result<(), StoreError> {
        let Some(conn) = self.conn.as_ref() else {
            return Err(StoreError::Disconnected);
        };
        if conn.writes.send(format!("{}={}\n", name, value)).is_err() {
            self.drop_conn();
            return Err(StoreError::Disconnected);
        }
        Ok(())
    }
}

async fn dial(addr: &str, watches: &[String]) -> std::io::Result<Conn> {
    let stream = TcpStream::connect(addr).await?;
    let (rd, mut wr) = stream.into_split();

    for name in watches {
        wr.write_all(format!("watch={{\"{}\":true}}\n", name).as_bytes()).await?;
    }

    let (update_tx, updates) = mpsc::unbounded_channel();
    let (writes, write_rx) = mpsc::unbounded_channel();
    tokio::spawn(read_loop(rd, update_tx));
    tokio::spawn(write_loop(wr, write_rx));

    info!("state store connected at {}", addr);
    Ok(Conn { updates, writes })
}

async fn read_loop(rd: OwnedReadHalf, tx: mpsc::UnboundedSender<(String, Value)>) {
    let mut lines = BufReader::new(rd).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                let Some((name, raw)) = line.split_once('=') else {
                    debug!("store line without '=': {}", line);
                    continue;
                };
                match serde_json::from_str::<Value>(raw.trim()) {
                    Ok(value) => {
                        if tx.send((name.to_string(), value)).is_err() {
                            return;
                        }
                    }
                    Err(e) => debug!("unparseable store value for {}: {}", name, e),
                }
            }
            Ok(None) => {
                warn!("state store closed the connection");
                return;
            }
            Err(e) => {
                warn!("state store read error: {}", e);
                return;
            }
        }
    }
}

async fn write_loop(mut wr: OwnedWriteHalf, mut rx: mpsc::UnboundedReceiver<String>) {
    while let Some(line) = rx.recv().await {
        if let Err(e) = wr.write_all(line.as_bytes()).await {
            warn!("state store write error: {}", e);
            return;
        }
    }
}
