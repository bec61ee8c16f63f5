pub mod bridge;
pub mod doctor;
pub mod keepalive;
pub mod state;
pub mod store;
pub mod translate;

use serde::Deserialize;

/// Baud rate both serial links run at unless configured otherwise.
pub const DEFAULT_BAUD: u32 = 38400;

#[derive(Debug, Clone, Deserialize)]
pub struct BridgeConfig {
    /// Keypad-facing serial device, e.g. /dev/serial/by-id/usb-1a86_USB_Serial-if00-port0
    pub keypad_dev: String,

    /// Pilot-facing serial device (typically the PTY the autopilot daemon
    /// listens on), e.g. /dev/ttyHELM_BRIDGE
    pub pilot_dev: String,

    /// Baud for both links. Default 38400.
    pub baud: Option<u32>,

    /// Enabled-state refresh period toward the keypad. Default 500 ms.
    pub keepalive_ms: Option<u64>,

    /// Loop sleep between iterations. Default 10 ms.
    pub tick_ms: Option<u64>,

    /// Per-link read timeout inside one iteration. Default 10 ms.
    pub read_timeout_ms: Option<u64>,
}
