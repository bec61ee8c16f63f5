use std::time::{Duration, Instant};

/// Decides when the cached enabled-state goes out to the keypad.
///
/// A frame is due when nothing has ever been sent, when the value changed,
/// or when the refresh period elapsed since the last send. The periodic
/// resend doubles as a liveness signal: the keypad treats silence as a dead
/// bridge. Unknown state is sent as 0 so the keepalive still flows before
/// the store has reported anything.
#[derive(Debug)]
pub struct Keepalive {
    period: Duration,
    last_sent: Option<u8>,
    last_sent_at: Instant,
}

impl Keepalive {
    pub fn new(period: Duration) -> Self {
        Self { period, last_sent: None, last_sent_at: Instant::now() }
    }

    /// Payload (0/1) to send this tick, or `None` to stay quiet.
    pub fn due(&self, enabled: Option<bool>, now: Instant) -> Option<u8> {
        let payload = u8::from(enabled.unwrap_or(false));
        match self.last_sent {
            None => Some(payload),
            Some(last) if payload != last => Some(payload),
            Some(_) if now.duration_since(self.last_sent_at) >= self.period => Some(payload),
            Some(_) => None,
        }
    }

    /// Record a completed send. Not called when the link write failed, so
    /// the next tick retries.
    pub fn record(&mut self, payload: u8, now: Instant) {
        self.last_sent = Some(payload);
        self.last_sent_at = now;
    }
}
