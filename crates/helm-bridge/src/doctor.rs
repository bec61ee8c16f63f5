use anyhow::Result;

use crate::store::StoreConfig;
use crate::{BridgeConfig, DEFAULT_BAUD};

pub fn check_links(cfg: &BridgeConfig) -> Result<()> {
    anyhow::ensure!(!cfg.keypad_dev.is_empty(), "bridge.keypad_dev missing");
    anyhow::ensure!(!cfg.pilot_dev.is_empty(), "bridge.pilot_dev missing");
    anyhow::ensure!(cfg.keypad_dev != cfg.pilot_dev, "bridge links must be distinct devices");
    anyhow::ensure!(cfg.baud.unwrap_or(DEFAULT_BAUD) > 0, "bridge.baud invalid");
    anyhow::ensure!(cfg.keepalive_ms.unwrap_or(500) > 0, "bridge.keepalive_ms must be > 0");
    anyhow::ensure!(cfg.tick_ms.unwrap_or(10) > 0, "bridge.tick_ms must be > 0");
    Ok(())
}

pub fn check_store(cfg: &StoreConfig) -> Result<()> {
    anyhow::ensure!(!cfg.host.is_empty(), "store.host missing");
    anyhow::ensure!(cfg.port.map(|p| p > 0).unwrap_or(true), "store.port invalid");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn good_bridge() -> BridgeConfig {
        BridgeConfig {
            keypad_dev: "/dev/ttyUSB0".into(),
            pilot_dev: "/dev/ttyHELM_BRIDGE".into(),
            baud: None,
            keepalive_ms: None,
            tick_ms: None,
            read_timeout_ms: None,
        }
    }

    #[test]
    fn accepts_defaults() {
        assert!(check_links(&good_bridge()).is_ok());
        assert!(check_store(&StoreConfig { host: "127.0.0.1".into(), port: None }).is_ok());
    }

    #[test]
    fn rejects_same_device_twice() {
        let mut cfg = good_bridge();
        cfg.pilot_dev = cfg.keypad_dev.clone();
        assert!(check_links(&cfg).is_err());
    }

    #[test]
    fn rejects_zero_keepalive() {
        let mut cfg = good_bridge();
        cfg.keepalive_ms = Some(0);
        assert!(check_links(&cfg).is_err());
    }
}
