use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use helm_bridge::bridge::{open_link, Bridge};
use helm_bridge::state::{ENABLED, HEADING_COMMAND};
use helm_bridge::store::{PypilotClient, StoreConfig};
use helm_bridge::{doctor, BridgeConfig, DEFAULT_BAUD};

#[derive(Debug, Parser)]
#[command(name = "helm", version, about = "helmlink - keypad to autopilot serial bridge")]
struct Cli {
    #[arg(long)]
    config: String,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Validate the config without touching any hardware.
    Doctor,
    /// Open both links, connect the state store and bridge forever.
    Run,
}

#[derive(Debug, serde::Deserialize)]
struct Config {
    bridge: BridgeConfig,
    store: StoreConfig,
}

fn load_config(path: &str) -> Result<Config> {
    let s = std::fs::read_to_string(path).context("read config")?;
    Ok(toml::from_str(&s).context("parse config toml")?)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let cfg = load_config(&cli.config)?;

    match cli.cmd {
        Command::Doctor => run_doctor(&cfg),
        Command::Run => run(&cfg).await,
    }
}

fn run_doctor(cfg: &Config) -> Result<()> {
    doctor::check_links(&cfg.bridge)?;
    doctor::check_store(&cfg.store)?;
    info!("doctor: OK");
    Ok(())
}

async fn run(cfg: &Config) -> Result<()> {
    let baud = cfg.bridge.baud.unwrap_or(DEFAULT_BAUD);
    let keypad = open_link(&cfg.bridge.keypad_dev, baud).context("keypad link")?;
    let pilot = open_link(&cfg.bridge.pilot_dev, baud).context("pilot link")?;

    let store = PypilotClient::connect(
        cfg.store.addr(),
        vec![ENABLED.to_string(), HEADING_COMMAND.to_string()],
    )
    .await
    .context("connect state store")?;

    info!("helm: bridging {} <-> {}", cfg.bridge.keypad_dev, cfg.bridge.pilot_dev);
    info!("helm: state store at {}", cfg.store.addr());

    let mut bridge = Bridge::new(keypad, pilot, store, &cfg.bridge);
    tokio::select! {
        _ = bridge.run() => {}
        _ = tokio::signal::ctrl_c() => info!("helm: interrupted, exiting"),
    }
    Ok(())
}
