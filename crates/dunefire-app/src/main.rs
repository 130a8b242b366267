use std::path::PathBuf;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use dunefire_app::game_loop::{GameLoop, LoopSettings, Pacing};
use dunefire_app::AppError;
use dunefire_core::config::GameConfig;

#[derive(Parser)]
#[command(name = "dunefire")]
#[command(about = "Headless DUNEFIRE session driven by the autopilot")]
struct Cli {
    /// JSON game config; built-in campaign when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Override the config's RNG seed.
    #[arg(long)]
    seed: Option<u64>,
    /// Stop after this many seconds of session time.
    #[arg(long, default_value_t = 600.0)]
    seconds: f64,
    /// Override the wager stake.
    #[arg(long)]
    stake: Option<u32>,
    /// Run as fast as possible with a fixed frame step instead of real time.
    #[arg(long)]
    fast: bool,
}

fn main() -> Result<(), AppError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    if let Some(stake) = cli.stake {
        config.wager.stake = stake;
    }

    let settings = LoopSettings {
        pacing: if cli.fast {
            Pacing::Fixed {
                dt: config.max_frame_dt.min(1.0 / 60.0),
            }
        } else {
            Pacing::RealTime
        },
        max_session_secs: cli.seconds,
        autopilot: true,
    };
    info!(seed = config.seed, levels = config.levels.len(), "starting session");

    let game = GameLoop::spawn(config, settings)?;
    match game.join()? {
        Some(summary) => println!("{}", serde_json::to_string_pretty(&summary)?),
        None => info!("session ended without a result"),
    }
    Ok(())
}
