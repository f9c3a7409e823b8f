//! Replay a recorded frame script through the wandnav frame driver
//!
//! Usage:
//!   wandnav-replay --script frames.json
//!   wandnav-replay --script frames.json --config nav.toml --json

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;
use tracing_subscriber::{fmt, EnvFilter};
use wandnav::NavigationConfig;
use wandnav_replay::{replay, ReplayScript};

#[derive(Debug, Parser)]
#[command(
    name = "wandnav-replay",
    version,
    about = "Replay controller frames and print the camera trajectory"
)]
struct Args {
    /// Frame script (JSON)
    #[arg(short, long)]
    script: PathBuf,

    /// Navigation tuning (TOML); defaults apply when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Emit one JSON object per frame instead of a table
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => NavigationConfig::load(path)
            .with_context(|| format!("Failed to load navigation config {}", path.display()))?,
        None => NavigationConfig::default(),
    };
    let script = ReplayScript::load(&args.script)?;
    info!(frames = script.frames.len(), "replaying {}", args.script.display());

    let steps = replay(&script, config)?;
    for step in &steps {
        if args.json {
            println!("{}", serde_json::to_string(step)?);
            continue;
        }
        let device = step.device.map_or_else(|| "-".to_string(), |d| format!("{:?}", d));
        let outcome = step
            .error
            .as_deref()
            .or(step.outcome.as_deref())
            .unwrap_or("skipped");
        println!(
            "{:>4} {:<7} {:<8} x={:>12.3} y={:>12.3} alt={:>12.3}  {}",
            step.frame,
            format!("{:?}", step.tick).to_lowercase(),
            device,
            step.camera.x,
            step.camera.y,
            step.camera.altitude,
            outcome
        );
    }
    Ok(())
}
