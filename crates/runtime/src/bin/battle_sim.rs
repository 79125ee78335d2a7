//! Headless battle simulator.
//!
//! Loads engine config, content and a scenario from a data directory, plays
//! the battle on the runtime and prints every event as one JSON line.
//!
//! ```text
//! RUST_LOG=battle_core=debug battle-sim crypt --time-scale 50
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use battle_content::{ContentFactory, validate};
use battle_runtime::{Runtime, RuntimeConfig, RuntimeEvent};
use clap::Parser;
use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::EnvFilter;

/// Play a battle scenario headlessly
#[derive(Parser, Debug)]
#[command(name = "battle-sim")]
#[command(about = "Run a deterministic battle scenario", long_about = None)]
#[command(version)]
struct Args {
    /// Scenario name under `<data>/scenarios/`
    scenario: String,

    /// Data directory holding config.toml, content.ron and scenarios/
    #[arg(long, default_value = concat!(env!("CARGO_MANIFEST_DIR"), "/../battle/content/data"))]
    data: PathBuf,

    /// Override the scenario seed
    #[arg(long)]
    seed: Option<u64>,

    /// Stop after this many ticks
    #[arg(long, default_value = "20000")]
    max_ticks: u64,

    /// Simulated time per wall-clock time (1 = real time)
    #[arg(long, default_value = "1000")]
    time_scale: f64,

    /// Skip broken content references instead of failing the tick
    #[arg(long)]
    lenient: bool,

    /// Only print the final summary
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let factory = ContentFactory::new(&args.data);
    let mut engine = factory
        .load_config()
        .with_context(|| format!("loading config from {}", args.data.display()))?;
    if args.lenient {
        engine.strict_content = false;
    }
    let content = factory.load_content()?;
    for issue in validate(&content) {
        tracing::warn!(%issue, "content issue");
    }

    let mut spec = factory.load_scenario(&args.scenario)?;
    if let Some(seed) = args.seed {
        spec.seed = seed;
    }
    let state = spec.build(&content)?;
    tracing::info!(scenario = %spec.name, seed = spec.seed, "scenario loaded");

    let config = RuntimeConfig {
        engine,
        max_ticks: Some(args.max_ticks),
        time_scale: args.time_scale,
        event_buffer_size: 4096,
        ..RuntimeConfig::default()
    };
    let runtime = Runtime::builder()
        .config(config)
        .initial_state(state)
        .content(content)
        .start_paused(true)
        .build()?;

    let quiet = args.quiet;
    let mut events = runtime.subscribe_events();
    let printer = tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(RuntimeEvent::Tick(report)) if !quiet => {
                    for event in &report.events {
                        println!("{}", serde_json::to_string(event)?);
                    }
                }
                Ok(RuntimeEvent::Finished(summary)) => {
                    println!("{}", serde_json::to_string(&summary)?);
                    break;
                }
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "event printer fell behind");
                }
                Err(RecvError::Closed) => break,
            }
        }
        anyhow::Ok(())
    });

    runtime.handle().set_paused(false).await?;
    let summary = runtime.wait().await?;
    printer.await??;
    tracing::info!(
        status = %summary.status,
        tick = summary.tick,
        elapsed_ms = summary.elapsed_ms,
        reason = ?summary.reason,
        "battle over"
    );
    Ok(())
}
