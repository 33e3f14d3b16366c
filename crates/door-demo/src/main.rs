//! Door demo entry point.
mod config;
mod scenario;

use anyhow::{Result, bail};
use behavior_tree::Status;
use config::DemoConfig;
use scenario::{Odds, Scenario};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    setup_logging();

    let config = DemoConfig::from_env();
    tracing::info!(
        seed = config.seed,
        poll_ms = config.poll_interval.as_millis() as u64,
        "starting door demo"
    );

    let mut scenario = Scenario::new(&config, Odds::default())?;
    tracing::info!(doors = scenario.door_count(), "building ready");
    let status = scenario.run();

    match (status, scenario.used_door()) {
        (Status::Success, Some(door)) => {
            tracing::info!(%status, "entered the building through {door}");
            Ok(())
        }
        _ => bail!("could not get into the building: tree finished with {status}"),
    }
}

/// Logs to stderr, `info` unless `RUST_LOG` says otherwise.
fn setup_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
