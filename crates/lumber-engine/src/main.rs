//! Host binary for the Lumber agent.
//!
//! Wires the decision core to the sandbox forest and runs the tick loop
//! until a bound is hit or Ctrl-C is pressed.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `lumber-config.yaml` (defaults if absent)
//! 2. Initialize structured logging (tracing)
//! 3. Build the sandbox forest from the configured seed
//! 4. Build the cycle scheduler and confirm settings
//! 5. Run the host loop
//! 6. Log the result

mod error;
mod runner;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use lumber_core::config::LoggingConfig;
use lumber_core::{CycleScheduler, LumberConfig};
use lumber_world::default_forest;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;
use crate::runner::{HostControl, ProgressLog};

/// Config file looked up in the working directory.
const CONFIG_PATH: &str = "lumber-config.yaml";

/// Cycles between progress lines.
const PROGRESS_EVERY: u64 = 100;

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration or world construction fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration.
    let config = load_config()?;

    // 2. Initialize structured logging.
    init_logging(&config.logging);

    info!(
        tree = %config.target.tree,
        disposal = %config.disposal.mode,
        tick_interval_ms = config.host.tick_interval_ms,
        seed = config.timing.seed,
        "Configuration loaded"
    );

    // 3. Build the world.
    let mut world = default_forest(config.timing.seed).map_err(EngineError::from)?;
    info!(
        width = world.grid().width(),
        height = world.grid().height(),
        agent = ?world.agent_position(),
        "Sandbox forest created"
    );

    // 4. Build the scheduler and give the start signal.
    let mut scheduler = CycleScheduler::new(&config).map_err(EngineError::from)?;
    scheduler.confirm_settings();

    // 5. Run until a bound or Ctrl-C.
    let tick = Duration::from_millis(config.host.tick_interval_ms);
    let control = Arc::new(HostControl::new(tick, &config.host));
    {
        let control = Arc::clone(&control);
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    info!("Ctrl-C received, stopping after this tick");
                    control.request_stop();
                }
                Err(e) => warn!(error = %e, "Unable to listen for Ctrl-C"),
            }
        });
    }

    let mut progress = ProgressLog::new(PROGRESS_EVERY);
    let result = runner::run_host(&mut scheduler, &mut world, &control, tick, &mut progress).await;

    // 6. Log results.
    runner::log_run_end(&result, &world);
    info!("lumber-engine shutdown complete");

    Ok(())
}

/// Load configuration from [`CONFIG_PATH`], falling back to defaults
/// (with environment overrides) when the file is absent.
fn load_config() -> Result<LumberConfig, EngineError> {
    let path = Path::new(CONFIG_PATH);
    let config = if path.exists() {
        LumberConfig::from_file(path)?
    } else {
        LumberConfig::parse("")?
    };
    Ok(config)
}

/// Install the global subscriber. `RUST_LOG` wins over the configured
/// level.
fn init_logging(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    if logging.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    }
}
