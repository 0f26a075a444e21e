use std::fs::{self, File};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{Level, event};
use tracing_appender::non_blocking::{NonBlocking, NonBlockingBuilder, WorkerGuard};
use tracing_subscriber::EnvFilter;

use crate::config::{ResolvedOutputs, SimulationConfig};

/// An open telemetry sink. Events are flushed to `path` until this is dropped.
pub struct Telemetry {
    _guard: WorkerGuard,
    path: PathBuf,
}

impl Telemetry {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Sends engine, bot and runner events as JSON lines to the run's telemetry file.
/// Returns `None` when structured logging is switched off.
pub fn init_logging(
    config: &SimulationConfig,
    outputs: &ResolvedOutputs,
) -> Result<Option<Telemetry>> {
    if !config.logging.enable_structured {
        return Ok(None);
    }

    let path = outputs.telemetry_jsonl();
    let (writer, guard) = open_sink(&path)?;
    let level = config.logging.level().unwrap_or(Level::INFO);
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));

    // Already installed when several runs share one process.
    let _ = tracing_subscriber::fmt()
        .json()
        .flatten_event(true)
        .with_current_span(false)
        .with_env_filter(filter)
        .with_writer(writer)
        .try_init();

    event!(
        Level::INFO,
        run_id = %config.run_id,
        matches = config.matches.count as u64,
        target = config.matches.target,
        agents = ?config.agents.iter().map(|agent| agent.name.as_str()).collect::<Vec<_>>(),
        "telemetry started"
    );

    Ok(Some(Telemetry { _guard: guard, path }))
}

fn open_sink(path: &Path) -> Result<(NonBlocking, WorkerGuard)> {
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)
            .with_context(|| format!("creating telemetry directory {}", dir.display()))?;
    }
    let file = File::create(path)
        .with_context(|| format!("creating telemetry file {}", path.display()))?;
    Ok(NonBlockingBuilder::default().lossy(false).finish(file))
}
