//! High-level runtime orchestrator.
//!
//! The runtime owns the battle worker, wires up command/event channels, and
//! exposes a builder-based API for clients to drive a battle.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

use battle_core::{BattleState, ContentTables, EngineConfig};

use crate::api::{Result, RuntimeError, RuntimeHandle};
use crate::events::{BattleSummary, RuntimeEvent};
use crate::workers::{BattleWorker, Command};

/// Runtime configuration shared across the orchestrator and the worker.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub engine: EngineConfig,
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
    /// Stop after this many ticks even if nobody won.
    pub max_ticks: Option<u64>,
    /// Simulated milliseconds per wall-clock millisecond. `1.0` plays in
    /// real time.
    pub time_scale: f64,
}

impl RuntimeConfig {
    /// Wall-clock period between two ticks.
    ///
    /// Saturates at [`Duration::MAX`] for scales too small to represent;
    /// [`RuntimeBuilder::build`] rejects those up front.
    pub fn tick_period(&self) -> Duration {
        self.try_tick_period().unwrap_or(Duration::MAX)
    }

    fn try_tick_period(&self) -> Option<Duration> {
        let secs = f64::from(self.engine.tick_ms) / 1_000.0 / self.time_scale;
        Duration::try_from_secs_f64(secs)
            .ok()
            .map(|period| period.max(Duration::from_micros(1)))
    }

    fn validate(&self) -> Result<()> {
        if self.engine.tick_ms == 0 {
            return Err(RuntimeError::InvalidConfig("tick_ms must be greater than zero".into()));
        }
        if !(self.time_scale.is_finite() && self.time_scale > 0.0) {
            return Err(RuntimeError::InvalidConfig(format!(
                "time_scale must be a positive number, got {}",
                self.time_scale
            )));
        }
        if self.try_tick_period().is_none() {
            return Err(RuntimeError::InvalidConfig(format!(
                "time_scale {} stretches a {} ms tick beyond the representable period",
                self.time_scale, self.engine.tick_ms
            )));
        }
        if self.event_buffer_size == 0 || self.command_buffer_size == 0 {
            return Err(RuntimeError::InvalidConfig("channel buffers must not be empty".into()));
        }
        Ok(())
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            event_buffer_size: 256,
            command_buffer_size: 32,
            max_ticks: None,
            time_scale: 1.0,
        }
    }
}

/// A battle running on a background task.
///
/// Design: Runtime owns the worker and its join handle.
/// [`RuntimeHandle`] provides a cloneable façade for clients.
pub struct Runtime {
    handle: RuntimeHandle,
    worker_handle: JoinHandle<Result<BattleSummary>>,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Get a cloneable handle to this runtime
    pub fn handle(&self) -> RuntimeHandle {
        self.handle.clone()
    }

    /// Subscribe to runtime events
    pub fn subscribe_events(&self) -> broadcast::Receiver<RuntimeEvent> {
        self.handle.subscribe_events()
    }

    /// Wait for the battle to end and return its summary.
    pub async fn wait(self) -> Result<BattleSummary> {
        drop(self.handle);
        self.worker_handle.await.map_err(RuntimeError::WorkerJoin)?
    }

    /// Stop the battle and wait for the worker to wind down.
    pub async fn shutdown(self) -> Result<BattleSummary> {
        // The worker may already have exited on its own.
        let _ = self.handle.stop().await;
        self.wait().await
    }
}

/// Builder for [`Runtime`].
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    state: Option<BattleState>,
    content: Arc<ContentTables>,
    start_paused: bool,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            state: None,
            content: Arc::new(ContentTables::default()),
            start_paused: false,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Provide the initial battle state (required)
    pub fn initial_state(mut self, state: BattleState) -> Self {
        self.state = Some(state);
        self
    }

    /// Content tables backing every oracle. Defaults to empty tables.
    pub fn content(mut self, content: impl Into<Arc<ContentTables>>) -> Self {
        self.content = content.into();
        self
    }

    /// Hold the first tick until [`RuntimeHandle::set_paused`] resumes.
    pub fn start_paused(mut self, paused: bool) -> Self {
        self.start_paused = paused;
        self
    }

    /// Spawn the worker. Must be called inside a tokio runtime.
    pub fn build(self) -> Result<Runtime> {
        self.config.validate()?;
        let state = self.state.ok_or(RuntimeError::MissingState)?;

        let (command_tx, command_rx) = mpsc::channel::<Command>(self.config.command_buffer_size);
        let (event_tx, _event_rx) =
            broadcast::channel::<RuntimeEvent>(self.config.event_buffer_size);

        let handle = RuntimeHandle::new(command_tx, event_tx.clone());

        let worker = BattleWorker::new(
            state,
            self.content,
            self.config,
            command_rx,
            event_tx,
            self.start_paused,
        );
        let worker_handle = tokio::spawn(worker.run());

        Ok(Runtime {
            handle,
            worker_handle,
        })
    }
}
