//! Battle worker that owns the authoritative [`battle_core::BattleState`].
//!
//! Advances the battle through [`battle_core::BattleEngine`] on a tokio
//! interval, answers [`RuntimeHandle`](crate::RuntimeHandle) commands between
//! ticks, and publishes [`RuntimeEvent`] notifications.

use std::sync::Arc;

use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, error, info, trace, warn};

use battle_core::{BattleEngine, BattleEnv, BattleError, BattleState, ContentTables};

use crate::api::{Result, RuntimeError};
use crate::events::{BattleSummary, RuntimeEvent, StopReason, TickReport};
use crate::runtime::RuntimeConfig;

/// Commands that can be sent to the battle worker
pub enum Command {
    /// Clone the current state (read-only).
    QueryState { reply: oneshot::Sender<BattleState> },
    /// Suspend or resume ticking. Replies with the current tick.
    SetPaused {
        paused: bool,
        reply: oneshot::Sender<u64>,
    },
    /// End the battle loop.
    Stop,
}

/// Background task that ticks one battle.
pub struct BattleWorker {
    state: BattleState,
    content: Arc<ContentTables>,
    config: RuntimeConfig,
    command_rx: mpsc::Receiver<Command>,
    event_tx: broadcast::Sender<RuntimeEvent>,
    paused: bool,
    accepting_commands: bool,
    ticks_run: u64,
}

impl BattleWorker {
    pub fn new(
        state: BattleState,
        content: Arc<ContentTables>,
        config: RuntimeConfig,
        command_rx: mpsc::Receiver<Command>,
        event_tx: broadcast::Sender<RuntimeEvent>,
        paused: bool,
    ) -> Self {
        Self {
            state,
            content,
            config,
            command_rx,
            event_tx,
            paused,
            accepting_commands: true,
            ticks_run: 0,
        }
    }

    /// Main worker loop.
    ///
    /// Ticks are serialized: a command is only handled between two ticks, and
    /// ticks that fall behind the wall clock are skipped rather than bunched.
    pub async fn run(mut self) -> Result<BattleSummary> {
        let mut interval = time::interval(self.config.tick_period());
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        info!(
            target: "runtime::worker",
            participants = self.state.participants.len(),
            tick_ms = self.config.engine.tick_ms,
            time_scale = self.config.time_scale,
            "battle started"
        );
        let _ = self.event_tx.send(RuntimeEvent::Started {
            participants: self.state.participants.len(),
            tick_ms: self.config.engine.tick_ms,
        });

        loop {
            if let Some(reason) = self.stop_reason() {
                return Ok(self.finish(reason));
            }

            tokio::select! {
                command = self.command_rx.recv(), if self.accepting_commands => match command {
                    Some(command) => {
                        if let Some(reason) = self.handle_command(command) {
                            return Ok(self.finish(reason));
                        }
                    }
                    None => {
                        trace!(target: "runtime::worker", "all handles dropped");
                        self.accepting_commands = false;
                    }
                },
                _ = interval.tick(), if !self.paused => {
                    self.tick()?;
                }
                else => {
                    warn!(target: "runtime::worker", "paused with no handle left to resume");
                    return Ok(self.finish(StopReason::Stopped));
                }
            }
        }
    }

    fn stop_reason(&self) -> Option<StopReason> {
        if self.state.is_finished() {
            return Some(StopReason::Finished);
        }
        self.config
            .max_ticks
            .is_some_and(|max| self.ticks_run >= max)
            .then_some(StopReason::TickLimit)
    }

    fn handle_command(&mut self, command: Command) -> Option<StopReason> {
        match command {
            Command::QueryState { reply } => {
                let _ = reply.send(self.state.clone());
            }
            Command::SetPaused { paused, reply } => {
                debug!(target: "runtime::worker", paused, tick = self.state.tick, "pause toggled");
                self.paused = paused;
                let _ = reply.send(self.state.tick);
            }
            Command::Stop => return Some(StopReason::Stopped),
        }
        None
    }

    fn tick(&mut self) -> Result<()> {
        let env = BattleEnv::with_content(&self.config.engine, &self.content);

        match BattleEngine::new(&mut self.state).tick(env) {
            Ok(outcome) => {
                self.ticks_run += 1;
                trace!(
                    target: "runtime::worker",
                    tick = outcome.tick,
                    events = outcome.events.len(),
                    "tick committed"
                );
                let _ = self.event_tx.send(RuntimeEvent::Tick(TickReport::from(outcome)));
                Ok(())
            }
            Err(source) => {
                let tick = self.state.tick + 1;
                error!(
                    target: "runtime::worker",
                    tick,
                    code = source.error_code(),
                    severity = source.severity().as_str(),
                    error = %source,
                    "tick failed"
                );
                let _ = self.event_tx.send(RuntimeEvent::Failed {
                    tick,
                    error: source.to_string(),
                });
                Err(RuntimeError::Engine { tick, source })
            }
        }
    }

    fn finish(&self, reason: StopReason) -> BattleSummary {
        let summary = BattleSummary {
            status: self.state.status,
            tick: self.state.tick,
            elapsed_ms: self.state.elapsed_ms,
            reason,
        };
        info!(
            target: "runtime::worker",
            status = %summary.status,
            tick = summary.tick,
            elapsed_ms = summary.elapsed_ms,
            ?reason,
            "battle stopped"
        );
        let _ = self.event_tx.send(RuntimeEvent::Finished(summary.clone()));
        summary
    }
}
