//! Cloneable façade for issuing commands to the battle worker.
//!
//! [`RuntimeHandle`] hides channel plumbing and offers async helpers for
//! inspecting and steering a running battle.
use battle_core::BattleState;
use tokio::sync::{broadcast, mpsc, oneshot};

use super::errors::{Result, RuntimeError};
use crate::events::RuntimeEvent;
use crate::workers::Command;

/// Client-facing handle to interact with the runtime
#[derive(Clone)]
pub struct RuntimeHandle {
    command_tx: mpsc::Sender<Command>,
    event_tx: broadcast::Sender<RuntimeEvent>,
}

impl RuntimeHandle {
    pub(crate) fn new(
        command_tx: mpsc::Sender<Command>,
        event_tx: broadcast::Sender<RuntimeEvent>,
    ) -> Self {
        Self {
            command_tx,
            event_tx,
        }
    }

    /// Subscribe to runtime events.
    ///
    /// Receivers only see events published after they subscribed. A slow
    /// receiver observes `RecvError::Lagged` once it falls more than
    /// `event_buffer_size` events behind.
    pub fn subscribe_events(&self) -> broadcast::Receiver<RuntimeEvent> {
        self.event_tx.subscribe()
    }

    /// Snapshot of the current battle state, taken between ticks.
    pub async fn query_state(&self) -> Result<BattleState> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(Command::QueryState { reply: reply_tx })
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Suspend or resume ticking. Returns the tick the battle is at.
    pub async fn set_paused(&self, paused: bool) -> Result<u64> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(Command::SetPaused {
                paused,
                reply: reply_tx,
            })
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Ask the worker to stop after the tick in progress.
    pub async fn stop(&self) -> Result<()> {
        self.command_tx
            .send(Command::Stop)
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)
    }
}
