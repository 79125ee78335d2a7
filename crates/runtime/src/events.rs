//! Notifications broadcast by the battle worker.

use battle_core::{BattleEvent, BattleStatus, TickOutcome};
use serde::{Deserialize, Serialize};

/// Everything the engine reported for one committed tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickReport {
    pub tick: u64,
    pub elapsed_ms: u64,
    pub status: BattleStatus,
    pub events: Vec<BattleEvent>,
}

impl From<TickOutcome> for TickReport {
    fn from(outcome: TickOutcome) -> Self {
        Self {
            tick: outcome.tick,
            elapsed_ms: outcome.elapsed_ms,
            status: outcome.status,
            events: outcome.events,
        }
    }
}

/// Why the worker stopped ticking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// One faction was wiped out.
    Finished,
    /// `max_ticks` ran without a winner.
    TickLimit,
    /// A client asked the worker to stop.
    Stopped,
}

/// Final state of a driven battle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleSummary {
    pub status: BattleStatus,
    pub tick: u64,
    pub elapsed_ms: u64,
    pub reason: StopReason,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RuntimeEvent {
    Started {
        participants: usize,
        tick_ms: u32,
    },
    Tick(TickReport),
    Finished(BattleSummary),
    /// The tick was rolled back and the worker gave up.
    Failed {
        tick: u64,
        error: String,
    },
}
