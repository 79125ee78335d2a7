//! Fixed-timestep battle scheduler.
//!
//! The [`BattleEngine`] is the authoritative reducer for [`BattleState`]. One
//! call to [`BattleEngine::tick`] advances the battle by `tick_ms`:
//! per-participant cooldowns, channels, AI, movement, attacks, casts and
//! status effects in id order, then the end-of-tick lifecycle (dying
//! countdown, summons, transformations, victory check).
//!
//! A tick is transactional. It runs on a copy of the state and is committed
//! only when it finishes without error.

mod effects;
mod pipeline;

use tracing::trace;

use crate::env::BattleEnv;
use crate::error::EngineError;
use crate::event::BattleEvent;
use crate::state::{BattleState, BattleStatus};

/// Result of one tick.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TickOutcome {
    pub tick: u64,
    pub elapsed_ms: u64,
    pub status: BattleStatus,
    /// Everything that happened this tick, in order.
    pub events: Vec<BattleEvent>,
}

impl TickOutcome {
    fn idle(state: &BattleState) -> Self {
        Self {
            tick: state.tick,
            elapsed_ms: state.elapsed_ms,
            status: state.status,
            events: Vec::new(),
        }
    }
}

/// Battle engine driving a borrowed [`BattleState`].
pub struct BattleEngine<'a> {
    state: &'a mut BattleState,
}

impl<'a> BattleEngine<'a> {
    pub fn new(state: &'a mut BattleState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &BattleState {
        self.state
    }

    /// Advances the battle by one tick.
    ///
    /// A finished battle is left untouched and yields an empty outcome. On
    /// error the state is exactly what it was before the call.
    pub fn tick(&mut self, env: BattleEnv<'_>) -> Result<TickOutcome, EngineError> {
        if env.config().tick_ms == 0 {
            return Err(EngineError::ZeroTickDuration);
        }
        if self.state.is_finished() {
            trace!(tick = self.state.tick, status = %self.state.status, "battle already finished");
            return Ok(TickOutcome::idle(self.state));
        }

        let mut next = self.state.clone();
        let events = pipeline::run(&mut next, env)?;
        *self.state = next;

        Ok(TickOutcome {
            events,
            ..TickOutcome::idle(self.state)
        })
    }

    /// Ticks until the battle ends or `max_ticks` ticks have run, returning
    /// every event produced.
    pub fn run(
        &mut self,
        env: BattleEnv<'_>,
        max_ticks: u64,
    ) -> Result<Vec<BattleEvent>, EngineError> {
        let mut events = Vec::new();
        for _ in 0..max_ticks {
            if self.state.is_finished() {
                break;
            }
            events.extend(self.tick(env)?.events);
        }
        Ok(events)
    }
}

/// By-value form of [`BattleEngine::tick`].
pub fn step(
    mut state: BattleState,
    env: BattleEnv<'_>,
) -> Result<(BattleState, TickOutcome), EngineError> {
    let outcome = BattleEngine::new(&mut state).tick(env)?;
    Ok((state, outcome))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::state::{Arena, BattleContext, Participant};
    use crate::stats::CombatStats;

    fn duel() -> BattleState {
        let mut state = BattleState::new(Arena::default(), BattleContext::default(), 3);
        let stats = CombatStats {
            max_hp: 30.0,
            damage: 10.0,
            attack_speed: 1.0,
            attack_range: 50.0,
            movement_speed: 50.0,
            ..CombatStats::default()
        };
        state.add_participant(Participant::hero("knight", stats).at(100.0, 100.0));
        state.add_participant(Participant::enemy("goblin", stats).at(120.0, 100.0));
        state
    }

    #[test]
    fn zero_tick_duration_is_rejected_without_mutation() {
        let config = EngineConfig {
            tick_ms: 0,
            ..EngineConfig::default()
        };
        let mut state = duel();
        let before = state.clone();

        let err = BattleEngine::new(&mut state).tick(BattleEnv::new(&config)).unwrap_err();
        assert_eq!(err, EngineError::ZeroTickDuration);
        assert_eq!(state, before);
    }

    #[test]
    fn tick_advances_clock() {
        let config = EngineConfig::default();
        let (state, outcome) = step(duel(), BattleEnv::new(&config)).unwrap();

        assert_eq!(outcome.tick, 1);
        assert_eq!(outcome.elapsed_ms, 100);
        assert_eq!(state.tick, 1);
        assert_eq!(state.status, BattleStatus::Ongoing);
    }

    #[test]
    fn finished_battle_is_not_advanced() {
        let config = EngineConfig::default();
        let mut state = duel();
        state.status = BattleStatus::Victory;
        let before = state.clone();

        let outcome = BattleEngine::new(&mut state).tick(BattleEnv::new(&config)).unwrap();
        assert!(outcome.events.is_empty());
        assert_eq!(state, before);
    }

    #[test]
    fn run_stops_at_battle_end() {
        let config = EngineConfig::default();
        let mut state = duel();
        let events = BattleEngine::new(&mut state).run(BattleEnv::new(&config), 1_000).unwrap();

        assert!(state.is_finished());
        assert!(state.tick < 1_000);
        assert!(matches!(events.last(), Some(BattleEvent::BattleEnded { .. })));
    }
}
