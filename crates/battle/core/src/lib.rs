//! Deterministic real-time battle simulation.
//!
//! `battle-core` holds the canonical rules of an auto-battle between a hero
//! party and an enemy group: stat composition, targeting and movement, role
//! behavior trees, channeled abilities, status effects and damage
//! resolution. Everything advances in fixed ticks through
//! [`engine::BattleEngine`]; given the same state, content and seed a battle
//! always plays out identically.
//!
//! Content (abilities, statuses, participant templates) is reached through
//! the oracle traits in [`env`] so loaders and tests can supply it however
//! they like.
pub mod ai;
pub mod channel;
pub mod combat;
pub mod config;
pub mod engine;
pub mod env;
pub mod error;
pub mod event;
pub mod geometry;
pub mod state;
pub mod stats;
pub mod status;

pub use ai::{AiDecision, AiIntent, BattleView, Role, decide};
pub use channel::{CastStart, ChannelRejection};
pub use combat::{AttackKind, AttackResolution};
pub use config::EngineConfig;
pub use engine::{BattleEngine, TickOutcome, step};
pub use env::{
    AbilityDefinition, AbilityEffect, AbilityOracle, BattleEnv, BattleRng, CastCondition,
    ContentTables, DefenseMitigation, EffectScope, EffectTrigger, HealTarget, MitigationModel,
    ParticipantTemplate, StatusDefinition, StatusOracle, StatusTemplate, TemplateOracle,
    TriggeredEffect,
};
pub use error::{BattleError, ContentError, EngineError, ErrorSeverity};
pub use event::{AttackEvent, AttackSource, BattleEvent, InterruptCause};
pub use state::{
    AbilityId, AiState, Arena, AttackProc, AttackType, BattleContext, BattleState, BattleStatus,
    ChannelFlags, ChannelingState, EnemyProfile, Faction, HeroProfile, Obstacle, Participant,
    ParticipantId, ParticipantKind, Position, Progression, SpecialAttack, StatusEffect,
    StatusEffectKind, StatusId, StatusInstanceId, StatusTag, TemplateId,
};
pub use stats::{CombatStats, ModifierKind, StatKind, StatModifier};
