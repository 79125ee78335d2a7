//! Battle state and the records it owns.
//!
//! [`BattleState`] is the single mutable structure the tick scheduler works
//! on. Participants live in a dense `Vec` in stable insertion order and refer
//! to each other only through [`ParticipantId`] lookups.
mod arena;
mod channel;
mod common;
mod participant;
mod status;

pub use arena::{Arena, Obstacle};
pub use channel::{ChannelFlags, ChannelingState};
pub use common::{
    AbilityId, AttackType, Faction, ParticipantId, Position, StatusId, StatusInstanceId,
    TemplateId,
};
pub use participant::{
    AiState, AttackProc, Cooldowns, EnemyProfile, HeroProfile, Participant, ParticipantKind,
    Progression, SpecialAttack,
};
pub use status::{StatusEffect, StatusEffectKind, StatusTag};

use crate::env::BattleRng;
use crate::stats::StatModifier;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum BattleStatus {
    #[default]
    Ongoing,
    Victory,
    Defeat,
}

impl BattleStatus {
    pub fn is_finished(self) -> bool {
        !matches!(self, Self::Ongoing)
    }
}

/// Battle-scoped inputs to the Stat Composer.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BattleContext {
    /// Town building bonuses, applied to heroes as percentages.
    pub global_bonuses: Vec<StatModifier>,
    /// Buffs picked up during the current run. Heroes only.
    pub run_buffs: Vec<StatModifier>,
    /// Energy shields only exist once this building is built.
    pub shield_building_built: bool,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleState {
    pub tick: u64,
    pub elapsed_ms: u64,
    pub status: BattleStatus,
    pub arena: Arena,
    pub context: BattleContext,
    pub participants: Vec<Participant>,
    pub rng: BattleRng,
    next_participant_id: u32,
    next_status_id: u32,
}

impl BattleState {
    pub fn new(arena: Arena, context: BattleContext, seed: u64) -> Self {
        Self {
            tick: 0,
            elapsed_ms: 0,
            status: BattleStatus::Ongoing,
            arena,
            context,
            participants: Vec::new(),
            rng: BattleRng::from_seed(seed),
            next_participant_id: 1,
            next_status_id: 1,
        }
    }

    /// Assigns a fresh id, composes stats, fills resource pools and appends
    /// the participant.
    pub fn add_participant(&mut self, mut participant: Participant) -> ParticipantId {
        participant.id = self.allocate_participant_id();
        participant.joined_tick = self.tick;
        participant.ready(&self.context);
        let id = participant.id;
        self.participants.push(participant);
        id
    }

    pub fn allocate_participant_id(&mut self) -> ParticipantId {
        let id = ParticipantId(self.next_participant_id);
        self.next_participant_id += 1;
        id
    }

    pub fn allocate_status_id(&mut self) -> StatusInstanceId {
        let id = StatusInstanceId(self.next_status_id);
        self.next_status_id += 1;
        id
    }

    pub fn index_of(&self, id: ParticipantId) -> Option<usize> {
        self.participants.iter().position(|p| p.id == id)
    }

    pub fn participant(&self, id: ParticipantId) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id == id)
    }

    pub fn participant_mut(&mut self, id: ParticipantId) -> Option<&mut Participant> {
        self.participants.iter_mut().find(|p| p.id == id)
    }

    /// Living, non-dying members of a faction.
    pub fn living(&self, faction: Faction) -> impl Iterator<Item = &Participant> {
        self.participants
            .iter()
            .filter(move |p| p.faction() == faction && p.is_alive())
    }

    pub fn is_finished(&self) -> bool {
        self.status.is_finished()
    }
}
