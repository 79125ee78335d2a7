//! Events emitted by a tick, in the order they happened.

use crate::state::{
    AbilityId, BattleStatus, ParticipantId, StatusInstanceId, StatusTag, TemplateId,
};

/// What produced an [`AttackEvent`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AttackSource {
    Basic,
    Special,
    Ability(AbilityId),
    DamageOverTime(StatusInstanceId),
}

/// One resolved damage or heal action.
///
/// For damage, `shield_damage + damage` is the mitigated amount; `damage` is
/// what spilled past the shield.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttackEvent {
    pub attacker: ParticipantId,
    pub target: ParticipantId,
    pub damage: f32,
    pub shield_damage: f32,
    pub heal: f32,
    pub is_crit: bool,
    pub is_heal: bool,
    pub is_special: bool,
    pub source: AttackSource,
    /// Name of the first status the hit applied, if any.
    pub applied_status: Option<String>,
    pub tick: u64,
    pub timestamp_ms: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum InterruptCause {
    Stun,
    Death,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "event", rename_all = "snake_case"))]
pub enum BattleEvent {
    Attack(AttackEvent),
    ChannelStarted {
        caster: ParticipantId,
        ability: AbilityId,
        target: Option<ParticipantId>,
        duration_ms: u32,
        tick: u64,
    },
    ChannelTicked {
        caster: ParticipantId,
        ability: AbilityId,
        tick: u64,
    },
    ChannelCompleted {
        caster: ParticipantId,
        ability: AbilityId,
        tick: u64,
    },
    ChannelInterrupted {
        caster: ParticipantId,
        ability: AbilityId,
        cause: InterruptCause,
        tick: u64,
    },
    StatusApplied {
        target: ParticipantId,
        source: Option<ParticipantId>,
        instance: StatusInstanceId,
        tag: StatusTag,
        name: String,
        tick: u64,
    },
    StatusExpired {
        target: ParticipantId,
        instance: StatusInstanceId,
        name: String,
        tick: u64,
    },
    ManaRestored {
        target: ParticipantId,
        amount: f32,
        tick: u64,
    },
    Summoned {
        summoner: ParticipantId,
        summoned: ParticipantId,
        template: TemplateId,
        tick: u64,
    },
    Transformed {
        from: ParticipantId,
        into: ParticipantId,
        template: TemplateId,
        tick: u64,
    },
    Died {
        participant: ParticipantId,
        tick: u64,
    },
    Removed {
        participant: ParticipantId,
        tick: u64,
    },
    BattleEnded {
        status: BattleStatus,
        tick: u64,
    },
}

impl BattleEvent {
    pub fn as_attack(&self) -> Option<&AttackEvent> {
        match self {
            Self::Attack(event) => Some(event),
            _ => None,
        }
    }
}
