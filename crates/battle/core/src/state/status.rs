use crate::stats::StatModifier;

use super::{ParticipantId, StatusId, StatusInstanceId};

/// Type tag of a status effect, used for display and event payloads.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusTag {
    Buff,
    Debuff,
    Stun,
    Dot,
}

/// Behavior carried by a live status effect instance.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StatusEffectKind {
    Buff(StatModifier),
    /// Authored with a positive magnitude; the composer subtracts it.
    Debuff(StatModifier),
    /// No stat contribution. Gates the AI and interrupts channels.
    Stun,
    Dot {
        damage_per_tick: f32,
        tick_interval_ms: u32,
        until_next_tick_ms: u32,
    },
}

impl StatusEffectKind {
    pub const fn tag(&self) -> StatusTag {
        match self {
            Self::Buff(_) => StatusTag::Buff,
            Self::Debuff(_) => StatusTag::Debuff,
            Self::Stun => StatusTag::Stun,
            Self::Dot { .. } => StatusTag::Dot,
        }
    }
}

/// A timed modifier attached to a participant.
///
/// Instances are never merged: two poisons from two sources are two entries.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffect {
    pub id: StatusInstanceId,
    /// Definition this instance was created from, if any.
    pub status_id: Option<StatusId>,
    pub name: String,
    pub kind: StatusEffectKind,
    pub remaining_ms: u32,
    pub source: Option<ParticipantId>,
    /// Tick on which the effect was attached. The status engine leaves it
    /// untouched during that tick.
    pub applied_tick: u64,
}

impl StatusEffect {
    pub fn is_stun(&self) -> bool {
        matches!(self.kind, StatusEffectKind::Stun)
    }

    /// Signed contribution to the Stat Composer's status stage.
    pub fn stat_modifier(&self) -> Option<StatModifier> {
        match self.kind {
            StatusEffectKind::Buff(modifier) => Some(modifier),
            StatusEffectKind::Debuff(modifier) => Some(modifier.negated()),
            StatusEffectKind::Stun | StatusEffectKind::Dot { .. } => None,
        }
    }
}
